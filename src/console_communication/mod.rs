//! TCP console the visualization front-end connects to.
//! It includes the `console_endpoint` module for the socket handling,
//! the `console_messenger` module that turns console traffic into simulation inputs
//! and telemetry into console traffic, and the `carbsim_messages` wire definitions.

mod carbsim_messages;
mod console_endpoint;
mod console_messenger;

#[cfg(test)]
mod tests;

pub(crate) use console_messenger::ConsoleMessenger;
