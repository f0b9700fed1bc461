//! Data handed to the external renderers: normalised chart points and scene parameters.

mod chart_frame;
mod visual_params;

#[cfg(test)]
mod tests;

pub use chart_frame::{ChartFrame, ChartPoint};
pub use visual_params::VisualParams;
