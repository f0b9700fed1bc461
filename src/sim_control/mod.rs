//! Real-time simulation core: control inputs, smoothing, the induction/flight physics,
//! flight-phase classification and the bounded telemetry history.

mod control_state;
mod flight_phase;
mod input_smoother;
mod physics_engine;
mod sim_context;
mod snapshot;
mod telemetry_buffer;


pub use control_state::{ControlChannel, ControlEvent, ControlState};
pub use flight_phase::FlightPhase;
pub use input_smoother::InputSmoother;
pub use physics_engine::{ChamberReadings, PhysicsEngine, SimulationState};
pub use sim_context::SimContext;
pub use snapshot::TelemetrySnapshot;
pub use telemetry_buffer::{TelemetryBuffer, TelemetrySample};
