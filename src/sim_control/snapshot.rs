use super::{ChamberReadings, FlightPhase};
use std::fmt;

/// Read-only view of one tick, handed to the panel, the chart and the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetrySnapshot {
    pub tick: u64,
    pub engine_on: bool,
    /// Smoothed throttle in percent.
    pub throttle: f64,
    /// Smoothed mixture in percent.
    pub mixture: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub chambers: ChamberReadings,
    pub mass_air_flow: f64,
    pub fuel_flow_rate: f64,
    pub elapsed_time: f64,
    pub total_fuel_consumed: f64,
    pub phase: FlightPhase,
}

impl TelemetrySnapshot {
    /// Throttle as shown on the slider label, rounded half up.
    #[allow(clippy::cast_possible_truncation)]
    pub fn throttle_percent(&self) -> i32 { (self.throttle + 0.5).floor() as i32 }

    /// Mixture as shown on the slider label, rounded half up.
    #[allow(clippy::cast_possible_truncation)]
    pub fn mixture_percent(&self) -> i32 { (self.mixture + 0.5).floor() as i32 }

    /// Elapsed time as `mm:ss`, both fields floored.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn elapsed_mm_ss(&self) -> String {
        let total = self.elapsed_time.max(0.0).floor() as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Flight Phase: {}", self.phase)?;
        writeln!(f, "Height: {:.1} m", self.altitude)?;
        writeln!(f, "Velocity: {:.1} m/s", self.velocity)?;
        writeln!(f, "Chamber A: {} kPa", self.chambers.a)?;
        writeln!(f, "Chamber B: {} kPa", self.chambers.b)?;
        writeln!(f, "Chamber C: {} kPa", self.chambers.c)?;
        writeln!(f, "Chamber D: {} kPa", self.chambers.d)?;
        writeln!(f, "Mass Air Flow: {:.3} kg/s", self.mass_air_flow)?;
        writeln!(f, "Fuel Flow Rate: {:.3} kg/s", self.fuel_flow_rate)?;
        writeln!(f, "Elapsed Time: {}", self.elapsed_mm_ss())?;
        write!(f, "Total Fuel: {:.4} kg", self.total_fuel_consumed)
    }
}
