use super::PhysicsEngine;
use crate::config::SimConfig;
use strum_macros::{Display, EnumIter};

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum FlightPhase {
    #[strum(serialize = "Ground Idle")]
    GroundIdle,
    #[strum(serialize = "Takeoff Roll")]
    TakeoffRoll,
    Climb,
    Descent,
    Cruise,
}

impl FlightPhase {
    /// Classifies a flight state against the default altitude ceiling.
    pub fn classify(altitude: f64, velocity: f64) -> Self {
        Self::classify_within(altitude, velocity, SimConfig::DEF_MAX_ALTITUDE)
    }

    /// Classifies a flight state, first matching predicate wins.
    ///
    /// The ground and takeoff checks come before the descent check, so a negative
    /// velocity at or below the takeoff ceiling still reads as [`FlightPhase::TakeoffRoll`].
    #[allow(clippy::float_cmp)]
    pub fn classify_within(altitude: f64, velocity: f64, max_altitude: f64) -> Self {
        let ceiling = PhysicsEngine::TAKEOFF_CEILING;
        if altitude == 0.0 {
            FlightPhase::GroundIdle
        } else if altitude > 0.0 && altitude <= ceiling {
            FlightPhase::TakeoffRoll
        } else if velocity < 0.0 && altitude > ceiling {
            FlightPhase::Descent
        } else if altitude > ceiling && altitude < max_altitude {
            FlightPhase::Climb
        } else {
            FlightPhase::Cruise
        }
    }

    pub fn is_airborne(self) -> bool { !matches!(self, FlightPhase::GroundIdle) }
}
