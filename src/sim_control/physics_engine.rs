use chrono::{DateTime, TimeDelta, Utc};

/// Persistent physical state of the induction system and the flight profile.
///
/// All quantities are zero while the engine is off.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationState {
    /// Height above ground in meters, within `[0, max_altitude]`.
    pub altitude: f64,
    /// Airspeed in m/s.
    pub velocity: f64,
    /// Air density in kg/m³.
    pub air_density: f64,
    /// Impact (pitot) pressure in Pa.
    pub impact_pressure: f64,
    /// Venturi throat pressure in Pa.
    pub venturi_pressure: f64,
    /// Dynamic pressure in Pa.
    pub dynamic_pressure: f64,
    /// Mass air flow through the intake in kg/s.
    pub mass_air_flow: f64,
    /// Fuel flow rate in kg/s, never below [`PhysicsEngine::MIN_FUEL_FLOW`] while running.
    pub fuel_flow_rate: f64,
    /// Integrated fuel burn in kg.
    pub total_fuel_consumed: f64,
    /// Seconds since the engine was switched on.
    pub elapsed_time: f64,
}

/// The four diagnostic chamber taps, in kPa with three decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChamberReadings {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl ChamberReadings {
    /// Derives the taps from the pascal-scale venturi and impact pressures.
    pub fn from_pressures(venturi: f64, impact: f64) -> Self {
        Self {
            a: pa_to_kpa_3(venturi),
            b: pa_to_kpa_3(impact),
            c: pa_to_kpa_3((venturi + impact) * 2.0),
            d: pa_to_kpa_3(impact * 1.75),
        }
    }
}

/// Rounds half up to the nearest pascal and converts to kPa.
fn pa_to_kpa_3(pa: f64) -> f64 { (pa + 0.5).floor() / 1000.0 }

#[allow(clippy::cast_precision_loss)]
fn secs(dt: TimeDelta) -> f64 {
    dt.num_microseconds().map_or(dt.num_milliseconds() as f64 / 1e3, |us| us as f64 / 1e6)
}

/// Advances [`SimulationState`] once per tick from the smoothed throttle and mixture.
///
/// Owns the state and the wall-clock bookkeeping for elapsed time and fuel integration.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    max_altitude: f64,
    state: SimulationState,
    start_time: Option<DateTime<Utc>>,
    last_update: Option<DateTime<Utc>>,
    last_fuel_flow_rate: f64,
}

impl PhysicsEngine {
    /// Throttle at which the altitude holds.
    const HOLD_THROTTLE: f64 = 20.0;
    const CLIMB_RATE: f64 = 0.1;
    const SINK_RATE: f64 = 0.05;
    /// Altitude separating the takeoff roll from the climb.
    pub const TAKEOFF_CEILING: f64 = 500.0;
    const GROUND_VELOCITY: f64 = 60.0;
    const TAKEOFF_VMAX: f64 = 150.0;
    const CRUISE_VELOCITY: f64 = 250.0;
    const SEA_LEVEL_DENSITY: f64 = 1.225;
    const DENSITY_LAPSE: f64 = 0.0001;
    /// Highest altitude at which the linear density model stays non-negative.
    pub const DENSITY_CEILING: f64 = 1.0 / Self::DENSITY_LAPSE;
    const BASE_IMPACT_PRESSURE: f64 = 130_000.0;
    const IMPACT_LAPSE: f64 = 0.000_05;
    const MIN_ALTITUDE_FACTOR: f64 = 0.3;
    const REF_VELOCITY: f64 = 200.0;
    const INTAKE_AREA: f64 = 0.2;
    const AIR_FUEL_RATIO: f64 = 4.5;
    pub const MIN_FUEL_FLOW: f64 = 10.0;

    pub fn new(max_altitude: f64) -> Self {
        Self {
            max_altitude,
            state: SimulationState::default(),
            start_time: None,
            last_update: None,
            last_fuel_flow_rate: 0.0,
        }
    }

    pub fn state(&self) -> &SimulationState { &self.state }
    pub fn max_altitude(&self) -> f64 { self.max_altitude }

    pub fn chambers(&self) -> ChamberReadings {
        ChamberReadings::from_pressures(self.state.venturi_pressure, self.state.impact_pressure)
    }

    /// Starts the elapsed-time origin at `now` unless one is already running.
    pub fn start_clock(&mut self, now: DateTime<Utc>) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
            self.last_update = Some(now);
        }
    }

    /// Zeroes every accumulator and stops the clock.
    pub fn reset(&mut self) {
        self.state = SimulationState::default();
        self.start_time = None;
        self.last_update = None;
        self.last_fuel_flow_rate = 0.0;
    }

    /// Altitude after one tick at `throttle`, with the dead band at exactly 20 %.
    pub fn next_altitude(&self, altitude: f64, throttle: f64) -> f64 {
        if throttle > Self::HOLD_THROTTLE {
            (altitude + (throttle - Self::HOLD_THROTTLE) * Self::CLIMB_RATE).min(self.max_altitude)
        } else if throttle < Self::HOLD_THROTTLE && altitude > 0.0 {
            (altitude - (Self::HOLD_THROTTLE - throttle) * Self::SINK_RATE).max(0.0)
        } else {
            altitude
        }
    }

    /// Piecewise airspeed of the flight profile.
    #[allow(clippy::float_cmp)]
    pub fn velocity_at(&self, altitude: f64, throttle: f64) -> f64 {
        let t = throttle / 100.0;
        if altitude == 0.0 {
            Self::GROUND_VELOCITY
        } else if altitude > 0.0 && altitude <= Self::TAKEOFF_CEILING {
            Self::GROUND_VELOCITY + t * (Self::TAKEOFF_VMAX - Self::GROUND_VELOCITY)
        } else if altitude > Self::TAKEOFF_CEILING && altitude < self.max_altitude {
            Self::TAKEOFF_VMAX + t * (Self::CRUISE_VELOCITY - Self::TAKEOFF_VMAX)
        } else {
            Self::CRUISE_VELOCITY
        }
    }

    /// Advances the state by one tick.
    ///
    /// `throttle` and `mixture` are the smoothed inputs in percent, `now` is the
    /// wall-clock time of this tick. Must only be called while the engine is on.
    pub fn step(&mut self, throttle: f64, mixture: f64, now: DateTime<Utc>) -> &SimulationState {
        self.start_clock(now);
        let altitude = self.next_altitude(self.state.altitude, throttle);
        let velocity = self.velocity_at(altitude, throttle);
        let s = &mut self.state;
        s.altitude = altitude;
        s.velocity = velocity;

        s.air_density = Self::SEA_LEVEL_DENSITY * (1.0 - altitude * Self::DENSITY_LAPSE);
        let altitude_factor = (1.0 - altitude * Self::IMPACT_LAPSE).max(Self::MIN_ALTITUDE_FACTOR);
        s.impact_pressure =
            Self::BASE_IMPACT_PRESSURE * altitude_factor * (s.velocity / Self::REF_VELOCITY).powi(2);
        s.dynamic_pressure = 0.5 * s.air_density * s.velocity.powi(2);
        s.venturi_pressure = s.impact_pressure - s.dynamic_pressure;
        s.mass_air_flow = s.air_density * Self::INTAKE_AREA * s.velocity;
        s.fuel_flow_rate = ((s.mass_air_flow / Self::AIR_FUEL_RATIO) * (mixture / 100.0) * throttle)
            .max(Self::MIN_FUEL_FLOW);

        if let Some(start) = self.start_time {
            s.elapsed_time = secs(now - start).max(0.0);
        }
        if let Some(last) = self.last_update {
            let dt = secs(now - last);
            if dt > 0.0 {
                // trapezoid over the wall-clock interval since the previous tick
                let avg_rate = (s.fuel_flow_rate + self.last_fuel_flow_rate) / 2.0;
                s.total_fuel_consumed += avg_rate * dt;
                self.last_fuel_flow_rate = s.fuel_flow_rate;
                self.last_update = Some(now);
            }
        }
        &self.state
    }
}
