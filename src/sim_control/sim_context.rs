use super::{
    ControlChannel, ControlEvent, ControlState, FlightPhase, InputSmoother, PhysicsEngine,
    SimulationState, TelemetryBuffer, TelemetrySample, TelemetrySnapshot,
};
use crate::config::SimConfig;
use crate::{event, info, warn};
use chrono::{DateTime, Utc};

/// Everything the simulation mutates, owned by the tick driver.
///
/// There is a single writer: input events and ticks are applied in sequence, so an
/// engine-off reset is always complete before the next tick reads the state.
#[derive(Debug, Clone)]
pub struct SimContext {
    controls: ControlState,
    smoother: InputSmoother,
    physics: PhysicsEngine,
    history: TelemetryBuffer,
    /// Frames rendered since start-up, the time base of visual phases.
    tick_count: u64,
    /// Nominal frame period in seconds.
    frame_period: f64,
    /// Set by an engine-off reset, consumed by the tick driver.
    history_reset: bool,
    last: TelemetrySnapshot,
}

impl SimContext {
    pub fn new(config: &SimConfig) -> Self {
        let physics = PhysicsEngine::new(config.max_altitude());
        let controls = ControlState::new();
        let last = Self::make_snapshot(0, &controls, &physics);
        Self {
            controls,
            smoother: InputSmoother::new(config.smoothing()),
            physics,
            history: TelemetryBuffer::new(config.history_len()),
            tick_count: 0,
            frame_period: 1.0 / config.tick_hz(),
            history_reset: false,
            last,
        }
    }

    pub fn controls(&self) -> &ControlState { &self.controls }
    pub fn state(&self) -> &SimulationState { self.physics.state() }
    pub fn history(&self) -> &TelemetryBuffer { &self.history }
    pub fn tick_count(&self) -> u64 { self.tick_count }
    pub fn last_snapshot(&self) -> &TelemetrySnapshot { &self.last }

    /// Frame-count based time in seconds, independent of the wall clock.
    #[allow(clippy::cast_precision_loss)]
    pub fn frame_time(&self) -> f64 { self.tick_count as f64 * self.frame_period }

    /// Returns whether an engine-off reset happened since the last call.
    pub fn take_history_reset(&mut self) -> bool { std::mem::take(&mut self.history_reset) }

    /// Applies a UI input event.
    pub fn apply(&mut self, ev: ControlEvent, now: DateTime<Utc>) {
        match ev {
            ControlEvent::SetTarget(channel, percent) => self.set_target(channel, percent),
            ControlEvent::SetEngine(on) => self.set_engine(on, now),
            ControlEvent::ToggleEngine => self.set_engine(!self.controls.engine_on(), now),
        }
    }

    pub fn set_target(&mut self, channel: ControlChannel, percent: f64) {
        if self.controls.set_target(channel, percent) {
            event!("{channel} target set to {:.1}%", self.controls.target(channel));
        } else if self.controls.engine_on() {
            warn!("Rejected non-finite {channel} target {percent}");
        } else {
            event!("Ignoring {channel} target {percent} while the engine is off");
        }
    }

    /// Switches the engine.
    ///
    /// On: both targets go to idle and the elapsed-time origin starts if none is running.
    /// Off: targets go to zero and altitude, velocity, time, fuel and the history
    /// are cleared immediately, without easing.
    pub fn set_engine(&mut self, on: bool, now: DateTime<Utc>) {
        let was_on = self.controls.engine_on();
        self.controls.switch_engine(on);
        if on {
            self.physics.start_clock(now);
            if !was_on {
                info!("Engine ON, idling at {}%", ControlState::IDLE_TARGET);
            }
        } else {
            self.physics.reset();
            self.history.clear();
            self.history_reset = true;
            self.last = Self::make_snapshot(self.tick_count, &self.controls, &self.physics);
            if was_on {
                info!("Engine OFF, simulation reset");
            }
        }
    }

    /// Runs one frame: smoothing, physics, classification and the history append.
    ///
    /// `now` is the wall-clock time of the frame; it only feeds elapsed time and fuel
    /// integration. Smoothing advances once per call regardless of `now`.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TelemetrySnapshot {
        self.tick_count += 1;
        let (throttle, mixture) = self.smoother.step(&mut self.controls);
        if self.controls.engine_on() {
            self.physics.step(throttle, mixture, now);
            let chambers = self.physics.chambers();
            self.history.append(TelemetrySample::new(self.physics.state().altitude, chambers.b));
        }
        self.last = Self::make_snapshot(self.tick_count, &self.controls, &self.physics);
        self.last
    }

    fn make_snapshot(tick: u64, controls: &ControlState, physics: &PhysicsEngine) -> TelemetrySnapshot {
        let s = physics.state();
        TelemetrySnapshot {
            tick,
            engine_on: controls.engine_on(),
            throttle: controls.throttle(),
            mixture: controls.mixture(),
            altitude: s.altitude,
            velocity: s.velocity,
            chambers: physics.chambers(),
            mass_air_flow: s.mass_air_flow,
            fuel_flow_rate: s.fuel_flow_rate,
            elapsed_time: s.elapsed_time,
            total_fuel_consumed: s.total_fuel_consumed,
            phase: FlightPhase::classify_within(s.altitude, s.velocity, physics.max_altitude()),
        }
    }
}
