use strum_macros::{Display, EnumIter};

/// The two slider-driven inputs of the carburetor.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Display, EnumIter)]
pub enum ControlChannel {
    Throttle,
    Mixture,
}

/// Input events emitted by the UI widgets (sliders and the engine button).
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ControlEvent {
    SetTarget(ControlChannel, f64),
    SetEngine(bool),
    ToggleEngine,
}

/// Current and target control values, all in percent, plus the engine switch.
///
/// Targets are only ever nonzero while the engine is on. The current values are
/// written exclusively by the [`InputSmoother`](super::InputSmoother).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlState {
    throttle: f64,
    mixture: f64,
    target_throttle: f64,
    target_mixture: f64,
    engine_on: bool,
}

impl ControlState {
    /// Target both channels jump to when the engine is switched on.
    pub const IDLE_TARGET: f64 = 10.0;
    pub const MIN_PERCENT: f64 = 0.0;
    pub const MAX_PERCENT: f64 = 100.0;

    pub fn new() -> Self { Self::default() }

    pub fn throttle(&self) -> f64 { self.throttle }
    pub fn mixture(&self) -> f64 { self.mixture }
    pub fn target_throttle(&self) -> f64 { self.target_throttle }
    pub fn target_mixture(&self) -> f64 { self.target_mixture }
    pub fn engine_on(&self) -> bool { self.engine_on }

    pub fn current(&self, channel: ControlChannel) -> f64 {
        match channel {
            ControlChannel::Throttle => self.throttle,
            ControlChannel::Mixture => self.mixture,
        }
    }

    pub fn target(&self, channel: ControlChannel) -> f64 {
        match channel {
            ControlChannel::Throttle => self.target_throttle,
            ControlChannel::Mixture => self.target_mixture,
        }
    }

    /// Stores a new target for `channel`, clamped to `[0, 100]`.
    ///
    /// # Returns
    /// `false` if the value was rejected: the engine is off or `percent` is not finite.
    pub fn set_target(&mut self, channel: ControlChannel, percent: f64) -> bool {
        if !self.engine_on || !percent.is_finite() {
            return false;
        }
        let clamped = percent.clamp(Self::MIN_PERCENT, Self::MAX_PERCENT);
        match channel {
            ControlChannel::Throttle => self.target_throttle = clamped,
            ControlChannel::Mixture => self.target_mixture = clamped,
        }
        true
    }

    /// Flips the engine switch and moves both targets to idle (on) or zero (off).
    ///
    /// The current values are left untouched, they ease towards the new targets.
    pub(super) fn switch_engine(&mut self, on: bool) {
        self.engine_on = on;
        let target = if on { Self::IDLE_TARGET } else { Self::MIN_PERCENT };
        self.target_throttle = target;
        self.target_mixture = target;
    }

    pub(super) fn set_current(&mut self, throttle: f64, mixture: f64) {
        self.throttle = throttle;
        self.mixture = mixture;
    }
}
