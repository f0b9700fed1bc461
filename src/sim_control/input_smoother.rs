use super::ControlState;

/// Eases the current throttle and mixture towards their targets.
///
/// Each call to [`InputSmoother::step`] applies `value += (target - value) * k` once.
/// The blend factor is applied per tick, not per second: the easing speed follows the
/// display refresh rate. Only fuel integration and elapsed time use wall-clock deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSmoother {
    blend: f64,
}

impl Default for InputSmoother {
    fn default() -> Self { Self { blend: Self::DEF_BLEND } }
}

impl InputSmoother {
    pub const DEF_BLEND: f64 = 0.05;

    /// Creates a smoother with blend factor `blend`, which must lie in `(0, 1]`.
    pub fn new(blend: f64) -> Self {
        debug_assert!(blend > 0.0 && blend <= 1.0);
        Self { blend }
    }

    /// One easing step of `value` towards `target`. Never overshoots for `k <= 1`.
    pub fn ease(&self, value: f64, target: f64) -> f64 { value + (target - value) * self.blend }

    /// Advances both channels of `controls` by one tick.
    ///
    /// # Returns
    /// The smoothed `(throttle, mixture)` pair.
    pub fn step(&self, controls: &mut ControlState) -> (f64, f64) {
        let throttle = self.ease(controls.throttle(), controls.target_throttle());
        let mixture = self.ease(controls.mixture(), controls.target_mixture());
        controls.set_current(throttle, mixture);
        (throttle, mixture)
    }
}
