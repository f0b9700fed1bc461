use std::f64::consts::FRAC_PI_2;

/// Scene parameters derived from the smoothed controls, one set per frame.
///
/// Angles are radians relative to the rest pose of each mesh, offsets are scene units.
/// Shader phases advance with frame time, so they follow the display refresh rate
/// the same way the input smoothing does.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualParams {
    pub throttle_lever_rot: f64,
    pub linkage_rot: f64,
    pub connecting_lever_rot: f64,
    pub mixture_lever_rot: f64,
    /// Shared offset of the ball lever and the air diaphragm.
    pub diaphragm_offset: f64,
    pub throttle_flow_speed: f64,
    pub combined_flow_speed: f64,
    pub base_phase: f64,
    pub mixture_phase: f64,
    pub inlet_phase: f64,
}

impl VisualParams {
    const LINKAGE_MAX_DEG: f64 = 15.0;
    const CONNECTING_MAX_DEG: f64 = 8.0;
    const MIXTURE_MAX_DEG: f64 = 30.0;
    const DIAPHRAGM_TRAVEL: f64 = 0.2;

    /// Maps smoothed `throttle`/`mixture` (percent) onto the scene.
    ///
    /// `frame_time` is the frame-count based clock in seconds.
    pub fn derive(throttle: f64, mixture: f64, engine_on: bool, frame_time: f64) -> Self {
        let t = throttle / 100.0;
        let m = mixture / 100.0;
        let (base_speed, mixture_boost) =
            if engine_on { (0.2 + t * 2.8, m * 2.0) } else { (0.0, 0.0) };
        Self {
            throttle_lever_rot: -FRAC_PI_2 * t,
            linkage_rot: -Self::LINKAGE_MAX_DEG.to_radians() * t,
            connecting_lever_rot: Self::CONNECTING_MAX_DEG.to_radians() * t,
            mixture_lever_rot: -Self::MIXTURE_MAX_DEG.to_radians() * m,
            diaphragm_offset: Self::DIAPHRAGM_TRAVEL * t,
            throttle_flow_speed: 0.1 + t * 1.9,
            combined_flow_speed: 0.1 + t * 1.5 + m * 1.5,
            base_phase: frame_time * base_speed,
            mixture_phase: frame_time * (base_speed + mixture_boost),
            inlet_phase: if engine_on { frame_time } else { 0.0 },
        }
    }
}
