use crate::sim_control::PhysicsEngine;
use std::{env, fmt, net::SocketAddr, ops::RangeInclusive, str::FromStr, time::Duration};

/// Runtime configuration of the simulation service.
///
/// Every field has a default matching the interactive front-end and can be
/// overridden through a `CARBSIM_*` environment variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimConfig {
    /// Display refresh rate emulated by the tick driver.
    tick_hz: f64,
    /// Address the console endpoint listens on.
    console_addr: SocketAddr,
    /// Ceiling of the simulated flight profile in meters.
    max_altitude: f64,
    /// Capacity of the telemetry history feeding the chart.
    history_len: usize,
    /// Per-tick blend factor of the input smoother.
    smoothing: f64,
    /// Number of ticks between two panel dumps, `0` disables them.
    panel_log_interval: u64,
    /// Switch the engine on right after start-up.
    autostart: bool,
}

#[derive(Debug)]
pub enum ConfigError {
    Unparsable(&'static str, String),
    OutOfRange(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unparsable(key, why) => write!(f, "{key} could not be parsed: {why}"),
            ConfigError::OutOfRange(key, val) => write!(f, "{key} is out of range: {val}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_hz: Self::DEF_TICK_HZ,
            console_addr: SocketAddr::from(([0, 0, 0, 0], 1337)),
            max_altitude: Self::DEF_MAX_ALTITUDE,
            history_len: Self::DEF_HISTORY_LEN,
            smoothing: Self::DEF_SMOOTHING,
            panel_log_interval: Self::DEF_PANEL_LOG_INTERVAL,
            autostart: false,
        }
    }
}

impl SimConfig {
    pub const DEF_TICK_HZ: f64 = 60.0;
    pub const DEF_MAX_ALTITUDE: f64 = 5000.0;
    pub const DEF_HISTORY_LEN: usize = 100;
    pub const DEF_SMOOTHING: f64 = 0.05;
    pub const DEF_PANEL_LOG_INTERVAL: u64 = 60;
    /// Accepted tick rates in Hz.
    pub const TICK_HZ_RANGE: RangeInclusive<f64> = 1.0..=1000.0;

    const ENV_TICK_HZ: &'static str = "CARBSIM_TICK_HZ";
    const ENV_CONSOLE_ADDR: &'static str = "CARBSIM_CONSOLE_ADDR";
    const ENV_MAX_ALTITUDE: &'static str = "CARBSIM_MAX_ALTITUDE";
    const ENV_HISTORY_LEN: &'static str = "CARBSIM_HISTORY_LEN";
    const ENV_SMOOTHING: &'static str = "CARBSIM_SMOOTHING";
    const ENV_PANEL_LOG_INTERVAL: &'static str = "CARBSIM_PANEL_LOG_INTERVAL";
    const ENV_AUTOSTART: &'static str = "CARBSIM_AUTOSTART";

    /// Builds a configuration from the process environment.
    ///
    /// # Returns
    /// - The default configuration with every set variable applied.
    /// - A [`ConfigError`] naming the first variable that is malformed or out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SimConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where F: Fn(&str) -> Option<String> {
        let mut cfg = Self::default();
        if let Some(hz) = parse_var::<f64, _>(&lookup, Self::ENV_TICK_HZ)? {
            if !Self::TICK_HZ_RANGE.contains(&hz) {
                return Err(ConfigError::OutOfRange(Self::ENV_TICK_HZ, hz.to_string()));
            }
            cfg.tick_hz = hz;
        }
        if let Some(addr) = parse_var::<SocketAddr, _>(&lookup, Self::ENV_CONSOLE_ADDR)? {
            cfg.console_addr = addr;
        }
        if let Some(alt) = parse_var::<f64, _>(&lookup, Self::ENV_MAX_ALTITUDE)? {
            if !(alt > 0.0 && alt <= PhysicsEngine::DENSITY_CEILING) {
                return Err(ConfigError::OutOfRange(Self::ENV_MAX_ALTITUDE, alt.to_string()));
            }
            cfg.max_altitude = alt;
        }
        if let Some(len) = parse_var::<usize, _>(&lookup, Self::ENV_HISTORY_LEN)? {
            if len == 0 {
                return Err(ConfigError::OutOfRange(Self::ENV_HISTORY_LEN, len.to_string()));
            }
            cfg.history_len = len;
        }
        if let Some(k) = parse_var::<f64, _>(&lookup, Self::ENV_SMOOTHING)? {
            if !(k > 0.0 && k <= 1.0) {
                return Err(ConfigError::OutOfRange(Self::ENV_SMOOTHING, k.to_string()));
            }
            cfg.smoothing = k;
        }
        if let Some(n) = parse_var::<u64, _>(&lookup, Self::ENV_PANEL_LOG_INTERVAL)? {
            cfg.panel_log_interval = n;
        }
        cfg.autostart = lookup(Self::ENV_AUTOSTART).is_some();
        Ok(cfg)
    }

    pub fn tick_hz(&self) -> f64 { self.tick_hz }
    pub fn console_addr(&self) -> SocketAddr { self.console_addr }
    pub fn max_altitude(&self) -> f64 { self.max_altitude }
    pub fn history_len(&self) -> usize { self.history_len }
    pub fn smoothing(&self) -> f64 { self.smoothing }
    pub fn panel_log_interval(&self) -> u64 { self.panel_log_interval }
    pub fn autostart(&self) -> bool { self.autostart }

    /// Wall-clock period of one emulated display refresh.
    pub fn tick_period(&self) -> Duration { Duration::from_secs_f64(1.0 / self.tick_hz) }

    pub fn with_history_len(mut self, history_len: usize) -> Self {
        self.history_len = history_len;
        self
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Unparsable(key, e.to_string())),
    }
}
