use crate::sim_control::TelemetryBuffer;
use itertools::{Itertools, MinMaxResult};

/// A chart point in unit coordinates: `x` runs from the oldest to the newest sample,
/// `y` from the lowest to the highest pressure in view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// Normalised "impact pressure vs height" plot for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    points: Vec<ChartPoint>,
    altitude_range: (f64, f64),
    pressure_range: (f64, f64),
    latest_altitude: f64,
    latest_pressure: f64,
}

impl ChartFrame {
    /// Builds the plot from the telemetry history.
    ///
    /// # Returns
    /// `None` with fewer than two samples, the renderer then draws nothing.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_history(history: &TelemetryBuffer) -> Option<Self> {
        if history.len() < 2 {
            return None;
        }
        let altitude_range = bounds(history.iter().map(|s| s.altitude))?;
        let pressure_range = bounds(history.iter().map(|s| s.pressure))?;
        let p_span = span(pressure_range);
        let last_i = (history.len() - 1) as f64;
        let points = history
            .iter()
            .enumerate()
            .map(|(i, s)| ChartPoint {
                x: i as f64 / last_i,
                y: (s.pressure - pressure_range.0) / p_span,
            })
            .collect();
        let latest = history.back()?;
        Some(Self {
            points,
            altitude_range,
            pressure_range,
            latest_altitude: latest.altitude,
            latest_pressure: latest.pressure,
        })
    }

    pub fn points(&self) -> &[ChartPoint] { &self.points }

    /// The newest point, drawn as the marker.
    pub fn marker(&self) -> Option<&ChartPoint> { self.points.last() }

    pub fn altitude_range(&self) -> (f64, f64) { self.altitude_range }
    pub fn pressure_range(&self) -> (f64, f64) { self.pressure_range }

    /// Altitude span with a flat history mapped to 1.
    pub fn altitude_span(&self) -> f64 { span(self.altitude_range) }

    /// Pressure span with a flat history mapped to 1.
    pub fn pressure_span(&self) -> f64 { span(self.pressure_range) }

    pub fn latest_altitude(&self) -> f64 { self.latest_altitude }
    pub fn latest_pressure(&self) -> f64 { self.latest_pressure }
}

fn bounds<I: Iterator<Item = f64>>(values: I) -> Option<(f64, f64)> {
    match values.minmax_by(f64::total_cmp) {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(lo, hi) => Some((lo, hi)),
    }
}

#[allow(clippy::float_cmp)]
fn span((lo, hi): (f64, f64)) -> f64 {
    let d = hi - lo;
    if d == 0.0 { 1.0 } else { d }
}
