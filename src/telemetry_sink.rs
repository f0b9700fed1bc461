use crate::panel;
use crate::render_feed::{ChartFrame, VisualParams};
use crate::sim_control::{TelemetryBuffer, TelemetrySnapshot};

/// Everything the outside world gets to see of one tick.
#[derive(Debug, Clone, Copy)]
pub struct TickFrame<'a> {
    pub snapshot: &'a TelemetrySnapshot,
    pub history: &'a TelemetryBuffer,
    pub visuals: &'a VisualParams,
    /// The history was cleared by an engine-off since the previous frame.
    pub history_reset: bool,
}

/// Consumer of per-tick telemetry: panel, chart, 3D scene.
///
/// Called once per tick by the tick driver, after the simulation state is final.
/// Implementations must not block.
pub trait TelemetrySink {
    fn publish(&mut self, frame: &TickFrame<'_>);
}

/// Logs the simulation panel every `interval` ticks.
pub struct PanelSink {
    interval: u64,
}

impl PanelSink {
    pub fn new(interval: u64) -> Self { Self { interval } }
}

impl TelemetrySink for PanelSink {
    fn publish(&mut self, frame: &TickFrame<'_>) {
        if self.interval == 0 || frame.snapshot.tick % self.interval != 0 {
            return;
        }
        if !frame.snapshot.engine_on {
            return;
        }
        let chart = chart_summary(frame.history);
        panel!(
            "T {}% M {}% | history {}/{} | {chart}\n{}",
            frame.snapshot.throttle_percent(),
            frame.snapshot.mixture_percent(),
            frame.history.len(),
            frame.history.size(),
            frame.snapshot
        );
    }
}

/// One-line summary of the chart the history would currently draw.
fn chart_summary(history: &TelemetryBuffer) -> String {
    let Some(chart) = ChartFrame::from_history(history) else {
        return String::from("chart pending");
    };
    let (p_lo, p_hi) = chart.pressure_range();
    let (h_lo, h_hi) = chart.altitude_range();
    let level = chart.marker().map_or(0.0, |p| p.y * 100.0);
    format!("chart {p_lo:.3}..{p_hi:.3} kPa over {h_lo:.0}..{h_hi:.0} m, now at {level:.0}%")
}

/// Publishes to every inner sink in insertion order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn TelemetrySink + Send>>,
}

impl FanoutSink {
    pub fn new() -> Self { Self::default() }

    pub fn with(mut self, sink: impl TelemetrySink + Send + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize { self.sinks.len() }

    pub fn is_empty(&self) -> bool { self.sinks.is_empty() }
}

impl TelemetrySink for FanoutSink {
    fn publish(&mut self, frame: &TickFrame<'_>) {
        for sink in &mut self.sinks {
            sink.publish(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::sim_control::{ControlEvent, SimContext, TelemetrySample};
    use chrono::{DateTime, TimeDelta};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct CountingSink(Arc<AtomicU64>);

    impl TelemetrySink for CountingSink {
        fn publish(&mut self, frame: &TickFrame<'_>) {
            self.0.store(frame.snapshot.tick, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let first = Arc::new(AtomicU64::new(0));
        let second = Arc::new(AtomicU64::new(0));
        let mut fanout = FanoutSink::new()
            .with(CountingSink(Arc::clone(&first)))
            .with(PanelSink::new(1))
            .with(CountingSink(Arc::clone(&second)));
        assert_eq!(fanout.len(), 3);
        assert!(!fanout.is_empty());

        let mut ctx = SimContext::new(&SimConfig::default());
        let mut now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        ctx.apply(ControlEvent::SetEngine(true), now);
        for _ in 0..3 {
            now += TimeDelta::milliseconds(16);
            let snapshot = ctx.tick(now);
            let visuals = VisualParams::derive(snapshot.throttle, snapshot.mixture, true, ctx.frame_time());
            fanout.publish(&TickFrame {
                snapshot: &snapshot,
                history: ctx.history(),
                visuals: &visuals,
                history_reset: false,
            });
        }
        assert_eq!(first.load(Ordering::SeqCst), 3);
        assert_eq!(second.load(Ordering::SeqCst), 3);
        assert!(FanoutSink::new().is_empty());
    }

    #[test]
    fn test_chart_summary_reports_marker_level() {
        let mut history = TelemetryBuffer::new(10);
        assert_eq!(chart_summary(&history), "chart pending");
        history.append(TelemetrySample::new(0.0, 10.0));
        history.append(TelemetrySample::new(4.0, 20.0));
        history.append(TelemetrySample::new(8.0, 15.0));
        assert_eq!(
            chart_summary(&history),
            "chart 10.000..20.000 kPa over 0..8 m, now at 50%"
        );
    }
}
