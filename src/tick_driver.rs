use crate::config::SimConfig;
use crate::render_feed::VisualParams;
use crate::sim_control::{ControlEvent, SimContext, TelemetrySnapshot};
use crate::telemetry_sink::{TelemetrySink, TickFrame};
use crate::{info, warn};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

/// Owns the [`SimContext`] and advances it once per emulated display refresh.
///
/// Per tick: drain pending input events, run the simulation, publish the frame.
pub struct TickDriver<S: TelemetrySink> {
    context: SimContext,
    control_rx: UnboundedReceiver<ControlEvent>,
    sink: S,
    period: Duration,
    inputs_closed: bool,
}

impl<S: TelemetrySink> TickDriver<S> {
    pub fn new(config: &SimConfig, control_rx: UnboundedReceiver<ControlEvent>, sink: S) -> Self {
        Self {
            context: SimContext::new(config),
            control_rx,
            sink,
            period: config.tick_period(),
            inputs_closed: false,
        }
    }

    pub fn context(&self) -> &SimContext { &self.context }
    pub fn sink(&self) -> &S { &self.sink }

    /// Ticks until `c_tok` is cancelled.
    ///
    /// # Returns
    /// The simulation context as it was after the last tick.
    pub async fn run(mut self, c_tok: CancellationToken) -> SimContext {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!("Tick driver running every {:?}", self.period);
        loop {
            tokio::select! {
                () = c_tok.cancelled() => break,
                _ = ticker.tick() => {
                    self.tick_once(Utc::now());
                }
            }
        }
        info!("Tick driver stopped after {} ticks", self.context.tick_count());
        self.context
    }

    /// Runs a single frame at wall-clock time `now`.
    pub fn tick_once(&mut self, now: DateTime<Utc>) -> TelemetrySnapshot {
        self.drain_inputs(now);
        let snapshot = self.context.tick(now);
        let visuals = VisualParams::derive(
            snapshot.throttle,
            snapshot.mixture,
            snapshot.engine_on,
            self.context.frame_time(),
        );
        let history_reset = self.context.take_history_reset();
        self.sink.publish(&TickFrame {
            snapshot: &snapshot,
            history: self.context.history(),
            visuals: &visuals,
            history_reset,
        });
        snapshot
    }

    fn drain_inputs(&mut self, now: DateTime<Utc>) {
        if self.inputs_closed {
            return;
        }
        loop {
            match self.control_rx.try_recv() {
                Ok(ev) => self.context.apply(ev, now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!("All input sources are gone, controls stay as they are");
                    self.inputs_closed = true;
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim_control::{ControlChannel, FlightPhase};
    use chrono::TimeDelta;
    use tokio::sync::mpsc;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<(TelemetrySnapshot, usize, bool)>,
    }

    impl TelemetrySink for RecordingSink {
        fn publish(&mut self, frame: &TickFrame<'_>) {
            self.frames.push((*frame.snapshot, frame.history.len(), frame.history_reset));
        }
    }

    fn t0() -> DateTime<Utc> { DateTime::from_timestamp(1_700_000_000, 0).unwrap() }

    #[test]
    fn test_inputs_applied_before_tick() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut driver = TickDriver::new(&SimConfig::default(), rx, RecordingSink::default());
        tx.send(ControlEvent::SetEngine(true)).unwrap();
        tx.send(ControlEvent::SetTarget(ControlChannel::Throttle, 100.0)).unwrap();
        let mut now = t0();
        let snap = driver.tick_once(now);
        assert!(snap.engine_on);
        assert!((snap.throttle - 5.0).abs() < 1e-9);
        for _ in 0..200 {
            now += TimeDelta::milliseconds(16);
            driver.tick_once(now);
        }
        let (last, history_len, _) = *driver.sink().frames.last().unwrap();
        assert!(last.altitude > 0.0);
        assert_eq!(history_len, 100);

        tx.send(ControlEvent::ToggleEngine).unwrap();
        let off = driver.tick_once(now + TimeDelta::milliseconds(16));
        let (_, history_len, reset) = *driver.sink().frames.last().unwrap();
        assert!(!off.engine_on);
        assert_eq!(off.phase, FlightPhase::GroundIdle);
        assert!(off.altitude.abs() < 1e-9 && off.total_fuel_consumed.abs() < 1e-9);
        assert_eq!(history_len, 0);
        assert!(reset);
        assert_eq!(driver.sink().frames.len(), 202);
    }

    #[test]
    fn test_closed_inputs_keep_ticking() {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut driver = TickDriver::new(&SimConfig::default(), rx, RecordingSink::default());
        tx.send(ControlEvent::SetEngine(true)).unwrap();
        drop(tx);
        driver.tick_once(t0());
        let snap = driver.tick_once(t0() + TimeDelta::seconds(1));
        assert!(snap.engine_on);
        assert_eq!(driver.context().tick_count(), 2);
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let (tx, rx) = mpsc::unbounded_channel();
        let driver = TickDriver::new(&SimConfig::default(), rx, RecordingSink::default());
        tx.send(ControlEvent::SetEngine(true)).unwrap();
        let c_tok = CancellationToken::new();
        let handle = tokio::spawn(driver.run(c_tok.clone()));
        tokio::time::sleep(Duration::from_millis(100)).await;
        c_tok.cancel();
        let context = handle.await.unwrap();
        assert!(context.tick_count() >= 1);
        assert!(context.controls().engine_on());
    }
}
