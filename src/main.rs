#![allow(dead_code, clippy::similar_names)]
#![warn(clippy::shadow_reuse, clippy::shadow_same, clippy::builtin_type_shadow)]
mod config;
mod console_communication;
mod logger;
mod render_feed;
mod sim_control;
mod telemetry_sink;
mod tick_driver;

use crate::config::SimConfig;
use crate::console_communication::ConsoleMessenger;
use crate::sim_control::ControlEvent;
use crate::telemetry_sink::{FanoutSink, PanelSink};
use crate::tick_driver::TickDriver;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    let config = SimConfig::from_env().unwrap_or_else(|e| fatal!("Invalid configuration: {e}"));
    info!(
        "Starting carbsim at {} Hz, ceiling {} m, history of {} samples",
        config.tick_hz(),
        config.max_altitude(),
        config.history_len()
    );

    let (control_tx, control_rx) = mpsc::unbounded_channel();
    let console = ConsoleMessenger::start(config.console_addr(), control_tx.clone())
        .await
        .unwrap_or_else(|e| fatal!("Console endpoint on {} failed: {e}", config.console_addr()));

    let sink = FanoutSink::new().with(console).with(PanelSink::new(config.panel_log_interval()));
    let driver = TickDriver::new(&config, control_rx, sink);

    if config.autostart() {
        request_autostart(&control_tx);
    }

    let c_tok = CancellationToken::new();
    let c_tok_signal = c_tok.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {e}");
            return;
        }
        info!("Shutdown requested");
        c_tok_signal.cancel();
    });

    let context = driver.run(c_tok).await;
    let last = context.last_snapshot();
    info!(
        "Exiting after {} ticks, {:.4} kg fuel burned over {}",
        context.tick_count(),
        last.total_fuel_consumed,
        last.elapsed_mm_ss()
    );
    drop(control_tx);
}

/// Queues an engine start ahead of the first tick.
fn request_autostart(control_tx: &UnboundedSender<ControlEvent>) -> bool {
    info!("Autostart requested");
    if let Err(e) = control_tx.send(ControlEvent::SetEngine(true)) {
        warn!("Autostart could not reach the tick driver: {e}");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autostart_reports_closed_driver() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(request_autostart(&tx));
        assert_eq!(rx.try_recv().unwrap(), ControlEvent::SetEngine(true));
        drop(rx);
        assert!(!request_autostart(&tx));
    }
}
