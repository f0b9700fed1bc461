use super::carbsim_messages::{self, DownstreamContent, UpstreamContent};
use super::console_endpoint::{ConsoleEndpoint, ConsoleEvent};
use crate::sim_control::ControlEvent;
use crate::telemetry_sink::{TelemetrySink, TickFrame};
use crate::{event, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast::error::RecvError, mpsc::UnboundedSender};

/// Bridges the console endpoint and the tick driver.
///
/// Upstream control messages become [`ControlEvent`]s on the driver's channel,
/// every published frame is streamed downstream while a console is connected.
pub(crate) struct ConsoleMessenger {
    endpoint: Arc<ConsoleEndpoint>,
}

impl ConsoleMessenger {
    pub(crate) async fn start(
        addr: SocketAddr,
        control_tx: UnboundedSender<ControlEvent>,
    ) -> Result<Self, std::io::Error> {
        let endpoint = Arc::new(ConsoleEndpoint::start(addr).await?);
        let mut receiver = endpoint.upstream_event_receiver().resubscribe();
        let endpoint_local = Arc::clone(&endpoint);

        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(ConsoleEvent::Connected) => info!("Console connected"),
                    Ok(ConsoleEvent::Disconnected) => info!("Console disconnected"),
                    Ok(ConsoleEvent::Message(UpstreamContent::Ping(ping))) => {
                        endpoint_local.send_downstream(DownstreamContent::Pong(
                            carbsim_messages::Pong { echo: ping.echo },
                        ));
                    }
                    Ok(ConsoleEvent::Message(content)) => {
                        let Some(ev) = content.to_control_event() else {
                            warn!("Dropping malformed console input");
                            continue;
                        };
                        event!("Console input {ev:?}");
                        if control_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Dropped {skipped} console messages");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        info!("Console endpoint listening on {}", endpoint.local_addr());
        Ok(Self { endpoint })
    }

    pub(crate) fn is_console_connected(&self) -> bool { self.endpoint.is_console_connected() }

    pub(crate) fn local_addr(&self) -> SocketAddr { self.endpoint.local_addr() }
}

impl TelemetrySink for ConsoleMessenger {
    fn publish(&mut self, frame: &TickFrame<'_>) {
        if !self.endpoint.is_console_connected() {
            return;
        }
        for msg in downstream_for(frame) {
            self.endpoint.send_downstream(msg);
        }
    }
}

/// Downstream messages for one tick, in send order.
pub(crate) fn downstream_for(frame: &TickFrame<'_>) -> Vec<DownstreamContent> {
    let mut out = Vec::with_capacity(4);
    if frame.history_reset {
        out.push(DownstreamContent::HistoryReset(carbsim_messages::HistoryReset {}));
    }
    out.push(DownstreamContent::Telemetry(carbsim_messages::Telemetry::from_snapshot(
        frame.snapshot,
    )));
    if frame.snapshot.engine_on {
        if let Some(sample) = frame.history.back() {
            out.push(DownstreamContent::ChartSample((*sample).into()));
        }
    }
    out.push(DownstreamContent::Scene(frame.visuals.into()));
    out
}
