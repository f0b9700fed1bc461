use super::carbsim_messages;
use crate::warn;
use prost::Message;
use std::io::{Cursor, ErrorKind};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::net::tcp::{ReadHalf, WriteHalf};
use tokio::sync::broadcast;
use tokio::sync::oneshot;

#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    Connected,
    Disconnected,
    Message(carbsim_messages::UpstreamContent),
}

/// Length-prefixed protobuf endpoint the front-end connects to.
pub(crate) struct ConsoleEndpoint {
    downstream_sender: broadcast::Sender<Option<Vec<u8>>>,
    upstream_event_receiver: broadcast::Receiver<ConsoleEvent>,
    close_oneshot_sender: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl ConsoleEndpoint {
    /// Upper bound for a single upstream frame.
    const MAX_FRAME_LEN: u32 = 64 * 1024;
    /// Downstream frames buffered per connection before a slow console starts lagging.
    const DOWNSTREAM_BUFFER: usize = 256;

    async fn handle_connection_rx(
        socket: &mut ReadHalf<'_>,
        upstream_event_sender: &broadcast::Sender<ConsoleEvent>,
    ) -> Result<(), std::io::Error> {
        loop {
            let length = socket.read_u32().await?;
            if length > Self::MAX_FRAME_LEN {
                return Err(std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("upstream frame of {length} bytes"),
                ));
            }

            let mut buffer = vec![0u8; length as usize];
            socket.read_exact(&mut buffer).await?;

            if let Ok(carbsim_messages::Upstream { content: Some(content) }) =
                carbsim_messages::Upstream::decode(&mut Cursor::new(buffer))
            {
                let _ = upstream_event_sender.send(ConsoleEvent::Message(content));
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    async fn handle_connection_tx(
        socket: &mut WriteHalf<'_>,
        downstream_receiver: &mut broadcast::Receiver<Option<Vec<u8>>>,
    ) -> Result<(), std::io::Error> {
        loop {
            match downstream_receiver.recv().await {
                Ok(Some(message_buffer)) => {
                    socket.write_u32(message_buffer.len() as u32).await?;
                    socket.write_all(&message_buffer).await?;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Console is lagging behind, dropped {skipped} frames");
                }
                Ok(None) | Err(broadcast::error::RecvError::Closed) => return Ok(()),
            }
        }
    }

    /// Binds `addr` and starts accepting console connections in the background.
    pub(crate) async fn start(addr: SocketAddr) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let downstream_sender = broadcast::Sender::new(Self::DOWNSTREAM_BUFFER);
        let upstream_event_sender = broadcast::Sender::new(64);
        let (close_oneshot_sender, mut close_oneshot_receiver) = oneshot::channel();
        let inst = Self {
            downstream_sender: downstream_sender.clone(),
            upstream_event_receiver: upstream_event_sender.subscribe(),
            close_oneshot_sender: Some(close_oneshot_sender),
            local_addr,
        };

        tokio::spawn(async move {
            loop {
                let accept = tokio::select! {
                    accept = listener.accept() => accept,
                    _ = &mut close_oneshot_receiver => break
                };

                if let Ok((mut socket, _)) = accept {
                    let _ = upstream_event_sender.send(ConsoleEvent::Connected);
                    let upstream_event_sender_local = upstream_event_sender.clone();
                    let mut downstream_receiver = downstream_sender.subscribe();

                    tokio::spawn(async move {
                        let (mut rx_socket, mut tx_socket) = socket.split();

                        let result = tokio::select! {
                            res = ConsoleEndpoint::handle_connection_tx(&mut tx_socket, &mut downstream_receiver) => res,
                            res = ConsoleEndpoint::handle_connection_rx(&mut rx_socket, &upstream_event_sender_local) => res
                        };

                        let _ = upstream_event_sender_local.send(ConsoleEvent::Disconnected);
                        match result {
                            Err(e)
                                if e.kind() == ErrorKind::UnexpectedEof
                                    || e.kind() == ErrorKind::ConnectionReset
                                    || e.kind() == ErrorKind::ConnectionAborted =>
                            {
                                return;
                            }
                            Err(e) => {
                                warn!("Closing connection to console due to {e:?}");
                            }
                            Ok(()) => {}
                        }
                        let _ = socket.shutdown().await;
                    });
                } else {
                    break;
                }
            }
        });
        Ok(inst)
    }

    pub(crate) fn send_downstream(&self, msg: carbsim_messages::DownstreamContent) {
        let _ = self.downstream_sender.send(Some(
            carbsim_messages::Downstream { content: Some(msg) }.encode_to_vec(),
        ));
    }

    pub(crate) fn local_addr(&self) -> SocketAddr { self.local_addr }

    pub(crate) fn is_console_connected(&self) -> bool {
        self.downstream_sender.receiver_count() > 0
    }

    pub(crate) fn upstream_event_receiver(&self) -> &broadcast::Receiver<ConsoleEvent> {
        &self.upstream_event_receiver
    }
}

impl Drop for ConsoleEndpoint {
    fn drop(&mut self) {
        if let Some(close) = self.close_oneshot_sender.take() {
            let _ = close.send(());
        }
        let _ = self.downstream_sender.send(None);
    }
}
