use crate::error::TransportError;
use crate::queue::TransportSink;
use crate::transport::{SignalingTransport, TransportConnector, TransportEvent};
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use mirage_core::SocketState;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

const CLOSE_GRACE: Duration = Duration::from_secs(2);

/// Dials WebSocket transports with `tokio-tungstenite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl WsConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TransportConnector for WsConnector {
    async fn open(
        &self,
        url: &str,
        sink: TransportSink,
    ) -> Result<Box<dyn SignalingTransport>, TransportError> {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(SocketState::Connecting));

        let task = tokio::spawn(run_socket(url.to_owned(), out_rx, sink, state.clone()));

        Ok(Box::new(WsTransport {
            outbound: Mutex::new(Some(out_tx)),
            state,
            task: Mutex::new(Some(task)),
        }))
    }
}

/// WebSocket signaling transport. Frames are written by a dedicated task fed
/// through an unbounded channel, so `send_text` never blocks.
pub struct WsTransport {
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    state: Arc<Mutex<SocketState>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

#[async_trait]
impl SignalingTransport for WsTransport {
    fn send_text(&self, payload: String) -> Result<(), TransportError> {
        if !self.is_open() {
            return Err(TransportError::NotOpen);
        }
        let outbound = lock(&self.outbound);
        let Some(tx) = outbound.as_ref() else {
            return Err(TransportError::NotOpen);
        };
        tx.send(Message::Text(payload.into()))
            .map_err(|_| TransportError::NotOpen)
    }

    async fn close(&self) {
        let sender = lock(&self.outbound).take();
        let Some(sender) = sender else {
            return;
        };

        {
            let mut state = lock(&self.state);
            if *state != SocketState::Closed {
                *state = SocketState::Closing;
            }
        }

        let _ = sender.send(Message::Close(None));
        drop(sender);

        let task = lock(&self.task).take();
        if let Some(mut task) = task {
            if tokio::time::timeout(CLOSE_GRACE, &mut task).await.is_err() {
                warn!("Signaling socket did not close within {:?}, aborting", CLOSE_GRACE);
                task.abort();
            }
        }

        *lock(&self.state) = SocketState::Closed;
        debug!("Signaling socket released");
    }

    fn state(&self) -> SocketState {
        *lock(&self.state)
    }
}

async fn run_socket(
    url: String,
    mut out_rx: mpsc::UnboundedReceiver<Message>,
    sink: TransportSink,
    state: Arc<Mutex<SocketState>>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            warn!("Signaling socket to {} failed: {}", url, e);
            *lock(&state) = SocketState::Closed;
            sink.send(TransportEvent::Error(e.to_string()));
            sink.send(TransportEvent::Closed { reason: None });
            return;
        }
    };

    info!("Signaling socket open: {}", url);
    *lock(&state) = SocketState::Open;
    sink.send(TransportEvent::Opened);

    let (mut writer, mut reader) = stream.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let is_close = matches!(msg, Message::Close(_));
            if writer.send(msg).await.is_err() || is_close {
                break;
            }
        }
        let _ = writer.close().await;
    });

    let recv_sink = sink.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = reader.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    recv_sink.send(TransportEvent::Message(text.as_str().to_owned()));
                }
                Ok(Message::Close(frame)) => {
                    return frame.map(|f| f.reason.as_str().to_owned());
                }
                Ok(_) => {}
                Err(e) => {
                    recv_sink.send(TransportEvent::Error(e.to_string()));
                    return None;
                }
            }
        }
        None
    });

    let reason = tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            None
        }
        res = (&mut recv_task) => {
            send_task.abort();
            res.ok().flatten()
        }
    };

    *lock(&state) = SocketState::Closed;
    info!("Signaling socket closed: {}", url);
    sink.send(TransportEvent::Closed { reason });
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
