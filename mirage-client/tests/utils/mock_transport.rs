use async_trait::async_trait;
use mirage_client::{SignalingTransport, TransportConnector, TransportError, TransportEvent, TransportSink};
use mirage_core::SocketState;
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockTransportState {
    /// Every frame sent, across all attempts.
    sent: Vec<String>,
    urls: Vec<String>,
    sink: Option<TransportSink>,
    open: bool,
    close_calls: usize,
    /// Report `Opened` from inside `open`.
    auto_open: bool,
    fail_open: bool,
}

/// Mock TransportConnector that records outgoing frames and lets tests play the service.
#[derive(Clone)]
pub struct MockTransportConnector {
    inner: Arc<Mutex<MockTransportState>>,
}

impl MockTransportConnector {
    /// Sockets open as soon as they are dialed.
    pub fn new() -> Self {
        Self::with_state(MockTransportState {
            auto_open: true,
            ..Default::default()
        })
    }

    /// Sockets stay in `Connecting` until the test calls [`Self::open_socket`].
    pub fn manual() -> Self {
        Self::with_state(MockTransportState::default())
    }

    /// `open` itself fails.
    pub fn failing() -> Self {
        Self::with_state(MockTransportState {
            fail_open: true,
            ..Default::default()
        })
    }

    fn with_state(state: MockTransportState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.inner.lock().unwrap().sent.clone()
    }

    pub fn sent_json(&self) -> Vec<Value> {
        self.sent()
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("sent frame is JSON"))
            .collect()
    }

    /// Sent frames whose `type` is `kind`.
    pub fn sent_of_type(&self, kind: &str) -> Vec<Value> {
        self.sent_json()
            .into_iter()
            .filter(|frame| frame["type"] == kind)
            .collect()
    }

    pub fn urls(&self) -> Vec<String> {
        self.inner.lock().unwrap().urls.clone()
    }

    pub fn close_calls(&self) -> usize {
        self.inner.lock().unwrap().close_calls
    }

    /// Sink of the most recently dialed socket.
    pub fn current_sink(&self) -> TransportSink {
        self.inner
            .lock()
            .unwrap()
            .sink
            .clone()
            .expect("no socket dialed yet")
    }

    pub fn open_socket(&self) {
        let sink = {
            let mut state = self.inner.lock().unwrap();
            state.open = true;
            state.sink.clone().expect("no socket dialed yet")
        };
        sink.send(TransportEvent::Opened);
    }

    /// Deliver one text frame from the service.
    pub fn deliver(&self, text: impl Into<String>) {
        self.current_sink().send(TransportEvent::Message(text.into()));
    }

    pub fn fail_dial(&self, error: &str) {
        let sink = self.current_sink();
        sink.send(TransportEvent::Error(error.to_owned()));
        sink.send(TransportEvent::Closed { reason: None });
    }

    pub fn close_from_remote(&self) {
        let sink = {
            let mut state = self.inner.lock().unwrap();
            state.open = false;
            state.sink.clone().expect("no socket dialed yet")
        };
        sink.send(TransportEvent::Closed {
            reason: Some("going away".to_owned()),
        });
    }
}

#[async_trait]
impl TransportConnector for MockTransportConnector {
    async fn open(
        &self,
        url: &str,
        sink: TransportSink,
    ) -> Result<Box<dyn SignalingTransport>, TransportError> {
        let auto_open = {
            let mut state = self.inner.lock().unwrap();
            state.urls.push(url.to_owned());
            if state.fail_open {
                return Err(TransportError::Connect("connection refused".to_owned()));
            }
            state.sink = Some(sink.clone());
            state.open = state.auto_open;
            state.auto_open
        };
        tracing::debug!("[MockTransport] dialed {}", url);

        if auto_open {
            sink.send(TransportEvent::Opened);
        }
        Ok(Box::new(MockTransport {
            inner: self.inner.clone(),
        }))
    }
}

struct MockTransport {
    inner: Arc<Mutex<MockTransportState>>,
}

#[async_trait]
impl SignalingTransport for MockTransport {
    fn send_text(&self, payload: String) -> Result<(), TransportError> {
        let mut state = self.inner.lock().unwrap();
        if !state.open {
            return Err(TransportError::NotOpen);
        }
        tracing::debug!("[MockTransport] send {}", payload);
        state.sent.push(payload);
        Ok(())
    }

    async fn close(&self) {
        let mut state = self.inner.lock().unwrap();
        state.open = false;
        state.close_calls += 1;
    }

    fn state(&self) -> SocketState {
        if self.inner.lock().unwrap().open {
            SocketState::Open
        } else {
            SocketState::Closed
        }
    }
}
