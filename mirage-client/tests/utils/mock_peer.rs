use anyhow::{Result, bail};
use async_trait::async_trait;
use mirage_client::{PeerBackend, PeerConnector, PeerEvent, PeerSettings, PeerSink, PolicyOutcome};
use mirage_core::{IceCandidate, IceConnectionState, VideoSenderPolicy};
use std::sync::{Arc, Mutex};
use webrtc::track::track_local::TrackLocal;

/// Offer returned by every mock peer, before the video policy is applied.
pub const MOCK_OFFER: &str = "v=0\r\n\
o=- 4611731400430051336 2 IN IP4 127.0.0.1\r\n\
s=-\r\n\
t=0 0\r\n\
m=video 9 UDP/TLS/RTP/SAVPF 96 98\r\n\
c=IN IP4 0.0.0.0\r\n\
a=mid:0\r\n\
a=rtpmap:96 VP8/90000\r\n\
a=rtpmap:98 VP9/90000\r\n";

#[derive(Debug, Clone, PartialEq)]
pub enum PeerCall {
    Connect {
        stun_server: Option<String>,
        ice_candidate_pool_size: u8,
    },
    AddVideoTrack,
    AddReceiveOnlyVideo,
    ApplyVideoPolicy,
    CreateOffer,
    SetLocalOffer(String),
    SetRemoteAnswer(String),
    AddIceCandidate(IceCandidate),
    Close,
}

struct MockPeerState {
    calls: Vec<PeerCall>,
    sink: Option<PeerSink>,
    policy_outcome: PolicyOutcome,
    fail_answer: bool,
}

/// Mock PeerConnector that records every engine call and lets tests raise engine events.
#[derive(Clone)]
pub struct MockPeerConnector {
    inner: Arc<Mutex<MockPeerState>>,
}

impl MockPeerConnector {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockPeerState {
                calls: Vec::new(),
                sink: None,
                policy_outcome: PolicyOutcome::Applied,
                fail_answer: false,
            })),
        }
    }

    pub fn with_policy_outcome(self, outcome: PolicyOutcome) -> Self {
        self.inner.lock().unwrap().policy_outcome = outcome;
        self
    }

    pub fn failing_answer(self) -> Self {
        self.inner.lock().unwrap().fail_answer = true;
        self
    }

    pub fn calls(&self) -> Vec<PeerCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn count(&self, call: &PeerCall) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn remote_candidates(&self) -> Vec<IceCandidate> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PeerCall::AddIceCandidate(candidate) => Some(candidate),
                _ => None,
            })
            .collect()
    }

    pub fn local_offer(&self) -> Option<String> {
        self.calls().into_iter().find_map(|c| match c {
            PeerCall::SetLocalOffer(sdp) => Some(sdp),
            _ => None,
        })
    }

    /// Raise an engine event on the most recently created peer.
    pub fn emit(&self, event: PeerEvent) {
        let sink = self
            .inner
            .lock()
            .unwrap()
            .sink
            .clone()
            .expect("no peer created yet");
        sink.send(event);
    }

    pub fn ice(&self, state: IceConnectionState) {
        self.emit(PeerEvent::IceStateChanged(state));
    }

    fn record(&self, call: PeerCall) {
        tracing::debug!("[MockPeer] {:?}", call);
        self.inner.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl PeerConnector for MockPeerConnector {
    async fn connect(&self, settings: PeerSettings, sink: PeerSink) -> Result<Box<dyn PeerBackend>> {
        self.record(PeerCall::Connect {
            stun_server: settings.stun_server,
            ice_candidate_pool_size: settings.ice_candidate_pool_size,
        });
        self.inner.lock().unwrap().sink = Some(sink);
        Ok(Box::new(MockPeer {
            connector: self.clone(),
        }))
    }
}

struct MockPeer {
    connector: MockPeerConnector,
}

#[async_trait]
impl PeerBackend for MockPeer {
    async fn add_video_track(&self, _track: Arc<dyn TrackLocal + Send + Sync>) -> Result<()> {
        self.connector.record(PeerCall::AddVideoTrack);
        Ok(())
    }

    async fn add_receive_only_video(&self) -> Result<()> {
        self.connector.record(PeerCall::AddReceiveOnlyVideo);
        Ok(())
    }

    async fn apply_video_policy(&self, _policy: &VideoSenderPolicy) -> Result<PolicyOutcome> {
        self.connector.record(PeerCall::ApplyVideoPolicy);
        Ok(self.connector.inner.lock().unwrap().policy_outcome)
    }

    async fn create_offer(&self) -> Result<String> {
        self.connector.record(PeerCall::CreateOffer);
        Ok(MOCK_OFFER.to_owned())
    }

    async fn set_local_offer(&self, sdp: String) -> Result<()> {
        self.connector.record(PeerCall::SetLocalOffer(sdp));
        Ok(())
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<()> {
        self.connector.record(PeerCall::SetRemoteAnswer(sdp));
        if self.connector.inner.lock().unwrap().fail_answer {
            bail!("remote answer rejected by engine");
        }
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        self.connector.record(PeerCall::AddIceCandidate(candidate));
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.connector.record(PeerCall::Close);
        Ok(())
    }
}
