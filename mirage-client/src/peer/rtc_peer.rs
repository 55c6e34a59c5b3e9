use crate::peer::{
    MediaKind, PeerBackend, PeerConnector, PeerEvent, PeerSettings, PolicyOutcome,
};
use crate::queue::PeerSink;
use anyhow::{Context, Result};
use async_trait::async_trait;
use mirage_core::{IceCandidate, IceConnectionState, VideoSenderPolicy};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_connection_state::RTCIceConnectionState;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecParameters, RTPCodecType};
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Builds [`RtcPeer`]s on top of `webrtc-rs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtcPeerConnector;

#[async_trait]
impl PeerConnector for RtcPeerConnector {
    async fn connect(&self, settings: PeerSettings, sink: PeerSink) -> Result<Box<dyn PeerBackend>> {
        Ok(Box::new(RtcPeer::new(settings, sink).await?))
    }
}

pub struct RtcPeer {
    peer_connection: Arc<RTCPeerConnection>,
    senders: Mutex<Vec<Arc<RTCRtpSender>>>,
}

impl RtcPeer {
    /// Creates the peer connection and wires its callbacks into `sink`.
    pub async fn new(settings: PeerSettings, sink: PeerSink) -> Result<Self> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        // Without a STUN server the connection relies on host candidates only.
        let rtc_config = match &settings.stun_server {
            Some(stun) => RTCConfiguration {
                ice_servers: vec![RTCIceServer {
                    urls: vec![stun.clone()],
                    ..Default::default()
                }],
                ice_candidate_pool_size: settings.ice_candidate_pool_size,
                ..Default::default()
            },
            None => RTCConfiguration::default(),
        };

        let peer_connection = Arc::new(
            api.new_peer_connection(rtc_config)
                .await
                .context("Failed to create peer connection")?,
        );

        let ice_sink = sink.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let sink = ice_sink.clone();
            Box::pin(async move {
                let Some(candidate) = c else {
                    sink.send(PeerEvent::GatheringComplete);
                    return;
                };
                match candidate.to_json() {
                    Ok(init) => sink.send(PeerEvent::CandidateGathered(IceCandidate {
                        candidate: init.candidate,
                        sdp_mid: init.sdp_mid,
                        sdp_mline_index: init.sdp_mline_index,
                    })),
                    Err(e) => warn!("Failed to serialize local ICE candidate: {}", e),
                }
            })
        }));

        let state_sink = sink.clone();
        peer_connection.on_ice_connection_state_change(Box::new(
            move |s: RTCIceConnectionState| {
                let sink = state_sink.clone();
                Box::pin(async move {
                    debug!("ICE connection state: {}", s);
                    if let Some(state) = map_ice_state(s) {
                        sink.send(PeerEvent::IceStateChanged(state));
                    }
                })
            },
        ));

        let track_sink = sink;
        let video_sink = settings.video_sink.clone();
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let sink = track_sink.clone();
                let video_sink = video_sink.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Video => MediaKind::Video,
                        _ => MediaKind::Audio,
                    };
                    info!(
                        "Remote {:?} track arrived: {}",
                        kind,
                        track.codec().capability.mime_type
                    );
                    if kind == MediaKind::Video {
                        if let Some(video_sink) = video_sink {
                            video_sink.on_remote_track(track);
                        }
                    }
                    sink.send(PeerEvent::TrackAdded(kind));
                })
            },
        ));

        Ok(Self {
            peer_connection,
            senders: Mutex::new(Vec::new()),
        })
    }

    async fn keep_sender(&self, sender: Arc<RTCRtpSender>) {
        // RTCP has to be drained for interceptors such as NACK to work.
        let reader = sender.clone();
        tokio::spawn(async move {
            let mut buf = vec![0u8; 1500];
            while reader.read(&mut buf).await.is_ok() {}
        });
        self.senders.lock().await.push(sender);
    }
}

#[async_trait]
impl PeerBackend for RtcPeer {
    async fn add_video_track(&self, track: Arc<dyn TrackLocal + Send + Sync>) -> Result<()> {
        let transceiver = self
            .peer_connection
            .add_transceiver_from_track(
                track,
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Sendrecv,
                    send_encodings: vec![],
                }),
            )
            .await
            .context("Failed to add video track")?;
        self.keep_sender(transceiver.sender().await).await;
        Ok(())
    }

    async fn add_receive_only_video(&self) -> Result<()> {
        self.peer_connection
            .add_transceiver_from_kind(
                RTPCodecType::Video,
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Recvonly,
                    send_encodings: vec![],
                }),
            )
            .await
            .context("Failed to add receive-only video transceiver")?;
        Ok(())
    }

    async fn apply_video_policy(&self, policy: &VideoSenderPolicy) -> Result<PolicyOutcome> {
        if policy.scale_resolution_down_by > 1.0 {
            warn!(
                "Resolution scaling ({}) is not supported, sending at source resolution",
                policy.scale_resolution_down_by
            );
        }

        let mut outcome = PolicyOutcome::NoVideoSender;
        for transceiver in self.peer_connection.get_transceivers().await {
            let sender = transceiver.sender().await;
            let Some(track) = sender.track().await else {
                continue;
            };
            if track.kind() != RTPCodecType::Video {
                continue;
            }

            let preferred: Vec<RTCRtpCodecParameters> = sender
                .get_parameters()
                .await
                .rtp_parameters
                .codecs
                .into_iter()
                .filter(|c| policy.matches_codec(&c.capability.mime_type))
                .collect();

            if preferred.is_empty() {
                outcome = PolicyOutcome::CodecUnavailable;
                continue;
            }

            transceiver
                .set_codec_preferences(preferred)
                .await
                .context("Failed to set codec preferences")?;
            if outcome == PolicyOutcome::NoVideoSender {
                outcome = PolicyOutcome::Applied;
            }
        }
        Ok(outcome)
    }

    async fn create_offer(&self) -> Result<String> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("Failed to create offer")?;
        Ok(offer.sdp)
    }

    async fn set_local_offer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::offer(sdp)?;
        self.peer_connection
            .set_local_description(desc)
            .await
            .context("Failed to set local description")?;
        Ok(())
    }

    async fn set_remote_answer(&self, sdp: String) -> Result<()> {
        let desc = RTCSessionDescription::answer(sdp)?;
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("Failed to set remote description")?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidate) -> Result<()> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_mline_index,
            username_fragment: None,
        };
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("Failed to add ICE candidate")?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let senders: Vec<_> = self.senders.lock().await.drain(..).collect();
        for sender in senders {
            if let Err(e) = sender.stop().await {
                warn!("Failed to stop video sender: {}", e);
            }
        }
        self.peer_connection.close().await?;
        Ok(())
    }
}

fn map_ice_state(state: RTCIceConnectionState) -> Option<IceConnectionState> {
    Some(match state {
        RTCIceConnectionState::New => IceConnectionState::New,
        RTCIceConnectionState::Checking => IceConnectionState::Checking,
        RTCIceConnectionState::Connected => IceConnectionState::Connected,
        RTCIceConnectionState::Completed => IceConnectionState::Completed,
        RTCIceConnectionState::Failed => IceConnectionState::Failed,
        RTCIceConnectionState::Disconnected => IceConnectionState::Disconnected,
        RTCIceConnectionState::Closed => IceConnectionState::Closed,
        RTCIceConnectionState::Unspecified => return None,
    })
}
