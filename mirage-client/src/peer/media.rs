use mirage_core::utils::DEFAULT_VIDEO_CODEC;
use std::sync::Arc;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_remote::TrackRemote;

/// Supplies the outbound camera track.
pub trait VideoSource: Send + Sync {
    fn track(&self) -> Arc<dyn TrackLocal + Send + Sync>;
}

/// Receives the transformed video coming back from the service.
pub trait VideoSink: Send + Sync {
    fn on_remote_track(&self, track: Arc<TrackRemote>);
}

/// VP8 sample track; the host writes encoded frames into [`Self::sample_track`].
pub struct StaticVideoSource {
    track: Arc<TrackLocalStaticSample>,
}

impl StaticVideoSource {
    pub fn vp8(track_id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        let track = TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: DEFAULT_VIDEO_CODEC.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
            track_id.into(),
            stream_id.into(),
        );
        Self {
            track: Arc::new(track),
        }
    }

    pub fn sample_track(&self) -> Arc<TrackLocalStaticSample> {
        self.track.clone()
    }
}

impl VideoSource for StaticVideoSource {
    fn track(&self) -> Arc<dyn TrackLocal + Send + Sync> {
        self.track.clone()
    }
}
