use crate::utils::{
    DEFAULT_MAX_BITRATE_BPS, DEFAULT_MAX_FRAMERATE, DEFAULT_MIN_BITRATE_BPS, DEFAULT_VIDEO_CODEC,
};
use serde::{Deserialize, Serialize};

/// Encoding constraints applied to outgoing video senders before each offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoSenderPolicy {
    /// Preferred codec, matched against capability mime types.
    pub codec_mime_type: String,
    pub min_bitrate_bps: u64,
    pub max_bitrate_bps: u64,
    pub max_framerate: u32,
    /// `1.0` keeps the source resolution.
    pub scale_resolution_down_by: f64,
}

impl Default for VideoSenderPolicy {
    fn default() -> Self {
        Self {
            codec_mime_type: DEFAULT_VIDEO_CODEC.to_owned(),
            min_bitrate_bps: DEFAULT_MIN_BITRATE_BPS,
            max_bitrate_bps: DEFAULT_MAX_BITRATE_BPS,
            max_framerate: DEFAULT_MAX_FRAMERATE,
            scale_resolution_down_by: 1.0,
        }
    }
}

impl VideoSenderPolicy {
    /// Mime types are case-insensitive (RFC 6838), so `video/vp8` matches `video/VP8`.
    pub fn matches_codec(&self, mime_type: &str) -> bool {
        self.codec_mime_type.eq_ignore_ascii_case(mime_type)
    }

    /// Encoding name as it appears in `a=rtpmap` lines, e.g. `VP8`.
    pub fn encoding_name(&self) -> &str {
        self.codec_mime_type
            .split_once('/')
            .map_or(self.codec_mime_type.as_str(), |(_, name)| name)
    }
}
