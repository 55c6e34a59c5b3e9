use crate::error::ConfigError;
use crate::prompt::TimedPrompt;
use mirage_core::utils::{
    DEFAULT_ICE_CANDIDATE_POOL_SIZE, DEFAULT_SESSION_FPS, DEFAULT_SESSION_PRODUCT,
    DEFAULT_SESSION_PROMPT, DEFAULT_STUN_ADDR,
};
use mirage_core::{ModelChoice, SignalingEndpoint, VideoSenderPolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Client configuration. Every field has a default, so an empty TOML document is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Model selected before the first `connect`.
    pub model: ModelChoice,
    pub mirage_url: String,
    pub lucy_url: String,
    /// Empty disables ICE servers entirely (local network only).
    pub stun_server: String,
    pub ice_candidate_pool_size: u8,
    pub video_policy: VideoSenderPolicy,
    pub session_init: SessionInit,
    /// Attach the outbound video track. Without it the client only receives.
    pub send_video: bool,
    pub connected_on: IceMilestone,
    pub retry: RetryPolicy,
    pub schedule: Vec<TimedPrompt>,
    pub schedule_tolerance_secs: f64,
}

/// Payload of the `initialize_session` frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionInit {
    pub fps: u32,
    pub product: String,
    pub prompt: String,
}

/// ICE state that trips the once-per-attempt connected notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceMilestone {
    Connected,
    #[default]
    Completed,
}

/// Defaults leave both off: an attempt waits for its answer indefinitely and a
/// failed attempt stays failed until the host reconnects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub answer_timeout_ms: Option<u64>,
    pub max_reconnect_attempts: u32,
}

impl RetryPolicy {
    pub fn answer_timeout(&self) -> Option<Duration> {
        self.answer_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            model: ModelChoice::Mirage,
            mirage_url: ModelChoice::Mirage.default_url().to_owned(),
            lucy_url: ModelChoice::Lucy.default_url().to_owned(),
            stun_server: DEFAULT_STUN_ADDR.to_owned(),
            ice_candidate_pool_size: DEFAULT_ICE_CANDIDATE_POOL_SIZE,
            video_policy: VideoSenderPolicy::default(),
            session_init: SessionInit::default(),
            send_video: true,
            connected_on: IceMilestone::default(),
            retry: RetryPolicy::default(),
            schedule: Vec::new(),
            schedule_tolerance_secs: crate::prompt::DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl Default for SessionInit {
    fn default() -> Self {
        Self {
            fps: DEFAULT_SESSION_FPS,
            product: DEFAULT_SESSION_PRODUCT.to_owned(),
            prompt: DEFAULT_SESSION_PROMPT.to_owned(),
        }
    }
}

impl ClientConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn endpoint(&self, model: ModelChoice) -> SignalingEndpoint {
        let url = match model {
            ModelChoice::Mirage => &self.mirage_url,
            ModelChoice::Lucy => &self.lucy_url,
        };
        SignalingEndpoint::new(url.clone(), model)
    }

    pub fn stun_server(&self) -> Option<&str> {
        let stun = self.stun_server.trim();
        (!stun.is_empty()).then_some(stun)
    }
}
