mod prompts;

pub use prompts::{LUCY_PROMPTS, MIRAGE_PROMPTS};

pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

pub const MIRAGE_ENDPOINT: &str = "wss://api3.decart.ai/v1/stream-trial?model=mirage";
pub const LUCY_ENDPOINT: &str = "wss://api3.decart.ai/v1/stream-trial?model=lucy_v2v_720p_rt";

pub const DEFAULT_ICE_CANDIDATE_POOL_SIZE: u8 = 10;

pub const DEFAULT_VIDEO_CODEC: &str = "video/VP8";
pub const DEFAULT_MIN_BITRATE_BPS: u64 = 1_000_000;
pub const DEFAULT_MAX_BITRATE_BPS: u64 = 4_000_000;
pub const DEFAULT_MAX_FRAMERATE: u32 = 30;

pub const DEFAULT_VIDEO_WIDTH: u32 = 1280;
pub const DEFAULT_VIDEO_HEIGHT: u32 = 720;

pub const DEFAULT_SESSION_FPS: u32 = 16;
pub const DEFAULT_SESSION_PRODUCT: &str = "miragevr";
pub const DEFAULT_SESSION_PROMPT: &str = "Semi-Realistic World";
