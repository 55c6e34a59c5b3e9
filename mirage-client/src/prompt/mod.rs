mod prompt_channel;
mod scheduler;

pub use prompt_channel::{PromptChannel, PromptSender};
pub use scheduler::{DEFAULT_TOLERANCE_SECS, PromptScheduler, TimedPrompt};
