use crate::prompt::PromptSender;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_TOLERANCE_SECS: f64 = 0.1;

/// A prompt tied to a playback position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedPrompt {
    pub timestamp_secs: f64,
    pub prompt: String,
    #[serde(skip)]
    pub fired: bool,
}

impl TimedPrompt {
    pub fn new(timestamp_secs: f64, prompt: impl Into<String>) -> Self {
        Self {
            timestamp_secs,
            prompt: prompt.into(),
            fired: false,
        }
    }
}

/// Queues prompts as playback reaches their timestamps, each once per run.
#[derive(Debug, Clone)]
pub struct PromptScheduler {
    prompts: Vec<TimedPrompt>,
    tolerance_secs: f64,
}

impl PromptScheduler {
    pub fn new(mut prompts: Vec<TimedPrompt>, tolerance_secs: f64) -> Self {
        prompts.sort_by(|a, b| a.timestamp_secs.total_cmp(&b.timestamp_secs));
        Self {
            prompts,
            tolerance_secs: tolerance_secs.abs(),
        }
    }

    /// Queues every unfired prompt within tolerance of `playback_secs`.
    /// Returns how many were queued.
    pub fn tick(&mut self, playback_secs: f64, sender: &PromptSender) -> usize {
        let mut queued = 0;
        for timed in self.prompts.iter_mut().filter(|p| !p.fired) {
            if (playback_secs - timed.timestamp_secs).abs() <= self.tolerance_secs {
                timed.fired = true;
                info!(
                    "Scheduled prompt at {:.2}s: {}",
                    timed.timestamp_secs, timed.prompt
                );
                if sender.queue_custom_prompt(timed.prompt.clone()) {
                    queued += 1;
                }
            }
        }
        queued
    }

    /// Re-arms every prompt, e.g. when playback restarts.
    pub fn reset(&mut self) {
        for timed in &mut self.prompts {
            timed.fired = false;
        }
    }

    pub fn prompts(&self) -> &[TimedPrompt] {
        &self.prompts
    }

    pub fn is_finished(&self) -> bool {
        self.prompts.iter().all(|p| p.fired)
    }
}
