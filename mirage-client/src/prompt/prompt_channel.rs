use std::collections::VecDeque;
use tokio::sync::mpsc;

/// Cloneable, non-blocking handle for queueing custom prompts from any thread.
#[derive(Debug, Clone)]
pub struct PromptSender {
    tx: mpsc::UnboundedSender<String>,
}

impl PromptSender {
    /// Returns `false` when the prompt was ignored: blank text, or the channel is gone.
    pub fn queue_custom_prompt(&self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text.trim().is_empty() {
            return false;
        }
        self.tx.send(text).is_ok()
    }
}

/// FIFO of custom prompts. Prompts are only handed out while the session is live.
#[derive(Debug)]
pub struct PromptChannel {
    sender: PromptSender,
    rx: mpsc::UnboundedReceiver<String>,
    held: VecDeque<String>,
    live: bool,
}

impl PromptChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sender: PromptSender { tx },
            rx,
            held: VecDeque::new(),
            live: false,
        }
    }

    pub fn sender(&self) -> PromptSender {
        self.sender.clone()
    }

    pub fn set_live(&mut self, live: bool) {
        self.live = live;
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Next prompt to send, or `None` if nothing is queued or the session is not live.
    pub fn next_ready(&mut self) -> Option<String> {
        if !self.live {
            return None;
        }
        self.held.pop_front().or_else(|| self.rx.try_recv().ok())
    }

    /// Puts back a prompt that could not be sent so it goes out first next time.
    pub fn hold(&mut self, text: String) {
        self.held.push_front(text);
    }

    pub fn pending(&self) -> usize {
        self.held.len() + self.rx.len()
    }
}

impl Default for PromptChannel {
    fn default() -> Self {
        Self::new()
    }
}
