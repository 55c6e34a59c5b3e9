use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::negotiator::Negotiator;
use crate::prompt::PromptSender;
use mirage_core::OutboundMessage;
use tracing::{info, warn};

impl Negotiator {
    pub fn prompt_sender(&self) -> PromptSender {
        self.prompts.sender()
    }

    /// Queues a free-text prompt; it is sent by the next `pump` once the session is live.
    pub fn queue_custom_prompt(&self, text: impl Into<String>) -> bool {
        self.prompts.sender().queue_custom_prompt(text)
    }

    pub fn pending_prompts(&self) -> usize {
        self.prompts.pending()
    }

    /// Moves the prompt cursor one step and sends that entry's instruction.
    /// Returns the display key of the sent entry.
    pub fn send_next_prompt(&mut self, forward: bool) -> Result<String, ClientError> {
        if !self.transport().is_some_and(|t| t.is_open()) {
            return Err(ClientError::NotConnected);
        }

        let model = self.session.model();
        let Some(entry) = self.session.advance(forward).cloned() else {
            return Err(ClientError::EmptyPromptTable(model));
        };

        self.send_frame(&OutboundMessage::Prompt {
            text: entry.instruction.clone(),
            enrich: true,
        })?;
        info!("Prompt '{}' sent: {}", entry.key, entry.instruction);
        self.emit(SessionEvent::PromptSent(entry.key.clone()));
        Ok(entry.key)
    }

    pub(super) fn drain_prompts(&mut self) -> usize {
        if !self.transport().is_some_and(|t| t.is_open()) {
            return 0;
        }
        let mut sent = 0;
        while let Some(text) = self.prompts.next_ready() {
            let frame = OutboundMessage::Prompt {
                text: text.clone(),
                enrich: true,
            };
            if let Err(e) = self.send_frame(&frame) {
                warn!("Failed to send prompt, keeping it queued: {}", e);
                self.prompts.hold(text);
                break;
            }
            info!("Custom prompt sent: {}", text);
            self.emit(SessionEvent::PromptSent(text));
            sent += 1;
        }
        sent
    }
}
