use crate::error::ClientError;
use crate::negotiator::Negotiator;
use crate::peer::PolicyOutcome;
use mirage_core::{ConnectionState, OutboundMessage, VideoSenderPolicy, sdp};
use tokio::time::Instant;
use tracing::{debug, info, warn};

impl Negotiator {
    /// Applies `policy` to the video senders, creates the offer, sets it as the
    /// local description and sends it. Returns the SDP that went on the wire.
    ///
    /// Codec preference shapes the generated offer, so it happens before the
    /// offer is created. The engine only accepts its own offer as the local
    /// description; bandwidth and framerate lines go into the sent copy only.
    pub async fn create_offer(&mut self, policy: &VideoSenderPolicy) -> Result<String, ClientError> {
        if self.state != ConnectionState::SocketOpen || self.peer().is_none() {
            return Err(ClientError::InvalidState(self.state));
        }
        self.set_state(ConnectionState::NegotiatingOffer);

        let offer = {
            let Some(peer) = self.peer() else {
                return Err(ClientError::InvalidState(self.state));
            };

            match peer.apply_video_policy(policy).await? {
                PolicyOutcome::Applied => debug!("Preferring {}", policy.codec_mime_type),
                PolicyOutcome::CodecUnavailable => warn!(
                    "{}, offering default codecs",
                    ClientError::CodecMismatch(policy.codec_mime_type.clone())
                ),
                PolicyOutcome::NoVideoSender => debug!("No outgoing video sender"),
            }

            let offer = peer.create_offer().await?;
            let wire = sdp::apply_video_policy(&offer, policy);
            peer.set_local_offer(offer).await?;
            wire
        };

        self.send_frame(&OutboundMessage::Offer { sdp: offer.clone() })?;
        if let Some(attempt) = self.attempt.as_mut() {
            attempt.offer_sent_at = Some(Instant::now());
        }
        self.set_state(ConnectionState::AwaitingAnswer);
        info!("Offer sent, awaiting answer");
        Ok(offer)
    }
}
