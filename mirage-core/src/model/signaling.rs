use crate::error::CodecError;
use crate::model::SessionId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ICE candidate as exchanged with the signaling service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(rename = "sdpMid")]
    pub sdp_mid: Option<String>,
    #[serde(rename = "sdpMLineIndex")]
    pub sdp_mline_index: Option<u16>,
}

/// Frames sent to the signaling service. Flat JSON objects discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "initialize_session")]
    InitializeSession {
        fps: u32,
        session_id: SessionId,
        prompt: String,
        product: String,
    },
    #[serde(rename = "offer")]
    Offer { sdp: String },
    #[serde(rename = "ice-candidate")]
    IceCandidate(IceCandidate),
    #[serde(rename = "prompt")]
    Prompt {
        #[serde(rename = "prompt")]
        text: String,
        #[serde(rename = "should_enrich")]
        enrich: bool,
    },
}

/// Frames received from the signaling service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Ready {
        connection_id: Option<String>,
        session_id: Option<String>,
    },
    Answer {
        sdp: String,
    },
    /// `None` marks the end of remote candidates.
    IceCandidate(Option<IceCandidate>),
    /// A frame with a `type` this client does not know.
    Unrecognized(String),
}

#[derive(Deserialize)]
struct AnswerFrame {
    sdp: String,
}

pub fn encode(message: &OutboundMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

/// Decode one inbound text frame.
///
/// The `type` discriminator is read first and the rest of the frame is decoded
/// according to it. Unknown types are not an error. Remote candidates may arrive
/// nested under `candidate` or flat on the frame; an absent or empty candidate
/// string is the end-of-candidates signal.
pub fn decode(raw: &str) -> Result<InboundMessage, CodecError> {
    let frame: Value =
        serde_json::from_str(raw).map_err(|e| CodecError::Malformed(e.to_string()))?;

    let Some(kind) = frame.get("type").and_then(Value::as_str).map(str::to_owned) else {
        return Err(CodecError::Malformed(
            "missing 'type' discriminator".to_owned(),
        ));
    };

    match kind.as_str() {
        "ready" => Ok(InboundMessage::Ready {
            connection_id: text_field(&frame, "connection_id"),
            session_id: text_field(&frame, "session_id"),
        }),
        "answer" => {
            let answer: AnswerFrame = serde_json::from_value(frame)
                .map_err(|e| CodecError::Malformed(format!("answer: {}", e)))?;
            Ok(InboundMessage::Answer { sdp: answer.sdp })
        }
        "ice-candidate" => decode_candidate(&frame).map(InboundMessage::IceCandidate),
        _ => Ok(InboundMessage::Unrecognized(kind)),
    }
}

fn decode_candidate(frame: &Value) -> Result<Option<IceCandidate>, CodecError> {
    let (fields, candidate) = match frame.get("candidate") {
        None | Some(Value::Null) => return Ok(None),
        Some(nested @ Value::Object(_)) => (nested, nested.get("candidate")),
        Some(flat @ Value::String(_)) => (frame, Some(flat)),
        Some(other) => {
            return Err(CodecError::Malformed(format!(
                "ice-candidate: unexpected candidate value {}",
                other
            )));
        }
    };

    let Some(candidate) = candidate
        .and_then(Value::as_str)
        .filter(|c| !c.trim().is_empty())
    else {
        return Ok(None);
    };

    Ok(Some(IceCandidate {
        candidate: candidate.to_owned(),
        sdp_mid: fields
            .get("sdpMid")
            .and_then(Value::as_str)
            .filter(|mid| !mid.is_empty())
            .map(str::to_owned),
        sdp_mline_index: fields.get("sdpMLineIndex").and_then(line_index),
    }))
}

fn line_index(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_field(frame: &Value, name: &str) -> Option<String> {
    match frame.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
