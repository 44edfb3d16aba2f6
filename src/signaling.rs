//! Конверт для передачи offer/answer через текстовый канал (QR, чат):
//! JSON `SdpPayload`, закодированный в base64.

use base64::{engine::general_purpose, Engine as _};
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::error::Result;
use crate::peer::types::SdpPayload;

impl SdpPayload {
    pub fn new(sdp: RTCSessionDescription, id: String) -> Self {
        SdpPayload {
            sdp,
            id,
            ts: chrono::Utc::now().timestamp(),
        }
    }
}

pub fn encode_payload(p: &SdpPayload) -> Result<String> {
    Ok(general_purpose::STANDARD.encode(serde_json::to_string(p)?))
}

pub fn decode_payload(s: &str) -> Result<SdpPayload> {
    let raw = general_purpose::STANDARD.decode(s.trim())?;
    Ok(serde_json::from_slice(&raw)?)
}
