use serde::{Deserialize, Serialize};
use std::fmt;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTPCodecType};
use webrtc::rtp_transceiver::RTCPFeedback;

/// Тип медиа: аудио или видео
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    Audio,
    Video,
}

impl CodecKind {
    /// Имя медиасекции в SDP (`m=audio` / `m=video`)
    pub fn media(&self) -> &'static str {
        match self {
            CodecKind::Audio => "audio",
            CodecKind::Video => "video",
        }
    }

    pub fn from_media(media: &str) -> Option<Self> {
        match media {
            "audio" => Some(CodecKind::Audio),
            "video" => Some(CodecKind::Video),
            _ => None,
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media())
    }
}

impl From<CodecKind> for RTPCodecType {
    fn from(kind: CodecKind) -> Self {
        match kind {
            CodecKind::Audio => RTPCodecType::Audio,
            CodecKind::Video => RTPCodecType::Video,
        }
    }
}

/// Кодек, объявленный удалённой стороной в offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecDescriptor {
    pub kind: CodecKind,
    /// Имя из `a=rtpmap`, регистр сохраняется (`H264`, `opus`)
    pub name: String,
    pub payload_type: u8,
    pub clock_rate: u32,
    pub channels: u16,
    pub fmtp: String,
    pub rtcp_feedback: Vec<String>,
}

impl CodecDescriptor {
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.kind.media(), self.name)
    }

    /// Описание кодека в терминах webrtc-rs
    pub fn capability(&self) -> RTCRtpCodecCapability {
        RTCRtpCodecCapability {
            mime_type: self.mime_type(),
            clock_rate: self.clock_rate,
            channels: self.channels,
            sdp_fmtp_line: self.fmtp.clone(),
            rtcp_feedback: self
                .rtcp_feedback
                .iter()
                .map(|raw| {
                    let (typ, parameter) = raw.split_once(' ').unwrap_or((raw.as_str(), ""));
                    RTCPFeedback {
                        typ: typ.to_owned(),
                        parameter: parameter.to_owned(),
                    }
                })
                .collect(),
        }
    }
}

/// Первый кодек нужного типа с точным (регистрозависимым) совпадением имени
pub fn find_codec<'a>(
    codecs: &'a [CodecDescriptor],
    kind: CodecKind,
    name: &str,
) -> Option<&'a CodecDescriptor> {
    codecs.iter().find(|c| c.kind == kind && c.name == name)
}

/// Полезная нагрузка SDP с метаданными
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SdpPayload {
    pub sdp: RTCSessionDescription,
    pub id: String,
    pub ts: i64,
}

/// Конфигурация ICE сервера
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub id: String,
    pub r#type: String, // 'stun' or 'turn'
    pub url: String,
    pub username: Option<String>,
    pub credential: Option<String>,
}
