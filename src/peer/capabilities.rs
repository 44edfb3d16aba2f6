use log::debug;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::sdp::SessionDescription;

use crate::peer::types::{CodecDescriptor, CodecKind};

/// Разбирает offer и возвращает объявленные в нём кодеки.
///
/// Порядок: секции `m=` как в SDP, внутри секции порядок форматов.
/// Форматы без `a=rtpmap` пропускаются, нераспознаваемый SDP даёт пустой список.
pub fn parse_offer_capabilities(offer: &RTCSessionDescription) -> Vec<CodecDescriptor> {
    let parsed = match offer.unmarshal() {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("offer is not valid SDP, no capabilities: {e}");
            return Vec::new();
        }
    };

    let mut out = Vec::new();
    for media in &parsed.media_descriptions {
        let Some(kind) = CodecKind::from_media(&media.media_name.media) else {
            continue;
        };

        // get_codec_for_payload_type смотрит во все медиасекции, поэтому одна секция за раз
        let section = SessionDescription {
            media_descriptions: vec![media.clone()],
            ..Default::default()
        };

        for format in &media.media_name.formats {
            let Ok(payload_type) = format.parse::<u8>() else {
                continue;
            };
            let codec = match section.get_codec_for_payload_type(payload_type) {
                Ok(codec) if !codec.name.is_empty() => codec,
                _ => continue,
            };

            out.push(CodecDescriptor {
                kind,
                name: codec.name,
                payload_type,
                clock_rate: codec.clock_rate,
                channels: codec.encoding_parameters.parse::<u16>().unwrap_or(0),
                fmtp: codec.fmtp,
                rtcp_feedback: codec.rtcp_feedback,
            });
        }
    }
    out
}
