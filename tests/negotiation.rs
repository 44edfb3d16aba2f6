use rtc_streamer::signaling::{decode_payload, encode_payload};
use rtc_streamer::utils::random_id;
use rtc_streamer::{
    CodecKind, Error, LocalTrack, SdpPayload, ServerConfig, SessionState, Streamer, StreamerConfig,
};
use std::time::Duration;
use webrtc::api::media_engine::{MediaEngine, MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::api::APIBuilder;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::sdp_type::RTCSdpType;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::{RTCRtpCodecCapability, RTCRtpCodecParameters, RTPCodecType};
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;

type TestResult = std::result::Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Локальный STUN, чтобы тест не ходил в сеть
fn offline_config() -> StreamerConfig {
    StreamerConfig {
        ice_servers: vec![ServerConfig {
            id: "local-stun".into(),
            r#type: "stun".into(),
            url: "stun:127.0.0.1:3478".into(),
            username: None,
            credential: None,
        }],
        ..Default::default()
    }
}

/// Удалённый пир, который хочет только принимать видео и аудио
async fn recvonly_offerer(m: MediaEngine) -> webrtc::error::Result<(RTCPeerConnection, RTCSessionDescription)> {
    let api = APIBuilder::new().with_media_engine(m).build();
    let pc = api.new_peer_connection(RTCConfiguration::default()).await?;

    for kind in [RTPCodecType::Video, RTPCodecType::Audio] {
        pc.add_transceiver_from_kind(
            kind,
            Some(RTCRtpTransceiverInit {
                direction: RTCRtpTransceiverDirection::Recvonly,
                send_encodings: vec![],
            }),
        )
        .await?;
    }

    let offer = pc.create_offer(None).await?;
    pc.set_local_description(offer.clone()).await?;
    Ok((pc, offer))
}

fn default_codecs() -> webrtc::error::Result<MediaEngine> {
    let mut m = MediaEngine::default();
    m.register_default_codecs()?;
    Ok(m)
}

fn media_sections(sdp: &str) -> Vec<&str> {
    sdp.split("\r\nm=").skip(1).collect()
}

#[tokio::test]
async fn test_answer_has_sendonly_video_and_audio() -> TestResult {
    rtc_streamer::logger::init();

    let (offerer, offer) = recvonly_offerer(default_codecs()?).await?;
    let mut streamer = Streamer::with_webrtc(offline_config());

    let answer = streamer.setup(offer).await?;

    assert_eq!(answer.sdp_type, RTCSdpType::Answer);
    let sections = media_sections(&answer.sdp);
    assert_eq!(sections.len(), 2);
    assert!(sections[0].starts_with("video"));
    assert!(sections[0].contains("H264/90000"));
    assert!(sections[1].starts_with("audio"));
    assert!(sections[1].contains("opus/48000"));
    for m in &sections {
        assert!(m.contains("a=sendonly"), "not send-only: {m}");
    }

    {
        let session = streamer.session_mut();
        assert_eq!(session.state(), SessionState::Established);
        assert_eq!(session.video_track().map(|t| t.kind()), Some(CodecKind::Video));
        assert_eq!(session.audio_track().map(|t| t.kind()), Some(CodecKind::Audio));

        let pc = session.connection().expect("connection").peer_connection();
        let transceivers = pc.get_transceivers().await;
        assert_eq!(transceivers.len(), 2);
        for t in &transceivers {
            assert_eq!(t.direction(), RTCRtpTransceiverDirection::Sendonly);
        }
    }

    // Удалённая сторона принимает answer
    offerer.set_remote_description(answer).await?;

    streamer.session_mut().close().await?;
    assert_eq!(streamer.session_mut().state(), SessionState::Closed);
    offerer.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_vp8_only_offer_is_rejected() -> TestResult {
    let mut m = MediaEngine::default();
    m.register_codec(
        RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
            payload_type: 96,
            ..Default::default()
        },
        RTPCodecType::Video,
    )?;
    m.register_codec(
        RTCRtpCodecParameters {
            capability: RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                sdp_fmtp_line: "minptime=10;useinbandfec=1".to_owned(),
                rtcp_feedback: vec![],
            },
            payload_type: 111,
            ..Default::default()
        },
        RTPCodecType::Audio,
    )?;
    let (offerer, offer) = recvonly_offerer(m).await?;
    let mut streamer = Streamer::with_webrtc(offline_config());

    let err = streamer.setup(offer).await.unwrap_err();

    assert!(matches!(
        err,
        Error::CodecNotFound {
            kind: CodecKind::Video,
            ..
        }
    ));
    assert_eq!(streamer.session_mut().state(), SessionState::Failed);
    assert!(streamer.session().connection().is_none());
    offerer.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_answer_typed_remote_is_negotiation_error() -> TestResult {
    let (offerer, offer) = recvonly_offerer(default_codecs()?).await?;
    let mut mistyped = RTCSessionDescription::default();
    mistyped.sdp_type = RTCSdpType::Answer;
    mistyped.sdp = offer.sdp;

    let mut streamer = Streamer::with_webrtc(offline_config());
    let err = streamer.setup(mistyped).await.unwrap_err();

    assert!(matches!(err, Error::Negotiation(_)), "unexpected error {err}");
    assert_eq!(streamer.session_mut().state(), SessionState::Failed);
    assert!(streamer.session().video_track().is_none());
    assert!(streamer.session().connection().is_none());
    offerer.close().await?;
    Ok(())
}

#[tokio::test]
async fn test_encoded_offer_round_trip() -> TestResult {
    let (offerer, offer) = recvonly_offerer(default_codecs()?).await?;
    let id = random_id();
    let encoded = encode_payload(&SdpPayload::new(offer, id.clone()))?;

    let mut streamer = Streamer::with_webrtc(offline_config());
    let answer = decode_payload(&streamer.setup_encoded(&encoded).await?)?;

    assert_eq!(answer.id, id);
    assert_eq!(answer.sdp.sdp_type, RTCSdpType::Answer);
    offerer.set_remote_description(answer.sdp).await?;

    // Семпл уходит в трек даже без установленного транспорта
    if let Some(video) = streamer.session().video_track() {
        video
            .write_sample(bytes::Bytes::from_static(&[0, 0, 0, 1, 0x65]), Duration::from_millis(33))
            .await?;
    }

    streamer.session_mut().close().await?;
    offerer.close().await?;
    Ok(())
}
