use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;
use webrtc::api::media_engine::MediaEngine;
use webrtc::api::APIBuilder;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecParameters;
use webrtc::rtp_transceiver::rtp_transceiver_direction::RTCRtpTransceiverDirection;
use webrtc::rtp_transceiver::RTCRtpTransceiverInit;
use webrtc::stats::StatsReportType;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_local::TrackLocal;

use crate::peer::capabilities::parse_offer_capabilities;
use crate::peer::engine::{EngineResult, PeerConnection, StateObserver, TransportEngine};
use crate::peer::track::WebRtcTrack;
use crate::peer::types::{CodecDescriptor, CodecKind};

/// Движок на webrtc-rs
#[derive(Debug, Default, Clone, Copy)]
pub struct WebRtcEngine;

#[async_trait]
impl TransportEngine for WebRtcEngine {
    type Connection = WebRtcConnection;

    fn parse_offer_capabilities(&self, offer: &RTCSessionDescription) -> Vec<CodecDescriptor> {
        parse_offer_capabilities(offer)
    }

    async fn new_connection(
        &self,
        config: RTCConfiguration,
        capabilities: &[CodecDescriptor],
    ) -> EngineResult<WebRtcConnection> {
        // Регистрируем ровно то, что объявил offer
        let mut m = MediaEngine::default();
        for codec in capabilities {
            m.register_codec(
                RTCRtpCodecParameters {
                    capability: codec.capability(),
                    payload_type: codec.payload_type,
                    ..Default::default()
                },
                codec.kind.into(),
            )?;
        }
        debug!("Registered {} codecs from offer", capabilities.len());

        let api = APIBuilder::new().with_media_engine(m).build();
        let pc = Arc::new(api.new_peer_connection(config).await?);

        Ok(WebRtcConnection {
            pc,
            codecs: capabilities.to_vec(),
        })
    }
}

pub struct WebRtcConnection {
    pc: Arc<RTCPeerConnection>,
    codecs: Vec<CodecDescriptor>,
}

impl WebRtcConnection {
    /// Сырой peer connection, например для trickle-ICE на стороне вызывающего
    pub fn peer_connection(&self) -> &Arc<RTCPeerConnection> {
        &self.pc
    }
}

#[async_trait]
impl PeerConnection for WebRtcConnection {
    type Track = WebRtcTrack;

    async fn stats_id(&self) -> Option<String> {
        let stats = self.pc.get_stats().await;
        stats.reports.into_values().find_map(|v| match v {
            StatsReportType::PeerConnection(pc_stats) => Some(pc_stats.id),
            _ => None,
        })
    }

    fn on_state_change(&self, observer: StateObserver) {
        self.pc
            .on_peer_connection_state_change(Box::new(move |st: RTCPeerConnectionState| {
                observer(st);
                Box::pin(async {})
            }));
    }

    async fn new_track(
        &self,
        payload_type: u8,
        ssrc: u32,
        kind: CodecKind,
        label: &str,
    ) -> EngineResult<Arc<WebRtcTrack>> {
        let codec = self
            .codecs
            .iter()
            .find(|c| c.payload_type == payload_type && c.kind == kind)
            .ok_or_else(|| format!("payload type {payload_type} is not a registered {kind} codec"))?;

        let sample_track = Arc::new(TrackLocalStaticSample::new(
            codec.capability(),
            label.to_owned(),
            label.to_owned(),
        ));

        Ok(Arc::new(WebRtcTrack::new(sample_track, kind, ssrc, payload_type)))
    }

    async fn add_send_only_transceiver(&self, track: &Arc<WebRtcTrack>) -> EngineResult<()> {
        let local: Arc<dyn TrackLocal + Send + Sync> = track.sample_track();
        self.pc
            .add_transceiver_from_track(
                local,
                Some(RTCRtpTransceiverInit {
                    direction: RTCRtpTransceiverDirection::Sendonly,
                    send_encodings: vec![],
                }),
            )
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, offer: RTCSessionDescription) -> EngineResult<()> {
        self.pc.set_remote_description(offer).await?;
        Ok(())
    }

    async fn create_answer(&self) -> EngineResult<RTCSessionDescription> {
        Ok(self.pc.create_answer(None).await?)
    }

    async fn set_local_description(&self, answer: RTCSessionDescription) -> EngineResult<()> {
        self.pc.set_local_description(answer).await?;
        Ok(())
    }

    async fn close(&self) -> EngineResult<()> {
        if let Err(e) = self.pc.close().await {
            warn!("Peer connection close failed: {e}");
            return Err(e.into());
        }
        Ok(())
    }
}
