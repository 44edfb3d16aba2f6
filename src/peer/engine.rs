//! Граница с движком медиатранспорта.
//!
//! ICE, DTLS, SRTP и пакетизация живут за этими трейтами; `Streamer`
//! только вызывает их в нужном порядке.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::error::EngineError;
use crate::peer::types::{CodecDescriptor, CodecKind};

/// Обработчик смены состояния соединения
pub type StateObserver = Box<dyn Fn(RTCPeerConnectionState) + Send + Sync>;

pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[async_trait]
pub trait TransportEngine: Send + Sync {
    type Connection: PeerConnection;

    /// Кодеки, объявленные в offer, в порядке перечисления
    fn parse_offer_capabilities(&self, offer: &RTCSessionDescription) -> Vec<CodecDescriptor>;

    async fn new_connection(
        &self,
        config: RTCConfiguration,
        capabilities: &[CodecDescriptor],
    ) -> EngineResult<Self::Connection>;
}

#[async_trait]
pub trait PeerConnection: Send + Sync {
    type Track: LocalTrack;

    async fn stats_id(&self) -> Option<String>;

    fn on_state_change(&self, observer: StateObserver);

    async fn new_track(
        &self,
        payload_type: u8,
        ssrc: u32,
        kind: CodecKind,
        label: &str,
    ) -> EngineResult<Arc<Self::Track>>;

    async fn add_send_only_transceiver(&self, track: &Arc<Self::Track>) -> EngineResult<()>;

    async fn set_remote_description(&self, offer: RTCSessionDescription) -> EngineResult<()>;

    async fn create_answer(&self) -> EngineResult<RTCSessionDescription>;

    /// Кроме прочего запускает сетевые слушатели
    async fn set_local_description(&self, answer: RTCSessionDescription) -> EngineResult<()>;

    async fn close(&self) -> EngineResult<()>;
}

#[async_trait]
pub trait LocalTrack: Send + Sync {
    fn id(&self) -> &str;
    fn kind(&self) -> CodecKind;
    fn ssrc(&self) -> u32;
    fn payload_type(&self) -> u8;

    async fn write_sample(&self, data: Bytes, duration: Duration) -> EngineResult<()>;
}
