
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

use crate::config::StreamerConfig;
use crate::error::{Error, Result};
use crate::peer::connection::WebRtcEngine;
use crate::peer::engine::{PeerConnection, StateObserver, TransportEngine};
use crate::peer::types::{find_codec, CodecDescriptor, CodecKind, SdpPayload};
use crate::session::{Session, SessionState};
use crate::signaling::{decode_payload, encode_payload};

type TrackOf<E> = <<E as TransportEngine>::Connection as PeerConnection>::Track;

/// Подставляется в логи, если движок не дал идентификатор соединения
pub const UNKNOWN_SESSION_ID: &str = "unknown";

/// Принимает offer удалённого пира и отвечает answer с двумя send-only треками:
/// видео и аудио.
///
/// Владеет ровно одной сессией. Сессия одноразовая: для нового согласования
/// нужен новый `Streamer`.
pub struct Streamer<E: TransportEngine> {
    engine: E,
    config: StreamerConfig,
    rng: Box<dyn RngCore + Send>,
    session: Session<E::Connection>,
}

impl Streamer<WebRtcEngine> {
    pub fn with_webrtc(config: StreamerConfig) -> Self {
        Self::new(WebRtcEngine, config)
    }
}

impl<E: TransportEngine> Streamer<E> {
    pub fn new(engine: E, config: StreamerConfig) -> Self {
        Self::with_rng(engine, config, StdRng::from_os_rng())
    }

    /// Генератор SSRC передаётся явно, в тестах с фиксированным seed
    pub fn with_rng<R: RngCore + Send + 'static>(engine: E, config: StreamerConfig, rng: R) -> Self {
        Streamer {
            engine,
            config,
            rng: Box::new(rng),
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &StreamerConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<E::Connection> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<E::Connection> {
        &mut self.session
    }

    /// Создаёт answer на offer.
    ///
    /// Любая ошибка оставляет сессию в `Failed`, соединение закрывается.
    /// Повторный вызов на той же сессии даёт `ConcurrentNegotiation`.
    pub async fn setup(&mut self, offer: RTCSessionDescription) -> Result<RTCSessionDescription> {
        let state = self.session.state();
        if state != SessionState::Created {
            return Err(Error::ConcurrentNegotiation(state));
        }
        self.session.begin();

        match self.negotiate(offer).await {
            Ok(answer) => Ok(answer),
            Err(e) => {
                if let Some(conn) = self.session.fail() {
                    if let Err(close_err) = conn.close().await {
                        debug!("Closing failed connection: {close_err}");
                    }
                }
                Err(e)
            }
        }
    }

    /// То же, что `setup`, но offer и answer упакованы в `SdpPayload` (base64).
    /// Answer получает id из offer.
    pub async fn setup_encoded(&mut self, encoded: &str) -> Result<String> {
        let offer = decode_payload(encoded)?;
        info!("Decoded offer, session id: {}", offer.id);

        let answer = self.setup(offer.sdp).await?;
        encode_payload(&SdpPayload::new(answer, offer.id))
    }

    async fn negotiate(&mut self, offer: RTCSessionDescription) -> Result<RTCSessionDescription> {
        let rtc_config = self.config.rtc_configuration();
        let capabilities = self.engine.parse_offer_capabilities(&offer);

        let connection = Arc::new(
            self.engine
                .new_connection(rtc_config, &capabilities)
                .await
                .map_err(Error::ConnectionCreation)?,
        );

        let id = connection
            .stats_id()
            .await
            .unwrap_or_else(|| UNKNOWN_SESSION_ID.to_owned());
        let (tx, rx) = mpsc::unbounded_channel();
        connection.on_state_change(state_observer(id.clone(), tx));
        self.session.attach(id, Arc::clone(&connection), rx);

        // Видео всегда раньше аудио
        let video = self
            .add_track(&connection, &capabilities, CodecKind::Video)
            .await?;
        let audio = self
            .add_track(&connection, &capabilities, CodecKind::Audio)
            .await?;

        connection
            .set_remote_description(offer)
            .await
            .map_err(Error::Negotiation)?;
        let answer = connection
            .create_answer()
            .await
            .map_err(Error::AnswerGeneration)?;
        // Запускает UDP слушатели
        connection
            .set_local_description(answer.clone())
            .await
            .map_err(Error::LocalDescription)?;

        self.session.establish(video, audio);
        Ok(answer)
    }

    async fn add_track(
        &mut self,
        connection: &E::Connection,
        capabilities: &[CodecDescriptor],
        kind: CodecKind,
    ) -> Result<Arc<TrackOf<E>>> {
        let (name, label) = match kind {
            CodecKind::Video => (&self.config.video_codec, &self.config.video_label),
            CodecKind::Audio => (&self.config.audio_codec, &self.config.audio_label),
        };
        let codec = find_codec(capabilities, kind, name).ok_or_else(|| Error::CodecNotFound {
            kind,
            name: name.clone(),
        })?;

        let ssrc = self.rng.next_u32();
        let track = connection
            .new_track(codec.payload_type, ssrc, kind, label)
            .await
            .map_err(|source| Error::TrackCreation { kind, source })?;
        connection
            .add_send_only_transceiver(&track)
            .await
            .map_err(|source| Error::Transceiver { kind, source })?;
        Ok(track)
    }
}

/// Наблюдатель владеет копией id и отправителем; в сессию он не пишет
fn state_observer(id: String, tx: mpsc::UnboundedSender<RTCPeerConnectionState>) -> StateObserver {
    Box::new(move |st: RTCPeerConnectionState| {
        info!("State of {id}: {st}");
        let _ = tx.send(st);
    })
}
