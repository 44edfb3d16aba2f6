use log::debug;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;

use crate::error::EngineError;
use crate::peer::engine::PeerConnection;

/// Состояние сессии.
///
/// `Created -> Negotiating -> Established -> Closed`, либо `Negotiating -> Failed`.
/// `Failed` и `Closed` конечные.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Created,
    Negotiating,
    Established,
    Failed,
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Created => "created",
            SessionState::Negotiating => "negotiating",
            SessionState::Established => "established",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        };
        f.write_str(s)
    }
}

/// Одна сессия с удалённым пиром. Соединение принадлежит только ей.
pub struct Session<C: PeerConnection> {
    state: SessionState,
    id: Option<String>,
    connection: Option<Arc<C>>,
    video_track: Option<Arc<C::Track>>,
    audio_track: Option<Arc<C::Track>>,
    events: Option<mpsc::UnboundedReceiver<RTCPeerConnectionState>>,
}

impl<C: PeerConnection> Default for Session<C> {
    fn default() -> Self {
        Session {
            state: SessionState::Created,
            id: None,
            connection: None,
            video_track: None,
            audio_track: None,
            events: None,
        }
    }
}

impl<C: PeerConnection> Session<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущее состояние с учётом событий соединения, пришедших с прошлого вызова
    pub fn state(&mut self) -> SessionState {
        let mut pending = Vec::new();
        if let Some(rx) = self.events.as_mut() {
            while let Ok(st) = rx.try_recv() {
                pending.push(st);
            }
        }
        for st in pending {
            self.apply(st);
        }
        self.state
    }

    /// Ждёт, пока установленная сессия закроется.
    ///
    /// Возвращается сразу, если сессия не в `Established` или канал событий закрыт.
    pub async fn closed(&mut self) -> SessionState {
        while self.state() == SessionState::Established {
            let Some(rx) = self.events.as_mut() else {
                break;
            };
            match rx.recv().await {
                Some(st) => self.apply(st),
                None => break,
            }
        }
        self.state
    }

    /// Закрывает соединение. `Established -> Closed`; из `Failed` состояние не меняется.
    pub async fn close(&mut self) -> Result<(), EngineError> {
        let result = match self.connection.take() {
            Some(conn) => conn.close().await,
            None => Ok(()),
        };
        if self.state == SessionState::Established {
            self.state = SessionState::Closed;
        }
        self.events = None;
        result
    }

    /// Идентификатор, под которым логируются смены состояния
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn connection(&self) -> Option<&Arc<C>> {
        self.connection.as_ref()
    }

    pub fn video_track(&self) -> Option<&Arc<C::Track>> {
        self.video_track.as_ref()
    }

    pub fn audio_track(&self) -> Option<&Arc<C::Track>> {
        self.audio_track.as_ref()
    }

    fn apply(&mut self, st: RTCPeerConnectionState) {
        if self.state != SessionState::Established {
            return;
        }
        if matches!(
            st,
            RTCPeerConnectionState::Closed | RTCPeerConnectionState::Failed
        ) {
            debug!("Session {:?} closed by connection state {st}", self.id);
            self.state = SessionState::Closed;
            self.events = None;
        }
    }

    pub(crate) fn begin(&mut self) {
        self.state = SessionState::Negotiating;
    }

    pub(crate) fn attach(
        &mut self,
        id: String,
        connection: Arc<C>,
        events: mpsc::UnboundedReceiver<RTCPeerConnectionState>,
    ) {
        self.id = Some(id);
        self.connection = Some(connection);
        self.events = Some(events);
    }

    pub(crate) fn establish(&mut self, video: Arc<C::Track>, audio: Arc<C::Track>) {
        self.video_track = Some(video);
        self.audio_track = Some(audio);
        self.state = SessionState::Established;
    }

    /// Переводит в `Failed` и отдаёт соединение для закрытия
    pub(crate) fn fail(&mut self) -> Option<Arc<C>> {
        self.state = SessionState::Failed;
        self.video_track = None;
        self.audio_track = None;
        self.events = None;
        self.connection.take()
    }
}
