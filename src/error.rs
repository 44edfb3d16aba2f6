use thiserror::Error;

use crate::peer::types::CodecKind;

pub type Result<T> = std::result::Result<T, Error>;

/// Ошибка, пришедшая из движка медиатранспорта
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// Нужного кодека нет в offer. Повторять бессмысленно, offer надо отклонить.
    #[error("no {kind} codec named {name} found")]
    CodecNotFound { kind: CodecKind, name: String },
    #[error("failed to create peer connection: {0}")]
    ConnectionCreation(#[source] EngineError),
    #[error("failed to create {kind} track: {source}")]
    TrackCreation {
        kind: CodecKind,
        #[source]
        source: EngineError,
    },
    #[error("failed to add {kind} transceiver: {source}")]
    Transceiver {
        kind: CodecKind,
        #[source]
        source: EngineError,
    },
    #[error("remote description rejected: {0}")]
    Negotiation(#[source] EngineError),
    #[error("failed to create answer: {0}")]
    AnswerGeneration(#[source] EngineError),
    #[error("failed to set local description: {0}")]
    LocalDescription(#[source] EngineError),
    #[error("session already negotiated (state: {0})")]
    ConcurrentNegotiation(crate::session::SessionState),

    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid signaling payload: {0}")]
    Payload(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Payload(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::Payload(e.to_string())
    }
}
