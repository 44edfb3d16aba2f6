//! Согласование send-only WebRTC сессии: offer удалённого пира на входе,
//! answer с одним видео и одним аудио треком на выходе.

pub mod config;
pub mod error;
pub mod logger;
pub mod peer;
pub mod session;
pub mod signaling;
pub mod streamer;
pub mod utils;

pub use config::StreamerConfig;
pub use error::{Error, Result};
pub use peer::{CodecDescriptor, CodecKind, LocalTrack, SdpPayload, ServerConfig};
pub use session::{Session, SessionState};
pub use streamer::Streamer;
