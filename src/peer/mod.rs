pub mod capabilities;
pub mod connection;
pub mod engine;
pub mod track;
pub mod types;

pub use connection::{WebRtcConnection, WebRtcEngine};
pub use engine::{LocalTrack, PeerConnection, StateObserver, TransportEngine};
pub use track::WebRtcTrack;
pub use types::{CodecDescriptor, CodecKind, SdpPayload, ServerConfig};
