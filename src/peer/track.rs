use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use webrtc::media::Sample;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;
use webrtc::track::track_local::TrackLocal;

use crate::peer::engine::{EngineResult, LocalTrack};
use crate::peer::types::CodecKind;

/// Локальный send-only трек.
///
/// `ssrc` выбирает Streamer; на проводе webrtc-rs ставит SSRC своего RTP sender.
pub struct WebRtcTrack {
    inner: Arc<TrackLocalStaticSample>,
    kind: CodecKind,
    ssrc: u32,
    payload_type: u8,
}

impl WebRtcTrack {
    pub(crate) fn new(
        inner: Arc<TrackLocalStaticSample>,
        kind: CodecKind,
        ssrc: u32,
        payload_type: u8,
    ) -> Self {
        WebRtcTrack {
            inner,
            kind,
            ssrc,
            payload_type,
        }
    }

    pub fn sample_track(&self) -> Arc<TrackLocalStaticSample> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl LocalTrack for WebRtcTrack {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn kind(&self) -> CodecKind {
        self.kind
    }

    fn ssrc(&self) -> u32 {
        self.ssrc
    }

    fn payload_type(&self) -> u8 {
        self.payload_type
    }

    async fn write_sample(&self, data: Bytes, duration: Duration) -> EngineResult<()> {
        self.inner
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await?;
        Ok(())
    }
}
