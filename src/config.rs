// Конфигурация стримера
// Логирование можно отключить только в режиме разработки

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::configuration::RTCConfiguration;

use crate::error::{Error, Result};
use crate::peer::types::ServerConfig;
use crate::utils::add_ice_url_scheme;

#[cfg(debug_assertions)]
pub const LOGGING_ENABLED: bool = true; // В режиме отладки логирование включено

#[cfg(not(debug_assertions))]
pub const LOGGING_ENABLED: bool = false; // В продакшене логирование отключено

pub const DEFAULT_STUN_URL: &str = "stun:stun.l.google.com:19302";

/// Имена кодеков как в `a=rtpmap`, сравнение регистрозависимое
pub const DEFAULT_VIDEO_CODEC: &str = "H264";
pub const DEFAULT_AUDIO_CODEC: &str = "opus";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct StreamerConfig {
    pub ice_servers: Vec<ServerConfig>,
    pub video_codec: String,
    pub audio_codec: String,
    pub video_label: String,
    pub audio_label: String,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        StreamerConfig {
            ice_servers: vec![ServerConfig {
                id: "default-stun".into(),
                r#type: "stun".into(),
                url: DEFAULT_STUN_URL.into(),
                username: None,
                credential: None,
            }],
            video_codec: DEFAULT_VIDEO_CODEC.into(),
            audio_codec: DEFAULT_AUDIO_CODEC.into(),
            video_label: "video".into(),
            audio_label: "audio".into(),
        }
    }
}

impl StreamerConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: StreamerConfig =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        for server in &self.ice_servers {
            if server.url.is_empty() {
                return Err(Error::Config(format!("ICE server {} has an empty URL", server.id)));
            }

            if server.r#type == "turn" && (server.username.is_none() || server.credential.is_none())
            {
                return Err(Error::Config(format!(
                    "TURN server {} requires username and credential",
                    server.id
                )));
            }
        }

        if self.video_codec.is_empty() || self.audio_codec.is_empty() {
            return Err(Error::Config("codec names cannot be empty".into()));
        }
        Ok(())
    }

    /// Конфигурация для peer connection.
    ///
    /// Пустой список серверов заменяется STUN по умолчанию.
    pub fn rtc_configuration(&self) -> RTCConfiguration {
        let mut ice_servers: Vec<RTCIceServer> = self
            .ice_servers
            .iter()
            .map(|config| RTCIceServer {
                urls: vec![add_ice_url_scheme(config)],
                username: config.username.clone().unwrap_or_default(),
                credential: config.credential.clone().unwrap_or_default(),
            })
            .collect();

        if ice_servers.is_empty() {
            debug!("No ICE servers configured, using {DEFAULT_STUN_URL}");
            ice_servers.push(RTCIceServer {
                urls: vec![DEFAULT_STUN_URL.to_owned()],
                username: String::new(),
                credential: String::new(),
            });
        }

        RTCConfiguration {
            ice_servers,
            ..Default::default()
        }
    }
}
