use crate::peer::types::ServerConfig;
use rand::Rng;

pub fn random_id() -> String {
    hex::encode(rand::rng().random::<[u8; 8]>())
}

// Функция для добавления схемы протокола к URL ICE сервера, если она отсутствует
pub fn add_ice_url_scheme(config: &ServerConfig) -> String {
    // Если url уже начинается с "turn:" или "stun:", возвращаем как есть
    if config.url.starts_with("turn:")
        || config.url.starts_with("turns:")
        || config.url.starts_with("stun:")
        || config.url.starts_with("stuns:")
    {
        config.url.clone()
    } else {
        // В зависимости от типа сервера добавляем нужную схему
        let scheme = if config.r#type == "turn" {
            "turn:"
        } else {
            "stun:"
        };
        format!("{}{}", scheme, config.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(r#type: &str, url: &str) -> ServerConfig {
        ServerConfig {
            id: "s".into(),
            r#type: r#type.into(),
            url: url.into(),
            username: None,
            credential: None,
        }
    }

    #[test]
    fn test_add_ice_url_scheme() {
        assert_eq!(add_ice_url_scheme(&server("stun", "stun.l.google.com:19302")), "stun:stun.l.google.com:19302");
        assert_eq!(add_ice_url_scheme(&server("turn", "relay:3478")), "turn:relay:3478");
        assert_eq!(add_ice_url_scheme(&server("turn", "turns:relay:5349")), "turns:relay:5349");
        assert_eq!(add_ice_url_scheme(&server("stun", "stun:already")), "stun:already");
    }

    #[test]
    fn test_random_id_is_hex() {
        let id = random_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
