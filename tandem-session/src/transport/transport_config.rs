use std::env;

#[derive(Debug, Clone)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// ICE server configuration for the peer connection.
#[derive(Clone)]
pub struct TransportConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl TransportConfig {
    /// Read STUN/TURN settings from the environment
    /// (`TANDEM_STUN_URL`, `TANDEM_TURN_URL`, `TANDEM_TURN_USERNAME`,
    /// `TANDEM_TURN_CREDENTIAL`). Missing variables fall back to the
    /// default STUN server.
    pub fn from_env() -> Self {
        let mut ice_servers = vec![IceServerConfig {
            urls: vec![
                env::var("TANDEM_STUN_URL")
                    .unwrap_or_else(|_| "stun:stun.l.google.com:19302".to_owned()),
            ],
            username: None,
            credential: None,
        }];

        if let Ok(turn_url) = env::var("TANDEM_TURN_URL") {
            ice_servers.push(IceServerConfig {
                urls: vec![turn_url],
                username: env::var("TANDEM_TURN_USERNAME").ok(),
                credential: env::var("TANDEM_TURN_CREDENTIAL").ok(),
            });
        }

        Self { ice_servers }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec!["stun:stun.l.google.com:19302".to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}
