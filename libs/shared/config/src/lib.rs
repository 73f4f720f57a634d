use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    /// Capacity of each change-feed broadcast channel in the store.
    pub feed_channel_capacity: usize,
    /// Capacity of each per-collection fan-out channel in the sync hub.
    pub fanout_channel_capacity: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| {
                    warn!("PORT not set or invalid, using default 3000");
                    3000
                }),
            feed_channel_capacity: env::var("FEED_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(256),
            fanout_channel_capacity: env::var("FANOUT_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(64),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            feed_channel_capacity: 256,
            fanout_channel_capacity: 64,
        }
    }
}
