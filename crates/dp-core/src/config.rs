//! Runtime datapath configuration.
//!
//! `N` (the table count) is a build-time constant (`constants::NUM_TABLES`);
//! these two flags are the only pieces of pipeline behavior spec.md
//! documents as runtime-configurable (§4.1, §5).

use std::env;

use once_cell::sync::Lazy;

/// Sentinel for "do not buffer", used against `miss_send_len` (§5).
pub const NO_BUFFER: u32 = 0xFFFF_FFFF;

#[derive(Debug, Clone, Copy)]
pub struct DatapathConfig {
    /// When set, a TTL-invalid packet is punted to the controller instead
    /// of silently dropped (§4.1).
    pub invalid_ttl_to_controller: bool,
    /// `NO_BUFFER` disables buffering on controller punt.
    pub miss_send_len: u32,
}

impl Default for DatapathConfig {
    fn default() -> Self {
        Self { invalid_ttl_to_controller: true, miss_send_len: NO_BUFFER }
    }
}

impl DatapathConfig {
    /// Loads overrides from the environment (optionally via a `.env` file),
    /// falling back to [`DatapathConfig::default`] for anything unset or
    /// unparseable. Tests never need an environment; this is only exercised
    /// by the demo binary.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();

        if let Ok(raw) = env::var("DP_INVALID_TTL_TO_CONTROLLER") {
            if let Ok(parsed) = raw.parse::<bool>() {
                config.invalid_ttl_to_controller = parsed;
            }
        }
        if let Ok(raw) = env::var("DP_MISS_SEND_LEN") {
            if let Ok(parsed) = raw.parse::<u32>() {
                config.miss_send_len = parsed;
            }
        }

        config
    }
}

static DEFAULT: Lazy<DatapathConfig> = Lazy::new(DatapathConfig::from_env);

/// Process-wide default config, lazily loaded from the environment once.
pub fn shared() -> &'static DatapathConfig {
    &DEFAULT
}
