//! Server configuration read from `AZNER_*` environment variables.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_TEXT_BYTES: usize = 1 << 20;
pub const DEFAULT_LOG: &str = "info";
pub const DEFAULT_EVENT_DELAY_MS: u64 = 35;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Requests with more text than this are rejected with 413.
    pub max_text_bytes: usize,
    /// Log filter used when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Pause between WebSocket events, for the step-by-step view.
    pub event_delay: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing keys take their default,
    /// present but malformed values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let addr = lookup("AZNER_ADDR")
            .unwrap_or_else(|| DEFAULT_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("AZNER_ADDR must be a socket address like 0.0.0.0:3000")?;

        let max_text_bytes = match lookup("AZNER_MAX_TEXT_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .with_context(|| format!("AZNER_MAX_TEXT_BYTES is not a byte count: {v:?}"))?,
            None => DEFAULT_MAX_TEXT_BYTES,
        };

        let event_delay_ms = match lookup("AZNER_EVENT_DELAY_MS") {
            Some(v) => v
                .parse::<u64>()
                .with_context(|| format!("AZNER_EVENT_DELAY_MS is not a number of milliseconds: {v:?}"))?,
            None => DEFAULT_EVENT_DELAY_MS,
        };

        Ok(Self {
            addr,
            max_text_bytes,
            log_filter: lookup("AZNER_LOG").unwrap_or_else(|| DEFAULT_LOG.to_string()),
            event_delay: Duration::from_millis(event_delay_ms),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
            log_filter: DEFAULT_LOG.to_string(),
            event_delay: Duration::from_millis(DEFAULT_EVENT_DELAY_MS),
        }
    }
}
