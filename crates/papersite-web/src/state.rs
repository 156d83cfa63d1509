use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::Semaphore;

use papersite_core::config_file::ConfigFile;
use papersite_ingest::Ingestor;

pub const DEFAULT_ADDR: &str = "0.0.0.0:5001";
pub const DEFAULT_MAX_CONCURRENT_DECODES: usize = 4;
pub const DEFAULT_DECODE_TIMEOUT_SECS: u64 = 60;

/// Server knobs resolved from the merged config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub max_concurrent_decodes: usize,
    pub decode_timeout: Duration,
}

impl ServerSettings {
    pub fn from_config(config: &ConfigFile) -> anyhow::Result<Self> {
        let server = config.server.clone().unwrap_or_default();
        let addr_str = server.addr.as_deref().unwrap_or(DEFAULT_ADDR);
        let addr = addr_str
            .parse()
            .with_context(|| format!("invalid bind address {addr_str:?}"))?;

        Ok(Self {
            addr,
            max_concurrent_decodes: server
                .max_concurrent_decodes
                .unwrap_or(DEFAULT_MAX_CONCURRENT_DECODES)
                .max(1),
            decode_timeout: Duration::from_secs(
                server
                    .decode_timeout_secs
                    .unwrap_or(DEFAULT_DECODE_TIMEOUT_SECS),
            ),
        })
    }
}

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub ingestor: Arc<Ingestor>,
    /// Bounds how many uploads are decoded at once.
    pub decode_permits: Arc<Semaphore>,
    pub decode_timeout: Duration,
}

impl AppState {
    pub fn new(ingestor: Ingestor, max_concurrent_decodes: usize, decode_timeout: Duration) -> Self {
        Self {
            ingestor: Arc::new(ingestor),
            decode_permits: Arc::new(Semaphore::new(max_concurrent_decodes)),
            decode_timeout,
        }
    }
}
