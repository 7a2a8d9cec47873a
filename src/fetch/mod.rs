// src/fetch/mod.rs
pub mod cache;

use reqwest::Client;
use std::{path::Path, sync::Arc, time::Duration};
use tokio::time::{sleep, Instant};
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::config::SheetConfig;
use crate::error::{CalendarError, Result};
use crate::process::RawSheet;
pub use cache::TtlCache;

/// Single GET, mapping transport failures and non-2xx statuses.
async fn get_bytes_core(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let resp = client
        .get(url.clone())
        .send()
        .await
        .map_err(|source| CalendarError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = resp.status();
    if !status.is_success() {
        return Err(CalendarError::Status {
            url: url.to_string(),
            status,
        });
    }

    let bytes = resp.bytes().await.map_err(|source| CalendarError::Fetch {
        url: url.to_string(),
        source,
    })?;
    Ok(bytes.to_vec())
}

/// Longest pause between two attempts.
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Delay before retry number `attempt` (1-based): `initial * 2^(attempt-1)`,
/// capped at [`MAX_BACKOFF`].
fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    initial.saturating_mul(factor).min(MAX_BACKOFF)
}

/// GET with up to `max_retries` extra attempts and doubling backoff.
pub async fn get_bytes_with_retry(
    client: &Client,
    url: &Url,
    max_retries: u32,
    initial_backoff: Duration,
) -> Result<Vec<u8>> {
    let mut attempts = 0;
    loop {
        match get_bytes_core(client, url).await {
            Ok(bytes) => return Ok(bytes),
            Err(e) if attempts < max_retries => {
                attempts += 1;
                let backoff = backoff_delay(initial_backoff, attempts);
                warn!(%url, attempt = attempts, delay_ms = backoff.as_millis() as u64, error = %e, "Retrying");
                sleep(backoff).await;
            }
            Err(e) => {
                if max_retries > 0 {
                    error!(%url, error = %e, "Exhausted retries");
                }
                return Err(e);
            }
        }
    }
}

/// Downloads the sheet export and keeps the parsed result for one TTL window.
pub struct SheetLoader {
    client: Client,
    url: Url,
    ttl: Duration,
    retries: u32,
    retry_backoff: Duration,
    cache: Arc<TtlCache<(), Arc<RawSheet>>>,
}

impl SheetLoader {
    pub fn new(client: Client, url: Url, ttl: Duration) -> Self {
        Self {
            client,
            url,
            ttl,
            retries: 0,
            retry_backoff: Duration::from_millis(500),
            cache: Arc::new(TtlCache::new()),
        }
    }

    pub fn from_config(config: &SheetConfig) -> anyhow::Result<Self> {
        let url = config.export_url()?;
        let client = config.http_client()?;
        Ok(Self::new(client, url, config.cache_ttl)
            .with_retries(config.retries, config.retry_backoff))
    }

    pub fn with_retries(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.retry_backoff = backoff;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The cached sheet, fetching and parsing it when the slot is cold or stale.
    #[instrument(level = "info", skip(self), fields(url = %self.url))]
    pub async fn load(&self) -> Result<Arc<RawSheet>> {
        self.cache
            .get_or_fetch((), self.ttl, || async {
                let start = Instant::now();
                let bytes =
                    get_bytes_with_retry(&self.client, &self.url, self.retries, self.retry_backoff)
                        .await?;
                let sheet = RawSheet::from_xlsx(&bytes)?;
                info!(
                    bytes = bytes.len(),
                    rows = sheet.len(),
                    elapsed = ?start.elapsed(),
                    "fetched sheet"
                );
                Ok::<_, CalendarError>(Arc::new(sheet))
            })
            .await
    }

    /// Drop the cached sheet so the next `load` goes to the network.
    pub async fn refresh(&self) {
        self.cache.clear().await;
    }
}

/// Read a local export when `file` is given, otherwise go through the loader.
pub async fn load_sheet(loader: &SheetLoader, file: Option<&Path>) -> Result<Arc<RawSheet>> {
    match file {
        Some(path) => Ok(Arc::new(RawSheet::open(path)?)),
        None => loader.load().await,
    }
}
