// src/config.rs
use anyhow::{Context, Result};
use reqwest::Client;
use std::{env, time::Duration};
use url::Url;

/// Google Sheets document holding the season calendar.
pub const SHEET_ID: &str = "1YlWC_x_ZZtR22p-R1bI_Nvl015bbE7ge";
/// Tab inside the document.
pub const SHEET_GID: &str = "1957947665";
/// Text that only appears in the header row.
pub const HEADER_MARKER: &str = "קבוצות משתתפות";

pub const CACHE_TTL: Duration = Duration::from_secs(300);
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);

static EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetConfig {
    pub sheet_id: String,
    pub gid: String,
    pub marker: String,
    pub cache_ttl: Duration,
    pub timeout: Duration,
    /// Extra attempts after the first failed request. Zero disables retrying.
    pub retries: u32,
    pub retry_backoff: Duration,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            sheet_id: SHEET_ID.to_string(),
            gid: SHEET_GID.to_string(),
            marker: HEADER_MARKER.to_string(),
            cache_ttl: CACHE_TTL,
            timeout: FETCH_TIMEOUT,
            retries: 0,
            retry_backoff: RETRY_BACKOFF,
        }
    }
}

impl SheetConfig {
    /// Defaults, overridden by `SHEET_ID`, `SHEET_GID`, `FETCH_TIMEOUT_SECS`
    /// and `FETCH_RETRIES` when set. Only the binaries call this.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Ok(id) = env::var("SHEET_ID") {
            cfg.sheet_id = id;
        }
        if let Ok(gid) = env::var("SHEET_GID") {
            cfg.gid = gid;
        }
        if let Ok(secs) = env::var("FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .with_context(|| format!("FETCH_TIMEOUT_SECS={:?} is not a number", secs))?;
            cfg.timeout = Duration::from_secs(secs);
        }
        if let Ok(n) = env::var("FETCH_RETRIES") {
            cfg.retries = n
                .parse()
                .with_context(|| format!("FETCH_RETRIES={:?} is not a number", n))?;
        }
        Ok(cfg)
    }

    /// `.../spreadsheets/d/{sheet_id}/export?format=xlsx&gid={gid}`
    pub fn export_url(&self) -> Result<Url> {
        let mut url = Url::parse(EXPORT_BASE)?
            .join(&format!("{}/export", self.sheet_id))
            .with_context(|| format!("building export URL for sheet {}", self.sheet_id))?;
        url.query_pairs_mut()
            .append_pair("format", "xlsx")
            .append_pair("gid", &self.gid);
        Ok(url)
    }

    pub fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .build()
            .context("building HTTP client")
    }
}
