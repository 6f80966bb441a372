use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, REFERER};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::FetchSettings;
use crate::model::raw::RawSnapshot;

use super::rate_limit::RateLimiter;
use super::{ChainSource, FetchError, backoff_delay};

/// Symbols served by the index option-chain endpoint.
const INDEX_SYMBOLS: &[&str] = &["NIFTY", "BANKNIFTY", "FINNIFTY", "MIDCPNIFTY", "NIFTYNXT50"];

/// Live option-chain client for the NSE public API.
///
/// The API rejects requests without session cookies, so the client first
/// loads the site root, then keeps the cookie jar until a 401/403 forces
/// a refresh.
pub struct NseClient {
    client: reqwest::Client,
    settings: FetchSettings,
    limiter: RateLimiter,
    session_ready: Mutex<bool>,
}

impl NseClient {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        if let Ok(referer) = HeaderValue::from_str(&format!("{}/option-chain", settings.base_url)) {
            headers.insert(REFERER, referer);
        }

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        let limiter = RateLimiter::from_secs(settings.min_delay_secs, settings.max_delay_secs);

        Ok(Self {
            client,
            settings,
            limiter,
            session_ready: Mutex::new(false),
        })
    }

    /// API URL for a symbol: indices and equities live on separate routes.
    pub fn endpoint(&self, symbol: &str) -> String {
        let kind = if is_index(symbol) { "indices" } else { "equities" };
        format!("{}/api/option-chain-{kind}", self.settings.base_url.trim_end_matches('/'))
    }

    async fn ensure_session(&self) -> Result<(), FetchError> {
        let mut ready = self.session_ready.lock().await;
        if *ready {
            return Ok(());
        }

        self.limiter.wait().await;
        let response = self.client.get(&self.settings.base_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                symbol: "<session>".to_string(),
                status: status.as_u16(),
            });
        }

        info!(base_url = %self.settings.base_url, "session cookies established");
        *ready = true;
        Ok(())
    }

    async fn invalidate_session(&self) {
        *self.session_ready.lock().await = false;
    }
}

#[async_trait]
impl ChainSource for NseClient {
    async fn fetch_option_chain(&self, symbol: &str) -> Result<RawSnapshot, FetchError> {
        let url = self.endpoint(symbol);
        let mut attempt = 0u32;

        loop {
            self.ensure_session().await?;
            self.limiter.wait().await;
            debug!(symbol, %url, attempt, "requesting option chain");

            let response = match self
                .client
                .get(&url)
                .query(&[("symbol", symbol)])
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if attempt < self.settings.max_retries => {
                    let delay = backoff_delay(attempt);
                    warn!(symbol, error = %e, retry_in_secs = delay.as_secs(), "request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            match response.status() {
                status if status.is_success() => {
                    let body = response.bytes().await?;
                    let raw = serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                        symbol: symbol.to_string(),
                        source,
                    })?;
                    info!(symbol, bytes = body.len(), "fetched option chain");
                    return Ok(raw);
                }
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    self.invalidate_session().await;
                    if attempt >= self.settings.max_retries {
                        return Err(FetchError::Unauthorized {
                            symbol: symbol.to_string(),
                        });
                    }
                    warn!(symbol, status = response.status().as_u16(), "session rejected, refreshing cookies");
                    attempt += 1;
                }
                status => {
                    return Err(FetchError::Status {
                        symbol: symbol.to_string(),
                        status: status.as_u16(),
                    });
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "nse"
    }
}

fn is_index(symbol: &str) -> bool {
    INDEX_SYMBOLS.iter().any(|s| s.eq_ignore_ascii_case(symbol))
}
