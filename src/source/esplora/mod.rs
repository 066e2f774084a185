pub mod model;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tracing::error;
use tracing::warn;
use url::Url;

use self::model::EsploraAddress;
use self::model::EsploraTransaction;
use super::TransactionSource;
use super::cache::ResponseCache;
use super::rate_limit::RateLimiter;
use crate::config::EsploraConfig;
use crate::constants::ESPLORA_CHAIN_PAGE_SIZE;
use crate::error::FetchError;
use crate::model::AddressSummary;
use crate::model::DecodedBatch;
use crate::model::TransactionRecord;
use crate::model::batch::decode_each;
use crate::utils::calculate_backoff_with_jitter;

/// Transaction source backed by an Esplora-compatible block explorer
/// (blockstream.info, mempool.space or a self-hosted electrs)
#[derive(Debug)]
pub struct EsploraClient {
    http: reqwest::Client,
    base_url: Url,
    config: Arc<EsploraConfig>,
    rate_limiter: RateLimiter,
    cache: ResponseCache<(String, usize), Vec<TransactionRecord>>,
}

impl EsploraClient {
    pub fn new(config: EsploraConfig) -> Result<Self, FetchError> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            http,
            base_url,
            rate_limiter: RateLimiter::new(config.rate_limit),
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &EsploraConfig {
        &self.config
    }

    fn endpoint(
        &self,
        segments: &[&str],
    ) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// GET with client-side rate limiting and retry on transient failures
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T, FetchError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;
            debug!("esplora_request::url::{}::attempt::{}", url, attempt + 1);

            match self.try_get_json(&url).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt + 1 < max_attempts => {
                    let backoff_delay = calculate_backoff_with_jitter(
                        attempt,
                        self.config.base_retry_delay_ms,
                        self.config.max_retry_delay_ms,
                    );
                    warn!(
                        "esplora_request_failed::retrying_after_backoff::attempt::{}::delay_ms::{}::error::{}",
                        attempt + 1,
                        backoff_delay.as_millis(),
                        e
                    );
                    tokio::time::sleep(backoff_delay).await;
                    attempt += 1;
                },
                Err(FetchError::Status { status: 429, .. }) => {
                    error!("esplora_rate_limited::url::{}::attempts::{}", url, attempt + 1);
                    return Err(FetchError::RateLimited { attempts: attempt + 1 });
                },
                Err(e) => {
                    error!("esplora_request_failed::url::{}::error::{}", url, e);
                    return Err(e);
                },
            }
        }
    }

    async fn try_get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
    ) -> Result<T, FetchError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND || status == StatusCode::BAD_REQUEST {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::InvalidAddress(body.trim().to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// Most recent transactions first: the `/txs` page (mempool plus newest
    /// confirmed), then `/txs/chain/:last_seen` pages until `limit` is reached.
    /// A transaction that fails to decode is dropped on its own.
    async fn fetch_pages(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<EsploraTransaction>, FetchError> {
        let mut collected: Vec<EsploraTransaction> = Vec::new();
        let mut url = self.endpoint(&["address", address, "txs"])?;

        loop {
            let values: Vec<Value> = self.get_json(url).await?;
            let (confirmed_in_page, last_seen) = page_cursor(&values);

            let page: DecodedBatch<EsploraTransaction> = decode_each(values, "txid");
            for rejected in &page.rejected {
                warn!(
                    "esplora_transaction_dropped::address::{}::txid::{}::reason::{}",
                    address, rejected.transaction_id, rejected.reason
                );
            }
            debug!(
                "esplora_page_fetched::address::{}::count::{}::dropped::{}",
                address,
                page.records.len(),
                page.rejected.len()
            );
            collected.extend(page.records);

            if collected.len() >= limit || confirmed_in_page < ESPLORA_CHAIN_PAGE_SIZE {
                break;
            }
            let Some(last_seen) = last_seen else {
                break;
            };
            url = self.endpoint(&["address", address, "txs", "chain", &last_seen])?;
        }

        collected.truncate(limit);
        Ok(collected)
    }
}

/// Confirmed count and last confirmed txid of a raw page, dropped transactions included
fn page_cursor(values: &[Value]) -> (usize, Option<String>) {
    let confirmed: Vec<&Value> = values
        .iter()
        .filter(|value| value.pointer("/status/confirmed").and_then(Value::as_bool).unwrap_or(false))
        .collect();
    let last_seen = confirmed
        .last()
        .and_then(|value| value.get("txid"))
        .and_then(Value::as_str)
        .map(str::to_string);
    (confirmed.len(), last_seen)
}

#[async_trait]
impl TransactionSource for EsploraClient {
    async fn fetch_transactions(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, FetchError> {
        let cache_key = (address.to_string(), limit);
        if let Some(cached) = self.cache.get(&cache_key).await {
            debug!("esplora_cache_hit::address::{}::limit::{}", address, limit);
            return Ok(cached);
        }

        let transactions: Vec<TransactionRecord> = self
            .fetch_pages(address, limit)
            .await?
            .into_iter()
            .map(TransactionRecord::from)
            .collect();
        debug!("fetched_transactions::address::{}::count::{}", address, transactions.len());

        self.cache.insert(cache_key, transactions.clone()).await;
        Ok(transactions)
    }

    async fn fetch_address_summary(
        &self,
        address: &str,
    ) -> Result<AddressSummary, FetchError> {
        let info: EsploraAddress = self.get_json(self.endpoint(&["address", address])?).await?;
        Ok(AddressSummary::from(info))
    }
}
