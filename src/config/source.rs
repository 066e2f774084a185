use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_ESPLORA_URL;
use crate::constants::DEFAULT_MAX_TRANSACTIONS_PER_QUERY;
use crate::constants::DEFAULT_RATE_LIMIT;
use crate::constants::DEFAULT_USER_AGENT;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EsploraConfig {
    pub base_url: String,
    pub max_transactions_per_query: usize,
    pub rate_limit: usize, // requests per second
    pub timeout_ms: u64,
    pub max_attempts: usize, // total tries per request, first one included
    pub base_retry_delay_ms: u64,
    pub max_retry_delay_ms: u64,
    pub cache_ttl_secs: u64, // 0 disables the response cache
    pub user_agent: String,
}

impl Default for EsploraConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_ESPLORA_URL.to_string(),
            max_transactions_per_query: DEFAULT_MAX_TRANSACTIONS_PER_QUERY,
            rate_limit: DEFAULT_RATE_LIMIT,
            timeout_ms: 15_000,
            max_attempts: 3,
            base_retry_delay_ms: 500,
            max_retry_delay_ms: 10_000,
            cache_ttl_secs: 300,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
