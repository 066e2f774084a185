use std::time::Duration;

use rand::Rng;

use crate::constants::ADDRESS_LABEL_LENGTH;
use crate::constants::SATS_PER_BTC;

pub fn sats_to_btc(sats: u64) -> f64 {
    sats as f64 / SATS_PER_BTC as f64
}

/// Signed variant used for balances
pub fn signed_sats_to_btc(sats: i64) -> f64 {
    sats as f64 / SATS_PER_BTC as f64
}

/// Shorten an address for display, e.g. `bc1qxy2kgdyg...`
pub fn short_label(address: &str) -> String {
    match address.char_indices().nth(ADDRESS_LABEL_LENGTH) {
        Some((idx, _)) => format!("{}...", &address[..idx]),
        None => address.to_string(),
    }
}

/// Calculate exponential backoff with jitter
pub fn calculate_backoff_with_jitter(
    attempt: usize,
    base_delay_ms: u64,
    max_delay_ms: u64,
) -> Duration {
    // Exponential backoff: delay = base * 2^attempt
    let exponential_delay = base_delay_ms.saturating_mul(2u64.saturating_pow(attempt as u32));

    let capped_delay = exponential_delay.min(max_delay_ms);

    // Add jitter (±25% of the delay)
    let jitter_range = (capped_delay as f64 * 0.25) as u64;
    let jitter = rand::rng().random_range(0..=jitter_range * 2);
    let final_delay = capped_delay.saturating_add(jitter).saturating_sub(jitter_range);

    Duration::from_millis(final_delay)
}

/// Rate limit and server-side failures are worth another attempt
pub fn is_retryable_status(status: u16) -> bool {
    status == 429 || status == 408 || (500..=599).contains(&status)
}
