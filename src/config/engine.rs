use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEFAULT_DUST_THRESHOLD_SATOSHIS;

/// Options consumed by the net-flow engine itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowEngineConfig {
    /// Minimum `|net effect|` for a transaction to appear in the graph (inclusive)
    pub dust_threshold_satoshis: u64,
    /// Drop confirmed transactions older than this many days
    pub time_window_days: Option<u32>,
}

impl Default for FlowEngineConfig {
    fn default() -> Self {
        Self {
            dust_threshold_satoshis: DEFAULT_DUST_THRESHOLD_SATOSHIS,
            time_window_days: None,
        }
    }
}
