/// ======================= Units =======================
/// Satoshis per bitcoin
pub const SATS_PER_BTC: u64 = 100_000_000;

/// ======================= Engine defaults =======================
/// Standard relay dust limit for a P2PKH output, used as the default significance threshold
pub const DEFAULT_DUST_THRESHOLD_SATOSHIS: u64 = 546;

/// Number of most recent transactions fetched per queried address
pub const DEFAULT_MAX_TRANSACTIONS_PER_QUERY: usize = 10;

/// Characters kept when shortening an address for display
pub const ADDRESS_LABEL_LENGTH: usize = 12;

/// ======================= Classification =======================
/// Below this absolute input/output difference a multi-input transaction is a consolidation
pub const CONSOLIDATION_TOLERANCE_SATOSHIS: u64 = 1_000;

/// Distinct input or output addresses above which a transaction looks like an exchange batch
pub const EXCHANGE_BATCH_ADDRESS_COUNT: usize = 10;

/// Distinct output addresses above which a transaction looks like a mixer
pub const MIXING_OUTPUT_ADDRESS_COUNT: usize = 50;

/// Raw output count above which the risk score is raised
pub const HIGH_OUTPUT_COUNT: usize = 20;

/// Fee above which the risk score is raised (0.001 BTC)
pub const HIGH_FEE_SATOSHIS: u64 = 100_000;

pub const MAX_RISK_SCORE: u8 = 5;

/// ======================= Esplora =======================
/// Blockstream Esplora API base URL - public endpoint, not a secret
pub const DEFAULT_ESPLORA_URL: &str = "https://blockstream.info/api";

/// Confirmed transactions returned per `/txs/chain` page
pub const ESPLORA_CHAIN_PAGE_SIZE: usize = 25;

pub const DEFAULT_USER_AGENT: &str = concat!("mizan/", env!("CARGO_PKG_VERSION"));

/// Requests per second; Esplora documents a ceiling around this value
pub const DEFAULT_RATE_LIMIT: usize = 10;

/// ======================= Environment overrides =======================
pub const ENV_DUST_THRESHOLD: &str = "MIZAN_DUST_THRESHOLD_SATOSHIS";
pub const ENV_MAX_TRANSACTIONS: &str = "MIZAN_MAX_TRANSACTIONS_PER_QUERY";
pub const ENV_ESPLORA_URL: &str = "MIZAN_ESPLORA_URL";
