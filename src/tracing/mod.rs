pub mod file;
pub mod filter;
pub mod format;

pub use file::LogGuards;
pub use file::setup_tracing;
