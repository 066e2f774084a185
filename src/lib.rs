pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod explorer;
pub mod model;
pub mod source;
pub mod tracing;
pub mod utils;

pub use engine::FlowAnalysis;
pub use engine::NetFlowEngine;
pub use engine::SkipReason;
pub use engine::build_flow_graph;
pub use error::FetchError;
pub use error::FlowError;
pub use error::Result;
pub use explorer::Explorer;
pub use crate::tracing::setup_tracing;
