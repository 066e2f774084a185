pub mod address;
pub mod batch;
pub mod category;
pub mod export;
pub mod flow;
pub mod transaction;

pub use address::AddressSummary;
pub use batch::DecodedBatch;
pub use batch::RejectedRecord;
pub use category::TransactionCategory;
pub use category::TransactionProfile;
pub use export::ExportEdge;
pub use export::ExportNode;
pub use export::GraphExport;
pub use export::NodeKind;
pub use flow::CandidateRole;
pub use flow::CounterpartyCandidate;
pub use flow::Direction;
pub use flow::EdgeKey;
pub use flow::FlowContribution;
pub use flow::FlowEdge;
pub use flow::FlowGraph;
pub use flow::NetEffect;
pub use transaction::TransactionRecord;
pub use transaction::TxEntry;
