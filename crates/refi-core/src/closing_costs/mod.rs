pub mod summary;
pub mod taxonomy;

pub use summary::{analyze_closing_costs, summarize_closing_costs, ClosingCostSummary};
pub use taxonomy::{FeeDefinition, FeeGroup, FeeRecord, FeeTaxonomy};
