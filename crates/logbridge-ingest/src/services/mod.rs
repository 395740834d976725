//! Per-message transforms and the batch processor.

mod detail;
mod exception;
mod ingestion;
mod location;

pub use detail::{DetailBlockBuilder, DetailBlockError, DEFAULT_DETAIL_BLOCK_CAP};
pub use exception::reconstruct_exception;
pub use ingestion::LogIngestionService;
pub use location::resolve_location;
