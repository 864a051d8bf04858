//! Data models shared across the aggregator.
//!
//! Stored documents use snake_case field names; optional fields default to
//! `None` so older documents still deserialize.

mod envelope;
mod history;
mod paper;
mod request;
pub mod timestamp;

pub use envelope::{QueryInfo, SearchResultEnvelope};
pub use history::SearchHistoryEntry;
pub use paper::{CanonicalPaper, PaperSource};
pub use request::SearchRequest;
