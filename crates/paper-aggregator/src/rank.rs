//! Merge & rank engine.
//!
//! Pure functions, no I/O:
//! 1. concatenate provider lists in registration order
//! 2. drop records whose known year falls outside the requested bounds
//! 3. stable sort by citation count, descending
//! 4. truncate to the limit

use std::cmp::Reverse;

use crate::models::{CanonicalPaper, PaperSource, SearchRequest};

/// Year bounds and limit applied after fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankOptions {
    /// Inclusive lower year bound.
    pub year_from: Option<i32>,
    /// Inclusive upper year bound.
    pub year_to: Option<i32>,
    /// Maximum records kept.
    pub limit: usize,
}

impl From<&SearchRequest> for RankOptions {
    fn from(request: &SearchRequest) -> Self {
        Self {
            year_from: request.year_from,
            year_to: request.year_to,
            limit: request.effective_limit(),
        }
    }
}

/// Concatenate, filter, rank and truncate.
#[must_use]
pub fn merge_and_rank<I>(lists: I, options: RankOptions) -> Vec<CanonicalPaper>
where
    I: IntoIterator<Item = (PaperSource, Vec<CanonicalPaper>)>,
{
    let merged = lists.into_iter().flat_map(|(_, papers)| papers);
    let mut papers = filter_years(merged, options.year_from, options.year_to);
    rank_by_citations(&mut papers);
    papers.truncate(options.limit);
    papers
}

/// Keep records with an unknown year or a year inside `[from, to]`.
#[must_use]
pub fn filter_years<I>(papers: I, from: Option<i32>, to: Option<i32>) -> Vec<CanonicalPaper>
where
    I: IntoIterator<Item = CanonicalPaper>,
{
    papers.into_iter().filter(|p| !p.outside_years(from, to)).collect()
}

/// Sort by citation count, highest first. Ties keep their current order.
pub fn rank_by_citations(papers: &mut [CanonicalPaper]) {
    // sort_by_key is stable
    papers.sort_by_key(|p| Reverse(p.citation_count));
}
