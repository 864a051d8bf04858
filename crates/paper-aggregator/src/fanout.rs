//! Fan-out coordinator: concurrent provider calls joined in registration order.
//!
//! Every provider runs as its own tokio task bounded by the provider timeout.
//! A provider error, a timeout or a panicking task degrades to an empty
//! contribution for that provider only. Results come back in registration order no matter which
//! provider finished first.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::models::{CanonicalPaper, PaperSource};
use crate::providers::PaperProvider;

/// How a provider's task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// The adapter returned (possibly with zero records).
    Completed,
    /// The provider timeout expired first.
    TimedOut,
    /// The adapter returned an error, or the task died (panic or cancellation).
    Failed(String),
}

impl fmt::Display for ProviderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// One provider's contribution to a search.
#[derive(Debug, Clone)]
pub struct ProviderBatch {
    /// Provider the records came from.
    pub source: PaperSource,
    /// Parsed records in provider order.
    pub papers: Vec<CanonicalPaper>,
    /// How the call ended.
    pub outcome: ProviderOutcome,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Per-provider results in registration order.
#[derive(Debug, Clone, Default)]
pub struct FanOutResults {
    batches: Vec<ProviderBatch>,
}

impl FanOutResults {
    /// Wrap batches that are already in registration order.
    #[must_use]
    pub fn new(batches: Vec<ProviderBatch>) -> Self {
        Self { batches }
    }

    /// Records contributed by `source` (empty if it failed or is unknown).
    #[must_use]
    pub fn papers(&self, source: PaperSource) -> &[CanonicalPaper] {
        self.batches
            .iter()
            .find(|b| b.source == source)
            .map(|b| b.papers.as_slice())
            .unwrap_or_default()
    }

    /// All batches.
    #[must_use]
    pub fn batches(&self) -> &[ProviderBatch] {
        &self.batches
    }

    /// Total records across providers.
    #[must_use]
    pub fn total(&self) -> usize {
        self.batches.iter().map(|b| b.papers.len()).sum()
    }

    /// Record lists keyed by source, in registration order.
    #[must_use]
    pub fn into_lists(self) -> Vec<(PaperSource, Vec<CanonicalPaper>)> {
        self.batches.into_iter().map(|b| (b.source, b.papers)).collect()
    }
}

/// Runs every registered provider concurrently.
#[derive(Clone)]
pub struct FanOutCoordinator {
    providers: Vec<Arc<dyn PaperProvider>>,
    timeout: Duration,
}

impl FanOutCoordinator {
    /// Create a coordinator over `providers`, in the order given.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn PaperProvider>>, timeout: Duration) -> Self {
        Self { providers, timeout }
    }

    /// Registered sources in order.
    #[must_use]
    pub fn sources(&self) -> Vec<PaperSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Query every provider for up to `limit` records and wait for all of them.
    ///
    /// Never fails: each provider's failure becomes an empty batch.
    pub async fn fan_out(&self, query: &str, limit: usize) -> FanOutResults {
        let started = Instant::now();

        let handles: Vec<_> = self
            .providers
            .iter()
            .map(|provider| {
                let provider = Arc::clone(provider);
                let query = query.to_string();
                let timeout = self.timeout;
                tokio::spawn(async move {
                    let task_started = Instant::now();
                    let result = tokio::time::timeout(timeout, provider.try_search(&query, limit)).await;
                    (result, task_started.elapsed())
                })
            })
            .collect();

        let joined = futures::future::join_all(handles).await;

        let batches: Vec<ProviderBatch> = self
            .providers
            .iter()
            .zip(joined)
            .map(|(provider, joined)| {
                let source = provider.source();
                match joined {
                    Ok((Ok(Ok(papers)), elapsed)) => {
                        tracing::debug!(
                            provider = %source,
                            count = papers.len(),
                            elapsed_ms = elapsed.as_millis() as u64,
                            "provider completed"
                        );
                        ProviderBatch { source, papers, outcome: ProviderOutcome::Completed, elapsed }
                    }
                    Ok((Ok(Err(e)), elapsed)) => {
                        tracing::error!(
                            provider = %source,
                            error = %e,
                            retryable = e.is_retryable(),
                            "provider search failed"
                        );
                        ProviderBatch {
                            source,
                            papers: Vec::new(),
                            outcome: ProviderOutcome::Failed(e.to_string()),
                            elapsed,
                        }
                    }
                    Ok((Err(_), elapsed)) => {
                        tracing::warn!(
                            provider = %source,
                            timeout_ms = self.timeout.as_millis() as u64,
                            "provider timed out"
                        );
                        ProviderBatch {
                            source,
                            papers: Vec::new(),
                            outcome: ProviderOutcome::TimedOut,
                            elapsed,
                        }
                    }
                    Err(e) => {
                        tracing::error!(provider = %source, error = %e, "provider task failed");
                        ProviderBatch {
                            source,
                            papers: Vec::new(),
                            outcome: ProviderOutcome::Failed(e.to_string()),
                            elapsed: started.elapsed(),
                        }
                    }
                }
            })
            .collect();

        let results = FanOutResults::new(batches);
        tracing::info!(
            providers = self.providers.len(),
            total = results.total(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fan-out finished"
        );
        results
    }
}

impl fmt::Debug for FanOutCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOutCoordinator")
            .field("providers", &self.sources())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::Value;

    use crate::error::{ProviderError, ProviderResult};

    /// Provider returning canned papers after a delay, or panicking.
    struct StubProvider {
        source: PaperSource,
        citations: Vec<i64>,
        delay: Duration,
        panics: bool,
        fails: bool,
    }

    impl StubProvider {
        fn new(source: PaperSource, citations: Vec<i64>) -> Self {
            Self { source, citations, delay: Duration::ZERO, panics: false, fails: false }
        }

        fn delayed(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn panicking(mut self) -> Self {
            self.panics = true;
            self
        }

        fn failing(mut self) -> Self {
            self.fails = true;
            self
        }
    }

    #[async_trait::async_trait]
    impl PaperProvider for StubProvider {
        fn source(&self) -> PaperSource {
            self.source
        }

        fn build_params(&self, query: &str, limit: usize) -> Vec<(String, String)> {
            vec![("q".to_string(), query.to_string()), ("n".to_string(), limit.to_string())]
        }

        async fn fetch(&self, _query: &str, limit: usize) -> ProviderResult<Vec<Value>> {
            tokio::time::sleep(self.delay).await;
            assert!(!self.panics, "stub provider exploded");
            if self.fails {
                return Err(ProviderError::status(503, "service unavailable"));
            }
            Ok(self
                .citations
                .iter()
                .take(limit)
                .enumerate()
                .map(|(i, c)| serde_json::json!({"title": format!("{} #{i}", self.source), "citations": c}))
                .collect())
        }

        fn parse(&self, raw: Value) -> ProviderResult<CanonicalPaper> {
            let mut paper =
                CanonicalPaper::new(self.source, raw["title"].as_str().unwrap_or_default());
            paper.citation_count = raw["citations"].as_i64().unwrap_or(0);
            Ok(paper)
        }
    }

    fn coordinator(providers: Vec<StubProvider>, timeout: Duration) -> FanOutCoordinator {
        let providers = providers
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn PaperProvider>)
            .collect();
        FanOutCoordinator::new(providers, timeout)
    }

    #[tokio::test]
    async fn test_collects_all_providers() {
        let fan = coordinator(
            vec![
                StubProvider::new(PaperSource::SemanticScholar, vec![10, 50, 5]),
                StubProvider::new(PaperSource::CrossRef, vec![100, 1]),
            ],
            Duration::from_secs(5),
        );

        let results = fan.fan_out("machine learning", 10).await;
        assert_eq!(results.total(), 5);
        assert_eq!(results.papers(PaperSource::SemanticScholar).len(), 3);
        assert_eq!(results.papers(PaperSource::CrossRef).len(), 2);
        assert!(results.batches().iter().all(|b| b.outcome == ProviderOutcome::Completed));
    }

    #[tokio::test]
    async fn test_order_ignores_completion_order() {
        let fan = coordinator(
            vec![
                StubProvider::new(PaperSource::SemanticScholar, vec![1])
                    .delayed(Duration::from_millis(150)),
                StubProvider::new(PaperSource::CrossRef, vec![2]),
            ],
            Duration::from_secs(5),
        );

        let lists = fan.fan_out("q", 5).await.into_lists();
        let sources: Vec<_> = lists.iter().map(|(s, _)| *s).collect();
        assert_eq!(sources, vec![PaperSource::SemanticScholar, PaperSource::CrossRef]);
    }

    #[tokio::test]
    async fn test_timeout_isolated_to_one_provider() {
        let fan = coordinator(
            vec![
                StubProvider::new(PaperSource::SemanticScholar, vec![10])
                    .delayed(Duration::from_secs(10)),
                StubProvider::new(PaperSource::CrossRef, vec![7, 3]),
            ],
            Duration::from_millis(100),
        );

        let results = fan.fan_out("q", 5).await;
        assert_eq!(results.batches()[0].outcome, ProviderOutcome::TimedOut);
        assert!(results.papers(PaperSource::SemanticScholar).is_empty());
        assert_eq!(results.papers(PaperSource::CrossRef).len(), 2);
    }

    #[tokio::test]
    async fn test_panic_isolated_to_one_provider() {
        let fan = coordinator(
            vec![
                StubProvider::new(PaperSource::SemanticScholar, vec![10]).panicking(),
                StubProvider::new(PaperSource::CrossRef, vec![4]),
            ],
            Duration::from_secs(5),
        );

        let results = fan.fan_out("q", 5).await;
        assert!(matches!(results.batches()[0].outcome, ProviderOutcome::Failed(_)));
        assert!(results.papers(PaperSource::SemanticScholar).is_empty());
        assert_eq!(results.papers(PaperSource::CrossRef)[0].citation_count, 4);
    }

    #[tokio::test]
    async fn test_provider_error_recorded_as_failed() {
        let fan = coordinator(
            vec![
                StubProvider::new(PaperSource::SemanticScholar, vec![10]).failing(),
                StubProvider::new(PaperSource::CrossRef, vec![4]),
            ],
            Duration::from_secs(5),
        );

        let results = fan.fan_out("q", 5).await;
        match &results.batches()[0].outcome {
            ProviderOutcome::Failed(reason) => assert!(reason.contains("503")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(results.papers(PaperSource::SemanticScholar).is_empty());
        assert_eq!(results.batches()[1].outcome, ProviderOutcome::Completed);
        assert_eq!(results.papers(PaperSource::CrossRef).len(), 1);
    }

    #[tokio::test]
    async fn test_limit_passed_to_providers() {
        let fan = coordinator(
            vec![StubProvider::new(PaperSource::CrossRef, vec![1, 2, 3, 4])],
            Duration::from_secs(5),
        );
        assert_eq!(fan.fan_out("q", 2).await.total(), 2);
    }
}
