//! Concurrent evidence gathering.
//!
//! Every registered source is queried at once with the submitted text. A
//! failing or slow source only affects its own group; the others still
//! contribute.

use futures::future::join_all;
use std::sync::Arc;
use tracing::info;

use veritas_core::EvidenceSet;

use crate::sources::EvidenceSource;

/// Evidence for one check plus the sufficiency decision.
#[derive(Debug, Clone)]
pub struct AggregatedEvidence {
    /// One group per source, in registration order
    pub evidence: EvidenceSet,

    /// True iff at least one source returned at least one item
    pub has_sufficient_evidence: bool,
}

/// Fans one query out to all sources and collects their groups.
pub struct EvidenceAggregator {
    sources: Vec<Arc<dyn EvidenceSource>>,
}

impl EvidenceAggregator {
    /// Create an aggregator over `sources`. Group order follows this order.
    pub fn with_sources(sources: Vec<Arc<dyn EvidenceSource>>) -> Self {
        Self { sources }
    }

    /// Names of the registered sources.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Query every source concurrently with `text`.
    ///
    /// Never fails: sources report their own errors and come back empty.
    pub async fn aggregate(&self, text: &str) -> AggregatedEvidence {
        let groups = join_all(self.sources.iter().map(|source| source.collect(text))).await;

        let evidence = EvidenceSet::new(groups);
        let has_sufficient_evidence = evidence.has_sufficient_evidence();

        info!(
            sources = self.sources.len(),
            items = evidence.total_items(),
            sufficient = has_sufficient_evidence,
            "Evidence aggregated"
        );

        AggregatedEvidence {
            evidence,
            has_sufficient_evidence,
        }
    }
}

impl std::fmt::Debug for EvidenceAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvidenceAggregator")
            .field("sources", &self.source_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;
    use async_trait::async_trait;
    use std::time::Duration;
    use veritas_core::EvidenceItem;

    struct StubSource {
        name: &'static str,
        items: usize,
        fail: bool,
        delay: Duration,
    }

    impl StubSource {
        fn ok(name: &'static str, items: usize) -> Arc<dyn EvidenceSource> {
            Arc::new(Self {
                name,
                items,
                fail: false,
                delay: Duration::ZERO,
            })
        }

        fn failing(name: &'static str) -> Arc<dyn EvidenceSource> {
            Arc::new(Self {
                name,
                items: 0,
                fail: true,
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl EvidenceSource for StubSource {
        fn name(&self) -> &str {
            self.name
        }

        fn heading(&self) -> &str {
            self.name
        }

        fn max_results(&self) -> usize {
            3
        }

        async fn search(&self, query: &str) -> Result<Vec<EvidenceItem>, SourceError> {
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(SourceError::Transport("connection reset".to_string()));
            }
            Ok((0..self.items)
                .map(|i| EvidenceItem::new(format!("{query} {i}"), "https://e.ge", ""))
                .collect())
        }
    }

    #[tokio::test]
    async fn test_groups_follow_registration_order() {
        let aggregator = EvidenceAggregator::with_sources(vec![
            StubSource::ok("google", 2),
            StubSource::ok("newsapi", 0),
            StubSource::ok("gnews", 1),
        ]);

        let result = aggregator.aggregate("ტექსტი").await;
        let names: Vec<&str> = result
            .evidence
            .groups()
            .iter()
            .map(|g| g.provider.as_str())
            .collect();
        assert_eq!(names, vec!["google", "newsapi", "gnews"]);
        assert_eq!(result.evidence.total_items(), 3);
        assert!(result.has_sufficient_evidence);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let aggregator = EvidenceAggregator::with_sources(vec![
            StubSource::failing("google"),
            StubSource::ok("newsapi", 1),
            StubSource::failing("gnews"),
        ]);

        let result = aggregator.aggregate("q").await;
        assert_eq!(result.evidence.groups().len(), 3);
        assert!(result.evidence.provider("google").unwrap().is_empty());
        assert_eq!(result.evidence.provider("newsapi").unwrap().len(), 1);
        assert!(result.has_sufficient_evidence);
    }

    #[tokio::test]
    async fn test_all_empty_is_insufficient() {
        let aggregator = EvidenceAggregator::with_sources(vec![
            StubSource::ok("google", 0),
            StubSource::failing("newsapi"),
        ]);

        let result = aggregator.aggregate("q").await;
        assert!(!result.has_sufficient_evidence);
        assert_eq!(result.evidence.total_items(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_run_concurrently() {
        let slow = |name: &'static str| -> Arc<dyn EvidenceSource> {
            Arc::new(StubSource {
                name,
                items: 1,
                fail: false,
                delay: Duration::from_secs(5),
            })
        };
        let aggregator =
            EvidenceAggregator::with_sources(vec![slow("google"), slow("newsapi"), slow("gnews")]);

        let started = tokio::time::Instant::now();
        let result = aggregator.aggregate("q").await;
        assert_eq!(result.evidence.total_items(), 3);
        assert!(started.elapsed() < Duration::from_secs(6));
    }
}
