//! competitor.rs — competition signal from three independent mini-heuristics.
//!
//! The repository heuristic is the pipeline's only network dependency; every
//! failure mode (transport error, non-2xx, malformed body) degrades to the
//! lowest sub-score and is never propagated, so one record's bad lookup
//! cannot affect another record or abort the batch.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use reqwest::Client;

use crate::schema::{CompetitionLevel, PainRecord};

const MARKETPLACE_KEYWORDS: &[&str] = &["saas", "tool", "app", "platform", "monitor", "tracker"];
const COMMUNITY_KEYWORDS: &[&str] = &["management", "optimization", "automation", "integration"];

const REPO_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);
const REPO_CROWDED_THRESHOLD: u64 = 10;

/// Seam for the code-repository search so tests can stub the network.
#[async_trait]
pub trait RepoSearch: Send + Sync {
    /// Number of repositories matching the query.
    async fn result_count(&self, query: &str) -> Result<u64>;
}

/// GitHub repository search, sorted by stars, first page only — we only
/// need the total count.
pub struct GitHubSearch {
    client: Client,
}

impl GitHubSearch {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REPO_SEARCH_TIMEOUT)
            .user_agent("pain-point-radar")
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for GitHubSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepoSearch for GitHubSearch {
    async fn result_count(&self, query: &str) -> Result<u64> {
        let resp = self
            .client
            .get("https://api.github.com/search/repositories")
            .query(&[("q", query), ("sort", "stars"), ("per_page", "1")])
            .send()
            .await
            .context("github search request")?
            .error_for_status()
            .context("github search non-2xx")?;
        let body: serde_json::Value = resp.json().await.context("github search body")?;
        Ok(body
            .get("total_count")
            .and_then(|v| v.as_u64())
            .unwrap_or(0))
    }
}

pub struct CompetitorDetector {
    repo: Arc<dyn RepoSearch>,
}

impl CompetitorDetector {
    pub fn new(repo: Arc<dyn RepoSearch>) -> Self {
        Self { repo }
    }

    /// Production detector backed by the GitHub search API.
    pub fn github_default() -> Self {
        Self::new(Arc::new(GitHubSearch::new()))
    }

    /// 2 when the query names a common product noun, else 1.
    fn marketplace_score(query: &str) -> u8 {
        let q = query.to_lowercase();
        if MARKETPLACE_KEYWORDS.iter().any(|k| q.contains(k)) {
            2
        } else {
            1
        }
    }

    /// 3 when the repository search reports a crowded space (>10 results);
    /// 1 on few results or on any failure.
    async fn repo_score(&self, query: &str) -> u8 {
        match self.repo.result_count(query).await {
            Ok(n) if n > REPO_CROWDED_THRESHOLD => 3,
            Ok(_) => 1,
            Err(e) => {
                tracing::debug!(error = ?e, "repo search failed; defaulting sub-score");
                counter!("competitor_search_errors_total").increment(1);
                1
            }
        }
    }

    /// 2 when the query hits a high-interest topic keyword, else 1.
    fn community_score(query: &str) -> u8 {
        let q = query.to_lowercase();
        if COMMUNITY_KEYWORDS.iter().any(|k| q.contains(k)) {
            2
        } else {
            1
        }
    }

    /// Stage 4: writes the three sub-scores and the aggregate label.
    /// Records are processed serially; each lookup is independent.
    pub async fn detect_competitors(&self, records: &mut [PainRecord]) {
        for rec in records.iter_mut() {
            let query = if rec.pain_summary.is_empty() {
                rec.post_title.clone()
            } else {
                rec.pain_summary.clone()
            };

            let ph = Self::marketplace_score(&query);
            let github = self.repo_score(&query).await;
            let reddit = Self::community_score(&query);

            rec.ph_score = Some(ph);
            rec.github_score = Some(github);
            rec.reddit_score = Some(reddit);
            rec.competition_level = Some(aggregate_level(ph, github, reddit));
        }
    }
}

/// Average of the three sub-scores with inclusive lower boundaries:
/// ≥2.5 High, ≥1.5 Medium, else Low.
pub fn aggregate_level(ph: u8, github: u8, reddit: u8) -> CompetitionLevel {
    let avg = f64::from(u16::from(ph) + u16::from(github) + u16::from(reddit)) / 3.0;
    if avg >= 2.5 {
        CompetitionLevel::High
    } else if avg >= 1.5 {
        CompetitionLevel::Medium
    } else {
        CompetitionLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{transform_to_schema, RawItem};
    use anyhow::anyhow;

    struct FixedCount(u64);

    #[async_trait]
    impl RepoSearch for FixedCount {
        async fn result_count(&self, _query: &str) -> Result<u64> {
            Ok(self.0)
        }
    }

    struct AlwaysFails;

    #[async_trait]
    impl RepoSearch for AlwaysFails {
        async fn result_count(&self, _query: &str) -> Result<u64> {
            Err(anyhow!("network down"))
        }
    }

    fn rec(title: &str) -> Vec<PainRecord> {
        transform_to_schema(&[RawItem {
            title: title.to_string(),
            ..Default::default()
        }])
    }

    #[test]
    fn label_boundaries_are_inclusive_at_the_bottom() {
        assert_eq!(aggregate_level(3, 3, 3), CompetitionLevel::High);
        assert_eq!(aggregate_level(2, 3, 3), CompetitionLevel::High); // avg 2.67
        assert_eq!(aggregate_level(2, 3, 2), CompetitionLevel::Medium); // avg 2.33
        assert_eq!(aggregate_level(2, 1, 2), CompetitionLevel::Medium); // avg 1.67
        assert_eq!(aggregate_level(1, 1, 2), CompetitionLevel::Low); // avg 1.33
        assert_eq!(aggregate_level(1, 1, 1), CompetitionLevel::Low);
    }

    #[test]
    fn keyword_heuristics() {
        assert_eq!(CompetitorDetector::marketplace_score("a SaaS tracker"), 2);
        assert_eq!(CompetitorDetector::marketplace_score("gardening tips"), 1);
        assert_eq!(CompetitorDetector::community_score("workflow automation woes"), 2);
        assert_eq!(CompetitorDetector::community_score("gardening tips"), 1);
    }

    #[tokio::test]
    async fn crowded_repo_space_scores_three() {
        let det = CompetitorDetector::new(Arc::new(FixedCount(500)));
        let mut recs = rec("project management tool pricing");
        det.detect_competitors(&mut recs).await;
        assert_eq!(recs[0].github_score, Some(3));
        // ph=2 (tool), github=3, reddit=2 (management) → avg 2.33 → Medium
        assert_eq!(recs[0].competition_level, Some(CompetitionLevel::Medium));
    }

    #[tokio::test]
    async fn sparse_repo_space_scores_one() {
        let det = CompetitorDetector::new(Arc::new(FixedCount(3)));
        let mut recs = rec("obscure niche gardening");
        det.detect_competitors(&mut recs).await;
        assert_eq!(recs[0].github_score, Some(1));
        assert_eq!(recs[0].competition_level, Some(CompetitionLevel::Low));
    }

    #[tokio::test]
    async fn search_failure_degrades_to_one_never_errors() {
        let det = CompetitorDetector::new(Arc::new(AlwaysFails));
        let mut recs = rec("any text at all");
        det.detect_competitors(&mut recs).await;
        assert_eq!(recs[0].github_score, Some(1));
        assert!(recs[0].competition_level.is_some());
    }

    #[tokio::test]
    async fn empty_summary_falls_back_to_title() {
        let det = CompetitorDetector::new(Arc::new(FixedCount(0)));
        let mut recs = transform_to_schema(&[RawItem::default()]);
        recs[0].post_title = "a saas platform".to_string();
        det.detect_competitors(&mut recs).await;
        assert_eq!(recs[0].ph_score, Some(2));
    }
}
