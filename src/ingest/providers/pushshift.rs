use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use metrics::{counter, histogram};
use serde::Deserialize;

use crate::ingest::types::SubmissionProvider;
use crate::schema::RawItem;

const PUSHSHIFT_SUBMISSION_URL: &str = "https://api.pushshift.io/reddit/search/submission/";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Submission>,
}

#[derive(Debug, Deserialize)]
struct Submission {
    created_utc: Option<i64>,
    subreddit: Option<String>,
    title: Option<String>,
    permalink: Option<String>,
    full_link: Option<String>,
    selftext: Option<String>,
}

fn unix_to_iso(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_default()
}

/// Pushshift submission search for one subreddit. Fixture mode feeds tests
/// and demos the captured JSON body; HTTP mode hits the live endpoint.
pub struct PushshiftProvider {
    subreddit: String,
    limit: u32,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { client: reqwest::Client },
}

impl PushshiftProvider {
    pub fn from_fixture_str(subreddit: &str, body: &str) -> Self {
        Self {
            subreddit: subreddit.to_string(),
            limit: 25,
            mode: Mode::Fixture(body.to_string()),
        }
    }

    pub fn from_http(subreddit: &str, limit: u32) -> Self {
        Self {
            subreddit: subreddit.to_string(),
            limit,
            mode: Mode::Http {
                client: reqwest::Client::new(),
            },
        }
    }

    fn parse_items_from_str(&self, s: &str) -> Result<Vec<RawItem>> {
        let t0 = std::time::Instant::now();
        let resp: SearchResponse = serde_json::from_str(s).context("parsing pushshift json")?;

        let mut out = Vec::with_capacity(resp.data.len());
        for sub in resp.data {
            let permalink = sub.permalink.unwrap_or_default();
            let full_link = sub
                .full_link
                .filter(|l| !l.is_empty())
                .unwrap_or_else(|| format!("https://reddit.com{permalink}"));

            out.push(RawItem {
                title: sub.title.unwrap_or_default(),
                selftext: sub.selftext.unwrap_or_default(),
                subreddit: sub.subreddit.unwrap_or_else(|| self.subreddit.clone()),
                date: sub.created_utc.map(unix_to_iso).unwrap_or_default(),
                full_link,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_items_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SubmissionProvider for PushshiftProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>> {
        match &self.mode {
            Mode::Fixture(s) => self.parse_items_from_str(s),

            Mode::Http { client } => {
                let body = client
                    .get(PUSHSHIFT_SUBMISSION_URL)
                    .query(&[
                        ("subreddit", self.subreddit.as_str()),
                        ("size", &self.limit.to_string()),
                        ("sort", "desc"),
                        ("sort_type", "created_utc"),
                    ])
                    .timeout(std::time::Duration::from_secs(20))
                    .send()
                    .await
                    .context("pushshift http get()")?
                    .error_for_status()
                    .context("pushshift non-2xx")?
                    .text()
                    .await
                    .context("pushshift http .text()")?;
                self.parse_items_from_str(&body)
            }
        }
    }

    fn name(&self) -> &'static str {
        "Pushshift"
    }
}
