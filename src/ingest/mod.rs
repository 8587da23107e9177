// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::ingest::types::SubmissionProvider;
use crate::schema::RawItem;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_items_total", "Total submissions parsed from providers.");
        describe_counter!("ingest_kept_total", "Submissions kept after cleanup + filtering.");
        describe_counter!(
            "ingest_filtered_total",
            "Submissions dropped by the keyword filter or for being empty."
        );
        describe_counter!("ingest_provider_errors_total", "Provider fetch/parse errors.");
        describe_histogram!("ingest_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!("ingest_last_run_ts", "Unix ts when ingest last ran.");
    });
}

/// Clean up submission text: decode HTML entities, collapse whitespace, trim.
/// Forum posts routinely arrive with `&amp;`-style escapes and markdown line
/// noise; the pipeline's keyword matching wants plain prose.
pub fn cleanup_text(s: &str) -> String {
    let out = html_escape::decode_html_entities(s).to_string();

    static RE_WS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").unwrap());
    re_ws.replace_all(&out, " ").trim().to_string()
}

/// Keep items whose title or body contains any keyword (case-insensitive).
/// An empty keyword list keeps everything.
pub fn filter_by_keywords(items: Vec<RawItem>, keywords: &[String]) -> Vec<RawItem> {
    if keywords.is_empty() {
        return items;
    }
    let kw_lower: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    items
        .into_iter()
        .filter(|it| {
            let text = format!("{} {}", it.title, it.selftext).to_lowercase();
            kw_lower.iter().any(|k| text.contains(k.as_str()))
        })
        .collect()
}

/// Run ingest once over the given providers. A provider failure is logged
/// and counted, never fatal — remaining providers still contribute.
/// Returns (kept, filtered_count).
pub async fn run_once(
    providers: &[Box<dyn SubmissionProvider>],
    keywords: &[String],
) -> (Vec<RawItem>, usize) {
    ensure_metrics_described();

    let mut raw = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(mut v) => raw.append(&mut v),
            Err(e) => {
                tracing::warn!(error = ?e, provider = p.name(), "provider error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }

    let mut cleaned = Vec::with_capacity(raw.len());
    let mut dropped_empty = 0usize;
    for mut it in raw {
        it.title = cleanup_text(&it.title);
        it.selftext = cleanup_text(&it.selftext);
        if it.title.is_empty() && it.selftext.is_empty() {
            dropped_empty += 1;
            continue;
        }
        cleaned.push(it);
    }

    let before_filter = cleaned.len();
    let kept = filter_by_keywords(cleaned, keywords);
    let filtered = dropped_empty + (before_filter - kept.len());

    counter!("ingest_kept_total").increment(kept.len() as u64);
    counter!("ingest_filtered_total").increment(filtered as u64);
    gauge!("ingest_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    (kept, filtered)
}
