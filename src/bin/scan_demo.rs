//! Demo scan: fetch submissions (job runner if configured, else Pushshift,
//! else the built-in samples), run the full pipeline, rank, and export.

use pain_point_radar::api::sample_items;
use pain_point_radar::audience::AudienceConfig;
use pain_point_radar::competitor::CompetitorDetector;
use pain_point_radar::export::{self, report, sheets::SheetsExporter};
use pain_point_radar::ingest::{self, providers::pushshift::PushshiftProvider, types::SubmissionProvider};
use pain_point_radar::jobrunner::{items_from_result, JobRunner};
use pain_point_radar::schema::RawItem;
use pain_point_radar::{pipeline, PipelineOptions};

const DEFAULT_SUBREDDITS: &[&str] = &["SaaS", "startups"];
const FETCH_LIMIT: u32 = 25;

async fn fetch_items() -> Vec<RawItem> {
    // Prefer the configured job runner; fall back to a direct fetch.
    match JobRunner::from_env() {
        Ok(runner) => {
            let payload = serde_json::json!({
                "subreddits": DEFAULT_SUBREDDITS,
                "keywords": [],
                "limit": FETCH_LIMIT,
            });
            match runner
                .run_job(&payload, std::time::Duration::from_secs(300))
                .await
            {
                Ok(result) => {
                    let items: Vec<RawItem> = items_from_result(&result)
                        .into_iter()
                        .filter_map(|v| serde_json::from_value(v).ok())
                        .collect();
                    tracing::info!(count = items.len(), "job runner returned items");
                    if !items.is_empty() {
                        return items;
                    }
                }
                Err(e) => tracing::warn!(error = %e, "job runner failed; falling back"),
            }
        }
        Err(e) => tracing::debug!(reason = %e, "job runner not configured"),
    }

    let providers: Vec<Box<dyn SubmissionProvider>> = DEFAULT_SUBREDDITS
        .iter()
        .map(|sub| {
            Box::new(PushshiftProvider::from_http(sub, FETCH_LIMIT)) as Box<dyn SubmissionProvider>
        })
        .collect();
    let (items, _filtered) = ingest::run_once(&providers, &[]).await;
    items
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_target(false).init();

    let mut items = fetch_items().await;
    if items.is_empty() {
        tracing::info!("no items fetched; using built-in samples");
        items = sample_items();
    }
    println!("Fetched {} raw items", items.len());

    let audiences = AudienceConfig::load_default();
    let detector = CompetitorDetector::github_default();
    let mut records =
        pipeline::run(&items, PipelineOptions::default(), &audiences, &detector).await;
    pipeline::rank_by_pain(&mut records);

    let csv_path = export::write_csv(&records, None)?;
    println!("Wrote CSV -> {}", csv_path.display());
    let report_path = report::write_report(&records, None)?;
    println!("Wrote report -> {}", report_path.display());

    match SheetsExporter::from_env() {
        Ok(exporter) => match exporter.push(&records, "Pain Points").await {
            Ok(url) if !url.is_empty() => println!("Pushed to sheet: {url}"),
            Ok(_) => println!("Pushed to sheet (URL not returned)"),
            Err(e) => eprintln!("Sheet push failed: {e}"),
        },
        Err(e) => tracing::debug!(reason = %e, "sheet push not configured"),
    }

    for rec in records.iter().take(5) {
        println!(
            "[{}] {} (severity {}, {})",
            rec.pain_score.unwrap_or(0),
            rec.pain_summary,
            rec.severity_rating,
            rec.category,
        );
    }
    println!("scan-demo done");
    Ok(())
}
