//! pipeline.rs — fixed-order orchestration of the five enrichment stages.
//!
//! Stage order is 1→2→3→4→5 because later stages read fields earlier ones
//! wrote; the stages themselves stay independently callable. Stages 1–2
//! always run; 3/4/5 are skipped per the caller's flags. The pipeline never
//! reorders records — ranking is the caller's move.

use metrics::{counter, describe_counter, describe_histogram, gauge, histogram};
use once_cell::sync::OnceCell;

use crate::audience::AudienceConfig;
use crate::competitor::CompetitorDetector;
use crate::schema::{transform_to_schema, PainRecord, RawItem};
use crate::{revenue, scoring, solution};

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("pipeline_runs_total", "Completed pipeline invocations.");
        describe_counter!("pipeline_records_total", "Records pushed through the pipeline.");
        describe_histogram!("pipeline_run_ms", "Wall time of one pipeline run in milliseconds.");
    });
}

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub include_solutions: bool,
    pub include_competitors: bool,
    pub include_revenue: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            include_solutions: true,
            include_competitors: true,
            include_revenue: true,
        }
    }
}

/// Run the enrichment pipeline over raw items. Output is index-aligned with
/// the input; no record is dropped or reordered here.
pub async fn run(
    items: &[RawItem],
    opts: PipelineOptions,
    audiences: &AudienceConfig,
    detector: &CompetitorDetector,
) -> Vec<PainRecord> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let mut records = transform_to_schema(items);
    scoring::calculate_pain_score(&mut records, audiences);

    if opts.include_solutions {
        solution::generate_solutions(&mut records);
    }
    if opts.include_competitors {
        detector.detect_competitors(&mut records).await;
    }
    if opts.include_revenue {
        revenue::estimate_revenue_potential(&mut records, audiences);
    }

    counter!("pipeline_runs_total").increment(1);
    counter!("pipeline_records_total").increment(records.len() as u64);
    histogram!("pipeline_run_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
    gauge!("pipeline_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    tracing::debug!(
        records = records.len(),
        solutions = opts.include_solutions,
        competitors = opts.include_competitors,
        revenue = opts.include_revenue,
        "pipeline run complete"
    );

    records
}

/// Caller-side ranking: pain score descending, stable for ties.
pub fn rank_by_pain(records: &mut [PainRecord]) {
    records.sort_by_key(|r| std::cmp::Reverse(r.pain_score.unwrap_or(0)));
}
