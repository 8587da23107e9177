use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::audience::AudienceConfig;
use crate::competitor::CompetitorDetector;
use crate::pipeline::{self, PipelineOptions};
use crate::schema::{PainRecord, RawItem};

#[derive(Clone)]
pub struct AppState {
    audiences: Arc<AudienceConfig>,
    detector: Arc<CompetitorDetector>,
}

impl AppState {
    /// Production state: configured audience table, live GitHub search.
    pub fn from_env() -> Self {
        Self {
            audiences: Arc::new(AudienceConfig::load_default()),
            detector: Arc::new(CompetitorDetector::github_default()),
        }
    }

    /// Explicit parts, for tests and tools.
    pub fn with_parts(audiences: AudienceConfig, detector: CompetitorDetector) -> Self {
        Self {
            audiences: Arc::new(audiences),
            detector: Arc::new(detector),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/analyze", post(analyze))
        .route("/api/categories", get(categories))
        .route("/api/demo", get(demo))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub items: Vec<RawItem>,
    #[serde(default = "default_true")]
    pub include_solutions: bool,
    #[serde(default = "default_true")]
    pub include_competitors: bool,
    #[serde(default = "default_true")]
    pub include_revenue: bool,
}

#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total_analyzed: usize,
    pub avg_pain_score: f64,
    pub categories: HashMap<String, usize>,
    pub top_opportunity: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub count: usize,
    pub pain_points: Vec<PainRecord>,
    pub summary: BatchSummary,
}

/// Ranked records → aggregate summary for the dashboard header.
fn summarize_batch(records: &[PainRecord]) -> BatchSummary {
    let total = records.len();
    let avg_pain_score = if total == 0 {
        0.0
    } else {
        records
            .iter()
            .map(|r| f64::from(r.pain_score.unwrap_or(0)))
            .sum::<f64>()
            / total as f64
    };

    let mut categories: HashMap<String, usize> = HashMap::new();
    for rec in records {
        *categories.entry(rec.category.to_string()).or_insert(0) += 1;
    }

    let top_opportunity = records
        .first()
        .map(|r| r.pain_summary.clone())
        .unwrap_or_else(|| "N/A".to_string());

    BatchSummary {
        total_analyzed: total,
        avg_pain_score,
        categories,
        top_opportunity,
    }
}

async fn run_and_rank(
    state: &AppState,
    items: &[RawItem],
    opts: PipelineOptions,
) -> Vec<PainRecord> {
    let mut records = pipeline::run(items, opts, &state.audiences, &state.detector).await;
    pipeline::rank_by_pain(&mut records);
    records
}

/// Batch analysis. Stages 1–2 always run; 3/4/5 follow the request flags.
async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    let opts = PipelineOptions {
        include_solutions: body.include_solutions,
        include_competitors: body.include_competitors,
        include_revenue: body.include_revenue,
    };

    let records = run_and_rank(&state, &body.items, opts).await;
    let summary = summarize_batch(&records);

    Json(AnalyzeResponse {
        success: true,
        count: records.len(),
        pain_points: records,
        summary,
    })
}

#[derive(Debug, Serialize)]
struct CategoryInfo {
    name: &'static str,
    description: &'static str,
}

async fn categories() -> Json<serde_json::Value> {
    let list = [
        CategoryInfo {
            name: "Pricing",
            description: "Cost, pricing, subscription issues",
        },
        CategoryInfo {
            name: "Bugs",
            description: "Errors, crashes, broken functionality",
        },
        CategoryInfo {
            name: "Feature",
            description: "Missing features, feature requests",
        },
        CategoryInfo {
            name: "Performance",
            description: "Speed, latency, performance issues",
        },
        CategoryInfo {
            name: "Other",
            description: "General feedback and other issues",
        },
    ];
    Json(serde_json::json!({ "categories": list }))
}

/// Canonical demo batch: one complaint per headline category.
pub fn sample_items() -> Vec<RawItem> {
    vec![
        RawItem {
            title: "The pricing is way too expensive for startups".into(),
            selftext: "I can't believe how much they charge. It's urgent we find an alternative."
                .into(),
            subreddit: "SaaS".into(),
            date: "2025-01-01T10:00:00Z".into(),
            full_link: "https://reddit.com/r/SaaS/demo1".into(),
        },
        RawItem {
            title: "Bug causing crashes on mobile".into(),
            selftext: "The app keeps crashing. This is a serious issue blocking our workflow."
                .into(),
            subreddit: "startups".into(),
            date: "2025-01-02T11:00:00Z".into(),
            full_link: "https://reddit.com/r/startups/demo2".into(),
        },
        RawItem {
            title: "Missing feature: export to PDF".into(),
            selftext: "Would be nice if we could export reports to PDF format.".into(),
            subreddit: "ProductManagement".into(),
            date: "2025-01-03T12:00:00Z".into(),
            full_link: "https://reddit.com/r/ProductManagement/demo3".into(),
        },
    ]
}

async fn demo(State(state): State<AppState>) -> Json<serde_json::Value> {
    let records = run_and_rank(&state, &sample_items(), PipelineOptions::default()).await;
    Json(serde_json::json!({
        "success": true,
        "message": "Demo analysis completed",
        "count": records.len(),
        "pain_points": records,
    }))
}
