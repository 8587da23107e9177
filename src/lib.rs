// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod audience;
pub mod competitor;
pub mod external;
pub mod export;
pub mod ingest;
pub mod jobrunner;
pub mod metrics;
pub mod pipeline;
pub mod revenue;
pub mod schema;
pub mod scoring;
pub mod solution;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::external::ExternalError;
pub use crate::pipeline::{rank_by_pain, run as run_pipeline, PipelineOptions};
pub use crate::schema::{Category, CompetitionLevel, PainRecord, RawItem};
