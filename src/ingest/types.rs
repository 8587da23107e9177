// src/ingest/types.rs
use anyhow::Result;

use crate::schema::RawItem;

#[async_trait::async_trait]
pub trait SubmissionProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawItem>>;
    fn name(&self) -> &'static str;
}
