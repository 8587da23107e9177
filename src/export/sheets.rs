//! Hosted-sheet push. POSTs the header row plus one row per record to a
//! deployment-provided webhook (e.g. an Apps Script endpoint bound to a
//! spreadsheet). Missing configuration is a typed error so callers can treat
//! the sink as absent instead of failed.

use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use super::{record_row, COLUMNS};
use crate::external::ExternalError;
use crate::schema::PainRecord;

const ENV_PUSH_URL: &str = "SHEETS_PUSH_URL";
const ENV_PUSH_TOKEN: &str = "SHEETS_PUSH_TOKEN";

const PUSH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub struct SheetsExporter {
    push_url: String,
    token: String,
    client: Client,
}

impl SheetsExporter {
    pub fn new(push_url: String, token: String) -> Self {
        let client = Client::builder()
            .timeout(PUSH_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            push_url,
            token,
            client,
        }
    }

    /// Build from `SHEETS_PUSH_URL` + `SHEETS_PUSH_TOKEN`; missing or empty
    /// vars are a configuration error naming each absent variable.
    pub fn from_env() -> Result<Self, ExternalError> {
        let push_url = std::env::var(ENV_PUSH_URL).unwrap_or_default();
        let token = std::env::var(ENV_PUSH_TOKEN).unwrap_or_default();

        let mut missing = Vec::new();
        if push_url.trim().is_empty() {
            missing.push(ENV_PUSH_URL);
        }
        if token.trim().is_empty() {
            missing.push(ENV_PUSH_TOKEN);
        }
        if !missing.is_empty() {
            return Err(ExternalError::ConfigurationMissing(missing.join(", ")));
        }
        Ok(Self::new(push_url, token))
    }

    /// Push all records. Returns the spreadsheet URL reported by the
    /// endpoint (empty string when the response carries none).
    pub async fn push(
        &self,
        records: &[PainRecord],
        sheet_name: &str,
    ) -> Result<String, ExternalError> {
        let rows: Vec<Vec<String>> = records.iter().map(record_row).collect();
        let payload = json!({
            "sheet": sheet_name,
            "header": COLUMNS,
            "rows": rows,
        });

        let resp = self
            .client
            .post(&self.push_url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ExternalError::RemoteFailure(format!("sheet push request: {e}")))?
            .error_for_status()
            .map_err(|e| ExternalError::RemoteFailure(format!("sheet push status: {e}")))?;

        let body: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ExternalError::RemoteFailure(format!("sheet push body: {e}")))?;

        Ok(body
            .get("spreadsheet_url")
            .or_else(|| body.get("url"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string())
    }
}
