//! jobrunner.rs — trigger-and-poll client for a hosted automation runner.
//!
//! The runner is configured per deployment (`RUNNER_URL` + `RUNNER_API_KEY`)
//! and its response shape varies by setup, so the client stays generic: POST
//! the payload, and if the response carries a `status` plus a `status_url`,
//! poll until a terminal state or the deadline. Terminal states follow the
//! vendor's vocabulary: completed/finished/done vs failed/error.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::external::ExternalError;

const ENV_RUN_URL: &str = "RUNNER_URL";
const ENV_API_KEY: &str = "RUNNER_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct JobRunner {
    run_url: String,
    api_key: String,
    client: Client,
    poll_interval: Duration,
}

impl JobRunner {
    pub fn new(run_url: String, api_key: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            run_url,
            api_key,
            client,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Shorter interval for tests.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build from `RUNNER_URL` + `RUNNER_API_KEY`. Missing or empty vars are
    /// a configuration error naming each absent variable.
    pub fn from_env() -> Result<Self, ExternalError> {
        let run_url = std::env::var(ENV_RUN_URL).unwrap_or_default();
        let api_key = std::env::var(ENV_API_KEY).unwrap_or_default();

        let mut missing = Vec::new();
        if run_url.trim().is_empty() {
            missing.push(ENV_RUN_URL);
        }
        if api_key.trim().is_empty() {
            missing.push(ENV_API_KEY);
        }
        if !missing.is_empty() {
            return Err(ExternalError::ConfigurationMissing(missing.join(", ")));
        }
        Ok(Self::new(run_url, api_key))
    }

    /// Whether the environment carries runner configuration at all; used by
    /// callers that fall back to a direct fetch when it does not.
    pub fn is_configured() -> bool {
        Self::from_env().is_ok()
    }

    /// Trigger a run and wait for its result, polling when the response is
    /// async. `deadline` bounds the whole poll phase.
    pub async fn run_job(&self, payload: &Value, deadline: Duration) -> Result<Value, ExternalError> {
        let resp = self
            .client
            .post(&self.run_url)
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| ExternalError::RemoteFailure(format!("trigger request: {e}")))?
            .error_for_status()
            .map_err(|e| ExternalError::RemoteFailure(format!("trigger status: {e}")))?;

        let data: Value = resp
            .json()
            .await
            .map_err(|e| ExternalError::RemoteFailure(format!("trigger body: {e}")))?;

        let status = data.get("status").and_then(Value::as_str);
        let status_url = data
            .get("status_url")
            .or_else(|| data.get("statusUrl"))
            .and_then(Value::as_str);

        // Synchronous runs return the result directly.
        let (Some(_), Some(status_url)) = (status, status_url) else {
            return Ok(data);
        };
        let status_url = status_url.to_string();

        let started = tokio::time::Instant::now();
        loop {
            if started.elapsed() >= deadline {
                return Err(ExternalError::Timeout);
            }
            tokio::time::sleep(self.poll_interval).await;

            let polled = match self.poll_once(&status_url).await {
                Ok(v) => v,
                Err(e) => {
                    // Transient poll errors retry until the deadline.
                    tracing::debug!(error = %e, "poll attempt failed; retrying");
                    continue;
                }
            };

            let state = polled
                .get("status")
                .or_else(|| polled.get("state"))
                .and_then(Value::as_str)
                .map(str::to_ascii_lowercase);

            match state.as_deref() {
                Some("completed") | Some("finished") | Some("done") => return Ok(polled),
                Some("failed") | Some("error") => {
                    return Err(ExternalError::RemoteFailure(format!(
                        "runner reported failure: {polled}"
                    )));
                }
                _ => continue,
            }
        }
    }

    async fn poll_once(&self, status_url: &str) -> Result<Value, ExternalError> {
        let resp = self
            .client
            .get(status_url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ExternalError::RemoteFailure(format!("poll request: {e}")))?
            .error_for_status()
            .map_err(|e| ExternalError::RemoteFailure(format!("poll status: {e}")))?;
        resp.json()
            .await
            .map_err(|e| ExternalError::RemoteFailure(format!("poll body: {e}")))
    }
}

/// Pull the item list out of a runner result: `data`, then `results`.
pub fn items_from_result(result: &Value) -> Vec<Value> {
    result
        .get("data")
        .or_else(|| result.get("results"))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}
