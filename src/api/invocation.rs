use crate::core::orchestrator::{AggregationOutcome, ContactAggregator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// HTTP-trigger payload handed to the serverless entry point.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl InvocationRequest {
    pub fn query(&self, key: &str) -> Option<&str> {
        self.query_string_parameters
            .as_ref()
            .and_then(|params| params.get(key))
            .map(String::as_str)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl InvocationResponse {
    fn bad_request() -> Self {
        Self {
            status_code: 400,
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// JSON response; a value that cannot be encoded degrades to a bare 400.
    fn json<T: Serialize>(status_code: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status_code,
                headers: HashMap::from([(
                    "content-type".to_string(),
                    "application/json".to_string(),
                )]),
                body,
            },
            Err(e) => {
                tracing::error!("❌ Failed to encode response body: {}", e);
                Self::bad_request()
            }
        }
    }

    fn from_outcome(outcome: &AggregationOutcome) -> Self {
        match outcome.envelope() {
            Some(envelope) => Self::json(outcome.status_code(), envelope),
            None => Self::bad_request(),
        }
    }
}

/// Runs one aggregation for an invocation; `correlation_id` is the host's request id.
pub async fn handle_invocation(
    aggregator: &ContactAggregator,
    request: &InvocationRequest,
    correlation_id: &str,
) -> InvocationResponse {
    let outcome = aggregator.run(request.query("email"), correlation_id).await;
    InvocationResponse::from_outcome(&outcome)
}
