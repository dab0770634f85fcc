use std::time::Instant;

use chrono::Utc;
use serde_json::Value;

use crate::adapters::probe::ExternalProbe;
use crate::runtime::contract::{
    connectivity_failure_response, connectivity_success_response, iso_timestamp,
    ApiGatewayResponse,
};
use crate::runtime::metadata::LambdaMetadata;
use crate::telemetry::saturating_millis;

pub struct ConnectivityHandler<P> {
    metadata: LambdaMetadata,
    probe: P,
}

impl<P: ExternalProbe> ConnectivityHandler<P> {
    pub fn new(metadata: LambdaMetadata, probe: P) -> Self {
        Self { metadata, probe }
    }

    /// Runs the probe once and reports the outcome. The event is only logged.
    pub async fn handle(&self, event: &Value) -> ApiGatewayResponse {
        let started_at = Instant::now();
        tracing::info!(
            component = "connectivity_handler",
            lambda_version = ?self.metadata.function_version,
            event = %event,
            "invocation_received"
        );

        let response = match self.probe.probe().await {
            Ok(result) => {
                let elapsed_ms = started_at.elapsed().as_millis();
                tracing::info!(
                    component = "connectivity_handler",
                    url = %result.url,
                    status_code = result.status_code,
                    parse_error = ?result.parse_error,
                    duration_ms = saturating_millis(elapsed_ms),
                    "probe_succeeded"
                );
                connectivity_success_response(
                    &self.metadata,
                    result,
                    elapsed_ms,
                    iso_timestamp(Utc::now()),
                )
            }
            Err(error) => {
                let elapsed_ms = started_at.elapsed().as_millis();
                tracing::error!(
                    component = "connectivity_handler",
                    error = %error,
                    duration_ms = saturating_millis(elapsed_ms),
                    "probe_failed"
                );
                connectivity_failure_response(&self.metadata, &error, iso_timestamp(Utc::now()))
            }
        };

        tracing::info!(
            component = "connectivity_handler",
            status_code = response.status_code,
            body = %response.body,
            "response_ready"
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;

    use super::*;
    use crate::runtime::contract::{ProbeError, ProbeResult};

    struct StubProbe {
        outcome: Result<ProbeResult, ProbeError>,
        calls: AtomicUsize,
    }

    impl StubProbe {
        fn new(outcome: Result<ProbeResult, ProbeError>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExternalProbe for StubProbe {
        async fn probe(&self) -> Result<ProbeResult, ProbeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn metadata() -> LambdaMetadata {
        LambdaMetadata {
            function_version: Some("12".to_string()),
            region: Some("eu-central-1".to_string()),
            function_name: Some("vpc-connectivity-test".to_string()),
            memory_size: Some("128".to_string()),
        }
    }

    fn ok_result(status_code: u16, body: &str) -> Result<ProbeResult, ProbeError> {
        Ok(ProbeResult::from_body(
            "https://httpbin.org/json",
            status_code,
            body,
        ))
    }

    fn decode(response: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&response.body).expect("body should be valid JSON")
    }

    #[tokio::test]
    async fn passes_when_probe_succeeds() {
        let handler = ConnectivityHandler::new(
            metadata(),
            StubProbe::new(ok_result(200, r#"{"slideshow":{}}"#)),
        );

        let response = handler.handle(&json!({})).await;

        assert_eq!(response.status_code, 200);
        assert!(response.headers.contains_key("X-Execution-Time"));
        let body = decode(&response);
        assert_eq!(body["status"], "PASSED");
        assert_eq!(body["externalAPI"]["status"], "success");
        assert_eq!(body["externalAPI"]["data"]["statusCode"], 200);
        assert_eq!(body["environment"]["region"], "eu-central-1");
        assert!(body["executionTime"]
            .as_str()
            .is_some_and(|value| value.ends_with("ms")));
        assert_eq!(handler.probe.calls(), 1);
    }

    #[tokio::test]
    async fn transport_failure_becomes_500() {
        let handler = ConnectivityHandler::new(
            metadata(),
            StubProbe::new(Err(ProbeError::Transport("boom".to_string()))),
        );

        let response = handler.handle(&Value::Null).await;

        assert_eq!(response.status_code, 500);
        assert!(!response.headers.contains_key("X-Execution-Time"));
        let body = decode(&response);
        assert_eq!(body["status"], "FAILED");
        assert_eq!(body["error"], "External API request failed: boom");
        assert_eq!(body["test"], "VPC Internet Connectivity");
    }

    #[tokio::test]
    async fn timeout_becomes_500() {
        let handler =
            ConnectivityHandler::new(metadata(), StubProbe::new(Err(ProbeError::Timeout)));

        let response = handler.handle(&json!({"source": "manual"})).await;

        assert_eq!(response.status_code, 500);
        assert_eq!(decode(&response)["error"], "External API request timed out");
    }

    #[tokio::test]
    async fn non_json_and_non_2xx_bodies_still_pass() {
        let not_json =
            ConnectivityHandler::new(metadata(), StubProbe::new(ok_result(200, "not-json")));
        let response = not_json.handle(&json!({})).await;
        assert_eq!(response.status_code, 200);
        let body = decode(&response);
        assert_eq!(body["externalAPI"]["data"]["response"], "not-json");
        assert!(body["externalAPI"]["data"]["parseError"].is_string());

        let unavailable = ConnectivityHandler::new(
            metadata(),
            StubProbe::new(ok_result(503, r#"{"error":"down"}"#)),
        );
        let response = unavailable.handle(&json!({})).await;
        assert_eq!(response.status_code, 200);
        let body = decode(&response);
        assert_eq!(body["status"], "PASSED");
        assert_eq!(body["externalAPI"]["data"]["statusCode"], 503);
    }

    #[tokio::test]
    async fn response_shape_is_stable_for_any_event() {
        let events = [
            Value::Null,
            json!({}),
            json!([1, 2, 3]),
            json!("text"),
            json!({"headers": {"x": "y"}, "body": "{not json"}),
        ];

        for outcome in [ok_result(200, "{}"), Err(ProbeError::Timeout)] {
            let handler = ConnectivityHandler::new(metadata(), StubProbe::new(outcome));
            for event in &events {
                let response = handler.handle(event).await;
                let encoded = serde_json::to_value(&response).expect("response should serialize");
                let keys: Vec<&str> = encoded
                    .as_object()
                    .expect("response should be an object")
                    .keys()
                    .map(String::as_str)
                    .collect();
                assert_eq!(keys, vec!["body", "headers", "statusCode"]);
                decode(&response);
            }
        }
    }

    #[tokio::test]
    async fn echoes_version_header_even_when_unset() {
        let handler = ConnectivityHandler::new(
            LambdaMetadata::default(),
            StubProbe::new(ok_result(200, "{}")),
        );
        let response = handler.handle(&json!({})).await;
        assert_eq!(response.headers["X-Lambda-Version"], "");
        assert_eq!(response.headers["Content-Type"], "application/json");

        let versioned =
            ConnectivityHandler::new(metadata(), StubProbe::new(Err(ProbeError::Timeout)));
        let response = versioned.handle(&json!({})).await;
        assert_eq!(response.headers["X-Lambda-Version"], "12");
        assert_eq!(decode(&response)["lambdaVersion"], "12");
    }
}
