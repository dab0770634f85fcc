use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::metadata::LambdaMetadata;

pub const TEST_NAME: &str = "VPC Internet Connectivity";
pub const SUCCESS_MESSAGE: &str =
    "VPC Connectivity Test: Lambda successfully accessed external API from VPC";
pub const FAILURE_MESSAGE: &str = "VPC Connectivity Test: Failed to access external API";
pub const DEFAULT_HELLO_VERSION: &str = "$LATEST";

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const VERSION_HEADER: &str = "X-Lambda-Version";
pub const EXECUTION_TIME_HEADER: &str = "X-Execution-Time";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Outcome of one completed probe exchange, whatever the HTTP status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeResult {
    pub url: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub response: Value,
    #[serde(rename = "parseError", skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl ProbeResult {
    /// Interprets a fully accumulated body. Bodies that are not JSON are kept
    /// as raw text and annotated with the decode error.
    pub fn from_body(url: impl Into<String>, status_code: u16, body: &str) -> Self {
        let (response, parse_error) = match serde_json::from_str::<Value>(body) {
            Ok(decoded) => (decoded, None),
            Err(error) => (Value::String(body.to_string()), Some(error.to_string())),
        };

        Self {
            url: url.into(),
            status_code,
            response,
            parse_error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("External API request failed: {0}")]
    Transport(String),
    #[error("External API request timed out")]
    Timeout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivitySuccessBody {
    pub message: String,
    pub test: String,
    pub status: String,
    pub lambda_version: Option<String>,
    pub execution_time: String,
    #[serde(rename = "externalAPI")]
    pub external_api: ExternalApiSection,
    pub timestamp: String,
    pub environment: EnvironmentSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalApiSection {
    pub status: String,
    pub data: ProbeResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentSnapshot {
    pub region: Option<String>,
    pub function_name: Option<String>,
    pub memory_size: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectivityFailureBody {
    pub message: String,
    pub test: String,
    pub status: String,
    pub lambda_version: Option<String>,
    pub error: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HelloBody {
    pub version: String,
}

pub fn iso_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn format_elapsed(elapsed_ms: u128) -> String {
    format!("{elapsed_ms}ms")
}

pub fn connectivity_success_response(
    metadata: &LambdaMetadata,
    result: ProbeResult,
    elapsed_ms: u128,
    timestamp: String,
) -> ApiGatewayResponse {
    let execution_time = format_elapsed(elapsed_ms);
    let body = ConnectivitySuccessBody {
        message: SUCCESS_MESSAGE.to_string(),
        test: TEST_NAME.to_string(),
        status: "PASSED".to_string(),
        lambda_version: metadata.function_version.clone(),
        execution_time: execution_time.clone(),
        external_api: ExternalApiSection {
            status: "success".to_string(),
            data: result,
        },
        timestamp,
        environment: EnvironmentSnapshot {
            region: metadata.region.clone(),
            function_name: metadata.function_name.clone(),
            memory_size: metadata.memory_size.clone(),
        },
    };

    let mut headers = base_headers(metadata);
    headers.insert(EXECUTION_TIME_HEADER.to_string(), execution_time);
    json_response(200, headers, &body)
}

pub fn connectivity_failure_response(
    metadata: &LambdaMetadata,
    error: &ProbeError,
    timestamp: String,
) -> ApiGatewayResponse {
    let body = ConnectivityFailureBody {
        message: FAILURE_MESSAGE.to_string(),
        test: TEST_NAME.to_string(),
        status: "FAILED".to_string(),
        lambda_version: metadata.function_version.clone(),
        error: error.to_string(),
        timestamp,
    };

    json_response(500, base_headers(metadata), &body)
}

pub fn hello_response(metadata: &LambdaMetadata) -> ApiGatewayResponse {
    let body = HelloBody {
        version: metadata
            .function_version
            .clone()
            .unwrap_or_else(|| DEFAULT_HELLO_VERSION.to_string()),
    };

    let headers = BTreeMap::from([(
        CONTENT_TYPE_HEADER.to_string(),
        "application/json".to_string(),
    )]);
    json_response(200, headers, &body)
}

fn base_headers(metadata: &LambdaMetadata) -> BTreeMap<String, String> {
    BTreeMap::from([
        (
            CONTENT_TYPE_HEADER.to_string(),
            "application/json".to_string(),
        ),
        (VERSION_HEADER.to_string(), metadata.version_header_value()),
    ])
}

fn json_response(
    status_code: u16,
    headers: BTreeMap<String, String>,
    payload: &impl Serialize,
) -> ApiGatewayResponse {
    let body = serde_json::to_string(payload).unwrap_or_else(|error| {
        serde_json::json!({
            "status": "FAILED",
            "error": format!("failed to serialize response body: {error}"),
        })
        .to_string()
    });

    ApiGatewayResponse {
        status_code,
        headers,
        body,
    }
}
