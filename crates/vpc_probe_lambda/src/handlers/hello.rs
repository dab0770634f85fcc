use serde_json::Value;

use crate::runtime::contract::{hello_response, ApiGatewayResponse};
use crate::runtime::metadata::LambdaMetadata;

pub fn handle_hello(metadata: &LambdaMetadata, event: &Value) -> ApiGatewayResponse {
    tracing::info!(
        component = "hello_handler",
        lambda_version = ?metadata.function_version,
        event = %event,
        "invocation_received"
    );
    hello_response(metadata)
}
