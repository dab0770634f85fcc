use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use vpc_probe_lambda::handlers::hello::handle_hello;
use vpc_probe_lambda::runtime::contract::ApiGatewayResponse;
use vpc_probe_lambda::runtime::metadata::LambdaMetadata;
use vpc_probe_lambda::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing()?;

    let metadata = LambdaMetadata::from_env();
    let metadata = &metadata;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiGatewayResponse, Error>(handle_hello(metadata, &event.payload))
    }))
    .await
}
