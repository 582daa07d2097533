#[cfg(feature = "lambda")]
use contact_aggregator::api::invocation::{handle_invocation, InvocationRequest, InvocationResponse};
#[cfg(feature = "lambda")]
use contact_aggregator::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use contact_aggregator::{AppState, LambdaConfig};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

#[cfg(feature = "lambda")]
async fn function_handler(
    state: &AppState,
    event: LambdaEvent<InvocationRequest>,
) -> Result<InvocationResponse, Error> {
    tracing::info!("Starting contact aggregation function");

    let response = handle_invocation(&state.aggregator, &event.payload, &event.context.request_id).await;

    tracing::info!(status = response.status_code, "Contact aggregation function completed");
    Ok(response)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()?;
    config.validate()?;
    let state = AppState::from_config(&config)?;

    let state = &state;
    run(service_fn(move |event: LambdaEvent<InvocationRequest>| async move {
        function_handler(state, event).await
    }))
    .await
}
