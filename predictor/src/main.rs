//! Maize Planting Predictor - command line adapter
//!
//! Reads an observation as JSON from stdin and writes either a decision or an
//! error payload as JSON to stdout. Exits non-zero on failure.

use std::process::ExitCode;

use chrono::Utc;
use maize_planting_predictor::{
    config::LoggingConfig, logging, service, AppError, AppResult, Config, PredictionService,
};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            logging::init(&LoggingConfig::default());
            return report_failure(err.into());
        }
    };

    logging::init(&config.logging);

    let span = tracing::info_span!("prediction", request_id = %uuid::Uuid::new_v4());
    let _guard = span.enter();

    tracing::debug!(environment = %config.environment, model = %config.model.path, "Starting prediction");

    match run(&config) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(err) => report_failure(err),
    }
}

fn run(config: &Config) -> AppResult<String> {
    let input = service::read_request(std::io::stdin().lock())?;
    let decision = PredictionService::new(&config.model).handle(&input)?;

    serde_json::to_string(&decision).map_err(|e| AppError::Internal(e.into()))
}

fn report_failure(err: AppError) -> ExitCode {
    tracing::error!(code = err.code(), "Prediction failed: {}", err);

    match serde_json::to_string(&err.to_payload(Utc::now())) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to encode error payload: {}", e),
    }

    ExitCode::FAILURE
}
