use anyhow::Context;
use clap::Parser;
use ml_serve::app::{load_classification_engine, load_regression_engine};
use ml_serve::core::response::ErrorResponse;
use ml_serve::domain::model::ServiceKind;
use ml_serve::utils::logger::{self, LogFormat};
use ml_serve::ServeError;

#[derive(Parser)]
#[command(name = "score")]
#[command(about = "Score a prediction payload offline, without starting the server")]
struct Args {
    /// Path to a JSON request body, e.g. {"features": [5.1, 3.5, 1.4, 0.2]}
    #[arg(short, long)]
    input: String,

    #[arg(long, value_enum, default_value = "classifier")]
    service: ServiceKind,

    /// Path to the model artifact
    #[arg(long, default_value = "model.json")]
    model: String,

    /// Column contract of the regressor
    #[arg(long)]
    model_info: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(args.verbose, LogFormat::Compact);

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read payload file '{}'", args.input))?;
    let payload: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("payload file '{}' is not valid JSON", args.input))?;

    match score(&args, &payload) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(ServeError::PredictError(e)) => {
            let code = ServeError::PredictError(e.clone()).exit_code();
            let body = ErrorResponse {
                error: e.to_string(),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
            std::process::exit(code);
        }
        Err(e) => Err(e.into()),
    }
}

fn score(args: &Args, payload: &serde_json::Value) -> ml_serve::Result<serde_json::Value> {
    let response = match args.service {
        ServiceKind::Classifier => {
            let engine = load_classification_engine(&args.model)?;
            serde_json::to_value(engine.predict(payload)?)?
        }
        ServiceKind::Regressor => {
            let info_path = args
                .model_info
                .as_deref()
                .ok_or_else(|| ServeError::MissingConfigError {
                    field: "model_info".to_string(),
                })?;
            let engine = load_regression_engine(&args.model, info_path)?;
            serde_json::to_value(engine.predict(payload)?)?
        }
    };
    Ok(response)
}
