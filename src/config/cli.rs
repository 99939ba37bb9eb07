use crate::config::{validate_provider, DEFAULT_BIND};
use crate::domain::model::ServiceKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "ml-serve")]
#[command(about = "Serve trained models behind HTTP prediction endpoints")]
pub struct CliConfig {
    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, default_value = DEFAULT_BIND)]
    pub bind: String,

    #[arg(long, value_enum, default_value = "classifier")]
    pub service: ServiceKind,

    #[arg(long, default_value = "model.json")]
    pub model: String,

    #[arg(long, help = "Column contract of the regressor (required for --service regressor)")]
    pub model_info: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl ConfigProvider for CliConfig {
    fn bind_address(&self) -> &str {
        &self.bind
    }

    fn service_kind(&self) -> ServiceKind {
        self.service
    }

    fn model_path(&self) -> &str {
        &self.model
    }

    fn model_info_path(&self) -> Option<&str> {
        self.model_info.as_deref()
    }

    fn verbose(&self) -> bool {
        self.verbose
    }

    fn json_logs(&self) -> bool {
        self.json_logs
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
