#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::ServiceKind;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_bind_address, validate_file_extension, validate_path, validate_required_field,
};

/// Listens on every interface, port 9000.
pub const DEFAULT_BIND: &str = "0.0.0.0:9000";

const ARTIFACT_EXTENSIONS: &[&str] = &["json"];

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_bind_address("server.bind", config.bind_address())?;

    validate_path("model.artifact", config.model_path())?;
    validate_file_extension("model.artifact", config.model_path(), ARTIFACT_EXTENSIONS)?;

    if config.service_kind() == ServiceKind::Regressor {
        let info_path = config.model_info_path().map(str::to_string);
        let info_path = validate_required_field("model.info", &info_path)?;
        validate_path("model.info", info_path)?;
        validate_file_extension("model.info", info_path, ARTIFACT_EXTENSIONS)?;
    }

    tracing::debug!("✅ Configuration validation passed");
    Ok(())
}
