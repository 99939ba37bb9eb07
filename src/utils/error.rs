use thiserror::Error;

/// Rejections produced while normalizing a `/predict` payload.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing 'features' key in request")]
    MissingKey,

    #[error("Features must be {expected}")]
    WrongType { expected: &'static str },

    #[error("Empty features list")]
    EmptyInput,

    #[error("Feature vector at index {index} must contain exactly {expected} values")]
    ArityError { index: usize, expected: usize },

    #[error("All values in feature vector at index {index} must be numeric")]
    TypeError { index: usize },

    #[error("Element at index {index} does not match the shape of element 0")]
    MixedShape { index: usize },

    #[error("Missing column '{column}' in input")]
    MissingColumn { column: String },

    #[error("Unexpected columns in input: {columns:?}")]
    UnexpectedColumn { columns: Vec<String> },

    #[error("Invalid input format: {cause}")]
    InvalidFormat { cause: String },
}

impl ValidationError {
    pub fn invalid_format(cause: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            cause: cause.into(),
        }
    }
}

/// Failures raised by, or detected in the output of, a model gateway.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("{message}")]
    Invocation { message: String },

    #[error("Model returned {actual} outputs for {expected} input rows")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("Model returned an empty probability vector for row {row}")]
    EmptyProbabilities { row: usize },

    #[error("Model returned a non-finite value for row {row}")]
    NonFiniteOutput { row: usize },
}

impl GatewayError {
    pub fn invocation(message: impl Into<String>) -> Self {
        GatewayError::Invocation {
            message: message.into(),
        }
    }
}

/// Outcome of a single prediction request. Keeps client mistakes apart from
/// backend faults even though the HTTP layer answers 400 for both.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PredictError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::Validation(_))
    }
}

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration value: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Failed to load artifact {path}: {message}")]
    ArtifactError { path: String, message: String },

    #[error("Prediction failed: {0}")]
    PredictError(#[from] PredictError),
}

impl ServeError {
    pub fn artifact(path: impl Into<String>, message: impl Into<String>) -> Self {
        ServeError::ArtifactError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Process exit code used by the binaries when startup or scoring fails.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServeError::PredictError(PredictError::Validation(_)) => 2,
            ServeError::PredictError(PredictError::Gateway(_)) => 3,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServeError>;
