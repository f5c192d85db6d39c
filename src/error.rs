use thiserror::Error;

#[derive(Error, Debug)]
pub enum MockbirdError {
    #[error("Failed to load OpenAPI file: {0}")]
    SchemaLoadError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Mocking error: {0}")]
    MockError(#[from] crate::faker::FakerError),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MockbirdError>;
