use crate::error::{MockbirdError, Result};
use oas3::OpenApiV3Spec;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Load an OpenAPI specification from a YAML or JSON file.
///
/// A document without any paths still loads successfully: the engine reports
/// it per-request as "no resource provided" rather than refusing to start.
pub fn load_openapi<P: AsRef<Path>>(path: P) -> Result<OpenApiV3Spec> {
    let path = path.as_ref();

    let content = fs::read_to_string(path).map_err(|e| {
        MockbirdError::SchemaLoadError(format!("Failed to read file {}: {}", path.display(), e))
    })?;

    let spec: OpenApiV3Spec = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&content).map_err(|e| {
            MockbirdError::SchemaLoadError(format!("Failed to parse OpenAPI JSON: {}", e))
        })?
    } else {
        serde_yaml::from_str(&content).map_err(|e| {
            MockbirdError::SchemaLoadError(format!("Failed to parse OpenAPI YAML: {}", e))
        })?
    };

    validate_openapi(&spec)?;

    Ok(spec)
}

/// Check the document is an OpenAPI version this engine understands.
fn validate_openapi(spec: &OpenApiV3Spec) -> Result<()> {
    if !spec.openapi.starts_with("3.0") && !spec.openapi.starts_with("3.1") {
        return Err(MockbirdError::ValidationError(format!(
            "Unsupported OpenAPI version: {}. Only 3.0.x and 3.1.x are supported.",
            spec.openapi
        )));
    }

    Ok(())
}

/// Once-loaded, read-only handle to a parsed OpenAPI document.
///
/// The spec is parsed a single time and shared behind an `Arc`; every
/// concurrent request reads the same immutable document.
#[derive(Debug, Clone)]
pub struct SchemaProvider {
    spec: Arc<OpenApiV3Spec>,
}

impl SchemaProvider {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            spec: Arc::new(load_openapi(path)?),
        })
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let spec: OpenApiV3Spec = serde_yaml::from_str(yaml).map_err(|e| {
            MockbirdError::SchemaLoadError(format!("Failed to parse OpenAPI YAML: {}", e))
        })?;
        validate_openapi(&spec)?;

        Ok(Self {
            spec: Arc::new(spec),
        })
    }

    pub fn spec(&self) -> &OpenApiV3Spec {
        &self.spec
    }
}
