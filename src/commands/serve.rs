use crate::engine::{Engine, EngineConfig};
use crate::loader::SchemaProvider;
use crate::{Result, server, telemetry};
use colored::*;
use std::path::Path;

pub async fn execute_serve(
    spec_path: &Path,
    port: u16,
    no_validate_request: bool,
    no_validate_response: bool,
) -> Result<()> {
    println!("{}", "Starting mock server...".bright_blue());
    println!("  Spec: {}", spec_path.display());
    println!("  Port: {}", port);
    println!();

    let _guard = telemetry::init_telemetry()?;

    // The document is loaded once; a broken spec fails here, not per request.
    let provider = SchemaProvider::from_file(spec_path)?;
    let spec = provider.spec();
    println!("{}", "✓ OpenAPI loaded".green());
    println!("  Title: {}", spec.info.title.bold());
    println!(
        "  Paths: {}",
        spec.paths.as_ref().map(|paths| paths.len()).unwrap_or(0)
    );
    println!();

    let config = EngineConfig {
        validate_request: !no_validate_request,
        validate_response: !no_validate_response,
        ..EngineConfig::default()
    };
    let engine = Engine::new(provider, config);

    let addr = format!("127.0.0.1:{}", port)
        .parse()
        .map_err(|e| crate::MockbirdError::SchemaLoadError(format!("invalid address: {}", e)))?;

    server::start_server(addr, engine).await?;

    Ok(())
}
