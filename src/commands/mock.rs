use crate::faker::{FakerOptions, ResponseFaker};
use crate::loader::SchemaProvider;
use crate::problem::SUCCESS_CHAIN;
use crate::routing::OperationAddress;
use crate::{MockbirdError, Result};
use colored::*;
use std::path::Path;

/// One-shot synthesis without a server. The body goes to stdout so it can
/// be piped; everything else goes to stderr.
pub fn execute_mock(
    spec_path: &Path,
    path: &str,
    method: &str,
    status: Option<&str>,
    example: Option<&str>,
    content_type: &str,
) -> Result<()> {
    let provider = SchemaProvider::from_file(spec_path)?;
    let address = OperationAddress::new(path, method);

    let candidates: &[&str] = match &status {
        Some(status) => std::slice::from_ref(status),
        None => SUCCESS_CHAIN,
    };

    let faker = ResponseFaker::new(FakerOptions::default());
    let response = faker
        .mock(provider.spec(), &address, candidates, content_type, example)
        .map_err(MockbirdError::MockError)?;

    eprintln!(
        "{} {} {} {}",
        "✓".green(),
        address.method().to_ascii_uppercase().bold(),
        address.path(),
        response.status.to_string().cyan()
    );
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    Ok(())
}
