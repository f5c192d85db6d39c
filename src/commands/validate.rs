use crate::Result;
use crate::loader;
use colored::*;
use std::path::Path;

pub fn execute_validate(spec_path: &Path) -> Result<()> {
    println!("{}", "Validating OpenAPI file...".bright_blue());
    println!("  Path: {}", spec_path.display());

    match loader::load_openapi(spec_path) {
        Ok(spec) => {
            println!("{}", "✓ OpenAPI is valid".green());
            println!("  Title: {}", spec.info.title.bold());
            println!("  Version: {}", spec.info.version);
            println!("  OpenAPI Version: {}", spec.openapi);

            let path_count = spec.paths.as_ref().map(|paths| paths.len()).unwrap_or(0);
            println!("  Paths: {}", path_count);
            if path_count == 0 {
                println!(
                    "  {}",
                    "⚠ No paths defined, every request will be rejected".yellow()
                );
            }

            let operation_count: usize = spec
                .paths
                .as_ref()
                .map(|paths| {
                    paths
                        .values()
                        .map(crate::routing::operation_count)
                        .sum()
                })
                .unwrap_or(0);
            if operation_count > 0 {
                println!("  Operations: {}", operation_count);
            }

            Ok(())
        }
        Err(e) => {
            println!("{}", "✗ OpenAPI validation failed".red().bold());
            println!("  {}", e.to_string().red());
            Err(e)
        }
    }
}
