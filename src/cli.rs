use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mockbird")]
#[command(version)]
#[command(about = "OpenAPI mock server with request and response validation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the mock server
    Serve {
        /// Path to the OpenAPI file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Port number
        #[arg(short, long, default_value = "4010")]
        port: u16,

        /// Skip request validation
        #[arg(long)]
        no_validate_request: bool,

        /// Skip response validation
        #[arg(long)]
        no_validate_response: bool,
    },

    /// Synthesize a single response and print it to stdout
    Mock {
        /// Path to the OpenAPI file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,

        /// Request path to mock
        #[arg(short, long)]
        path: String,

        /// HTTP method
        #[arg(short, long, default_value = "get")]
        method: String,

        /// Documented status code to serve (first of 200, 201 if not given)
        #[arg(long)]
        status: Option<String>,

        /// Named example to serve
        #[arg(short, long)]
        example: Option<String>,

        /// Response content type
        #[arg(short, long, default_value = "application/json")]
        content_type: String,
    },

    /// Validate an OpenAPI file and print a summary
    Validate {
        /// Path to the OpenAPI file (YAML or JSON)
        #[arg(short, long)]
        spec: PathBuf,
    },
}
