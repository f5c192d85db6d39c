use clap::Parser;
use mockbird::{
    Result,
    cli::{Cli, Commands},
    commands,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            spec,
            port,
            no_validate_request,
            no_validate_response,
        } => {
            commands::execute_serve(&spec, port, no_validate_request, no_validate_response)
                .await?;
        }
        Commands::Mock {
            spec,
            path,
            method,
            status,
            example,
            content_type,
        } => {
            commands::execute_mock(
                &spec,
                &path,
                &method,
                status.as_deref(),
                example.as_deref(),
                &content_type,
            )?;
        }
        Commands::Validate { spec } => {
            commands::execute_validate(&spec)?;
        }
    }

    Ok(())
}
