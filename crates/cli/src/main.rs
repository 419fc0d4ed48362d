mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use askmydb_core::{config, Config};
use askmydb_llm::QueryService;

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    config::load_dotenv();
    let config = Config::from_env().context("invalid configuration")?;
    config.log_summary();

    let schema_context = match &args.schema_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read schema file: {}", path))?,
        None => String::new(),
    };

    let service = QueryService::from_config(&config).context("failed to create provider")?;

    let result = service
        .ask(&args.prompt, &schema_context)
        .await
        .context("query generation failed")?;

    if let Some(connection) = &result.connection {
        info!(connection = %connection, "Query targets a named connection");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.query);
    }

    Ok(())
}
