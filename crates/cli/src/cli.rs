use clap::Parser;

/// askmydb: turn a natural-language question into a database query.
#[derive(Parser, Debug)]
#[command(name = "askmydb", version, about)]
pub struct CliArgs {
    /// Natural-language question to convert.
    pub prompt: String,

    /// Path to a file whose contents are given to the provider as schema
    /// context (table and column descriptions).
    #[arg(long, env = "ASKMYDB_SCHEMA_FILE")]
    pub schema_file: Option<String>,

    /// Print the full result as JSON instead of the bare query.
    #[arg(long)]
    pub json: bool,
}
