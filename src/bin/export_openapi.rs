//! Export OpenAPI specification to JSON file
//!
//! Usage:
//!   cargo run --bin export_openapi > openapi.json
//!
//! Or with file output:
//!   cargo run --bin export_openapi -- --output docs/openapi.json

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use utoipa::OpenApi;

use gophermart::gateway::openapi::ApiDoc;

#[derive(Debug, Parser)]
#[command(name = "export_openapi", about = "Print or write the OpenAPI document")]
struct Args {
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let json = ApiDoc::openapi()
        .to_pretty_json()
        .context("Failed to serialize OpenAPI spec")?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("OpenAPI spec exported to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}
