//! Command-line front end for the exporter library.
//!
//! Reads credentials from `NOTION_TOKEN` / `NOTION_FILE_TOKEN` (with a
//! hidden prompt fallback for the session token), runs the export, and
//! writes the exported file to standard output. Diagnostics go to
//! standard error so the payload stays pipeable.

use std::io::Write;

use clap::{Parser, ValueEnum};
use notion_exporter::{Credentials, ExportConfig, NotionExporter, Result};

#[derive(Parser)]
#[command(name = "notion-exporter")]
#[command(about = "Export a Notion page or database as Markdown or CSV")]
#[command(version)]
struct Cli {
    /// Block id or share URL of the page or database to export
    block: String,

    /// Output file type
    #[arg(short = 't', long = "type", value_enum, default_value_t = FileType::Md)]
    file_type: FileType,

    /// Export child subpages recursively
    #[arg(short, long)]
    recursive: bool,

    /// Skip images and file attachments, export text content only
    #[arg(long)]
    no_files: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FileType {
    /// First Markdown file in the exported archive
    Md,
    /// Full CSV of a database, including rows from linked views
    Csv,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    use tracing_subscriber::{EnvFilter, fmt};

    let filter = if cli.debug {
        EnvFilter::new("notion_exporter=debug")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let credentials = credentials_from_env()?;

    let config = ExportConfig {
        recursive: cli.recursive,
        include_contents: !cli.no_files,
        ..Default::default()
    };
    let exporter = NotionExporter::new(credentials, config)?;

    let output = match cli.file_type {
        FileType::Md => exporter.export_markdown(&cli.block).await?,
        FileType::Csv => exporter.export_csv(&cli.block, false).await?,
    };

    println!("{output}");
    Ok(())
}

/// Builds credentials from `NOTION_TOKEN` and `NOTION_FILE_TOKEN`.
///
/// An unset or empty `NOTION_TOKEN` falls back to a hidden interactive
/// prompt on stderr. The file token is optional and never prompted for.
fn credentials_from_env() -> Result<Credentials> {
    let token_v2 = match std::env::var("NOTION_TOKEN") {
        Ok(token) if !token.trim().is_empty() => token,
        _ => {
            eprint!("Paste your token_v2 cookie: ");
            std::io::stderr().flush()?;
            rpassword::read_password()?
        }
    };

    match std::env::var("NOTION_FILE_TOKEN") {
        Ok(file_token) if !file_token.trim().is_empty() => {
            Ok(Credentials::with_file_token(token_v2, file_token))
        }
        _ => Ok(Credentials::new(token_v2)),
    }
}
