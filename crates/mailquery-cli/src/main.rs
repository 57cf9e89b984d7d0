//! MailQuery - filter rendering entry point
//!
//! Reads a nested-map filter payload from a file or stdin and prints it in
//! Polish notation or the IMAP SEARCH dialect.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use mailquery_common::{Config, FieldFallback, LoggingConfig, NotationKind};
use mailquery_core::Filter;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "mailquery", version, about = "Render mail search filters")]
struct Cli {
    /// Configuration file (defaults to ./mailquery.toml or /etc/mailquery/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output notation, overriding the configuration
    #[arg(long, value_enum)]
    notation: Option<NotationArg>,

    /// Treat unrecognized keys as field names anywhere in the payload
    #[arg(long)]
    permissive: bool,

    /// Print the parsed filter back as a nested-map JSON payload
    #[arg(long)]
    json: bool,

    /// Payload file; stdin when omitted
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NotationArg {
    Polish,
    SearchQuery,
}

impl From<NotationArg> for NotationKind {
    fn from(arg: NotationArg) -> Self {
        match arg {
            NotationArg::Polish => NotationKind::Polish,
            NotationArg::SearchQuery => NotationKind::SearchQuery,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    if let Some(notation) = cli.notation {
        config.filter.notation = notation.into();
    }
    if cli.permissive {
        config.filter.field_fallback = FieldFallback::Permissive;
    }

    // Initialize logging
    init_logging(&config.logging);

    debug!(
        notation = %config.filter.notation,
        max_depth = config.filter.max_depth,
        "Configuration loaded"
    );

    let payload = read_payload(cli.file.as_ref())?;

    let filter = match Filter::from_json_str(&payload, &config.filter) {
        Ok(filter) => filter,
        Err(e) => {
            error!(code = e.code(), "Rejected filter: {}", e);
            return Err(e.into());
        }
    };

    let output = if cli.json {
        serde_json::to_string(&filter.to_json(&config.filter)?)?
    } else {
        filter.render(&config.filter)?
    };

    info!("Rendered filter");
    println!("{}", output);

    Ok(())
}

fn read_payload(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read payload from {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read payload from stdin")?;
            Ok(buf)
        }
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,mailquery={}", logging.level)));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
