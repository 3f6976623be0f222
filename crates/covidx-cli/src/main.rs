#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
//! `covidx` CLI - inspect covered-column index keys
//!
//! Usage:
//!   `covidx decode 0x616c696365...`
//!   `covidx spec --config covidx.toml`
//!   `covidx index --row row.json --ts 10`
//!   `covidx state --row row.json --column info:name`

mod fixture;
mod output;

use anyhow::Context;
use clap::{Parser, Subcommand};
use covidx_core::{
    codec, CoveredColumn, CovidxConfig, IndexBuilder, IndexSpecBuilder,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::fixture::RowFixture;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "covidx")]
#[command(author, version, about = "covidx CLI - covered-column index codec inspector")]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./covidx.toml when present)
    #[arg(short, long, global = true, env = "COVIDX_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level (repeat for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a composite index key
    Decode {
        /// Key as hex, optionally prefixed with 0x
        key: String,
    },

    /// Print the group specification property map for the configured groups
    Spec,

    /// Compute index updates for a row fixture
    Index {
        /// Row fixture (JSON)
        #[arg(short, long)]
        row: PathBuf,

        /// Timestamp of the update event
        #[arg(long)]
        ts: u64,
    },

    /// Show the visible cells of a row fixture
    State {
        /// Row fixture (JSON)
        #[arg(short, long)]
        row: PathBuf,

        /// Covered column (family:qualifier, family: for all qualifiers)
        #[arg(long = "column", required = true)]
        columns: Vec<String>,

        /// Resolution ceiling
        #[arg(long, default_value_t = u64::MAX)]
        ts: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<CovidxConfig> {
    let config = match path {
        Some(path) => CovidxConfig::load_existing(path)?,
        None => CovidxConfig::load()?,
    };
    config.validate()?;
    Ok(config)
}

fn init_logging(config: &CovidxConfig, verbose: u8) {
    let level = match verbose {
        0 => config.logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Decode { key } => {
            let raw = key.trim();
            let raw = raw.strip_prefix("0x").unwrap_or(raw);
            let bytes = hex::decode(raw).context("Key is not valid hex")?;
            let (values, primary_key) = codec::decode_with_primary_key(&bytes)?;
            tracing::debug!(slots = values.len(), "decoded key");
            output::print_decoded(&values, &primary_key, cli.format)?;
        }
        Commands::Spec => {
            let mut builder = IndexSpecBuilder::new();
            for group in config.column_groups()? {
                let index = builder.add_index_group(&group)?;
                tracing::debug!(index, table = group.table(), "registered group");
            }
            output::print_properties(builder.properties(), cli.format)?;
        }
        Commands::Index { row, ts } => {
            let fixture = RowFixture::load(&row)?;
            let builder = IndexBuilder::new(config.column_groups()?, config.layout()?);
            if builder.groups().is_empty() {
                tracing::warn!("no column groups configured");
            }
            let updates = builder.build(&fixture.persisted_cells(), &fixture.mutation()?, ts)?;
            output::print_updates(&updates, cli.format)?;
        }
        Commands::State { row, columns, ts } => {
            let fixture = RowFixture::load(&row)?;
            let columns = columns
                .iter()
                .map(|spec| CoveredColumn::parse(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let cells = fixture.store()?.visible_cells(&columns, ts)?;
            output::print_cells(&cells, cli.format)?;
        }
    }

    Ok(())
}
