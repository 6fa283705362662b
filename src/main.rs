//! binpack - compile JSON Schemas into binary encodings, and encode or decode JSON with them.
//!
//! ```bash
//! # Print the canonical form of a schema
//! binpack canonicalize schema.json
//!
//! # Print the encoding a schema compiles to
//! binpack compile schema.json
//!
//! # Encode an instance read from stdin
//! binpack encode schema.json < instance.json > instance.bin
//!
//! # Decode it again
//! binpack decode schema.json instance.bin
//! ```

use anyhow::{Context, Result};
use binpack::schema::DRAFT_2020_12;
use binpack::OfficialResolver;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Compile JSON Schemas into binary encodings.
#[derive(Parser)]
#[command(name = "binpack", version, about)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Dialect of schemas that do not declare `$schema`
    #[arg(long, global = true, default_value = DRAFT_2020_12)]
    default_dialect: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the canonical form of a schema
    Canonicalize {
        /// Schema file (`-` or omitted for stdin)
        schema: Option<PathBuf>,
    },

    /// Print the encoding marker a schema compiles to
    Compile {
        /// Schema file (`-` or omitted for stdin)
        schema: Option<PathBuf>,
    },

    /// Encode a JSON instance, writing the raw bytes to stdout
    Encode {
        /// Schema file
        schema: PathBuf,
        /// Instance file (`-` or omitted for stdin)
        instance: Option<PathBuf>,
    },

    /// Decode raw bytes into a JSON instance
    Decode {
        /// Schema file
        schema: PathBuf,
        /// Encoded file (`-` or omitted for stdin)
        data: Option<PathBuf>,
    },

    /// Print the version
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let dialect = Some(cli.default_dialect.as_str());

    match cli.command {
        Commands::Canonicalize { schema } => {
            let mut schema = read_json(schema.as_deref())?;
            binpack::canonicalize(&mut schema, &OfficialResolver, dialect).context("Failed to canonicalize schema")?;
            print_json(&schema)?;
        }
        Commands::Compile { schema } => {
            let mut schema = read_json(schema.as_deref())?;
            binpack::compile(&mut schema, &OfficialResolver, dialect).context("Failed to compile schema")?;
            print_json(&schema)?;
        }
        Commands::Encode { schema, instance } => {
            let schema = read_json(Some(&schema))?;
            let encoding = binpack::load(&schema, &OfficialResolver, dialect).context("Failed to compile schema")?;
            let instance = read_json(instance.as_deref())?;

            let bytes = binpack::to_vec(&instance, &encoding).context("Failed to encode instance")?;
            info!(encoding = encoding.name(), bytes = bytes.len(), "encoded instance");

            let mut stdout = io::stdout();
            stdout.write_all(&bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to write to stdout")?;
        }
        Commands::Decode { schema, data } => {
            let schema = read_json(Some(&schema))?;
            let encoding = binpack::load(&schema, &OfficialResolver, dialect).context("Failed to compile schema")?;
            let bytes = read_input(data.as_deref())?;

            let value = binpack::from_slice(&bytes, &encoding).context("Failed to decode data")?;
            info!(encoding = encoding.name(), bytes = bytes.len(), "decoded instance");
            print_json(&value)?;
        }
        Commands::Version => {
            println!("binpack {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) if path != Path::new("-") => {
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut buf = vec![];
            io::stdin()
                .lock()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn read_json(path: Option<&Path>) -> Result<Value> {
    let bytes = read_input(path)?;
    let name = path.map_or_else(|| "stdin".to_string(), |path| path.display().to_string());
    serde_json::from_slice(&bytes).with_context(|| format!("Failed to parse JSON from {}", name))
}

fn print_json(value: &Value) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    println!("{}", json);
    Ok(())
}
