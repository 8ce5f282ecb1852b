//! `ctxdata` CLI: inspect pipeline context wire payloads from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Flatten a wire payload to plain JSON (stdin → stdout)
//! echo '{"t":2,"d":[{"k":"os","v":"linux"}]}' | ctxdata flatten
//!
//! # Re-encode a payload in canonical wire form, file to file
//! ctxdata normalize -i payload.json -o canonical.json
//!
//! # List every node depth-first, without dictionary keys
//! ctxdata walk --omit-keys -i payload.json
//!
//! # Show tree shape statistics
//! ctxdata stats -i payload.json
//! ```
//!
//! Decode diagnostics are logged to stderr; set `CTXDATA_LOG` (e.g. `debug`) or
//! pass `--verbose` to see them.

use std::borrow::Cow;
use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pipeline_context::{ContextValue, StringValue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ctxdata",
    version,
    about = "Pipeline context data wire payload CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log decode diagnostics (overridden by CTXDATA_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a payload and print it as plain JSON
    Flatten {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a payload and re-encode it in canonical wire form
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the wire output
        #[arg(long)]
        pretty: bool,
    },
    /// Print every node depth-first, one per line
    Walk {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Skip dictionary keys
        #[arg(long)]
        omit_keys: bool,
    },
    /// Show tree statistics (nodes, keys, depth)
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Flatten {
            input,
            output,
            pretty,
        } => {
            let value = read_payload(input.as_deref())?;
            let json = pipeline_context::to_json(&value);
            let text = if pretty {
                serde_json::to_string_pretty(&json)?
            } else {
                serde_json::to_string(&json)?
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Normalize {
            input,
            output,
            pretty,
        } => {
            let value = read_payload(input.as_deref())?;
            let text = if pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                pipeline_context::encode(&value).context("Failed to encode context payload")?
            };
            write_output(output.as_deref(), &text)?;
        }
        Commands::Walk {
            input,
            output,
            omit_keys,
        } => {
            let value = read_payload(input.as_deref())?;
            write_output(output.as_deref(), &render_walk(&value, omit_keys))?;
        }
        Commands::Stats { input, output } => {
            let raw = read_input(input.as_deref())?;
            let value = decode_payload(&raw)?;
            write_output(output.as_deref(), &render_stats(&value, raw.len()))?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CTXDATA_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// One line per traversed item, indented two spaces per depth level.
fn render_walk(value: &ContextValue, omit_keys: bool) -> String {
    let mut out = String::new();
    let mut walk = pipeline_context::traverse(value, omit_keys);
    while let Some(item) = walk.next() {
        out.push_str(&"  ".repeat(walk.depth()));
        let line = match (&item, &*item) {
            (Cow::Owned(_), ContextValue::String(s)) => format!("key {}", quote(s)),
            (_, ContextValue::String(s)) => format!("string {}", quote(s)),
            (_, ContextValue::Array(array)) => format!("array ({} items)", array.len()),
            (_, ContextValue::Dictionary(dict)) => format!("dictionary ({} entries)", dict.len()),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}

fn render_stats(value: &ContextValue, wire_bytes: usize) -> String {
    let stats = value.stats();
    format!(
        "Nodes:      {}\nKeys:       {}\nMax depth:  {}\nWire size:  {} bytes\n",
        stats.nodes, stats.keys, stats.max_depth, wire_bytes
    )
}

fn quote(s: &StringValue) -> String {
    match s.value() {
        Some(text) => serde_json::Value::String(text.to_string()).to_string(),
        None => "null".to_string(),
    }
}

fn read_payload(path: Option<&str>) -> Result<ContextValue> {
    let raw = read_input(path)?;
    decode_payload(&raw)
}

fn decode_payload(raw: &str) -> Result<ContextValue> {
    debug!(bytes = raw.len(), "decoding context payload");
    pipeline_context::decode(raw)
        .context("Failed to decode context payload")?
        .context("payload did not contain a context value")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read context payload from {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read context payload from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
