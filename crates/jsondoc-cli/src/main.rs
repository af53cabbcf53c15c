//! `jsondoc` CLI: reformat JSON, infer JSON Schema and convert to JSON Lines.
//!
//! ## Usage
//!
//! ```sh
//! # Pretty-print (stdin → stdout)
//! echo '{"name":"Alice","age":30}' | jsondoc format
//!
//! # Minify a file into another file, dropping noise fields
//! jsondoc format --minify --strip 'etag,*.kind' -i data.json -o data.min.json
//!
//! # Infer a schema from a sample document
//! jsondoc schema -i sample.json --depth 4 --description "Order payload"
//!
//! # JSON array of objects → JSON Lines, and back
//! jsondoc lines -i orders.json > orders.jsonl
//! jsondoc lines --from-lines -i orders.jsonl
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG` (e.g. `RUST_LOG=jsondoc_core=trace`)
//! to see lenient-parse substitutions and schema depth cut-offs.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use jsondoc_core::{
    parse_json_lines, strip_fields, to_json_lines, IndentStyle, JsonArray, JsonObject, JsonValue,
    ParseOptions, SchemaBuilder, WriteOptions,
};
use std::io::{self, Read};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsondoc",
    version,
    about = "Format JSON, infer JSON Schema and convert to JSON Lines"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug diagnostics to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-serialize a JSON document
    Format {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Write without insignificant whitespace
        #[arg(long, conflicts_with = "indent")]
        minify: bool,
        /// Spaces per indentation level
        #[arg(long, default_value_t = 2)]
        indent: usize,
        /// Reject malformed input instead of substituting null
        #[arg(long)]
        strict: bool,
        /// Comma-separated field patterns to remove (e.g. "etag,*.kind")
        #[arg(long)]
        strip: Option<String>,
        /// Quote integers JavaScript cannot represent exactly
        #[arg(long)]
        quote_unsafe_integers: bool,
    },
    /// Infer a JSON Schema from a sample document
    Schema {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Maximum object nesting to describe
        #[arg(long, default_value_t = jsondoc_core::schema::DEFAULT_DEPTH)]
        depth: usize,
        /// Description for the root schema
        #[arg(long)]
        description: Option<String>,
    },
    /// Convert a JSON array of objects to JSON Lines
    Lines {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Read JSON Lines and write an indented JSON array instead
        #[arg(long)]
        from_lines: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Format {
            input,
            output,
            minify,
            indent,
            strict,
            strip,
            quote_unsafe_integers,
        } => {
            let text = read_input(input.as_deref())?;
            let options = if strict {
                ParseOptions::strict()
            } else {
                ParseOptions::lenient()
            };
            let mut value = parse_document(&text, options)?;

            let patterns = split_patterns(strip.as_deref());
            if !patterns.is_empty() {
                value = strip_fields(&value, &patterns);
            }

            let style = if minify {
                IndentStyle::Minified
            } else {
                IndentStyle::Indented(indent)
            };
            let write_options = WriteOptions {
                style,
                quote_unsafe_integers,
            };
            let out = jsondoc_core::writer::to_string(&value, &write_options);
            write_output(output.as_deref(), &out)?;
        }
        Commands::Schema {
            input,
            output,
            depth,
            description,
        } => {
            let text = read_input(input.as_deref())?;
            let value = parse_document(&text, ParseOptions::lenient())?;
            let schema = SchemaBuilder::new()
                .with_depth(depth)
                .from_value(&value, description.as_deref());
            let out = schema.to_json().to_json_string(IndentStyle::Indented(2));
            write_output(output.as_deref(), &out)?;
        }
        Commands::Lines {
            input,
            output,
            from_lines,
        } => {
            let text = read_input(input.as_deref())?;
            let out = if from_lines {
                let items = parse_json_lines(&text).context("Failed to parse JSON Lines")?;
                let array: JsonArray = items.into_iter().map(JsonValue::from).collect();
                array.to_json_string(IndentStyle::Indented(2))
            } else {
                let value = parse_document(&text, ParseOptions::strict())?;
                to_json_lines(&array_of_objects(&value)?)
            };
            write_output(output.as_deref(), &out)?;
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let fallback = if verbose {
        "jsondoc=debug,jsondoc_core=debug"
    } else {
        "jsondoc=warn,jsondoc_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn parse_document(text: &str, options: ParseOptions) -> Result<JsonValue> {
    let value = JsonValue::parse_with(text, options).context("Failed to parse JSON input")?;
    if value.is_undefined() {
        bail!("Input is empty");
    }
    debug!(kind = %value.kind(), bytes = text.len(), "parsed input document");
    Ok(value)
}

/// Elements of a root array, each an object or `null`.
fn array_of_objects(value: &JsonValue) -> Result<Vec<Option<JsonObject>>> {
    let Some(array) = value.as_array() else {
        bail!("Expected a JSON array of objects, found {}", value.kind());
    };
    array
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            JsonValue::Object(o) => Ok(Some(o.clone())),
            JsonValue::Null => Ok(None),
            other => bail!("Element {} is {}, expected an object or null", i, other.kind()),
        })
        .collect()
}

/// `"etag, *.kind"` → `["etag", "*.kind"]`; empty parts are dropped.
fn split_patterns(raw: Option<&str>) -> Vec<&str> {
    raw.map(|r| {
        r.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{content}\n"))
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
