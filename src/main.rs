//! recordctl - inspect and produce ledger records
//!
//! Commands:
//! - recordctl list
//! - recordctl decode <record> <hex>
//! - recordctl encode <record> <json>

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chess_ledger_records::records::schema_for;
use chess_ledger_records::schema::{from_json, to_json};
use chess_ledger_records::{CodecConfig, SchemaCodec, SchemaRegistry};

/// Encode and decode game records in the ledger wire format
#[derive(Parser, Debug)]
#[command(name = "recordctl")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON codec configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the maximum bytes/text field length
    #[arg(long, global = true)]
    max_field_len: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List known record types and their fields in wire order
    List,

    /// Decode a hex-encoded record and print it as JSON
    Decode {
        /// Record type, e.g. in_game_result
        record: String,
        /// Encoded record as hex
        hex: String,
    },

    /// Encode a JSON record and print it as hex
    Encode {
        /// Record type, e.g. timeout_data
        record: String,
        /// Record as a JSON object keyed by wire key
        json: String,
    },
}

fn load_config(cli: &Cli) -> Result<CodecConfig, String> {
    let mut config = match &cli.config {
        Some(path) => CodecConfig::from_file(path).map_err(|e| e.to_string())?,
        None => CodecConfig::default(),
    };
    if let Some(max) = cli.max_field_len {
        config.max_field_len = max;
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn run(cli: Cli) -> Result<String, String> {
    let config = load_config(&cli)?;
    let codec = SchemaCodec::new(config);
    let registry = SchemaRegistry::standard().map_err(|e| e.to_string())?;

    match cli.command {
        Command::List => {
            let mut out = String::new();
            for id in registry.record_ids() {
                let schema = schema_for(&registry, id).map_err(|e| e.to_string())?;
                out.push_str(id);
                out.push('\n');
                for field in schema.wire_order() {
                    out.push_str(&format!(
                        "  {:<16} {:<10} ({})\n",
                        field.wire_key,
                        field.kind.type_name(),
                        field.name
                    ));
                }
            }
            Ok(out.trim_end().to_string())
        }
        Command::Decode { record, hex } => {
            let schema = schema_for(&registry, &record).map_err(|e| e.to_string())?;
            let bytes = hex::decode(hex.trim()).map_err(|e| format!("invalid hex: {e}"))?;
            let value = codec.decode(schema, &bytes).map_err(|e| e.to_string())?;
            let json = to_json(schema, &value).map_err(|e| e.to_string())?;
            serde_json::to_string_pretty(&json).map_err(|e| e.to_string())
        }
        Command::Encode { record, json } => {
            let schema = schema_for(&registry, &record).map_err(|e| e.to_string())?;
            let json: serde_json::Value =
                serde_json::from_str(&json).map_err(|e| format!("invalid JSON: {e}"))?;
            let value = from_json(schema, &json).map_err(|e| e.to_string())?;
            let bytes = codec.encode(schema, &value).map_err(|e| e.to_string())?;
            Ok(hex::encode(bytes))
        }
    }
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    match run(Cli::parse()) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
