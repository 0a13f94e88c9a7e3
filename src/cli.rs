use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::batch::process_batch;
use crate::crypto::{CipherContext, sha256_hex};
use crate::display::print_results;
use crate::export::{ExportFormat, export_results};
use crate::interactive::run_session;
use crate::source;

#[derive(Parser)]
#[command(name = "ssn-decryptor")]
#[command(about = "Decrypt AES-256-CBC encrypted SSN values, one at a time or in bulk", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive session (default)
    Interactive,
    /// Decrypt a single hex-encoded value
    Value {
        /// Hex-encoded ciphertext
        cipher_hex: String,
        /// Encryption key, 64 hex characters
        #[arg(long)]
        key: String,
        /// Initialization vector, 32 hex characters
        #[arg(long)]
        iv: String,
    },
    /// Decrypt all records in a JSON or CSV file
    File {
        /// Path to the input file
        path: PathBuf,
        /// Encryption key, 64 hex characters
        #[arg(long)]
        key: String,
        /// Initialization vector, 32 hex characters
        #[arg(long)]
        iv: String,
        /// Input format: json or csv (inferred from the extension when omitted)
        #[arg(long)]
        format: Option<String>,
        /// Write results to a timestamped file: json or csv
        #[arg(long)]
        export: Option<String>,
    },
    /// Encrypt a plaintext value, printing the hex ciphertext
    Encrypt {
        /// Plaintext to encrypt
        plaintext: String,
        /// Encryption key, 64 hex characters
        #[arg(long)]
        key: String,
        /// Initialization vector, 32 hex characters
        #[arg(long)]
        iv: String,
    },
    /// Print the SHA-256 hex digest of a value
    Hash {
        /// Value to hash
        payload: String,
    },
}

pub fn run_cli() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Interactive) => run_session(),

        Some(Commands::Value { cipher_hex, key, iv }) => {
            let ctx = CipherContext::new(&key, &iv)?;
            let plaintext = ctx.decrypt(&cipher_hex)?;
            println!("{}", plaintext);
            Ok(())
        }

        Some(Commands::File {
            path,
            key,
            iv,
            format,
            export,
        }) => {
            let ctx = CipherContext::new(&key, &iv)?;

            let records = match input_format(format.as_deref(), &path)? {
                InputFormat::Json => source::records_from_json_file(&path)?,
                InputFormat::Csv => source::records_from_csv_file(&path)?,
            };
            log::info!("Loaded {} records from {}", records.len(), path.display());

            let (outcomes, summary) = process_batch(&ctx, &records);
            print_results(&outcomes, &summary);

            if let Some(export) = export {
                let format = parse_export_format(&export)?;
                let written = export_results(&outcomes, format)?;
                println!("Results written to {}", written.display());
            }
            Ok(())
        }

        Some(Commands::Encrypt { plaintext, key, iv }) => {
            let ctx = CipherContext::new(&key, &iv)?;
            println!("{}", ctx.encrypt(&plaintext)?);
            Ok(())
        }

        Some(Commands::Hash { payload }) => {
            println!("{}", sha256_hex(&payload));
            Ok(())
        }
    }
}

enum InputFormat {
    Json,
    Csv,
}

fn input_format(explicit: Option<&str>, path: &std::path::Path) -> Result<InputFormat> {
    if let Some(name) = explicit {
        return match name.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            _ => anyhow::bail!("Invalid format: {}. Must be one of: json, csv", name),
        };
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(InputFormat::Json),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(InputFormat::Csv),
        _ => anyhow::bail!(
            "Cannot infer format from {}; pass --format json|csv",
            path.display()
        ),
    }
}

fn parse_export_format(name: &str) -> Result<ExportFormat> {
    match name.to_lowercase().as_str() {
        "json" => Ok(ExportFormat::Json),
        "csv" => Ok(ExportFormat::Csv),
        _ => anyhow::bail!("Invalid export format: {}. Must be one of: json, csv", name),
    }
}
