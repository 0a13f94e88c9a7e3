use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;

use crate::batch::process_batch;
use crate::crypto::CipherContext;
use crate::display::print_results;
use crate::export::{ExportFormat, export_results};
use crate::source;
use crate::types::{DecryptionOutcome, EncryptedRecord};

const MENU: &str = "\
1) Decrypt values entered manually
2) Decrypt records from a JSON file
3) Decrypt records from a CSV file
4) Enter a new key/IV
5) Quit";

/// Run the interactive session: collect credentials, then loop on the
/// menu until the user quits or stdin closes.
pub fn run_session() -> Result<()> {
    println!("SSN Decryptor - AES-256-CBC batch decryption");
    println!();

    let mut ctx = match prompt_credentials()? {
        Some(ctx) => ctx,
        None => return Ok(()),
    };

    loop {
        println!();
        println!("{}", MENU);
        let choice = match prompt("> ")? {
            Some(line) => line,
            None => return Ok(()),
        };

        match choice.as_str() {
            "1" => {
                let records = collect_manual_entries()?;
                if records.is_empty() {
                    println!("No values entered.");
                } else {
                    run_batch(&ctx, &records)?;
                }
            }
            "2" => decrypt_file(&ctx, SourceKind::Json)?,
            "3" => decrypt_file(&ctx, SourceKind::Csv)?,
            "4" => {
                if let Some(new_ctx) = prompt_credentials()? {
                    ctx = new_ctx;
                }
            }
            "5" | "q" | "quit" | "exit" => {
                println!("Bye.");
                return Ok(());
            }
            "" => {}
            other => println!("Unknown option: {}", other),
        }
    }
}

enum SourceKind {
    Json,
    Csv,
}

/// Prompt for the key and IV, re-prompting until each validates.
/// Returns None when stdin closes mid-entry.
fn prompt_credentials() -> Result<Option<CipherContext>> {
    loop {
        let key_hex = match prompt("Encryption key (64 hex characters): ")? {
            Some(line) => line,
            None => return Ok(None),
        };
        let iv_hex = match prompt("IV (32 hex characters): ")? {
            Some(line) => line,
            None => return Ok(None),
        };

        match CipherContext::new(&key_hex, &iv_hex) {
            Ok(ctx) => return Ok(Some(ctx)),
            Err(e) => println!("{}. Please try again.", e),
        }
    }
}

/// Accumulate manually entered ciphertexts until a blank line.
fn collect_manual_entries() -> Result<Vec<EncryptedRecord>> {
    println!("Enter encrypted values one per line; blank line to finish.");
    let mut records = Vec::new();
    loop {
        let line = match prompt("value> ")? {
            Some(line) => line,
            None => break,
        };
        if line.is_empty() {
            break;
        }
        let id = format!("entry-{}", records.len() + 1);
        records.push(EncryptedRecord::new(Some(id), Some(line)));
    }
    Ok(records)
}

fn decrypt_file(ctx: &CipherContext, kind: SourceKind) -> Result<()> {
    let path = match prompt("File path: ")? {
        Some(line) if !line.is_empty() => line,
        _ => return Ok(()),
    };

    let loaded = match kind {
        SourceKind::Json => source::records_from_json_file(Path::new(&path)),
        SourceKind::Csv => source::records_from_csv_file(Path::new(&path)),
    };

    // A bad file aborts this operation only; the session continues.
    match loaded {
        Ok(records) => run_batch(ctx, &records),
        Err(e) => {
            println!("{}", e);
            Ok(())
        }
    }
}

fn run_batch(ctx: &CipherContext, records: &[EncryptedRecord]) -> Result<()> {
    let (outcomes, summary) = process_batch(ctx, records);
    println!();
    print_results(&outcomes, &summary);
    prompt_export(&outcomes)
}

fn prompt_export(outcomes: &[DecryptionOutcome]) -> Result<()> {
    let answer = match prompt("Export results? (json/csv/n): ")? {
        Some(line) => line.to_lowercase(),
        None => return Ok(()),
    };

    let format = match answer.as_str() {
        "json" | "j" => ExportFormat::Json,
        "csv" | "c" => ExportFormat::Csv,
        _ => return Ok(()),
    };

    let path = export_results(outcomes, format)?;
    println!("Results written to {}", path.display());
    Ok(())
}

/// Print a prompt and read one trimmed line. Returns None on EOF.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
