use crate::types::{BatchSummary, DecryptionOutcome, OutcomeStatus};

/// Print the result table and summary to stdout.
///
/// Failed and Invalid rows are shown with a marker instead of being
/// omitted, and the summary always accompanies the table.
pub fn print_results(outcomes: &[DecryptionOutcome], summary: &BatchSummary) {
    println!("{:<26} {:<9} {}", "ID", "Status", "Decrypted Value");
    println!("{:-<60}", "");
    for outcome in outcomes {
        let value = match outcome.status {
            OutcomeStatus::Success => outcome.plaintext.as_deref().unwrap_or(""),
            OutcomeStatus::Failed => "<decryption failed>",
            OutcomeStatus::Invalid => "<invalid record>",
        };
        println!(
            "{:<26} {:<9} {}",
            outcome.id,
            outcome.status.as_str(),
            value
        );
    }
    println!();
    println!(
        "Total: {}  Succeeded: {}  Failed: {}",
        summary.total, summary.succeeded, summary.failed
    );
}
