use crate::crypto::CipherContext;
use crate::types::{BatchSummary, DecryptionOutcome, EncryptedRecord, MISSING_ID, OutcomeStatus};

/// Decrypt every record in input order, isolating per-record failures.
///
/// A batch of N records always yields exactly N outcomes: a missing or
/// empty payload becomes Invalid without touching the cipher, and any
/// decryption error becomes Failed with the error swallowed. One bad
/// record never stops the rest of the batch.
pub fn process_batch(
    ctx: &CipherContext,
    records: &[EncryptedRecord],
) -> (Vec<DecryptionOutcome>, BatchSummary) {
    let mut outcomes = Vec::with_capacity(records.len());
    let mut summary = BatchSummary {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        let id = record
            .id
            .clone()
            .unwrap_or_else(|| MISSING_ID.to_string());

        let outcome = match record.payload.as_deref() {
            None => DecryptionOutcome {
                id,
                status: OutcomeStatus::Invalid,
                plaintext: None,
            },
            Some(payload) if payload.trim().is_empty() => DecryptionOutcome {
                id,
                status: OutcomeStatus::Invalid,
                plaintext: None,
            },
            Some(payload) => match ctx.decrypt(payload) {
                Ok(plaintext) => DecryptionOutcome {
                    id,
                    status: OutcomeStatus::Success,
                    plaintext: Some(plaintext),
                },
                Err(e) => {
                    log::debug!("Record {} failed to decrypt: {}", id, e);
                    DecryptionOutcome {
                        id,
                        status: OutcomeStatus::Failed,
                        plaintext: None,
                    }
                }
            },
        };

        match outcome.status {
            OutcomeStatus::Success => summary.succeeded += 1,
            OutcomeStatus::Failed | OutcomeStatus::Invalid => summary.failed += 1,
        }
        outcomes.push(outcome);
    }

    log::debug!(
        "Batch complete: {} total, {} succeeded, {} failed",
        summary.total,
        summary.succeeded,
        summary.failed
    );

    (outcomes, summary)
}
