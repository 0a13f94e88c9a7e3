use serde::Serialize;

/// Placeholder shown when a record carries no usable identifier.
pub const MISSING_ID: &str = "N/A";

/// One encrypted record from a file or manual entry, before decryption.
#[derive(Debug, Clone, Default)]
pub struct EncryptedRecord {
    pub id: Option<String>,
    /// Hex-encoded ciphertext. `None` when the source field was absent
    /// or not a string; such records become Invalid outcomes.
    pub payload: Option<String>,
}

impl EncryptedRecord {
    pub fn new(id: Option<String>, payload: Option<String>) -> Self {
        Self { id, payload }
    }
}

/// Result of attempting to decrypt one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
    /// Decryption succeeded; plaintext is populated.
    Success,
    /// The payload looked like ciphertext but failed to decrypt.
    Failed,
    /// The payload was missing or empty; no decrypt was attempted.
    Invalid,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Success => "Success",
            OutcomeStatus::Failed => "Failed",
            OutcomeStatus::Invalid => "Invalid",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecryptionOutcome {
    #[serde(rename = "_id")]
    pub id: String,
    pub status: OutcomeStatus,
    #[serde(rename = "decrypted", skip_serializing_if = "Option::is_none")]
    pub plaintext: Option<String>,
}

/// Per-batch accounting. `succeeded + failed == total` always holds;
/// Invalid records count toward `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}
