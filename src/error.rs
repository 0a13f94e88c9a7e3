use thiserror::Error;

/// Malformed key or IV at context construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid key: expected exactly 64 hex characters (32 bytes), got {0}")]
    BadKey(usize),

    #[error("Invalid IV: expected exactly 32 hex characters (16 bytes), got {0}")]
    BadIv(usize),
}

/// Per-record decryption failure. Never propagated out of a batch;
/// surfaced only as a Failed/Invalid outcome status.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecryptionError {
    #[error("malformed ciphertext: expected hex digits in whole 16-byte blocks")]
    MalformedCiphertext,

    #[error("padding/authentication failure: wrong key/IV or corrupted ciphertext")]
    BadPadding,

    #[error("decrypted bytes are not valid UTF-8")]
    NotUtf8,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("padding failed: {0}")]
    PadFailed(String),
}

/// Record-source failure: the whole file is rejected before any
/// decryption is attempted.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON root must be an array of records")]
    NotAnArray,

    #[error("CSV is missing the required \"{0}\" column")]
    MissingColumn(&'static str),

    #[error("CSV file has no header row")]
    EmptyCsv,
}
