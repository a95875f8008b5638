use thiserror::Error;

/// Unified error type for the portfolio-accounting-core library.
///
/// Only the ingest and configuration boundaries produce errors. The
/// accounting pipeline itself degrades bad numbers to zero instead.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input boundary ──────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Settings validation failed: {0}")]
    ValidationError(String),

    // ── Serialization ───────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
