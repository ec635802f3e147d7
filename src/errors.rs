use thiserror::Error;

/// Errors raised while converting QIF exports or repairing OFX documents
#[derive(Error, Debug)]
pub enum ConvertError {
    /// A QIF record could not be reconstructed (bad date, bad amount, missing field)
    #[error("QIF parse failed at line {line}: {reason}")]
    QifRecord { line: usize, reason: String },

    /// A QIF date did not match the configured date format
    #[error("Invalid QIF date format")]
    QifDateInvalidFormat,

    /// A statement with no transactions has no defined as-of date
    #[error("Statement contains no transactions")]
    EmptyStatement,

    /// Input file is neither a QIF export nor an OFX document
    #[error("Unsupported file format")]
    UnsupportedFormat,

    /// Error reading input or writing output
    #[error("Failed to read file content: {0}")]
    ReadContentFailed(#[from] std::io::Error),

    // ── OFX document errors (repair path and writer) ────────────────────────

    /// An existing OFX document could not be deserialized
    #[error("OFX parse failed: {0}")]
    OfxParseFailed(String),

    /// The OFX document has neither a bank nor a credit-card statement section
    #[error("No statement section found in OFX document")]
    MissingStatement,

    /// The assembled OFX document could not be serialized
    #[error("OFX serialize failed: {0}")]
    OfxWriteFailed(String),

    /// The file selection glob pattern is malformed
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Convenient alias for Result with the crate's error type
pub type ConvertResult<T> = Result<T, ConvertError>;
