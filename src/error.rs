use thiserror::Error;

/// Errors that may rise while decoding a RANGEA message
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    /// CRC-32 does not match the transmitted digest
    #[error("checksum mismatch")]
    ChecksumMismatch,

    /// Header (`;`) or checksum (`*`) separator is missing
    #[error("missing {0} section")]
    MissingSection(&'static str),

    /// Message ended before expected field
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid {field} integer \"{value}\"")]
    IntegerParsing { field: &'static str, value: String },

    #[error("invalid {field} value \"{value}\"")]
    FloatParsing { field: &'static str, value: String },

    /// Tracking status is not a 32-bit hex word
    #[error("invalid tracking status \"{0}\"")]
    StatusParsing(String),

    /// Reported PRN/slot number does not map to a valid satellite
    #[error("invalid satellite identifier #{prn} (system code {system})")]
    InvalidIdentity { system: u8, prn: u16 },
}

/// Errors that may rise while formatting RINEX
#[derive(Error, Debug)]
pub enum FormattingError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Header requires at least one epoch (time of first / last obs.)
    #[error("no epoch collected")]
    EmptyRecord,
}

/// Errors that may rise while loading the header settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}
