//! Typed error taxonomy for archive operations.
//!
//! Every failure mode a caller can observe has its own variant, produced at
//! the point of failure; classification never depends on matching error
//! message text. A wrong password detected by the cipher or the inflater is
//! a [`ArchiveError::WrongPassword`], not a generic error with a telltale
//! string.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive not found: {0}")]
    NotFound(PathBuf),

    /// Malformed archive structure (bad signatures, truncated records,
    /// CRC mismatch after decompression).
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    /// Disk or filesystem error unrelated to the password.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// `validate_password` was called on an archive with no encrypted entries.
    #[error("archive is not password protected")]
    NotEncrypted,

    /// The archive is encrypted and no password was supplied.
    #[error("password required for encrypted archive")]
    PasswordRequired,

    /// The supplied password failed the cipher check or produced an
    /// undecompressible stream.
    #[error("incorrect password")]
    WrongPassword,

    /// Unexpected failure during the validate-only probe.
    #[error("password validation failed: {0}")]
    Validation(String),

    /// Catch-all for extraction-loop failures not otherwise classified.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Entry name escapes the destination directory (zip-slip).
    #[error("unsafe entry path rejected: {0}")]
    UnsafePath(String),

    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u16),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

impl ArchiveError {
    /// Stable machine-readable code for the boundary contract.
    pub fn code(&self) -> &'static str {
        match self {
            ArchiveError::NotFound(_) => "NOT_FOUND",
            ArchiveError::Corrupt(_) => "CORRUPT",
            ArchiveError::Io(_) => "IO_FAILURE",
            ArchiveError::NotEncrypted => "NOT_ENCRYPTED",
            ArchiveError::PasswordRequired => "PASSWORD_REQUIRED",
            ArchiveError::WrongPassword => "WRONG_PASSWORD",
            ArchiveError::Validation(_) => "VALIDATION_ERROR",
            ArchiveError::Extraction(_) => "EXTRACTION_FAILED",
            ArchiveError::UnsafePath(_) => "EXTRACTION_FAILED",
            ArchiveError::UnsupportedMethod(_) => "EXTRACTION_FAILED",
        }
    }
}
