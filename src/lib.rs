//! # quickzip
//!
//! A ZIP extraction engine with password support and fine-grained
//! progress reporting.
//!
//! This library extracts plain and password-protected (ZipCrypto) ZIP
//! archives to a destination directory while publishing monotonic,
//! bounded progress snapshots over a latest-value channel, and validates
//! a candidate password against an encrypted archive with a bounded probe
//! read instead of a full extraction.
//!
//! ## Features
//!
//! - Extract ZIP archives from the local filesystem
//! - Traditional PKWARE (ZipCrypto) decryption for password-protected entries
//! - Password validation without extraction (bounded probe read)
//! - Per-chunk progress reporting over a per-operation channel
//! - Zip-slip protection: hostile entry names cannot escape the output directory
//! - Support for ZIP64 format (archives larger than 4GB)
//! - Support for STORED (uncompressed) and DEFLATE compression methods
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use quickzip::{extract_archive, progress};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), quickzip::ArchiveError> {
//!     let (tx, mut rx) = progress::channel();
//!
//!     // Run the extraction as its own unit of work
//!     let task = tokio::spawn(async move {
//!         extract_archive(
//!             Path::new("archive.zip"),
//!             Path::new("out"),
//!             Some("hunter2"),
//!             tx,
//!         )
//!         .await
//!     });
//!
//!     // Observe progress on the caller's context
//!     while rx.changed().await.is_ok() {
//!         let snapshot = rx.borrow().clone();
//!         eprintln!("{:.1}%", snapshot.percentage);
//!     }
//!
//!     let message = task.await.expect("extraction task panicked")?;
//!     println!("{message}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod io;
pub mod progress;
pub mod zip;

pub use cli::Cli;
pub use engine::{extract_archive, validate_password};
pub use error::{ArchiveError, Result};
pub use io::{LocalFileReader, ReadAt};
pub use progress::{ExtractionProgress, ProgressReceiver, ProgressSender};
pub use zip::{ZipExtractor, ZipFileEntry};
