//! Operation coordinator: the public `validate_password` and
//! `extract_archive` operations.
//!
//! Each call is an independent unit of work: it opens its own archive
//! handle, owns its own progress channel, and produces exactly one
//! terminal outcome. An operation moves through opening, optional
//! password validation, and the extraction loop; the first per-entry
//! failure aborts the whole operation (files already written stay on
//! disk). No retries happen at any level - a wrong password or I/O fault
//! ends the operation and the caller re-invokes with corrected input.

use std::path::Path;
use std::sync::Arc;

use tokio::fs;
use tracing::{debug, info};

use crate::error::{ArchiveError, Result};
use crate::io::LocalFileReader;
use crate::progress::{ProgressSender, ProgressTracker};
use crate::zip::{ZipExtractor, ZipFileEntry};

/// Check a candidate password against an encrypted archive without
/// extracting it.
///
/// # Errors
///
/// - [`ArchiveError::NotEncrypted`] if no entry of the archive is
///   encrypted; the password is not consulted in that case.
/// - [`ArchiveError::WrongPassword`] if the probe read fails to decrypt.
/// - [`ArchiveError::Validation`] for any unexpected failure during the
///   probe (unreadable archive, disk error), kept distinct from the
///   wrong-password signal.
pub async fn validate_password(archive_path: &Path, password: &str) -> Result<()> {
    debug!(archive = %archive_path.display(), "validating password");

    let result = async {
        let reader = Arc::new(LocalFileReader::open(archive_path)?);
        let extractor = ZipExtractor::new(reader);
        let entries = extractor.read_entries().await?;

        if !is_encrypted(&entries) {
            return Err(ArchiveError::NotEncrypted);
        }

        extractor
            .probe_password(&entries, password.as_bytes())
            .await
    }
    .await;

    match result {
        Ok(()) => {
            debug!(archive = %archive_path.display(), "password accepted");
            Ok(())
        }
        // The two boundary outcomes pass through untouched; everything
        // else surfaces as a validation failure.
        Err(e @ (ArchiveError::NotEncrypted | ArchiveError::WrongPassword)) => Err(e),
        Err(e) => Err(ArchiveError::Validation(e.to_string())),
    }
}

/// Extract an archive beneath `output_dir`, publishing progress snapshots
/// to `progress` for the duration of the call.
///
/// The output directory (including intermediate segments) is created if
/// absent. Entries are extracted in central directory order; the first
/// failing entry fails the operation. On success the final published
/// snapshot reports exactly 100.0 and the returned message indicates
/// completion.
pub async fn extract_archive(
    archive_path: &Path,
    output_dir: &Path,
    password: Option<&str>,
    progress: ProgressSender,
) -> Result<String> {
    info!(
        archive = %archive_path.display(),
        output = %output_dir.display(),
        "starting extraction"
    );

    let reader = Arc::new(LocalFileReader::open(archive_path)?);
    let extractor = ZipExtractor::new(reader);
    let entries = extractor.read_entries().await?;

    if is_encrypted(&entries) {
        let password = password.ok_or(ArchiveError::PasswordRequired)?;
        debug!("archive is encrypted, validating password before extraction");
        extractor
            .probe_password(&entries, password.as_bytes())
            .await?;
    }

    fs::create_dir_all(output_dir).await?;

    let mut tracker = ProgressTracker::new(entries.iter().map(|e| e.uncompressed_size));
    progress.publish(tracker.snapshot());

    for entry in &entries {
        tracker.begin_entry(&entry.file_name);
        progress.publish(tracker.snapshot());

        debug!(entry = %entry.file_name, "extracting entry");
        extractor
            .extract_entry(entry, output_dir, password.map(str::as_bytes), |n| {
                tracker.add_bytes(n);
                progress.publish(tracker.snapshot());
            })
            .await?;

        tracker.finish_entry();
        progress.publish(tracker.snapshot());
    }

    tracker.complete();
    progress.publish(tracker.snapshot());

    info!(
        archive = %archive_path.display(),
        entries = entries.len(),
        "extraction completed"
    );
    Ok(format!(
        "Extraction completed: {} entries extracted",
        entries.len()
    ))
}

/// An archive counts as encrypted if any entry carries the encryption flag.
fn is_encrypted(entries: &[ZipFileEntry]) -> bool {
    entries.iter().any(|e| e.is_encrypted())
}
