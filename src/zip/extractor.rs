//! Per-entry extraction: decrypt, decompress, and stream to disk.
//!
//! Entry content moves through a fixed-size chunk pipeline: compressed
//! bytes are fetched from the archive source, optionally decrypted with
//! [`ZipCrypto`], run through the inflater for DEFLATE entries, and written
//! to the destination file. Every chunk of produced output invokes the
//! caller's progress callback with the byte delta, so progress granularity
//! is bounded by the chunk size.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use flate2::{Decompress, FlushDecompress, Status};

use crate::error::{ArchiveError, Result};
use crate::io::ReadAt;

use super::crypto::ZipCrypto;
use super::parser::ZipParser;
use super::structures::{CompressionMethod, ENCRYPTION_HEADER_SIZE, ZipFileEntry};

/// Copy chunk size. Smaller hurts throughput; larger increases worst-case
/// progress-update latency.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Number of decrypted bytes read when probing a candidate password.
const PROBE_SIZE: usize = 1024;

/// ZIP entry extractor.
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// Read the ordered entry table from the central directory.
    pub async fn read_entries(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.read_entries().await
    }

    /// Check a candidate password against the archive without extracting.
    ///
    /// Reads a bounded prefix of the first encrypted file entry: the
    /// encryption header check byte is verified first, then the prefix is
    /// trial-decrypted and, for DEFLATE entries, trial-inflated. Cipher or
    /// inflate failure here means a wrong password and is returned as the
    /// typed [`ArchiveError::WrongPassword`]; unrelated I/O failures
    /// propagate as themselves.
    pub async fn probe_password(
        &self,
        entries: &[ZipFileEntry],
        password: &[u8],
    ) -> Result<()> {
        let Some(entry) = entries.iter().find(|e| !e.is_directory && e.is_encrypted()) else {
            // Nothing encrypted to check against; any password passes.
            return Ok(());
        };

        let data_offset = self.parser.entry_data_offset(entry).await?;
        let mut cipher = ZipCrypto::new(password);

        let mut header = [0u8; ENCRYPTION_HEADER_SIZE];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut header)
            .await?;
        cipher.verify_header(&header, entry)?;

        // The check byte passes for 1 in 256 wrong passwords, so also
        // trial-decrypt a prefix of the payload.
        let probe_len = (entry.payload_size() as usize).min(PROBE_SIZE);
        if probe_len == 0 {
            return Ok(());
        }

        let mut prefix = vec![0u8; probe_len];
        self.parser
            .reader()
            .read_exact_at(data_offset + ENCRYPTION_HEADER_SIZE as u64, &mut prefix)
            .await?;
        cipher.decrypt(&mut prefix);

        if entry.compression_method == CompressionMethod::Deflate {
            let mut inflater = Decompress::new(false);
            let mut sink = vec![0u8; CHUNK_SIZE];
            let mut consumed = 0usize;
            while consumed < prefix.len() {
                let before = inflater.total_in();
                let status = inflater
                    .decompress(&prefix[consumed..], &mut sink, FlushDecompress::None)
                    .map_err(|_| ArchiveError::WrongPassword)?;
                let step = (inflater.total_in() - before) as usize;
                consumed += step;
                // The prefix may end mid-block; no forward progress means
                // the inflater wants bytes the probe does not have.
                if status == Status::StreamEnd || step == 0 {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Extract one entry beneath `dest_root`.
    ///
    /// Directory entries are created idempotently. File entries are
    /// streamed through the chunk pipeline; `on_chunk` receives the number
    /// of decompressed bytes written after each chunk. The whole stream's
    /// CRC-32 is verified against the central directory before returning.
    pub async fn extract_entry(
        &self,
        entry: &ZipFileEntry,
        dest_root: &Path,
        password: Option<&[u8]>,
        mut on_chunk: impl FnMut(u64),
    ) -> Result<()> {
        let dest_path = sanitize_entry_path(&entry.file_name, dest_root)?;

        if entry.is_directory {
            fs::create_dir_all(&dest_path).await?;
            return Ok(());
        }

        if let Some(parent) = dest_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut data_offset = self.parser.entry_data_offset(entry).await?;

        // Set up the cipher and consume the encryption header
        let mut cipher = if entry.is_encrypted() {
            let password = password.ok_or(ArchiveError::PasswordRequired)?;
            let mut cipher = ZipCrypto::new(password);
            let mut header = [0u8; ENCRYPTION_HEADER_SIZE];
            self.parser
                .reader()
                .read_exact_at(data_offset, &mut header)
                .await?;
            cipher.verify_header(&header, entry)?;
            data_offset += ENCRYPTION_HEADER_SIZE as u64;
            Some(cipher)
        } else {
            None
        };

        let mut sink = fs::File::create(&dest_path).await?;
        let mut crc = crc32fast::Hasher::new();

        let copy_result = match entry.compression_method {
            CompressionMethod::Stored => {
                self.copy_stored(entry, data_offset, cipher.as_mut(), &mut sink, &mut crc, &mut on_chunk)
                    .await
            }
            CompressionMethod::Deflate => {
                self.copy_deflate(entry, data_offset, cipher.as_mut(), &mut sink, &mut crc, &mut on_chunk)
                    .await
            }
            CompressionMethod::Unknown(method) => Err(ArchiveError::UnsupportedMethod(method)),
        };
        copy_result?;

        sink.flush().await?;
        drop(sink);

        if crc.finalize() != entry.crc32 {
            return Err(ArchiveError::Corrupt(format!(
                "CRC mismatch for entry '{}'",
                entry.file_name
            )));
        }

        Ok(())
    }

    /// Chunked copy of a STORED (uncompressed) entry.
    async fn copy_stored(
        &self,
        entry: &ZipFileEntry,
        data_offset: u64,
        mut cipher: Option<&mut ZipCrypto>,
        sink: &mut fs::File,
        crc: &mut crc32fast::Hasher,
        on_chunk: &mut impl FnMut(u64),
    ) -> Result<()> {
        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut remaining = entry.payload_size();
        let mut offset = data_offset;

        while remaining > 0 {
            let take = (remaining as usize).min(CHUNK_SIZE);
            self.parser
                .reader()
                .read_exact_at(offset, &mut buf[..take])
                .await?;
            if let Some(cipher) = cipher.as_deref_mut() {
                cipher.decrypt(&mut buf[..take]);
            }
            sink.write_all(&buf[..take]).await?;
            crc.update(&buf[..take]);
            on_chunk(take as u64);
            offset += take as u64;
            remaining -= take as u64;
        }

        Ok(())
    }

    /// Chunked streaming inflate of a DEFLATE entry.
    async fn copy_deflate(
        &self,
        entry: &ZipFileEntry,
        data_offset: u64,
        mut cipher: Option<&mut ZipCrypto>,
        sink: &mut fs::File,
        crc: &mut crc32fast::Hasher,
        on_chunk: &mut impl FnMut(u64),
    ) -> Result<()> {
        let encrypted = cipher.is_some();
        let mut inflater = Decompress::new(false);
        let mut in_buf = vec![0u8; CHUNK_SIZE];
        let mut out_buf = vec![0u8; CHUNK_SIZE];
        let mut filled = 0usize;
        let mut remaining = entry.payload_size();
        let mut offset = data_offset;

        loop {
            // Refill the input buffer from the archive
            if filled < in_buf.len() && remaining > 0 {
                let take = (remaining as usize).min(in_buf.len() - filled);
                self.parser
                    .reader()
                    .read_exact_at(offset, &mut in_buf[filled..filled + take])
                    .await?;
                if let Some(cipher) = cipher.as_deref_mut() {
                    cipher.decrypt(&mut in_buf[filled..filled + take]);
                }
                filled += take;
                offset += take as u64;
                remaining -= take as u64;
            }

            let input_exhausted = remaining == 0;
            let flush = if input_exhausted && filled == 0 {
                FlushDecompress::Finish
            } else {
                FlushDecompress::None
            };

            let before_in = inflater.total_in();
            let before_out = inflater.total_out();
            let status = inflater
                .decompress(&in_buf[..filled], &mut out_buf, flush)
                .map_err(|_| {
                    // With a validated cipher the stream should inflate;
                    // a broken stream on an encrypted entry still most
                    // likely means the password slipped past the check byte.
                    if encrypted {
                        ArchiveError::WrongPassword
                    } else {
                        ArchiveError::Corrupt(format!(
                            "invalid deflate stream in entry '{}'",
                            entry.file_name
                        ))
                    }
                })?;
            let consumed = (inflater.total_in() - before_in) as usize;
            let produced = (inflater.total_out() - before_out) as usize;

            in_buf.copy_within(consumed..filled, 0);
            filled -= consumed;

            if produced > 0 {
                sink.write_all(&out_buf[..produced]).await?;
                crc.update(&out_buf[..produced]);
                on_chunk(produced as u64);
            }

            if inflater.total_out() > entry.uncompressed_size {
                return Err(ArchiveError::Corrupt(format!(
                    "entry '{}' inflates past its declared size",
                    entry.file_name
                )));
            }

            match status {
                Status::StreamEnd => break,
                Status::Ok | Status::BufError => {
                    if consumed == 0 && produced == 0 && input_exhausted && filled == 0 {
                        return Err(ArchiveError::Corrupt(format!(
                            "truncated deflate stream in entry '{}'",
                            entry.file_name
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Resolve an entry name to a destination path beneath `dest_root`.
///
/// Entry names come straight from the archive and are untrusted: absolute
/// paths are neutralized by dropping the leading separator, while `..`
/// segments are rejected outright so a hostile archive cannot write outside
/// the destination (zip-slip).
pub fn sanitize_entry_path(name: &str, dest_root: &Path) -> Result<PathBuf> {
    if name.contains('\0') {
        return Err(ArchiveError::UnsafePath(name.to_string()));
    }

    let mut relative = PathBuf::new();
    // Split on both separators; archives written on Windows use '\'
    for part in name.split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => return Err(ArchiveError::UnsafePath(name.to_string())),
            _ => relative.push(part),
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(ArchiveError::UnsafePath(name.to_string()));
    }

    Ok(dest_root.join(relative))
}
