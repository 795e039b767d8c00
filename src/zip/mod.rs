//! ZIP archive parsing, decryption, and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`crypto`]: Traditional PKWARE (ZipCrypto) cipher for password-protected entries
//! - [`extractor`]: Per-entry streaming extraction with progress callbacks
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! This implementation reads the EOCD first (from the end of the file),
//! then the Central Directory, which allows listing files and detecting
//! encryption without reading any entry content.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED (no compression) method
//! - DEFLATE compression method
//! - Traditional PKWARE encryption (ZipCrypto)
//!
//! ## Limitations
//!
//! - No WinZip AES encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

pub mod crypto;
mod extractor;
mod parser;
mod structures;

pub use crypto::ZipCrypto;
pub use extractor::{CHUNK_SIZE, ZipExtractor, sanitize_entry_path};
pub use parser::ZipParser;
pub use structures::*;
