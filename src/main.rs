//! Main entry point for the quickzip CLI application.
//!
//! This binary provides a command-line interface for the extraction
//! engine: extract an archive (with or without a password), validate a
//! password without extracting, or list archive contents.

use anyhow::Result;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use quickzip::io::ReadAt;
use quickzip::{Cli, LocalFileReader, ZipExtractor, progress};

/// Application entry point.
///
/// Parses command-line arguments and dispatches to listing, password
/// validation, or extraction.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let archive = PathBuf::from(&cli.file);

    // List mode: display archive contents and exit
    if cli.list || cli.verbose {
        let reader = Arc::new(LocalFileReader::open(&archive)?);
        let extractor = ZipExtractor::new(reader);
        return list_files(&extractor, cli.verbose).await;
    }

    // Validate-only mode: check the password, extract nothing
    if cli.test_password {
        let password = cli.password.as_deref().unwrap_or_default();
        match quickzip::validate_password(&archive, password).await {
            Ok(()) => {
                println!("Password accepted");
                return Ok(());
            }
            Err(e) => {
                eprintln!("quickzip: [{}] {}", e.code(), e);
                std::process::exit(1);
            }
        }
    }

    // Extract mode
    let output_dir = PathBuf::from(cli.extract_dir.as_deref().unwrap_or("."));
    let password = cli.password.clone();

    // The operation runs as its own unit of work; this context only
    // observes the progress channel and the terminal outcome.
    let (tx, mut rx) = progress::channel();
    let task = tokio::spawn(async move {
        quickzip::extract_archive(&archive, &output_dir, password.as_deref(), tx).await
    });

    if !cli.is_quiet() {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            let name = snapshot.current_entry.as_deref().unwrap_or("");
            eprint!(
                "\r{:5.1}% ({}/{}) {:<60}",
                snapshot.percentage, snapshot.processed_entries, snapshot.total_entries, name
            );
            let _ = std::io::stderr().flush();
        }
        eprintln!();
    }

    match task.await? {
        Ok(message) => {
            if !cli.is_quiet() {
                println!("{message}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("quickzip: [{}] {}", e.code(), e);
            std::process::exit(1);
        }
    }
}

/// List files in the ZIP archive.
///
/// Supports two output formats:
/// - Simple format (`-l`): Just file names, one per line
/// - Verbose format (`-v`): Detailed table with size, compression ratio,
///   encryption marker, and timestamps
async fn list_files<R: ReadAt + 'static>(extractor: &ZipExtractor<R>, verbose: bool) -> Result<()> {
    let entries = extractor.read_entries().await?;

    if verbose {
        println!(
            "{:>10}  {:>10}  {:>5}  {:>10}  {:>5}  Name",
            "Length", "Size", "Cmpr", "Date", "Time"
        );
        println!("{}", "-".repeat(70));
    }

    // Track totals for the summary line
    let mut total_uncompressed = 0u64;
    let mut total_compressed = 0u64;
    let mut file_count = 0usize;

    for entry in &entries {
        if verbose {
            let (year, month, day) = entry.mod_date();
            let (hour, minute, _second) = entry.mod_time();

            // Compression ratio as percentage saved
            let ratio = if entry.uncompressed_size > 0 {
                format!(
                    "{:>4}%",
                    100 - (entry.compressed_size * 100 / entry.uncompressed_size).min(100)
                )
            } else {
                "  0%".to_string()
            };

            let lock = if entry.is_encrypted() { "*" } else { " " };

            println!(
                "{:>10}  {:>10}  {}  {:04}-{:02}-{:02}  {:02}:{:02}  {}{}",
                entry.uncompressed_size,
                entry.compressed_size,
                ratio,
                year,
                month,
                day,
                hour,
                minute,
                lock,
                entry.file_name
            );

            if !entry.is_directory {
                total_uncompressed += entry.uncompressed_size;
                total_compressed += entry.compressed_size;
                file_count += 1;
            }
        } else {
            println!("{}", entry.file_name);
        }
    }

    if verbose {
        println!("{}", "-".repeat(70));
        let total_ratio = if total_uncompressed > 0 {
            format!(
                "{:>4}%",
                100 - (total_compressed * 100 / total_uncompressed).min(100)
            )
        } else {
            "  0%".to_string()
        };
        println!(
            "{:>10}  {:>10}  {}  {:>21}  {} files",
            total_uncompressed, total_compressed, total_ratio, "", file_count
        );
    }

    Ok(())
}
