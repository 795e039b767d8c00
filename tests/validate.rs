//! Password validation probe tests.

mod common;

use common::ZipBuilder;
use quickzip::{ArchiveError, validate_password};
use tempfile::TempDir;

#[tokio::test]
async fn unencrypted_archive_rejects_validation_regardless_of_password() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("plain.zip");
    ZipBuilder::new()
        .add_stored("a.txt", b"0123456789", None)
        .write_to(&archive);

    for password in ["", "hunter2", "anything"] {
        let result = validate_password(&archive, password).await;
        assert!(matches!(result, Err(ArchiveError::NotEncrypted)));
    }
}

#[tokio::test]
async fn correct_password_validates_without_extraction() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("locked.zip");
    ZipBuilder::new()
        .add_stored("secret.txt", b"classified", Some(b"hunter2"))
        .write_to(&archive);

    validate_password(&archive, "hunter2")
        .await
        .expect("correct password should validate");

    // The probe must not materialize any entry on disk.
    let extracted: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name() != "locked.zip")
        .collect();
    assert!(extracted.is_empty());
}

#[tokio::test]
async fn wrong_password_is_wrong_password_not_validation_error() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("locked.zip");
    ZipBuilder::new()
        .add_deflated("secret.txt", b"classified material, quite long", Some(b"hunter2"))
        .write_to(&archive);

    let result = validate_password(&archive, "letmein").await;
    assert!(matches!(result, Err(ArchiveError::WrongPassword)));
}

#[tokio::test]
async fn probe_checks_the_first_file_entry_past_directories() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("locked.zip");
    ZipBuilder::new()
        .add_dir("docs/")
        .add_deflated("docs/secret.txt", b"classified material", Some(b"hunter2"))
        .write_to(&archive);

    validate_password(&archive, "hunter2")
        .await
        .expect("probe should skip the directory entry");
    assert!(matches!(
        validate_password(&archive, "wrong").await,
        Err(ArchiveError::WrongPassword)
    ));
}

#[tokio::test]
async fn unreadable_archive_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("missing.zip");

    let result = validate_password(&archive, "hunter2").await;
    assert!(matches!(result, Err(ArchiveError::Validation(_))));
}

#[tokio::test]
async fn corrupt_archive_is_a_validation_error() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("garbage.zip");
    std::fs::write(&archive, b"PK but not really").unwrap();

    let result = validate_password(&archive, "hunter2").await;
    assert!(matches!(result, Err(ArchiveError::Validation(_))));
}
