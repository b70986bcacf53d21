//! Import copy step: bring a user-chosen database file into the working
//! databases directory. Whole-file, non-atomic copy under the source's
//! original base name; a same-named existing file is silently overwritten.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{AppError, Result};

/// Copy `source` into `databases_dir` and return the destination path.
pub fn copy_into_databases(source: &Path, databases_dir: &Path) -> Result<PathBuf> {
    let file_name = source.file_name().ok_or_else(|| AppError::FileCopy {
        path: source.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
    })?;

    let destination = databases_dir.join(file_name);
    fs::copy(source, &destination).map_err(|err| AppError::FileCopy {
        path: source.to_path_buf(),
        source: err,
    })?;

    info!(
        "copied database file {} to {}",
        source.display(),
        destination.display()
    );
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_under_original_base_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("incoming.db");
        fs::write(&source, b"payload").expect("write source");
        let databases_dir = dir.path().join("databases");
        fs::create_dir_all(&databases_dir).expect("create databases dir");

        let dest = copy_into_databases(&source, &databases_dir).expect("copy");
        assert_eq!(dest, databases_dir.join("incoming.db"));
        assert_eq!(fs::read(&dest).expect("read copy"), b"payload");
    }

    #[test]
    fn overwrites_existing_copy() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = dir.path().join("incoming.db");
        fs::write(&source, b"new").expect("write source");
        let databases_dir = dir.path().join("databases");
        fs::create_dir_all(&databases_dir).expect("create databases dir");
        fs::write(databases_dir.join("incoming.db"), b"old").expect("write existing");

        let dest = copy_into_databases(&source, &databases_dir).expect("copy");
        assert_eq!(fs::read(&dest).expect("read copy"), b"new");
    }

    #[test]
    fn missing_source_is_a_file_copy_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = copy_into_databases(&dir.path().join("absent.db"), dir.path())
            .expect_err("copy must fail");
        assert!(matches!(err, AppError::FileCopy { .. }));
    }

    #[test]
    fn bare_root_path_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = copy_into_databases(Path::new("/"), dir.path()).expect_err("no file name");
        assert!(matches!(err, AppError::FileCopy { .. }));
    }
}
