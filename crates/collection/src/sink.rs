use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SplitError};

/// File name used for a chunk. Path separators are replaced so a folder name
/// can never place output outside `dir`.
pub fn file_stem(chunk_name: &str) -> String {
    chunk_name.replace(['/', '\\'], "_")
}

pub fn output_path(dir: &Path, chunk_name: &str) -> PathBuf {
    dir.join(format!("{}.json", file_stem(chunk_name)))
}

/// Creates or truncates `path` with `bytes`.
pub fn write_document(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).map_err(|source| SplitError::WriteFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let dir = Path::new("out");
        assert_eq!(output_path(dir, "Auth-2"), PathBuf::from("out/Auth-2.json"));
        assert_eq!(output_path(dir, "../etc/x"), PathBuf::from("out/.._etc_x.json"));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("Auth.json");

        match write_document(&path, b"{}") {
            Err(SplitError::WriteFailure { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected write failure, got {:?}", other),
        }
    }

    #[test]
    fn test_write_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Auth.json");

        write_document(&path, b"a much longer first version").unwrap();
        write_document(&path, b"{}").unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"{}");
    }
}
