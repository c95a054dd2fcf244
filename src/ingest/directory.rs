use std::path::{Path, PathBuf};

use crate::error::{LocatorError, Result};

/// List the regular files directly inside `dir`, sorted by name.
///
/// Not recursive. Sub-directories, symlinks and other special files are
/// skipped; there is no extension filter.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = std::fs::read_dir(dir).map_err(|e| LocatorError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| LocatorError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| LocatorError::io(entry.path(), e))?;
        if !file_type.is_file() {
            log::debug!("skipping non-regular entry {}", entry.path().display());
            continue;
        }
        files.push(entry.path());
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_regular_files_only_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.jpg"), b"b").unwrap();
        std::fs::write(dir.path().join("a.png"), b"a").unwrap();
        std::fs::write(dir.path().join("README"), b"r").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested").join("c.jpg"), b"c").unwrap();

        let files = list_images(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["README", "a.png", "b.jpg"]);
        assert!(files.iter().all(|p| p.starts_with(dir.path())));
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("real.jpg");
        std::fs::write(&target, b"x").unwrap();
        std::os::unix::fs::symlink(&target, dir.path().join("link.jpg")).unwrap();

        let files = list_images(dir.path()).unwrap();
        assert_eq!(files, vec![target]);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let err = list_images("/no/such/dir").unwrap_err();
        assert!(matches!(err, LocatorError::NotFound(_)));
    }
}
