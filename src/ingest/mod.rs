//! Image sources.
//!
//! A CLI path resolves to either one image file or a directory whose regular
//! files are all treated as images. Sources only read local files; decoded
//! frames live until their image has been reported.

pub mod directory;
pub mod file;

use std::path::{Path, PathBuf};

use crate::error::{LocatorError, Result};

pub use directory::list_images;
pub use file::load_image;

/// What a CLI path points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    SingleImage(PathBuf),
    Directory(PathBuf),
}

impl Target {
    /// Resolve a path. Missing paths are `NotFound`.
    pub fn resolve(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(LocatorError::Usage(
                "an image or directory path is required".into(),
            ));
        }
        let meta = std::fs::metadata(path).map_err(|e| LocatorError::io(path, e))?;
        if meta.is_dir() {
            Ok(Target::Directory(path.to_path_buf()))
        } else {
            Ok(Target::SingleImage(path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Target::SingleImage(path) | Target::Directory(path) => path,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, Target::Directory(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.png");
        std::fs::write(&file, b"x").unwrap();

        assert_eq!(
            Target::resolve(dir.path()).unwrap(),
            Target::Directory(dir.path().to_path_buf())
        );
        let single = Target::resolve(&file).unwrap();
        assert!(!single.is_directory());
        assert_eq!(single.path(), file.as_path());
    }

    #[test]
    fn empty_path_is_a_usage_error() {
        let err = Target::resolve("").unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Target::resolve(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, LocatorError::NotFound(_)));
    }
}
