//! Output Directory Cleaner
//!
//! The generator owns the output directory. Every regular file directly
//! inside it is removed before regeneration so no stale output survives a
//! resource removal. Subdirectories are left alone.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::pipeline::GeneratorError;

/// Create `dir` if needed, then delete the regular files directly inside it.
///
/// Returns the removed paths in directory-listing order. The first failure
/// aborts the clean.
pub fn clean_output_dir(dir: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
    fs::create_dir_all(dir).map_err(|source| GeneratorError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let cleanup_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source: std::io::Error| GeneratorError::Cleanup { path, source }
    };

    let mut removed = vec![];
    for entry in fs::read_dir(dir).map_err(cleanup_err(dir))? {
        let entry = entry.map_err(cleanup_err(dir))?;
        let path = entry.path();

        if path.is_file() {
            info!("Removing {}...", path.display());
            fs::remove_file(&path).map_err(cleanup_err(&path))?;
            removed.push(path);
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("src").join("generated");

        let removed = clean_output_dir(&out).unwrap();
        assert!(removed.is_empty());
        assert!(out.is_dir());
    }

    #[test]
    fn test_removes_files_not_subdirs() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path();
        fs::write(out.join("stale.png.c"), "old").unwrap();
        fs::write(out.join("resources_gen.h"), "old").unwrap();
        fs::create_dir(out.join("keep")).unwrap();
        fs::write(out.join("keep").join("nested.c"), "nested").unwrap();

        let removed = clean_output_dir(out).unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!out.join("stale.png.c").exists());
        assert!(!out.join("resources_gen.h").exists());
        assert!(out.join("keep").join("nested.c").exists());
    }
}
