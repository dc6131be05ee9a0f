//! Small filesystem helpers shared by the schedule driver and its tests.

use std::path::{Path, PathBuf};

use crate::common::EngineError;

/// Lists the files directly inside `dir` whose extension matches `ext`
/// (without the leading dot), sorted by file name so that schedules are
/// always processed in the same, reproducible order.
pub(crate) fn sorted_files_with_extension(
    dir: &Path,
    ext: &str,
) -> Result<Vec<PathBuf>, EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::ScheduleDirNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|source| EngineError::ScheduleDirUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| EngineError::ScheduleDirUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_matching_extension_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("ignore.md"), "").unwrap();

        let files = sorted_files_with_extension(dir.path(), "txt").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let missing = std::env::temp_dir().join("woundwait_missing_dir_for_test");
        let _ = std::fs::remove_dir_all(&missing);
        let err = sorted_files_with_extension(&missing, "txt").unwrap_err();
        assert!(matches!(err, EngineError::ScheduleDirNotFound { .. }));
    }
}
