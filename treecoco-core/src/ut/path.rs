// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::error::TreeCocoError;

/// Collect every regular file in a directory sorted by file name
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
///
/// # Examples
///
/// ```no_run
/// use treecoco_core::ut::path::collect_files;
/// let files = collect_files("dataset/Depth");
/// ```
pub fn collect_files<P: AsRef<Path>>(directory: P) -> Result<Vec<PathBuf>, TreeCocoError> {
    let directory = directory.as_ref();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|err| TreeCocoError::DirError(format!("{}: {}", directory.display(), err)))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();

    files.sort_unstable_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Collect file paths with a valid extension sorted by file name
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Lowercase extensions to keep
///
/// # Examples
///
/// ```no_run
/// use treecoco_core::ut::path::collect_file_paths;
/// use treecoco_core::constant::SUPPORTED_IMAGE_FORMATS;
/// let files = collect_file_paths("dataset/SingleTrees", SUPPORTED_IMAGE_FORMATS.as_slice());
/// ```
pub fn collect_file_paths<P: AsRef<Path>>(
    directory: P,
    valid_ext: &[&str],
) -> Result<Vec<PathBuf>, TreeCocoError> {
    let mut files = collect_files(directory)?;

    files.retain(|path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| valid_ext.contains(&ext.to_lowercase().as_str()))
    });

    Ok(files)
}

/// Return the file name of a path as a string slice
pub fn file_name(path: &Path) -> Result<&str, TreeCocoError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TreeCocoError::FileError(format!("Invalid file name {}", path.display())))
}

/// Remove a file from disk
pub fn remove_file(path: &Path) -> Result<(), TreeCocoError> {
    std::fs::remove_file(path)
        .map_err(|err| TreeCocoError::FileError(format!("{}: {}", path.display(), err)))
}

/// Delete a directory with all of its contents and create it again empty
///
/// # Examples
///
/// ```
/// use treecoco_core::ut::path::recreate_directory;
///
/// let base = std::env::temp_dir().join("TEST_RECREATE_DIRECTORY");
/// std::fs::create_dir_all(&base).unwrap();
/// std::fs::write(base.join("stale.png"), b"").unwrap();
///
/// recreate_directory(&base).unwrap();
///
/// assert!(base.is_dir());
/// assert_eq!(std::fs::read_dir(&base).unwrap().count(), 0);
///
/// std::fs::remove_dir(&base).unwrap();
/// ```
pub fn recreate_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, TreeCocoError> {
    let directory = directory.as_ref();

    if directory.exists() {
        std::fs::remove_dir_all(directory)
            .map_err(|err| TreeCocoError::DirError(format!("{}: {}", directory.display(), err)))?;
    }

    std::fs::create_dir_all(directory)
        .map_err(|err| TreeCocoError::DirError(format!("{}: {}", directory.display(), err)))?;

    Ok(directory.to_path_buf())
}

/// Fail unless a path is absolute
pub fn require_absolute(path: &Path) -> Result<(), TreeCocoError> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(TreeCocoError::InvalidInputPath(format!(
            "{} must be an absolute path",
            path.display()
        )))
    }
}
