// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::{Path, PathBuf};

use crate::constant;
use crate::error::TreeCocoError;
use crate::ut;

/// Directory layout of a simulated dataset root
///
/// ```text
/// <root>/
///     Images/        rendered frames
///     Depth/         depth maps
///     Masks/         simulator masks (untouched)
///     SingleTrees/   one mask per tree per frame
///     NewMasks/      combined masks (rebuilt on every run)
///     coco.json      output annotations
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DatasetLayout { root: root.into() }
    }

    /// Verify the root exists, is absolute, and holds every input directory
    pub fn check(&self) -> Result<(), TreeCocoError> {
        if !self.root.exists() {
            return Err(TreeCocoError::InvalidInputPath(format!(
                "{} does not exist",
                self.root.display()
            )));
        }

        ut::path::require_absolute(&self.root)?;

        for name in constant::REQUIRED_DIRS {
            if !self.root.join(name).is_dir() {
                return Err(TreeCocoError::MissingDirectory(name.to_string()));
            }
        }

        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn images(&self) -> PathBuf {
        self.root.join(constant::IMAGES_DIR)
    }

    pub fn depth(&self) -> PathBuf {
        self.root.join(constant::DEPTH_DIR)
    }

    pub fn single_trees(&self) -> PathBuf {
        self.root.join(constant::SINGLE_TREES_DIR)
    }

    pub fn combined_masks(&self) -> PathBuf {
        self.root.join(constant::COMBINED_MASKS_DIR)
    }

    pub fn coco(&self) -> PathBuf {
        self.root.join(constant::COCO_FILE)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_check_complete() {
        let dir = tempfile::tempdir().unwrap();
        for name in constant::REQUIRED_DIRS {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        assert_eq!(DatasetLayout::new(dir.path()).check(), Ok(()));
    }

    #[test]
    fn test_check_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in [constant::IMAGES_DIR, constant::DEPTH_DIR, constant::MASKS_DIR] {
            std::fs::create_dir(dir.path().join(name)).unwrap();
        }

        assert_eq!(
            DatasetLayout::new(dir.path()).check(),
            Err(TreeCocoError::MissingDirectory("SingleTrees".to_string()))
        );
    }

    #[test]
    fn test_check_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let layout = DatasetLayout::new(dir.path().join("missing"));

        assert!(matches!(layout.check(), Err(TreeCocoError::InvalidInputPath(_))));
    }
}
