// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::ds::FrameKey;
use crate::error::TreeCocoError;
use crate::ut;
use crate::ut::track::Progress;

/// Keep only the frames present in all three per-frame directories
///
/// Image and depth files are keyed by their name up to the first `.` and
/// single tree masks by their name without the last three `_` segments.
/// Every file whose key is not shared by all three directories is deleted,
/// including single tree masks whose name has no key at all.
///
/// # Arguments
///
/// * `image_dir` - Absolute path to rendered frames
/// * `depth_dir` - Absolute path to depth maps
/// * `object_mask_dir` - Absolute path to single tree masks
/// * `progress` - Receives an update after every deletion
///
/// Returns the shared keys, which may be empty.
pub fn align(
    image_dir: &Path,
    depth_dir: &Path,
    object_mask_dir: &Path,
    progress: &mut impl Progress,
) -> Result<BTreeSet<FrameKey>, TreeCocoError> {
    for dir in [image_dir, depth_dir, object_mask_dir] {
        ut::path::require_absolute(dir)?;
    }

    let images = frame_files(image_dir)?;
    let depths = frame_files(depth_dir)?;
    let objects = object_files(object_mask_dir)?;

    let common: BTreeSet<FrameKey> = keys(&images)
        .intersection(&keys(&depths))
        .cloned()
        .collect::<BTreeSet<FrameKey>>()
        .intersection(&keys(&objects))
        .cloned()
        .collect();

    let unaligned: Vec<&PathBuf> = images
        .iter()
        .chain(depths.iter())
        .chain(objects.iter())
        .filter(|(_, key)| key.as_ref().is_none_or(|key| !common.contains(key)))
        .map(|(path, _)| path)
        .collect();

    let total = unaligned.len();
    for (idx, path) in unaligned.into_iter().enumerate() {
        if path.exists() {
            ut::path::remove_file(path)?;
        }
        progress.update(idx + 1, total);
    }

    Ok(common)
}

/// Keys of the frames in a directory of rendered frames or depth maps
///
/// After [`align`] every per-frame directory yields the same keys.
pub fn frame_keys(dir: &Path) -> Result<BTreeSet<FrameKey>, TreeCocoError> {
    Ok(keys(&frame_files(dir)?))
}

type KeyedFiles = Vec<(PathBuf, Option<FrameKey>)>;

fn frame_files(dir: &Path) -> Result<KeyedFiles, TreeCocoError> {
    ut::path::collect_files(dir)?
        .into_iter()
        .map(|path| {
            let key = FrameKey::from_frame_file(ut::path::file_name(&path)?);
            Ok((path, Some(key)))
        })
        .collect()
}

fn object_files(dir: &Path) -> Result<KeyedFiles, TreeCocoError> {
    ut::path::collect_files(dir)?
        .into_iter()
        .map(|path| {
            let key = FrameKey::from_object_file(ut::path::file_name(&path)?).ok();
            Ok((path, key))
        })
        .collect()
}

fn keys(files: &KeyedFiles) -> BTreeSet<FrameKey> {
    files.iter().filter_map(|(_, key)| key.clone()).collect()
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::ut::track::Silent;

    struct Dirs {
        _root: tempfile::TempDir,
        images: PathBuf,
        depth: PathBuf,
        trees: PathBuf,
    }

    fn dirs() -> Dirs {
        let root = tempfile::tempdir().unwrap();
        let images = root.path().join("Images");
        let depth = root.path().join("Depth");
        let trees = root.path().join("SingleTrees");

        for dir in [&images, &depth, &trees] {
            std::fs::create_dir(dir).unwrap();
        }

        Dirs {
            _root: root,
            images,
            depth,
            trees,
        }
    }

    fn touch(dir: &Path, names: &[&str]) {
        for name in names {
            std::fs::write(dir.join(name), b"").unwrap();
        }
    }

    fn names(dir: &Path) -> Vec<String> {
        ut::path::collect_files(dir)
            .unwrap()
            .iter()
            .map(|p| ut::path::file_name(p).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_align_intersection() {
        let d = dirs();

        touch(&d.images, &["1_Map_.png", "2_Map_.png", "3_Map_.png"]);
        touch(&d.depth, &["1_Map_.png", "2_Map_.png", "4_Map_.png"]);
        touch(
            &d.trees,
            &[
                "1_Map_a_b_Tree1.png",
                "1_Map_a_b_Tree2.png",
                "3_Map_a_b_Tree1.png",
                "2_Map_a_b_Tree9.png",
                "junk.png",
            ],
        );

        let common = align(&d.images, &d.depth, &d.trees, &mut Silent).unwrap();

        let expected: BTreeSet<FrameKey> = ["1_Map_", "2_Map_"].into_iter().map(FrameKey::from).collect();
        assert_eq!(common, expected);

        assert_eq!(names(&d.images), vec!["1_Map_.png", "2_Map_.png"]);
        assert_eq!(names(&d.depth), vec!["1_Map_.png", "2_Map_.png"]);
        assert_eq!(
            names(&d.trees),
            vec!["1_Map_a_b_Tree1.png", "1_Map_a_b_Tree2.png", "2_Map_a_b_Tree9.png"]
        );
    }

    #[test]
    fn test_align_empty_intersection() {
        let d = dirs();

        touch(&d.images, &["1_Map_.png"]);
        touch(&d.depth, &["2_Map_.png"]);
        touch(&d.trees, &["1_Map_a_b_Tree1.png"]);

        let common = align(&d.images, &d.depth, &d.trees, &mut Silent).unwrap();

        assert!(common.is_empty());
        assert!(names(&d.images).is_empty());
        assert!(names(&d.depth).is_empty());
        assert!(names(&d.trees).is_empty());
    }

    #[test]
    fn test_align_relative_path() {
        let d = dirs();
        let relative = Path::new("SingleTrees");

        let result = align(&d.images, &d.depth, relative, &mut Silent);
        assert!(matches!(result, Err(TreeCocoError::InvalidInputPath(_))));
    }

    #[test]
    fn test_align_progress_per_deletion() {
        let d = dirs();

        touch(&d.images, &["1_Map_.png", "2_Map_.png"]);
        touch(&d.depth, &["1_Map_.png"]);
        touch(&d.trees, &["1_Map_a_b_Tree1.png"]);

        let mut updates = Vec::new();
        align(&d.images, &d.depth, &d.trees, &mut |c: usize, t: usize| {
            updates.push((c, t))
        })
        .unwrap();

        assert_eq!(updates, vec![(1, 1)]);
    }
}
