// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use crate::constant::{COMBINED_MASK_EXTENSION, SUPPORTED_IMAGE_FORMATS};
use crate::ds::{FrameKey, leading_token};
use crate::error::TreeCocoError;
use crate::im::RgbaMask;
use crate::ut;
use crate::ut::track::Progress;

// Background of every combined mask
const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// Merge the single tree masks of every frame into one mask per frame
///
/// The output directory is deleted and recreated before any frame is
/// written, so combined masks never survive from an earlier run.
///
/// # Arguments
///
/// * `frame_keys` - Frames to composite
/// * `object_mask_dir` - Directory of single tree masks
/// * `output_dir` - Directory receiving `<key>.png` combined masks
/// * `progress` - Receives an update after every frame
///
/// Returns the combined mask path of every frame. Frames whose masks all
/// fail to decode are reported and left out.
///
/// # Errors
///
/// `EmptyFrameError` when a frame has no single tree mask at all.
pub fn composite(
    frame_keys: &BTreeSet<FrameKey>,
    object_mask_dir: &Path,
    output_dir: &Path,
    progress: &mut impl Progress,
) -> Result<BTreeMap<FrameKey, PathBuf>, TreeCocoError> {
    ut::path::recreate_directory(output_dir)?;

    let masks = ut::path::collect_file_paths(object_mask_dir, SUPPORTED_IMAGE_FORMATS.as_slice())?;

    let total = frame_keys.len();
    let mut combined = BTreeMap::new();

    for (idx, key) in frame_keys.iter().enumerate() {
        let sources = frame_sources(key, &masks);
        match composite_frame(key, &sources, output_dir)? {
            Some(path) => {
                combined.insert(key.clone(), path);
            }
            None => {
                ut::track::progress_warn(&format!(
                    "Skipping frame {}. None of its single tree masks could be read.",
                    key
                ));
            }
        }

        progress.update(idx + 1, total);
    }

    Ok(combined)
}

/// Single tree masks whose leading token matches the frame id
fn frame_sources<'a>(key: &FrameKey, masks: &'a [PathBuf]) -> Vec<&'a PathBuf> {
    masks
        .iter()
        .filter(|path| {
            ut::path::file_name(path).is_ok_and(|name| leading_token(name) == key.frame_id())
        })
        .collect()
}

/// Paint the provided masks, in order, over an opaque black canvas
///
/// The canvas takes the size of the first readable mask. Later masks win
/// wherever they are not black. Unreadable masks are reported and skipped;
/// when none is readable nothing is written and `None` is returned.
///
/// # Arguments
///
/// * `key` - Frame key, used as the output file stem
/// * `sources` - Single tree masks of the frame in paint order
/// * `output_dir` - Directory receiving the combined mask
pub fn composite_frame<P: AsRef<Path>>(
    key: &FrameKey,
    sources: &[P],
    output_dir: &Path,
) -> Result<Option<PathBuf>, TreeCocoError> {
    if sources.is_empty() {
        return Err(TreeCocoError::EmptyFrameError(key.to_string()));
    }

    let layers: Vec<RgbaMask> = sources
        .iter()
        .filter_map(|path| match RgbaMask::open(path) {
            Ok(mask) => Some(mask),
            Err(err) => {
                ut::track::progress_warn(&format!("Skipping unreadable mask. {}", err));
                None
            }
        })
        .collect();

    let Some(first) = layers.first() else {
        return Ok(None);
    };

    let mut canvas = RgbaMask::filled(first.width(), first.height(), OPAQUE_BLACK);
    for layer in layers.iter() {
        canvas.paint_over(layer);
    }

    let path = output_dir.join(format!("{}.{}", key, COMBINED_MASK_EXTENSION));
    canvas.save(&path)?;

    Ok(Some(path))
}
