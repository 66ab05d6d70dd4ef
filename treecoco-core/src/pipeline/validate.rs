// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use crate::config::PipelineConfig;
use crate::constant::SUPPORTED_IMAGE_FORMATS;
use crate::error::TreeCocoError;
use crate::im::RgbaMask;
use crate::ut;
use crate::ut::track::Progress;

/// Delete single tree masks with too little or too much background
///
/// A mask is kept when its black pixel fraction, measured against
/// `config.total_pixels`, lies within the configured bounds (inclusive).
/// Masks that cannot be decoded are reported and left in place.
///
/// # Arguments
///
/// * `mask_dir` - Directory of single tree masks
/// * `config` - Pipeline settings
/// * `progress` - Receives an update after every mask
///
/// Returns the number of deleted masks.
pub fn validate(
    mask_dir: &Path,
    config: &PipelineConfig,
    progress: &mut impl Progress,
) -> Result<usize, TreeCocoError> {
    let files = ut::path::collect_file_paths(mask_dir, SUPPORTED_IMAGE_FORMATS.as_slice())?;
    let total = files.len();

    let mut removed = 0;

    for (idx, path) in files.iter().enumerate() {
        match RgbaMask::open(path) {
            Ok(mask) => {
                let fraction = mask.black_fraction(config.total_pixels);
                drop(mask);

                if !config.accepts_black_fraction(fraction) {
                    ut::path::remove_file(path)?;
                    removed += 1;
                }
            }
            Err(err) => {
                ut::track::progress_warn(&format!("Skipping unreadable mask. {}", err));
            }
        }

        progress.update(idx + 1, total);
    }

    Ok(removed)
}
