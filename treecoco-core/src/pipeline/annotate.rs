// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use crate::config::PipelineConfig;
use crate::constant::{COMBINED_MASK_EXTENSION, SUPPORTED_IMAGE_FORMATS};
use crate::cv::compress_contour;
use crate::cv::points::{bounding_rect, flatten_points, polygon_area};
use crate::ds::parse_object_id;
use crate::error::TreeCocoError;
use crate::im::RgbaMask;
use crate::io::{CocoAnnotation, CocoImage};
use crate::ut;
use crate::ut::track::Progress;

/// List combined masks as COCO image records
///
/// Masks are ordered by file name and numbered from zero in that order.
/// Dimensions are read from the image header without decoding pixels.
///
/// # Arguments
///
/// * `output_dir` - Directory of combined masks
/// * `progress` - Receives an update after every image
pub fn list_images(
    output_dir: &Path,
    progress: &mut impl Progress,
) -> Result<Vec<CocoImage>, TreeCocoError> {
    let files = ut::path::collect_file_paths(output_dir, &[COMBINED_MASK_EXTENSION])?;
    let total = files.len();

    let mut images = Vec::with_capacity(total);

    for (id, path) in files.iter().enumerate() {
        let (width, height) = image::image_dimensions(path)
            .map_err(|_| TreeCocoError::ImageReadError(path.display().to_string()))?;

        images.push(CocoImage {
            id,
            width,
            height,
            file_name: ut::path::file_name(path)?.to_string(),
        });

        progress.update(id + 1, total);
    }

    Ok(images)
}

/// Single tree masks belonging to one combined mask
#[derive(Debug, Clone, PartialEq)]
pub struct FrameGroup {
    pub image_id: usize,
    pub file_name: String,
    pub object_masks: Vec<String>,
}

/// Pair every combined mask with the single tree masks of its frame
///
/// A single tree mask belongs to a combined mask when its file name starts
/// with the combined mask's name up to the first `.`.
///
/// # Arguments
///
/// * `images` - Combined masks from [`list_images`]
/// * `object_mask_dir` - Directory of single tree masks
/// * `progress` - Receives an update after every image
pub fn group_object_masks(
    images: &[CocoImage],
    object_mask_dir: &Path,
    progress: &mut impl Progress,
) -> Result<Vec<FrameGroup>, TreeCocoError> {
    let masks = ut::path::collect_file_paths(object_mask_dir, SUPPORTED_IMAGE_FORMATS.as_slice())?;

    let names: Vec<&str> = masks
        .iter()
        .map(|path| ut::path::file_name(path))
        .collect::<Result<_, _>>()?;

    let total = images.len();

    let groups = images
        .iter()
        .enumerate()
        .map(|(idx, image)| {
            let stem = image.file_name.split('.').next().unwrap_or_default();

            let object_masks = names
                .iter()
                .filter(|name| name.starts_with(stem))
                .map(|name| name.to_string())
                .collect();

            progress.update(idx + 1, total);

            FrameGroup {
                image_id: image.id,
                file_name: image.file_name.clone(),
                object_masks,
            }
        })
        .collect();

    Ok(groups)
}

/// Outcome of tracing the silhouette of a single tree mask
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// No foreground region
    Empty,
    /// More than one disconnected region
    Fragmented(usize),
    /// Exactly one region
    Single {
        bbox: [u32; 4],
        polygon: Vec<u32>,
        area: f64,
    },
}

/// Trace the silhouette of a single tree mask
///
/// Every pixel brighter than the noise threshold in any channel is painted
/// with the sentinel colour and the outer borders of the sentinel regions
/// are traced. Holes never count as separate regions.
///
/// # Arguments
///
/// * `mask` - Decoded single tree mask, recoloured in place
/// * `config` - Pipeline settings
pub fn segment(mask: &mut RgbaMask, config: &PipelineConfig) -> Segment {
    mask.recolor_foreground(config.noise_threshold, config.sentinel);

    let mut contours = mask.select_color(config.sentinel).external_contours();

    match contours.len() {
        0 => Segment::Empty,
        1 => {
            let contour = contours.remove(0);

            match bounding_rect(&contour) {
                Some(bbox) => Segment::Single {
                    bbox,
                    polygon: flatten_points(&compress_contour(&contour)),
                    area: polygon_area(&contour),
                },
                None => Segment::Empty,
            }
        }
        n => Segment::Fragmented(n),
    }
}

/// Annotations of one combined mask along with the masks that yielded none
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub annotations: Vec<CocoAnnotation>,
    /// Masks without any tree pixels
    pub empty: Vec<String>,
    /// Masks whose tree is split into several regions
    pub fragmented: Vec<String>,
    /// Masks that could not be decoded or whose name carries no tree id
    pub skipped: Vec<String>,
}

impl Extraction {
    fn merge(&mut self, other: Extraction) {
        self.annotations.extend(other.annotations);
        self.empty.extend(other.empty);
        self.fragmented.extend(other.fragmented);
        self.skipped.extend(other.skipped);
    }
}

/// Extract one annotation per single tree mask of a frame
///
/// Masks without exactly one tree region are recorded as empty or
/// fragmented and produce no annotation. Unreadable masks and names without
/// a tree id are reported and skipped.
///
/// # Arguments
///
/// * `image_id` - Id of the combined mask the annotations belong to
/// * `object_masks` - File names of single tree masks in `object_mask_dir`
/// * `object_mask_dir` - Directory of single tree masks
/// * `config` - Pipeline settings
pub fn extract(
    image_id: usize,
    object_masks: &[String],
    object_mask_dir: &Path,
    config: &PipelineConfig,
) -> Extraction {
    let mut extraction = Extraction::default();

    for name in object_masks.iter() {
        let id = match parse_object_id(name, &config.object_marker) {
            Ok(id) => id,
            Err(err) => {
                ut::track::progress_warn(&format!("Skipping single tree mask. {}", err));
                extraction.skipped.push(name.clone());
                continue;
            }
        };

        let mut mask = match RgbaMask::open(object_mask_dir.join(name)) {
            Ok(mask) => mask,
            Err(err) => {
                ut::track::progress_warn(&format!("Skipping unreadable mask. {}", err));
                extraction.skipped.push(name.clone());
                continue;
            }
        };

        match segment(&mut mask, config) {
            Segment::Empty => extraction.empty.push(name.clone()),
            Segment::Fragmented(_) => extraction.fragmented.push(name.clone()),
            Segment::Single {
                bbox,
                polygon,
                area,
            } => extraction.annotations.push(CocoAnnotation {
                id,
                image_id,
                category_id: config.category.id,
                bbox,
                segmentation: vec![polygon],
                area,
                iscrowd: 0,
            }),
        }
    }

    extraction
}

/// Extract annotations for every frame group in order
///
/// # Arguments
///
/// * `groups` - Frame groups from [`group_object_masks`]
/// * `object_mask_dir` - Directory of single tree masks
/// * `config` - Pipeline settings
/// * `progress` - Receives an update after every frame group
pub fn extract_all(
    groups: &[FrameGroup],
    object_mask_dir: &Path,
    config: &PipelineConfig,
    progress: &mut impl Progress,
) -> Extraction {
    let total = groups.len();
    let mut extraction = Extraction::default();

    for (idx, group) in groups.iter().enumerate() {
        extraction.merge(extract(
            group.image_id,
            &group.object_masks,
            object_mask_dir,
            config,
        ));
        progress.update(idx + 1, total);
    }

    extraction
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::ut::track::Silent;

    // A 6 x 6 black mask with the provided rectangles painted dark grey
    fn write_mask(path: &Path, rects: &[[u32; 4]]) {
        let mut mask = RgbaMask::filled(6, 6, [0, 0, 0, 255]);
        for &[x, y, w, h] in rects {
            for yy in y..y + h {
                for xx in x..x + w {
                    let idx = ((yy * 6 + xx) * 4) as usize;
                    mask.buffer[idx..idx + 4].copy_from_slice(&[30, 60, 10, 255]);
                }
            }
        }
        mask.save(path).unwrap();
    }

    #[test]
    fn test_segment_single_rectangle() {
        let mut mask = RgbaMask::filled(6, 6, [0, 0, 0, 255]);
        for y in 1..4 {
            for x in 2..5 {
                let idx = (y * 6 + x) * 4;
                mask.buffer[idx..idx + 4].copy_from_slice(&[0, 40, 0, 255]);
            }
        }

        let segment = segment(&mut mask, &PipelineConfig::default());

        assert_eq!(
            segment,
            Segment::Single {
                bbox: [2, 1, 3, 3],
                polygon: vec![2, 1, 2, 3, 4, 3, 4, 1],
                area: 4.0,
            }
        );
    }

    #[test]
    fn test_segment_ignores_noise() {
        let mut mask = RgbaMask::filled(4, 4, [5, 5, 5, 255]);
        assert_eq!(segment(&mut mask, &PipelineConfig::default()), Segment::Empty);
    }

    #[test]
    fn test_segment_hole_is_single_region() {
        let mut mask = RgbaMask::filled(5, 5, [0, 0, 0, 255]);
        for y in 0..5 {
            for x in 0..5 {
                if x == 0 || y == 0 || x == 4 || y == 4 {
                    let idx = (y * 5 + x) * 4;
                    mask.buffer[idx..idx + 4].copy_from_slice(&[90, 90, 90, 255]);
                }
            }
        }

        assert!(matches!(
            segment(&mut mask, &PipelineConfig::default()),
            Segment::Single { bbox: [0, 0, 5, 5], .. }
        ));
    }

    #[test]
    fn test_extract_skips_degenerate_masks() {
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path();

        write_mask(&trees.join("1_Map_a_b_Tree4.png"), &[[1, 1, 2, 2]]);
        write_mask(&trees.join("1_Map_a_b_Tree5.png"), &[[0, 0, 1, 1], [4, 4, 2, 2]]);
        write_mask(&trees.join("1_Map_a_b_Tree6.png"), &[]);
        write_mask(&trees.join("1_Map_a_b_Bush7.png"), &[[1, 1, 2, 2]]);

        let names: Vec<String> = [
            "1_Map_a_b_Bush7.png",
            "1_Map_a_b_Tree4.png",
            "1_Map_a_b_Tree5.png",
            "1_Map_a_b_Tree6.png",
        ]
        .iter()
        .map(|name| name.to_string())
        .collect();

        let extraction = extract(3, &names, trees, &PipelineConfig::default());

        assert_eq!(extraction.annotations.len(), 1);
        assert_eq!(extraction.empty, vec!["1_Map_a_b_Tree6.png".to_string()]);
        assert_eq!(extraction.fragmented, vec!["1_Map_a_b_Tree5.png".to_string()]);
        assert_eq!(extraction.skipped, vec!["1_Map_a_b_Bush7.png".to_string()]);

        let annotation = &extraction.annotations[0];
        assert_eq!(annotation.id, 4);
        assert_eq!(annotation.image_id, 3);
        assert_eq!(annotation.category_id, 0);
        assert_eq!(annotation.bbox, [1, 1, 2, 2]);
        assert_eq!(annotation.segmentation, vec![vec![1, 1, 1, 2, 2, 2, 2, 1]]);
        assert_eq!(annotation.area, 1.0);
        assert_eq!(annotation.iscrowd, 0);
    }

    #[test]
    fn test_extract_skips_unreadable_masks() {
        let dir = tempfile::tempdir().unwrap();
        let trees = dir.path();

        std::fs::write(trees.join("1_Map_a_b_Tree1.png"), b"junk").unwrap();
        write_mask(&trees.join("1_Map_a_b_Tree2.png"), &[[2, 2, 3, 2]]);

        let names = vec![
            "1_Map_a_b_Tree1.png".to_string(),
            "1_Map_a_b_Tree2.png".to_string(),
        ];

        let extraction = extract(0, &names, trees, &PipelineConfig::default());

        assert_eq!(extraction.skipped, vec!["1_Map_a_b_Tree1.png".to_string()]);
        assert_eq!(extraction.annotations.len(), 1);
        assert_eq!(extraction.annotations[0].id, 2);
        assert_eq!(extraction.annotations[0].bbox, [2, 2, 3, 2]);
    }

    #[test]
    fn test_list_images_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("5_Map_.png");
        std::fs::write(&path, b"junk").unwrap();

        let images = list_images(dir.path(), &mut Silent);

        assert_eq!(
            images,
            Err(TreeCocoError::ImageReadError(path.display().to_string()))
        );
    }

    #[test]
    fn test_list_and_group() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("NewMasks");
        let trees = dir.path().join("SingleTrees");
        std::fs::create_dir(&output).unwrap();
        std::fs::create_dir(&trees).unwrap();

        RgbaMask::filled(4, 2, [0, 0, 0, 255]).save(output.join("2_Map_.png")).unwrap();
        RgbaMask::filled(3, 5, [0, 0, 0, 255]).save(output.join("10_Map_.png")).unwrap();

        for name in ["2_Map_a_b_Tree2.png", "2_Map_a_b_Tree1.png", "10_Map_a_b_Tree1.png"] {
            std::fs::write(trees.join(name), b"").unwrap();
        }

        let mut updates = Vec::new();
        let images = list_images(&output, &mut |c: usize, t: usize| updates.push((c, t))).unwrap();

        assert_eq!(updates, vec![(1, 2), (2, 2)]);
        assert_eq!(images[0].file_name, "10_Map_.png");
        assert_eq!((images[0].id, images[0].width, images[0].height), (0, 3, 5));
        assert_eq!(images[1].file_name, "2_Map_.png");
        assert_eq!((images[1].id, images[1].width, images[1].height), (1, 4, 2));

        let groups = group_object_masks(&images, &trees, &mut Silent).unwrap();

        assert_eq!(groups[0].object_masks, vec!["10_Map_a_b_Tree1.png".to_string()]);
        assert_eq!(
            groups[1].object_masks,
            vec!["2_Map_a_b_Tree1.png".to_string(), "2_Map_a_b_Tree2.png".to_string()]
        );
    }
}
