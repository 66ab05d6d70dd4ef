// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// All image formats accepted as dataset inputs
pub const SUPPORTED_IMAGE_FORMATS: [&str; 11] = [
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "tga", "tif", "tiff", "webp",
];

// Directory names expected inside a dataset root
pub const IMAGES_DIR: &str = "Images";
pub const DEPTH_DIR: &str = "Depth";
pub const MASKS_DIR: &str = "Masks";
pub const SINGLE_TREES_DIR: &str = "SingleTrees";

pub const REQUIRED_DIRS: [&str; 4] = [DEPTH_DIR, IMAGES_DIR, MASKS_DIR, SINGLE_TREES_DIR];

// Outputs written into the dataset root
pub const COMBINED_MASKS_DIR: &str = "NewMasks";
pub const COCO_FILE: &str = "coco.json";

// Extension of combined frame masks
pub const COMBINED_MASK_EXTENSION: &str = "png";

// Number of trailing underscore segments dropped from single tree names
pub const OBJECT_SUFFIX_SEGMENTS: usize = 3;

// Default pixel count of a 768 x 768 simulator capture
pub const DEFAULT_TOTAL_PIXELS: u64 = 589_824;

// Black pixel fraction bounds for a usable single tree mask (inclusive)
pub const DEFAULT_MIN_BLACK_FRACTION: f64 = 0.2;
pub const DEFAULT_MAX_BLACK_FRACTION: f64 = 0.99;

// Channel values at or below this are treated as anti-aliasing noise
pub const DEFAULT_NOISE_THRESHOLD: u8 = 5;

// Paint colour used to isolate a tree silhouette before tracing
pub const DEFAULT_SENTINEL: [u8; 3] = [245, 155, 66];

// Marker preceding the tree id in the last segment of a single tree name
pub const DEFAULT_OBJECT_MARKER: &str = "Tree";

pub const DEFAULT_DESCRIPTION: &str = "UE Generated Simulated Data";

pub const DEFAULT_CATEGORY_ID: u32 = 0;
pub const DEFAULT_CATEGORY_NAME: &str = "tree";

// Format of the COCO `date_created` field
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
