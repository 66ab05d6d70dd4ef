// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fmt;

use crate::constant::OBJECT_SUFFIX_SEGMENTS;
use crate::error::TreeCocoError;

/// Identifier linking the image, depth map, and tree masks of one frame
///
/// Keys are derived purely from file names:
///
/// | File                                        | Key                |
/// |---------------------------------------------|--------------------|
/// | `Images/1435_Forest_Map_.png`               | `1435_Forest_Map_` |
/// | `Depth/1435_Forest_Map_.png`                | `1435_Forest_Map_` |
/// | `SingleTrees/1435_Forest_Map_A_B_Tree7.png` | `1435_Forest_Map_` |
///
/// # Examples
///
/// ```
/// use treecoco_core::ds::FrameKey;
///
/// let image = FrameKey::from_frame_file("1435_Forest_Map_.png");
/// let tree = FrameKey::from_object_file("1435_Forest_Map_A_B_Tree7.png").unwrap();
///
/// assert_eq!(image, tree);
/// assert_eq!(tree.frame_id(), "1435");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameKey(String);

impl FrameKey {
    /// Key of an image or depth file: the file name up to its first `.`
    pub fn from_frame_file(file_name: &str) -> FrameKey {
        let stem = file_name.split('.').next().unwrap_or_default();
        FrameKey(stem.to_string())
    }

    /// Key of a single tree mask file
    ///
    /// The last three `_` separated segments of the file name are removed
    /// and a trailing `_` is restored.
    ///
    /// # Arguments
    ///
    /// * `file_name` - File name of a single tree mask
    pub fn from_object_file(file_name: &str) -> Result<FrameKey, TreeCocoError> {
        let segments: Vec<&str> = file_name.split('_').collect();

        if segments.len() <= OBJECT_SUFFIX_SEGMENTS {
            return Err(TreeCocoError::ParseError(format!(
                "Expected more than {} '_' separated segments in {}",
                OBJECT_SUFFIX_SEGMENTS, file_name
            )));
        }

        let prefix = segments[..segments.len() - OBJECT_SUFFIX_SEGMENTS].join("_");
        Ok(FrameKey(format!("{}_", prefix)))
    }

    /// The frame number, i.e. the first `_` separated token of the key
    pub fn frame_id(&self) -> &str {
        leading_token(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FrameKey {
    fn from(key: &str) -> Self {
        FrameKey(key.to_string())
    }
}

/// The first `_` separated token of a file name
pub fn leading_token(file_name: &str) -> &str {
    file_name.split('_').next().unwrap_or_default()
}

/// Parse the tree id from a single tree mask file name
///
/// The id is the last `_` separated segment of the name (before its first
/// `.`) with the object marker removed.
///
/// # Arguments
///
/// * `file_name` - File name of a single tree mask
/// * `marker` - Alphabetic marker preceding the id (e.g. `Tree`)
///
/// # Examples
///
/// ```
/// use treecoco_core::ds::parse_object_id;
///
/// assert_eq!(parse_object_id("1435_Forest_Map_A_B_Tree17.png", "Tree"), Ok(17));
/// assert!(parse_object_id("1435_Forest_Map_A_B_Bush17.png", "Tree").is_err());
/// ```
pub fn parse_object_id(file_name: &str, marker: &str) -> Result<u32, TreeCocoError> {
    let stem = file_name.split('.').next().unwrap_or_default();
    let segment = stem.rsplit('_').next().unwrap_or_default();

    let digits = segment.strip_prefix(marker).ok_or_else(|| {
        TreeCocoError::ParseError(format!(
            "Missing object marker '{}' in {}",
            marker, file_name
        ))
    })?;

    digits.parse::<u32>().map_err(|_| {
        TreeCocoError::ParseError(format!(
            "Object id '{}' in {} is not a number",
            digits, file_name
        ))
    })
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_frame_file_key() {
        assert_eq!(FrameKey::from_frame_file("12_Map_.png").as_str(), "12_Map_");
        assert_eq!(FrameKey::from_frame_file("12_Map_.depth.exr").as_str(), "12_Map_");
        assert_eq!(FrameKey::from_frame_file("12_Map_").as_str(), "12_Map_");
    }

    #[test]
    fn test_object_file_key() {
        let key = FrameKey::from_object_file("12_Forest_Environment_Set_Map_0_1_Tree3.png");
        assert_eq!(key.unwrap().as_str(), "12_Forest_Environment_Set_Map_");

        let key = FrameKey::from_object_file("12_A_B_Tree3.png");
        assert_eq!(key.unwrap().as_str(), "12_");
    }

    #[test]
    fn test_object_file_key_too_short() {
        let key = FrameKey::from_object_file("12_B_Tree3.png");
        assert!(matches!(key, Err(TreeCocoError::ParseError(_))));
    }

    #[test]
    fn test_key_is_pure() {
        let name = "7_Forest_Map_x_y_Tree1.png";
        let keys: Vec<FrameKey> = (0..3)
            .map(|_| FrameKey::from_object_file(name).unwrap())
            .collect();

        assert!(keys.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(keys[0].frame_id(), "7");
    }

    #[test]
    fn test_parse_object_id() {
        assert_eq!(parse_object_id("7_Map_x_y_Tree0.png", "Tree"), Ok(0));
        assert_eq!(parse_object_id("7_Map_x_y_Tree042", "Tree"), Ok(42));
        assert!(parse_object_id("7_Map_x_y_Tree.png", "Tree").is_err());
        assert!(parse_object_id("7_Map_x_y_TreeA1.png", "Tree").is_err());
    }
}
