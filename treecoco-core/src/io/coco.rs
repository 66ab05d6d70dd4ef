// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constant::DATE_FORMAT;
use crate::error::TreeCocoError;

/// COCO `info` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoInfo {
    pub date_created: String,
    pub description: String,
}

impl CocoInfo {
    /// Info block stamped with the current local time
    pub fn now(description: &str) -> Self {
        CocoInfo {
            date_created: chrono::Local::now().format(DATE_FORMAT).to_string(),
            description: description.to_string(),
        }
    }
}

/// One combined frame mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u32,
    pub name: String,
}

/// One tree instance
///
/// `bbox` is `[x, y, width, height]` and `segmentation` holds one flat
/// `[x0, y0, x1, y1, ...]` polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u32,
    pub image_id: usize,
    pub category_id: u32,
    pub bbox: [u32; 4],
    pub segmentation: Vec<Vec<u32>>,
    pub area: f64,
    pub iscrowd: u8,
}

/// A COCO detection/segmentation document
///
/// # Examples
///
/// ```
/// use treecoco_core::io::{CocoCategory, CocoDocument, CocoInfo};
///
/// let info = CocoInfo::now("Example");
/// let categories = vec![CocoCategory { id: 0, name: "tree".to_string() }];
/// let document = CocoDocument::new(info, vec![], categories, vec![]);
///
/// let json = serde_json::to_value(&document).unwrap();
/// assert!(json["licenses"].is_null());
/// assert_eq!(json["categories"][0]["name"], "tree");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoDocument {
    pub info: CocoInfo,
    pub licenses: Option<Vec<Value>>,
    pub images: Vec<CocoImage>,
    pub categories: Vec<CocoCategory>,
    pub annotations: Vec<CocoAnnotation>,
}

impl CocoDocument {
    pub fn new(
        info: CocoInfo,
        images: Vec<CocoImage>,
        categories: Vec<CocoCategory>,
        annotations: Vec<CocoAnnotation>,
    ) -> Self {
        CocoDocument {
            info,
            licenses: None,
            images,
            categories,
            annotations,
        }
    }

    /// Open a COCO document from a JSON file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<CocoDocument, TreeCocoError> {
        let mut contents = String::new();

        File::open(path)
            .map_err(|err| TreeCocoError::FileError(err.to_string()))?
            .read_to_string(&mut contents)
            .map_err(|err| TreeCocoError::FileError(err.to_string()))?;

        serde_json::from_str(&contents).map_err(|_| TreeCocoError::CocoReadError)
    }

    /// Write the document as JSON in a single pass
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeCocoError> {
        let file = File::create(path).map_err(|_| TreeCocoError::CocoWriteError)?;
        let mut writer = BufWriter::new(file);

        serde_json::to_writer(&mut writer, self).map_err(|_| TreeCocoError::CocoWriteError)?;
        writer.flush().map_err(|_| TreeCocoError::CocoWriteError)?;

        Ok(())
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn document() -> CocoDocument {
        CocoDocument::new(
            CocoInfo {
                date_created: "2024-05-01 10:00:00".to_string(),
                description: "Test".to_string(),
            },
            vec![CocoImage {
                id: 0,
                width: 4,
                height: 4,
                file_name: "1_Map_.png".to_string(),
            }],
            vec![CocoCategory {
                id: 0,
                name: "tree".to_string(),
            }],
            vec![CocoAnnotation {
                id: 3,
                image_id: 0,
                category_id: 0,
                bbox: [1, 1, 2, 2],
                segmentation: vec![vec![1, 1, 1, 2, 2, 2, 2, 1]],
                area: 1.0,
                iscrowd: 0,
            }],
        )
    }

    #[test]
    fn test_coco_schema() {
        let json = serde_json::to_value(document()).unwrap();

        let keys: Vec<&String> = json.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 5);

        assert_eq!(json["info"]["description"], "Test");
        assert!(json["licenses"].is_null());
        assert_eq!(json["images"][0]["file_name"], "1_Map_.png");
        assert_eq!(json["annotations"][0]["bbox"], serde_json::json!([1, 1, 2, 2]));
        assert_eq!(json["annotations"][0]["area"], 1.0);
        assert_eq!(json["annotations"][0]["iscrowd"], 0);
    }

    #[test]
    fn test_coco_save_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coco.json");

        document().save(&path).unwrap();
        assert_eq!(CocoDocument::open(&path).unwrap(), document());
    }

    #[test]
    fn test_coco_save_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("coco.json");

        assert_eq!(document().save(path), Err(TreeCocoError::CocoWriteError));
    }

    #[test]
    fn test_info_date_format() {
        let info = CocoInfo::now("Test");
        assert!(chrono::NaiveDateTime::parse_from_str(&info.date_created, DATE_FORMAT).is_ok());
    }
}
