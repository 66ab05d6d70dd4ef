mod coco;

pub use coco::{CocoAnnotation, CocoCategory, CocoDocument, CocoImage, CocoInfo};
