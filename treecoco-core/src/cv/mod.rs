pub mod contours;
pub mod points;

pub use contours::{compress_contour, find_contours, find_external_contours};
