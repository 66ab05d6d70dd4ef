// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

/// Axis-aligned bounding rectangle of a set of pixel coordinates
///
/// Returns `[x, y, width, height]` where width and height count pixels, so
/// a single point has a 1 x 1 rectangle. An empty set yields `None`.
///
/// # Examples
///
/// ```
/// use treecoco_core::cv::points::bounding_rect;
///
/// let points = [[2, 3], [2, 6], [5, 6], [5, 3]];
/// assert_eq!(bounding_rect(&points), Some([2, 3, 4, 4]));
/// ```
pub fn bounding_rect(points: &[[u32; 2]]) -> Option<[u32; 4]> {
    let &[fx, fy] = points.first()?;

    let mut min_x = fx;
    let mut min_y = fy;
    let mut max_x = fx;
    let mut max_y = fy;

    for &[x, y] in points.iter().skip(1) {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    Some([min_x, min_y, max_x - min_x + 1, max_y - min_y + 1])
}

/// Area enclosed by a closed polygon using the shoelace formula
///
/// Vertices are treated as pixel centres, so a filled w x h rectangle of
/// pixels has area (w - 1) * (h - 1).
///
/// # Examples
///
/// ```
/// use treecoco_core::cv::points::polygon_area;
///
/// let points = [[2, 3], [2, 6], [5, 6], [5, 3]];
/// assert_eq!(polygon_area(&points), 9.0);
/// ```
pub fn polygon_area(points: &[[u32; 2]]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area: i64 = 0;
    for i in 0..n {
        let p1 = points[i];
        let p2 = points[(i + 1) % n];
        area += p1[0] as i64 * p2[1] as i64 - p2[0] as i64 * p1[1] as i64;
    }

    area.abs() as f64 / 2.0
}

/// Flatten points into an [x0, y0, x1, y1, ...] sequence
pub fn flatten_points(points: &[[u32; 2]]) -> Vec<u32> {
    points.iter().flat_map(|&[x, y]| [x, y]).collect()
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_bounding_rect_single_point() {
        assert_eq!(bounding_rect(&[[7, 1]]), Some([7, 1, 1, 1]));
        assert_eq!(bounding_rect(&[]), None);
    }

    #[test]
    fn test_polygon_area_orientation() {
        let clockwise = [[0, 0], [4, 0], [4, 2], [0, 2]];
        let counter = [[0, 0], [0, 2], [4, 2], [4, 0]];

        assert_eq!(polygon_area(&clockwise), 8.0);
        assert_eq!(polygon_area(&counter), 8.0);
    }

    #[test]
    fn test_polygon_area_degenerate() {
        assert_eq!(polygon_area(&[[0, 2], [2, 2]]), 0.0);
        assert_eq!(polygon_area(&[[0, 2], [1, 2], [2, 2], [1, 2]]), 0.0);
    }

    #[test]
    fn test_flatten_points() {
        assert_eq!(flatten_points(&[[1, 2], [3, 4]]), vec![1, 2, 3, 4]);
    }
}
