// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::VecDeque;

/// Find all borders of a binary mask using 8-connectivity
///
/// Every non-zero pixel is foreground. Borders are returned in raster order
/// of their starting pixel together with their type and the index of the
/// enclosing border (`None` when the border lies directly on the background).
///
/// # Arguments
///
/// * `width` - Width of mask
/// * `height` - Height of mask
/// * `pixels` - A row-major mask buffer
///
/// # References
///
/// Suzuki, S. and Abe, K. Topological structural analysis of digitized
/// binary images by border following. CVGIP 30 (1985).
///
/// Adapted/modified from: https://github.com/image-rs/imageproc
pub fn find_contours(width: u32, height: u32, pixels: &[u32]) -> Vec<Contour> {
    let width = width as usize;
    let height = height as usize;
    let padded_width = width + 2;
    let padded_height = height + 2;

    let at = |x: usize, y: usize| x + padded_width * y;

    let mut image_values = vec![0i32; padded_height * padded_width];

    for y in 0..height {
        for x in 0..width {
            if pixels[y * width + x] != 0 {
                image_values[at(x + 1, y + 1)] = 1;
            }
        }
    }

    let mut diffs = VecDeque::from(vec![
        [-1, 0],  // West
        [-1, -1], // Northwest
        [0, -1],  // North
        [1, -1],  // Northeast
        [1, 0],   // East
        [1, 1],   // Southeast
        [0, 1],   // South
        [-1, 1],  // Southwest
    ]);

    let mut contours: Vec<Contour> = Vec::new();
    let mut border_num: i32 = 1;

    for y in 1..=height {
        // The frame of the image counts as border 1
        let mut last_border_num: i32 = 1;

        for x in 1..=width {
            let value = image_values[at(x, y)];
            if value == 0 {
                continue;
            }

            let start = if value == 1 && image_values[at(x - 1, y)] == 0 {
                Some((BorderType::Outer, [x as i32 - 1, y as i32]))
            } else if value >= 1 && image_values[at(x + 1, y)] == 0 {
                if value > 1 {
                    last_border_num = value;
                }
                Some((BorderType::Hole, [x as i32 + 1, y as i32]))
            } else {
                None
            };

            if let Some((border_type, adjacent)) = start {
                border_num += 1;

                let parent = parent_index(&contours, border_type, last_border_num);
                let points = follow_border(
                    &mut image_values,
                    padded_width,
                    &mut diffs,
                    [x as i32, y as i32],
                    adjacent,
                    border_num,
                );

                contours.push(Contour::new(points, border_type, parent));
            }

            let value = image_values[at(x, y)];
            if value != 1 {
                last_border_num = value.abs();
            }
        }
    }

    contours
}

/// Find the outer contours of top-level foreground regions
///
/// Holes, and regions nested inside holes of other regions, are not
/// reported. Points are pixel coordinates in tracing order.
///
/// # Examples
///
/// ```
/// use treecoco_core::cv::find_external_contours;
///
/// let buffer: Vec<u32> = vec![1, 1, 0, 1, 1, 0, 0, 0, 0];
/// let contours = find_external_contours(3, 3, &buffer);
///
/// assert_eq!(contours, [[[0, 0], [0, 1], [1, 1], [1, 0]]]);
/// ```
pub fn find_external_contours(width: u32, height: u32, pixels: &[u32]) -> Vec<Vec<[u32; 2]>> {
    find_contours(width, height, pixels)
        .into_iter()
        .filter(|contour| contour.border_type() == &BorderType::Outer && contour.parent().is_none())
        .map(|contour| contour.into_points())
        .collect()
}

/// Drop contour points lying inside straight runs
///
/// A point is kept when the step entering it differs from the step leaving
/// it, treating the contour as closed. Contours with fewer than three points
/// are returned unchanged.
///
/// # Examples
///
/// ```
/// use treecoco_core::cv::compress_contour;
///
/// let square = [[0, 0], [0, 1], [0, 2], [1, 2], [2, 2], [2, 1], [2, 0], [1, 0]];
/// assert_eq!(compress_contour(&square), [[0, 0], [0, 2], [2, 2], [2, 0]]);
/// ```
pub fn compress_contour(points: &[[u32; 2]]) -> Vec<[u32; 2]> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let step = |a: [u32; 2], b: [u32; 2]| [b[0] as i64 - a[0] as i64, b[1] as i64 - a[1] as i64];

    (0..n)
        .filter(|&i| {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            step(prev, points[i]) != step(points[i], next)
        })
        .map(|i| points[i])
        .collect()
}

///  Contour for storing outlines of segmented objects
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<[u32; 2]>,
    border_type: BorderType,
    parent: Option<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BorderType {
    Outer,
    Hole,
}

impl Contour {
    pub fn new(points: Vec<[u32; 2]>, border_type: BorderType, parent: Option<usize>) -> Self {
        Contour {
            points,
            border_type,
            parent,
        }
    }

    pub fn into_points(self) -> Vec<[u32; 2]> {
        self.points
    }

    pub fn border_type(&self) -> &BorderType {
        &self.border_type
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }
}

// Border 1 is the image frame, which behaves like a hole with no parent
fn parent_index(contours: &[Contour], border_type: BorderType, last_border_num: i32) -> Option<usize> {
    if last_border_num < 2 {
        return None;
    }

    let index = (last_border_num - 2) as usize;
    let last = &contours[index];

    if last.border_type != border_type {
        Some(index)
    } else {
        last.parent
    }
}

fn follow_border(
    image_values: &mut [i32],
    padded_width: usize,
    diffs: &mut VecDeque<[i32; 2]>,
    curr: [i32; 2],
    adjacent: [i32; 2],
    border_num: i32,
) -> Vec<[u32; 2]> {
    let at = |p: [i32; 2]| p[0] as usize + padded_width * p[1] as usize;
    let step = |p: [i32; 2], d: [i32; 2]| [p[0] + d[0], p[1] + d[1]];
    let unpad = |p: [i32; 2]| [(p[0] - 1) as u32, (p[1] - 1) as u32];

    let mut points = Vec::new();

    rotate_to_value(diffs, [adjacent[0] - curr[0], adjacent[1] - curr[1]]);

    let first = diffs
        .iter()
        .map(|&diff| step(curr, diff))
        .find(|&p| image_values[at(p)] != 0);

    let Some(first) = first else {
        points.push(unpad(curr));
        image_values[at(curr)] = -border_num;
        return points;
    };

    let mut prev = first;
    let mut pos = curr;

    loop {
        points.push(unpad(pos));
        rotate_to_value(diffs, [prev[0] - pos[0], prev[1] - pos[1]]);

        let next = diffs
            .iter()
            .rev()
            .map(|&diff| step(pos, diff))
            .find(|&p| image_values[at(p)] != 0)
            .unwrap_or(prev);

        // East neighbour was examined as background before reaching `next`
        let mut is_right_edge = false;
        for &diff in diffs.iter().rev() {
            if diff == [next[0] - pos[0], next[1] - pos[1]] {
                break;
            }
            if diff == [1, 0] {
                is_right_edge = true;
                break;
            }
        }

        if is_right_edge {
            image_values[at(pos)] = -border_num;
        } else if image_values[at(pos)] == 1 {
            image_values[at(pos)] = border_num;
        }

        if next == curr && pos == first {
            break;
        }

        prev = pos;
        pos = next;
    }

    points
}

fn rotate_to_value(values: &mut VecDeque<[i32; 2]>, value: [i32; 2]) {
    if let Some(pos) = values.iter().position(|&v| v == value) {
        values.rotate_left(pos);
    }
}
