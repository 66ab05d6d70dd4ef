// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use image::{RgbaImage, open as open_dynamic};

use crate::constant;
use crate::cv::find_external_contours;
use crate::error::TreeCocoError;
use crate::im::PixelBuffer;

/// A row-major RGBA container storing a painted segmentation mask
///
/// Every pixel holds four u8 subpixels. A pixel is background when its
/// red, green, and blue subpixels are all zero; alpha is never inspected.
///
/// # Examples
///
/// ```
/// use treecoco_core::im::RgbaMask;
///
/// let mask = RgbaMask::filled(4, 3, [0, 0, 0, 255]);
///
/// assert_eq!(mask.len(), 4 * 3 * 4);
/// assert_eq!(mask.black_pixels(), 12);
/// ```
pub type RgbaMask = PixelBuffer<u8>;

/// A row-major single channel mask where non-zero pixels are foreground
pub type BinaryMask = PixelBuffer<u32>;

#[inline]
fn is_black(pixel: &[u8]) -> bool {
    pixel[0] == 0 && pixel[1] == 0 && pixel[2] == 0
}

// >>> I/O METHODS

impl RgbaMask {
    /// Open a mask from a provided path and convert it to RGBA
    ///
    /// # Arguments
    ///
    /// * `path` - A path to an image with a valid extension
    ///
    /// ```no_run
    /// use treecoco_core::im::RgbaMask;
    /// let mask = RgbaMask::open("SingleTrees/12_Forest_Map_A_B_Tree3.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<RgbaMask, TreeCocoError> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        match extension {
            Some(ext) if constant::SUPPORTED_IMAGE_FORMATS.contains(&ext.as_str()) => {
                let image = open_dynamic(path)
                    .map_err(|_| TreeCocoError::ImageReadError(path.display().to_string()))?
                    .to_rgba8();

                let (width, height) = image.dimensions();
                RgbaMask::new(width, height, 4, image.into_raw())
            }
            _ => Err(TreeCocoError::ImageExtensionError),
        }
    }

    /// Save the mask as an RGBA image at the provided path
    ///
    /// # Arguments
    ///
    /// * `path` - Output path; format is inferred from the extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TreeCocoError> {
        let path = path.as_ref();

        RgbaImage::from_raw(self.width(), self.height(), self.as_raw().to_vec())
            .ok_or(TreeCocoError::BufferSizeError)?
            .save(path)
            .map_err(|_| TreeCocoError::ImageWriteError(path.display().to_string()))
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl RgbaMask {
    /// Initialize a mask with every pixel set to a single colour
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> RgbaMask {
        PixelBuffer::from_pixel(width, height, &rgba)
    }

    /// Number of pixels whose red, green, and blue values are all zero
    pub fn black_pixels(&self) -> u64 {
        self.iter_pixels().filter(|p| is_black(p)).count() as u64
    }

    /// Fraction of black pixels relative to an expected pixel count
    ///
    /// # Arguments
    ///
    /// * `total_pixels` - Expected number of pixels in a dataset image
    ///
    /// # Examples
    ///
    /// ```
    /// use treecoco_core::im::RgbaMask;
    ///
    /// let mask = RgbaMask::filled(2, 2, [0, 0, 0, 255]);
    /// assert_eq!(mask.black_fraction(8), 0.5);
    /// ```
    pub fn black_fraction(&self, total_pixels: u64) -> f64 {
        self.black_pixels() as f64 / total_pixels as f64
    }
}

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl RgbaMask {
    /// Paint every non-black pixel of `other` over this mask
    ///
    /// Pixels of `other` outside of this mask's extent are ignored. Painted
    /// pixels replace all four subpixels so later calls win over earlier ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use treecoco_core::im::RgbaMask;
    ///
    /// let mut combined = RgbaMask::filled(1, 1, [0, 0, 0, 255]);
    /// combined.paint_over(&RgbaMask::filled(1, 1, [255, 0, 0, 255]));
    /// combined.paint_over(&RgbaMask::filled(1, 1, [0, 0, 255, 255]));
    ///
    /// assert_eq!(combined.as_raw(), &[0, 0, 255, 255]);
    /// ```
    pub fn paint_over(&mut self, other: &RgbaMask) {
        let width = self.width().min(other.width()) as usize;
        let height = self.height().min(other.height()) as usize;
        let self_w = self.width() as usize;
        let other_w = other.width() as usize;

        for y in 0..height {
            for x in 0..width {
                let src = (y * other_w + x) * 4;
                let pixel = &other.buffer[src..src + 4];

                if !is_black(pixel) {
                    let dst = (y * self_w + x) * 4;
                    self.buffer[dst..dst + 4].copy_from_slice(pixel);
                }
            }
        }
    }

    /// Recolour every pixel with any channel above `noise` to `rgb`
    ///
    /// Pixels whose red, green, and blue values are all at or below the
    /// noise threshold are left untouched.
    pub fn recolor_foreground(&mut self, noise: u8, rgb: [u8; 3]) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            if pixel[..3].iter().any(|&v| v > noise) {
                pixel[..3].copy_from_slice(&rgb);
            }
        }
    }

    /// Binary mask of the pixels whose colour is exactly `rgb`
    pub fn select_color(&self, rgb: [u8; 3]) -> BinaryMask {
        self.map_pixels(|p| if p[..3] == rgb { 1u32 } else { 0u32 })
    }
}

// <<< TRANSFORM METHODS

impl BinaryMask {
    /// Outer contours of every top-level foreground region
    pub fn external_contours(&self) -> Vec<Vec<[u32; 2]>> {
        find_external_contours(self.width(), self.height(), self.as_raw())
    }
}
