// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::slice::ChunksExact;

use crate::error::TreeCocoError;

/// A row-major container storing a grid of pixels.
///
/// The struct is generic over the subpixel type `T`. The length of the
/// container must be equal to the product of `w` * `h` * `c`.
///
/// # Examples
///
/// ```
/// use treecoco_core::im::PixelBuffer;
///
/// let width = 10;
/// let height = 10;
/// let channels = 4; // RGBA
/// let data = vec![0u8; (width * height * channels) as usize];
///
/// let buffer = PixelBuffer::new(width, height, channels, data);
///
/// assert_eq!(buffer.unwrap().len(), (width * height * channels) as usize);
/// ```
///
/// ```
/// use treecoco_core::im::PixelBuffer;
///
/// let data = vec![0u8; 7];
/// let buffer = PixelBuffer::new(2, 2, 4, data);
///
/// assert!(buffer.is_err()); // Buffer size does not match dimensions
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer<T> {
    w: u32,             // Width
    h: u32,             // Height
    c: u32,             // Channels
    pub buffer: Vec<T>, // Subpixels
}

impl<T> PixelBuffer<T> {
    /// Initializes a buffer from a vector of subpixels
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Number of image channels (e.g. 4 for RGBA)
    /// * `buffer` - Row-major subpixels
    pub fn new(
        width: u32,
        height: u32,
        channels: u32,
        buffer: Vec<T>,
    ) -> Result<PixelBuffer<T>, TreeCocoError> {
        if (width as usize) * (height as usize) * (channels as usize) == buffer.len() {
            Ok(PixelBuffer {
                w: width,
                h: height,
                c: channels,
                buffer,
            })
        } else {
            Err(TreeCocoError::BufferSizeError)
        }
    }
}

impl<T: Copy> PixelBuffer<T> {
    /// Initializes a buffer with every pixel set to the same subpixels
    ///
    /// The number of channels is the length of `pixel`.
    pub fn from_pixel(width: u32, height: u32, pixel: &[T]) -> PixelBuffer<T> {
        let n = width as usize * height as usize;

        PixelBuffer {
            w: width,
            h: height,
            c: pixel.len() as u32,
            buffer: pixel.iter().copied().cycle().take(n * pixel.len()).collect(),
        }
    }

    /// Map every pixel to a single subpixel of a new one channel buffer
    pub fn map_pixels<U, F>(&self, f: F) -> PixelBuffer<U>
    where
        F: Fn(&[T]) -> U,
    {
        PixelBuffer {
            w: self.w,
            h: self.h,
            c: 1,
            buffer: self.iter_pixels().map(f).collect(),
        }
    }
}

// >>> PROPERTY METHODS

impl<T> PixelBuffer<T> {
    /// Width of the image
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the image
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Width, height, and channels of the image
    pub fn shape(&self) -> (u32, u32, u32) {
        (self.w, self.h, self.c)
    }

    /// Number of pixels (not subpixels) in the image
    pub fn n_pixels(&self) -> usize {
        self.w as usize * self.h as usize
    }

    /// Number of subpixels in the image
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer holds no data
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

// <<< PROPERTY METHODS

// >>> CONVERSION METHODS

impl<T> PixelBuffer<T> {
    /// Return a reference to the underlying subpixels
    pub fn as_raw(&self) -> &[T] {
        &self.buffer
    }

    /// Iterate over pixels as channel-length slices
    pub fn iter_pixels(&self) -> ChunksExact<'_, T> {
        self.buffer.chunks_exact(self.c as usize)
    }

    /// Return the subpixels of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[T]> {
        if x >= self.w || y >= self.h {
            return None;
        }

        let c = self.c as usize;
        let start = (y as usize * self.w as usize + x as usize) * c;
        Some(&self.buffer[start..start + c])
    }
}

// <<< CONVERSION METHODS

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_buffer_shape() {
        let buffer = PixelBuffer::new(3, 2, 4, vec![0u8; 24]).unwrap();

        assert_eq!(buffer.shape(), (3, 2, 4));
        assert_eq!(buffer.n_pixels(), 6);
        assert_eq!(buffer.iter_pixels().count(), 6);
    }

    #[test]
    fn test_buffer_size_mismatch() {
        let buffer = PixelBuffer::new(3, 2, 1, vec![0u32; 5]);
        assert_eq!(buffer, Err(TreeCocoError::BufferSizeError));
    }

    #[test]
    fn test_buffer_pixel() {
        let data: Vec<u8> = (0..8).collect();
        let buffer = PixelBuffer::new(2, 1, 4, data).unwrap();

        assert_eq!(buffer.pixel(1, 0), Some(&[4u8, 5, 6, 7][..]));
        assert_eq!(buffer.pixel(2, 0), None);
    }
}
