mod buffer;
mod mask;

pub use buffer::PixelBuffer;
pub use mask::{BinaryMask, RgbaMask};
