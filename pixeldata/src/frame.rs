//! The decoded image frame type.

use dicom_lite_transfer_syntax_registry::adapters::jpeg_lossless::DecodedFrame;

/// A single decoded frame of pixel data.
///
/// Samples are unsigned, stored row by row,
/// with the samples of each pixel next to each other.
/// Signed pixel data keeps its two's complement bit pattern
/// within the lower `bit_depth` bits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageFrame {
    /// number of columns
    pub width: u32,
    /// number of rows
    pub height: u32,
    /// number of significant bits per sample: 8, 12 or 16
    pub bit_depth: u8,
    /// number of samples per pixel
    pub samples_per_pixel: u32,
    /// the samples of the frame
    pub pixels: Vec<u16>,
}

impl ImageFrame {
    /// The number of samples which the frame's dimensions call for.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.samples_per_pixel as usize
    }

    /// The greatest sample value allowed by the bit depth.
    pub fn max_value(&self) -> u16 {
        match self.bit_depth {
            0 => 0,
            d if d >= 16 => u16::MAX,
            d => (1 << d) - 1,
        }
    }

    /// Check whether the frame holds as many samples as its dimensions say,
    /// all of them within the range of its bit depth.
    pub fn is_valid(&self) -> bool {
        matches!(self.bit_depth, 8 | 12 | 16)
            && self.width > 0
            && self.height > 0
            && self.samples_per_pixel > 0
            && self.pixels.len() == self.expected_len()
            && self.pixels.iter().all(|&p| p <= self.max_value())
    }

    /// Obtain the smallest and greatest sample values,
    /// or `None` if the frame is empty.
    pub fn min_max(&self) -> Option<(u16, u16)> {
        self.pixels.iter().fold(None, |acc, &p| match acc {
            None => Some((p, p)),
            Some((min, max)) => Some((min.min(p), max.max(p))),
        })
    }
}

impl From<DecodedFrame> for ImageFrame {
    fn from(frame: DecodedFrame) -> Self {
        ImageFrame {
            width: frame.width,
            height: frame.height,
            bit_depth: frame.precision,
            samples_per_pixel: frame.samples_per_pixel,
            pixels: frame.samples,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(bit_depth: u8, pixels: Vec<u16>) -> ImageFrame {
        ImageFrame {
            width: 2,
            height: 2,
            bit_depth,
            samples_per_pixel: 1,
            pixels,
        }
    }

    #[test]
    fn validates_pixel_count_and_range() {
        assert!(frame(12, vec![0, 1, 4095, 7]).is_valid());
        // too few samples
        assert!(!frame(12, vec![0, 1, 4095]).is_valid());
        // out of range
        assert!(!frame(12, vec![0, 1, 4096, 7]).is_valid());
        // bit depth not supported
        assert!(!frame(10, vec![0, 1, 2, 3]).is_valid());
        assert!(frame(16, vec![0, 1, 65535, 7]).is_valid());
    }

    #[test]
    fn min_max_of_samples() {
        assert_eq!(frame(8, vec![9, 3, 200, 7]).min_max(), Some((3, 200)));
        assert_eq!(frame(8, vec![]).min_max(), None);
    }
}
