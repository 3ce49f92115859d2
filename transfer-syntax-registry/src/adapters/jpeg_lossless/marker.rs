//! JPEG marker codes, the second byte of each `0xFF xx` marker.

/// Start of image
pub const SOI: u8 = 0xD8;
/// End of image
pub const EOI: u8 = 0xD9;
/// Start of frame, lossless process (Huffman, sequential)
pub const SOF3: u8 = 0xC3;
/// Define Huffman tables
pub const DHT: u8 = 0xC4;
/// Define arithmetic coding conditioning
pub const DAC: u8 = 0xCC;
/// Start of scan
pub const SOS: u8 = 0xDA;
/// Define quantization tables
pub const DQT: u8 = 0xDB;
/// Define number of lines
pub const DNL: u8 = 0xDC;
/// Define restart interval
pub const DRI: u8 = 0xDD;
/// Comment
pub const COM: u8 = 0xFE;

/// Whether the marker is one of the restart markers `RST0` to `RST7`.
#[inline]
pub fn is_rst(marker: u8) -> bool {
    (0xD0..=0xD7).contains(&marker)
}

/// Whether the marker is an application segment `APP0` to `APP15`.
#[inline]
pub fn is_app(marker: u8) -> bool {
    (0xE0..=0xEF).contains(&marker)
}

/// Whether the marker starts a frame of any coding process.
#[inline]
pub fn is_sof(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && marker != DHT && marker != 0xC8 && marker != DAC
}
