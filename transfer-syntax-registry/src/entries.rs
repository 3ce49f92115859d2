//! A list of compiled transfer syntax specifiers.
//!
//! The constants exported here refer to the library's built-in support
//! for DICOM transfer syntaxes.
//!
//! - **Fully implemented** means that data sets can be read
//!   and the pixel data can be decoded, if applicable.
//! - **Stub descriptors** serve to provide information about
//!   the transfer syntax.
//!   The data set can be read,
//!   but the encapsulated pixel data cannot be decoded.

use dicom_lite_encoding::{Endianness, PixelCodec, TransferSyntax as Ts};

// -- the three base transfer syntaxes, fully implemented --

/// **Fully implemented:** Implicit VR Little Endian: Default Transfer Syntax for DICOM
pub const IMPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2",
    "Implicit VR Little Endian",
    Endianness::Little,
    false,
    PixelCodec::None,
);

/// **Fully implemented:** Explicit VR Little Endian
pub const EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2.1",
    "Explicit VR Little Endian",
    Endianness::Little,
    true,
    PixelCodec::None,
);

/// **Fully implemented:** Explicit VR Big Endian
pub const EXPLICIT_VR_BIG_ENDIAN: Ts = Ts::new(
    "1.2.840.10008.1.2.2",
    "Explicit VR Big Endian",
    Endianness::Big,
    true,
    PixelCodec::None,
);

// -- data set compression --

/// **Stub descriptor:** Deflated Explicit VR Little Endian
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: Ts = Ts::new_deflated(
    "1.2.840.10008.1.2.1.99",
    "Deflated Explicit VR Little Endian",
    Endianness::Little,
    true,
);

// -- JPEG lossless, fully implemented by the native decoder --

/// **Fully implemented:** JPEG Lossless, Non-Hierarchical (Process 14)
pub const JPEG_LOSSLESS_NON_HIERARCHICAL: Ts = Ts::new(
    "1.2.840.10008.1.2.4.57",
    "JPEG Lossless, Non-Hierarchical (Process 14)",
    Endianness::Little,
    true,
    PixelCodec::JpegLossless,
);

/// **Fully implemented:** JPEG Lossless, Non-Hierarchical, First-Order Prediction
/// (Process 14 [Selection Value 1]):
/// Default Transfer Syntax for Lossless JPEG Image Compression
pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: Ts = Ts::new(
    "1.2.840.10008.1.2.4.70",
    "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    Endianness::Little,
    true,
    PixelCodec::JpegLossless,
);

// -- other encapsulated pixel data, stubs --

/// create a TS with an unsupported pixel encapsulation
pub(crate) const fn create_ts_stub(uid: &'static str, name: &'static str) -> Ts {
    Ts::new(uid, name, Endianness::Little, true, PixelCodec::Other)
}

/// **Stub descriptor:** JPEG Baseline (Process 1):
/// Default Transfer Syntax for Lossy JPEG 8-bit Image Compression
pub const JPEG_BASELINE: Ts = create_ts_stub("1.2.840.10008.1.2.4.50", "JPEG Baseline (Process 1)");

/// **Stub descriptor:** JPEG Extended (Process 2 & 4):
/// Default Transfer Syntax for Lossy JPEG 12-bit Image Compression
/// (Process 4 only)
pub const JPEG_EXTENDED: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.51",
    "JPEG Extended (Process 2 & 4)",
);

/// **Stub descriptor:** JPEG-LS Lossless Image Compression
pub const JPEG_LS_LOSSLESS_IMAGE_COMPRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.80",
    "JPEG-LS Lossless Image Compression",
);

/// **Stub descriptor:** JPEG-LS Lossy (Near-Lossless) Image Compression
pub const JPEG_LS_LOSSY_IMAGE_COMPRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.81",
    "JPEG-LS Lossy (Near-Lossless) Image Compression",
);

/// **Stub descriptor:** JPEG 2000 Image Compression (Lossless Only)
pub const JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.90",
    "JPEG 2000 Image Compression (Lossless Only)",
);

/// **Stub descriptor:** JPEG 2000 Image Compression
pub const JPEG_2000_IMAGE_COMPRESSION: Ts = create_ts_stub(
    "1.2.840.10008.1.2.4.91",
    "JPEG 2000 Image Compression",
);

/// **Stub descriptor:** RLE Lossless
pub const RLE_LOSSLESS: Ts = create_ts_stub("1.2.840.10008.1.2.5", "RLE Lossless");

/// The descriptor assumed for transfer syntaxes missing from the registry:
/// explicit VR little endian, with pixel data which cannot be decoded.
pub const UNKNOWN: Ts = create_ts_stub("", "Unknown Transfer Syntax");
