#![warn(missing_docs)]
//! This crate contains the DICOM transfer syntax registry.
//! The transfer syntax registry maps a DICOM UID of a transfer syntax into the
//! respective transfer syntax specifier.
//!
//! It also hosts the pixel data adapters implemented natively by this project,
//! see the [`adapters`] module.
//!
//! # Example
//!
//! ```
//! use dicom_lite_encoding::PixelCodec;
//! use dicom_lite_transfer_syntax_registry::get_registry;
//!
//! let ts = get_registry()
//!     .get("1.2.840.10008.1.2.4.70\0")
//!     .expect("JPEG lossless should be registered");
//! assert_eq!(ts.pixel_codec(), PixelCodec::JpegLossless);
//! ```

pub mod adapters;
pub mod entries;

use dicom_lite_encoding::TransferSyntax;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// Data type for a registry of DICOM transfer syntaxes.
pub struct TransferSyntaxRegistry {
    m: HashMap<&'static str, TransferSyntax>,
}

impl fmt::Debug for TransferSyntaxRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let entries: HashMap<&str, &str> =
            self.m.iter().map(|(uid, ts)| (*uid, ts.name())).collect();
        f.debug_struct("TransferSyntaxRegistry")
            .field("m", &entries)
            .finish()
    }
}

impl TransferSyntaxRegistry {
    /// Obtain a transfer syntax descriptor by UID.
    ///
    /// UIDs read from a file may carry a trailing null or space
    /// character as padding, which is ignored here.
    pub fn get<U: AsRef<str>>(&self, uid: U) -> Option<&TransferSyntax> {
        let ts_uid = uid
            .as_ref()
            .trim_end_matches(|c: char| c == '\0' || c == ' ');
        self.m.get(ts_uid)
    }

    /// Iterate over all registered transfer syntaxes, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TransferSyntax> {
        self.m.values()
    }

    /// The number of registered transfer syntaxes.
    pub fn len(&self) -> usize {
        self.m.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.m.is_empty()
    }

    fn register(&mut self, ts: TransferSyntax) {
        self.m.insert(ts.uid(), ts);
    }
}

lazy_static! {
    static ref REGISTRY: TransferSyntaxRegistry = {
        let mut registry = TransferSyntaxRegistry { m: HashMap::new() };
        initialize_codecs(&mut registry);
        registry
    };
}

/// Retrieve the default transfer syntax.
pub fn default() -> TransferSyntax {
    entries::IMPLICIT_VR_LITTLE_ENDIAN
}

/// Retrieve the global transfer syntax registry.
pub fn get_registry() -> &'static TransferSyntaxRegistry {
    &REGISTRY
}

/// Obtain a transfer syntax descriptor by UID
/// from the global registry.
pub fn get<U: AsRef<str>>(uid: U) -> Option<&'static TransferSyntax> {
    get_registry().get(uid)
}

/// Obtain the transfer syntax descriptor for the given UID,
/// or the [`UNKNOWN`](entries::UNKNOWN) descriptor if the UID is not registered.
///
/// Files with an unrecognized transfer syntax can still be read
/// on the assumption of explicit VR little endian,
/// but their pixel data cannot be decoded.
pub fn resolve<U: AsRef<str>>(uid: U) -> &'static TransferSyntax {
    let uid = uid.as_ref();
    get(uid).unwrap_or_else(|| {
        warn!(
            "Unrecognized transfer syntax {:?}, assuming explicit VR little endian",
            uid.trim_end_matches('\0')
        );
        &entries::UNKNOWN
    })
}

fn initialize_codecs(registry: &mut TransferSyntaxRegistry) {
    use crate::entries::*;

    // the three base transfer syntaxes, fully supported
    registry.register(IMPLICIT_VR_LITTLE_ENDIAN);
    registry.register(EXPLICIT_VR_LITTLE_ENDIAN);
    registry.register(EXPLICIT_VR_BIG_ENDIAN);

    // known, but the data set cannot be inflated
    registry.register(DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN);

    // natively decoded pixel data
    registry.register(JPEG_LOSSLESS_NON_HIERARCHICAL);
    registry.register(JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION);

    // stub transfer syntaxes, only partially supported due
    // to pixel data encapsulation
    registry.register(JPEG_BASELINE);
    registry.register(JPEG_EXTENDED);
    registry.register(JPEG_LS_LOSSLESS_IMAGE_COMPRESSION);
    registry.register(JPEG_LS_LOSSY_IMAGE_COMPRESSION);
    registry.register(JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY);
    registry.register(JPEG_2000_IMAGE_COMPRESSION);
    registry.register(RLE_LOSSLESS);
}
