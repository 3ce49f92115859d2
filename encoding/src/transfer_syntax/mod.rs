//! Module containing the DICOM Transfer Syntax data structure and related methods.
//!
//! The `TransferSyntax` describes everything which is needed
//! to decode a data set in a certain transfer syntax:
//! the byte order, whether value representations are explicit,
//! and how the pixel data is encoded.
//!
//! This crate does not host specific transfer syntaxes. Instead, they are
//! declared in the `dicom-lite-transfer-syntax-registry` crate.

use crate::decode::explicit_vr::ExplicitVRDecoder;
use crate::decode::implicit_le::ImplicitVRLittleEndianDecoder;
use crate::decode::DynDecoder;
use byteordered::Endianness;

/// The encoding scheme of the pixel data in a transfer syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelCodec {
    /// Native pixel data: the samples are stored as is.
    None,
    /// Encapsulated pixel data compressed with
    /// the lossless process of the JPEG standard (SOF3).
    JpegLossless,
    /// Encapsulated pixel data in any other encoding,
    /// which is not decoded by this library.
    Other,
}

impl PixelCodec {
    /// Whether pixel data in this encoding is encapsulated
    /// in a sequence of fragments.
    pub fn is_encapsulated(self) -> bool {
        !matches!(self, PixelCodec::None)
    }
}

/// A DICOM transfer syntax specifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferSyntax {
    /// The unique identifier of the transfer syntax.
    uid: &'static str,
    /// The name of the transfer syntax.
    name: &'static str,
    /// The byte order of data.
    byte_order: Endianness,
    /// Whether the transfer syntax mandates an explicit value representation,
    /// or the VR is implicit.
    explicit_vr: bool,
    /// Whether the data set after the file meta group is deflated.
    deflated: bool,
    /// How the pixel data is encoded.
    pixel_codec: PixelCodec,
}

impl TransferSyntax {
    /// Create a new transfer syntax descriptor.
    ///
    /// Note that only transfer syntax implementors are expected to construct
    /// TS descriptors from scratch. For a practical usage of transfer
    /// syntaxes, one should look up an existing transfer syntax registry by
    /// UID.
    ///
    /// # Example
    ///
    /// To register a private transfer syntax in your program,
    /// declare it as a constant:
    ///
    /// ```
    /// # use dicom_lite_encoding::{Endianness, PixelCodec, TransferSyntax};
    /// const ORIG_EXPLICIT_VR_LE: TransferSyntax = TransferSyntax::new(
    ///     "1.2.840.10008.9999.9999.1",
    ///     "Private Explicit VR Little Endian",
    ///     Endianness::Little,
    ///     true,
    ///     PixelCodec::None,
    /// );
    /// assert!(!ORIG_EXPLICIT_VR_LE.is_big_endian());
    /// ```
    pub const fn new(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
        pixel_codec: PixelCodec,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            deflated: false,
            pixel_codec,
        }
    }

    /// Create a new descriptor for a transfer syntax
    /// whose data set is compressed with DEFLATE.
    pub const fn new_deflated(
        uid: &'static str,
        name: &'static str,
        byte_order: Endianness,
        explicit_vr: bool,
    ) -> Self {
        TransferSyntax {
            uid,
            name,
            byte_order,
            explicit_vr,
            deflated: true,
            pixel_codec: PixelCodec::None,
        }
    }

    /// Obtain this transfer syntax' unique identifier.
    pub const fn uid(&self) -> &'static str {
        self.uid
    }

    /// Obtain the name of this transfer syntax.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Obtain this transfer syntax' expected endianness.
    pub const fn endianness(&self) -> Endianness {
        self.byte_order
    }

    /// Whether numbers are encoded in big endian.
    pub fn is_big_endian(&self) -> bool {
        self.byte_order == Endianness::Big
    }

    /// Check whether this transfer syntax uses explicit value representations.
    pub const fn explicit_vr(&self) -> bool {
        self.explicit_vr
    }

    /// Check whether the data set is compressed as a whole.
    /// Such data sets cannot be read by this library.
    pub const fn is_deflated(&self) -> bool {
        self.deflated
    }

    /// Obtain the pixel data encoding of this transfer syntax.
    pub const fn pixel_codec(&self) -> PixelCodec {
        self.pixel_codec
    }

    /// Check whether pixel data is encapsulated in this transfer syntax.
    pub fn is_encapsulated_pixel_data(&self) -> bool {
        self.pixel_codec.is_encapsulated()
    }

    /// Retrieve the appropriate data element decoder for this transfer syntax.
    ///
    /// Implicit VR is only defined in little endian,
    /// so an implicit VR descriptor always yields a little endian decoder.
    pub fn decoder(&self) -> DynDecoder {
        if self.explicit_vr {
            DynDecoder::Explicit(ExplicitVRDecoder::new(self.byte_order))
        } else {
            DynDecoder::ImplicitLittleEndian(ImplicitVRLittleEndianDecoder::with_std_dict())
        }
    }
}
