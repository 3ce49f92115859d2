//! This module contains all DICOM data element header decoding logic.

use self::explicit_vr::ExplicitVRDecoder;
use self::implicit_le::StandardImplicitVRLittleEndianDecoder;
use crate::cursor::{self, ByteCursor};
use byteordered::Endianness;
use dicom_lite_core::header::{DataElementHeader, Length, SequenceItemHeader, SequenceItemHeaderError};
use snafu::{ResultExt, Snafu};

pub mod explicit_vr;
pub mod implicit_le;

/// Module-level error type:
/// for errors which may occur while decoding DICOM data.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Failed to read the beginning (tag) of the header"))]
    ReadHeaderTag {
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    #[snafu(display("Failed to read the item header"))]
    ReadItemHeader {
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    #[snafu(display("Failed to read the header's reserved bytes"))]
    ReadReserved {
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    #[snafu(display("Failed to read the header's element length field"))]
    ReadLength {
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    #[snafu(display("Failed to read the header's value representation"))]
    ReadVr {
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    #[snafu(display("Bad sequence item header"))]
    BadSequenceHeader {
        #[snafu(backtrace)]
        source: SequenceItemHeaderError,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Obtain a data element decoder for reading the data elements in a DICOM
/// file's Meta information. According to the standard, these are always
/// encoded in Explicit VR Little Endian.
pub fn file_header_decoder() -> ExplicitVRDecoder {
    ExplicitVRDecoder::new(Endianness::Little)
}

/// Type trait for reading and decoding DICOM data element headers
/// from a byte cursor.
///
/// This trait is object safe.
pub trait Decode {
    /// The byte order of the data read by this decoder.
    fn endianness(&self) -> Endianness;

    /// Fetch and decode the next data element header from the given cursor.
    ///
    /// On success, the cursor is positioned at the start of the value.
    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<DataElementHeader>;

    /// Fetch and decode the next sequence item head from the given cursor.
    /// It is a separate method because value representation is always
    /// implicit when reading item headers and delimiters.
    /// This method returns only the header of the item. At the end of this
    /// operation, the cursor will be pointing at the item's value data,
    /// which should be read separately.
    fn decode_item_header(&self, cursor: &mut ByteCursor<'_>) -> Result<SequenceItemHeader> {
        let tag = cursor
            .read_tag(self.endianness())
            .context(ReadItemHeaderSnafu)?;
        let len = cursor
            .read_u32(self.endianness())
            .context(ReadItemHeaderSnafu)?;
        SequenceItemHeader::new(tag, Length(len)).context(BadSequenceHeaderSnafu)
    }
}

impl<T: ?Sized> Decode for &T
where
    T: Decode,
{
    fn endianness(&self) -> Endianness {
        (**self).endianness()
    }

    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<DataElementHeader> {
        (**self).decode_header(cursor)
    }

    fn decode_item_header(&self, cursor: &mut ByteCursor<'_>) -> Result<SequenceItemHeader> {
        (**self).decode_item_header(cursor)
    }
}

/// A data element header decoder resolved at run-time
/// from a transfer syntax.
#[derive(Debug)]
pub enum DynDecoder {
    /// Explicit VR, in either byte order
    Explicit(ExplicitVRDecoder),
    /// Implicit VR Little Endian
    ImplicitLittleEndian(StandardImplicitVRLittleEndianDecoder),
}

impl Decode for DynDecoder {
    fn endianness(&self) -> Endianness {
        match self {
            DynDecoder::Explicit(d) => d.endianness(),
            DynDecoder::ImplicitLittleEndian(d) => d.endianness(),
        }
    }

    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<DataElementHeader> {
        match self {
            DynDecoder::Explicit(d) => d.decode_header(cursor),
            DynDecoder::ImplicitLittleEndian(d) => d.decode_header(cursor),
        }
    }
}
