//! Implicit VR Little Endian syntax header decoding

use crate::cursor::ByteCursor;
use crate::decode::{Decode, ReadHeaderTagSnafu, ReadLengthSnafu, Result};
use byteordered::Endianness;
use dicom_lite_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_lite_core::header::{DataElementHeader, Length};
use dicom_lite_core::{Tag, VR};
use dicom_lite_dictionary_std::StandardDataDictionary;
use snafu::ResultExt;
use std::fmt;

/// An ImplicitVRLittleEndianDecoder which uses the standard data dictionary.
pub type StandardImplicitVRLittleEndianDecoder =
    ImplicitVRLittleEndianDecoder<StandardDataDictionary>;

/// A data element decoder for the Implicit VR Little Endian transfer syntax.
/// This type contains a reference to an attribute dictionary for resolving
/// value representations.
pub struct ImplicitVRLittleEndianDecoder<D> {
    dict: D,
}

impl<D> fmt::Debug for ImplicitVRLittleEndianDecoder<D> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ImplicitVRLittleEndianDecoder")
            .field("dict", &"«omitted»")
            .finish()
    }
}

impl ImplicitVRLittleEndianDecoder<StandardDataDictionary> {
    /// Retrieve this decoder using the standard data dictionary.
    pub fn with_std_dict() -> Self {
        ImplicitVRLittleEndianDecoder {
            dict: StandardDataDictionary,
        }
    }
}

impl Default for ImplicitVRLittleEndianDecoder<StandardDataDictionary> {
    fn default() -> Self {
        ImplicitVRLittleEndianDecoder::with_std_dict()
    }
}

impl<D> ImplicitVRLittleEndianDecoder<D>
where
    D: DataDictionary,
{
    /// Retrieve this decoder using a custom data dictionary.
    pub fn with_dict(dictionary: D) -> Self {
        ImplicitVRLittleEndianDecoder { dict: dictionary }
    }
}

impl<D> Decode for ImplicitVRLittleEndianDecoder<D>
where
    D: DataDictionary,
{
    fn endianness(&self) -> Endianness {
        Endianness::Little
    }

    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<DataElementHeader> {
        // retrieve tag
        let tag = cursor
            .read_tag(Endianness::Little)
            .context(ReadHeaderTagSnafu)?;

        // the length is always a 32-bit field
        let len = cursor
            .read_u32(Endianness::Little)
            .context(ReadLengthSnafu)?;

        // VR resolution is done with the help of the data dictionary.
        // In Implicit VR Little Endian,
        // the VR of OW must be used for Pixel Data (7FE0,0010)
        // and Overlay Data (60xx, 3000).
        let vr = if tag == Tag::PIXEL_DATA || (tag.0 >> 8 == 0x60 && tag.1 == 0x3000) {
            VR::OW
        } else {
            self.dict
                .by_tag(tag)
                .map(|entry| entry.vr())
                .unwrap_or(VR::UN)
        };

        // an unknown element whose value opens with an item is a sequence
        let vr = if vr == VR::UN && len != u32::MAX && len >= 8 && starts_with_item(cursor) {
            VR::SQ
        } else {
            vr
        };
        Ok(DataElementHeader::new(tag, vr, Length(len)))
    }
}

/// Whether the bytes at the cursor are an item tag (FFFE,E000).
fn starts_with_item(cursor: &ByteCursor<'_>) -> bool {
    cursor.peek_bytes(4).ok() == Some(&[0xFE, 0xFF, 0x00, 0xE0][..])
}
