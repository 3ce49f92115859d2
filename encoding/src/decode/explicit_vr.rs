//! Explicit VR syntax header decoding, in either byte order.

use crate::cursor::ByteCursor;
use crate::decode::{
    Decode, ReadHeaderTagSnafu, ReadLengthSnafu, ReadReservedSnafu, ReadVrSnafu, Result,
};
use byteordered::Endianness;
use dicom_lite_core::header::{DataElementHeader, Length, VrLengthClass};
use dicom_lite_core::VR;
use snafu::ResultExt;
use tracing::warn;

/// A data element header decoder for the Explicit VR transfer syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplicitVRDecoder {
    endianness: Endianness,
}

impl ExplicitVRDecoder {
    /// Create a decoder reading numbers in the given byte order.
    pub fn new(endianness: Endianness) -> Self {
        ExplicitVRDecoder { endianness }
    }
}

impl Default for ExplicitVRDecoder {
    fn default() -> Self {
        ExplicitVRDecoder::new(Endianness::Little)
    }
}

impl Decode for ExplicitVRDecoder {
    fn endianness(&self) -> Endianness {
        self.endianness
    }

    fn decode_header(&self, cursor: &mut ByteCursor<'_>) -> Result<DataElementHeader> {
        // retrieve tag
        let tag = cursor
            .read_tag(self.endianness)
            .context(ReadHeaderTagSnafu)?;

        if tag.group() == 0xFFFE {
            // item delimiters do not have VR or reserved field
            let len = cursor
                .read_u32(self.endianness)
                .context(ReadLengthSnafu)?;
            return Ok(DataElementHeader::new(tag, VR::UN, Length(len)));
        }

        // retrieve explicit VR
        let vr_bytes = cursor.read_bytes(2).context(ReadVrSnafu)?;
        let vr = VR::from_binary([vr_bytes[0], vr_bytes[1]]).unwrap_or_else(|| {
            warn!(
                "Unknown value representation {:02X?} in element {}, assuming UN",
                vr_bytes, tag
            );
            VR::UN
        });

        // the width of the length field depends on the VR class only
        let len = match vr.length_class() {
            VrLengthClass::Short => cursor
                .read_u16(self.endianness)
                .map(u32::from)
                .context(ReadLengthSnafu)?,
            VrLengthClass::Long => {
                cursor.skip(2).context(ReadReservedSnafu)?;
                cursor
                    .read_u32(self.endianness)
                    .context(ReadLengthSnafu)?
            }
        };

        Ok(DataElementHeader::new(tag, vr, Length(len)))
    }
}

#[cfg(test)]
mod tests {
    use super::ExplicitVRDecoder;
    use crate::cursor::ByteCursor;
    use crate::decode::{Decode, Error};
    use byteordered::Endianness;
    use dicom_lite_core::header::{HasLength, Header, Length};
    use dicom_lite_core::{Tag, VR};

    // manually crafting some DICOM data elements
    //  Tag: (0002,0002) Media Storage SOP Class UID
    //  VR: UI
    //  Length: 26
    //  Value: "1.2.840.10008.5.1.4.1.1.1\0"
    // --
    //  Tag: (0002,0010) Transfer Syntax UID
    //  VR: UI
    //  Length: 20
    //  Value: "1.2.840.10008.1.2.1\0" == ExplicitVRLittleEndian
    // --
    #[rustfmt::skip]
    const RAW: &[u8; 62] = &[
        0x02, 0x00, 0x02, 0x00, 0x55, 0x49, 0x1a, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34, 0x30, 0x2e,
        0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x35, 0x2e, 0x31, 0x2e, 0x34, 0x2e, 0x31, 0x2e, 0x31, 0x2e,
        0x31, 0x00, 0x02, 0x00, 0x10, 0x00, 0x55, 0x49, 0x14, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34,
        0x30, 0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x31, 0x2e, 0x32, 0x2e, 0x31, 0x00,
    ];

    #[test]
    fn decode_data_elements() {
        let dec = ExplicitVRDecoder::default();
        let mut cursor = ByteCursor::new(RAW);

        // read first element
        let elem = dec.decode_header(&mut cursor).expect("should find an element");
        assert_eq!(elem.tag(), Tag(2, 2));
        assert_eq!(elem.vr(), VR::UI);
        assert_eq!(elem.length(), Length(26));
        // cursor should be @ #8
        assert_eq!(cursor.position(), 8);
        cursor.skip(26).unwrap();

        // read second element
        let elem = dec.decode_header(&mut cursor).expect("should find an element");
        assert_eq!(elem.tag(), Tag(2, 16));
        assert_eq!(elem.vr(), VR::UI);
        assert_eq!(elem.length(), Length(20));
        // cursor should be @ #42
        assert_eq!(cursor.position(), 42);
    }

    #[test]
    fn long_class_reads_reserved_bytes() {
        #[rustfmt::skip]
        let data: [u8; 24] = [
            0x08, 0x00, 0x40, 0x11, // (0008,1140) ReferencedImageSequence
            b'S', b'Q', 0x00, 0x00, // VR: SQ, reserved
            0xFF, 0xFF, 0xFF, 0xFF, // length: undefined
            0x7F, 0xE0, 0x00, 0x10, // (7FE0,0010) PixelData, big endian
            b'O', b'B', 0x00, 0x00, // VR: OB, reserved
            0x00, 0x00, 0x00, 0x02, // length: 2
        ];
        let mut cursor = ByteCursor::new(&data);
        let header = ExplicitVRDecoder::default()
            .decode_header(&mut cursor)
            .unwrap();
        assert_eq!(header.vr(), VR::SQ);
        assert!(header.length().is_undefined());

        let header = ExplicitVRDecoder::new(Endianness::Big)
            .decode_header(&mut cursor)
            .unwrap();
        assert_eq!(header.tag(), Tag::PIXEL_DATA);
        assert_eq!(header.vr(), VR::OB);
        assert_eq!(header.length(), Length(2));
    }

    #[test]
    fn truncated_length_field() {
        #[rustfmt::skip]
        let data: [u8; 7] = [
            0x10, 0x00, 0x10, 0x00, // (0010,0010) PatientName
            b'P', b'N', 0x04,       // one byte short of the length field
        ];
        let mut cursor = ByteCursor::new(&data);
        assert!(matches!(
            ExplicitVRDecoder::default().decode_header(&mut cursor),
            Err(Error::ReadLength { .. })
        ));
    }
}
