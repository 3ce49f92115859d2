//! This module provides a higher level abstraction for reading DICOM data.
//! A stateful decoder binds a byte cursor to the element header decoder
//! of a transfer syntax,
//! so that headers and primitive values can be read in sequence.

use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use dicom_lite_core::header::{DataElementHeader, HasLength, SequenceItemHeader, Tag, VR};
use dicom_lite_core::value::{PrimitiveValue, C};
use dicom_lite_encoding::cursor::{self, ByteCursor};
use dicom_lite_encoding::decode::{self, Decode, DynDecoder};
use dicom_lite_encoding::TransferSyntax;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use tracing::warn;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Data sets in transfer syntax {} cannot be decoded", name))]
    UnsupportedTransferSyntax {
        name: &'static str,
        backtrace: Backtrace,
    },
    #[snafu(display("Could not decode element header at position {}", position))]
    DecodeElementHeader {
        position: usize,
        #[snafu(backtrace)]
        source: decode::Error,
    },
    #[snafu(display("Could not decode item header at position {}", position))]
    DecodeItemHeader {
        position: usize,
        #[snafu(backtrace)]
        source: decode::Error,
    },
    #[snafu(display("Could not read value from source at position {}", position))]
    ReadValueData {
        position: usize,
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    #[snafu(display(
        "Undefined value length of element tagged {} at position {}",
        tag,
        position
    ))]
    UndefinedValueLength {
        tag: Tag,
        position: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Attempted to read non-primitive value at position {}", position))]
    NonPrimitiveType { position: usize, backtrace: Backtrace },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Type trait for a decoder bound to a data source,
/// which keeps track of its position.
pub trait StatefulDecode {
    /// Same as `Decode::decode_header` over the bound source.
    fn decode_header(&mut self) -> Result<DataElementHeader>;

    /// Same as `Decode::decode_item_header` over the bound source.
    fn decode_item_header(&mut self) -> Result<SequenceItemHeader>;

    /// Eagerly read the following data in the source as a primitive data
    /// value. Text is kept in its original form:
    /// numbers in text form, as well as dates and times, are read as strings.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer bytes than declared remain,
    /// or if the header describes a sequence,
    /// which in that case this method should not be used.
    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue>;

    /// Read the following `length` bytes into a vector.
    fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()>;

    /// Read the following `length` bytes as 32-bit unsigned integers
    /// into a vector.
    fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()>;

    /// Retrieve the absolute position of the decoder in the source.
    fn position(&self) -> usize;

    /// Whether the source was fully consumed.
    fn is_at_end(&self) -> bool;
}

/// Alias for a stateful decoder resolved at run-time
/// from an object's transfer syntax.
pub type DynStatefulDecoder<'a> = StatefulDecoder<'a, DynDecoder>;

/// A stateful abstraction for the full DICOM content reading process.
/// `D` is the element header decoder of the transfer syntax.
#[derive(Debug)]
pub struct StatefulDecoder<'a, D> {
    from: ByteCursor<'a>,
    decoder: D,
}

impl<'a> StatefulDecoder<'a, DynDecoder> {
    /// Create a stateful decoder for the data set in the given transfer syntax.
    ///
    /// Fails if the data set is compressed as a whole (deflated),
    /// which is not supported.
    pub fn new_with_ts(from: ByteCursor<'a>, ts: &TransferSyntax) -> Result<Self> {
        ensure!(
            !ts.is_deflated(),
            UnsupportedTransferSyntaxSnafu { name: ts.name() }
        );
        Ok(StatefulDecoder::new(from, ts.decoder()))
    }
}

impl<'a, D> StatefulDecoder<'a, D>
where
    D: Decode,
{
    /// Create a new stateful decoder from its parts.
    pub fn new(from: ByteCursor<'a>, decoder: D) -> Self {
        StatefulDecoder { from, decoder }
    }

    fn endianness(&self) -> Endianness {
        self.decoder.endianness()
    }

    fn require_known_length(&self, header: &DataElementHeader) -> Result<usize> {
        header.length().get().map(|len| len as usize).context(
            UndefinedValueLengthSnafu {
                tag: header.tag,
                position: self.from.position(),
            },
        )
    }

    fn read_value_bytes(&mut self, header: &DataElementHeader) -> Result<&'a [u8]> {
        let len = self.require_known_length(header)?;
        let position = self.from.position();
        self.from
            .read_bytes(len)
            .context(ReadValueDataSnafu { position })
    }

    fn read_value_tag(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let endianness = self.endianness();
        let bytes = self.read_value_bytes(header)?;
        let tags: C<Tag> = bytes
            .chunks_exact(4)
            .map(|c| match endianness {
                Endianness::Little => Tag(LittleEndian::read_u16(c), LittleEndian::read_u16(&c[2..])),
                Endianness::Big => Tag(BigEndian::read_u16(c), BigEndian::read_u16(&c[2..])),
            })
            .collect();
        Ok(PrimitiveValue::Tags(tags))
    }

    fn read_value_ob(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // sequence of 8-bit integers (or arbitrary byte data)
        let bytes = self.read_value_bytes(header)?;
        Ok(PrimitiveValue::U8(C::from_slice(bytes)))
    }

    fn read_value_strs(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        let bytes = self.read_value_bytes(header)?;
        let parts = bytes
            .split(|v| *v == b'\\')
            .map(|slice| match header.vr {
                VR::UI => decode_text(trim_trail_empty_bytes(slice)),
                _ => decode_text(slice),
            })
            .collect();
        Ok(PrimitiveValue::Strs(parts))
    }

    fn read_value_str(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        // a single string
        let bytes = self.read_value_bytes(header)?;
        Ok(PrimitiveValue::Str(decode_text(bytes)))
    }
}

/// Read a sequence of fixed-size binary numbers in the decoder's byte order.
macro_rules! read_numbers {
    ($name: ident, $variant: ident, $size: expr, $read: ident) => {
        fn $name(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
            let endianness = self.endianness();
            let bytes = self.read_value_bytes(header)?;
            if bytes.len() % $size != 0 {
                warn!(
                    "Value length {} of element {} is not a multiple of {}, ignoring trailing bytes",
                    bytes.len(),
                    header.tag,
                    $size
                );
            }
            let values = bytes
                .chunks_exact($size)
                .map(|c| match endianness {
                    Endianness::Little => LittleEndian::$read(c),
                    Endianness::Big => BigEndian::$read(c),
                })
                .collect();
            Ok(PrimitiveValue::$variant(values))
        }
    };
}

impl<'a, D> StatefulDecoder<'a, D>
where
    D: Decode,
{
    read_numbers!(read_value_ss, I16, 2, read_i16);
    read_numbers!(read_value_us, U16, 2, read_u16);
    read_numbers!(read_value_sl, I32, 4, read_i32);
    read_numbers!(read_value_ul, U32, 4, read_u32);
    read_numbers!(read_value_sv, I64, 8, read_i64);
    read_numbers!(read_value_uv, U64, 8, read_u64);
    read_numbers!(read_value_fl, F32, 4, read_f32);
    read_numbers!(read_value_fd, F64, 8, read_f64);
}

impl<'a, D> StatefulDecode for StatefulDecoder<'a, D>
where
    D: Decode,
{
    fn decode_header(&mut self) -> Result<DataElementHeader> {
        let position = self.from.position();
        self.decoder
            .decode_header(&mut self.from)
            .context(DecodeElementHeaderSnafu { position })
    }

    fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        let position = self.from.position();
        self.decoder
            .decode_item_header(&mut self.from)
            .context(DecodeItemHeaderSnafu { position })
    }

    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        if header.length().0 == 0 {
            return Ok(PrimitiveValue::Empty);
        }

        if header.length().get().map_or(false, |len| len % 2 != 0) {
            warn!(
                "Element {} has odd value length {}",
                header.tag,
                header.length()
            );
        }

        match header.vr() {
            VR::SQ => {
                // sequence objects should not head over here, they are
                // handled at a higher level
                NonPrimitiveTypeSnafu {
                    position: self.from.position(),
                }
                .fail()
            }
            VR::AT => self.read_value_tag(header),
            VR::AE
            | VR::AS
            | VR::PN
            | VR::SH
            | VR::LO
            | VR::UI
            | VR::UC
            | VR::CS
            | VR::IS
            | VR::DS
            | VR::DA
            | VR::TM
            | VR::DT => self.read_value_strs(header),
            VR::UT | VR::ST | VR::UR | VR::LT => self.read_value_str(header),
            VR::UN | VR::OB | VR::OW | VR::OD | VR::OF | VR::OL | VR::OV => {
                self.read_value_ob(header)
            }
            VR::US => self.read_value_us(header),
            VR::SS => self.read_value_ss(header),
            VR::FD => self.read_value_fd(header),
            VR::FL => self.read_value_fl(header),
            VR::SL => self.read_value_sl(header),
            VR::UL => self.read_value_ul(header),
            VR::SV => self.read_value_sv(header),
            VR::UV => self.read_value_uv(header),
        }
    }

    fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()> {
        let position = self.from.position();
        let bytes = self
            .from
            .read_bytes(length as usize)
            .context(ReadValueDataSnafu { position })?;
        vec.extend_from_slice(bytes);
        Ok(())
    }

    fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()> {
        let position = self.from.position();
        let endianness = self.endianness();
        let bytes = self
            .from
            .read_bytes(length as usize)
            .context(ReadValueDataSnafu { position })?;
        vec.extend(bytes.chunks_exact(4).map(|c| match endianness {
            Endianness::Little => LittleEndian::read_u32(c),
            Endianness::Big => BigEndian::read_u32(c),
        }));
        Ok(())
    }

    #[inline]
    fn position(&self) -> usize {
        self.from.position()
    }

    #[inline]
    fn is_at_end(&self) -> bool {
        self.from.is_empty()
    }
}

impl<S: ?Sized> StatefulDecode for &mut S
where
    S: StatefulDecode,
{
    fn decode_header(&mut self) -> Result<DataElementHeader> {
        (**self).decode_header()
    }

    fn decode_item_header(&mut self) -> Result<SequenceItemHeader> {
        (**self).decode_item_header()
    }

    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        (**self).read_value(header)
    }

    fn read_to_vec(&mut self, length: u32, vec: &mut Vec<u8>) -> Result<()> {
        (**self).read_to_vec(length, vec)
    }

    fn read_u32_to_vec(&mut self, length: u32, vec: &mut Vec<u32>) -> Result<()> {
        (**self).read_u32_to_vec(length, vec)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn is_at_end(&self) -> bool {
        (**self).is_at_end()
    }
}

/// Decode text in the default character repertoire.
/// Bytes which do not form valid UTF-8 are replaced.
fn decode_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Remove trailing spaces and null characters.
fn trim_trail_empty_bytes(mut x: &[u8]) -> &[u8] {
    while x.last() == Some(&b' ') || x.last() == Some(&b'\0') {
        x = &x[..x.len() - 1];
    }
    x
}
