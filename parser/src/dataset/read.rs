//! This module contains a mid-level abstraction for reading DICOM content
//! sequentially.
//!
//! The rest of the crate is used to obtain DICOM element headers and values.
//! At this level, headers and values are treated as tokens which can be used
//! to form a syntax tree of a full data set.
use crate::stateful::decode::{
    DynStatefulDecoder, Error as DecoderError, StatefulDecode, StatefulDecoder,
};
use dicom_lite_core::header::{DataElementHeader, Header, Length, SequenceItemHeader};
use dicom_lite_core::{PrimitiveValue, Tag, VR};
use dicom_lite_encoding::{ByteCursor, TransferSyntax};
use snafu::{Backtrace, ResultExt, Snafu};
use std::cmp::Ordering;
use std::iter::Iterator;
use tracing::warn;

use super::{DataToken, SeqTokenType};

/// The default limit of nested sequences in a data set.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Could not create decoder"))]
    CreateDecoder {
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read item header"))]
    ReadItemHeader {
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read element header"))]
    ReadHeader {
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read {} value bytes for element tagged {}", len, tag))]
    ReadValue {
        len: u32,
        tag: Tag,
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display("Could not read {} bytes for item value", len))]
    ReadItemValue {
        len: u32,
        #[snafu(backtrace)]
        source: DecoderError,
    },
    #[snafu(display(
        "Inconsistent sequence end: expected end at {} bytes but read {}",
        end_of_sequence,
        bytes_read
    ))]
    InconsistentSequenceEnd {
        end_of_sequence: usize,
        bytes_read: usize,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Unexpected item tag {} while reading element header at position {}",
        tag,
        position
    ))]
    UnexpectedItemTag {
        tag: Tag,
        position: usize,
        backtrace: Backtrace,
    },
    #[snafu(display("Undefined pixel item length at position {}", position))]
    UndefinedItemLength { position: usize, backtrace: Backtrace },
    #[snafu(display(
        "Sequence nesting exceeds the limit of {} levels at position {}",
        max_depth,
        position
    ))]
    DepthLimitExceeded {
        max_depth: usize,
        position: usize,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Data set ended at position {} with {} sequences still open",
        position,
        depth
    ))]
    PrematureEnd {
        position: usize,
        depth: usize,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A reader-specific token representing a sequence or item start.
#[derive(Debug, Copy, Clone, PartialEq)]
struct SeqToken {
    /// Whether it is the start of a sequence or the start of an item.
    typ: SeqTokenType,
    /// The length of the value, as indicated by the starting element,
    /// can be unknown.
    len: Length,
    /// Whether this sequence token is part of an encapsulated pixel data.
    pixel_data: bool,
    /// The position of the parser at
    /// the beginning of the sequence or item value data.
    base_offset: usize,
}

/// The set of options for the data set reader.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub struct DataSetReaderOptions {
    /// the maximum number of nested sequences
    pub max_depth: usize,
}

impl Default for DataSetReaderOptions {
    fn default() -> Self {
        DataSetReaderOptions {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DataSetReaderOptions {
    /// Replace the maximum sequence nesting depth of the options.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// A higher-level reader for retrieving structure in a DICOM data set
/// from an in-memory byte buffer.
///
/// Once an error is yielded, the iterator is fused.
#[derive(Debug)]
pub struct DataSetReader<S> {
    /// the stateful decoder
    parser: S,
    /// the options of this reader
    options: DataSetReaderOptions,
    /// whether the reader is expecting an item header next (or a sequence delimiter)
    in_sequence: bool,
    /// whether the reader is expecting the first item value of a pixel sequence next
    /// (offset table)
    offset_table_next: bool,
    /// whether a check for a sequence or item delimitation is pending
    delimiter_check_pending: bool,
    /// a stack of delimiters
    seq_delimiters: Vec<SeqToken>,
    /// fuse the iteration process if true
    hard_break: bool,
    /// last decoded header
    last_header: Option<DataElementHeader>,
}

impl<'a> DataSetReader<DynStatefulDecoder<'a>> {
    /// Create a new iterator over the data set in the given source,
    /// encoded in the given transfer syntax.
    #[inline]
    pub fn new_with_ts(source: ByteCursor<'a>, ts: &TransferSyntax) -> Result<Self> {
        Self::new_with_ts_options(source, ts, Default::default())
    }

    /// Create a new iterator over the data set in the given source,
    /// encoded in the given transfer syntax, with the given options.
    pub fn new_with_ts_options(
        source: ByteCursor<'a>,
        ts: &TransferSyntax,
        options: DataSetReaderOptions,
    ) -> Result<Self> {
        let parser = StatefulDecoder::new_with_ts(source, ts).context(CreateDecoderSnafu)?;
        Ok(DataSetReader::new(parser, options))
    }
}

impl<S> DataSetReader<S> {
    /// Create a new iterator with the given stateful decoder and options.
    pub fn new(decoder: S, options: DataSetReaderOptions) -> Self {
        DataSetReader {
            parser: decoder,
            options,
            seq_delimiters: Vec::new(),
            delimiter_check_pending: false,
            offset_table_next: false,
            in_sequence: false,
            hard_break: false,
            last_header: None,
        }
    }
}

impl<S> Iterator for DataSetReader<S>
where
    S: StatefulDecode,
{
    type Item = Result<DataToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.hard_break {
            return None;
        }

        // item or sequence delimitation logic for explicit lengths
        if self.delimiter_check_pending {
            match self.update_seq_delimiters() {
                Err(e) => {
                    self.hard_break = true;
                    return Some(Err(e));
                }
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => { /* no-op */ }
            }
        }

        if self.in_sequence {
            // at sequence level, expecting item header

            match self.parser.decode_item_header() {
                Ok(header) => {
                    match header {
                        SequenceItemHeader::Item { len } => {
                            // entered a new item
                            self.in_sequence = false;
                            let pixel_data = self
                                .seq_delimiters
                                .last()
                                .map_or(false, |token| token.pixel_data);
                            self.push_sequence_token(SeqTokenType::Item, len, pixel_data);
                            // items can be empty
                            if len == Length(0) {
                                self.delimiter_check_pending = true;
                            }
                            Some(Ok(DataToken::ItemStart { len }))
                        }
                        SequenceItemHeader::ItemDelimiter => {
                            // closed an item
                            self.seq_delimiters.pop();
                            self.in_sequence = true;
                            // sequences can end after an item delimiter
                            self.delimiter_check_pending = true;
                            Some(Ok(DataToken::ItemEnd))
                        }
                        SequenceItemHeader::SequenceDelimiter => {
                            // closed a sequence
                            self.seq_delimiters.pop();
                            self.in_sequence = false;
                            // items can end after a nested sequence ends
                            self.delimiter_check_pending = true;
                            Some(Ok(DataToken::SequenceEnd))
                        }
                    }
                }
                Err(e) => {
                    self.hard_break = true;
                    Some(Err(e).context(ReadItemHeaderSnafu))
                }
            }
        } else if let Some(SeqToken {
            typ: SeqTokenType::Item,
            pixel_data: true,
            len,
            ..
        }) = self.seq_delimiters.last().copied()
        {
            let len = match len.get() {
                Some(len) => len,
                None => {
                    self.hard_break = true;
                    return Some(
                        UndefinedItemLengthSnafu {
                            position: self.parser.position(),
                        }
                        .fail(),
                    );
                }
            };

            // need to pop item delimiter on the next iteration
            self.delimiter_check_pending = true;

            let token = if self.offset_table_next {
                // offset table
                self.offset_table_next = false;
                let mut offset_table = Vec::with_capacity(len as usize / 4);
                self.parser
                    .read_u32_to_vec(len, &mut offset_table)
                    .map(|_| DataToken::OffsetTable(offset_table))
            } else {
                // item value
                let mut value = Vec::with_capacity(len as usize);
                self.parser
                    .read_to_vec(len, &mut value)
                    .map(|_| DataToken::ItemValue(value))
            };

            match token {
                Ok(token) => Some(Ok(token)),
                Err(e) => {
                    self.hard_break = true;
                    Some(Err(e).context(ReadItemValueSnafu { len }))
                }
            }
        } else if let Some(header) = self.last_header {
            if header.is_encapsulated_pixeldata() {
                self.last_header = None;
                if let Err(e) = self.push_sequence_start(Length::UNDEFINED, true) {
                    self.hard_break = true;
                    return Some(Err(e));
                }

                // encapsulated pixel data, expecting offset table
                match self.parser.decode_item_header() {
                    Ok(header) => match header {
                        SequenceItemHeader::Item { len } => {
                            // entered a new item
                            self.in_sequence = false;
                            self.push_sequence_token(SeqTokenType::Item, len, true);
                            // items can be empty
                            if len == Length(0) {
                                self.delimiter_check_pending = true;
                            } else {
                                self.offset_table_next = true;
                            }
                            Some(Ok(DataToken::ItemStart { len }))
                        }
                        SequenceItemHeader::SequenceDelimiter => {
                            // empty pixel data
                            self.seq_delimiters.pop();
                            self.in_sequence = false;
                            self.delimiter_check_pending = true;
                            Some(Ok(DataToken::SequenceEnd))
                        }
                        item => {
                            self.hard_break = true;
                            Some(
                                UnexpectedItemTagSnafu {
                                    tag: item.tag(),
                                    position: self.parser.position(),
                                }
                                .fail(),
                            )
                        }
                    },
                    Err(e) => {
                        self.hard_break = true;
                        Some(Err(e).context(ReadItemHeaderSnafu))
                    }
                }
            } else {
                // a plain element header was read, so a value is expected
                self.last_header = None;
                let value = match self.read_value(&header) {
                    Ok(v) => v,
                    Err(e) => {
                        self.hard_break = true;
                        return Some(Err(e));
                    }
                };

                // sequences can end after this token
                self.delimiter_check_pending = true;

                Some(Ok(DataToken::PrimitiveValue(value)))
            }
        } else {
            if self.parser.is_at_end() {
                self.hard_break = true;
                if self.seq_delimiters.is_empty() {
                    // end of the data set
                    return None;
                }
                return Some(
                    PrematureEndSnafu {
                        position: self.parser.position(),
                        depth: self.depth(),
                    }
                    .fail(),
                );
            }

            // a data element header or item delimiter is expected
            match self.parser.decode_header() {
                Ok(DataElementHeader {
                    tag,
                    vr: VR::SQ,
                    len,
                }) => {
                    if let Err(e) = self.push_sequence_start(len, false) {
                        self.hard_break = true;
                        return Some(Err(e));
                    }
                    self.in_sequence = true;

                    // sequences can end right after they start
                    if len == Length(0) {
                        self.delimiter_check_pending = true;
                    }

                    Some(Ok(DataToken::SequenceStart { tag, len }))
                }
                Ok(DataElementHeader {
                    tag: Tag::ITEM_DELIMITER,
                    ..
                }) if self.seq_delimiters.is_empty() => {
                    // ignore delimiter, we are not in a sequence
                    warn!(
                        "Item delimitation item outside of a sequence in position {}",
                        self.parser.position()
                    );
                    // return a new token by calling the method again
                    self.next()
                }
                Ok(DataElementHeader {
                    tag: Tag::ITEM_DELIMITER,
                    ..
                }) => {
                    self.in_sequence = true;
                    // pop item delimiter
                    self.seq_delimiters.pop();
                    // sequences can end after this token
                    self.delimiter_check_pending = true;
                    Some(Ok(DataToken::ItemEnd))
                }
                Ok(DataElementHeader {
                    tag: Tag::SEQUENCE_DELIMITER,
                    ..
                }) if self.seq_delimiters.is_empty() => {
                    warn!(
                        "Sequence delimitation item outside of a sequence in position {}",
                        self.parser.position()
                    );
                    self.next()
                }
                Ok(header) if header.tag.group() == 0xFFFE => {
                    self.hard_break = true;
                    Some(
                        UnexpectedItemTagSnafu {
                            tag: header.tag,
                            position: self.parser.position(),
                        }
                        .fail(),
                    )
                }
                Ok(header) if header.is_encapsulated_pixeldata() => {
                    // encapsulated pixel data conditions:
                    // expect a sequence of pixel data fragments

                    // save it for the next step
                    self.last_header = Some(header);
                    Some(Ok(DataToken::PixelSequenceStart))
                }
                Ok(header) if header.len.is_undefined() => {
                    // treat other undefined length elements
                    // as data set sequences,
                    // discarding the VR in the process
                    let DataElementHeader { tag, len, .. } = header;
                    if let Err(e) = self.push_sequence_start(len, false) {
                        self.hard_break = true;
                        return Some(Err(e));
                    }
                    self.in_sequence = true;

                    Some(Ok(DataToken::SequenceStart { tag, len }))
                }
                Ok(header) => {
                    // save it for the next step
                    self.last_header = Some(header);
                    Some(Ok(DataToken::ElementHeader(header)))
                }
                Err(e) => {
                    self.hard_break = true;
                    Some(Err(e).context(ReadHeaderSnafu))
                }
            }
        }
    }
}

impl<S> DataSetReader<S>
where
    S: StatefulDecode,
{
    /// The absolute position of the reader in the source.
    pub fn position(&self) -> usize {
        self.parser.position()
    }

    fn update_seq_delimiters(&mut self) -> Result<Option<DataToken>> {
        if let Some(sd) = self.seq_delimiters.last() {
            if let Some(len) = sd.len.get() {
                let end_of_sequence = sd.base_offset + len as usize;
                let bytes_read = self.parser.position();
                match end_of_sequence.cmp(&bytes_read) {
                    Ordering::Equal => {
                        // end of delimiter, as indicated by the element's length
                        let token = match sd.typ {
                            SeqTokenType::Sequence => {
                                self.in_sequence = false;
                                DataToken::SequenceEnd
                            }
                            SeqTokenType::Item => {
                                self.in_sequence = true;
                                DataToken::ItemEnd
                            }
                        };
                        self.seq_delimiters.pop();
                        return Ok(Some(token));
                    }
                    Ordering::Less => {
                        return InconsistentSequenceEndSnafu {
                            end_of_sequence,
                            bytes_read,
                        }
                        .fail();
                    }
                    Ordering::Greater => {} // continue normally
                }
            }
        }
        self.delimiter_check_pending = false;
        Ok(None)
    }

    /// The number of sequences currently open.
    fn depth(&self) -> usize {
        self.seq_delimiters
            .iter()
            .filter(|token| token.typ == SeqTokenType::Sequence)
            .count()
    }

    fn push_sequence_start(&mut self, len: Length, pixel_data: bool) -> Result<()> {
        if self.depth() >= self.options.max_depth {
            return DepthLimitExceededSnafu {
                max_depth: self.options.max_depth,
                position: self.parser.position(),
            }
            .fail();
        }
        self.push_sequence_token(SeqTokenType::Sequence, len, pixel_data);
        Ok(())
    }

    #[inline]
    fn push_sequence_token(&mut self, typ: SeqTokenType, len: Length, pixel_data: bool) {
        self.seq_delimiters.push(SeqToken {
            typ,
            pixel_data,
            len,
            base_offset: self.parser.position(),
        })
    }

    fn read_value(&mut self, header: &DataElementHeader) -> Result<PrimitiveValue> {
        self.parser.read_value(header).context(ReadValueSnafu {
            len: header.len.0,
            tag: header.tag,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSetReader, DataSetReaderOptions, DataToken, Error, StatefulDecode};
    use crate::stateful::decode::StatefulDecoder;
    use dicom_lite_core::header::{DataElementHeader, Length};
    use dicom_lite_core::value::PrimitiveValue;
    use dicom_lite_core::{Tag, VR};
    use dicom_lite_encoding::decode::explicit_vr::ExplicitVRDecoder;
    use dicom_lite_encoding::{ByteCursor, Endianness};
    use dicom_lite_transfer_syntax_registry::entries;
    use smallvec::smallvec;

    fn explicit_le_reader(data: &[u8]) -> DataSetReader<StatefulDecoder<'_, ExplicitVRDecoder>> {
        let parser =
            StatefulDecoder::new(ByteCursor::new(data), ExplicitVRDecoder::new(Endianness::Little));
        DataSetReader::new(parser, Default::default())
    }

    fn validate_dataset_reader<I, S>(data: &[u8], mut dset_reader: DataSetReader<S>, ground_truth: I)
    where
        I: IntoIterator<Item = DataToken>,
        S: StatefulDecode,
    {
        for gt_token in ground_truth {
            let token = dset_reader
                .next()
                .expect("expecting more tokens from reader")
                .expect("should fetch the next token without an error");
            assert_eq!(
                token, gt_token,
                "Got token {:2?} ; but expected {:2?}",
                token, gt_token
            );
        }

        let extra: Vec<_> = dset_reader.by_ref().collect();
        assert_eq!(
            extra.len(), // we have already read all of them
            0,
            "extraneous tokens remaining: {:?}",
            extra,
        );
        assert_eq!(
            dset_reader.position(),
            data.len(),
            "Decoder position did not match end of data",
        );
    }

    #[test]
    fn read_sequence_explicit() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            0x08, 0x00, 0x15, 0x11, // sequence tag: (0008,1115)
            b'S', b'Q', // VR
            0x00, 0x00, // reserved
            0x1E, 0x00, 0x00, 0x00, // length: 8 + 22 = 30
            // -- 12 --
            0xFE, 0xFF, 0x00, 0xE0, // item start tag
            0x16, 0x00, 0x00, 0x00, // item length: 22
            // -- 20 --
            // (0008,1150) ReferencedSOPClassUID, len = 4, value = "1.2\0"
            0x08, 0x00, 0x50, 0x11, b'U', b'I', 0x04, 0x00, b'1', b'.', b'2', 0x00,
            // -- 32 --
            // (0020,0013) InstanceNumber, len = 2, value = "7 "
            0x20, 0x00, 0x13, 0x00, b'I', b'S', 0x02, 0x00, b'7', b' ',
            // -- 42 --
            // (0010,0020) PatientID, len = 4, value = "ABCD"
            0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x04, 0x00, b'A', b'B', b'C', b'D',
        ];

        let ground_truth = vec![
            DataToken::SequenceStart {
                tag: Tag(0x0008, 0x1115),
                len: Length(30),
            },
            DataToken::ItemStart { len: Length(22) },
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0008, 0x1150),
                vr: VR::UI,
                len: Length(4),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Strs(smallvec!["1.2".to_owned()])),
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0020, 0x0013),
                vr: VR::IS,
                len: Length(2),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Strs(smallvec!["7 ".to_owned()])),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0010, 0x0020),
                vr: VR::LO,
                len: Length(4),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Strs(smallvec!["ABCD".to_owned()])),
        ];

        validate_dataset_reader(DATA, explicit_le_reader(DATA), ground_truth);
    }

    #[test]
    fn read_undefined_length_sequence_implicit() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0008,1140) ReferencedImageSequence, undefined length
            0x08, 0x00, 0x40, 0x11, 0xFF, 0xFF, 0xFF, 0xFF,
            // item, undefined length
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            // (0008,1155) ReferencedSOPInstanceUID, len = 4, value = "1.3\0"
            0x08, 0x00, 0x55, 0x11, 0x04, 0x00, 0x00, 0x00, b'1', b'.', b'3', 0x00,
            // item delimiter
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // empty item, undefined length
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // sequence delimiter
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // (0010,0020) PatientID, len = 2, value = "42"
            0x10, 0x00, 0x20, 0x00, 0x02, 0x00, 0x00, 0x00, b'4', b'2',
        ];

        let ground_truth = vec![
            DataToken::SequenceStart {
                tag: Tag(0x0008, 0x1140),
                len: Length::UNDEFINED,
            },
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0008, 0x1155),
                vr: VR::UI,
                len: Length(4),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Strs(smallvec!["1.3".to_owned()])),
            DataToken::ItemEnd,
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0010, 0x0020),
                vr: VR::LO,
                len: Length(2),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Strs(smallvec!["42".to_owned()])),
        ];

        let reader = DataSetReader::new_with_ts(
            ByteCursor::new(DATA),
            &entries::IMPLICIT_VR_LITTLE_ENDIAN,
        )
        .unwrap();
        validate_dataset_reader(DATA, reader, ground_truth);
    }

    #[test]
    fn read_encapsulated_pixel_data() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (7FE0,0010) PixelData, OB, undefined length
            0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            // basic offset table item, len = 8
            0xFE, 0xFF, 0x00, 0xE0, 0x08, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x0C, 0x00, 0x00, 0x00,
            // fragment, len = 4
            0xFE, 0xFF, 0x00, 0xE0, 0x04, 0x00, 0x00, 0x00, 0x01, 0x02, 0x03, 0x04,
            // fragment, len = 2
            0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00, 0x05, 0x06,
            // sequence delimiter
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];

        let ground_truth = vec![
            DataToken::PixelSequenceStart,
            DataToken::ItemStart { len: Length(8) },
            DataToken::OffsetTable(vec![0, 12]),
            DataToken::ItemEnd,
            DataToken::ItemStart { len: Length(4) },
            DataToken::ItemValue(vec![1, 2, 3, 4]),
            DataToken::ItemEnd,
            DataToken::ItemStart { len: Length(2) },
            DataToken::ItemValue(vec![5, 6]),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
        ];

        validate_dataset_reader(DATA, explicit_le_reader(DATA), ground_truth);
    }

    #[test]
    fn read_encapsulated_pixel_data_with_empty_offset_table() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (7FE0,0010) PixelData, OB, undefined length
            0xE0, 0x7F, 0x10, 0x00, b'O', b'B', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            // empty basic offset table
            0xFE, 0xFF, 0x00, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // fragment, len = 2
            0xFE, 0xFF, 0x00, 0xE0, 0x02, 0x00, 0x00, 0x00, 0xFF, 0xD8,
            // sequence delimiter
            0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];

        let ground_truth = vec![
            DataToken::PixelSequenceStart,
            DataToken::ItemStart { len: Length(0) },
            DataToken::ItemEnd,
            DataToken::ItemStart { len: Length(2) },
            DataToken::ItemValue(vec![0xFF, 0xD8]),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
        ];

        validate_dataset_reader(DATA, explicit_le_reader(DATA), ground_truth);
    }

    #[test]
    fn stray_item_delimiter_is_ignored() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // item delimiter outside of any sequence
            0xFE, 0xFF, 0x0D, 0xE0, 0x00, 0x00, 0x00, 0x00,
            // (0010,0020) PatientID, len = 2, value = "42"
            0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x02, 0x00, b'4', b'2',
        ];

        let ground_truth = vec![
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0010, 0x0020),
                vr: VR::LO,
                len: Length(2),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Strs(smallvec!["42".to_owned()])),
        ];

        validate_dataset_reader(DATA, explicit_le_reader(DATA), ground_truth);
    }

    #[test]
    fn nesting_beyond_the_limit_is_rejected() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0040,0275) RequestAttributesSequence, undefined length
            0x40, 0x00, 0x75, 0x02, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            0x40, 0x00, 0x75, 0x02, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            0x40, 0x00, 0x75, 0x02, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
        ];

        let parser =
            StatefulDecoder::new(ByteCursor::new(DATA), ExplicitVRDecoder::new(Endianness::Little));
        let mut reader = DataSetReader::new(parser, DataSetReaderOptions::default().max_depth(2));

        for _ in 0..4 {
            assert!(reader.next().unwrap().is_ok());
        }
        let err = reader.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            Error::DepthLimitExceeded {
                max_depth: 2,
                position: 52,
                ..
            }
        ));
        assert!(reader.next().is_none());
    }

    #[test]
    fn unterminated_sequence_is_rejected() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0040,0275) RequestAttributesSequence, undefined length
            0x40, 0x00, 0x75, 0x02, b'S', b'Q', 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF,
            0xFE, 0xFF, 0x00, 0xE0, 0xFF, 0xFF, 0xFF, 0xFF,
            // (0010,0020) PatientID, len = 2, value = "42"
            0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x02, 0x00, b'4', b'2',
        ];

        let tokens: Vec<_> = explicit_le_reader(DATA).collect();
        assert_eq!(tokens.len(), 5);
        assert!(tokens[..4].iter().all(|t| t.is_ok()));
        assert!(matches!(
            tokens[4],
            Err(Error::PrematureEnd {
                position: 30,
                depth: 1,
                ..
            })
        ));
    }

    #[test]
    fn item_overrunning_its_sequence_is_rejected() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0008,1115) sequence, len = 16
            0x08, 0x00, 0x15, 0x11, b'S', b'Q', 0x00, 0x00, 0x10, 0x00, 0x00, 0x00,
            // item, len = 10
            0xFE, 0xFF, 0x00, 0xE0, 0x0A, 0x00, 0x00, 0x00,
            // (0020,0013) InstanceNumber, len = 2, value = "1 "
            0x20, 0x00, 0x13, 0x00, b'I', b'S', 0x02, 0x00, b'1', b' ',
        ];

        let tokens: Vec<_> = explicit_le_reader(DATA).collect();
        // sequence start, item start, header, value, item end, error
        assert_eq!(tokens.len(), 6);
        assert_eq!(tokens[4].as_ref().unwrap(), &DataToken::ItemEnd);
        assert!(matches!(
            tokens[5],
            Err(Error::InconsistentSequenceEnd {
                end_of_sequence: 28,
                bytes_read: 30,
                ..
            })
        ));
    }

    #[test]
    fn truncated_element_is_rejected() {
        #[rustfmt::skip]
        static DATA: &[u8] = &[
            // (0010,0010) PatientName, len = 8, only 2 bytes present
            0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x08, 0x00, b'A', b'B',
        ];

        let tokens: Vec<_> = explicit_le_reader(DATA).collect();
        assert_eq!(tokens.len(), 2);
        assert!(matches!(
            tokens[1],
            Err(Error::ReadValue {
                len: 8,
                tag: Tag(0x0010, 0x0010),
                ..
            })
        ));
    }

    #[test]
    fn deflated_data_sets_are_not_supported() {
        let err = DataSetReader::new_with_ts(
            ByteCursor::new(&[]),
            &entries::DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
        )
        .unwrap_err();
        assert!(matches!(err, Error::CreateDecoder { .. }));
    }
}
