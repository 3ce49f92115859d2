//! This module contains the implementation for an in-memory DICOM object.
//!
//! Elements are kept in the order in which they were read.
//! Should a tag appear more than once, the last element read wins,
//! taking the place of the first one.

use snafu::{OptionExt, ResultExt};
use std::collections::HashMap;
use tracing::warn;

use crate::{
    AccessByNameError, AccessError, CreateParserSnafu, MissingElementValueSnafu,
    NoSuchAttributeNameSnafu, NoSuchDataElementTagSnafu, PrematureEndSnafu, ReadTokenSnafu,
    Result, UnexpectedTokenSnafu,
};
use dicom_lite_core::dictionary::DataDictionary;
use dicom_lite_core::header::{DataElementHeader, HasLength, Header};
use dicom_lite_core::value::{DataSetSequence, PixelFragmentSequence, Value, C};
use dicom_lite_core::{DataElement, Length, Tag, VR};
use dicom_lite_dictionary_std::StandardDataDictionary;
use dicom_lite_encoding::{ByteCursor, TransferSyntax};
use dicom_lite_parser::dataset::read::Error as ParserError;
use dicom_lite_parser::{DataSetReader, DataSetReaderOptions, DataToken};

/// A full in-memory DICOM data element.
pub type InMemElement<D = StandardDataDictionary> = DataElement<InMemDicomObject<D>, InMemFragment>;

/// The type of a pixel data fragment.
pub type InMemFragment = Vec<u8>;

type ParserResult<T> = std::result::Result<T, ParserError>;

/** A DICOM object that is fully contained in memory.
 */
#[derive(Debug, Clone)]
pub struct InMemDicomObject<D = StandardDataDictionary> {
    /// the elements, in file order
    entries: Vec<InMemElement<D>>,
    /// position of each tag in `entries`
    index: HashMap<Tag, usize>,
    /// the data dictionary
    dict: D,
    /// The length of the DICOM object in bytes.
    /// It is usually undefined, unless it is part of an item
    /// in a sequence with a specified length in its item header.
    len: Length,
}

impl<D> PartialEq for InMemDicomObject<D> {
    // This implementation ignores the data dictionary.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<D> HasLength for InMemDicomObject<D> {
    fn length(&self) -> Length {
        self.len
    }
}

impl InMemDicomObject<StandardDataDictionary> {
    /// Create a new empty DICOM object.
    pub fn new_empty() -> Self {
        InMemDicomObject::new_empty_with_dict(StandardDataDictionary)
    }

    /// Construct a DICOM object from an iterator of structured elements.
    pub fn from_element_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = InMemElement<StandardDataDictionary>>,
    {
        Self::from_iter_with_dict(iter, StandardDataDictionary)
    }

    /// Read a data set from the given cursor,
    /// encoded in the given transfer syntax.
    pub fn read_dataset_with_ts(source: ByteCursor<'_>, ts: &TransferSyntax) -> Result<Self> {
        Self::read_dataset_with_dict_ts(source, StandardDataDictionary, ts)
    }
}

impl<D> InMemDicomObject<D>
where
    D: DataDictionary,
    D: Clone,
{
    /// Create a new empty object, using the given dictionary for name lookup.
    pub fn new_empty_with_dict(dict: D) -> Self {
        InMemDicomObject {
            entries: Vec::new(),
            index: HashMap::new(),
            dict,
            len: Length::UNDEFINED,
        }
    }

    /// Construct a DICOM object from an iterator of structured elements,
    /// using the given dictionary for name lookup.
    pub fn from_iter_with_dict<I>(iter: I, dict: D) -> Self
    where
        I: IntoIterator<Item = InMemElement<D>>,
    {
        let mut obj = InMemDicomObject::new_empty_with_dict(dict);
        obj.extend(iter);
        obj
    }

    /// Read a data set from the given cursor,
    /// encoded in the given transfer syntax,
    /// using the given dictionary for name lookup.
    pub fn read_dataset_with_dict_ts(
        source: ByteCursor<'_>,
        dict: D,
        ts: &TransferSyntax,
    ) -> Result<Self> {
        Self::read_dataset_with_options(source, dict, ts, DataSetReaderOptions::default(), None)
    }

    pub(crate) fn read_dataset_with_options(
        source: ByteCursor<'_>,
        dict: D,
        ts: &TransferSyntax,
        options: DataSetReaderOptions,
        read_until: Option<Tag>,
    ) -> Result<Self> {
        let mut dataset =
            DataSetReader::new_with_ts_options(source, ts, options).context(CreateParserSnafu)?;
        Self::build_object(&mut dataset, dict, false, Length::UNDEFINED, read_until)
    }

    /// Retrieve a particular DICOM element by its tag.
    pub fn element(&self, tag: Tag) -> Result<&InMemElement<D>, AccessError> {
        self.element_opt(tag)
            .context(NoSuchDataElementTagSnafu { tag })
    }

    /// Retrieve a particular DICOM element by its tag,
    /// or `None` if it is not in the object.
    pub fn element_opt(&self, tag: Tag) -> Option<&InMemElement<D>> {
        self.index.get(&tag).map(|&i| &self.entries[i])
    }

    /// Retrieve a particular DICOM element by its name (keyword),
    /// or by a tag expression such as `"(0010,0010)"`.
    pub fn element_by_name(&self, name: &str) -> Result<&InMemElement<D>, AccessByNameError> {
        let tag = self.lookup_name(name)?;
        self.element(tag)
            .map_err(|e| e.into_access_by_name(name))
    }

    /// Retrieve the value of an element as a single string,
    /// trimmed of its padding.
    ///
    /// Multiple values are joined with a backslash.
    pub fn string(&self, tag: Tag) -> Option<String> {
        self.element_opt(tag)?
            .value()
            .to_str()
            .ok()
            .map(|s| s.into_owned())
    }

    /// Retrieve the values of an element as a sequence of strings.
    pub fn strings(&self, tag: Tag) -> Option<Vec<String>> {
        self.element_opt(tag)?.value().to_multi_str().ok()
    }

    /// Retrieve the first value of an element as an integer.
    ///
    /// Both binary integers and integer strings (IS) are converted.
    pub fn int(&self, tag: Tag) -> Option<i64> {
        self.element_opt(tag)?.value().to_int().ok()
    }

    /// Retrieve all values of an element as integers.
    pub fn ints(&self, tag: Tag) -> Option<Vec<i64>> {
        self.element_opt(tag)?.value().to_multi_int().ok()
    }

    /// Retrieve the first value of an element as a floating point number.
    ///
    /// Binary numbers and decimal strings (DS) are converted.
    pub fn real(&self, tag: Tag) -> Option<f64> {
        self.element_opt(tag)?.value().to_float64().ok()
    }

    /// Retrieve all values of an element as floating point numbers.
    pub fn reals(&self, tag: Tag) -> Option<Vec<f64>> {
        self.element_opt(tag)?.value().to_multi_float64().ok()
    }

    /// Insert a data element to the object, replacing (and returning) any
    /// previous element of the same attribute.
    ///
    /// A replaced element keeps its position.
    pub fn put(&mut self, elt: InMemElement<D>) -> Option<InMemElement<D>> {
        let tag = elt.tag();
        match self.index.get(&tag) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i], elt)),
            None => {
                self.index.insert(tag, self.entries.len());
                self.entries.push(elt);
                None
            }
        }
    }

    /// Obtain an iterator over the elements of this object, in file order.
    pub fn iter(&self) -> std::slice::Iter<'_, InMemElement<D>> {
        self.entries.iter()
    }

    /// Obtain an iterator over the tags of the object's elements, in file order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.iter().map(|e| e.tag())
    }

    // private methods

    /// Build an object by consuming a data set parser.
    fn build_object<I: ?Sized>(
        dataset: &mut I,
        dict: D,
        in_item: bool,
        len: Length,
        read_until: Option<Tag>,
    ) -> Result<Self>
    where
        I: Iterator<Item = ParserResult<DataToken>>,
    {
        let mut obj = InMemDicomObject::new_empty_with_dict(dict);
        obj.len = len;
        // perform a structured parsing of incoming tokens
        while let Some(token) = dataset.next() {
            let elem = match token.context(ReadTokenSnafu)? {
                DataToken::PixelSequenceStart => {
                    // stop reading if reached `read_until` tag
                    if read_until
                        .map(|t| t <= Tag::PIXEL_DATA)
                        .unwrap_or(false)
                    {
                        break;
                    }
                    let value = InMemDicomObject::build_encapsulated_data(&mut *dataset)?;
                    DataElement::new(
                        DataElementHeader::new(Tag::PIXEL_DATA, VR::OB, Length::UNDEFINED),
                        value,
                    )
                }
                DataToken::ElementHeader(header) => {
                    // stop reading if reached `read_until` tag
                    if read_until.map(|t| t <= header.tag).unwrap_or(false) {
                        break;
                    }

                    // fetch respective value, place it in the entries
                    let next_token = dataset
                        .next()
                        .context(MissingElementValueSnafu { tag: header.tag })?;
                    match next_token.context(ReadTokenSnafu)? {
                        DataToken::PrimitiveValue(v) => {
                            InMemElement::new(header, Value::Primitive(v))
                        }
                        token => {
                            return UnexpectedTokenSnafu { token }.fail();
                        }
                    }
                }
                DataToken::SequenceStart { tag, len } => {
                    // stop reading if reached `read_until` tag
                    if read_until.map(|t| t <= tag).unwrap_or(false) {
                        break;
                    }

                    // delegate sequence building to another function
                    let items = Self::build_sequence(&mut *dataset, &obj.dict)?;
                    DataElement::new(
                        DataElementHeader::new(tag, VR::SQ, len),
                        Value::Sequence(DataSetSequence::new(items, len)),
                    )
                }
                DataToken::ItemEnd if in_item => {
                    // end of item, leave now
                    return Ok(obj);
                }
                token => return UnexpectedTokenSnafu { token }.fail(),
            };
            if let Some(old) = obj.put(elem) {
                warn!("Duplicate data element {}, keeping the last one", old.tag());
            }
        }

        if in_item {
            // iterator fully consumed without an item end
            return PrematureEndSnafu.fail();
        }
        Ok(obj)
    }

    /// Build an encapsulated pixel data by collecting all fragments into an
    /// in-memory DICOM value.
    fn build_encapsulated_data<I: ?Sized>(
        dataset: &mut I,
    ) -> Result<Value<InMemDicomObject<D>, InMemFragment>>
    where
        I: Iterator<Item = ParserResult<DataToken>>,
    {
        // continue fetching tokens to retrieve:
        // - the offset table
        // - the various compressed fragments

        let mut offset_table = None;

        let mut fragments = C::new();

        for token in dataset {
            match token.context(ReadTokenSnafu)? {
                DataToken::OffsetTable(table) => {
                    offset_table = Some(table);
                }
                DataToken::ItemValue(data) => {
                    fragments.push(data);
                }
                DataToken::ItemEnd => {
                    // at the end of the first item ensure the presence of
                    // an empty offset_table here, so that the next items
                    // are seen as compressed fragments
                    if offset_table.is_none() {
                        offset_table = Some(Vec::new())
                    }
                }
                DataToken::ItemStart { len: _ } => { /* no-op */ }
                DataToken::SequenceEnd => {
                    // end of pixel data
                    return Ok(Value::PixelSequence(PixelFragmentSequence::new(
                        offset_table.unwrap_or_default(),
                        fragments,
                    )));
                }
                // the following variants are unexpected
                token @ DataToken::ElementHeader(_)
                | token @ DataToken::PixelSequenceStart
                | token @ DataToken::SequenceStart { .. }
                | token @ DataToken::PrimitiveValue(_) => {
                    return UnexpectedTokenSnafu { token }.fail();
                }
            }
        }

        // iterator fully consumed without a sequence delimiter
        PrematureEndSnafu.fail()
    }

    /// Build a DICOM sequence by consuming a data set parser.
    fn build_sequence<I: ?Sized>(dataset: &mut I, dict: &D) -> Result<C<InMemDicomObject<D>>>
    where
        I: Iterator<Item = ParserResult<DataToken>>,
    {
        let mut items: C<_> = C::new();
        while let Some(token) = dataset.next() {
            match token.context(ReadTokenSnafu)? {
                DataToken::ItemStart { len } => {
                    items.push(Self::build_object(
                        &mut *dataset,
                        dict.clone(),
                        true,
                        len,
                        None,
                    )?);
                }
                DataToken::SequenceEnd => {
                    return Ok(items);
                }
                token => return UnexpectedTokenSnafu { token }.fail(),
            };
        }

        // iterator fully consumed without a sequence delimiter
        PrematureEndSnafu.fail()
    }

    fn lookup_name(&self, name: &str) -> Result<Tag, AccessByNameError> {
        self.dict
            .parse_tag(name)
            .context(NoSuchAttributeNameSnafu { name })
    }
}

impl<'a, D> IntoIterator for &'a InMemDicomObject<D> {
    type Item = &'a InMemElement<D>;
    type IntoIter = std::slice::Iter<'a, InMemElement<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<D> IntoIterator for InMemDicomObject<D> {
    type Item = InMemElement<D>;
    type IntoIter = std::vec::IntoIter<InMemElement<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<D> Extend<InMemElement<D>> for InMemDicomObject<D>
where
    D: DataDictionary,
    D: Clone,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = InMemElement<D>>,
    {
        for elt in iter {
            self.put(elt);
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use dicom_lite_core::value::PrimitiveValue;
    use dicom_lite_dictionary_std::tags;
    use dicom_lite_transfer_syntax_registry::entries;
    use smallvec::smallvec;

    fn assert_obj_eq<D>(obj1: &InMemDicomObject<D>, obj2: &InMemDicomObject<D>)
    where
        D: std::fmt::Debug,
    {
        // debug representation because it makes a stricter comparison and
        // assumes that Undefined lengths are equal.
        assert_eq!(format!("{:?}", obj1.entries), format!("{:?}", obj2.entries))
    }

    fn primitive(tag: Tag, vr: VR, len: u32, value: PrimitiveValue) -> InMemElement {
        DataElement::new(DataElementHeader::new(tag, vr, Length(len)), Value::Primitive(value))
    }

    #[test]
    fn inmem_object_read_dataset() {
        #[rustfmt::skip]
        let data_in = [
            0x10, 0x00, 0x10, 0x00, // Tag(0x0010, 0x0010)
            0x08, 0x00, 0x00, 0x00, // Length: 8
            b'D', b'o', b'e', b'^', b'J', b'o', b'h', b'n',
        ];

        let obj = InMemDicomObject::read_dataset_with_ts(
            ByteCursor::new(&data_in),
            &entries::IMPLICIT_VR_LITTLE_ENDIAN,
        )
        .unwrap();

        let mut gt = InMemDicomObject::new_empty();
        gt.put(primitive(
            Tag(0x0010, 0x0010),
            VR::PN,
            8,
            PrimitiveValue::new_string("Doe^John"),
        ));

        assert_eq!(obj, gt);
    }

    #[test]
    fn inmem_object_metadata_accessors() {
        #[rustfmt::skip]
        let data_in: &[u8] = &[
            // (0010,0020) LO "ID0001"
            0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x06, 0x00,
            b'I', b'D', b'0', b'0', b'0', b'1',
            // (0028,0008) IS "3 "
            0x28, 0x00, 0x08, 0x00, b'I', b'S', 0x02, 0x00, b'3', b' ',
            // (0028,0010) US 512
            0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, 0x00, 0x02,
            // (0028,0030) DS "0.5\0.25"
            0x28, 0x00, 0x30, 0x00, b'D', b'S', 0x08, 0x00,
            b'0', b'.', b'5', b'\\', b'0', b'.', b'2', b'5',
            // (0028,1053) FD 2.0
            0x28, 0x00, 0x53, 0x10, b'F', b'D', 0x08, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x40,
        ];

        let obj = InMemDicomObject::read_dataset_with_ts(
            ByteCursor::new(data_in),
            &entries::EXPLICIT_VR_LITTLE_ENDIAN,
        )
        .unwrap();

        assert_eq!(obj.string(tags::PATIENT_ID).as_deref(), Some("ID0001"));
        assert_eq!(obj.int(tags::NUMBER_OF_FRAMES), Some(3));
        assert_eq!(obj.int(tags::ROWS), Some(512));
        assert_eq!(obj.real(tags::ROWS), Some(512.0));
        assert_eq!(obj.reals(tags::PIXEL_SPACING), Some(vec![0.5, 0.25]));
        assert_eq!(
            obj.strings(tags::PIXEL_SPACING),
            Some(vec!["0.5".to_string(), "0.25".to_string()])
        );
        assert_eq!(obj.real(tags::RESCALE_SLOPE), Some(2.0));

        // absent elements
        assert_eq!(obj.string(tags::PATIENT_NAME), None);
        assert_eq!(obj.int(tags::COLUMNS), None);
        assert_eq!(obj.real(tags::RESCALE_INTERCEPT), None);
        // values which cannot be converted
        assert_eq!(obj.int(tags::PATIENT_ID), None);
        assert_eq!(obj.ints(tags::PIXEL_SPACING), None);

        assert!(obj.element(tags::PATIENT_NAME).is_err());
        assert_eq!(
            obj.tags().collect::<Vec<_>>(),
            vec![
                tags::PATIENT_ID,
                tags::NUMBER_OF_FRAMES,
                tags::ROWS,
                tags::PIXEL_SPACING,
                tags::RESCALE_SLOPE,
            ]
        );
    }

    #[test]
    fn inmem_object_get_by_name() {
        let mut obj = InMemDicomObject::new_empty();
        let patient_name = primitive(
            Tag(0x0010, 0x0010),
            VR::PN,
            8,
            PrimitiveValue::new_string("Doe^John"),
        );
        obj.put(patient_name.clone());

        assert_eq!(obj.element_by_name("PatientName").unwrap(), &patient_name);
        assert_eq!(obj.element_by_name("(0010,0010)").unwrap(), &patient_name);
        assert!(matches!(
            obj.element_by_name("PatientID"),
            Err(AccessByNameError::NoSuchDataElementAlias { .. })
        ));
        assert!(matches!(
            obj.element_by_name("NotAnAttribute"),
            Err(AccessByNameError::NoSuchAttributeName { .. })
        ));
    }

    #[test]
    fn inmem_object_keeps_file_order_and_last_write() {
        let mut obj = InMemDicomObject::new_empty();
        obj.put(primitive(tags::ROWS, VR::US, 2, PrimitiveValue::new_u16(1)));
        obj.put(primitive(tags::PATIENT_ID, VR::LO, 2, PrimitiveValue::new_string("A")));
        let old = obj.put(primitive(tags::ROWS, VR::US, 2, PrimitiveValue::new_u16(2)));

        assert_eq!(
            old.and_then(|e| e.into_value().into_primitive()),
            Some(PrimitiveValue::new_u16(1))
        );
        assert_eq!(obj.int(tags::ROWS), Some(2));
        assert_eq!(
            obj.iter().map(|e| e.tag()).collect::<Vec<_>>(),
            vec![tags::ROWS, tags::PATIENT_ID]
        );
    }

    #[test]
    fn inmem_deep_object_from_tokens() {
        let obj_1 = InMemDicomObject::from_element_iter(vec![
            primitive(Tag(0x0018, 0x6012), VR::US, 2, PrimitiveValue::new_u16(1)),
            primitive(Tag(0x0018, 0x6014), VR::US, 2, PrimitiveValue::new_u16(2)),
        ]);

        let obj_2 = InMemDicomObject::from_element_iter(vec![primitive(
            Tag(0x0018, 0x6012),
            VR::US,
            2,
            PrimitiveValue::new_u16(4),
        )]);

        let gt_obj = InMemDicomObject::from_element_iter(vec![
            DataElement::new(
                DataElementHeader::new(Tag(0x0018, 0x6011), VR::SQ, Length::UNDEFINED),
                Value::Sequence(DataSetSequence::new(
                    C::from_vec(vec![obj_1, obj_2]),
                    Length::UNDEFINED,
                )),
            ),
            primitive(
                Tag(0x0020, 0x4000),
                VR::LT,
                4,
                PrimitiveValue::Str("TEST".into()),
            ),
        ]);

        let tokens: Vec<_> = vec![
            DataToken::SequenceStart {
                tag: Tag(0x0018, 0x6011),
                len: Length::UNDEFINED,
            },
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0018, 0x6012),
                vr: VR::US,
                len: Length(2),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::U16(smallvec![1])),
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0018, 0x6014),
                vr: VR::US,
                len: Length(2),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::U16(smallvec![2])),
            DataToken::ItemEnd,
            DataToken::ItemStart {
                len: Length::UNDEFINED,
            },
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0018, 0x6012),
                vr: VR::US,
                len: Length(2),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::U16(smallvec![4])),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
            DataToken::ElementHeader(DataElementHeader {
                tag: Tag(0x0020, 0x4000),
                vr: VR::LT,
                len: Length(4),
            }),
            DataToken::PrimitiveValue(PrimitiveValue::Str("TEST".into())),
        ];

        let obj = InMemDicomObject::build_object(
            &mut tokens.into_iter().map(Result::Ok),
            StandardDataDictionary,
            false,
            Length::UNDEFINED,
            None,
        )
        .unwrap();

        assert_obj_eq(&obj, &gt_obj);

        let items = obj
            .element(Tag(0x0018, 0x6011))
            .unwrap()
            .value()
            .items()
            .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].int(Tag(0x0018, 0x6012)), Some(4));
    }

    #[test]
    fn inmem_encapsulated_pixel_data_from_tokens() {
        let gt_obj = InMemDicomObject::from_element_iter(vec![DataElement::new(
            DataElementHeader::new(Tag::PIXEL_DATA, VR::OB, Length::UNDEFINED),
            Value::PixelSequence(PixelFragmentSequence::new(
                C::<u32>::new(),
                C::from_vec(vec![vec![0x33; 32]]),
            )),
        )]);

        let tokens: Vec<_> = vec![
            DataToken::PixelSequenceStart,
            DataToken::ItemStart { len: Length(0) },
            DataToken::ItemEnd,
            DataToken::ItemStart { len: Length(32) },
            DataToken::ItemValue(vec![0x33; 32]),
            DataToken::ItemEnd,
            DataToken::SequenceEnd,
        ];

        let obj = InMemDicomObject::build_object(
            &mut tokens.into_iter().map(Result::Ok),
            StandardDataDictionary,
            false,
            Length::UNDEFINED,
            None,
        )
        .unwrap();

        assert_obj_eq(&obj, &gt_obj);
    }

    #[test]
    fn unterminated_pixel_sequence_is_rejected() {
        let tokens: Vec<_> = vec![
            DataToken::PixelSequenceStart,
            DataToken::ItemStart { len: Length(0) },
            DataToken::ItemEnd,
            DataToken::ItemStart { len: Length(2) },
            DataToken::ItemValue(vec![0x33; 2]),
            DataToken::ItemEnd,
        ];

        let err = InMemDicomObject::build_object(
            &mut tokens.into_iter().map(Result::Ok),
            StandardDataDictionary,
            false,
            Length::UNDEFINED,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, crate::ReadError::PrematureEnd { .. }));
    }

    #[test]
    fn read_until_stops_before_the_tag() {
        #[rustfmt::skip]
        let data_in: &[u8] = &[
            // (0028,0010) US 2
            0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, 0x02, 0x00,
            // (7FE0,0010) OW 2 bytes
            0xE0, 0x7F, 0x10, 0x00, b'O', b'W', 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0xAA, 0xBB,
        ];

        let obj = InMemDicomObject::read_dataset_with_options(
            ByteCursor::new(data_in),
            StandardDataDictionary,
            &entries::EXPLICIT_VR_LITTLE_ENDIAN,
            DataSetReaderOptions::default(),
            Some(tags::PIXEL_DATA),
        )
        .unwrap();
        assert_eq!(obj.int(tags::ROWS), Some(2));
        assert!(obj.element_opt(tags::PIXEL_DATA).is_none());

        let obj = InMemDicomObject::read_dataset_with_ts(
            ByteCursor::new(data_in),
            &entries::EXPLICIT_VR_LITTLE_ENDIAN,
        )
        .unwrap();
        assert_eq!(
            obj.element(tags::PIXEL_DATA).unwrap().value().to_bytes().unwrap(),
            &[0xAA, 0xBB]
        );
    }

    #[test]
    fn truncated_data_set_yields_no_object() {
        #[rustfmt::skip]
        let data_in: &[u8] = &[
            // (0010,0020) LO "ID0001"
            0x10, 0x00, 0x20, 0x00, b'L', b'O', 0x06, 0x00,
            b'I', b'D', b'0', b'0', b'0', b'1',
            // (0028,0010) US, value cut short
            0x28, 0x00, 0x10, 0x00, b'U', b'S', 0x02, 0x00, 0x00,
        ];

        let result = InMemDicomObject::read_dataset_with_ts(
            ByteCursor::new(data_in),
            &entries::EXPLICIT_VR_LITTLE_ENDIAN,
        );
        assert!(matches!(result, Err(crate::ReadError::ReadToken { .. })));
    }
}
