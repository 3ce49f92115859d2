//! Module containing data structures and readers of DICOM file meta information tables.
use dicom_lite_core::header::{DataElement, DataElementHeader, HasLength, Header};
use dicom_lite_core::value::{PrimitiveValue, Value};
use dicom_lite_core::{Length, Tag, VR};
use dicom_lite_dictionary_std::tags;
use dicom_lite_encoding::cursor::{self, ByteCursor};
use dicom_lite_encoding::decode::{self, Decode};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use tracing::{debug, warn};

const DICM_MAGIC_CODE: [u8; 4] = [b'D', b'I', b'C', b'M'];

#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The file meta group parser could not read
    /// the magic code `DICM` from its source.
    #[snafu(display("Could not start reading DICOM data"))]
    ReadMagicCode {
        #[snafu(backtrace)]
        source: cursor::Error,
    },

    /// The file meta group parser could not fetch
    /// the value of a data element from its source.
    #[snafu(display("Could not read value data of {}", tag))]
    ReadValueData {
        tag: Tag,
        #[snafu(backtrace)]
        source: cursor::Error,
    },

    /// Invalid DICOM data, detected from checking the `DICM` code.
    #[snafu(display("Invalid DICOM data: magic code `DICM` not found at offset {}", position))]
    NotDicom { position: usize, backtrace: Backtrace },

    /// An issue occurred while decoding the next data element
    /// in the file meta data set.
    #[snafu(display("Could not decode data element"))]
    DecodeElement {
        #[snafu(backtrace)]
        source: decode::Error,
    },

    /// A data element with an unexpected tag was retrieved:
    /// the parser was expecting an element of the file meta group.
    #[snafu(display("Unexpected data element tagged {}", tag))]
    UnexpectedTag { tag: Tag, backtrace: Backtrace },

    /// A required file meta data element is missing.
    #[snafu(display("Missing data element `{}`", alias))]
    MissingElement {
        alias: &'static str,
        backtrace: Backtrace,
    },

    /// The value length of a data elements in the file meta group
    /// was unexpected.
    #[snafu(display("Unexpected length {} for data element tagged {}", length, tag))]
    UnexpectedDataValueLength {
        tag: Tag,
        length: Length,
        backtrace: Backtrace,
    },

    /// The value length of a data element is undefined,
    /// but knowing the length is required in its context.
    #[snafu(display("Undefined value length for data element tagged {}", tag))]
    UndefinedValueLength { tag: Tag, backtrace: Backtrace },

    /// The elements of the group do not add up
    /// to the declared group length.
    #[snafu(display(
        "Inconsistent file meta group length: declared {} bytes but elements span {}",
        group_length,
        bytes_read
    ))]
    InconsistentGroupLength {
        group_length: u32,
        bytes_read: usize,
        backtrace: Backtrace,
    },
}

type Result<T, E = Error> = std::result::Result<T, E>;

/// DICOM File Meta Information Table.
///
/// This data type contains the relevant parts of the file meta information table, as
/// specified in [1].
///
/// Text values are kept as found in the file, padding included.
/// Use the accessor methods to obtain trimmed values.
///
/// [1]: http://dicom.nema.org/medical/dicom/current/output/chtml/part06/chapter_7.html
#[derive(Debug, Clone, PartialEq)]
pub struct FileMetaTable {
    /// File Meta Information Group Length
    pub information_group_length: u32,
    /// File Meta Information Version
    pub information_version: [u8; 2],
    /// Media Storage SOP Class UID
    pub media_storage_sop_class_uid: Option<String>,
    /// Media Storage SOP Instance UID
    pub media_storage_sop_instance_uid: Option<String>,
    /// Transfer Syntax UID
    pub transfer_syntax: String,
    /// Implementation Class UID
    pub implementation_class_uid: Option<String>,

    /// Implementation Version Name
    pub implementation_version_name: Option<String>,
    /// Source Application Entity Title
    pub source_application_entity_title: Option<String>,
    /// Sending Application Entity Title
    pub sending_application_entity_title: Option<String>,
    /// Receiving Application Entity Title
    pub receiving_application_entity_title: Option<String>,
}

/// Utility function for reading the body of a DICOM element as text.
fn read_str_body(cursor: &mut ByteCursor<'_>, tag: Tag, len: u32) -> Result<String> {
    let data = cursor
        .read_bytes(len as usize)
        .context(ReadValueDataSnafu { tag })?;
    Ok(String::from_utf8_lossy(data).into_owned())
}

fn trim_uid(uid: &str) -> &str {
    uid.trim_end_matches(|c: char| c == '\0' || c == ' ')
}

impl FileMetaTable {
    /// Read the file meta group from the given cursor,
    /// which should be positioned at the `DICM` magic code.
    ///
    /// On success, the cursor is left at the first byte
    /// of the main data set.
    pub fn read_from(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let magic_position = cursor.position();
        let magic = cursor.read_bytes(4).context(ReadMagicCodeSnafu)?;
        ensure!(
            magic == DICM_MAGIC_CODE,
            NotDicomSnafu {
                position: magic_position
            }
        );

        let decoder = decode::file_header_decoder();
        let mut builder = FileMetaTableBuilder::new();

        let first = decoder.decode_header(cursor).context(DecodeElementSnafu)?;
        let group_length = if first.tag() == tags::FILE_META_INFORMATION_GROUP_LENGTH {
            ensure!(
                first.length() == Length(4),
                UnexpectedDataValueLengthSnafu {
                    tag: first.tag(),
                    length: first.length(),
                }
            );
            let group_length = cursor
                .read_u32(decoder.endianness())
                .context(ReadValueDataSnafu { tag: first.tag() })?;
            builder = builder.group_length(group_length);
            Some(group_length)
        } else {
            warn!(
                "File meta group does not start with its group length, found {} instead",
                first.tag()
            );
            builder = Self::read_element(cursor, first, builder)?;
            None
        };

        let start = cursor.position();
        loop {
            match group_length {
                Some(group_length) => {
                    let bytes_read = cursor.position() - start;
                    ensure!(
                        bytes_read <= group_length as usize,
                        InconsistentGroupLengthSnafu {
                            group_length,
                            bytes_read,
                        }
                    );
                    if bytes_read == group_length as usize {
                        break;
                    }
                }
                None => {
                    // without a group length, read while the group lasts
                    let next_group = cursor
                        .peek_bytes(2)
                        .map(|b| u16::from_le_bytes([b[0], b[1]]))
                        .unwrap_or(0);
                    if next_group != 0x0002 {
                        break;
                    }
                }
            }

            let header = decoder.decode_header(cursor).context(DecodeElementSnafu)?;
            builder = Self::read_element(cursor, header, builder)?;
        }

        let table = builder.build()?;
        debug!(
            "Read file meta group of {} bytes, transfer syntax {}",
            table.information_group_length,
            table.transfer_syntax()
        );
        Ok(table)
    }

    fn read_element(
        cursor: &mut ByteCursor<'_>,
        header: DataElementHeader,
        builder: FileMetaTableBuilder,
    ) -> Result<FileMetaTableBuilder> {
        let tag = header.tag();
        ensure!(tag.group() == 0x0002, UnexpectedTagSnafu { tag });
        let len = header
            .length()
            .get()
            .context(UndefinedValueLengthSnafu { tag })?;

        Ok(match tag {
            tags::FILE_META_INFORMATION_VERSION => {
                ensure!(
                    len == 2,
                    UnexpectedDataValueLengthSnafu {
                        tag,
                        length: header.length(),
                    }
                );
                let data = cursor.read_bytes(2).context(ReadValueDataSnafu { tag })?;
                builder.information_version([data[0], data[1]])
            }
            tags::MEDIA_STORAGE_SOP_CLASS_UID => {
                builder.media_storage_sop_class_uid(read_str_body(cursor, tag, len)?)
            }
            tags::MEDIA_STORAGE_SOP_INSTANCE_UID => {
                builder.media_storage_sop_instance_uid(read_str_body(cursor, tag, len)?)
            }
            tags::TRANSFER_SYNTAX_UID => builder.transfer_syntax(read_str_body(cursor, tag, len)?),
            tags::IMPLEMENTATION_CLASS_UID => {
                builder.implementation_class_uid(read_str_body(cursor, tag, len)?)
            }
            tags::IMPLEMENTATION_VERSION_NAME => {
                builder.implementation_version_name(read_str_body(cursor, tag, len)?)
            }
            tags::SOURCE_APPLICATION_ENTITY_TITLE => {
                builder.source_application_entity_title(read_str_body(cursor, tag, len)?)
            }
            tags::SENDING_APPLICATION_ENTITY_TITLE => {
                builder.sending_application_entity_title(read_str_body(cursor, tag, len)?)
            }
            tags::RECEIVING_APPLICATION_ENTITY_TITLE => {
                builder.receiving_application_entity_title(read_str_body(cursor, tag, len)?)
            }
            _ => {
                warn!("Ignoring unsupported file meta element {}", tag);
                cursor
                    .skip(len as usize)
                    .context(ReadValueDataSnafu { tag })?;
                builder
            }
        })
    }

    /// The transfer syntax UID, without trailing padding.
    pub fn transfer_syntax(&self) -> &str {
        trim_uid(&self.transfer_syntax)
    }

    /// The media storage SOP class UID, without trailing padding.
    pub fn media_storage_sop_class_uid(&self) -> Option<&str> {
        self.media_storage_sop_class_uid.as_deref().map(trim_uid)
    }

    /// The media storage SOP instance UID, without trailing padding.
    pub fn media_storage_sop_instance_uid(&self) -> Option<&str> {
        self.media_storage_sop_instance_uid.as_deref().map(trim_uid)
    }

    /// The implementation class UID, without trailing padding.
    pub fn implementation_class_uid(&self) -> Option<&str> {
        self.implementation_class_uid.as_deref().map(trim_uid)
    }

    /// Create an iterator over the defined data elements of the table,
    /// in tag order.
    pub fn to_element_iter<I, P>(&self) -> impl Iterator<Item = DataElement<I, P>> {
        fn text_element<I, P>(tag: Tag, vr: VR, value: &str) -> DataElement<I, P> {
            DataElement::new(
                DataElementHeader::new(tag, vr, Length(value.len() as u32)),
                Value::Primitive(PrimitiveValue::new_string(value)),
            )
        }

        let mut elems = vec![
            DataElement::new(
                DataElementHeader::new(tags::FILE_META_INFORMATION_GROUP_LENGTH, VR::UL, Length(4)),
                Value::Primitive(PrimitiveValue::new_u32(self.information_group_length)),
            ),
            DataElement::new(
                DataElementHeader::new(tags::FILE_META_INFORMATION_VERSION, VR::OB, Length(2)),
                Value::Primitive(PrimitiveValue::U8(self.information_version.iter().copied().collect())),
            ),
        ];

        let optional_uids = [
            (tags::MEDIA_STORAGE_SOP_CLASS_UID, VR::UI, &self.media_storage_sop_class_uid),
            (tags::MEDIA_STORAGE_SOP_INSTANCE_UID, VR::UI, &self.media_storage_sop_instance_uid),
        ];
        elems.extend(
            optional_uids
                .iter()
                .filter_map(|&(tag, vr, v)| v.as_ref().map(|v| text_element(tag, vr, v))),
        );
        elems.push(text_element(
            tags::TRANSFER_SYNTAX_UID,
            VR::UI,
            &self.transfer_syntax,
        ));

        let optional = [
            (tags::IMPLEMENTATION_CLASS_UID, VR::UI, &self.implementation_class_uid),
            (tags::IMPLEMENTATION_VERSION_NAME, VR::SH, &self.implementation_version_name),
            (tags::SOURCE_APPLICATION_ENTITY_TITLE, VR::AE, &self.source_application_entity_title),
            (tags::SENDING_APPLICATION_ENTITY_TITLE, VR::AE, &self.sending_application_entity_title),
            (
                tags::RECEIVING_APPLICATION_ENTITY_TITLE,
                VR::AE,
                &self.receiving_application_entity_title,
            ),
        ];
        elems.extend(
            optional
                .iter()
                .filter_map(|&(tag, vr, v)| v.as_ref().map(|v| text_element(tag, vr, v))),
        );

        elems.into_iter()
    }
}

/// A builder for DICOM meta information tables.
#[derive(Debug, Default, Clone)]
pub struct FileMetaTableBuilder {
    /// File Meta Information Group Length (UL)
    information_group_length: Option<u32>,
    /// File Meta Information Version (OB)
    information_version: Option<[u8; 2]>,
    /// Media Storage SOP Class UID (UI)
    media_storage_sop_class_uid: Option<String>,
    /// Media Storage SOP Instance UID (UI)
    media_storage_sop_instance_uid: Option<String>,
    /// Transfer Syntax UID (UI)
    transfer_syntax: Option<String>,
    /// Implementation Class UID (UI)
    implementation_class_uid: Option<String>,

    /// Implementation Version Name (SH)
    implementation_version_name: Option<String>,
    /// Source Application Entity Title (AE)
    source_application_entity_title: Option<String>,
    /// Sending Application Entity Title (AE)
    sending_application_entity_title: Option<String>,
    /// Receiving Application Entity Title (AE)
    receiving_application_entity_title: Option<String>,
}

/// Ensure that the string is even lengthed, by adding a trailing character
/// if not.
#[inline]
fn padded<T>(s: T, pad: char) -> String
where
    T: Into<String>,
{
    let mut s = s.into();
    if s.len() % 2 == 1 {
        s.push(pad);
    }
    s
}

/// Ensure that the string is even lengthed with trailing '\0's.
fn ui_padded<T>(s: T) -> String
where
    T: Into<String>,
{
    padded(s, '\0')
}

/// Ensure that the string is even lengthed with trailing spaces.
fn txt_padded<T>(s: T) -> String
where
    T: Into<String>,
{
    padded(s, ' ')
}

impl FileMetaTableBuilder {
    /// Create a new, empty builder.
    pub fn new() -> FileMetaTableBuilder {
        FileMetaTableBuilder::default()
    }

    /// Define the meta header group length.
    pub fn group_length(mut self, value: u32) -> FileMetaTableBuilder {
        self.information_group_length = Some(value);
        self
    }

    /// Define the meta information version.
    pub fn information_version(mut self, value: [u8; 2]) -> FileMetaTableBuilder {
        self.information_version = Some(value);
        self
    }

    /// Define the media storage SOP class UID.
    pub fn media_storage_sop_class_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.media_storage_sop_class_uid = Some(ui_padded(value));
        self
    }

    /// Define the media storage SOP instance UID.
    pub fn media_storage_sop_instance_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.media_storage_sop_instance_uid = Some(ui_padded(value));
        self
    }

    /// Define the transfer syntax UID.
    pub fn transfer_syntax<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.transfer_syntax = Some(ui_padded(value));
        self
    }

    /// Define the implementation class UID.
    pub fn implementation_class_uid<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.implementation_class_uid = Some(ui_padded(value));
        self
    }

    /// Define the implementation version name.
    pub fn implementation_version_name<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.implementation_version_name = Some(txt_padded(value));
        self
    }

    /// Define the source application entity title.
    pub fn source_application_entity_title<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.source_application_entity_title = Some(txt_padded(value));
        self
    }

    /// Define the sending application entity title.
    pub fn sending_application_entity_title<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.sending_application_entity_title = Some(txt_padded(value));
        self
    }

    /// Define the receiving application entity title.
    pub fn receiving_application_entity_title<T>(mut self, value: T) -> FileMetaTableBuilder
    where
        T: Into<String>,
    {
        self.receiving_application_entity_title = Some(txt_padded(value));
        self
    }

    /// Build the table.
    ///
    /// Only the transfer syntax is required.
    pub fn build(self) -> Result<FileMetaTable> {
        let transfer_syntax = self.transfer_syntax.context(MissingElementSnafu {
            alias: "TransferSyntaxUID",
        })?;
        let information_version = self.information_version.unwrap_or_else(|| {
            debug!("Missing file meta information version, assuming [0, 1]");
            [0, 1]
        });
        if self.media_storage_sop_class_uid.is_none() {
            warn!("Missing data element MediaStorageSOPClassUID in file meta group");
        }
        if self.media_storage_sop_instance_uid.is_none() {
            warn!("Missing data element MediaStorageSOPInstanceUID in file meta group");
        }
        if self.implementation_class_uid.is_none() {
            warn!("Missing data element ImplementationClassUID in file meta group");
        }

        fn element_len(value: &Option<String>) -> u32 {
            value.as_ref().map(|s| 8 + s.len() as u32).unwrap_or(0)
        }

        let information_group_length = match self.information_group_length {
            Some(e) => e,
            None => {
                // FileMetaInformationGroupLength is not included here
                14 + 8
                    + transfer_syntax.len() as u32
                    + element_len(&self.media_storage_sop_class_uid)
                    + element_len(&self.media_storage_sop_instance_uid)
                    + element_len(&self.implementation_class_uid)
                    + element_len(&self.implementation_version_name)
                    + element_len(&self.source_application_entity_title)
                    + element_len(&self.sending_application_entity_title)
                    + element_len(&self.receiving_application_entity_title)
            }
        };

        Ok(FileMetaTable {
            information_group_length,
            information_version,
            media_storage_sop_class_uid: self.media_storage_sop_class_uid,
            media_storage_sop_instance_uid: self.media_storage_sop_instance_uid,
            transfer_syntax,
            implementation_class_uid: self.implementation_class_uid,
            implementation_version_name: self.implementation_version_name,
            source_application_entity_title: self.source_application_entity_title,
            sending_application_entity_title: self.sending_application_entity_title,
            receiving_application_entity_title: self.receiving_application_entity_title,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, FileMetaTable, FileMetaTableBuilder};
    use dicom_lite_core::header::Header;
    use dicom_lite_core::value::{PrimitiveValue, Value};
    use dicom_lite_core::{DataElement, Tag, VR};
    use dicom_lite_encoding::ByteCursor;

    #[rustfmt::skip]
    const TEST_META_1: &[u8] = &[
        // magic code
        b'D', b'I', b'C', b'M',
        // File Meta Information Group Length: (0000,0002) ; UL ; 4 ; 200
        0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0xc8, 0x00, 0x00, 0x00,
        // File Meta Information Version: (0002, 0001) ; OB ; 2 ; [0x00, 0x01]
        0x02, 0x00, 0x01, 0x00, b'O', b'B', 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        // Media Storage SOP Class UID (0002, 0002) ; UI ; 26 ; "1.2.840.10008.5.1.4.1.1.1\0" (ComputedRadiographyImageStorage)
        0x02, 0x00, 0x02, 0x00, b'U', b'I', 0x1a, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34, 0x30,
        0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x35, 0x2e, 0x31, 0x2e, 0x34, 0x2e, 0x31, 0x2e,
        0x31, 0x2e, 0x31, 0x00,
        // Media Storage SOP Instance UID (0002, 0003) ; UI ; 56 ; "1.2.3.4.5.12345678.1234567890.1234567.123456789.1234567\0"
        0x02, 0x00, 0x03, 0x00, b'U', b'I', 0x38, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x33, 0x2e, 0x34,
        0x2e, 0x35, 0x2e, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x2e, 0x31, 0x32, 0x33,
        0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x30, 0x2e, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37,
        0x2e, 0x31, 0x32, 0x33, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x2e, 0x31, 0x32, 0x33, 0x34,
        0x35, 0x36, 0x37, 0x00,
        // Transfer Syntax UID (0002, 0010) ; UI ; 20 ; "1.2.840.10008.1.2.1\0" (LittleEndianExplicit)
        0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x38, 0x34, 0x30,
        0x2e, 0x31, 0x30, 0x30, 0x30, 0x38, 0x2e, 0x31, 0x2e, 0x32, 0x2e, 0x31, 0x00,
        // Implementation Class UID (0002, 0012) ; UI ; 20 ; "1.2.345.6.7890.1.234"
        0x02, 0x00, 0x12, 0x00, b'U', b'I', 0x14, 0x00, 0x31, 0x2e, 0x32, 0x2e, 0x33, 0x34, 0x35,
        0x2e, 0x36, 0x2e, 0x37, 0x38, 0x39, 0x30, 0x2e, 0x31, 0x2e, 0x32, 0x33, 0x34,
        // optional elements:

        // Implementation Version Name (0002,0013) ; SH ; "RUSTY_DICOM_269"
        0x02, 0x00, 0x13, 0x00, b'S', b'H', 0x10, 0x00, 0x52, 0x55, 0x53, 0x54, 0x59, 0x5f, 0x44,
        0x49, 0x43, 0x4f, 0x4d, 0x5f, 0x32, 0x36, 0x39, 0x20,
        // Source Application Entity Title (0002, 0016) ; AE ; 0 (no data)
        0x02, 0x00, 0x16, 0x00, b'A', b'E', 0x00, 0x00,
    ];

    fn test_meta_1_table() -> FileMetaTable {
        FileMetaTable {
            information_group_length: 200,
            information_version: [0u8, 1u8],
            media_storage_sop_class_uid: Some("1.2.840.10008.5.1.4.1.1.1\0".to_owned()),
            media_storage_sop_instance_uid: Some(
                "1.2.3.4.5.12345678.1234567890.1234567.123456789.1234567\0".to_owned(),
            ),
            transfer_syntax: "1.2.840.10008.1.2.1\0".to_owned(),
            implementation_class_uid: Some("1.2.345.6.7890.1.234".to_owned()),
            implementation_version_name: Some("RUSTY_DICOM_269 ".to_owned()),
            source_application_entity_title: Some("".to_owned()),
            sending_application_entity_title: None,
            receiving_application_entity_title: None,
        }
    }

    #[test]
    fn read_meta_table_from_cursor() {
        let mut cursor = ByteCursor::new(TEST_META_1);

        let table = FileMetaTable::read_from(&mut cursor).unwrap();

        assert_eq!(table.information_group_length, 200);
        assert_eq!(table.information_version, [0u8, 1u8]);
        assert_eq!(table.transfer_syntax, "1.2.840.10008.1.2.1\0");
        assert_eq!(table.transfer_syntax(), "1.2.840.10008.1.2.1");
        assert_eq!(
            table.media_storage_sop_class_uid(),
            Some("1.2.840.10008.5.1.4.1.1.1")
        );
        assert_eq!(table.implementation_class_uid(), Some("1.2.345.6.7890.1.234"));
        assert_eq!(table.source_application_entity_title, Some("".into()));
        assert_eq!(table.sending_application_entity_title, None);

        assert_eq!(table, test_meta_1_table());

        // the cursor lands right after the group
        assert_eq!(cursor.position(), TEST_META_1.len());
        assert!(cursor.is_empty());
    }

    #[test]
    fn only_the_transfer_syntax_is_required() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            b'D', b'I', b'C', b'M',
            // (0002,0000) UL 4 28
            0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0x1c, 0x00, 0x00, 0x00,
            // (0002,0010) UI 20 "1.2.840.10008.1.2.1\0"
            0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00,
            b'1', b'.', b'2', b'.', b'8', b'4', b'0', b'.', b'1', b'0',
            b'0', b'0', b'8', b'.', b'1', b'.', b'2', b'.', b'1', 0x00,
        ];
        let table = FileMetaTable::read_from(&mut ByteCursor::new(data)).unwrap();
        assert_eq!(table.transfer_syntax(), "1.2.840.10008.1.2.1");
        assert_eq!(table.media_storage_sop_class_uid, None);
        assert_eq!(table.implementation_class_uid, None);
        assert_eq!(table.information_version, [0, 1]);
    }

    #[test]
    fn missing_magic_code_is_rejected() {
        let mut data = TEST_META_1.to_vec();
        data[0..4].copy_from_slice(b"DICN");
        let err = FileMetaTable::read_from(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(err, Error::NotDicom { position: 0, .. }));
    }

    #[test]
    fn missing_transfer_syntax_is_rejected() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            b'D', b'I', b'C', b'M',
            // (0002,0000) UL 4 14
            0x02, 0x00, 0x00, 0x00, b'U', b'L', 0x04, 0x00, 0x0e, 0x00, 0x00, 0x00,
            // (0002,0001) OB 2 [0, 1]
            0x02, 0x00, 0x01, 0x00, b'O', b'B', 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x01,
        ];
        let err = FileMetaTable::read_from(&mut ByteCursor::new(data)).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingElement {
                alias: "TransferSyntaxUID",
                ..
            }
        ));
    }

    #[test]
    fn group_length_ending_inside_an_element_is_rejected() {
        let mut data = TEST_META_1.to_vec();
        // declare 198 bytes instead of 200
        data[12] = 0xc6;
        let err = FileMetaTable::read_from(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(
            err,
            Error::InconsistentGroupLength {
                group_length: 198,
                bytes_read: 200,
                ..
            }
        ));
    }

    #[test]
    fn group_length_beyond_the_group_is_rejected() {
        let mut data = TEST_META_1.to_vec();
        // declare 208 bytes and follow the group with a data set element
        data[12] = 0xd0;
        // (0008,0060) CS 2 "OT"
        data.extend_from_slice(&[0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T']);
        let err = FileMetaTable::read_from(&mut ByteCursor::new(&data)).unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedTag {
                tag: Tag(0x0008, 0x0060),
                ..
            }
        ));
    }

    #[test]
    fn truncated_meta_group_is_rejected() {
        let data = &TEST_META_1[..100];
        let err = FileMetaTable::read_from(&mut ByteCursor::new(data)).unwrap_err();
        assert!(matches!(err, Error::ReadValueData { .. }));
    }

    #[test]
    fn meta_group_without_group_length() {
        #[rustfmt::skip]
        let data: &[u8] = &[
            b'D', b'I', b'C', b'M',
            // (0002,0010) UI 20 "1.2.840.10008.1.2.1\0"
            0x02, 0x00, 0x10, 0x00, b'U', b'I', 0x14, 0x00,
            b'1', b'.', b'2', b'.', b'8', b'4', b'0', b'.', b'1', b'0',
            b'0', b'0', b'8', b'.', b'1', b'.', b'2', b'.', b'1', 0x00,
            // (0008,0060) CS 2 "OT"
            0x08, 0x00, 0x60, 0x00, b'C', b'S', 0x02, 0x00, b'O', b'T',
        ];
        let mut cursor = ByteCursor::new(data);
        let table = FileMetaTable::read_from(&mut cursor).unwrap();
        assert_eq!(table.transfer_syntax(), "1.2.840.10008.1.2.1");
        // 14 bytes for the version plus the transfer syntax element
        assert_eq!(table.information_group_length, 14 + 28);
        assert_eq!(cursor.position(), 32);
    }

    #[test]
    fn create_meta_table_with_builder() {
        let table = FileMetaTableBuilder::new()
            .information_version([0, 1])
            .media_storage_sop_class_uid("1.2.840.10008.5.1.4.1.1.1")
            .media_storage_sop_instance_uid(
                "1.2.3.4.5.12345678.1234567890.1234567.123456789.1234567",
            )
            .transfer_syntax("1.2.840.10008.1.2.1")
            .implementation_class_uid("1.2.345.6.7890.1.234")
            .implementation_version_name("RUSTY_DICOM_269")
            .source_application_entity_title("")
            .build()
            .unwrap();

        assert_eq!(table.information_group_length, 200);
        assert_eq!(table, test_meta_1_table());
    }

    #[test]
    fn meta_table_into_elements() {
        let table = test_meta_1_table();

        let elements: Vec<DataElement> = table.to_element_iter().collect();
        let tags: Vec<Tag> = elements.iter().map(|e| e.tag()).collect();
        assert_eq!(
            tags,
            vec![
                Tag(0x0002, 0x0000),
                Tag(0x0002, 0x0001),
                Tag(0x0002, 0x0002),
                Tag(0x0002, 0x0003),
                Tag(0x0002, 0x0010),
                Tag(0x0002, 0x0012),
                Tag(0x0002, 0x0013),
                Tag(0x0002, 0x0016),
            ]
        );
        assert_eq!(elements[0].vr(), VR::UL);
        assert_eq!(
            elements[0].value(),
            &Value::Primitive(PrimitiveValue::new_u32(200))
        );
        assert_eq!(elements[4].value().to_str().unwrap(), "1.2.840.10008.1.2.1");
        assert_eq!(elements[6].vr(), VR::SH);
    }
}
