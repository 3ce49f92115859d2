use dicom_lite_core::dictionary::DataDictionary;
use dicom_lite_core::Tag;
use dicom_lite_dictionary_std::StandardDataDictionary;
use dicom_lite_encoding::ByteCursor;
use dicom_lite_parser::DataSetReaderOptions;
use snafu::ResultExt;
use std::path::Path;
use tracing::debug;

use crate::mem::InMemDicomObject;
use crate::meta::FileMetaTable;
use crate::{
    DefaultDicomObject, FileDicomObject, OpenFileSnafu, ParseMetaDataSetSnafu,
    ReadPreambleBytesSnafu, Result,
};

/// The size of the file preamble in bytes.
const PREAMBLE_LENGTH: usize = 128;

/// Create a DICOM object from a file.
///
/// This function assumes the standard file encoding structure: 128-byte
/// preamble, file meta group, and the rest of the data set.
pub fn open_file<P>(path: P) -> Result<DefaultDicomObject>
where
    P: AsRef<Path>,
{
    OpenFileOptions::new().open_file(path)
}

/// Create a DICOM object from a byte buffer.
///
/// Like [`open_file`], this function expects the 128-byte preamble.
pub fn from_bytes(data: &[u8]) -> Result<DefaultDicomObject> {
    OpenFileOptions::new().from_bytes(data)
}

/// A builder type for opening a DICOM file with additional options.
///
/// This builder exposes additional properties
/// to configure the reading of a DICOM file.
///
/// # Example
///
/// Create a `OpenFileOptions`,
/// call adaptor methods in a chain,
/// and finish the operation with [`.open_file()`](OpenFileOptions::open_file).
///
/// ```no_run
/// # use dicom_lite_object::{OpenFileOptions, ReadPreamble};
/// let file = OpenFileOptions::new()
///     .read_preamble(ReadPreamble::Auto)
///     .read_until(dicom_lite_dictionary_std::tags::PIXEL_DATA)
///     .open_file("path/to/file.dcm")?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct OpenFileOptions<D = StandardDataDictionary> {
    data_dictionary: D,
    read_until: Option<Tag>,
    read_preamble: ReadPreamble,
    reader_options: DataSetReaderOptions,
}

impl OpenFileOptions {
    pub fn new() -> Self {
        OpenFileOptions::default()
    }
}

impl<D> OpenFileOptions<D> {
    /// Set the operation to read only until the given tag is found.
    ///
    /// The reading process ends immediately after this tag,
    /// or any other tag that is next in the standard DICOM tag ordering,
    /// is found in the object's root data set.
    /// An element with the exact tag will be excluded from the output.
    pub fn read_until(mut self, tag: Tag) -> Self {
        self.read_until = Some(tag);
        self
    }

    /// Set the operation to read all elements of the data set to the end.
    ///
    /// This is the default behavior.
    pub fn read_all(mut self) -> Self {
        self.read_until = None;
        self
    }

    /// Set whether to read the 128-byte DICOM file preamble.
    pub fn read_preamble(mut self, option: ReadPreamble) -> Self {
        self.read_preamble = option;
        self
    }

    /// Set the maximum nesting depth of sequences in the data set.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.reader_options = self.reader_options.max_depth(max_depth);
        self
    }

    /// Set the data element dictionary to the given dictionary,
    /// which should be used for looking up attributes by name.
    pub fn dictionary<DNew>(self, dict: DNew) -> OpenFileOptions<DNew> {
        OpenFileOptions {
            data_dictionary: dict,
            read_until: self.read_until,
            read_preamble: self.read_preamble,
            reader_options: self.reader_options,
        }
    }

    /// Open the file at the given path.
    ///
    /// The whole file is loaded into memory before parsing.
    pub fn open_file<P>(self, path: P) -> Result<FileDicomObject<InMemDicomObject<D>>>
    where
        P: AsRef<Path>,
        D: DataDictionary,
        D: Clone,
    {
        let path = path.as_ref();
        let data = std::fs::read(path).context(OpenFileSnafu { filename: path })?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        self.from_bytes(&data)
    }

    /// Obtain a DICOM object from a buffer holding a full DICOM file.
    ///
    /// The object owns its values,
    /// so the buffer can be discarded afterwards.
    pub fn from_bytes(self, data: &[u8]) -> Result<FileDicomObject<InMemDicomObject<D>>>
    where
        D: DataDictionary,
        D: Clone,
    {
        let mut cursor = ByteCursor::new(data);
        if self.read_preamble.should_skip(data) {
            cursor.skip(PREAMBLE_LENGTH).context(ReadPreambleBytesSnafu)?;
        }

        let meta = FileMetaTable::read_from(&mut cursor).context(ParseMetaDataSetSnafu)?;
        let ts = dicom_lite_transfer_syntax_registry::resolve(meta.transfer_syntax());
        debug!("Data set encoded in {} ({})", ts.name(), ts.uid());

        let dataset = InMemDicomObject::read_dataset_with_options(
            cursor,
            self.data_dictionary.clone(),
            ts,
            self.reader_options,
            self.read_until,
        )?;

        // meta group elements come first, as they do in the file
        let mut obj = InMemDicomObject::from_iter_with_dict(
            meta.to_element_iter(),
            self.data_dictionary,
        );
        obj.extend(dataset);

        Ok(FileDicomObject { meta, obj })
    }
}

/// An enumerate of supported options for
/// whether to read the 128-byte DICOM file preamble.
#[derive(Debug, Default, Copy, Clone, Eq, Hash, PartialEq)]
pub enum ReadPreamble {
    /// Always read the preamble.
    #[default]
    Always,
    /// Never read the preamble,
    /// thus assuming that the original source does not have it.
    Never,
    /// Try to detect whether the preamble is present:
    /// it is skipped if the magic code follows 128 bytes of data,
    /// or if the data does not start with the magic code.
    Auto,
}

impl ReadPreamble {
    fn should_skip(self, data: &[u8]) -> bool {
        match self {
            ReadPreamble::Always => true,
            ReadPreamble::Never => false,
            ReadPreamble::Auto => {
                data.get(PREAMBLE_LENGTH..PREAMBLE_LENGTH + 4) == Some(b"DICM")
                    || !data.starts_with(b"DICM")
            }
        }
    }
}
