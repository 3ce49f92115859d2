//! This crate decodes the pixel data of DICOM files into image frames.
//!
//! Native (uncompressed) pixel data is read as is,
//! while encapsulated pixel data in one of the JPEG lossless
//! transfer syntaxes is decoded by the native codec
//! in `dicom-lite-transfer-syntax-registry`.
//! Other encapsulated transfer syntaxes are reported as unsupported.
//!
//! # Examples
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("image.dcm")?;
//! let frame = dicom_lite_pixeldata::decode(&bytes)?;
//! println!(
//!     "{}x{}, {}-bit, {} samples",
//!     frame.width,
//!     frame.height,
//!     frame.bit_depth,
//!     frame.pixels.len()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Frames other than the first one, as well as file reading options,
//! are set through [`DecodeOptions`]:
//!
//! ```no_run
//! use dicom_lite_object::ReadPreamble;
//! use dicom_lite_pixeldata::DecodeOptions;
//!
//! # fn main() -> Result<(), dicom_lite_pixeldata::Error> {
//! let frame = DecodeOptions::new()
//!     .frame(2)
//!     .read_preamble(ReadPreamble::Auto)
//!     .open_file("multiframe.dcm")?;
//! # Ok(())
//! # }
//! ```
//!
//! Errors can be classified with [`Error::kind`],
//! and most of them come with a [recovery suggestion](Error::recovery_suggestion).
//!
//! Decoding holds no state across calls,
//! so any number of decodes may run concurrently.
//! With the `async` feature, [`decode_async`] runs the decoding
//! on a blocking task of the Tokio runtime.
//! With the `rayon` feature (enabled by default),
//! [`decode_all_frames`] decodes the frames of an image in parallel.
use std::path::Path;

use dicom_lite_core::dictionary::DataDictionary;
use dicom_lite_object::{
    FileDicomObject, InMemDicomObject, OpenFileOptions, ReadError, ReadPreamble,
    StandardDataDictionary,
};
use snafu::{Backtrace, ResultExt, Snafu};

pub mod attribute;
mod extract;
mod frame;

pub use extract::{FrameData, PixelDataExtractor};
pub use frame::ImageFrame;

/// An error which may occur when decoding pixel data.
#[derive(Debug, Snafu)]
#[non_exhaustive]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    /// The file could not be read or parsed.
    #[snafu(display("Could not read DICOM file"))]
    ReadFile {
        #[snafu(backtrace)]
        source: ReadError,
    },
    /// A required image attribute is missing or invalid.
    #[snafu(display("Invalid image attributes"))]
    GetAttribute {
        #[snafu(backtrace)]
        source: attribute::GetAttributeError,
    },
    #[snafu(display("Unsupported transfer syntax {}", uid))]
    UnsupportedTransferSyntax { uid: String, backtrace: Backtrace },
    #[snafu(display("Expected {} pixel data", expected))]
    UnexpectedPixelDataValue {
        expected: &'static str,
        backtrace: Backtrace,
    },
    #[snafu(display("Frame #{} is out of range, the image has {} frame(s)", frame, frames))]
    FrameOutOfRange {
        frame: u32,
        frames: u32,
        backtrace: Backtrace,
    },
    #[snafu(display("Encapsulated pixel data has no fragments"))]
    NoFragments { backtrace: Backtrace },
    #[snafu(display("Could not locate frame #{} among {} fragments", frame, fragments))]
    MissingFragment {
        frame: u32,
        fragments: usize,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Pixel data has {} bytes, but {} frame(s) need {} bytes",
        available,
        frames,
        expected
    ))]
    PixelDataLength {
        expected: usize,
        available: usize,
        frames: u32,
        backtrace: Backtrace,
    },
    /// The image attributes describe more bytes than can be addressed.
    #[snafu(display("Image attributes of {} frame(s) describe too many bytes", frames))]
    ImageTooLarge { frames: u32, backtrace: Backtrace },
    #[snafu(display("Unsupported BitsAllocated {}, expected 8 or 16", bits_allocated))]
    UnsupportedBitsAllocated {
        bits_allocated: u16,
        backtrace: Backtrace,
    },
    #[snafu(display(
        "Unsupported BitsStored {} with BitsAllocated {}",
        bits_stored,
        bits_allocated
    ))]
    UnsupportedBitsStored {
        bits_stored: u16,
        bits_allocated: u16,
        backtrace: Backtrace,
    },
    /// The JPEG lossless stream of a frame could not be decoded.
    #[snafu(display("Could not decode frame #{}", frame))]
    DecodeJpeg {
        frame: u32,
        #[snafu(backtrace)]
        source: dicom_lite_transfer_syntax_registry::adapters::jpeg_lossless::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The broad category of a pixel data decoding error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The file could not be opened.
    FileNotFound,
    /// The file or its pixel data violates the expected structure.
    InvalidFormat,
    /// The data is structurally sound but its content is inconsistent,
    /// such as an unreadable compressed payload.
    FileCorrupted,
    /// The file is valid but uses an encoding which cannot be decoded.
    Unsupported,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ReadFile { source } => match source {
                ReadError::OpenFile { .. } => ErrorKind::FileNotFound,
                ReadError::CreateParser { .. } => ErrorKind::Unsupported,
                _ => ErrorKind::InvalidFormat,
            },
            Error::UnsupportedTransferSyntax { .. }
            | Error::UnsupportedBitsAllocated { .. }
            | Error::UnsupportedBitsStored { .. } => ErrorKind::Unsupported,
            Error::PixelDataLength { .. } => ErrorKind::FileCorrupted,
            Error::DecodeJpeg { source, .. } if source.is_corrupted_payload() => {
                ErrorKind::FileCorrupted
            }
            Error::DecodeJpeg { source, .. } if source.is_unsupported() => ErrorKind::Unsupported,
            _ => ErrorKind::InvalidFormat,
        }
    }

    /// Obtain a suggestion of what to do about this error, if there is one.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::FileNotFound => Some("Verify that the file exists and is readable"),
            ErrorKind::Unsupported => {
                Some("Convert the file to an uncompressed or JPEG lossless transfer syntax")
            }
            ErrorKind::FileCorrupted => {
                Some("The file may be damaged, try obtaining a fresh copy from its source")
            }
            ErrorKind::InvalidFormat => match self {
                Error::ReadFile { .. } => {
                    Some("Check that the file is a DICOM file with a 128-byte preamble")
                }
                Error::FrameOutOfRange { .. } => Some("Select a frame within the image"),
                _ => None,
            },
        }
    }
}

/// A builder type for decoding pixel data with additional options.
///
/// # Example
///
/// ```no_run
/// # use dicom_lite_pixeldata::DecodeOptions;
/// let bytes = std::fs::read("path/to/file.dcm")?;
/// let frame = DecodeOptions::new().frame(1).decode(&bytes)?;
/// # Result::<(), Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Debug, Default, Clone)]
#[non_exhaustive]
pub struct DecodeOptions<D = StandardDataDictionary> {
    /// the index of the frame to decode
    pub frame: u32,
    /// the options for reading the file
    pub open: OpenFileOptions<D>,
}

impl DecodeOptions {
    pub fn new() -> Self {
        DecodeOptions::default()
    }
}

impl<D> DecodeOptions<D>
where
    D: DataDictionary + Clone,
{
    /// Set the index of the frame to decode, starting at 0.
    pub fn frame(mut self, frame: u32) -> Self {
        self.frame = frame;
        self
    }

    /// Set whether to read the 128-byte DICOM file preamble.
    pub fn read_preamble(mut self, option: ReadPreamble) -> Self {
        self.open = self.open.read_preamble(option);
        self
    }

    /// Set the file reading options.
    pub fn open_options<DNew>(self, open: OpenFileOptions<DNew>) -> DecodeOptions<DNew> {
        DecodeOptions {
            frame: self.frame,
            open,
        }
    }

    /// Decode the selected frame of the DICOM file in the given buffer.
    pub fn decode(self, bytes: &[u8]) -> Result<ImageFrame> {
        let frame = self.frame;
        let obj = self.open.from_bytes(bytes).context(ReadFileSnafu)?;
        decode_object(&obj, frame)
    }

    /// Decode the selected frame of the DICOM file at the given path.
    pub fn open_file<P: AsRef<Path>>(self, path: P) -> Result<ImageFrame> {
        let frame = self.frame;
        let obj = self.open.open_file(path).context(ReadFileSnafu)?;
        decode_object(&obj, frame)
    }
}

/// Decode the first frame of the DICOM file in the given buffer.
///
/// The buffer must hold a complete file, starting with the 128-byte preamble.
pub fn decode(bytes: &[u8]) -> Result<ImageFrame> {
    DecodeOptions::new().decode(bytes)
}

/// Decode the first frame of the DICOM file at the given path.
pub fn open_file<P: AsRef<Path>>(path: P) -> Result<ImageFrame> {
    DecodeOptions::new().open_file(path)
}

/// Decode one frame of a DICOM object already in memory.
pub fn decode_object<D>(obj: &FileDicomObject<InMemDicomObject<D>>, frame: u32) -> Result<ImageFrame>
where
    D: DataDictionary + Clone,
{
    PixelDataExtractor::new(obj)?.decode_frame(frame)
}

/// Decode the first frame of the DICOM file in the given buffer
/// on a blocking task of the Tokio runtime.
///
/// The decoding cannot be cancelled once started:
/// dropping the future only discards its result.
#[cfg(feature = "async")]
pub async fn decode_async(bytes: Vec<u8>) -> Result<ImageFrame> {
    match tokio::task::spawn_blocking(move || decode(&bytes)).await {
        Ok(result) => result,
        Err(e) => std::panic::resume_unwind(e.into_panic()),
    }
}

/// Decode all frames of the DICOM file in the given buffer,
/// in parallel.
#[cfg(feature = "rayon")]
pub fn decode_all_frames(bytes: &[u8]) -> Result<Vec<ImageFrame>> {
    use rayon::prelude::*;

    let obj: dicom_lite_object::DefaultDicomObject = OpenFileOptions::new()
        .from_bytes(bytes)
        .context(ReadFileSnafu)?;
    let extractor = PixelDataExtractor::new(&obj)?;
    (0..extractor.number_of_frames())
        .into_par_iter()
        .map(|frame| extractor.decode_frame(frame))
        .collect()
}
