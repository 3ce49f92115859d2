//! Locating and interpreting the pixel data of a DICOM object.
//!
//! Native pixel data is sliced into frames
//! according to the image attributes,
//! while encapsulated pixel data is split into
//! the compressed byte stream of each frame.

use std::borrow::Cow;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use dicom_lite_core::dictionary::DataDictionary;
use dicom_lite_core::value::Value;
use dicom_lite_encoding::{Endianness, PixelCodec, TransferSyntax};
use dicom_lite_object::{FileDicomObject, InMemDicomObject};
use dicom_lite_transfer_syntax_registry::adapters::jpeg_lossless;
use snafu::{ensure, OptionExt, ResultExt};
use tracing::{debug, warn};

use crate::attribute;
use crate::frame::ImageFrame;
use crate::{
    DecodeJpegSnafu, FrameOutOfRangeSnafu, GetAttributeSnafu, ImageTooLargeSnafu,
    MissingFragmentSnafu, NoFragmentsSnafu, PixelDataLengthSnafu, Result,
    UnexpectedPixelDataValueSnafu, UnsupportedBitsAllocatedSnafu, UnsupportedBitsStoredSnafu,
    UnsupportedTransferSyntaxSnafu,
};

/// The data of a single frame, before decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameData<'a> {
    /// Native samples, as stored in the file.
    Native(&'a [u8]),
    /// A compressed byte stream.
    ///
    /// This is a borrowed fragment unless
    /// the frame is split over several fragments.
    Encapsulated(Cow<'a, [u8]>),
}

/// The pixel data extractor of a DICOM object.
///
/// It binds the object's data set to its transfer syntax,
/// and can be shared across threads to extract and decode frames
/// independently of each other.
#[derive(Debug, Clone)]
pub struct PixelDataExtractor<'a, D> {
    obj: &'a InMemDicomObject<D>,
    ts: &'static TransferSyntax,
    number_of_frames: u32,
}

impl<'a, D> PixelDataExtractor<'a, D>
where
    D: DataDictionary + Clone,
{
    /// Create an extractor for the given file object,
    /// using the transfer syntax declared in its meta group.
    pub fn new(obj: &'a FileDicomObject<InMemDicomObject<D>>) -> Result<Self> {
        let uid = obj.meta().transfer_syntax();
        let ts = dicom_lite_transfer_syntax_registry::get(uid)
            .context(UnsupportedTransferSyntaxSnafu { uid })?;
        Self::with_transfer_syntax(obj, ts)
    }

    /// Create an extractor for a data set encoded in the given transfer syntax.
    pub fn with_transfer_syntax(
        obj: &'a InMemDicomObject<D>,
        ts: &'static TransferSyntax,
    ) -> Result<Self> {
        ensure!(
            ts.pixel_codec() != PixelCodec::Other,
            UnsupportedTransferSyntaxSnafu { uid: ts.uid() }
        );
        let number_of_frames = attribute::number_of_frames(obj).context(GetAttributeSnafu)?;
        Ok(PixelDataExtractor {
            obj,
            ts,
            number_of_frames,
        })
    }

    /// The number of frames in the image.
    pub fn number_of_frames(&self) -> u32 {
        self.number_of_frames
    }

    /// The transfer syntax of the pixel data.
    pub fn transfer_syntax(&self) -> &'static TransferSyntax {
        self.ts
    }

    /// Obtain the data of the frame at the given index, without decoding it.
    pub fn frame_data(&self, frame: u32) -> Result<FrameData<'a>> {
        ensure!(
            frame < self.number_of_frames,
            FrameOutOfRangeSnafu {
                frame,
                frames: self.number_of_frames,
            }
        );
        let pixel_data = attribute::pixel_data(self.obj).context(GetAttributeSnafu)?;

        match (self.ts.pixel_codec(), pixel_data.value()) {
            (PixelCodec::None, Value::Primitive(v)) => {
                let bytes = v.to_bytes().ok().context(UnexpectedPixelDataValueSnafu {
                    expected: "native",
                })?;
                self.native_frame(bytes, frame).map(FrameData::Native)
            }
            (PixelCodec::None, _) => UnexpectedPixelDataValueSnafu { expected: "native" }.fail(),
            (_, Value::PixelSequence(seq)) => {
                encapsulated_frame(seq.offset_table(), seq.fragments(), frame, self.number_of_frames)
                    .map(FrameData::Encapsulated)
            }
            (_, _) => UnexpectedPixelDataValueSnafu {
                expected: "encapsulated",
            }
            .fail(),
        }
    }

    /// Extract and decode the frame at the given index.
    pub fn decode_frame(&self, frame: u32) -> Result<ImageFrame> {
        match self.frame_data(frame)? {
            FrameData::Native(bytes) => self.decode_native(bytes),
            FrameData::Encapsulated(stream) => {
                let decoded = jpeg_lossless::decode(&stream).context(DecodeJpegSnafu { frame })?;
                let image = ImageFrame::from(decoded);
                self.check_dimensions(&image);
                debug!(
                    "Decoded frame #{}: {}x{}x{}, {}-bit",
                    frame, image.width, image.height, image.samples_per_pixel, image.bit_depth
                );
                Ok(image)
            }
        }
    }

    /// Slice the bytes of one native frame out of the pixel data.
    fn native_frame(&self, bytes: &'a [u8], frame: u32) -> Result<&'a [u8]> {
        let frame_len = self.native_frame_len()?;
        let expected = frame_len
            .checked_mul(self.number_of_frames as usize)
            .context(ImageTooLargeSnafu {
                frames: self.number_of_frames,
            })?;
        ensure!(
            bytes.len() >= expected,
            PixelDataLengthSnafu {
                expected,
                available: bytes.len(),
                frames: self.number_of_frames,
            }
        );
        // one byte of padding is allowed for odd lengths
        if bytes.len() - expected > 1 {
            warn!(
                "Pixel data has {} bytes in excess, ignoring them",
                bytes.len() - expected
            );
        }
        let range = frame_len
            .checked_mul(frame as usize)
            .and_then(|start| Some(start..start.checked_add(frame_len)?));
        range
            .and_then(|range| bytes.get(range))
            .context(PixelDataLengthSnafu {
                expected,
                available: bytes.len(),
                frames: self.number_of_frames,
            })
    }

    fn native_frame_len(&self) -> Result<usize> {
        let rows = attribute::rows(self.obj).context(GetAttributeSnafu)?;
        let cols = attribute::cols(self.obj).context(GetAttributeSnafu)?;
        let spp = attribute::samples_per_pixel(self.obj).context(GetAttributeSnafu)?;
        let bits_allocated = attribute::bits_allocated(self.obj).context(GetAttributeSnafu)?;
        ensure!(
            bits_allocated == 8 || bits_allocated == 16,
            UnsupportedBitsAllocatedSnafu { bits_allocated }
        );
        [cols as usize, spp as usize, usize::from(bits_allocated / 8)]
            .iter()
            .try_fold(rows as usize, |len, &n| len.checked_mul(n))
            .context(ImageTooLargeSnafu { frames: 1_u32 })
    }

    fn decode_native(&self, bytes: &[u8]) -> Result<ImageFrame> {
        let obj = self.obj;
        let rows = attribute::rows(obj).context(GetAttributeSnafu)?;
        let cols = attribute::cols(obj).context(GetAttributeSnafu)?;
        let spp = attribute::samples_per_pixel(obj).context(GetAttributeSnafu)?;
        let bits_allocated = attribute::bits_allocated(obj).context(GetAttributeSnafu)?;
        let bits_stored = attribute::bits_stored(obj).context(GetAttributeSnafu)?;

        ensure!(
            bits_stored > 0 && bits_stored <= bits_allocated,
            UnsupportedBitsStoredSnafu {
                bits_stored,
                bits_allocated,
            }
        );
        let bit_depth = match bits_stored {
            1..=8 => 8,
            9..=12 => 12,
            _ => 16,
        };
        let mask = if bits_stored >= 16 {
            u16::MAX
        } else {
            (1u16 << bits_stored) - 1
        };

        let mut pixels: Vec<u16> = match (bits_allocated, self.ts.endianness()) {
            (8, _) => bytes.iter().map(|&b| u16::from(b) & mask).collect(),
            (_, Endianness::Little) => bytes
                .chunks_exact(2)
                .map(|c| LittleEndian::read_u16(c) & mask)
                .collect(),
            (_, Endianness::Big) => bytes
                .chunks_exact(2)
                .map(|c| BigEndian::read_u16(c) & mask)
                .collect(),
        };

        if spp > 1 && attribute::planar_configuration(obj) == 1 {
            pixels = interleave_planes(&pixels, spp as usize);
        }

        Ok(ImageFrame {
            width: u32::from(cols),
            height: u32::from(rows),
            bit_depth,
            samples_per_pixel: u32::from(spp),
            pixels,
        })
    }

    fn check_dimensions(&self, image: &ImageFrame) {
        let rows = self.obj.int(dicom_lite_dictionary_std::tags::ROWS);
        let cols = self.obj.int(dicom_lite_dictionary_std::tags::COLUMNS);
        if rows.map_or(false, |r| r != i64::from(image.height))
            || cols.map_or(false, |c| c != i64::from(image.width))
        {
            warn!(
                "Frame dimensions {}x{} differ from the image attributes ({:?}x{:?})",
                image.width, image.height, cols, rows
            );
        }
    }
}

/// Convert color-by-plane samples into color-by-pixel samples.
fn interleave_planes(planar: &[u16], spp: usize) -> Vec<u16> {
    let plane_len = planar.len() / spp;
    (0..plane_len)
        .flat_map(|i| (0..spp).map(move |s| planar[s * plane_len + i]))
        .collect()
}

/// Obtain the compressed byte stream of a frame
/// from the fragments of encapsulated pixel data.
fn encapsulated_frame<'a>(
    offset_table: &[u32],
    fragments: &'a [Vec<u8>],
    frame: u32,
    number_of_frames: u32,
) -> Result<Cow<'a, [u8]>> {
    ensure!(!fragments.is_empty(), NoFragmentsSnafu);

    if number_of_frames == 1 {
        // frame split over the fragments
        return Ok(match fragments {
            [fragment] => Cow::Borrowed(&fragment[..]),
            _ => Cow::Owned(fragments.concat()),
        });
    }

    if fragments.len() == number_of_frames as usize {
        return Ok(Cow::Borrowed(&fragments[frame as usize][..]));
    }

    if offset_table.len() == number_of_frames as usize {
        return frame_from_offset_table(offset_table, fragments, frame);
    }

    ensure!(
        fragments.len() > number_of_frames as usize,
        MissingFragmentSnafu {
            frame,
            fragments: fragments.len(),
        }
    );
    warn!(
        "{} fragments for {} frames without an offset table, assuming one fragment per frame",
        fragments.len(),
        number_of_frames
    );
    Ok(Cow::Borrowed(&fragments[frame as usize][..]))
}

/// Gather the fragments of a frame by their position in the pixel data,
/// as given by the basic offset table.
fn frame_from_offset_table<'a>(
    offset_table: &[u32],
    fragments: &'a [Vec<u8>],
    frame: u32,
) -> Result<Cow<'a, [u8]>> {
    let start = offset_table[frame as usize] as usize;
    let end = offset_table
        .get(frame as usize + 1)
        .map(|&o| o as usize)
        .unwrap_or(usize::MAX);

    // each fragment is preceded by an 8-byte item header
    let mut position = 0;
    let mut selected: Vec<&'a [u8]> = Vec::new();
    for fragment in fragments {
        if position >= start && position < end {
            selected.push(fragment);
        }
        position += 8 + fragment.len();
    }

    match selected.as_slice() {
        [] => MissingFragmentSnafu {
            frame,
            fragments: fragments.len(),
        }
        .fail(),
        [fragment] => Ok(Cow::Borrowed(*fragment)),
        _ => Ok(Cow::Owned(selected.concat())),
    }
}
