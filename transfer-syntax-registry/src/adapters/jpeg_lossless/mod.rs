//! Native decoding of the JPEG lossless process
//! (ITU-T T.81, Annex H, Huffman coded, non-hierarchical),
//! as found in the encapsulated pixel data of the transfer syntaxes
//! JPEG Lossless (`1.2.840.10008.1.2.4.57`)
//! and JPEG Lossless SV1 (`1.2.840.10008.1.2.4.70`).
//!
//! The decoder reads the markers of one image in order:
//!
//! 1. `SOI`, which must come first;
//! 2. any number of `DHT`, `DRI`, `APPn` and `COM` segments,
//!    around a single `SOF3` frame header;
//! 3. `SOS`, after which the entropy-coded samples are decoded;
//! 4. `EOI`, which may be missing.
//!
//! Huffman tables, the bit reader and the sample buffer
//! live only for the duration of one call to [`decode`].
//!
//! # Example
//!
//! ```no_run
//! use dicom_lite_transfer_syntax_registry::adapters::jpeg_lossless::JpegLosslessAdapter;
//!
//! # let fragment: Vec<u8> = Vec::new();
//! let frame = JpegLosslessAdapter.decode(&fragment)?;
//! assert_eq!(frame.samples.len(), frame.width as usize * frame.height as usize);
//! # Ok::<(), dicom_lite_transfer_syntax_registry::adapters::jpeg_lossless::Error>(())
//! ```

use byteordered::Endianness;
use dicom_lite_encoding::cursor::{self, ByteCursor};
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use tracing::{debug, warn};

mod bits;
mod huffman;
pub mod marker;
mod predictor;

use self::bits::BitReader;
use self::huffman::{HuffmanTable, Lookup, MAX_SYMBOLS};
pub use self::predictor::Predictor;

/// An error which may occur while decoding a JPEG lossless image.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The data does not start with the start of image marker.
    #[snafu(display("Missing start of image marker (SOI)"))]
    MissingSoi { backtrace: Backtrace },
    /// A segment is shorter than its fields.
    #[snafu(display("Could not read segment of marker 0xFF{:02X}", marker))]
    ReadSegment {
        marker: u8,
        #[snafu(backtrace)]
        source: cursor::Error,
    },
    /// A segment length smaller than the length field itself.
    #[snafu(display("Invalid length {} of segment 0xFF{:02X}", length, marker))]
    InvalidSegmentLength {
        marker: u8,
        length: u16,
        backtrace: Backtrace,
    },
    /// Something other than a marker where a marker was expected.
    #[snafu(display("Expected a marker at offset {}, found byte 0x{:02X}", position, found))]
    ExpectedMarker {
        position: usize,
        found: u8,
        backtrace: Backtrace,
    },
    /// A marker which is not allowed at this point of the stream.
    #[snafu(display("Unexpected marker 0xFF{:02X} at offset {}", marker, position))]
    UnexpectedMarker {
        marker: u8,
        position: usize,
        backtrace: Backtrace,
    },
    /// A frame of a process other than lossless (SOF3).
    #[snafu(display(
        "Unsupported JPEG process (frame marker 0xFF{:02X}), only lossless (0xFFC3) is supported",
        marker
    ))]
    UnsupportedFrameType { marker: u8, backtrace: Backtrace },
    /// A Huffman table with a class or destination out of range.
    #[snafu(display("Invalid Huffman table (class {}, id {})", class, id))]
    InvalidHuffmanTable {
        class: u8,
        id: u8,
        backtrace: Backtrace,
    },
    /// A Huffman table declares more symbols than possible.
    #[snafu(display(
        "Huffman table (class {}, id {}) declares {} symbols, at most 256 are allowed",
        class,
        id,
        total
    ))]
    HuffmanTableTooLarge {
        class: u8,
        id: u8,
        total: usize,
        backtrace: Backtrace,
    },
    /// The code counts of a Huffman table do not form a prefix code.
    #[snafu(display(
        "Huffman table (class {}, id {}) has too many codes of length {}",
        class,
        id,
        length
    ))]
    HuffmanCodeOverflow {
        class: u8,
        id: u8,
        length: u8,
        backtrace: Backtrace,
    },
    /// Sample precision other than 8, 12 or 16 bits.
    #[snafu(display("Unsupported sample precision {}, expected 8, 12 or 16", precision))]
    UnsupportedPrecision { precision: u8, backtrace: Backtrace },
    /// An image without rows or columns.
    #[snafu(display("Invalid image dimensions {}x{}", width, height))]
    ZeroDimension {
        width: u16,
        height: u16,
        backtrace: Backtrace,
    },
    /// A frame with no components or too many components.
    #[snafu(display("Invalid number of frame components {}", count))]
    InvalidComponentCount { count: u8, backtrace: Backtrace },
    /// Subsampled components in a multi-component frame.
    #[snafu(display(
        "Unsupported sampling factors 0x{:02X} of component {}",
        sampling,
        component
    ))]
    UnsupportedSampling {
        component: u8,
        sampling: u8,
        backtrace: Backtrace,
    },
    /// A start of scan before the frame header.
    #[snafu(display("Missing frame header (SOF3) before the scan"))]
    MissingFrameHeader { backtrace: Backtrace },
    /// The image ended before a scan.
    #[snafu(display("Missing start of scan (SOS)"))]
    MissingScan { backtrace: Backtrace },
    /// The number of scan components is not in `1..=4`.
    #[snafu(display("Invalid number of scan components {}", count))]
    InvalidScanComponentCount { count: u8, backtrace: Backtrace },
    /// The scan refers to a component not in the frame.
    #[snafu(display("Scan component {} is not declared in the frame", component))]
    UnknownScanComponent { component: u8, backtrace: Backtrace },
    /// The scan does not cover all components of the frame.
    #[snafu(display(
        "Scan has {} of the {} frame components, only interleaved scans are supported",
        scan,
        frame
    ))]
    ScanComponentMismatch {
        frame: u8,
        scan: u8,
        backtrace: Backtrace,
    },
    /// A restart interval which does not cover whole rows.
    #[snafu(display(
        "Unsupported restart interval of {} pixels for rows of {} pixels",
        interval,
        width
    ))]
    UnsupportedRestartInterval {
        interval: u16,
        width: u16,
        backtrace: Backtrace,
    },
    /// Predictor selection value out of range.
    #[snafu(display("Invalid predictor selection value {}", value))]
    InvalidSelectionValue { value: u8, backtrace: Backtrace },
    /// Point transform too large for the sample precision.
    #[snafu(display(
        "Invalid point transform {} for {}-bit samples",
        point_transform,
        precision
    ))]
    InvalidPointTransform {
        point_transform: u8,
        precision: u8,
        backtrace: Backtrace,
    },
    /// The scan refers to a Huffman table which was not defined.
    #[snafu(display("Scan refers to undefined Huffman table {}", id))]
    MissingHuffmanTable { id: u8, backtrace: Backtrace },
    /// No Huffman code matches the compressed bits.
    #[snafu(display("Invalid Huffman code at offset {} (sample #{})", position, decoded))]
    InvalidCode {
        position: usize,
        decoded: usize,
        backtrace: Backtrace,
    },
    /// A decoded magnitude category greater than 16.
    #[snafu(display("Invalid difference magnitude {} at offset {}", ssss, position))]
    InvalidMagnitude {
        ssss: u8,
        position: usize,
        backtrace: Backtrace,
    },
    /// The compressed data ended, or a marker appeared,
    /// before all samples were decoded.
    #[snafu(display(
        "Compressed data ended after {} of {} samples",
        decoded,
        expected
    ))]
    PrematureEnd {
        decoded: usize,
        expected: usize,
        backtrace: Backtrace,
    },
}

impl Error {
    /// Whether the error was found in the entropy-coded data,
    /// after all headers were accepted.
    pub fn is_corrupted_payload(&self) -> bool {
        matches!(
            self,
            Error::InvalidCode { .. } | Error::InvalidMagnitude { .. }
        )
    }

    /// Whether the image is valid but uses a feature this decoder lacks.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedFrameType { .. }
                | Error::UnsupportedSampling { .. }
                | Error::ScanComponentMismatch { .. }
                | Error::UnsupportedRestartInterval { .. }
        )
    }
}

/// Type alias for the result of JPEG lossless decoding.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An image decoded from a JPEG lossless stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    /// number of columns
    pub width: u32,
    /// number of rows
    pub height: u32,
    /// sample precision in bits: 8, 12 or 16
    pub precision: u8,
    /// number of components, interleaved in `samples`
    pub samples_per_pixel: u32,
    /// reconstructed samples, row by row,
    /// with the components of each pixel next to each other
    pub samples: Vec<u16>,
}

/// Pixel data adapter for the JPEG lossless transfer syntaxes.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JpegLosslessAdapter;

impl JpegLosslessAdapter {
    /// Decode one complete JPEG lossless image.
    pub fn decode(&self, data: &[u8]) -> Result<DecodedFrame> {
        decode(data)
    }
}

#[derive(Debug, Clone)]
struct FrameHeader {
    precision: u8,
    height: u16,
    width: u16,
    /// component identifiers, in frame order
    components: Vec<u8>,
}

impl FrameHeader {
    fn read(segment: &mut ByteCursor<'_>) -> Result<Self> {
        let ctx = ReadSegmentSnafu {
            marker: marker::SOF3,
        };
        let precision = segment.read_u8().context(ctx)?;
        ensure!(
            matches!(precision, 8 | 12 | 16),
            UnsupportedPrecisionSnafu { precision }
        );
        let height = segment.read_u16(Endianness::Big).context(ctx)?;
        let width = segment.read_u16(Endianness::Big).context(ctx)?;
        ensure!(width > 0 && height > 0, ZeroDimensionSnafu { width, height });

        let count = segment.read_u8().context(ctx)?;
        ensure!((1..=4).contains(&count), InvalidComponentCountSnafu { count });
        let mut components = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let id = segment.read_u8().context(ctx)?;
            let sampling = segment.read_u8().context(ctx)?;
            // quantization table selector, unused
            segment.read_u8().context(ctx)?;
            ensure!(
                count == 1 || sampling == 0x11,
                UnsupportedSamplingSnafu {
                    component: id,
                    sampling,
                }
            );
            components.push(id);
        }

        Ok(FrameHeader {
            precision,
            height,
            width,
            components,
        })
    }
}

#[derive(Debug, Clone)]
struct ScanHeader {
    /// for each scan component, its index in the frame
    /// and the Huffman table used
    components: Vec<(usize, u8)>,
    predictor: Predictor,
    point_transform: u8,
}

impl ScanHeader {
    fn read(segment: &mut ByteCursor<'_>, frame: &FrameHeader, tables: &Tables) -> Result<Self> {
        let ctx = ReadSegmentSnafu {
            marker: marker::SOS,
        };
        let count = segment.read_u8().context(ctx)?;
        ensure!(
            (1..=4).contains(&count),
            InvalidScanComponentCountSnafu { count }
        );

        let mut components = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let id = segment.read_u8().context(ctx)?;
            let selectors = segment.read_u8().context(ctx)?;
            let index = frame
                .components
                .iter()
                .position(|&c| c == id)
                .context(UnknownScanComponentSnafu { component: id })?;
            components.push((index, selectors >> 4));
        }

        let selection_value = segment.read_u8().context(ctx)?;
        let predictor = Predictor::from_selection_value(selection_value).context(
            InvalidSelectionValueSnafu {
                value: selection_value,
            },
        )?;
        // end of spectral selection, unused
        segment.read_u8().context(ctx)?;
        let approximation = segment.read_u8().context(ctx)?;
        let point_transform = approximation & 0x0F;
        ensure!(
            point_transform < frame.precision,
            InvalidPointTransformSnafu {
                point_transform,
                precision: frame.precision,
            }
        );

        for &(_, id) in &components {
            ensure!(tables.dc(id).is_some(), MissingHuffmanTableSnafu { id });
        }
        ensure!(
            components.len() == frame.components.len(),
            ScanComponentMismatchSnafu {
                frame: frame.components.len() as u8,
                scan: count,
            }
        );

        Ok(ScanHeader {
            components,
            predictor,
            point_transform,
        })
    }
}

/// The Huffman tables defined so far, by class and destination.
#[derive(Debug, Default)]
struct Tables {
    tables: [[Option<HuffmanTable>; 4]; 2],
}

impl Tables {
    fn dc(&self, id: u8) -> Option<&HuffmanTable> {
        self.tables[0].get(usize::from(id))?.as_ref()
    }

    /// Read all tables in a DHT segment.
    fn read_segment(&mut self, segment: &mut ByteCursor<'_>) -> Result<()> {
        let ctx = ReadSegmentSnafu {
            marker: marker::DHT,
        };
        while !segment.is_empty() {
            let class_id = segment.read_u8().context(ctx)?;
            let (class, id) = (class_id >> 4, class_id & 0x0F);
            ensure!(class <= 1 && id <= 3, InvalidHuffmanTableSnafu { class, id });

            let mut counts = [0_u8; 16];
            counts.copy_from_slice(segment.read_bytes(16).context(ctx)?);
            // checked before reading the symbols
            let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
            ensure!(
                total <= MAX_SYMBOLS,
                HuffmanTableTooLargeSnafu { class, id, total }
            );
            let symbols = segment.read_bytes(total).context(ctx)?.to_vec();

            let table = HuffmanTable::new(class, id, counts, symbols)?;
            debug!(
                "Huffman table (class {}, id {}) with {} codes",
                table.class(),
                table.id(),
                table.symbols().len()
            );
            self.tables[usize::from(class)][usize::from(id)] = Some(table);
        }
        Ok(())
    }
}

/// Read the next marker, skipping fill bytes.
/// Returns the marker code and its offset,
/// or `None` if no bytes remain.
fn next_marker(cursor: &mut ByteCursor<'_>) -> Result<Option<(u8, usize)>> {
    if cursor.is_empty() {
        return Ok(None);
    }
    let position = cursor.position();
    let found = cursor.read_u8().context(ReadSegmentSnafu { marker: 0u8 })?;
    ensure!(found == 0xFF, ExpectedMarkerSnafu { position, found });
    loop {
        match cursor.read_u8() {
            Ok(0xFF) => continue,
            Ok(code) => return Ok(Some((code, position))),
            Err(_) => return Ok(None),
        }
    }
}

/// Split off the payload of the segment which starts at the cursor.
fn read_segment<'a>(cursor: &mut ByteCursor<'a>, marker: u8) -> Result<ByteCursor<'a>> {
    let length = cursor
        .read_u16(Endianness::Big)
        .context(ReadSegmentSnafu { marker })?;
    ensure!(length >= 2, InvalidSegmentLengthSnafu { marker, length });
    cursor
        .take(usize::from(length) - 2)
        .context(ReadSegmentSnafu { marker })
}

/// Decode one complete JPEG lossless image.
pub fn decode(data: &[u8]) -> Result<DecodedFrame> {
    let mut cursor = ByteCursor::new(data);
    ensure!(
        cursor.peek_bytes(2).ok() == Some(&[0xFF, marker::SOI][..]),
        MissingSoiSnafu
    );
    cursor
        .skip(2)
        .context(ReadSegmentSnafu { marker: marker::SOI })?;

    let mut tables = Tables::default();
    let mut frame: Option<FrameHeader> = None;
    let mut restart_interval = 0_u16;

    loop {
        let (code, position) = match next_marker(&mut cursor)? {
            Some(m) => m,
            None if frame.is_none() => return MissingFrameHeaderSnafu.fail(),
            None => return MissingScanSnafu.fail(),
        };

        match code {
            marker::DHT => {
                let mut segment = read_segment(&mut cursor, code)?;
                tables.read_segment(&mut segment)?;
            }
            marker::SOF3 => {
                ensure!(
                    frame.is_none(),
                    UnexpectedMarkerSnafu {
                        marker: code,
                        position
                    }
                );
                let mut segment = read_segment(&mut cursor, code)?;
                let header = FrameHeader::read(&mut segment)?;
                debug!(
                    "Lossless frame {}x{}, {} bits, {} component(s)",
                    header.width,
                    header.height,
                    header.precision,
                    header.components.len()
                );
                frame = Some(header);
            }
            marker::DRI => {
                let mut segment = read_segment(&mut cursor, code)?;
                restart_interval = segment
                    .read_u16(Endianness::Big)
                    .context(ReadSegmentSnafu { marker: code })?;
                debug!("Restart interval of {} pixels", restart_interval);
            }
            marker::SOS => {
                let frame = frame.as_ref().context(MissingFrameHeaderSnafu)?;
                let mut segment = read_segment(&mut cursor, code)?;
                let scan = ScanHeader::read(&mut segment, frame, &tables)?;
                let reader = BitReader::from_cursor(cursor);
                return decode_scan(reader, frame, &scan, &tables, restart_interval);
            }
            marker::EOI if frame.is_none() => return MissingFrameHeaderSnafu.fail(),
            marker::EOI => return MissingScanSnafu.fail(),
            code if marker::is_sof(code) => return UnsupportedFrameTypeSnafu { marker: code }.fail(),
            code if marker::is_app(code) || code == marker::COM || code == marker::DQT => {
                let segment = read_segment(&mut cursor, code)?;
                debug!(
                    "Skipping segment 0xFF{:02X} of {} bytes",
                    code,
                    segment.remaining()
                );
            }
            code => {
                return UnexpectedMarkerSnafu {
                    marker: code,
                    position,
                }
                .fail()
            }
        }
    }
}

fn decode_scan(
    mut reader: BitReader<'_>,
    frame: &FrameHeader,
    scan: &ScanHeader,
    tables: &Tables,
    restart_interval: u16,
) -> Result<DecodedFrame> {
    // each interval must start at the first column of a row
    ensure!(
        restart_interval % frame.width == 0,
        UnsupportedRestartIntervalSnafu {
            interval: restart_interval,
            width: frame.width,
        }
    );
    let width = usize::from(frame.width);
    let height = usize::from(frame.height);
    let components = scan.components.len();
    let stride = width * components;
    let expected = stride * height;

    let point_transform = scan.point_transform;
    let sample_bits = frame.precision - point_transform;
    let default_prediction = 1_i32 << (sample_bits - 1);
    let mask = (1_i32 << sample_bits) - 1;

    let mut scan_tables = Vec::with_capacity(components);
    for &(index, id) in &scan.components {
        let table = tables.dc(id).context(MissingHuffmanTableSnafu { id })?;
        scan_tables.push((index, table));
    }

    let mut samples = vec![0_u16; expected];
    let mut decoded = 0_usize;
    // row on which the current restart interval started
    let mut interval_row = 0_usize;
    // whether the next pixel starts a restart interval
    let mut interval_start = true;
    let mut pixels = 0_usize;
    let restart_interval = usize::from(restart_interval);

    for y in 0..height {
        for x in 0..width {
            if restart_interval > 0 && pixels > 0 && pixels % restart_interval == 0 {
                let position = reader.position();
                match reader.next_marker() {
                    Some(code) if marker::is_rst(code) => {}
                    Some(code) => {
                        return UnexpectedMarkerSnafu {
                            marker: code,
                            position,
                        }
                        .fail()
                    }
                    None => return PrematureEndSnafu { decoded, expected }.fail(),
                }
                interval_row = y;
                interval_start = true;
            }

            for &(c, table) in &scan_tables {
                let position = reader.position();
                let ssss = match table.decode(&mut reader) {
                    Lookup::Symbol(ssss) => ssss,
                    Lookup::EndOfData => return PrematureEndSnafu { decoded, expected }.fail(),
                    Lookup::NoMatch => return InvalidCodeSnafu { position, decoded }.fail(),
                };
                ensure!(ssss <= 16, InvalidMagnitudeSnafu { ssss, position });
                let bits = if (1..16).contains(&ssss) {
                    reader
                        .read_bits(ssss)
                        .context(PrematureEndSnafu { decoded, expected })?
                } else {
                    0
                };
                let difference = predictor::extend(bits, ssss);

                let i = y * stride + x * components + c;
                let prediction = if x == 0 || interval_start {
                    default_prediction
                } else {
                    let ra = i32::from(samples[i - components]);
                    if y == interval_row {
                        ra
                    } else {
                        let rb = i32::from(samples[i - stride]);
                        let rc = i32::from(samples[i - stride - components]);
                        scan.predictor.predict(ra, rb, rc)
                    }
                };
                samples[i] = ((prediction + difference) & mask) as u16;
                decoded += 1;
            }
            interval_start = false;
            pixels += 1;
        }
    }

    if point_transform > 0 {
        for sample in &mut samples {
            *sample <<= point_transform;
        }
    }

    finish(reader);
    debug!("Decoded {} lossless samples", decoded);

    Ok(DecodedFrame {
        width: u32::from(frame.width),
        height: u32::from(frame.height),
        precision: frame.precision,
        samples_per_pixel: components as u32,
        samples,
    })
}

/// Look for the end of image after the last sample.
fn finish(mut reader: BitReader<'_>) {
    let start = reader.position();
    match reader.next_marker() {
        Some(marker::EOI) => {
            let (_, cursor) = reader.into_parts();
            if cursor.rest().iter().any(|&b| b != 0) {
                warn!(
                    "Ignoring {} bytes after the end of image",
                    cursor.remaining()
                );
            }
        }
        Some(code) => warn!(
            "Expected end of image after the scan, found marker 0xFF{:02X} at offset {}",
            code, start
        ),
        None => warn!("Missing end of image marker (EOI)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Builds JPEG streams segment by segment.
    struct Stream(Vec<u8>);

    impl Stream {
        fn new() -> Self {
            Stream(vec![0xFF, marker::SOI])
        }

        fn segment(mut self, marker: u8, payload: &[u8]) -> Self {
            let length = payload.len() as u16 + 2;
            self.0.extend_from_slice(&[0xFF, marker]);
            self.0.extend_from_slice(&length.to_be_bytes());
            self.0.extend_from_slice(payload);
            self
        }

        fn dht(self, id: u8, counts: &[u8; 16], symbols: &[u8]) -> Self {
            let mut payload = vec![id];
            payload.extend_from_slice(counts);
            payload.extend_from_slice(symbols);
            self.segment(marker::DHT, &payload)
        }

        /// a table with a single 1-bit code (`0`) for a zero difference
        fn zero_table(self, id: u8) -> Self {
            self.dht(id, &single_code(1), &[0])
        }

        /// the table of `CATEGORY_COUNTS`, for magnitudes 0 to 16
        fn category_table(self) -> Self {
            let symbols: Vec<u8> = (0..=16).collect();
            self.dht(0, &CATEGORY_COUNTS, &symbols)
        }

        fn sof3(self, precision: u8, height: u16, width: u16, components: u8) -> Self {
            let mut payload = vec![precision];
            payload.extend_from_slice(&height.to_be_bytes());
            payload.extend_from_slice(&width.to_be_bytes());
            payload.push(components);
            for id in 1..=components {
                payload.extend_from_slice(&[id, 0x11, 0]);
            }
            self.segment(marker::SOF3, &payload)
        }

        fn sos(self, tables: &[u8], selection_value: u8, point_transform: u8) -> Self {
            let mut payload = vec![tables.len() as u8];
            for (id, table) in (1..).zip(tables) {
                payload.extend_from_slice(&[id, table << 4]);
            }
            payload.extend_from_slice(&[selection_value, 0, point_transform]);
            self.segment(marker::SOS, &payload)
        }

        fn data(mut self, bytes: &[u8]) -> Self {
            self.0.extend_from_slice(bytes);
            self
        }

        fn eoi(self) -> Vec<u8> {
            self.data(&[0xFF, marker::EOI]).0
        }
    }

    fn single_code(length: usize) -> [u8; 16] {
        let mut counts = [0; 16];
        counts[length - 1] = 1;
        counts
    }

    /// magnitudes 0 to 6 have 3-bit codes,
    /// then one code for each length from 4 to 13 bits
    const CATEGORY_COUNTS: [u8; 16] = [0, 0, 7, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0];

    /// Entropy-code the differences with the table of `CATEGORY_COUNTS`,
    /// padding with 1-bits and stuffing zeros after 0xFF.
    fn encode_differences(differences: &[i32]) -> Vec<u8> {
        // canonical codes, indexed by magnitude category
        let mut codes = Vec::new();
        let mut code = 0_u32;
        for (len, &count) in (1..).zip(CATEGORY_COUNTS.iter()) {
            for _ in 0..count {
                codes.push((code, len));
                code += 1;
            }
            code <<= 1;
        }

        let mut bits: Vec<u8> = Vec::new();
        let mut push = |value: u32, len: u32| {
            for i in (0..len).rev() {
                bits.push(((value >> i) & 1) as u8);
            }
        };
        for &diff in differences {
            let ssss = if diff == 0 {
                0
            } else {
                32 - diff.unsigned_abs().leading_zeros()
            };
            let (code, len) = codes[ssss as usize];
            push(code, len);
            if (1..16).contains(&ssss) {
                let extra = if diff > 0 { diff } else { diff + (1 << ssss) - 1 };
                push(extra as u32, ssss);
            }
        }
        while bits.len() % 8 != 0 {
            bits.push(1);
        }

        let mut out = Vec::new();
        for chunk in bits.chunks(8) {
            let byte = chunk.iter().fold(0_u8, |acc, &b| (acc << 1) | b);
            out.push(byte);
            if byte == 0xFF {
                out.push(0x00);
            }
        }
        out
    }

    #[test]
    fn single_pixel_of_default_prediction() {
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.width, 1);
        assert_eq!(frame.height, 1);
        assert_eq!(frame.precision, 16);
        assert_eq!(frame.samples_per_pixel, 1);
        assert_eq!(frame.samples, vec![32768]);
    }

    #[test]
    fn zero_differences_repeat_the_default() {
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, 2, 2, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples.len(), 4);
        assert!(frame.samples.iter().all(|&s| s == 32768));

        // decoding is deterministic
        assert_eq!(decode(&data).unwrap(), frame);
    }

    #[rstest]
    #[case(8, 128)]
    #[case(12, 2048)]
    #[case(16, 32768)]
    fn supported_precisions(#[case] precision: u8, #[case] expected: u16) {
        let data = Stream::new()
            .zero_table(0)
            .sof3(precision, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.precision, precision);
        assert_eq!(frame.samples, vec![expected]);
    }

    #[rstest]
    #[case(2)]
    #[case(7)]
    #[case(10)]
    #[case(17)]
    fn unsupported_precisions(#[case] precision: u8) {
        let data = Stream::new()
            .zero_table(0)
            .sof3(precision, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        let err = decode(&data).unwrap_err();
        assert!(matches!(err, Error::UnsupportedPrecision { precision: p, .. } if p == precision));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 0)]
    #[case(0, 0)]
    fn zero_dimensions(#[case] height: u16, #[case] width: u16) {
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, height, width, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::ZeroDimension { .. })
        ));
    }

    #[test]
    fn undefined_table_is_rejected_before_decoding() {
        // tables 0 to 2 exist, the scan uses 3
        let data = Stream::new()
            .zero_table(0)
            .zero_table(1)
            .zero_table(2)
            .sof3(16, 1, 1, 1)
            .sos(&[3], 1, 0)
            // would be an invalid code for any table
            .data(&[0xFF, 0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::MissingHuffmanTable { id: 3, .. })
        ));

        // no tables at all
        let data = Stream::new()
            .sof3(16, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::MissingHuffmanTable { id: 0, .. })
        ));
    }

    #[test]
    fn oversized_table_is_rejected_before_symbols() {
        let mut counts = [0_u8; 16];
        counts[15] = 255;
        counts[14] = 2;
        // no symbol values follow the counts
        let mut payload = vec![0x00];
        payload.extend_from_slice(&counts);
        let data = Stream::new()
            .segment(marker::DHT, &payload)
            .sof3(16, 1, 1, 1)
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::HuffmanTableTooLarge { total: 257, .. })
        ));
    }

    #[test]
    fn invalid_table_destination() {
        let data = Stream::new()
            .dht(0x04, &single_code(1), &[0])
            .sof3(16, 1, 1, 1)
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidHuffmanTable { class: 0, id: 4, .. })
        ));
    }

    #[test]
    fn marker_ordering() {
        // missing SOI
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        assert!(matches!(decode(&data[2..]), Err(Error::MissingSoi { .. })));
        assert!(matches!(decode(&[]), Err(Error::MissingSoi { .. })));

        // missing SOF3
        let data = Stream::new().zero_table(0).sos(&[0], 1, 0).data(&[0x00]).eoi();
        assert!(matches!(decode(&data), Err(Error::MissingFrameHeader { .. })));

        // missing SOS
        let data = Stream::new().zero_table(0).sof3(16, 1, 1, 1).eoi();
        assert!(matches!(decode(&data), Err(Error::MissingScan { .. })));
        let data = Stream::new().zero_table(0).sof3(16, 1, 1, 1).0;
        assert!(matches!(decode(&data), Err(Error::MissingScan { .. })));

        // a second frame header
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, 1, 1, 1)
            .sof3(16, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::UnexpectedMarker { marker: 0xC3, .. })
        ));
    }

    #[test]
    fn other_processes_are_unsupported() {
        let data = Stream::new()
            .segment(0xC0, &[8, 0, 1, 0, 1, 1, 1, 0x11, 0])
            .eoi();
        let err = decode(&data).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFrameType { marker: 0xC0, .. }));
        assert!(err.is_unsupported());
    }

    #[test]
    fn scan_header_fields() {
        let stream = || Stream::new().zero_table(0).sof3(16, 1, 1, 1);

        let data = stream().sos(&[0], 8, 0).data(&[0x00]).eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidSelectionValue { value: 8, .. })
        ));

        let data = stream()
            .segment(marker::SOS, &[0, 1, 0, 0, 0])
            .data(&[0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidScanComponentCount { count: 0, .. })
        ));

        let data = stream()
            .segment(marker::SOS, &[1, 9, 0x00, 1, 0, 0])
            .data(&[0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::UnknownScanComponent { component: 9, .. })
        ));

        // successive approximation byte is missing
        let data = stream()
            .segment(marker::SOS, &[1, 1, 0x00, 1, 0])
            .data(&[0x00])
            .eoi();
        assert!(matches!(decode(&data), Err(Error::ReadSegment { .. })));

        let data = Stream::new()
            .zero_table(0)
            .sof3(8, 1, 1, 1)
            .sos(&[0], 1, 8)
            .data(&[0x00])
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::InvalidPointTransform { .. })
        ));
    }

    #[test]
    fn stuffed_bytes_are_data() {
        // magnitude 8 behind a 1-bit code, two differences of +255:
        // 0 11111111 0 11111111 (111111) => 0x7F 0xBF 0xFF
        let data = Stream::new()
            .dht(0, &single_code(1), &[8])
            .sof3(16, 1, 2, 1)
            .sos(&[0], 1, 0)
            .data(&[0x7F, 0xBF, 0xFF, 0x00])
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples, vec![32768 + 255, 32768 + 510]);
    }

    #[test]
    fn first_column_uses_default_then_left_neighbour() {
        let data = Stream::new()
            .category_table()
            .sof3(8, 2, 3, 1)
            .sos(&[0], 1, 0)
            .data(&encode_differences(&[5, -2, 3, -10, 1, 1]))
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples, vec![133, 131, 134, 118, 119, 120]);
    }

    #[test]
    fn arithmetic_wraps_to_the_precision() {
        let data = Stream::new()
            .category_table()
            .sof3(8, 1, 2, 1)
            .sos(&[0], 1, 0)
            .data(&encode_differences(&[200, -100]))
            .eoi();
        let frame = decode(&data).unwrap();
        // 128 + 200 = 328 = 72 (mod 256), 72 - 100 = -28 = 228 (mod 256)
        assert_eq!(frame.samples, vec![72, 228]);
    }

    #[rstest]
    #[case(0, 253)]
    #[case(1, 130)]
    #[case(2, 135)]
    #[case(3, 125)]
    #[case(4, 140)]
    #[case(5, 135)]
    #[case(6, 137)]
    #[case(7, 132)]
    fn selection_values(#[case] selection_value: u8, #[case] last: u16) {
        // Ra = 133, Rb = 138, Rc = 128 at the last sample
        let data = Stream::new()
            .category_table()
            .sof3(8, 2, 2, 1)
            .sos(&[0], selection_value, 0)
            .data(&encode_differences(&[0, 10, 5, -3]))
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples, vec![128, 138, 133, last]);
    }

    #[test]
    fn point_transform_scales_samples() {
        let data = Stream::new()
            .category_table()
            .sof3(12, 1, 2, 1)
            .sos(&[0], 1, 2)
            .data(&encode_differences(&[0, 3]))
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.precision, 12);
        assert_eq!(frame.samples, vec![512 << 2, 515 << 2]);
    }

    #[test]
    fn interleaved_components() {
        let data = Stream::new()
            .category_table()
            .sof3(8, 1, 2, 3)
            .sos(&[0, 0, 0], 1, 0)
            .data(&encode_differences(&[1, 2, 3, -1, 0, 5]))
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples_per_pixel, 3);
        assert_eq!(frame.samples, vec![129, 130, 131, 128, 130, 136]);
    }

    #[test]
    fn partial_scans_are_unsupported() {
        let data = Stream::new()
            .zero_table(0)
            .sof3(8, 1, 1, 3)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::ScanComponentMismatch { frame: 3, scan: 1, .. }
        ));
        assert!(err.is_unsupported());
    }

    #[test]
    fn restart_intervals_reset_prediction() {
        // with selection value 2, the first row of each interval
        // is predicted from the left
        let mut scan = encode_differences(&[1, 1]);
        scan.extend_from_slice(&[0xFF, 0xD0]);
        scan.extend(encode_differences(&[5, 2]));
        let data = Stream::new()
            .category_table()
            .segment(marker::DRI, &[0, 2])
            .sof3(8, 2, 2, 1)
            .sos(&[0], 2, 0)
            .data(&scan)
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples, vec![129, 130, 133, 135]);

        // without the restart marker
        let mut scan = encode_differences(&[1, 1]);
        scan.extend(encode_differences(&[5, 2]));
        let data = Stream::new()
            .category_table()
            .segment(marker::DRI, &[0, 2])
            .sof3(8, 2, 2, 1)
            .sos(&[0], 2, 0)
            .data(&scan)
            .eoi();
        assert!(matches!(
            decode(&data),
            Err(Error::UnexpectedMarker { marker: marker::EOI, .. })
        ));
    }

    #[rstest]
    #[case(1)]
    #[case(3)]
    fn restart_intervals_within_a_row_are_unsupported(#[case] interval: u16) {
        let data = Stream::new()
            .zero_table(0)
            .segment(marker::DRI, &interval.to_be_bytes())
            .sof3(8, 2, 2, 1)
            .sos(&[0], 2, 0)
            .data(&[0x00])
            .eoi();
        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedRestartInterval { interval: i, width: 2, .. } if i == interval
        ));
        assert!(err.is_unsupported());
    }

    #[test]
    fn restart_interval_of_several_rows() {
        let mut scan = encode_differences(&[1, 1, 2, 3]);
        scan.extend_from_slice(&[0xFF, 0xD0]);
        scan.extend(encode_differences(&[4, 0]));
        let data = Stream::new()
            .category_table()
            .segment(marker::DRI, &[0, 4])
            .sof3(8, 3, 2, 1)
            .sos(&[0], 2, 0)
            .data(&scan)
            .eoi();
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples, vec![129, 130, 130, 133, 132, 132]);
    }

    #[test]
    fn tolerated_segments_and_missing_eoi() {
        let data = Stream::new()
            .segment(0xE0, b"JFIF\0")
            .segment(marker::COM, b"comment")
            .sof3(16, 1, 1, 1)
            // tables may follow the frame header
            .zero_table(0)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .0;
        let frame = decode(&data).unwrap();
        assert_eq!(frame.samples, vec![32768]);
    }

    #[test]
    fn truncated_payload() {
        // 16 samples need 16 bits, only 8 are present
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, 4, 4, 1)
            .sos(&[0], 1, 0)
            .data(&[0x00])
            .eoi();
        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::PrematureEnd {
                decoded: 8,
                expected: 16,
                ..
            }
        ));
        assert!(!err.is_corrupted_payload());
    }

    #[test]
    fn invalid_code() {
        let data = Stream::new()
            .zero_table(0)
            .sof3(16, 1, 1, 1)
            .sos(&[0], 1, 0)
            .data(&[0xFF, 0x00, 0xFF, 0x00])
            .eoi();
        let err = decode(&data).unwrap_err();
        assert!(matches!(err, Error::InvalidCode { decoded: 0, .. }));
        assert!(err.is_corrupted_payload());
    }
}
