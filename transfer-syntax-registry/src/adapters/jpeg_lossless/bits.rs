//! Bit-level reading of entropy-coded segments.

use dicom_lite_encoding::ByteCursor;

/// Reads an entropy-coded segment one bit at a time, most significant first.
///
/// A `0xFF 0x00` pair yields a single `0xFF` data byte.
/// `0xFF` followed by any other byte is a marker:
/// the marker is retained and no more bits are supplied.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    cursor: ByteCursor<'a>,
    /// the byte currently being consumed
    current: u8,
    /// bits of `current` not yet consumed
    bits_left: u8,
    /// marker which ended the segment
    marker: Option<u8>,
}

impl<'a> BitReader<'a> {
    /// Create a bit reader at the start of the given bytes.
    #[cfg(test)]
    pub fn new(data: &'a [u8]) -> Self {
        BitReader::from_cursor(ByteCursor::new(data))
    }

    /// Create a bit reader continuing from the cursor's position.
    pub fn from_cursor(cursor: ByteCursor<'a>) -> Self {
        BitReader {
            cursor,
            current: 0,
            bits_left: 0,
            marker: None,
        }
    }

    /// The absolute position of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn next_byte(&mut self) -> Option<u8> {
        if self.marker.is_some() {
            return None;
        }
        let byte = self.cursor.read_u8().ok()?;
        if byte != 0xFF {
            return Some(byte);
        }
        loop {
            match self.cursor.read_u8().ok()? {
                // stuffed zero
                0x00 => return Some(0xFF),
                // fill byte
                0xFF => continue,
                marker => {
                    self.marker = Some(marker);
                    return None;
                }
            }
        }
    }

    /// Read a single bit,
    /// or `None` if the segment has ended.
    pub fn read_bit(&mut self) -> Option<u8> {
        if self.bits_left == 0 {
            self.current = self.next_byte()?;
            self.bits_left = 8;
        }
        self.bits_left -= 1;
        Some((self.current >> self.bits_left) & 1)
    }

    /// Read `n` bits (at most 16) as an unsigned integer,
    /// or `None` if the segment ends before that.
    pub fn read_bits(&mut self, n: u8) -> Option<u16> {
        debug_assert!(n <= 16);
        let mut value: u32 = 0;
        for _ in 0..n {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Some(value as u16)
    }

    /// Skip to the next marker,
    /// discarding the padding bits of the current byte.
    ///
    /// Returns the marker found, or `None` if the data ends first.
    /// Bits are supplied again from the bytes after the marker,
    /// as done at the end of a restart interval.
    pub fn next_marker(&mut self) -> Option<u8> {
        self.bits_left = 0;
        while self.marker.is_none() {
            self.next_byte()?;
        }
        self.marker.take()
    }

    /// Finish reading bits,
    /// yielding the terminating marker and the cursor past the bytes consumed.
    pub fn into_parts(self) -> (Option<u8>, ByteCursor<'a>) {
        (self.marker, self.cursor)
    }
}
