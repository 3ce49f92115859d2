//! A bounds-checked sequential reader over a byte buffer.
//!
//! Every read either consumes exactly the requested number of bytes
//! or fails with [`Error::OutOfBounds`] without moving the cursor.

use byteordered::byteorder::{BigEndian, ByteOrder, LittleEndian};
use byteordered::Endianness;
use dicom_lite_core::Tag;
use snafu::{ensure, Backtrace, Snafu};

/// Error type for cursor reads.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// Fewer bytes remain in the buffer than the number requested.
    #[snafu(display(
        "Requested {} bytes at offset {} but only {} are available",
        requested,
        position,
        available
    ))]
    OutOfBounds {
        position: usize,
        requested: usize,
        available: usize,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A bounds-checked sequential reader over a borrowed byte buffer.
///
/// The cursor never shares its position:
/// independent reads of the same buffer use independent cursors.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    position: usize,
    /// absolute offset of `data[0]` in the outermost buffer
    base: usize,
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor at the start of the given buffer.
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor {
            data,
            position: 0,
            base: 0,
        }
    }

    /// The absolute position of the cursor,
    /// counted from the start of the outermost buffer.
    #[inline]
    pub fn position(&self) -> usize {
        self.base + self.position
    }

    /// The number of bytes which can still be read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Whether all bytes have been consumed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The bytes which were not read yet.
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.position..]
    }

    fn check(&self, n: usize) -> Result<()> {
        ensure!(
            n <= self.remaining(),
            OutOfBoundsSnafu {
                position: self.position(),
                requested: n,
                available: self.remaining(),
            }
        );
        Ok(())
    }

    /// Read the next `n` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        let out = &self.data[self.position..self.position + n];
        self.position += n;
        Ok(out)
    }

    /// Look at the next `n` bytes without advancing the cursor.
    pub fn peek_bytes(&self, n: usize) -> Result<&'a [u8]> {
        self.check(n)?;
        Ok(&self.data[self.position..self.position + n])
    }

    /// Advance the cursor by `n` bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    /// Split off a cursor over the next `n` bytes,
    /// advancing this cursor past them.
    ///
    /// Positions reported by the new cursor remain absolute.
    pub fn take(&mut self, n: usize) -> Result<ByteCursor<'a>> {
        let base = self.position();
        let data = self.read_bytes(n)?;
        Ok(ByteCursor {
            data,
            position: 0,
            base,
        })
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.read_bytes(1).map(|b| b[0])
    }

    /// Read a 16-bit unsigned integer in the given byte order.
    pub fn read_u16(&mut self, endianness: Endianness) -> Result<u16> {
        let bytes = self.read_bytes(2)?;
        Ok(match endianness {
            Endianness::Little => LittleEndian::read_u16(bytes),
            Endianness::Big => BigEndian::read_u16(bytes),
        })
    }

    /// Read a 32-bit unsigned integer in the given byte order.
    pub fn read_u32(&mut self, endianness: Endianness) -> Result<u32> {
        let bytes = self.read_bytes(4)?;
        Ok(match endianness {
            Endianness::Little => LittleEndian::read_u32(bytes),
            Endianness::Big => BigEndian::read_u32(bytes),
        })
    }

    /// Read a DICOM attribute tag (group, then element)
    /// in the given byte order.
    pub fn read_tag(&mut self, endianness: Endianness) -> Result<Tag> {
        self.check(4)?;
        let group = self.read_u16(endianness)?;
        let element = self.read_u16(endianness)?;
        Ok(Tag(group, element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_both_byte_orders() {
        let data = [0x02, 0x00, 0x10, 0x00, 0x01, 0x02, 0x03, 0x04];
        let mut cursor = ByteCursor::new(&data);
        assert_eq!(cursor.read_tag(Endianness::Little).unwrap(), Tag(0x0002, 0x0010));
        assert_eq!(cursor.position(), 4);
        let mut be = cursor.clone();
        assert_eq!(cursor.read_u32(Endianness::Little).unwrap(), 0x0403_0201);
        assert_eq!(be.read_u32(Endianness::Big).unwrap(), 0x0102_0304);
        assert!(cursor.is_empty());
    }

    #[test]
    fn out_of_bounds_does_not_advance() {
        let data = [1, 2, 3];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(2).unwrap();
        let err = cursor.read_u16(Endianness::Little).unwrap_err();
        match err {
            Error::OutOfBounds {
                position,
                requested,
                available,
                ..
            } => {
                assert_eq!(position, 2);
                assert_eq!(requested, 2);
                assert_eq!(available, 1);
            }
        }
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.read_u8().unwrap(), 3);
        assert!(cursor.read_bytes(1).is_err());
        // an empty read always succeeds
        assert_eq!(cursor.read_bytes(0).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn sub_cursor_keeps_absolute_positions() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data);
        cursor.skip(1).unwrap();
        let mut sub = cursor.take(3).unwrap();
        assert_eq!(cursor.position(), 4);
        assert_eq!(sub.position(), 1);
        assert_eq!(sub.read_bytes(3).unwrap(), &[1, 2, 3]);
        let err = sub.read_u8().unwrap_err();
        assert!(err.to_string().contains("offset 4"));
    }
}
