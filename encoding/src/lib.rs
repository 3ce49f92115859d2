//! DICOM decoding primitives.
//!
//! This crate provides the [`ByteCursor`],
//! a bounds-checked sequential reader over an in-memory byte buffer,
//! the data element header decoders for each supported
//! combination of value representation explicitness and byte order,
//! and the concept of a [transfer syntax specifier],
//! from which the right decoder is chosen at run-time.
//!
//! The known transfer syntaxes themselves are declared
//! in the `dicom-lite-transfer-syntax-registry` crate.
//!
//! [transfer syntax specifier]: ./transfer_syntax/index.html

pub mod cursor;
pub mod decode;
pub mod transfer_syntax;

pub use byteordered::Endianness;
pub use cursor::ByteCursor;
pub use decode::Decode;
pub use transfer_syntax::{PixelCodec, TransferSyntax};
