//! Root module for pixel data adapters.
//!
//! - [`jpeg_lossless`](jpeg_lossless) provides native decoding
//!   of the JPEG lossless process (SOF3),
//!   as used by the transfer syntaxes
//!   `1.2.840.10008.1.2.4.57` and `1.2.840.10008.1.2.4.70`.
//!
//! Pixel data in other encapsulated transfer syntaxes
//! is recognized but not decoded.

pub mod jpeg_lossless;
