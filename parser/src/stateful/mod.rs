//! Stateful decoding of DICOM content:
//! element headers and values read in sequence from a byte cursor.

pub mod decode;
