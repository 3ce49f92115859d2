#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]

//! This is the core library of dicom-lite, containing the concepts
//! and data structures shared by the parser and the pixel data decoder.
//!
//! The current structure of this crate is as follows:
//!
//! - [`header`] comprises the data types for DICOM element headers,
//!   including the attribute tag, the value representation
//!   and its length class, and the value length.
//! - [`dictionary`] describes the behavior of DICOM data dictionaries,
//!   which translate attribute names and tags to dictionary entries.
//! - [`value`] holds definitions for element values:
//!   primitive values, nested data set sequences,
//!   and encapsulated pixel data fragments.

pub mod dictionary;
pub mod header;
pub mod value;

pub use dictionary::DataDictionary;
pub use header::{DataElement, DataElementHeader, Length, Tag, VrLengthClass, VR};
pub use value::{PrimitiveValue, Value as DicomValue};

// re-export crates that are part of the public API
pub use smallvec;
