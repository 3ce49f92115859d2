#![warn(missing_docs)]
//! This crate provides a middle-level parser of DICOM data sets
//! held in memory.
//!
//! - [`stateful`] binds a byte cursor to the element header decoder
//!   of a transfer syntax, reading headers and primitive values in sequence.
//! - [`dataset`] interprets a data set as a stream of tokens,
//!   resolving nested sequences and items of both defined and undefined length
//!   as well as encapsulated pixel data fragments.
//!
//! Building a complete in-memory object from the tokens
//! is the concern of the `dicom-lite-object` crate.

#[allow(missing_docs)]
pub mod dataset;
#[allow(missing_docs)]
pub mod stateful;

pub use dataset::{DataSetReader, DataSetReaderOptions, DataToken};
pub use stateful::decode::{DynStatefulDecoder, StatefulDecode, StatefulDecoder};
