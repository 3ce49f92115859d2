//! This crate implements the standard DICOM data dictionary
//! and the constants used by the rest of dicom-lite.
//!
//! ## Run-time dictionary
//!
//! - [`data_element`]: information about the DICOM attributes
//!   known to this library, indexed by tag and by alias.
//!   Tags outside of the dictionary resolve to a generic entry
//!   (group length, private creator) when applicable.
//!
//! ## Constants
//!
//! - [`tags`], which map an attribute alias to a DICOM tag.
//!   These constants and the run-time dictionary
//!   are generated from the same attribute list.
//! - [`uids`], for the transfer syntax unique identifiers
//!   and a few storage SOP classes.
pub mod data_element;
pub mod tags;
pub mod uids;

pub use data_element::{StandardDataDictionary, StandardDataDictionaryRegistry};
