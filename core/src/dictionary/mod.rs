//! This module contains the concept of a DICOM data dictionary.
//!
//! The standard data dictionary is available in the
//! `dicom-lite-dictionary-std` crate.

use crate::header::{Tag, VR};
use std::fmt::Debug;
use std::str::FromStr;

/// Specification of a range of tags pertaining to an attribute.
/// Very often, the dictionary of attributes indicates a unique
/// `(group,elem)` for a specific attribute,
/// but some attributes cover a whole range of tags.
#[derive(Debug, Copy, Clone, Eq, Hash, PartialEq)]
pub enum TagRange {
    /// Only a specific tag
    Single(Tag),
    /// Generic group length tag,
    /// refers to any attribute of the form `(gggg,0000)`,
    /// _save for the following exceptions_
    /// which have their own single tag record:
    ///
    /// - _Command Group Length_ (0000,0000)
    /// - _File Meta Information Group Length_ (0002,0000)
    GroupLength,
    /// Generic private creator tag,
    /// refers to any tag from (gggg,0010) to (gggg,00FF),
    /// where `gggg` is an odd number.
    PrivateCreator,
}

impl TagRange {
    /// Retrieve the tag of a single tag range,
    /// or `None` for a generic range.
    pub fn single(self) -> Option<Tag> {
        match self {
            TagRange::Single(tag) => Some(tag),
            TagRange::GroupLength | TagRange::PrivateCreator => None,
        }
    }

    /// Check whether the given tag is covered by this range.
    pub fn contains(self, tag: Tag) -> bool {
        match self {
            TagRange::Single(t) => t == tag,
            TagRange::GroupLength => tag.is_group_length(),
            TagRange::PrivateCreator => tag.is_private_creator(),
        }
    }
}

/// Type trait for a dictionary of DICOM attributes. Attribute dictionaries provide the
/// means to convert a tag to an alias and vice versa, as well as a form of retrieving
/// additional information about the attribute.
///
/// The methods herein have no generic parameters, so as to enable being
/// used as a trait object.
pub trait DataDictionary: Debug {
    /// The type of the dictionary entry.
    type Entry: DataDictionaryEntry;

    /// Fetch an entry by its usual alias (e.g. "PatientName" or "SOPInstanceUID").
    /// Aliases are usually case sensitive and not separated by spaces.
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch an entry by its tag.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its alias or by DICOM tag expression.
    ///
    /// This method accepts a tag descriptor in any of the following formats:
    ///
    /// - `(gggg,eeee)`:
    ///   a 4-digit hexadecimal group part
    ///   and a 4-digit hexadecimal element part
    ///   surrounded by parentheses
    /// - `gggg,eeee`:
    ///   a 4-digit hexadecimal group part
    ///   and a 4-digit hexadecimal element part
    ///   not surrounded by parentheses
    /// - _KeywordName_:
    ///   an exact match (case sensitive) by DICOM tag keyword
    fn by_expr(&self, tag: &str) -> Option<&Self::Entry> {
        match parse_tag_expr(tag) {
            Some(tag) => self.by_tag(tag),
            None => self.by_name(tag),
        }
    }

    /// Use this data element dictionary to interpret a DICOM tag.
    ///
    /// This method accepts the same formats as [`by_expr`](Self::by_expr).
    /// Tags in the first two formats are returned even
    /// if they are not in the dictionary.
    fn parse_tag(&self, tag: &str) -> Option<Tag> {
        parse_tag_expr(tag).or_else(|| {
            self.by_name(tag)
                .and_then(|entry| entry.tag_range().single())
        })
    }
}

/// Parse a tag expression of the form `(gggg,eeee)` or `gggg,eeee`.
fn parse_tag_expr(expr: &str) -> Option<Tag> {
    let inner = expr
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(expr);
    let (group, element) = inner.split_once(',')?;
    if group.len() != 4 || element.len() != 4 {
        return None;
    }
    let group = u16::from_str_radix(group, 16).ok()?;
    let element = u16::from_str_radix(element, 16).ok()?;
    Some(Tag(group, element))
}

/// The dictionary entry data type, representing a DICOM attribute.
pub trait DataDictionaryEntry {
    /// The full possible tag range of the attribute,
    /// which this dictionary entry can represent.
    fn tag_range(&self) -> TagRange;

    /// The alias of the attribute, with no spaces, usually in UpperCamelCase.
    fn alias(&self) -> &str;

    /// The _typical_ value representation of the attribute.
    /// In some edge cases, an element might not have this VR.
    fn vr(&self) -> VR;
}

/// A data type for a dictionary entry with a string slice for its alias.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DataDictionaryEntryRef<'a> {
    /// The attribute tag range
    pub tag: TagRange,
    /// The alias of the attribute, with no spaces, usually InCapitalizedCamelCase
    pub alias: &'a str,
    /// The _typical_ value representation of the attribute
    pub vr: VR,
}

impl<'a> DataDictionaryEntry for DataDictionaryEntryRef<'a> {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

/// A dictionary entry with an owned alias.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct DataDictionaryEntryBuf {
    /// The attribute tag range
    pub tag: TagRange,
    /// The alias of the attribute
    pub alias: String,
    /// The _typical_ value representation of the attribute
    pub vr: VR,
}

impl DataDictionaryEntry for DataDictionaryEntryBuf {
    fn tag_range(&self) -> TagRange {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias.as_str()
    }
    fn vr(&self) -> VR {
        self.vr
    }
}

impl FromStr for Tag {
    type Err = &'static str;

    /// Parse a tag from an expression of the form `(gggg,eeee)` or `gggg,eeee`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag_expr(s).ok_or("invalid tag expression")
    }
}
