//! The standard data element dictionary.

use crate::tags::ENTRIES;
use dicom_lite_core::dictionary::{DataDictionary, DataDictionaryEntryRef, TagRange::*};
use dicom_lite_core::header::{Tag, VR};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};

static DICT: Lazy<StandardDataDictionaryRegistry> = Lazy::new(init_dictionary);

/// Retrieve a singleton instance of the standard dictionary registry.
///
/// Note that one does not generally have to call this
/// unless when retrieving the underlying registry is important.
/// The unit type [`StandardDataDictionary`]
/// already provides a lazy loaded singleton implementing the necessary traits.
#[inline]
pub fn registry() -> &'static StandardDataDictionaryRegistry {
    &DICT
}

/// The data struct actually containing the standard dictionary.
///
/// This structure is made opaque via the unit type [`StandardDataDictionary`],
/// which provides a lazy loaded singleton.
#[derive(Debug)]
pub struct StandardDataDictionaryRegistry {
    /// mapping: name → entry
    by_name: HashMap<&'static str, &'static DataDictionaryEntryRef<'static>>,
    /// mapping: tag → entry
    by_tag: HashMap<Tag, &'static DataDictionaryEntryRef<'static>>,
}

impl StandardDataDictionaryRegistry {
    fn new() -> StandardDataDictionaryRegistry {
        StandardDataDictionaryRegistry {
            by_name: HashMap::with_capacity(ENTRIES.len() + 2),
            by_tag: HashMap::with_capacity(ENTRIES.len()),
        }
    }

    /// record the given dictionary entry reference
    fn index(&mut self, entry: &'static DataDictionaryEntryRef<'static>) -> &mut Self {
        self.by_name.insert(entry.alias, entry);
        if let Single(tag) = entry.tag {
            self.by_tag.insert(tag, entry);
        }
        self
    }

    /// The number of attributes with a single tag in the registry.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

/// Generic Group Length dictionary entry.
static GROUP_LENGTH_ENTRY: DataDictionaryEntryRef<'static> = DataDictionaryEntryRef {
    tag: GroupLength,
    alias: "GenericGroupLength",
    vr: VR::UL,
};

/// Generic Private Creator dictionary entry.
static PRIVATE_CREATOR_ENTRY: DataDictionaryEntryRef<'static> = DataDictionaryEntryRef {
    tag: PrivateCreator,
    alias: "PrivateCreator",
    vr: VR::LO,
};

/// A data element dictionary which consults
/// the library's global DICOM attribute registry.
///
/// This is the type which would generally be used
/// whenever a data element dictionary is needed,
/// such as when reading DICOM objects.
///
/// The dictionary index is automatically initialized upon the first use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StandardDataDictionary;

impl StandardDataDictionary {
    fn indexed_tag(tag: Tag) -> Option<&'static DataDictionaryEntryRef<'static>> {
        registry().by_tag.get(&tag).cloned().or_else(|| {
            // check for private creator
            if tag.is_private_creator() {
                return Some(&PRIVATE_CREATOR_ENTRY);
            }
            // check for group length
            if tag.is_group_length() {
                return Some(&GROUP_LENGTH_ENTRY);
            }

            None
        })
    }

    /// Resolve the value representation of an element
    /// whose header does not declare one (implicit VR).
    ///
    /// Tags unknown to the dictionary resolve to `UN`.
    pub fn implicit_vr(tag: Tag) -> VR {
        StandardDataDictionary::indexed_tag(tag)
            .map(|entry| entry.vr)
            .unwrap_or(VR::UN)
    }
}

impl DataDictionary for StandardDataDictionary {
    type Entry = DataDictionaryEntryRef<'static>;

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        registry().by_name.get(name).cloned()
    }

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        StandardDataDictionary::indexed_tag(tag)
    }
}

impl<'a> DataDictionary for &'a StandardDataDictionary {
    type Entry = DataDictionaryEntryRef<'static>;

    fn by_name(&self, name: &str) -> Option<&'static DataDictionaryEntryRef<'static>> {
        registry().by_name.get(name).cloned()
    }

    fn by_tag(&self, tag: Tag) -> Option<&'static DataDictionaryEntryRef<'static>> {
        StandardDataDictionary::indexed_tag(tag)
    }
}

impl Display for StandardDataDictionary {
    fn fmt(&self, f: &mut Formatter) -> Result<(), fmt::Error> {
        f.write_str("Standard DICOM Data Dictionary")
    }
}

fn init_dictionary() -> StandardDataDictionaryRegistry {
    let mut d = StandardDataDictionaryRegistry::new();
    for entry in ENTRIES {
        d.index(entry);
    }
    // generic entries are only reachable by name through the index
    d.by_name.insert("GenericGroupLength", &GROUP_LENGTH_ENTRY);
    d.by_name.insert("PrivateCreator", &PRIVATE_CREATOR_ENTRY);
    d
}

#[cfg(test)]
mod tests {
    use super::{registry, StandardDataDictionary};
    use crate::tags::ENTRIES;
    use dicom_lite_core::dictionary::{DataDictionary, DataDictionaryEntryRef, TagRange::*};
    use dicom_lite_core::header::{Tag, VR};
    use dicom_lite_core::VrLengthClass;

    // tests for just a few attributes to make sure that the entries
    // were well installed into the crate
    #[test]
    fn smoke_test() {
        let dict = StandardDataDictionary::default();

        assert_eq!(
            dict.by_name("PatientName"),
            Some(&DataDictionaryEntryRef {
                tag: Single(Tag(0x0010, 0x0010)),
                alias: "PatientName",
                vr: VR::PN,
            })
        );

        assert_eq!(
            dict.by_name("Modality"),
            Some(&DataDictionaryEntryRef {
                tag: Single(Tag(0x0008, 0x0060)),
                alias: "Modality",
                vr: VR::CS,
            })
        );

        let pixel_data = dict
            .by_tag(Tag(0x7FE0, 0x0010))
            .expect("Pixel Data attribute should exist");
        assert_eq!(pixel_data.tag, Single(Tag(0x7FE0, 0x0010)));
        assert_eq!(pixel_data.alias, "PixelData");
        assert_eq!(pixel_data.vr.length_class(), VrLengthClass::Long);
    }

    #[test]
    fn constants_and_entries_agree() {
        use crate::tags::*;
        assert_eq!(PATIENT_NAME, Tag(0x0010, 0x0010));
        assert_eq!(TRANSFER_SYNTAX_UID, Tag(0x0002, 0x0010));
        assert_eq!(PIXEL_DATA, Tag(0x7FE0, 0x0010));

        // every entry is reachable by tag and by alias
        let dict = StandardDataDictionary;
        for entry in ENTRIES {
            let tag = entry.tag.single().unwrap();
            assert_eq!(dict.by_tag(tag), Some(entry));
            assert_eq!(dict.by_name(entry.alias), Some(entry));
        }
        assert_eq!(registry().len(), ENTRIES.len());
    }

    #[test]
    fn can_parse_tags() {
        let dict = StandardDataDictionary;

        assert_eq!(dict.parse_tag("(7FE0,0010)"), Some(crate::tags::PIXEL_DATA));
        assert_eq!(dict.parse_tag("0010,21C0"), Some(Tag(0x0010, 0x21C0)));
        assert_eq!(
            dict.parse_tag("OperatorsName"),
            Some(crate::tags::OPERATORS_NAME)
        );

        // can't parse these
        assert_eq!(dict.parse_tag(""), None);
        assert_eq!(dict.parse_tag("1111,2222,3333"), None);
        assert_eq!(dict.parse_tag("OperatorNickname"), None);
        assert_eq!(dict.parse_tag("OPERATORSNAME"), None);
    }

    #[test]
    fn has_group_length_tags() {
        use crate::tags::*;
        let dict = StandardDataDictionary::default();

        assert_eq!(
            dict.by_tag(FILE_META_INFORMATION_GROUP_LENGTH),
            Some(&DataDictionaryEntryRef {
                tag: Single(FILE_META_INFORMATION_GROUP_LENGTH),
                alias: "FileMetaInformationGroupLength",
                vr: VR::UL,
            }),
        );

        // generic group length
        assert_eq!(
            dict.by_tag(Tag(0x7FE0, 0x0000)),
            Some(&DataDictionaryEntryRef {
                tag: GroupLength,
                alias: "GenericGroupLength",
                vr: VR::UL,
            }),
        );
        assert_eq!(StandardDataDictionary::implicit_vr(Tag(0x0028, 0x0000)), VR::UL);
    }

    #[test]
    fn has_private_creator() {
        let dict = StandardDataDictionary::default();

        let private_creator = DataDictionaryEntryRef {
            tag: PrivateCreator,
            alias: "PrivateCreator",
            vr: VR::LO,
        };

        assert_eq!(dict.by_tag(Tag(0x0009, 0x0010)), Some(&private_creator));
        assert_eq!(dict.by_tag(Tag(0x00ED, 0x00FF)), Some(&private_creator));
        assert_eq!(dict.by_tag(Tag(0x0009, 0x1001)), None);
    }

    #[test]
    fn unknown_tags_are_unknown_vr() {
        assert_eq!(StandardDataDictionary::implicit_vr(Tag(0x0009, 0x1001)), VR::UN);
        assert_eq!(StandardDataDictionary::implicit_vr(Tag(0x0028, 0x0010)), VR::US);
    }
}
