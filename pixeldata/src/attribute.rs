//! Utility module for fetching key attributes from a DICOM object.

use dicom_lite_core::dictionary::DataDictionary;
use dicom_lite_core::Tag;
use dicom_lite_dictionary_std::tags;
use dicom_lite_object::mem::InMemElement;
use dicom_lite_object::InMemDicomObject;
use snafu::{ensure, Backtrace, OptionExt, ResultExt, Snafu};
use std::convert::TryFrom;

#[derive(Debug, Snafu)]
pub enum GetAttributeError {
    #[snafu(display("Missing required attribute `{}`", name))]
    MissingRequiredField {
        name: &'static str,
        backtrace: Backtrace,
    },

    #[snafu(display("Could not convert attribute `{}`", name))]
    ConvertValue {
        name: &'static str,
        source: dicom_lite_core::value::ConvertValueError,
        backtrace: Backtrace,
    },

    #[snafu(display("Semantically invalid value `{}` for attribute `{}`", value, name))]
    InvalidValue {
        name: &'static str,
        value: String,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = GetAttributeError> = std::result::Result<T, E>;

/// Get the Columns from the DICOM object
pub fn cols<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<u16> {
    retrieve_required_u16(obj, tags::COLUMNS, "Columns")
}

/// Get the Rows from the DICOM object
pub fn rows<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<u16> {
    retrieve_required_u16(obj, tags::ROWS, "Rows")
}

/// Get the SamplesPerPixel from the DICOM object, returning 1 by default
pub fn samples_per_pixel<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<u16> {
    let spp = retrieve_optional_u16(obj, tags::SAMPLES_PER_PIXEL, "SamplesPerPixel")?.unwrap_or(1);
    ensure!(
        spp > 0,
        InvalidValueSnafu {
            name: "SamplesPerPixel",
            value: spp.to_string(),
        }
    );
    Ok(spp)
}

/// Get the PlanarConfiguration from the DICOM object, returning 0 by default
pub fn planar_configuration<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> u16 {
    obj.int(tags::PLANAR_CONFIGURATION)
        .and_then(|v| u16::try_from(v).ok())
        .unwrap_or(0)
}

/// Get the BitsAllocated from the DICOM object
pub fn bits_allocated<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<u16> {
    retrieve_required_u16(obj, tags::BITS_ALLOCATED, "BitsAllocated")
}

/// Get the BitsStored from the DICOM object,
/// falling back to BitsAllocated if it is not present
pub fn bits_stored<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<u16> {
    match retrieve_optional_u16(obj, tags::BITS_STORED, "BitsStored")? {
        Some(bits) => Ok(bits),
        None => bits_allocated(obj),
    }
}

/// Get the PixelData element from the DICOM object
pub fn pixel_data<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<&InMemElement<D>> {
    obj.element_opt(tags::PIXEL_DATA)
        .context(MissingRequiredFieldSnafu { name: "PixelData" })
}

/// Get the NumberOfFrames from the DICOM object,
/// returning 1 if it is not present
pub fn number_of_frames<D: DataDictionary + Clone>(obj: &InMemDicomObject<D>) -> Result<u32> {
    let elem = match obj.element_opt(tags::NUMBER_OF_FRAMES) {
        Some(e) => e,
        None => return Ok(1),
    };

    let integer = elem.value().to_int::<i32>().context(ConvertValueSnafu {
        name: "NumberOfFrames",
    })?;

    ensure!(
        integer > 0,
        InvalidValueSnafu {
            name: "NumberOfFrames",
            value: integer.to_string(),
        }
    );

    Ok(integer as u32)
}

#[inline]
fn retrieve_required_u16<D>(obj: &InMemDicomObject<D>, tag: Tag, name: &'static str) -> Result<u16>
where
    D: DataDictionary + Clone,
{
    retrieve_optional_u16(obj, tag, name)?.context(MissingRequiredFieldSnafu { name })
}

#[inline]
fn retrieve_optional_u16<D>(
    obj: &InMemDicomObject<D>,
    tag: Tag,
    name: &'static str,
) -> Result<Option<u16>>
where
    D: DataDictionary + Clone,
{
    match obj.element_opt(tag) {
        Some(e) => e
            .value()
            .to_int::<u16>()
            .context(ConvertValueSnafu { name })
            .map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_lite_core::header::DataElementHeader;
    use dicom_lite_core::value::{PrimitiveValue, Value};
    use dicom_lite_core::{DataElement, Length, VR};

    fn us(tag: Tag, value: u16) -> InMemElement {
        DataElement::new(
            DataElementHeader::new(tag, VR::US, Length(2)),
            Value::Primitive(PrimitiveValue::new_u16(value)),
        )
    }

    fn is(tag: Tag, value: &str) -> InMemElement {
        DataElement::new(
            DataElementHeader::new(tag, VR::IS, Length(value.len() as u32)),
            Value::Primitive(PrimitiveValue::new_string(value)),
        )
    }

    #[test]
    fn errors_on_missing_required_attributes() {
        let obj = InMemDicomObject::from_element_iter(vec![us(tags::ROWS, 64)]);

        assert_eq!(rows(&obj).unwrap(), 64);
        assert!(matches!(
            cols(&obj),
            Err(GetAttributeError::MissingRequiredField { name: "Columns", .. })
        ));
        assert!(matches!(
            pixel_data(&obj),
            Err(GetAttributeError::MissingRequiredField { name: "PixelData", .. })
        ));
    }

    #[test]
    fn optional_attributes_have_defaults() {
        let obj = InMemDicomObject::from_element_iter(vec![us(tags::BITS_ALLOCATED, 16)]);

        assert_eq!(samples_per_pixel(&obj).unwrap(), 1);
        assert_eq!(planar_configuration(&obj), 0);
        assert_eq!(bits_stored(&obj).unwrap(), 16);
        assert_eq!(number_of_frames(&obj).unwrap(), 1);
    }

    #[test]
    fn number_of_frames_is_parsed_from_text() {
        let obj = InMemDicomObject::from_element_iter(vec![is(tags::NUMBER_OF_FRAMES, "12")]);
        assert_eq!(number_of_frames(&obj).unwrap(), 12);

        let obj = InMemDicomObject::from_element_iter(vec![is(tags::NUMBER_OF_FRAMES, "0 ")]);
        assert!(matches!(
            number_of_frames(&obj),
            Err(GetAttributeError::InvalidValue { .. })
        ));

        let obj = InMemDicomObject::from_element_iter(vec![is(tags::NUMBER_OF_FRAMES, "many")]);
        assert!(matches!(
            number_of_frames(&obj),
            Err(GetAttributeError::ConvertValue { .. })
        ));
    }
}
