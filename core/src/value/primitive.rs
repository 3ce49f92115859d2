//! Declaration and implementation of a DICOM primitive value.
//!
//! See [`PrimitiveValue`](./enum.PrimitiveValue.html).

use super::C;
use crate::header::{HasLength, Length, Tag};
use itertools::Itertools;
use num_traits::NumCast;
use smallvec::smallvec;
use snafu::{Backtrace, IntoError, Snafu};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Triggered when a value reading attempt fails.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum InvalidValueReadError {
    /// The value cannot be parsed to an integer.
    #[snafu(display("Failed to parse text value as an integer"))]
    ParseInteger {
        source: std::num::ParseIntError,
        backtrace: Backtrace,
    },
    /// The value cannot be parsed to a floating point number.
    #[snafu(display("Failed to parse text value as a floating point number"))]
    ParseFloat {
        source: std::num::ParseFloatError,
        backtrace: Backtrace,
    },
    /// A numeric value does not fit in the requested type.
    #[snafu(display("Narrow conversion of {} failed", value))]
    NarrowConvert { value: String, backtrace: Backtrace },
}

/// An error type for an attempt of accessing a value
/// in one internal representation as another.
///
/// This error is raised whenever it is not possible to retrieve the requested
/// value, either because the inner representation is not compatible with the
/// requested value type, or a conversion would be required.
#[derive(Debug, Clone, PartialEq)]
pub struct CastValueError {
    /// The value format requested
    pub requested: &'static str,
    /// The value's actual representation
    pub got: ValueType,
}

impl fmt::Display for CastValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "bad value cast: requested {} but value is {:?}",
            self.requested, self.got
        )
    }
}

impl std::error::Error for CastValueError {}

/// An error type for a failed attempt at converting a value
/// into another representation.
#[derive(Debug)]
pub struct ConvertValueError {
    /// The value format requested
    pub requested: &'static str,
    /// The value's original representation
    pub original: ValueType,
    /// The reason why the conversion was unsuccessful,
    /// or none if a conversion from the given original representation
    /// is not possible
    pub cause: Option<InvalidValueReadError>,
}

impl fmt::Display for ConvertValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not convert {:?} to a {}: ",
            self.original, self.requested
        )?;
        if let Some(cause) = &self.cause {
            write!(f, "{}", cause)?;
        } else {
            write!(f, "conversion not possible")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConvertValueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause.as_ref().map(|x| x as _)
    }
}

/// An enum representing a primitive value from a DICOM element.
/// The result of decoding an element's data value
/// may be one of the enumerated types
/// depending on its content and value representation.
///
/// Multiple elements are contained in a [`smallvec`] vector,
/// conveniently aliased to the type [`C`].
///
/// Values of binary representations which carry no finer structure
/// (OB, OW, OD, OF, OL, OV, UN) are kept as raw bytes
/// in the byte order of the source.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// No data. Usually employed for zero-length values.
    Empty,

    /// A sequence of strings.
    /// Used for AE, AS, PN, SH, CS, LO, UI and UC.
    /// Can also be used for IS, DS, DA, DT and TM.
    Strs(C<String>),

    /// A single string.
    /// Used for ST, LT, UT and UR, which are never multi-valued.
    Str(String),

    /// A sequence of attribute tags.
    /// Used specifically for AT.
    Tags(C<Tag>),

    /// The value is a sequence of unsigned 8-bit integers.
    /// Used for OB, UN and other raw binary values.
    U8(C<u8>),

    /// The value is a sequence of signed 16-bit integers.
    /// Used for SS.
    I16(C<i16>),

    /// A sequence of unsigned 16-bit integers.
    /// Used for US.
    U16(C<u16>),

    /// A sequence of signed 32-bit integers.
    /// Used for SL.
    I32(C<i32>),

    /// A sequence of unsigned 32-bit integers.
    /// Used for UL.
    U32(C<u32>),

    /// A sequence of signed 64-bit integers.
    /// Used for SV.
    I64(C<i64>),

    /// A sequence of unsigned 64-bit integers.
    /// Used for UV.
    U64(C<u64>),

    /// The value is a sequence of 32-bit floating point numbers.
    /// Used for FL.
    F32(C<f32>),

    /// The value is a sequence of 64-bit floating point numbers.
    /// Used for FD.
    F64(C<f64>),
}

/// An enum representing an abstraction of a DICOM element's data value type.
/// This should be the equivalent of `PrimitiveValue` without the content,
/// plus the `DataSetSequence` and `PixelSequence` entries.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ValueType {
    /// No data. Used for any value of length 0.
    Empty,
    /// A data set sequence. Used for elements in a SQ, regardless of content.
    DataSetSequence,
    /// An item. Used for the values of encapsulated pixel data.
    PixelSequence,
    /// A sequence of strings.
    Strs,
    /// A single string.
    Str,
    /// A sequence of attribute tags.
    Tags,
    /// A sequence of unsigned 8-bit integers.
    U8,
    /// A sequence of signed 16-bit integers.
    I16,
    /// A sequence of unsigned 16-bit integers.
    U16,
    /// A sequence of signed 32-bit integers.
    I32,
    /// A sequence of unsigned 32-bit integers.
    U32,
    /// A sequence of signed 64-bit integers.
    I64,
    /// A sequence of unsigned 64-bit integers.
    U64,
    /// A sequence of 32-bit floating point numbers.
    F32,
    /// A sequence of 64-bit floating point numbers.
    F64,
}

/// Trim the padding of a textual value:
/// trailing spaces and NUL characters, plus leading spaces.
fn trim_text(s: &str) -> &str {
    s.trim_start_matches(' ')
        .trim_end_matches(|c: char| c == ' ' || c == '\0')
}

impl PrimitiveValue {
    /// Create a single string value.
    pub fn new_string(s: impl Into<String>) -> Self {
        PrimitiveValue::Strs(smallvec![s.into()])
    }

    /// Create a single unsigned 16-bit value.
    pub fn new_u16(value: u16) -> Self {
        PrimitiveValue::U16(smallvec![value])
    }

    /// Create a single unsigned 32-bit value.
    pub fn new_u32(value: u32) -> Self {
        PrimitiveValue::U32(smallvec![value])
    }

    /// Obtain the number of individual elements. This number may not
    /// match the DICOM value multiplicity in some value representations.
    pub fn multiplicity(&self) -> u32 {
        use PrimitiveValue::*;
        match self {
            Empty => 0,
            Str(_) => 1,
            Strs(c) => c.len() as u32,
            Tags(c) => c.len() as u32,
            U8(c) => c.len() as u32,
            I16(c) => c.len() as u32,
            U16(c) => c.len() as u32,
            I32(c) => c.len() as u32,
            U32(c) => c.len() as u32,
            I64(c) => c.len() as u32,
            U64(c) => c.len() as u32,
            F32(c) => c.len() as u32,
            F64(c) => c.len() as u32,
        }
    }

    /// Determine whether this primitive value is empty.
    pub fn is_empty(&self) -> bool {
        self.multiplicity() == 0
    }

    /// Obtain the type of this value.
    pub fn value_type(&self) -> ValueType {
        use PrimitiveValue::*;
        match self {
            Empty => ValueType::Empty,
            Str(_) => ValueType::Str,
            Strs(_) => ValueType::Strs,
            Tags(_) => ValueType::Tags,
            U8(_) => ValueType::U8,
            I16(_) => ValueType::I16,
            U16(_) => ValueType::U16,
            I32(_) => ValueType::I32,
            U32(_) => ValueType::U32,
            I64(_) => ValueType::I64,
            U64(_) => ValueType::U64,
            F32(_) => ValueType::F32,
            F64(_) => ValueType::F64,
        }
    }

    /// Convert the primitive value into a string representation.
    ///
    /// String values are trimmed of their padding
    /// and multiple values are joined with a backslash (`'\\'`).
    /// Binary values are converted to their decimal representation.
    pub fn to_str(&self) -> Cow<'_, str> {
        match self {
            PrimitiveValue::Empty => Cow::from(""),
            PrimitiveValue::Str(values) => Cow::from(trim_text(values)),
            PrimitiveValue::Strs(values) if values.len() == 1 => Cow::from(trim_text(&values[0])),
            PrimitiveValue::Strs(values) => {
                Cow::from(values.iter().map(|s| trim_text(s)).join("\\"))
            }
            prim => Cow::from(prim.to_string()),
        }
    }

    /// Convert the primitive value into a sequence of strings,
    /// one per value, each trimmed of its padding.
    pub fn to_multi_str(&self) -> Vec<String> {
        fn seq_to_str<T: fmt::Display>(values: &[T]) -> Vec<String> {
            values.iter().map(|v| v.to_string()).collect()
        }

        match self {
            PrimitiveValue::Empty => Vec::new(),
            PrimitiveValue::Str(value) => vec![trim_text(value).to_string()],
            PrimitiveValue::Strs(values) => {
                values.iter().map(|s| trim_text(s).to_string()).collect()
            }
            PrimitiveValue::Tags(values) => seq_to_str(values),
            PrimitiveValue::U8(values) => seq_to_str(values),
            PrimitiveValue::I16(values) => seq_to_str(values),
            PrimitiveValue::U16(values) => seq_to_str(values),
            PrimitiveValue::I32(values) => seq_to_str(values),
            PrimitiveValue::U32(values) => seq_to_str(values),
            PrimitiveValue::I64(values) => seq_to_str(values),
            PrimitiveValue::U64(values) => seq_to_str(values),
            PrimitiveValue::F32(values) => seq_to_str(values),
            PrimitiveValue::F64(values) => seq_to_str(values),
        }
    }

    /// Retrieve the raw bytes of this value,
    /// only available for values kept as a byte sequence.
    pub fn to_bytes(&self) -> Result<&[u8], CastValueError> {
        match self {
            PrimitiveValue::U8(bytes) => Ok(bytes),
            PrimitiveValue::Empty => Ok(&[]),
            _ => Err(CastValueError {
                requested: "bytes",
                got: self.value_type(),
            }),
        }
    }

    /// Retrieve a single integer of type `T` from this value.
    ///
    /// If the value is already represented as an integer,
    /// the first one is returned after a cast.
    /// If the value is a string or sequence of strings,
    /// the first string is parsed to obtain an integer,
    /// potentially failing if the string does not represent a valid integer.
    pub fn to_int<T>(&self) -> Result<T, ConvertValueError>
    where
        T: NumCast + FromStr<Err = std::num::ParseIntError>,
    {
        self.to_multi_int::<T>()?
            .into_iter()
            .next()
            .ok_or_else(|| ConvertValueError {
                requested: "integer",
                original: self.value_type(),
                cause: None,
            })
    }

    /// Retrieve a sequence of integers of type `T` from this value.
    ///
    /// Floating point values and raw bytes are not converted.
    pub fn to_multi_int<T>(&self) -> Result<Vec<T>, ConvertValueError>
    where
        T: NumCast + FromStr<Err = std::num::ParseIntError>,
    {
        fn cast_all<T: NumCast, U: Copy + NumCast + fmt::Display>(
            values: &[U],
            original: ValueType,
        ) -> Result<Vec<T>, ConvertValueError> {
            values
                .iter()
                .map(|v| {
                    T::from(*v).ok_or_else(|| ConvertValueError {
                        requested: "integer",
                        original,
                        cause: Some(
                            NarrowConvertSnafu {
                                value: v.to_string(),
                            }
                            .build(),
                        ),
                    })
                })
                .collect()
        }

        let original = self.value_type();
        match self {
            PrimitiveValue::Empty => Ok(Vec::new()),
            PrimitiveValue::Str(s) => parse_int(s, original).map(|v| vec![v]),
            PrimitiveValue::Strs(values) => values
                .iter()
                .map(|s| parse_int(s, original))
                .collect(),
            PrimitiveValue::I16(values) => cast_all(values, original),
            PrimitiveValue::U16(values) => cast_all(values, original),
            PrimitiveValue::I32(values) => cast_all(values, original),
            PrimitiveValue::U32(values) => cast_all(values, original),
            PrimitiveValue::I64(values) => cast_all(values, original),
            PrimitiveValue::U64(values) => cast_all(values, original),
            _ => Err(ConvertValueError {
                requested: "integer",
                original,
                cause: None,
            }),
        }
    }

    /// Retrieve one double-precision floating point from this value.
    ///
    /// Strings are parsed, integers and single-precision values are widened.
    pub fn to_float64(&self) -> Result<f64, ConvertValueError> {
        self.to_multi_float64()?
            .into_iter()
            .next()
            .ok_or_else(|| ConvertValueError {
                requested: "float64",
                original: self.value_type(),
                cause: None,
            })
    }

    /// Retrieve a sequence of double-precision floating point numbers
    /// from this value.
    pub fn to_multi_float64(&self) -> Result<Vec<f64>, ConvertValueError> {
        fn widen<U: Copy + Into<f64>>(values: &[U]) -> Vec<f64> {
            values.iter().map(|v| (*v).into()).collect()
        }

        let original = self.value_type();
        match self {
            PrimitiveValue::Empty => Ok(Vec::new()),
            PrimitiveValue::Str(s) => parse_float(s, original).map(|v| vec![v]),
            PrimitiveValue::Strs(values) => values
                .iter()
                .map(|s| parse_float(s, original))
                .collect(),
            PrimitiveValue::F64(values) => Ok(values.to_vec()),
            PrimitiveValue::F32(values) => Ok(widen(values)),
            PrimitiveValue::I16(values) => Ok(widen(values)),
            PrimitiveValue::U16(values) => Ok(widen(values)),
            PrimitiveValue::I32(values) => Ok(widen(values)),
            PrimitiveValue::U32(values) => Ok(widen(values)),
            _ => Err(ConvertValueError {
                requested: "float64",
                original,
                cause: None,
            }),
        }
    }

    /// Retrieve the first attribute tag, only available for AT values.
    pub fn to_tag(&self) -> Result<Tag, CastValueError> {
        match self {
            PrimitiveValue::Tags(values) if !values.is_empty() => Ok(values[0]),
            _ => Err(CastValueError {
                requested: "tag",
                got: self.value_type(),
            }),
        }
    }
}

fn parse_int<T>(s: &str, original: ValueType) -> Result<T, ConvertValueError>
where
    T: FromStr<Err = std::num::ParseIntError>,
{
    let text = trim_text(s);
    // IS values may carry an explicit plus sign
    let text = text.strip_prefix('+').unwrap_or(text);
    text.parse().map_err(|e| ConvertValueError {
        requested: "integer",
        original,
        cause: Some(ParseIntegerSnafu.into_error(e)),
    })
}

fn parse_float(s: &str, original: ValueType) -> Result<f64, ConvertValueError> {
    trim_text(s).parse().map_err(|e| ConvertValueError {
        requested: "float64",
        original,
        cause: Some(ParseFloatSnafu.into_error(e)),
    })
}


impl HasLength for PrimitiveValue {
    fn length(&self) -> Length {
        Length::defined(self.calculate_byte_len() as u32)
    }
}

impl PrimitiveValue {
    /// Determine the length of the value in its encoded form,
    /// in number of bytes, excluding padding.
    pub fn calculate_byte_len(&self) -> usize {
        use PrimitiveValue::*;
        match self {
            Empty => 0,
            U8(c) => c.len(),
            I16(c) => c.len() * 2,
            U16(c) => c.len() * 2,
            U32(c) => c.len() * 4,
            I32(c) => c.len() * 4,
            U64(c) => c.len() * 8,
            I64(c) => c.len() * 8,
            F32(c) => c.len() * 4,
            F64(c) => c.len() * 8,
            Tags(c) => c.len() * 4,
            Str(s) => s.len(),
            Strs(c) if c.is_empty() => 0,
            Strs(c) => c.iter().map(|s| s.len() + 1).sum::<usize>() - 1,
        }
    }
}

impl fmt::Display for PrimitiveValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn display_all<T: fmt::Display>(f: &mut fmt::Formatter, values: &[T]) -> fmt::Result {
            write!(f, "{}", values.iter().format("\\"))
        }

        use PrimitiveValue::*;
        match self {
            Empty => Ok(()),
            Str(value) => f.write_str(value),
            Strs(values) => display_all(f, values),
            Tags(values) => display_all(f, values),
            U8(values) => display_all(f, values),
            I16(values) => display_all(f, values),
            U16(values) => display_all(f, values),
            I32(values) => display_all(f, values),
            U32(values) => display_all(f, values),
            I64(values) => display_all(f, values),
            U64(values) => display_all(f, values),
            F32(values) => display_all(f, values),
            F64(values) => display_all(f, values),
        }
    }
}
