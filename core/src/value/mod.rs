//! This module includes a high level abstraction over a DICOM data element's value.

use crate::header::{EmptyObject, HasLength, Length, Tag};
use num_traits::NumCast;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::str::FromStr;

mod primitive;

pub use self::primitive::{
    CastValueError, ConvertValueError, InvalidValueReadError, PrimitiveValue, ValueType,
};

/// An aggregation of one or more elements in a value.
pub type C<T> = SmallVec<[T; 2]>;

/// Type alias for the in-memory pixel data fragment data.
pub type InMemFragment = Vec<u8>;

/// Representation of a full DICOM value, which may be either primitive or
/// another DICOM object.
///
/// `I` is the complex type for nested data set items, which should usually
/// implement [`HasLength`].
/// `P` is the encapsulated pixel data provider,
/// which should usually implement `AsRef<[u8]>`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value<I = EmptyObject, P = InMemFragment> {
    /// Primitive value.
    Primitive(PrimitiveValue),
    /// A complex sequence of items.
    Sequence(DataSetSequence<I>),
    /// A sequence of encapsulated pixel data fragments.
    PixelSequence(PixelFragmentSequence<P>),
}

impl<I, P> Value<I, P> {
    /// Obtain the number of individual values.
    /// In a primitive, this is the number of individual elements in the value.
    /// In a sequence item, this is the number of items.
    /// In a pixel sequence, this is currently set to 1
    /// regardless of the number of compressed fragments or frames.
    pub fn multiplicity(&self) -> u32 {
        match self {
            Value::Primitive(v) => v.multiplicity(),
            Value::Sequence(v) => v.multiplicity(),
            Value::PixelSequence(..) => 1,
        }
    }

    /// Obtain the abstract type of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Primitive(v) => v.value_type(),
            Value::Sequence(..) => ValueType::DataSetSequence,
            Value::PixelSequence(..) => ValueType::PixelSequence,
        }
    }

    /// Gets a reference to the primitive value.
    pub fn primitive(&self) -> Option<&PrimitiveValue> {
        match self {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Gets a reference to the items of a sequence.
    ///
    /// Returns `None` if the value is not a data set sequence.
    pub fn items(&self) -> Option<&[I]> {
        match self {
            Value::Sequence(v) => Some(v.items()),
            _ => None,
        }
    }

    /// Gets a reference to the encapsulated pixel data's fragments.
    ///
    /// Returns `None` if the value is not a pixel data sequence.
    pub fn fragments(&self) -> Option<&[P]> {
        match self {
            Value::PixelSequence(v) => Some(v.fragments()),
            _ => None,
        }
    }

    /// Gets a reference to the encapsulated pixel data's offset table.
    ///
    /// Returns `None` if the value is not a pixel data sequence.
    pub fn offset_table(&self) -> Option<&[u32]> {
        match self {
            Value::PixelSequence(v) => Some(v.offset_table()),
            _ => None,
        }
    }

    /// Retrieves the primitive value.
    pub fn into_primitive(self) -> Option<PrimitiveValue> {
        match self {
            Value::Primitive(v) => Some(v),
            _ => None,
        }
    }

    /// Retrieves the data set items, discarding the recorded length information.
    pub fn into_items(self) -> Option<C<I>> {
        match self {
            Value::Sequence(v) => Some(v.into_items()),
            _ => None,
        }
    }

    /// Retrieves the pixel data fragments,
    /// discarding the rest of the information.
    pub fn into_fragments(self) -> Option<C<P>> {
        match self {
            Value::PixelSequence(v) => Some(v.into_fragments()),
            _ => None,
        }
    }

    fn require_primitive(&self, requested: &'static str) -> Result<&PrimitiveValue, ConvertValueError> {
        self.primitive().ok_or_else(|| ConvertValueError {
            requested,
            original: self.value_type(),
            cause: None,
        })
    }

    /// Convert the full primitive value into a clean string.
    ///
    /// The value is trimmed of its padding
    /// and multiple values are joined with a backslash.
    pub fn to_str(&self) -> Result<Cow<'_, str>, ConvertValueError> {
        Ok(self.require_primitive("string")?.to_str())
    }

    /// Convert the full primitive value into a sequence of strings.
    pub fn to_multi_str(&self) -> Result<Vec<String>, ConvertValueError> {
        Ok(self.require_primitive("strings")?.to_multi_str())
    }

    /// Retrieve the raw bytes of a binary primitive value.
    pub fn to_bytes(&self) -> Result<&[u8], CastValueError> {
        match self {
            Value::Primitive(v) => v.to_bytes(),
            _ => Err(CastValueError {
                requested: "bytes",
                got: self.value_type(),
            }),
        }
    }

    /// Retrieve and convert the primitive value into an integer.
    pub fn to_int<T>(&self) -> Result<T, ConvertValueError>
    where
        T: NumCast + FromStr<Err = std::num::ParseIntError>,
    {
        self.require_primitive("integer")?.to_int()
    }

    /// Retrieve and convert the primitive value into a sequence of integers.
    pub fn to_multi_int<T>(&self) -> Result<Vec<T>, ConvertValueError>
    where
        T: NumCast + FromStr<Err = std::num::ParseIntError>,
    {
        self.require_primitive("integer")?.to_multi_int()
    }

    /// Retrieve and convert the primitive value
    /// into a double-precision floating point number.
    pub fn to_float64(&self) -> Result<f64, ConvertValueError> {
        self.require_primitive("float64")?.to_float64()
    }

    /// Retrieve and convert the primitive value
    /// into a sequence of double-precision floating point numbers.
    pub fn to_multi_float64(&self) -> Result<Vec<f64>, ConvertValueError> {
        self.require_primitive("float64")?.to_multi_float64()
    }

    /// Retrieve a single DICOM tag.
    pub fn to_tag(&self) -> Result<Tag, CastValueError> {
        match self {
            Value::Primitive(v) => v.to_tag(),
            _ => Err(CastValueError {
                requested: "tag",
                got: self.value_type(),
            }),
        }
    }
}

impl<I, P> From<PrimitiveValue> for Value<I, P> {
    fn from(v: PrimitiveValue) -> Self {
        Value::Primitive(v)
    }
}

impl<I, P> From<DataSetSequence<I>> for Value<I, P> {
    fn from(v: DataSetSequence<I>) -> Self {
        Value::Sequence(v)
    }
}

impl<I, P> From<PixelFragmentSequence<P>> for Value<I, P> {
    fn from(v: PixelFragmentSequence<P>) -> Self {
        Value::PixelSequence(v)
    }
}

impl<I, P> HasLength for Value<I, P> {
    fn length(&self) -> Length {
        match self {
            Value::Primitive(v) => v.length(),
            Value::Sequence(v) => v.length(),
            Value::PixelSequence(..) => Length::UNDEFINED,
        }
    }
}

/// A sequence of complex data set items of type `I`.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSetSequence<I> {
    /// The item sequence.
    items: C<I>,
    /// The sequence length in bytes,
    /// as declared by the sequence's data element.
    ///
    /// The value may be [`UNDEFINED`](Length::UNDEFINED)
    /// if the sequence was terminated by a delimiter.
    length: Length,
}

impl<I> DataSetSequence<I> {
    /// Construct a DICOM data sequence
    /// using a sequence of items and a length.
    ///
    /// **Note:** This function does not validate the `length`
    /// against the items.
    #[inline]
    pub fn new(items: impl Into<C<I>>, length: Length) -> Self {
        DataSetSequence {
            items: items.into(),
            length,
        }
    }

    /// Gets a reference to the items of a sequence.
    #[inline]
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Obtain the number of items in the sequence.
    #[inline]
    pub fn multiplicity(&self) -> u32 {
        self.items.len() as u32
    }

    /// Retrieve the sequence of items,
    /// discarding the recorded length information.
    #[inline]
    pub fn into_items(self) -> C<I> {
        self.items
    }
}

impl<I> HasLength for DataSetSequence<I> {
    #[inline]
    fn length(&self) -> Length {
        self.length
    }
}

/// A sequence of pixel data fragments.
///
/// Each fragment (of data type `P`) is
/// an even-lengthed sequence of bytes
/// representing the encoded pixel data.
/// The first item of the sequence is interpreted as a basic offset table,
/// which is defined separately.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelFragmentSequence<P> {
    /// The value contents of the basic offset table.
    offset_table: C<u32>,
    /// The sequence of pixel data fragments.
    fragments: C<P>,
}

impl<P> PixelFragmentSequence<P> {
    /// Construct a DICOM pixel sequence sequence value
    /// from a basic offset table and a list of fragments.
    ///
    /// **Note:** This function does not validate the offset table
    /// against the given fragments.
    #[inline]
    pub fn new(offset_table: impl Into<C<u32>>, fragments: impl Into<C<P>>) -> Self {
        PixelFragmentSequence {
            offset_table: offset_table.into(),
            fragments: fragments.into(),
        }
    }

    /// Gets a reference to the pixel data fragments.
    #[inline]
    pub fn fragments(&self) -> &[P] {
        &self.fragments
    }

    /// Gets a reference to the basic offset table.
    #[inline]
    pub fn offset_table(&self) -> &[u32] {
        &self.offset_table
    }

    /// Retrieve the pixel data fragments,
    /// discarding the basic offset table.
    #[inline]
    pub fn into_fragments(self) -> C<P> {
        self.fragments
    }
}
