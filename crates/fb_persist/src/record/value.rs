use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ValueError;
use crate::record::{Color, SaveRecord};

// -----------------------------------------------------------------------------
// Value

/// A format-neutral stored value.
///
/// Serializes externally tagged, so `Vec2` and `Color` stay distinguishable
/// from plain lists of numbers in every storage format. Floats keep their
/// bits through formats that can hold them; JSON has no NaN or infinity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// An empty nullable.
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Str(String),
    Vec2(Vec2),
    Color(Color),
    /// Discriminant of a fieldless enum.
    Enum(i64),
    List(Vec<Value>),
    Record(SaveRecord),
}

impl Value {
    /// Name of the value's shape, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "signed integer",
            Self::UInt(_) => "unsigned integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Vec2(_) => "vec2",
            Self::Color(_) => "color",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Record(_) => "record",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[inline]
    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::Mismatch {
            expected,
            found: self.kind_name(),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Self::Bool(value) => Ok(*value),
            _ => Err(self.mismatch("bool")),
        }
    }

    /// Reads any integer, including enum discriminants, as `i64`.
    pub fn as_i64(&self) -> Result<i64, ValueError> {
        match *self {
            Self::Int(value) | Self::Enum(value) => Ok(value),
            Self::UInt(value) => i64::try_from(value).map_err(|_| ValueError::OutOfRange {
                value: format!("{value}"),
                target: "i64",
            }),
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Reads any non-negative integer as `u64`.
    pub fn as_u64(&self) -> Result<u64, ValueError> {
        match *self {
            Self::UInt(value) => Ok(value),
            Self::Int(value) | Self::Enum(value) => {
                u64::try_from(value).map_err(|_| ValueError::OutOfRange {
                    value: format!("{value}"),
                    target: "u64",
                })
            }
            _ => Err(self.mismatch("integer")),
        }
    }

    /// Reads a float. Integers are widened.
    pub fn as_f64(&self) -> Result<f64, ValueError> {
        match *self {
            Self::Float(value) => Ok(value),
            Self::Int(value) => Ok(value as f64),
            Self::UInt(value) => Ok(value as f64),
            _ => Err(self.mismatch("float")),
        }
    }

    pub fn as_str(&self) -> Result<&str, ValueError> {
        match self {
            Self::Str(value) => Ok(value),
            _ => Err(self.mismatch("string")),
        }
    }

    pub fn as_vec2(&self) -> Result<Vec2, ValueError> {
        match self {
            Self::Vec2(value) => Ok(*value),
            _ => Err(self.mismatch("vec2")),
        }
    }

    pub fn as_color(&self) -> Result<Color, ValueError> {
        match self {
            Self::Color(value) => Ok(*value),
            _ => Err(self.mismatch("color")),
        }
    }

    /// Reads the discriminant of an enumerated value.
    ///
    /// Plain integers are accepted, so enum fields restore from records
    /// written while the field was still an integer, and the reverse.
    #[inline]
    pub fn as_discriminant(&self) -> Result<i64, ValueError> {
        self.as_i64()
    }

    pub fn as_record(&self) -> Option<&SaveRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Replaces enum discriminants with plain integers, recursively.
    ///
    /// Applied to values crossing a type-version boundary, where the enum
    /// type on either side may have changed identity.
    pub fn into_integral(self) -> Self {
        match self {
            Self::Enum(value) => Self::Int(value),
            Self::List(items) => Self::List(items.into_iter().map(Self::into_integral).collect()),
            Self::Record(record) => Self::Record(record.map_values(Self::into_integral)),
            other => other,
        }
    }
}

// -----------------------------------------------------------------------------
// Conversions

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            #[inline]
            fn from(value: $ty) -> Self {
                Self::$variant(value.into())
            }
        }
    )*};
}

impl_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => UInt,
    u64 => UInt,
    f32 => Float,
    f64 => Float,
    String => Str,
    &str => Str,
    Vec2 => Vec2,
    Color => Color,
    SaveRecord => Record,
    Vec<Value> => List,
}

#[cfg(test)]
mod tests {
    use super::Value;
    use crate::error::ValueError;
    use crate::record::SaveRecord;

    #[test]
    fn integers_convert_across_signedness() {
        assert_eq!(Value::UInt(7).as_i64(), Ok(7));
        assert_eq!(Value::Int(7).as_u64(), Ok(7));
        assert_eq!(Value::Enum(2).as_u64(), Ok(2));
        assert!(matches!(
            Value::Int(-1).as_u64(),
            Err(ValueError::OutOfRange { target: "u64", .. })
        ));
        assert!(matches!(
            Value::UInt(u64::MAX).as_i64(),
            Err(ValueError::OutOfRange { target: "i64", .. })
        ));
    }

    #[test]
    fn shape_mismatch_names_both_sides() {
        assert_eq!(
            Value::Str("door".into()).as_bool(),
            Err(ValueError::Mismatch {
                expected: "bool",
                found: "string",
            })
        );
        assert_eq!(Value::Int(3).as_f64(), Ok(3.0));
    }

    #[test]
    fn enums_become_integers_recursively() {
        let mut record = SaveRecord::new("game::Door");
        record.insert("state", Value::Enum(2));

        let value = Value::List(vec![Value::Enum(1), Value::Record(record)]).into_integral();

        let Value::List(items) = value else {
            panic!("expected a list");
        };
        assert_eq!(items[0], Value::Int(1));
        assert_eq!(
            items[1].as_record().and_then(|record| record.get("state")),
            Some(&Value::Int(2))
        );
    }
}
