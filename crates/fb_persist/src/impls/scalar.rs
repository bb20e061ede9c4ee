use alloc::format;
use alloc::string::String;

use glam::Vec2;

use crate::error::ValueError;
use crate::info::{NonGenericTypeInfoCell, ScalarKind, TypeInfo, TypePath, Typed};
use crate::persist::impl_persist_cast_fn;
use crate::record::{Color, Value};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTraitClone, TypeTraitDefault};
use crate::{Persist, Primitive};

// -----------------------------------------------------------------------------
// Scalar conversions

/// Conversion between a scalar type and its stored [`Value`].
trait Scalar: Sized {
    const KIND: ScalarKind;

    fn store(&self) -> Value;

    fn load(value: &Value) -> Result<Self, ValueError>;
}

macro_rules! impl_signed {
    ($($ty:ident),*) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::Int;

            #[inline]
            fn store(&self) -> Value {
                Value::Int(*self as i64)
            }

            fn load(value: &Value) -> Result<Self, ValueError> {
                let wide = value.as_i64()?;
                $ty::try_from(wide).map_err(|_| ValueError::OutOfRange {
                    value: format!("{wide}"),
                    target: stringify!($ty),
                })
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ident),*) => {$(
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::UInt;

            #[inline]
            fn store(&self) -> Value {
                Value::UInt(*self as u64)
            }

            fn load(value: &Value) -> Result<Self, ValueError> {
                let wide = value.as_u64()?;
                $ty::try_from(wide).map_err(|_| ValueError::OutOfRange {
                    value: format!("{wide}"),
                    target: stringify!($ty),
                })
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u8, u16, u32, u64, usize);

impl Scalar for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    #[inline]
    fn store(&self) -> Value {
        Value::Bool(*self)
    }

    #[inline]
    fn load(value: &Value) -> Result<Self, ValueError> {
        value.as_bool()
    }
}

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float;

    #[inline]
    fn store(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    #[inline]
    fn load(value: &Value) -> Result<Self, ValueError> {
        // Exact for values that were stored from an `f32`.
        value.as_f64().map(|wide| wide as f32)
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Float;

    #[inline]
    fn store(&self) -> Value {
        Value::Float(*self)
    }

    #[inline]
    fn load(value: &Value) -> Result<Self, ValueError> {
        value.as_f64()
    }
}

impl Scalar for String {
    const KIND: ScalarKind = ScalarKind::Str;

    #[inline]
    fn store(&self) -> Value {
        Value::Str(self.clone())
    }

    #[inline]
    fn load(value: &Value) -> Result<Self, ValueError> {
        value.as_str().map(String::from)
    }
}

impl Scalar for Vec2 {
    const KIND: ScalarKind = ScalarKind::Vec2;

    #[inline]
    fn store(&self) -> Value {
        Value::Vec2(*self)
    }

    #[inline]
    fn load(value: &Value) -> Result<Self, ValueError> {
        value.as_vec2()
    }
}

impl Scalar for Color {
    const KIND: ScalarKind = ScalarKind::Color;

    #[inline]
    fn store(&self) -> Value {
        Value::Color(*self)
    }

    #[inline]
    fn load(value: &Value) -> Result<Self, ValueError> {
        value.as_color()
    }
}

// -----------------------------------------------------------------------------
// Persist impls

macro_rules! impl_persist_scalar {
    ($($ty:ty => $path:literal, $name:literal;)*) => {$(
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::primitive::<$ty>(<$ty as Scalar>::KIND))
            }
        }

        impl Persist for $ty {
            impl_persist_cast_fn!(Primitive);
        }

        impl Primitive for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Scalar::store(self)
            }

            fn set_value(&mut self, value: &Value) -> Result<(), ValueError> {
                *self = <$ty as Scalar>::load(value)?;
                Ok(())
            }
        }

        impl GetTypeMeta for $ty {
            fn get_type_meta() -> TypeMeta {
                let mut meta = TypeMeta::of::<Self>();
                meta.insert_trait::<TypeTraitDefault>(FromType::<Self>::from_type());
                meta.insert_trait::<TypeTraitClone>(FromType::<Self>::from_type());
                meta
            }
        }
    )*};
}

impl_persist_scalar! {
    bool => "bool", "bool";
    i8 => "i8", "i8";
    i16 => "i16", "i16";
    i32 => "i32", "i32";
    i64 => "i64", "i64";
    isize => "isize", "isize";
    u8 => "u8", "u8";
    u16 => "u16", "u16";
    u32 => "u32", "u32";
    u64 => "u64", "u64";
    usize => "usize", "usize";
    f32 => "f32", "f32";
    f64 => "f64", "f64";
    String => "alloc::string::String", "String";
    Vec2 => "glam::Vec2", "Vec2";
    Color => "fb_persist::record::Color", "Color";
}
