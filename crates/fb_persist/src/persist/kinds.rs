use alloc::boxed::Box;

use crate::Persist;
use crate::error::{FieldAccessError, ValueError};
use crate::record::Value;

// -----------------------------------------------------------------------------
// Kind views

/// Borrowed view of a value by kind.
pub enum PersistRef<'a> {
    Primitive(&'a dyn Primitive),
    Composite(&'a dyn Composite),
    Nullable(&'a dyn Nullable),
    Sequence(&'a dyn Sequence),
    /// No structure to walk. Copyable only through a registered
    /// [`TypeTraitClone`](crate::registry::TypeTraitClone).
    Opaque(&'a dyn Persist),
}

/// Mutable view of a value by kind.
pub enum PersistMut<'a> {
    Primitive(&'a mut dyn Primitive),
    Composite(&'a mut dyn Composite),
    Nullable(&'a mut dyn Nullable),
    Sequence(&'a mut dyn Sequence),
    Opaque(&'a mut dyn Persist),
    /// A polymorphic slot. The box may be replaced by a value of another type.
    Dynamic(&'a mut Box<dyn Persist>),
}

impl PersistRef<'_> {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Composite(_) => "composite",
            Self::Nullable(_) => "nullable",
            Self::Sequence(_) => "sequence",
            Self::Opaque(_) => "opaque",
        }
    }
}

impl PersistMut<'_> {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Composite(_) => "composite",
            Self::Nullable(_) => "nullable",
            Self::Sequence(_) => "sequence",
            Self::Opaque(_) => "opaque",
            Self::Dynamic(_) => "dynamic",
        }
    }
}

// -----------------------------------------------------------------------------
// Primitive

/// A value stored as a single scalar.
pub trait Primitive: Persist {
    fn to_value(&self) -> Value;

    /// Assigns a stored value, converting where the conversion is lossless.
    fn set_value(&mut self, value: &Value) -> Result<(), ValueError>;
}

// -----------------------------------------------------------------------------
// Composite

/// A value with named fields.
///
/// Field order and markers come from the type's
/// [`CompositeInfo`](crate::info::CompositeInfo); these accessors only
/// resolve names to values. An accessor may fail for a single field, which
/// the engine contains to that field.
pub trait Composite: Persist {
    fn field(&self, name: &str) -> Result<&dyn Persist, FieldAccessError>;

    fn field_mut(&mut self, name: &str) -> Result<&mut dyn Persist, FieldAccessError>;
}

// -----------------------------------------------------------------------------
// Nullable

/// A value that may be absent.
pub trait Nullable: Persist {
    fn get(&self) -> Option<&dyn Persist>;

    fn get_mut(&mut self) -> Option<&mut dyn Persist>;

    fn set_none(&mut self);

    /// Returns the inner value, inserting its default first if absent.
    fn get_or_insert_default(&mut self) -> &mut dyn Persist;

    #[inline]
    fn is_none(&self) -> bool {
        self.get().is_none()
    }
}

// -----------------------------------------------------------------------------
// Sequence

/// An ordered, growable list of values.
pub trait Sequence: Persist {
    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&dyn Persist>;

    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Persist>;

    fn clear(&mut self);

    /// Reserves room for `additional` items before they are pushed.
    fn reserve(&mut self, additional: usize);

    /// Appends a default item and returns it.
    fn push_default(&mut self) -> &mut dyn Persist;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
