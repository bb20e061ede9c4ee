mod kinds;

pub use kinds::{Composite, Nullable, PersistMut, PersistRef, Primitive, Sequence};

use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::info::TypeInfo;

// -----------------------------------------------------------------------------
// Persist

/// A value the engine can walk, save, restore and migrate.
///
/// Implemented by [`#[derive(Persist)]`](crate::derive::Persist) for host
/// types, and by this crate for scalars, `Option<T>`, `Vec<T>` and
/// `Box<dyn Persist>`.
///
/// The kind-specific behavior is reached through [`persist_ref`] and
/// [`persist_mut`], which expose the value as one of [`Primitive`],
/// [`Composite`], [`Nullable`] or [`Sequence`].
///
/// [`persist_ref`]: Persist::persist_ref
/// [`persist_mut`]: Persist::persist_mut
pub trait Persist: Any + Send + Sync {
    /// Information of the runtime type.
    ///
    /// For `Box<dyn Persist>` this is the boxed value's type.
    fn persist_type_info(&self) -> &'static TypeInfo;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    fn as_persist(&self) -> &dyn Persist;

    fn as_persist_mut(&mut self) -> &mut dyn Persist;

    /// Exposes the value by kind.
    fn persist_ref(&self) -> PersistRef<'_>;

    /// Exposes the value by kind for mutation.
    fn persist_mut(&mut self) -> PersistMut<'_>;

    /// Replaces `self` with `value`.
    ///
    /// Returns `value` back if its type does not fit.
    fn persist_set(&mut self, value: Box<dyn Persist>) -> Result<(), Box<dyn Persist>>;
}

impl dyn Persist {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts the box, giving it back unchanged on a type mismatch.
    pub fn downcast<T: Any>(self: Box<dyn Persist>) -> Result<Box<T>, Box<dyn Persist>> {
        if !self.is::<T>() {
            return Err(self);
        }
        match self.into_any().downcast::<T>() {
            Ok(value) => Ok(value),
            Err(_) => unreachable!("type checked above"),
        }
    }

    /// Downcasts and unboxes.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn Persist>) -> Result<T, Box<dyn Persist>> {
        self.downcast::<T>().map(|value| *value)
    }

    /// Path of the runtime type.
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.persist_type_info().type_path()
    }
}

impl fmt::Debug for dyn Persist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dyn Persist<{}>", self.type_path())
    }
}

// -----------------------------------------------------------------------------
// Boilerplate

/// Implements the casting methods of [`Persist`] for a concrete type.
///
/// `$kind` names the [`PersistRef`] and [`PersistMut`] variant.
macro_rules! impl_persist_cast_fn {
    ($kind:ident) => {
        #[inline]
        fn persist_type_info(&self) -> &'static $crate::info::TypeInfo {
            <Self as $crate::info::Typed>::type_info()
        }

        #[inline]
        fn as_any(&self) -> &dyn ::core::any::Any {
            self
        }

        #[inline]
        fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
            self
        }

        #[inline]
        fn into_any(self: ::alloc::boxed::Box<Self>) -> ::alloc::boxed::Box<dyn ::core::any::Any> {
            self
        }

        #[inline]
        fn as_persist(&self) -> &dyn $crate::Persist {
            self
        }

        #[inline]
        fn as_persist_mut(&mut self) -> &mut dyn $crate::Persist {
            self
        }

        #[inline]
        fn persist_ref(&self) -> $crate::PersistRef<'_> {
            $crate::PersistRef::$kind(self)
        }

        #[inline]
        fn persist_mut(&mut self) -> $crate::PersistMut<'_> {
            $crate::PersistMut::$kind(self)
        }

        fn persist_set(
            &mut self,
            value: ::alloc::boxed::Box<dyn $crate::Persist>,
        ) -> ::core::result::Result<(), ::alloc::boxed::Box<dyn $crate::Persist>> {
            *self = value.take::<Self>()?;
            Ok(())
        }
    };
}

pub(crate) use impl_persist_cast_fn;
