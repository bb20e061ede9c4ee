use core::any::TypeId;
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// TypePath

/// A stable, fully-qualified name for a type.
///
/// Unlike [`core::any::type_name`], the path is part of the saved data:
/// records carry it and name-based construction resolves it, so it must not
/// change between builds unless the type itself is renamed.
///
/// `#[derive(Persist)]` implements this as `module_path!()::Ident`, or with
/// the literal given by `#[persist(type_path = "...")]`.
pub trait TypePath: 'static {
    /// Full path, e.g. `"game::rooms::Door"`.
    fn type_path() -> &'static str;

    /// Short name, e.g. `"Door"`.
    fn type_name() -> &'static str;

    /// Module part of the path, e.g. `"game::rooms"`.
    ///
    /// `None` for built-in types.
    fn module_path() -> Option<&'static str> {
        None
    }
}

// -----------------------------------------------------------------------------
// Type

/// A [`TypeId`] together with the type's [`TypePath`] names.
///
/// Equality and hashing only consider the `TypeId`.
#[derive(Clone, Copy)]
pub struct Type {
    id: TypeId,
    path: &'static str,
    name: &'static str,
    module_path: Option<&'static str>,
}

impl Type {
    /// Creates the `Type` of `T`.
    #[inline]
    pub fn of<T: TypePath>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: T::type_path(),
            name: T::type_name(),
            module_path: T::module_path(),
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn path(&self) -> &'static str {
        self.path
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn module_path(&self) -> Option<&'static str> {
        self.module_path
    }

    /// Returns `true` if this is the type `T`.
    #[inline]
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for Type {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Type {}

impl Hash for Type {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}
