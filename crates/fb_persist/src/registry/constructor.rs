use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::format;
use alloc::string::ToString;
use core::any::TypeId;
use core::fmt;

use crate::Persist;
use crate::error::ConstructionError;
use crate::info::{TypePath, Typed};
use crate::registry::{TypeMeta, TypeRegistry, TypeTraitDefault};

// -----------------------------------------------------------------------------
// AssemblyScope

/// The module scope a short type name is resolved in.
///
/// Game code refers to types by short names such as `"Door"`; the scope
/// says which module they live in, e.g. `"game::rooms"`. Versions of the
/// same type loaded side by side live in different scopes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AssemblyScope(Cow<'static, str>);

impl AssemblyScope {
    /// The root scope: names must be full type paths.
    pub const GLOBAL: Self = Self(Cow::Borrowed(""));

    #[inline]
    pub fn new(module_path: impl Into<Cow<'static, str>>) -> Self {
        Self(module_path.into())
    }

    /// The scope `T` is declared in.
    #[inline]
    pub fn of<T: TypePath>() -> Self {
        Self::new(T::module_path().unwrap_or(""))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_global(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefixes `name` with this scope.
    pub fn qualify<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.is_global() {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(format!("{}::{name}", self.0))
        }
    }

    /// Returns `true` if `module_path` is this scope or nested in it.
    pub fn contains(&self, module_path: &str) -> bool {
        if self.is_global() {
            return true;
        }
        match module_path.strip_prefix(self.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with("::"),
            None => false,
        }
    }
}

impl fmt::Display for AssemblyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_global() {
            f.write_str("<global>")
        } else {
            f.write_str(&self.0)
        }
    }
}

// -----------------------------------------------------------------------------
// Name-based construction

impl TypeRegistry {
    /// Resolves a type name within `scope`.
    ///
    /// Tried in order:
    ///
    /// 1. `name` qualified by `scope`.
    /// 2. `name` as a full type path.
    /// 3. `name` as a short type name, if it is unambiguous and the type
    ///    lives inside `scope`.
    pub fn resolve(&self, name: &str, scope: &AssemblyScope) -> Result<&TypeMeta, ConstructionError> {
        if !scope.is_global()
            && let Some(meta) = self.get_with_type_path(&scope.qualify(name))
        {
            return Ok(meta);
        }

        if let Some(meta) = self.get_with_type_path(name) {
            return Ok(meta);
        }

        if let Some(meta) = self.get_with_type_name(name)
            && scope.contains(meta.ty().module_path().unwrap_or(""))
        {
            return Ok(meta);
        }

        Err(ConstructionError::TypeResolution {
            name: name.to_string(),
            scope: scope.to_string(),
        })
    }

    /// Creates a default instance of the type named `name` in `scope`.
    ///
    /// # Example
    ///
    /// ```
    /// use fb_persist::registry::{AssemblyScope, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new();
    /// let value = registry.construct_dyn("f32", &AssemblyScope::GLOBAL).unwrap();
    /// assert_eq!(value.take::<f32>().unwrap(), 0.0);
    ///
    /// assert!(registry.construct_dyn("Missing", &AssemblyScope::GLOBAL).is_err());
    /// ```
    pub fn construct_dyn(
        &self,
        name: &str,
        scope: &AssemblyScope,
    ) -> Result<Box<dyn Persist>, ConstructionError> {
        Self::construct_meta(self.resolve(name, scope)?)
    }

    /// Like [`construct_dyn`](Self::construct_dyn), then checks the result is a `T`.
    pub fn construct<T: Typed + Persist>(
        &self,
        name: &str,
        scope: &AssemblyScope,
    ) -> Result<T, ConstructionError> {
        self.construct_dyn(name, scope)?
            .take::<T>()
            .map_err(|value| ConstructionError::TypeMismatch {
                expected: T::type_path(),
                found: value.type_path(),
            })
    }

    /// Creates a default instance of a registered type by id.
    pub fn construct_by_id(&self, type_id: TypeId) -> Result<Box<dyn Persist>, ConstructionError> {
        match self.get(type_id) {
            Some(meta) => Self::construct_meta(meta),
            None => Err(ConstructionError::TypeResolution {
                name: format!("{type_id:?}"),
                scope: AssemblyScope::GLOBAL.to_string(),
            }),
        }
    }

    /// Creates a default instance of a registered type by full path.
    pub fn construct_by_path(&self, type_path: &str) -> Result<Box<dyn Persist>, ConstructionError> {
        self.construct_dyn(type_path, &AssemblyScope::GLOBAL)
    }

    fn construct_meta(meta: &TypeMeta) -> Result<Box<dyn Persist>, ConstructionError> {
        match meta.get_trait::<TypeTraitDefault>() {
            Some(default) => Ok(default.default()),
            None => Err(ConstructionError::NoDefaultConstructor {
                type_path: Cow::Borrowed(meta.type_path()),
            }),
        }
    }
}
