use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;

use fb_utils::TypeIdMap;
use fb_utils::hash::{HashMap, HashSet};

use crate::info::{TypeInfo, Typed};
use crate::registry::{FromType, GetTypeMeta, TypeMeta, TypeTrait};
use crate::select::{FieldSelection, SelectionCache};

// -----------------------------------------------------------------------------
// TypeRegistry

/// Central store of type metadata.
///
/// Holds one [`TypeMeta`] per registered type, indexed by `TypeId`, by full
/// type path and by short type name. Short names shared by several types
/// are ambiguous and not indexed.
///
/// The registry also owns the [`FieldSelection`] cache used by every graph
/// operation. The cache is invalidated when a type's metadata is replaced
/// and by [`hot_swap`](crate::hot_swap::hot_swap).
///
/// # Example
///
/// ```
/// use fb_persist::registry::{TypeRegistry, TypeTraitDefault};
///
/// let registry = TypeRegistry::new();
/// let meta = registry.get_with_type_path("f32").unwrap();
/// assert!(meta.has_trait::<TypeTraitDefault>());
/// ```
pub struct TypeRegistry {
    type_meta_table: TypeIdMap<TypeMeta>,
    type_path_to_id: HashMap<&'static str, TypeId>,
    type_name_to_id: HashMap<&'static str, TypeId>,
    ambiguous_names: HashSet<&'static str>,
    selections: SelectionCache,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`].
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry without any types.
    pub fn empty() -> Self {
        Self {
            type_meta_table: TypeIdMap::new(),
            type_path_to_id: HashMap::default(),
            type_name_to_id: HashMap::default(),
            ambiguous_names: HashSet::default(),
            selections: SelectionCache::new(),
        }
    }

    /// Creates a registry with the built-in scalar types registered.
    ///
    /// - `bool`
    /// - `i8 - i64` `isize`
    /// - `u8 - u64` `usize`
    /// - `f32` `f64`
    /// - `String`
    /// - `glam::Vec2` and [`Color`](crate::record::Color)
    pub fn new() -> Self {
        use crate::record::Color;
        use alloc::string::String;
        use glam::Vec2;

        let mut registry = Self::empty();
        registry.register::<bool>();
        registry.register::<i8>();
        registry.register::<i16>();
        registry.register::<i32>();
        registry.register::<i64>();
        registry.register::<isize>();
        registry.register::<u8>();
        registry.register::<u16>();
        registry.register::<u32>();
        registry.register::<u64>();
        registry.register::<usize>();
        registry.register::<f32>();
        registry.register::<f64>();
        registry.register::<String>();
        registry.register::<Vec2>();
        registry.register::<Color>();
        registry
    }

    // The type must not be registered yet.
    fn add_new_type_indices(
        type_meta: &TypeMeta,
        type_path_to_id: &mut HashMap<&'static str, TypeId>,
        type_name_to_id: &mut HashMap<&'static str, TypeId>,
        ambiguous_names: &mut HashSet<&'static str>,
    ) {
        let ty = type_meta.ty();
        let type_name = ty.name();

        if !ambiguous_names.contains(type_name) {
            if type_name_to_id.contains_key(type_name) {
                type_name_to_id.remove(type_name);
                ambiguous_names.insert(type_name);
            } else {
                type_name_to_id.insert(type_name, ty.id());
            }
        }

        if type_path_to_id.insert(ty.path(), ty.id()).is_some() {
            log::warn!(
                "type path `{}` is claimed by more than one type, keeping the latest",
                ty.path()
            );
        }
    }

    // Inserts and returns `true` if `type_id` is vacant.
    fn register_internal(
        &mut self,
        type_id: TypeId,
        get_type_meta: impl FnOnce() -> TypeMeta,
    ) -> bool {
        self.type_meta_table.try_insert(type_id, || {
            let meta = get_type_meta();
            Self::add_new_type_indices(
                &meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
            meta
        })
    }

    /// Registers `T` and, recursively, its dependencies.
    ///
    /// Does nothing if `T` is already registered. Use
    /// [`insert_type_meta`](Self::insert_type_meta) to replace an entry.
    pub fn register<T: GetTypeMeta>(&mut self) {
        if self.register_internal(TypeId::of::<T>(), T::get_type_meta) {
            log::trace!("registered `{}`", T::type_path());
            T::register_dependencies(self);
        }
    }

    /// Inserts or replaces a [`TypeMeta`].
    ///
    /// Replacing an entry drops the cached field selection of that type.
    /// Dependencies are not registered.
    pub fn insert_type_meta(&mut self, type_meta: TypeMeta) {
        let type_id = type_meta.type_id();
        if self.type_meta_table.contains(&type_id) {
            self.selections.invalidate(type_id);
        } else {
            Self::add_new_type_indices(
                &type_meta,
                &mut self.type_path_to_id,
                &mut self.type_name_to_id,
                &mut self.ambiguous_names,
            );
        }
        self.type_meta_table.insert(type_id, type_meta);
    }

    /// Registers every type declared with `#[persist(auto_register)]`.
    ///
    /// Repeated calls are cheap. Returns `false` if the platform does not
    /// support static registration or the `auto_register` feature is off.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        crate::cfg::auto_register! {
            if {
                crate::__macro_exports::auto_register::register_all(self)
            } else {
                false
            }
        }
    }

    /// Adds the capability `D` to the already registered type `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not registered.
    pub fn register_type_trait<T: Typed, D: TypeTrait + FromType<T>>(&mut self) {
        match self.type_meta_table.get_mut(&TypeId::of::<T>()) {
            Some(type_meta) => type_meta.insert_trait(D::from_type()),
            None => panic!(
                "called `TypeRegistry::register_type_trait` for `{}` before registering it",
                T::type_path(),
            ),
        }
    }

    #[inline]
    pub fn contains(&self, type_id: TypeId) -> bool {
        self.type_meta_table.contains(&type_id)
    }

    #[inline]
    pub fn get(&self, type_id: TypeId) -> Option<&TypeMeta> {
        self.type_meta_table.get(&type_id)
    }

    #[inline]
    pub fn get_mut(&mut self, type_id: TypeId) -> Option<&mut TypeMeta> {
        self.type_meta_table.get_mut(&type_id)
    }

    /// Looks a type up by its full [type path](crate::info::TypePath::type_path).
    pub fn get_with_type_path(&self, type_path: &str) -> Option<&TypeMeta> {
        match self.type_path_to_id.get(type_path) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Looks a type up by its short [type name](crate::info::TypePath::type_name).
    ///
    /// Returns `None` if the name is ambiguous.
    pub fn get_with_type_name(&self, type_name: &str) -> Option<&TypeMeta> {
        match self.type_name_to_id.get(type_name) {
            Some(id) => self.get(*id),
            None => None,
        }
    }

    /// Returns `true` if several registered types share this short name.
    pub fn is_ambiguous(&self, type_name: &str) -> bool {
        self.ambiguous_names.contains(type_name)
    }

    pub fn get_type_trait<T: TypeTrait>(&self, type_id: TypeId) -> Option<&T> {
        match self.get(type_id) {
            Some(type_meta) => type_meta.get_trait::<T>(),
            None => None,
        }
    }

    pub fn get_type_info(&self, type_id: TypeId) -> Option<&'static TypeInfo> {
        self.get(type_id).map(TypeMeta::type_info)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &TypeMeta> {
        self.type_meta_table.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.type_meta_table.len()
    }

    // -------------------------------------------------------------------------
    // Field selection cache

    /// Returns the field selection of `info`, computing it on first use.
    ///
    /// Works for unregistered types as well.
    #[inline]
    pub fn selection(&self, info: &'static TypeInfo) -> Arc<FieldSelection> {
        self.selections.get_or_compute(info)
    }

    /// Drops every cached field selection.
    #[inline]
    pub fn invalidate_selections(&self) {
        self.selections.invalidate_all();
    }

    /// Number of times the selection cache has been invalidated.
    #[inline]
    pub fn selection_generation(&self) -> u64 {
        self.selections.generation()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.type_path_to_id.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::TypeRegistry;
    use crate::registry::{TypeTraitClone, TypeTraitDefault};
    use core::any::TypeId;

    #[test]
    fn new_registers_scalars_with_constructors() {
        let registry = TypeRegistry::new();
        for path in ["bool", "i32", "u64", "f32", "alloc::string::String", "glam::Vec2"] {
            let meta = registry.get_with_type_path(path).unwrap();
            assert!(meta.has_trait::<TypeTraitDefault>(), "{path}");
            assert!(meta.has_trait::<TypeTraitClone>(), "{path}");
        }
        assert!(registry.get_with_type_name("String").is_some());
    }

    #[test]
    fn register_pulls_in_wrapped_types() {
        let mut registry = TypeRegistry::empty();
        registry.register::<Vec<Option<u8>>>();

        assert!(registry.contains(TypeId::of::<Vec<Option<u8>>>()));
        assert!(registry.contains(TypeId::of::<Option<u8>>()));
        assert!(registry.contains(TypeId::of::<u8>()));
        assert_eq!(registry.len(), 3);
    }
}
