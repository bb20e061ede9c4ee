//! Field selection policy.
//!
//! Decides, once per composite type, which of its fields are persisted.
//! Serialization, restoration and backfill all consume the same
//! [`FieldSelection`], so they agree on what a type's saved state is.
//!
//! A field is excluded when, checking in order:
//!
//! 1. its name starts with [`RESERVED_FIELD_PREFIX`];
//! 2. it carries the `skip` marker;
//! 3. its declaring type is `exclusive_save` and the field lacks `save`;
//! 4. its declared type classifies as ignored, and neither the field's
//!    `save` marker nor the type's `always_save` marker forces it.

use alloc::boxed::Box;
use alloc::sync::Arc;
use core::any::TypeId;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use fb_utils::TypeIdMap;

use crate::info::{Classification, FieldInfo, IgnoreReason, TypeInfo};

/// Fields whose names start with this prefix are engine bookkeeping and
/// never persisted.
pub const RESERVED_FIELD_PREFIX: &str = "__";

// -----------------------------------------------------------------------------
// Exclusion

/// Why a field is not persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exclusion {
    /// The name starts with [`RESERVED_FIELD_PREFIX`].
    Reserved,
    /// The field carries the `skip` marker.
    Skipped,
    /// The declaring type is allow-list only and the field lacks `save`.
    NotAllowListed,
    /// The field's type is ignored and nothing forces it.
    IgnoredType(IgnoreReason),
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved => f.write_str("reserved name"),
            Self::Skipped => f.write_str("marked skip"),
            Self::NotAllowListed => f.write_str("not in the allow list"),
            Self::IgnoredType(reason) => write!(f, "ignored type ({reason})"),
        }
    }
}

// -----------------------------------------------------------------------------
// FieldDescriptor

/// A field together with its inclusion decision.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    info: FieldInfo,
    exclusion: Option<Exclusion>,
}

impl FieldDescriptor {
    fn new(info: &FieldInfo) -> Self {
        Self {
            exclusion: decide(info),
            info: info.clone(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.info.name()
    }

    #[inline]
    pub fn info(&self) -> &FieldInfo {
        &self.info
    }

    /// The declared type of the field.
    #[inline]
    pub fn field_type(&self) -> &'static TypeInfo {
        self.info.type_info()
    }

    #[inline]
    pub fn is_included(&self) -> bool {
        self.exclusion.is_none()
    }

    #[inline]
    pub fn exclusion(&self) -> Option<Exclusion> {
        self.exclusion
    }

    /// Re-checks an included field against the type of the value it
    /// currently holds.
    ///
    /// A polymorphic field may hold a value of an ignored type even though
    /// its declared type is persistable.
    pub fn admits(&self, runtime: &TypeInfo) -> bool {
        self.is_included()
            && (self.info.markers().save
                || runtime.classify() != Classification::Ignored
                || runtime.is_force_saved())
    }
}

fn decide(field: &FieldInfo) -> Option<Exclusion> {
    let markers = field.markers();

    if field.name().starts_with(RESERVED_FIELD_PREFIX) {
        return Some(Exclusion::Reserved);
    }
    if markers.skip {
        return Some(Exclusion::Skipped);
    }
    if field.in_allow_list() {
        return (!markers.save).then_some(Exclusion::NotAllowListed);
    }
    if markers.save {
        return None;
    }

    let ty = field.type_info();
    match ty.ignore_reason() {
        Some(reason) if !ty.is_force_saved() => Some(Exclusion::IgnoredType(reason)),
        _ => None,
    }
}

// -----------------------------------------------------------------------------
// FieldSelection

/// The selection decision for every field of one composite type, in field
/// order.
#[derive(Clone, Debug)]
pub struct FieldSelection {
    type_path: &'static str,
    fields: Box<[FieldDescriptor]>,
    included: usize,
}

impl FieldSelection {
    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// Every field with its decision.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldDescriptor> {
        self.fields.iter()
    }

    /// The persisted fields, inherited first, then declaration order.
    #[inline]
    pub fn included(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|field| field.is_included())
    }

    #[inline]
    pub fn included_len(&self) -> usize {
        self.included
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    #[inline]
    pub fn is_included(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldDescriptor::is_included)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

/// Computes the selection for `info`.
///
/// Non-composite types have no fields and get an empty selection.
pub fn select_fields(info: &'static TypeInfo) -> FieldSelection {
    let fields: Box<[FieldDescriptor]> = match info.as_composite() {
        Some(composite) => composite.iter().map(FieldDescriptor::new).collect(),
        None => Box::new([]),
    };
    let included = fields.iter().filter(|field| field.is_included()).count();

    FieldSelection {
        type_path: info.type_path(),
        fields,
        included,
    }
}

// -----------------------------------------------------------------------------
// SelectionCache

/// Memoized [`FieldSelection`]s keyed by type.
///
/// Safe to share between threads; readers never observe a partially built
/// selection.
pub(crate) struct SelectionCache {
    entries: RwLock<TypeIdMap<Arc<FieldSelection>>>,
    generation: AtomicU64,
}

impl SelectionCache {
    pub(crate) const fn new() -> Self {
        Self {
            entries: RwLock::new(TypeIdMap::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub(crate) fn get_or_compute(&self, info: &'static TypeInfo) -> Arc<FieldSelection> {
        let type_id = info.type_id();
        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned();

        if let Some(selection) = cached {
            return selection;
        }

        let computed = Arc::new(select_fields(info));
        log::trace!(
            "selected {} of {} fields of `{}`",
            computed.included_len(),
            computed.len(),
            info.type_path()
        );
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || computed)
            .clone()
    }

    pub(crate) fn invalidate(&self, type_id: TypeId) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&type_id);
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn invalidate_all(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.generation.fetch_add(1, Ordering::Relaxed);
        log::debug!("field selection cache invalidated");
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::{Exclusion, RESERVED_FIELD_PREFIX, SelectionCache, select_fields};
    use crate::info::{
        CompositeInfo, FieldInfo, FieldMarkers, IgnoreReason, NonGenericTypeInfoCell, TypeInfo,
        TypeMarkers, TypePath, Typed,
    };
    use alloc::sync::Arc;

    macro_rules! declare {
        ($ty:ident, $info:expr) => {
            struct $ty;

            impl TypePath for $ty {
                fn type_path() -> &'static str {
                    concat!("test::", stringify!($ty))
                }
                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }

            impl Typed for $ty {
                fn type_info() -> &'static TypeInfo {
                    static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                    CELL.get_or_init(|| $info)
                }
            }
        };
    }

    const SAVE: FieldMarkers = FieldMarkers {
        save: true,
        skip: false,
    };
    const SKIP: FieldMarkers = FieldMarkers {
        save: false,
        skip: true,
    };

    declare!(
        Sprite,
        TypeInfo::opaque::<Sprite>().with_markers(TypeMarkers::ignored(IgnoreReason::Resource))
    );
    declare!(
        Anchor,
        TypeInfo::composite::<Anchor>(CompositeInfo::new::<Anchor>(
            false,
            &[FieldInfo::new::<f32>("x")]
        ))
        .with_markers(TypeMarkers {
            ignore: Some(IgnoreReason::SceneHandle),
            always_save: true,
            exclusive_save: false,
        })
    );
    declare!(
        Actor,
        TypeInfo::composite::<Actor>(CompositeInfo::new::<Actor>(
            false,
            &[
                FieldInfo::new::<i32>("hp"),
                FieldInfo::new::<Sprite>("sprite"),
                FieldInfo::new::<Sprite>("portrait").with_markers(SAVE),
                FieldInfo::new::<Anchor>("anchor"),
                FieldInfo::new::<Vec<Sprite>>("frames"),
                FieldInfo::new::<i32>("__id"),
                FieldInfo::new::<i32>("cache").with_markers(SKIP),
                FieldInfo::new::<i32>("both").with_markers(FieldMarkers {
                    save: true,
                    skip: true,
                }),
            ]
        ))
    );
    declare!(
        Ledger,
        TypeInfo::composite::<Ledger>(CompositeInfo::new::<Ledger>(
            true,
            &[
                FieldInfo::new::<i32>("gold").with_markers(SAVE),
                FieldInfo::new::<i32>("scratch"),
            ]
        ))
    );
    declare!(
        Shop,
        TypeInfo::composite::<Shop>(
            CompositeInfo::new::<Shop>(false, &[FieldInfo::new::<i32>("stock")])
                .with_base::<Ledger>()
        )
    );

    #[test]
    fn exclusion_rules() {
        let selection = select_fields(Actor::type_info());
        let reason = |name| selection.get(name).unwrap().exclusion();

        assert_eq!(reason("hp"), None);
        assert_eq!(
            reason("sprite"),
            Some(Exclusion::IgnoredType(IgnoreReason::Resource))
        );
        assert_eq!(reason("portrait"), None);
        assert_eq!(reason("anchor"), None);
        assert_eq!(
            reason("frames"),
            Some(Exclusion::IgnoredType(IgnoreReason::Resource))
        );
        assert_eq!(reason("__id"), Some(Exclusion::Reserved));
        assert_eq!(reason("cache"), Some(Exclusion::Skipped));
        assert_eq!(reason("both"), Some(Exclusion::Skipped));

        let included: Vec<_> = selection.included().map(|field| field.name()).collect();
        assert_eq!(included, ["hp", "portrait", "anchor"]);
        assert_eq!(selection.included_len(), 3);
        assert!("__id".starts_with(RESERVED_FIELD_PREFIX));
    }

    #[test]
    fn allow_list_governs_only_declared_fields() {
        let selection = select_fields(Shop::type_info());
        let included: Vec<_> = selection.included().map(|field| field.name()).collect();

        // `scratch` is inherited from an allow-list base; `stock` is not.
        assert_eq!(included, ["gold", "stock"]);
        assert_eq!(
            selection.get("scratch").unwrap().exclusion(),
            Some(Exclusion::NotAllowListed)
        );
        assert_eq!(
            selection.get("gold").unwrap().info().declared_in(),
            "test::Ledger"
        );
    }

    #[test]
    fn runtime_types_are_rechecked() {
        let selection = select_fields(Actor::type_info());
        let hp = selection.get("hp").unwrap();
        let portrait = selection.get("portrait").unwrap();

        assert!(hp.admits(i32::type_info()));
        assert!(!hp.admits(Sprite::type_info()));
        assert!(hp.admits(Anchor::type_info()));
        assert!(portrait.admits(Sprite::type_info()));
    }

    #[test]
    fn cache_memoizes_until_invalidated() {
        let cache = SelectionCache::new();
        let first = cache.get_or_compute(Actor::type_info());
        let second = cache.get_or_compute(Actor::type_info());
        assert!(Arc::ptr_eq(&first, &second));

        cache.invalidate_all();
        assert_eq!(cache.generation(), 1);
        let third = cache.get_or_compute(Actor::type_info());
        assert!(!Arc::ptr_eq(&first, &third));
    }
}
