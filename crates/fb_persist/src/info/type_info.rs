use core::any::TypeId;
use core::fmt;

use crate::info::{CompositeInfo, Type, TypePath, Typed};

// -----------------------------------------------------------------------------
// Markers

/// Why a type is excluded from persistence by default.
///
/// These are the categories the engine never writes out on its own:
/// live engine state is rebuilt by the engine after a load, not restored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    /// Scene-graph nodes, components and other handles into the live scene.
    SceneHandle,
    /// Loaded assets such as textures, sounds and fonts.
    Resource,
    /// Event handlers and other callables.
    Callback,
    /// In-flight coroutines and timers.
    Coroutine,
    /// Compiler- or macro-generated helper state.
    Synthesized,
    /// No portable representation, e.g. raw handles.
    Unrepresentable,
}

impl IgnoreReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SceneHandle => "scene handle",
            Self::Resource => "resource",
            Self::Callback => "callback",
            Self::Coroutine => "coroutine",
            Self::Synthesized => "synthesized",
            Self::Unrepresentable => "unrepresentable",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-level persistence markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TypeMarkers {
    /// The type belongs to an ignored category.
    pub ignore: Option<IgnoreReason>,
    /// Fields of this type are saved even if the type is ignored.
    pub always_save: bool,
    /// Only fields marked `save` are persisted for this type.
    pub exclusive_save: bool,
}

impl TypeMarkers {
    pub const NONE: Self = Self {
        ignore: None,
        always_save: false,
        exclusive_save: false,
    };

    #[inline]
    pub const fn ignored(reason: IgnoreReason) -> Self {
        Self {
            ignore: Some(reason),
            always_save: false,
            exclusive_save: false,
        }
    }
}

// -----------------------------------------------------------------------------
// Kinds

/// Scalar shapes a primitive type stores as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
    Str,
    Vec2,
    Color,
    /// Fieldless enum, stored by discriminant.
    Enum,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrimitiveInfo {
    pub scalar: ScalarKind,
}

/// `Option<T>`-like wrapper around one inner value.
#[derive(Clone, Copy)]
pub struct NullableInfo {
    inner: fn() -> &'static TypeInfo,
}

impl NullableInfo {
    #[inline]
    pub fn inner(&self) -> &'static TypeInfo {
        (self.inner)()
    }
}

impl fmt::Debug for NullableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullableInfo")
            .field("inner", &self.inner().type_path())
            .finish()
    }
}

/// `Vec<T>`-like ordered sequence.
#[derive(Clone, Copy)]
pub struct SequenceInfo {
    item: fn() -> &'static TypeInfo,
}

impl SequenceInfo {
    #[inline]
    pub fn item(&self) -> &'static TypeInfo {
        (self.item)()
    }
}

impl fmt::Debug for SequenceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceInfo")
            .field("item", &self.item().type_path())
            .finish()
    }
}

/// The structural shape of a type.
#[derive(Clone, Debug)]
pub enum TypeKind {
    Primitive(PrimitiveInfo),
    Composite(CompositeInfo),
    Nullable(NullableInfo),
    Sequence(SequenceInfo),
    /// A polymorphic slot, `Box<dyn Persist>`. The concrete type is only
    /// known at runtime.
    Dynamic,
    /// No structure the engine can walk.
    Opaque,
}

impl TypeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive(_) => "primitive",
            Self::Composite(_) => "composite",
            Self::Nullable(_) => "nullable",
            Self::Sequence(_) => "sequence",
            Self::Dynamic => "dynamic",
            Self::Opaque => "opaque",
        }
    }
}

// -----------------------------------------------------------------------------
// Classification

/// The classifier's verdict for a type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Stored as a scalar.
    Primitive,
    /// Not persisted unless forced.
    Ignored,
    /// Walked field by field.
    Composite,
}

// -----------------------------------------------------------------------------
// TypeInfo

/// Static schema of a persistable type.
///
/// Obtained through [`Typed::type_info`] or, for a value whose static type
/// is erased, [`Persist::persist_type_info`](crate::Persist::persist_type_info).
#[derive(Clone, Debug)]
pub struct TypeInfo {
    ty: Type,
    kind: TypeKind,
    markers: TypeMarkers,
}

impl TypeInfo {
    #[inline]
    pub fn primitive<T: TypePath>(scalar: ScalarKind) -> Self {
        Self::new::<T>(TypeKind::Primitive(PrimitiveInfo { scalar }))
    }

    #[inline]
    pub fn composite<T: TypePath>(info: CompositeInfo) -> Self {
        Self::new::<T>(TypeKind::Composite(info))
    }

    #[inline]
    pub fn nullable<T: TypePath, I: Typed>() -> Self {
        Self::new::<T>(TypeKind::Nullable(NullableInfo {
            inner: I::type_info,
        }))
    }

    #[inline]
    pub fn sequence<T: TypePath, I: Typed>() -> Self {
        Self::new::<T>(TypeKind::Sequence(SequenceInfo { item: I::type_info }))
    }

    #[inline]
    pub fn dynamic<T: TypePath>() -> Self {
        Self::new::<T>(TypeKind::Dynamic)
    }

    #[inline]
    pub fn opaque<T: TypePath>() -> Self {
        Self::new::<T>(TypeKind::Opaque)
    }

    #[inline]
    fn new<T: TypePath>(kind: TypeKind) -> Self {
        Self {
            ty: Type::of::<T>(),
            kind,
            markers: TypeMarkers::NONE,
        }
    }

    /// Replaces the type-level markers.
    #[inline]
    pub fn with_markers(mut self, markers: TypeMarkers) -> Self {
        self.markers = markers;
        self
    }

    #[inline]
    pub const fn ty(&self) -> &Type {
        &self.ty
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.ty.id()
    }

    #[inline]
    pub const fn type_path(&self) -> &'static str {
        self.ty.path()
    }

    #[inline]
    pub const fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub const fn kind(&self) -> &TypeKind {
        &self.kind
    }

    #[inline]
    pub const fn markers(&self) -> &TypeMarkers {
        &self.markers
    }

    #[inline]
    pub const fn as_composite(&self) -> Option<&CompositeInfo> {
        match &self.kind {
            TypeKind::Composite(info) => Some(info),
            _ => None,
        }
    }

    /// Returns why this type is ignored, if it is.
    ///
    /// Own markers take precedence; wrappers inherit the reason of what they
    /// wrap, and opaque types are [`IgnoreReason::Unrepresentable`].
    pub fn ignore_reason(&self) -> Option<IgnoreReason> {
        if let Some(reason) = self.markers.ignore {
            return Some(reason);
        }
        match &self.kind {
            TypeKind::Nullable(info) => info.inner().ignore_reason(),
            TypeKind::Sequence(info) => info.item().ignore_reason(),
            TypeKind::Opaque => Some(IgnoreReason::Unrepresentable),
            _ => None,
        }
    }

    /// Decides how the engine treats values of this type.
    ///
    /// Pure function of the type; results are stable for the process lifetime.
    pub fn classify(&self) -> Classification {
        if self.ignore_reason().is_some() {
            return Classification::Ignored;
        }
        match &self.kind {
            TypeKind::Primitive(_) => Classification::Primitive,
            TypeKind::Nullable(info) => info.inner().classify(),
            TypeKind::Composite(_) | TypeKind::Sequence(_) | TypeKind::Dynamic => {
                Classification::Composite
            }
            // `ignore_reason` covers it.
            TypeKind::Opaque => Classification::Ignored,
        }
    }

    /// Returns `true` if fields of this type are saved despite an ignore reason.
    ///
    /// Wrappers are forced when what they wrap is.
    pub fn is_force_saved(&self) -> bool {
        if self.markers.always_save {
            return true;
        }
        match &self.kind {
            TypeKind::Nullable(info) => info.inner().is_force_saved(),
            TypeKind::Sequence(info) => info.item().is_force_saved(),
            _ => false,
        }
    }
}
