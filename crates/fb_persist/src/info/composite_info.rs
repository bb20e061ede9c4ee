use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::info::{TypeInfo, TypePath, Typed};

// -----------------------------------------------------------------------------
// FieldMarkers

/// Field-level persistence markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FieldMarkers {
    /// Persist this field even if its type is ignored. In an allow-list
    /// type, only fields with this marker are persisted.
    pub save: bool,
    /// Never persist this field. Wins over `save`.
    pub skip: bool,
}

impl FieldMarkers {
    pub const NONE: Self = Self {
        save: false,
        skip: false,
    };
}

// -----------------------------------------------------------------------------
// FieldInfo

/// Static description of one named field.
#[derive(Clone)]
pub struct FieldInfo {
    name: &'static str,
    type_info: fn() -> &'static TypeInfo,
    type_id: TypeId,
    markers: FieldMarkers,
    declared_in: &'static str,
    allow_list: bool,
}

impl FieldInfo {
    /// Creates a field of type `T` without markers.
    ///
    /// The declaring type is filled in by [`CompositeInfo::new`].
    #[inline]
    pub fn new<T: Typed>(name: &'static str) -> Self {
        Self {
            name,
            type_info: T::type_info,
            type_id: TypeId::of::<T>(),
            markers: FieldMarkers::NONE,
            declared_in: "",
            allow_list: false,
        }
    }

    #[inline]
    pub const fn with_markers(mut self, markers: FieldMarkers) -> Self {
        self.markers = markers;
        self
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The declared (static) type of the field.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        (self.type_info)()
    }

    #[inline]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    #[inline]
    pub const fn markers(&self) -> &FieldMarkers {
        &self.markers
    }

    /// Path of the type that declares this field; a base type for inherited fields.
    #[inline]
    pub const fn declared_in(&self) -> &'static str {
        self.declared_in
    }

    /// Returns `true` if the declaring type persists only `save` fields.
    #[inline]
    pub const fn in_allow_list(&self) -> bool {
        self.allow_list
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("type", &self.type_info().type_path())
            .field("markers", &self.markers)
            .field("declared_in", &self.declared_in)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// CompositeInfo

/// Ordered fields of a composite type.
///
/// Inherited fields come first, in the base type's own order, followed by
/// fields declared on the type itself in declaration order.
#[derive(Clone, Debug)]
pub struct CompositeInfo {
    fields: Box<[FieldInfo]>,
    base: Option<fn() -> &'static TypeInfo>,
    inherited: usize,
}

impl CompositeInfo {
    /// Creates the field list of `T`.
    ///
    /// `allow_list` is `T`'s `exclusive_save` marker; it only governs the
    /// fields declared here.
    pub fn new<T: TypePath>(allow_list: bool, fields: &[FieldInfo]) -> Self {
        let fields = fields
            .iter()
            .cloned()
            .map(|mut field| {
                field.declared_in = T::type_path();
                field.allow_list = allow_list;
                field
            })
            .collect();

        Self {
            fields,
            base: None,
            inherited: 0,
        }
    }

    /// Prepends the fields of the composite base type `B`.
    ///
    /// # Panics
    ///
    /// Panics if `B` is not a composite type.
    pub fn with_base<B: Typed>(self) -> Self {
        let Some(base) = B::type_info().as_composite() else {
            panic!("base type `{}` is not composite", B::type_path());
        };

        let mut fields = Vec::with_capacity(base.len() + self.fields.len());
        fields.extend(base.fields.iter().cloned());
        fields.extend(self.fields.into_vec());

        crate::cfg::debug! {
            for (index, field) in fields.iter().enumerate() {
                assert!(
                    fields[..index].iter().all(|prior| prior.name != field.name),
                    "field `{}` of `{}` shadows an inherited field",
                    field.name,
                    field.declared_in,
                );
            }
        }

        Self {
            inherited: base.len(),
            fields: fields.into_boxed_slice(),
            base: Some(B::type_info),
        }
    }

    /// All fields, inherited first.
    #[inline]
    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Fields declared on the type itself.
    #[inline]
    pub fn own_fields(&self) -> &[FieldInfo] {
        &self.fields[self.inherited..]
    }

    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &FieldInfo> {
        self.fields.iter()
    }

    #[inline]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    #[inline]
    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.fields.iter().map(FieldInfo::name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The base type, if any.
    #[inline]
    pub fn base(&self) -> Option<&'static TypeInfo> {
        self.base.map(|base| base())
    }
}
