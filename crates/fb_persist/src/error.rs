//! Error taxonomy.
//!
//! Two families with different propagation rules:
//!
//! - Field-level errors ([`FieldError`] and what it wraps) are contained to
//!   the field that raised them. Graph operations report them to
//!   [`Diagnostics`](crate::Diagnostics) and continue with the next field.
//! - Operation-level errors ([`ConstructionError`], [`PersistError`]) mean no
//!   meaningful result exists and are returned to the caller.

use alloc::borrow::Cow;
use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ValueError

/// A stored [`Value`](crate::record::Value) does not fit the slot it is assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value has the wrong shape, e.g. a string for a `bool` field.
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// A numeric value does not fit the target width.
    #[error("{value} is out of range for `{target}`")]
    OutOfRange { value: String, target: &'static str },
    /// No variant of an enumerated type has this discriminant.
    #[error("no variant of `{type_path}` has discriminant {discriminant}")]
    UnknownDiscriminant {
        type_path: &'static str,
        discriminant: i64,
    },
}

// -----------------------------------------------------------------------------
// FieldAccessError

/// Reading or writing one field failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldAccessError {
    /// The type declares no field with this name.
    #[error("no field named `{field}` on `{type_path}`")]
    NoSuchField {
        type_path: &'static str,
        field: String,
    },
    /// The accessor exists but cannot produce the field right now.
    #[error("field `{field}` of `{type_path}` is unavailable: {reason}")]
    Unavailable {
        type_path: &'static str,
        field: &'static str,
        reason: Cow<'static, str>,
    },
    /// The stored value could not be assigned.
    #[error(transparent)]
    Value(#[from] ValueError),
    /// A composite slot received something other than a record.
    #[error("expected a record for `{type_path}`, found {found}")]
    ExpectedRecord {
        type_path: &'static str,
        found: &'static str,
    },
    /// A sequence slot received something other than a list.
    #[error("expected a list for `{type_path}`, found {found}")]
    ExpectedList {
        type_path: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// ConstructionError

/// A type could not be resolved or default-constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    /// No registered type matches the name in the given scope.
    #[error("type `{name}` cannot be resolved in scope `{scope}`")]
    TypeResolution { name: String, scope: String },
    /// The type is registered without a zero-argument constructor.
    #[error("type `{type_path}` has no default constructor")]
    NoDefaultConstructor { type_path: Cow<'static, str> },
    /// The constructed value is not of the requested static type.
    #[error("constructed `{found}` where `{expected}` was requested")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

// -----------------------------------------------------------------------------
// FieldError

/// Any failure contained to a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The field's runtime type has no serialization rule.
    #[error("type `{type_path}` has no serialization rule")]
    UnsupportedFieldType { type_path: &'static str },
    #[error(transparent)]
    Access(#[from] FieldAccessError),
    /// A polymorphic slot could not be rebuilt as the recorded type.
    #[error(transparent)]
    Construction(#[from] ConstructionError),
}

impl From<ValueError> for FieldError {
    #[inline]
    fn from(value: ValueError) -> Self {
        Self::Access(FieldAccessError::Value(value))
    }
}

// -----------------------------------------------------------------------------
// PersistError

/// A whole save, restore or hook invocation failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistError {
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    /// Top-level save and restore targets must be composite.
    #[error("`{type_path}` is not a composite type")]
    NotComposite { type_path: &'static str },
    /// The operation needs registry metadata the type does not have.
    #[error("type `{type_path}` is not registered")]
    UnregisteredType { type_path: String },
    /// A save set has no entry under the requested key.
    #[error("no entry named `{key}` in the save set")]
    MissingEntry { key: String },
    /// A post-restore hook reported a failure.
    #[error("post-restore hook of `{type_path}` failed: {message}")]
    Hook {
        type_path: &'static str,
        message: Cow<'static, str>,
    },
}

#[cfg(test)]
mod tests {
    use super::{FieldAccessError, FieldError, ValueError};
    use alloc::string::ToString;

    #[test]
    fn value_errors_surface_through_field_errors() {
        let err = FieldError::from(ValueError::Mismatch {
            expected: "bool",
            found: "string",
        });

        assert!(matches!(
            err,
            FieldError::Access(FieldAccessError::Value(ValueError::Mismatch { .. }))
        ));
        assert_eq!(err.to_string(), "expected bool, found string");
    }
}
