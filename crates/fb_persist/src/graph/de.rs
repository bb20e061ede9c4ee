use alloc::boxed::Box;

use fb_utils::hash::HashSet;

use crate::error::{FieldAccessError, FieldError, PersistError};
use crate::info::{TypeInfo, Typed};
use crate::record::{SaveRecord, Value};
use crate::{Composite, Persist, PersistContext, PersistMut};

// -----------------------------------------------------------------------------
// RestoredFields

/// The top-level fields a [`restore_into`] call assigned.
///
/// Hand it to [`backfill_defaults`](crate::backfill::backfill_defaults) to
/// re-seed only the fields the record did not provide. It names fields, not
/// an object, so it stays valid when the restored value is moved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RestoredFields(HashSet<&'static str>);

impl RestoredFields {
    /// No field restored, as for a value that was never loaded.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &'static str> + '_ {
        self.0.iter().copied()
    }

    #[inline]
    pub(crate) fn insert(&mut self, name: &'static str) {
        self.0.insert(name);
    }
}

// -----------------------------------------------------------------------------
// Restore

/// Restores a record into an existing composite value.
///
/// Entries are applied by name. Entries the current type no longer has, or
/// no longer persists, are dropped. Fields without an entry keep their
/// current value. A field that fails to restore is reported to the
/// context's diagnostics and keeps its current value, except that a
/// sequence keeps the elements read before the failing one.
///
/// The record's type path is informational: a record written by an earlier
/// version of a type restores into the current one.
///
/// Returns the top-level fields that were assigned.
///
/// # Errors
///
/// [`PersistError::NotComposite`] if `target` is not a composite.
pub fn restore_into(
    target: &mut dyn Persist,
    record: &SaveRecord,
    ctx: &mut PersistContext,
) -> Result<RestoredFields, PersistError> {
    let info = target.persist_type_info();
    if record.type_path() != info.type_path() {
        log::debug!(
            "restoring a `{}` record into `{}`",
            record.type_path(),
            info.type_path()
        );
    }

    match target.persist_mut() {
        PersistMut::Composite(composite) => {
            ctx.enter_root(info.type_name());
            let restored = read_composite(composite, info, record, ctx);
            ctx.leave();
            Ok(restored)
        }
        PersistMut::Dynamic(inner) => restore_into(&mut **inner, record, ctx),
        _ => Err(PersistError::NotComposite {
            type_path: info.type_path(),
        }),
    }
}

/// Constructs an instance of the registered type `type_path` and restores
/// `record` into it.
///
/// # Errors
///
/// [`PersistError::Construction`] if the type cannot be constructed.
pub fn deserialize(
    record: &SaveRecord,
    type_path: &str,
    ctx: &mut PersistContext,
) -> Result<Box<dyn Persist>, PersistError> {
    let mut target = ctx.registry().construct_by_path(type_path)?;
    restore_into(&mut *target, record, ctx)?;
    Ok(target)
}

/// Restores `record` into a default `T`.
///
/// Fields without an entry keep the values `T::default()` gave them.
pub fn deserialize_as<T: Typed + Persist + Default>(
    record: &SaveRecord,
    ctx: &mut PersistContext,
) -> Result<T, PersistError> {
    let mut target = T::default();
    restore_into(&mut target, record, ctx)?;
    Ok(target)
}

pub(crate) fn read_composite(
    composite: &mut dyn Composite,
    info: &'static TypeInfo,
    record: &SaveRecord,
    ctx: &mut PersistContext,
) -> RestoredFields {
    let mut restored = RestoredFields::new();
    let selection = ctx.registry().selection(info);

    for (name, value) in record.iter() {
        let Some(field) = selection.get(name).filter(|field| field.is_included()) else {
            log::debug!(
                "dropping entry `{name}` of `{}`: not a persisted field",
                info.type_path()
            );
            continue;
        };

        ctx.enter_field(field.name());
        let result = composite
            .field_mut(field.name())
            .map_err(FieldError::from)
            .and_then(|slot| read_value(slot, value, ctx));
        match result {
            Ok(()) => restored.insert(field.name()),
            Err(err) => ctx.report(err),
        }
        ctx.leave();
    }

    restored
}

/// Assigns a stored value to a live slot, recursing into structure.
pub(crate) fn read_value(
    slot: &mut dyn Persist,
    value: &Value,
    ctx: &mut PersistContext,
) -> Result<(), FieldError> {
    match slot.persist_mut() {
        PersistMut::Primitive(primitive) => primitive.set_value(value).map_err(FieldError::from),
        PersistMut::Composite(composite) => {
            let info = composite.persist_type_info();
            let Value::Record(record) = value else {
                return Err(FieldAccessError::ExpectedRecord {
                    type_path: info.type_path(),
                    found: value.kind_name(),
                }
                .into());
            };
            read_composite(composite, info, record, ctx);
            Ok(())
        }
        PersistMut::Nullable(nullable) => match value {
            Value::Null => {
                nullable.set_none();
                Ok(())
            }
            _ => {
                let was_none = nullable.get().is_none();
                let result = read_value(nullable.get_or_insert_default(), value, ctx);
                if result.is_err() && was_none {
                    nullable.set_none();
                }
                result
            }
        },
        PersistMut::Sequence(sequence) => {
            let Value::List(items) = value else {
                return Err(FieldAccessError::ExpectedList {
                    type_path: sequence.persist_type_info().type_path(),
                    found: value.kind_name(),
                }
                .into());
            };
            sequence.clear();
            sequence.reserve(items.len());
            for (index, item) in items.iter().enumerate() {
                ctx.enter_index(index);
                let result = read_value(sequence.push_default(), item, ctx);
                ctx.leave();
                result?;
            }
            Ok(())
        }
        PersistMut::Dynamic(inner) => {
            // Only records name their type; other values keep the slot's.
            if let Value::Record(record) = value
                && inner.persist_type_info().type_path() != record.type_path()
            {
                *inner = ctx.registry().construct_by_path(record.type_path())?;
            }
            read_value(&mut **inner, value, ctx)
        }
        PersistMut::Opaque(opaque) => Err(FieldError::UnsupportedFieldType {
            type_path: opaque.persist_type_info().type_path(),
        }),
    }
}
