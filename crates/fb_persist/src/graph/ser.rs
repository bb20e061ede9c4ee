use alloc::vec::Vec;

use crate::error::{FieldError, PersistError};
use crate::info::TypeInfo;
use crate::record::{SaveRecord, Value};
use crate::select::FieldDescriptor;
use crate::{Composite, Persist, PersistContext, PersistRef};

/// Serializes a composite value into a [`SaveRecord`].
///
/// Only the fields its [`FieldSelection`](crate::select::FieldSelection)
/// includes are written, in field order. A field that fails is reported
/// to the context's diagnostics and left out of the record; its siblings
/// are still written.
///
/// # Errors
///
/// [`PersistError::NotComposite`] if `value` is not a composite.
pub fn serialize(value: &dyn Persist, ctx: &mut PersistContext) -> Result<SaveRecord, PersistError> {
    let info = value.persist_type_info();
    let PersistRef::Composite(composite) = value.persist_ref() else {
        return Err(PersistError::NotComposite {
            type_path: info.type_path(),
        });
    };

    ctx.enter_root(info.type_name());
    let record = write_composite(composite, info, ctx);
    ctx.leave();

    log::trace!("serialized {record}");
    Ok(record)
}

pub(crate) fn write_composite(
    composite: &dyn Composite,
    info: &'static TypeInfo,
    ctx: &mut PersistContext,
) -> SaveRecord {
    let selection = ctx.registry().selection(info);
    let mut record = SaveRecord::with_capacity(info.type_path(), selection.included_len());

    for field in selection.included() {
        ctx.enter_field(field.name());
        match write_field(composite, field, ctx) {
            Ok(Some(value)) => record.push(field.name(), value),
            Ok(None) => {}
            Err(err) => ctx.report(err),
        }
        ctx.leave();
    }

    record
}

fn write_field(
    composite: &dyn Composite,
    field: &FieldDescriptor,
    ctx: &mut PersistContext,
) -> Result<Option<Value>, FieldError> {
    let value = composite.field(field.name())?;
    let runtime = value.persist_type_info();
    if !field.admits(runtime) {
        log::debug!(
            "skipping `{}`: holds ignored type `{}`",
            ctx.current_path(),
            runtime.type_path()
        );
        return Ok(None);
    }
    write_value(value, ctx).map(Some)
}

/// Converts any supported value into its stored form.
///
/// A sequence fails as a whole if any element fails.
pub(crate) fn write_value(value: &dyn Persist, ctx: &mut PersistContext) -> Result<Value, FieldError> {
    match value.persist_ref() {
        PersistRef::Primitive(primitive) => Ok(primitive.to_value()),
        PersistRef::Composite(composite) => Ok(Value::Record(write_composite(
            composite,
            value.persist_type_info(),
            ctx,
        ))),
        PersistRef::Nullable(nullable) => match nullable.get() {
            Some(inner) => write_value(inner, ctx),
            None => Ok(Value::Null),
        },
        PersistRef::Sequence(sequence) => {
            let mut items = Vec::with_capacity(sequence.len());
            for index in 0..sequence.len() {
                let Some(item) = sequence.get(index) else {
                    break;
                };
                ctx.enter_index(index);
                let result = write_value(item, ctx);
                ctx.leave();
                items.push(result?);
            }
            Ok(Value::List(items))
        }
        PersistRef::Opaque(_) => Err(FieldError::UnsupportedFieldType {
            type_path: value.persist_type_info().type_path(),
        }),
    }
}
