//! Live type-version migration.
//!
//! When game code is reloaded, live instances of the old version of a type
//! are replaced by instances of the new version. [`hot_swap`] builds the
//! new instance by name and carries state over field by field.

use alloc::boxed::Box;

use crate::error::{ConstructionError, FieldError};
use crate::graph::{CopyMode, copy_value};
use crate::registry::AssemblyScope;
use crate::{Persist, PersistContext, PersistMut, PersistRef};

/// Replaces `old` with a default instance of `new_type_name`, resolved in
/// `scope`, carrying over every field both versions declare by name.
///
/// - All declared fields take part, including ones the selection policy
///   excludes from saving: the live instance is being replaced, not saved.
///   Opaque values such as callbacks are copied when their type registers
///   [`TypeTraitClone`](crate::registry::TypeTraitClone).
/// - Fields only on the new version keep their default values. Fields only
///   on the old version are dropped.
/// - Enum discriminants are passed on as integers, since the enum type on
///   each side may itself have been reloaded.
/// - A field that fails to copy keeps its default and is reported to the
///   context's diagnostics.
///
/// Every cached field selection is invalidated first.
///
/// # Errors
///
/// [`ConstructionError`] if the new type cannot be resolved or constructed.
/// No partial instance is returned.
pub fn hot_swap(
    old: &dyn Persist,
    new_type_name: &str,
    scope: &AssemblyScope,
    ctx: &mut PersistContext,
) -> Result<Box<dyn Persist>, ConstructionError> {
    let registry = ctx.registry();
    registry.invalidate_selections();

    let mut instance = registry.construct_dyn(new_type_name, scope)?;
    let old_info = old.persist_type_info();
    let new_info = instance.persist_type_info();
    log::debug!(
        "hot-swapping `{}` to `{}`",
        old_info.type_path(),
        new_info.type_path()
    );

    let (Some(old_fields), Some(new_fields)) = (old_info.as_composite(), new_info.as_composite())
    else {
        return Ok(instance);
    };
    let (PersistRef::Composite(source), PersistMut::Composite(target)) =
        (old.persist_ref(), instance.persist_mut())
    else {
        return Ok(instance);
    };

    ctx.enter_root(new_info.type_name());
    for field in new_fields.iter() {
        let name = field.name();
        if old_fields.field(name).is_none() {
            continue;
        }

        ctx.enter_field(name);
        let result = match (source.field(name), target.field_mut(name)) {
            (Ok(value), Ok(slot)) => copy_value(value, slot, CopyMode::Migrate, ctx),
            (Err(err), _) | (_, Err(err)) => Err(FieldError::from(err)),
        };
        if let Err(err) = result {
            ctx.report(err);
        }
        ctx.leave();
    }
    ctx.leave();

    Ok(instance)
}
