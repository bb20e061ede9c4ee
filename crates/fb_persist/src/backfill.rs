//! Defaults backfill.
//!
//! A record written by an older version of a type has no entries for
//! fields added since. Restoring it leaves those fields with whatever
//! value they had before the restore, which for an instance built without
//! running its initializers is not a meaningful value.
//!
//! [`backfill_defaults`] re-seeds such fields from a freshly constructed
//! reference instance of the same type. Fields named in the
//! [`RestoredFields`] that [`restore_into`] returned are left alone, so the
//! operation can run inside a post-restore hook and is idempotent.
//!
//! [`restore_into`]: crate::graph::restore_into

use alloc::vec::Vec;

use crate::error::{ConstructionError, FieldError};
use crate::graph::{CopyMode, RestoredFields, copy_value};
use crate::{Persist, PersistContext, PersistMut, PersistRef};

/// What [`backfill_defaults`] did, per field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Fields copied from the reference instance.
    pub seeded: Vec<&'static str>,
    /// Fields the restore populated, left unchanged.
    pub kept: Vec<&'static str>,
    /// Fields that could not be copied; see the context's diagnostics.
    pub failed: Vec<&'static str>,
}

/// Copies default values into every persisted field of `target` that is
/// not in `restored`.
///
/// Pass [`RestoredFields::new()`] for a value that was never restored; all
/// its persisted fields are then re-seeded.
///
/// The reference instance comes from the type's registered zero-argument
/// constructor. Per-field copy failures go to the context's diagnostics.
///
/// # Errors
///
/// [`ConstructionError`] if the runtime type of `target` is not registered
/// with a default constructor. `target` is left unchanged.
///
/// # Example
///
/// ```
/// use fb_persist::{PersistContext, backfill::backfill_defaults, derive::Persist};
/// use fb_persist::graph::RestoredFields;
/// use fb_persist::registry::TypeRegistry;
///
/// #[derive(Persist)]
/// #[persist(default)]
/// struct Torch {
///     fuel: f32,
/// }
///
/// impl Default for Torch {
///     fn default() -> Self {
///         Self { fuel: 10.0 }
///     }
/// }
///
/// let mut registry = TypeRegistry::new();
/// registry.register::<Torch>();
///
/// let mut torch = Torch { fuel: 0.0 };
/// let mut ctx = PersistContext::new(&registry);
/// let report = backfill_defaults(&mut torch, &RestoredFields::new(), &mut ctx).unwrap();
///
/// assert_eq!(torch.fuel, 10.0);
/// assert_eq!(report.seeded, ["fuel"]);
/// ```
pub fn backfill_defaults(
    target: &mut dyn Persist,
    restored: &RestoredFields,
    ctx: &mut PersistContext,
) -> Result<BackfillReport, ConstructionError> {
    let info = target.persist_type_info();
    let reference = ctx.registry().construct_by_id(info.type_id())?;
    let selection = ctx.registry().selection(info);

    let mut report = BackfillReport::default();
    let (PersistRef::Composite(source), PersistMut::Composite(target)) =
        (reference.persist_ref(), target.persist_mut())
    else {
        log::debug!("nothing to backfill on non-composite `{}`", info.type_path());
        return Ok(report);
    };

    ctx.enter_root(info.type_name());
    for field in selection.included() {
        let name = field.name();
        if restored.contains(name) {
            report.kept.push(name);
            continue;
        }

        ctx.enter_field(name);
        let result = match (source.field(name), target.field_mut(name)) {
            (Ok(value), Ok(slot)) => copy_value(value, slot, CopyMode::Exact, ctx),
            (Err(err), _) | (_, Err(err)) => Err(FieldError::from(err)),
        };
        match result {
            Ok(()) => report.seeded.push(name),
            Err(err) => {
                ctx.report(err);
                report.failed.push(name);
            }
        }
        ctx.leave();
    }
    ctx.leave();

    log::debug!(
        "backfilled `{}`: {} seeded, {} kept, {} failed",
        info.type_path(),
        report.seeded.len(),
        report.kept.len(),
        report.failed.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::backfill_defaults;
    use crate::PersistContext;
    use crate::error::ConstructionError;
    use crate::graph::RestoredFields;
    use crate::registry::TypeRegistry;

    #[test]
    fn unregistered_types_fail_without_changes() {
        let registry = TypeRegistry::empty();
        let mut ctx = PersistContext::new(&registry);
        let mut value = 5_i32;

        assert!(matches!(
            backfill_defaults(&mut value, &RestoredFields::new(), &mut ctx),
            Err(ConstructionError::TypeResolution { .. })
        ));
        assert_eq!(value, 5);
    }

    #[test]
    fn non_composites_have_nothing_to_backfill() {
        let registry = TypeRegistry::new();
        let mut ctx = PersistContext::new(&registry);
        let mut value = 5_i32;

        let report = backfill_defaults(&mut value, &RestoredFields::new(), &mut ctx).unwrap();
        assert!(report.seeded.is_empty());
        assert_eq!(value, 5);
    }
}
