use crate::error::{FieldError, ValueError};
use crate::graph::{read_value, write_value};
use crate::registry::TypeTraitClone;
use crate::{Persist, PersistContext, PersistRef};

/// How [`copy_value`] treats enum discriminants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CopyMode {
    /// Source and target are the same type.
    Exact,
    /// The target may be another version of the source's type; enum
    /// discriminants are passed on as plain integers.
    Migrate,
}

/// Copies the value of one live slot into another.
///
/// Values of the same type are cloned through [`TypeTraitClone`] when it
/// is registered. Anything else goes through the stored form, which is
/// what lets a field survive a change of its type between versions.
pub(crate) fn copy_value(
    source: &dyn Persist,
    target: &mut dyn Persist,
    mode: CopyMode,
    ctx: &mut PersistContext,
) -> Result<(), FieldError> {
    let source_info = source.persist_type_info();
    let target_info = target.persist_type_info();
    let same_type = source_info.type_id() == target_info.type_id();

    if same_type || matches!(source.persist_ref(), PersistRef::Opaque(_)) {
        let cloner = ctx
            .registry()
            .get_type_trait::<TypeTraitClone>(source_info.type_id());
        if let Some(copy) = cloner.and_then(|cloner| cloner.clone_value(source)) {
            return target.persist_set(copy).map_err(|rejected| {
                ValueError::Mismatch {
                    expected: target_info.type_path(),
                    found: rejected.type_path(),
                }
                .into()
            });
        }
    }

    let mut value = write_value(source, ctx)?;
    if mode == CopyMode::Migrate {
        value = value.into_integral();
    }
    read_value(target, &value, ctx)
}
