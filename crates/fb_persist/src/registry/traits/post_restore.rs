use crate::Persist;
use crate::error::PersistError;
use crate::info::Typed;
use crate::lifecycle::{PostRestore, PostRestoreArgs};
use crate::registry::FromType;

/// Runs [`PostRestore::on_post_restore`] on a type-erased value.
#[derive(Clone)]
pub struct TypeTraitPostRestore {
    func: fn(&mut dyn Persist, &mut PostRestoreArgs<'_, '_>) -> Result<(), PersistError>,
}

impl TypeTraitPostRestore {
    #[inline]
    pub fn call(
        &self,
        value: &mut dyn Persist,
        args: &mut PostRestoreArgs<'_, '_>,
    ) -> Result<(), PersistError> {
        (self.func)(value, args)
    }
}

impl<T: PostRestore + Typed> FromType<T> for TypeTraitPostRestore {
    fn from_type() -> Self {
        Self {
            func: |value, args| {
                let type_path = value.type_path();
                match value.downcast_mut::<T>() {
                    Some(value) => value.on_post_restore(args),
                    None => Err(PersistError::Hook {
                        type_path,
                        message: "hook invoked on a value of another type".into(),
                    }),
                }
            },
        }
    }
}
