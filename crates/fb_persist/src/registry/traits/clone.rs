use alloc::boxed::Box;

use crate::Persist;
use crate::info::Typed;
use crate::registry::FromType;

/// Copies a value of the registered type.
///
/// Used where a value cannot be copied through its stored form, such as
/// opaque handles carried across a hot swap.
#[derive(Clone)]
pub struct TypeTraitClone {
    func: fn(&dyn Persist) -> Option<Box<dyn Persist>>,
}

impl TypeTraitClone {
    /// Clones `value`, or returns `None` if it is not of the registered type.
    #[inline]
    pub fn clone_value(&self, value: &dyn Persist) -> Option<Box<dyn Persist>> {
        (self.func)(value)
    }
}

impl<T: Clone + Typed + Persist> FromType<T> for TypeTraitClone {
    fn from_type() -> Self {
        Self {
            func: |value| {
                value
                    .downcast_ref::<T>()
                    .map(|value| Box::new(value.clone()) as Box<dyn Persist>)
            },
        }
    }
}
