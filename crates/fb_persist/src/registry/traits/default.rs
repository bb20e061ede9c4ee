use alloc::boxed::Box;

use crate::Persist;
use crate::info::Typed;
use crate::registry::FromType;

/// The zero-argument constructor of a type.
///
/// Name-based construction and defaults backfill require it.
///
/// ```
/// use fb_persist::registry::{TypeRegistry, TypeTraitDefault};
///
/// let registry = TypeRegistry::new();
/// let default = registry
///     .get_with_type_name("String").unwrap()
///     .get_trait::<TypeTraitDefault>().unwrap();
///
/// assert_eq!(default.default().take::<String>().unwrap(), "");
/// ```
#[derive(Clone)]
pub struct TypeTraitDefault {
    func: fn() -> Box<dyn Persist>,
}

impl TypeTraitDefault {
    #[inline(always)]
    pub fn default(&self) -> Box<dyn Persist> {
        (self.func)()
    }
}

impl<T: Default + Typed + Persist> FromType<T> for TypeTraitDefault {
    fn from_type() -> Self {
        Self {
            func: || Box::<T>::default(),
        }
    }
}
