use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

// -----------------------------------------------------------------------------
// TypeTrait

/// A capability stored in a [`TypeMeta`](crate::registry::TypeMeta).
///
/// Any `Clone + Send + Sync + 'static` type qualifies; capabilities are
/// looked up by their own `TypeId`.
pub trait TypeTrait: Any + Send + Sync {
    fn clone_type_trait(&self) -> Box<dyn TypeTrait>;
}

impl<T: Any + Clone + Send + Sync> TypeTrait for T {
    #[inline]
    fn clone_type_trait(&self) -> Box<dyn TypeTrait> {
        Box::new(self.clone())
    }
}

impl dyn TypeTrait {
    #[inline]
    pub fn downcast_ref<T: TypeTrait>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: TypeTrait>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut()
    }
}

impl fmt::Debug for dyn TypeTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("dyn TypeTrait")
    }
}
