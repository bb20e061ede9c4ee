use crate::info::Typed;

/// Builds a [`TypeTrait`] for the type `T`.
///
/// Used by `#[derive(Persist)]` to fill a [`TypeMeta`].
///
/// ```
/// # use fb_persist::registry::{FromType, TypeMeta, TypeTraitDefault};
/// let mut meta = TypeMeta::of::<String>();
/// meta.insert_trait::<TypeTraitDefault>(FromType::<String>::from_type());
/// assert!(meta.has_trait::<TypeTraitDefault>());
/// ```
///
/// [`TypeTrait`]: crate::registry::TypeTrait
/// [`TypeMeta`]: crate::registry::TypeMeta
pub trait FromType<T: Typed> {
    fn from_type() -> Self;
}
