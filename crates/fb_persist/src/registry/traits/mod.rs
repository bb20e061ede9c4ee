mod clone;
mod default;
mod post_restore;

pub use clone::TypeTraitClone;
pub use default::TypeTraitDefault;
pub use post_restore::TypeTraitPostRestore;
