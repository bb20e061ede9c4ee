//! Compile-time switches shared by the `fb_*` crates.
//!
//! A crate declares its aliases once, usually in a `cfg` module at its root:
//!
//! ```
//! pub mod cfg {
//!     fb_cfg::define_alias! {
//!         #[cfg(debug_assertions)] => debug,
//!         #[cfg(feature = "never-enabled")] => never,
//!     }
//! }
//!
//! // Statement form: the tokens are kept or dropped.
//! cfg::debug! { let checked = true; }
//!
//! // Branch form: yields one of the two blocks.
//! let level = cfg::never! { if { "on" } else { "off" } };
//! assert_eq!(level, "off");
//!
//! // Empty form: yields a `bool`.
//! assert!(!cfg::never!());
//! ```
#![no_std]

/// Expands the given tokens unconditionally.
///
/// Used as the target of an alias whose `cfg` predicate holds.
#[doc(hidden)]
#[macro_export]
macro_rules! enabled {
    () => { true };
    (if { $($p:tt)* } else { $($n:tt)* }) => { { $($p)* } };
    ($($p:tt)*) => { $($p)* };
}

/// Discards the given tokens.
///
/// Used as the target of an alias whose `cfg` predicate does not hold.
#[doc(hidden)]
#[macro_export]
macro_rules! disabled {
    () => { false };
    (if { $($p:tt)* } else { $($n:tt)* }) => { { $($n)* } };
    ($($p:tt)*) => {};
}

/// Defines macro aliases that expand their input only when a `cfg` holds.
///
/// Syntax: `#[cfg(predicate)] => alias_name` separated by commas.
///
/// The predicate is evaluated in the crate that invokes this macro,
/// so `feature = "..."` refers to that crate's features.
#[macro_export]
macro_rules! define_alias {
    (@one #[cfg($meta:meta)] => $id:ident) => {
        #[cfg($meta)]
        #[doc(hidden)]
        pub use $crate::enabled as $id;

        #[cfg(not($meta))]
        #[doc(hidden)]
        pub use $crate::disabled as $id;
    };
    (#[cfg($meta:meta)] => $id:ident $(,)?) => {
        $crate::define_alias!(@one #[cfg($meta)] => $id);
    };
    (#[cfg($meta:meta)] => $id:ident, $($rest:tt)+) => {
        $crate::define_alias!(@one #[cfg($meta)] => $id);
        $crate::define_alias!($($rest)+);
    };
}
