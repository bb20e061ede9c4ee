//! Small containers shared by the `fb_*` crates.
//!
//! - [`hash`]: `hashbrown` maps with a fixed `foldhash` seed, so iteration
//!   order and hashes only depend on the inserted keys.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) that skips rehashing.
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
