#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use fb_cfg as cfg;
pub use fb_persist as persist;
pub use fb_utils as utils;
