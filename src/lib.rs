//! Toposort
//!
//! Orders named nodes so that each one comes after the nodes it depends on,
//! tolerating or rejecting cycles depending on how the sorter is created.

#![no_std]
#![warn(missing_docs)]

extern crate alloc;

mod error;
mod sorter;
mod vertex;

pub use error::{Error, Result};
pub use sorter::GraphSorter;
