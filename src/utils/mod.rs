//! Generic helpers shared across the crate.
//!
//! - [`array`]: growable handle array with sorted search and duplicate-eliding sort
//! - [`validation`]: digest parsing and name checks

pub mod array;
pub mod validation;
