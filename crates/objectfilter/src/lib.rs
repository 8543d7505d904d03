//! `objectfilter` - Recursive include/exclude key filtering for nested objects
//!
//! This library filters the keys of nested objects by exact name and by regex
//! pattern, keeping (`include`) or dropping (`exclude`) the matches at every
//! level. Sequences, sets, maps, date/times and byte strings are treated as
//! opaque leaves and never looked into.
//!
//! See [`filter_object`] for one-off filtering and [`ObjectFilter`] for a
//! compiled filter applied to many objects.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod value;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{
    filter_object, BranchPolicy, FilterSpec, FilterType, KeyFilters, ObjectFilter,
    PatternFilters, PatternSource,
};
pub use logging::init_logging;
pub use value::{Object, OpaqueValue, Value};
