//! Cache module for memoizing computed results in memory
//!
//! This module provides a bounded cache with a time-to-live. The manager
//! owns one instance to remember filter results between calls and clears it
//! whenever stored vacancies change.

mod memory;

pub use memory::Cache;
