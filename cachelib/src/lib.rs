//! # CacheLib
//!
//! Cachelib is a library for simulating a single set-associative cache
//!
//! It provides a generic cache implementation which can be parameterised by a replacement policy
//! (round robin, random or LRU) and a write miss policy, and a simulator to run these caches over
//! textual traces of memory accesses
//!
//! Each access reproduces the hit, miss and eviction a real cache would see, tracked with a
//! logical clock rather than any notion of timing

/// Splits addresses into tag, set index and block offset
pub mod address;

/// Contains the implementation of the cache, and a utility enum for the existing cache types
pub mod cache;

/// Contains the JSON configuration format, and validation of cache dimensions
pub mod config;

/// Memory mapped trace input
pub mod io;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Human readable configuration summary, including the display names of the policies
pub mod report;

/// Contains the simulator used to run a trace through a cache configuration
pub mod simulator;

/// Access counters
pub mod stats;

/// Per-set line storage
pub mod storage;

/// Parsing of textual access traces
pub mod trace;

#[cfg(test)]
mod test;
