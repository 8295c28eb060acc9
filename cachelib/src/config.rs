use std::io::Read;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration for a single cache
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    pub capacity: u32,
    pub block_size: u32,
    pub ways: u32,
    #[serde(default)]
    pub replacement_policy: ReplacementPolicyConfig,
    #[serde(default)]
    pub write_policy: WritePolicyConfig,
    /// Seed for the random replacement policy. Ignored by the other policies, and taken from the
    /// OS when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl CacheConfig {
    /// Parses a configuration from JSON
    pub fn from_json_reader(reader: impl Read) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Validates the dimensions of this configuration, see [`Geometry::new`]
    pub fn geometry(&self) -> Result<Geometry, ConfigError> {
        Geometry::new(self.capacity, self.block_size, self.ways)
    }
}

/// The replacement policy - round robin, random, or lru. Defaults to round robin.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReplacementPolicyConfig {
    #[default]
    #[serde(alias = "rr")]
    #[value(name = "rr")]
    RoundRobin,
    #[serde(alias = "random")]
    #[value(name = "random")]
    Random,
    #[serde(alias = "lru")]
    #[value(name = "lru")]
    LeastRecentlyUsed,
}

/// What happens on a write miss - allocate the block, or bypass the cache. Defaults to write
/// allocate.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum WritePolicyConfig {
    #[default]
    #[serde(alias = "wa")]
    #[value(name = "wa")]
    WriteAllocate,
    #[serde(alias = "nwa")]
    #[value(name = "nwa")]
    NoWriteAllocate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a power of two, got {value}")]
    NotPowerOfTwo { name: &'static str, value: u32 },
    #[error("capacity ({capacity}) must be larger than the block size ({block_size})")]
    CapacityTooSmall { capacity: u32, block_size: u32 },
    #[error("{blocks} blocks cannot be split evenly into sets of {ways} ways")]
    UnevenSets { blocks: u32, ways: u32 },
}

/// The validated shape of a cache, and the address bit widths derived from it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Geometry {
    pub capacity: u32,
    pub block_size: u32,
    pub ways: u32,
    pub set_count: u32,
    pub offset_bits: u32,
    pub index_bits: u32,
}

impl Geometry {
    /// Checks the cache dimensions and computes the set count and bit widths
    ///
    /// # Arguments
    ///
    /// * `capacity`: Total size of the cache in bytes
    /// * `block_size`: Size of a cache line in bytes
    /// * `ways`: Lines per set
    ///
    /// returns: Result<Geometry, ConfigError>
    ///
    /// # Examples
    ///
    /// ```
    /// use cachelib::config::Geometry;
    /// let geometry = Geometry::new(32, 8, 2).unwrap();
    /// assert_eq!((geometry.set_count, geometry.offset_bits, geometry.index_bits), (2, 3, 1));
    /// assert!(Geometry::new(48, 8, 2).is_err());
    /// ```
    pub fn new(capacity: u32, block_size: u32, ways: u32) -> Result<Self, ConfigError> {
        for (name, value) in [("capacity", capacity), ("block size", block_size), ("ways", ways)] {
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo { name, value });
            }
        }
        if capacity <= block_size {
            return Err(ConfigError::CapacityTooSmall { capacity, block_size });
        }
        let blocks = capacity / block_size;
        if blocks % ways != 0 {
            return Err(ConfigError::UnevenSets { blocks, ways });
        }
        let set_count = blocks / ways;
        Ok(Self {
            capacity,
            block_size,
            ways,
            set_count,
            offset_bits: block_size.trailing_zeros(),
            index_bits: set_count.trailing_zeros(),
        })
    }

    /// Width of the stored tag
    pub fn tag_bits(&self) -> u32 {
        u32::BITS - self.index_bits - self.offset_bits
    }

    /// How far an address is shifted right to expose its tag
    pub fn tag_shift(&self) -> u32 {
        self.index_bits + self.offset_bits
    }
}
