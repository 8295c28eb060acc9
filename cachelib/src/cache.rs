use crate::address::{decode, DecodedAddress};
use crate::config::{CacheConfig, ConfigError, Geometry, ReplacementPolicyConfig, WritePolicyConfig};
use crate::replacement_policies::{LeastRecentlyUsed, Random, ReplacementPolicy, RoundRobin};
use crate::report::ConfigReport;
use crate::stats::Statistics;
use crate::storage::Set;

/// Whether an access reads or writes memory
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessKind {
    Read = 0,
    Write = 1,
}

impl TryFrom<u32> for AccessKind {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(AccessKind::Read),
            1 => Ok(AccessKind::Write),
            other => Err(other),
        }
    }
}

/// What a single access did to the cache
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccessOutcome {
    Hit,
    /// Miss, the block went into an empty way
    Fill,
    /// Miss, the block replaced a valid one
    Evict,
    /// Write miss under no write allocate, the cache is untouched
    Bypass,
}

impl AccessOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AccessOutcome::Hit)
    }
}

/// A generic trait for caches
///
/// Technically not required as we're using static dispatch to speed things up instead of dyn Cache,
/// but this gives flexibility for the future with no overhead
pub trait CacheTrait {
    /// Converts an address into tag, set index and offset for this cache's geometry
    fn decode(&self, address: u32) -> DecodedAddress;

    /// Simulates one access, updating the lines, the replacement state and the statistics
    ///
    /// # Arguments
    ///
    /// * `kind`: Read or write
    /// * `address`: The accessed address
    /// * `length`: Size of the access. Accesses are resolved per block so this doesn't change the
    /// outcome
    ///
    /// returns: AccessOutcome
    fn access(&mut self, kind: AccessKind, address: u32, length: u32) -> AccessOutcome;

    fn geometry(&self) -> &Geometry;

    fn statistics(&self) -> &Statistics;

    /// Gets the number of valid lines across all sets. Useful for analysing cache performance or
    /// debugging
    fn valid_line_count(&self) -> u64;
}

/// A set-associative cache, parameterised by a replacement policy
///
/// As in the rest of the library we rely on monomorphisation so the policy's victim selection is
/// inlined into the access loop
#[derive(Debug)]
pub struct Cache<R: ReplacementPolicy> {
    geometry: Geometry,
    write_policy: WritePolicyConfig,
    sets: Vec<Set>,
    replacement_policy: R,
    /// Logical clock, advanced once per access
    time: u64,
    statistics: Statistics,
}

impl<R: ReplacementPolicy> Cache<R> {
    /// Allocates every set with all lines invalid. The geometry has already been validated
    pub fn new(geometry: Geometry, write_policy: WritePolicyConfig, policy: R) -> Self {
        Self {
            geometry,
            write_policy,
            sets: (0..geometry.set_count).map(|_| Set::new(geometry.ways)).collect(),
            replacement_policy: policy,
            time: 0,
            statistics: Statistics::default(),
        }
    }

    pub fn sets(&self) -> &[Set] {
        &self.sets
    }

    pub fn time(&self) -> u64 {
        self.time
    }
}

impl<R: ReplacementPolicy> CacheTrait for Cache<R> {
    #[inline(always)]
    fn decode(&self, address: u32) -> DecodedAddress {
        decode(address, self.geometry.offset_bits, self.geometry.index_bits)
    }

    #[inline(never)]
    fn access(&mut self, kind: AccessKind, address: u32, _length: u32) -> AccessOutcome {
        let DecodedAddress { tag, index, .. } = self.decode(address);
        let set = &mut self.sets[index as usize];
        let outcome = if let Some(way) = set.find(tag) {
            set.touch(way, self.time);
            AccessOutcome::Hit
        } else if kind == AccessKind::Write && self.write_policy == WritePolicyConfig::NoWriteAllocate {
            AccessOutcome::Bypass
        } else {
            let way = self.replacement_policy.find_victim(set);
            if set.fill(way, tag, self.time) {
                log::trace!("evicted way {way} of set {index} for tag {tag:#x}");
                AccessOutcome::Evict
            } else {
                AccessOutcome::Fill
            }
        };

        self.statistics.accesses += 1;
        match outcome {
            AccessOutcome::Hit => self.statistics.hits += 1,
            AccessOutcome::Evict => {
                self.statistics.misses += 1;
                self.statistics.evictions += 1;
            }
            AccessOutcome::Fill | AccessOutcome::Bypass => self.statistics.misses += 1,
        }
        self.time += 1;
        outcome
    }

    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    fn valid_line_count(&self) -> u64 {
        self.sets.iter().map(|s| s.valid_lines() as u64).sum()
    }
}

/// Enum for the 3 types of cache provided by the library
///
/// Using trait objects in Rust reduces boilerplate, but it is surprisingly slow, as this is
/// completely opaque to the compiler
///
/// It's much faster to explicitly branch on all implementations, as the compiler can reason about
/// the concrete types, perform function inlining etc
#[derive(Debug)]
pub enum GenericCache {
    RoundRobin(Cache<RoundRobin>),
    Random(Cache<Random>),
    LeastRecentlyUsed(Cache<LeastRecentlyUsed>),
}

impl From<Cache<RoundRobin>> for GenericCache {
    fn from(value: Cache<RoundRobin>) -> Self {
        Self::RoundRobin(value)
    }
}

impl From<Cache<Random>> for GenericCache {
    fn from(value: Cache<Random>) -> Self {
        Self::Random(value)
    }
}

impl From<Cache<LeastRecentlyUsed>> for GenericCache {
    fn from(value: Cache<LeastRecentlyUsed>) -> Self {
        Self::LeastRecentlyUsed(value)
    }
}

impl GenericCache {
    /// Validates a configuration and builds the matching cache, logging its configuration summary
    ///
    /// Nothing is allocated if the configuration is rejected
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually resulting from parsing JSON or the command line
    ///
    /// returns: Result<GenericCache, ConfigError>
    pub fn create(config: &CacheConfig) -> Result<Self, ConfigError> {
        let geometry = config.geometry()?;
        let report = ConfigReport {
            geometry,
            replacement_policy: config.replacement_policy,
            write_policy: config.write_policy,
        };
        log::info!("{report}");
        let wp = config.write_policy;
        Ok(match config.replacement_policy {
            ReplacementPolicyConfig::RoundRobin => {
                GenericCache::from(Cache::new(geometry, wp, RoundRobin))
            }
            ReplacementPolicyConfig::Random => {
                GenericCache::from(Cache::new(geometry, wp, Random::new(config.seed)))
            }
            ReplacementPolicyConfig::LeastRecentlyUsed => {
                GenericCache::from(Cache::new(geometry, wp, LeastRecentlyUsed))
            }
        })
    }

    /// Tears the cache down, releasing its storage and handing back the final counters
    pub fn destroy(self) -> Statistics {
        *self.statistics()
    }
}

impl CacheTrait for GenericCache {
    fn decode(&self, address: u32) -> DecodedAddress {
        match self {
            GenericCache::RoundRobin(c) => c.decode(address),
            GenericCache::Random(c) => c.decode(address),
            GenericCache::LeastRecentlyUsed(c) => c.decode(address),
        }
    }

    fn access(&mut self, kind: AccessKind, address: u32, length: u32) -> AccessOutcome {
        match self {
            GenericCache::RoundRobin(c) => c.access(kind, address, length),
            GenericCache::Random(c) => c.access(kind, address, length),
            GenericCache::LeastRecentlyUsed(c) => c.access(kind, address, length),
        }
    }

    fn geometry(&self) -> &Geometry {
        match self {
            GenericCache::RoundRobin(c) => c.geometry(),
            GenericCache::Random(c) => c.geometry(),
            GenericCache::LeastRecentlyUsed(c) => c.geometry(),
        }
    }

    fn statistics(&self) -> &Statistics {
        match self {
            GenericCache::RoundRobin(c) => c.statistics(),
            GenericCache::Random(c) => c.statistics(),
            GenericCache::LeastRecentlyUsed(c) => c.statistics(),
        }
    }

    fn valid_line_count(&self) -> u64 {
        match self {
            GenericCache::RoundRobin(c) => c.valid_line_count(),
            GenericCache::Random(c) => c.valid_line_count(),
            GenericCache::LeastRecentlyUsed(c) => c.valid_line_count(),
        }
    }
}
