use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::storage::Set;

/// A generic trait for implementing new replacement policies. Can be used to parameterise a Cache.
///
/// Per-line state the policies need (validity, last access time) and the round robin cursor live
/// in the [`Set`] itself, so a policy only has to choose
pub trait ReplacementPolicy {
    /// Used by the cache to get a way when a new block needs added to a set.
    ///
    /// While the set still has invalid lines the returned way should be one of them, so nothing is
    /// evicted before the set is full. The cache does the fill and moves the set's cursor on
    /// afterwards
    ///
    /// # Arguments
    ///
    /// * `set`: The set the block maps to
    ///
    /// returns: usize
    fn find_victim(&mut self, set: &Set) -> usize;
}

/// Standard round robin replacement policy, driven by the cursor each set keeps
///
/// The cursor is trusted even while the set is filling. Lines are never invalidated and the
/// cursor moves on every fill, so it always lands on the next empty way
#[derive(Debug, Default)]
pub struct RoundRobin;

impl ReplacementPolicy for RoundRobin {
    #[inline(always)]
    fn find_victim(&mut self, set: &Set) -> usize {
        set.round_robin() as usize
    }
}

/// Random replacement. Each cache owns its generator, seeded for reproducible runs
#[derive(Debug)]
pub struct Random {
    rng: ChaCha8Rng,
}

impl Random {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: match seed {
                Some(seed) => ChaCha8Rng::seed_from_u64(seed),
                None => ChaCha8Rng::from_entropy(),
            }
        }
    }
}

impl ReplacementPolicy for Random {
    fn find_victim(&mut self, set: &Set) -> usize {
        let ways = set.ways() as usize;
        let mut way = self.rng.gen_range(0..ways);
        if !set.is_full() {
            // Probe forward from the random start to the first empty way
            while set.lines()[way].valid {
                way = (way + 1) % ways;
            }
        }
        way
    }
}

/// Least Recently Used replacement policy
///
/// The cache stamps each line with its logical clock on fill and on hit, so the victim is simply
/// the line with the oldest stamp
#[derive(Debug, Default)]
pub struct LeastRecentlyUsed;

impl ReplacementPolicy for LeastRecentlyUsed {
    fn find_victim(&mut self, set: &Set) -> usize {
        let lines = set.lines();
        if !set.is_full() {
            return lines.iter().position(|line| !line.valid).unwrap_or(0);
        }
        // Strict comparison, ties go to the lowest way
        let mut min_value = u64::MAX;
        let mut min_index = 0;
        let mut index = 0;
        while index < lines.len() {
            if lines[index].last_access < min_value {
                min_value = lines[index].last_access;
                min_index = index;
            }
            index += 1;
        }
        min_index
    }
}
