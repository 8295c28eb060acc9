use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use crate::cache::{AccessKind, AccessOutcome, Cache, CacheTrait, GenericCache};
use crate::config::{CacheConfig, Geometry, ReplacementPolicyConfig, WritePolicyConfig};
use crate::replacement_policies::{LeastRecentlyUsed, Random, ReplacementPolicy, RoundRobin};
use crate::storage::Set;

use AccessKind::{Read, Write};
use AccessOutcome::{Bypass, Evict, Fill, Hit};

/// Fails the test if the cache ever asks for a victim
struct NoVictims;

impl ReplacementPolicy for NoVictims {
    fn find_victim(&mut self, _set: &Set) -> usize {
        panic!("victim selection should not run")
    }
}

fn cache<R: ReplacementPolicy>(capacity: u32, block_size: u32, ways: u32, write_policy: WritePolicyConfig, policy: R) -> Cache<R> {
    Cache::new(Geometry::new(capacity, block_size, ways).unwrap(), write_policy, policy)
}

fn run<C: CacheTrait>(cache: &mut C, accesses: &[(AccessKind, u32)]) -> Vec<AccessOutcome> {
    accesses.iter().map(|&(kind, address)| cache.access(kind, address, 4)).collect()
}

#[test]
fn round_robin_small_cache() {
    // 2 sets of 2 ways, 8 byte blocks: 0x8 lands in set 1, so nothing is displaced
    let mut c = cache(32, 8, 2, WritePolicyConfig::WriteAllocate, RoundRobin);
    assert_eq!(run(&mut c, &[(Read, 0x0), (Read, 0x8), (Read, 0x10)]), vec![Fill, Fill, Fill]);
    assert_eq!((c.statistics().accesses, c.statistics().misses, c.statistics().evictions), (3, 3, 0));

    // Three distinct tags in set 0, the third displaces the first way filled
    let mut c = cache(32, 8, 2, WritePolicyConfig::WriteAllocate, RoundRobin);
    assert_eq!(run(&mut c, &[(Read, 0x0), (Read, 0x10), (Read, 0x20)]), vec![Fill, Fill, Evict]);
    let stats = c.statistics();
    assert_eq!((stats.accesses, stats.hits, stats.misses, stats.evictions), (3, 0, 3, 1));
    let set = &c.sets()[0];
    assert_eq!(set.lines()[0].tag, 2);
    assert_eq!(set.lines()[1].tag, 1);
}

#[test]
fn repeated_address_misses_then_hits() {
    let mut c = cache(1024, 16, 4, WritePolicyConfig::WriteAllocate, LeastRecentlyUsed);
    c.access(Read, 0x40, 4);
    c.access(Read, 0x1000, 4);
    let clock = c.time();
    assert_eq!(c.access(Read, 0x1234, 4), Fill);
    assert!(c.access(Read, 0x1234, 4).is_hit());
    let d = c.decode(0x1234);
    let set = &c.sets()[d.index as usize];
    let way = set.find(d.tag).unwrap();
    assert_eq!(set.lines()[way].last_access, clock + 1);
}

#[test]
fn lru_keeps_the_refreshed_line() {
    // One set of two ways
    let mut c = cache(16, 8, 2, WritePolicyConfig::WriteAllocate, LeastRecentlyUsed);
    let (a, b, z) = (0x0, 0x8, 0x10);
    assert_eq!(run(&mut c, &[(Read, a), (Read, b), (Read, a), (Read, z)]), vec![Fill, Fill, Hit, Evict]);
    let set = &c.sets()[0];
    assert!(set.find(c.decode(a).tag).is_some());
    assert!(set.find(c.decode(b).tag).is_none());
    assert!(set.find(c.decode(z).tag).is_some());
}

#[test]
fn no_write_allocate_bypasses_on_write_miss() {
    let mut c = cache(64, 8, 2, WritePolicyConfig::NoWriteAllocate, NoVictims);
    assert_eq!(run(&mut c, &[(Write, 0x0), (Write, 0x100), (Write, 0x0)]), vec![Bypass, Bypass, Bypass]);
    assert_eq!(c.valid_line_count(), 0);
    assert!(c.sets().iter().all(|s| s.valid_lines() == 0 && s.round_robin() == 0));
    let stats = c.statistics();
    assert_eq!((stats.accesses, stats.hits, stats.misses, stats.evictions), (3, 0, 3, 0));
    // The clock still ticks
    assert_eq!(c.time(), 3);
}

#[test]
fn no_write_allocate_still_hits_on_resident_blocks() {
    let mut c = cache(64, 8, 2, WritePolicyConfig::NoWriteAllocate, RoundRobin);
    assert_eq!(run(&mut c, &[(Read, 0x0), (Write, 0x4), (Write, 0x40)]), vec![Fill, Hit, Bypass]);
    assert_eq!(c.valid_line_count(), 1);
}

#[test]
fn write_allocate_fills_on_write_miss() {
    let mut c = cache(64, 8, 2, WritePolicyConfig::WriteAllocate, RoundRobin);
    assert_eq!(run(&mut c, &[(Write, 0x0), (Read, 0x0)]), vec![Fill, Hit]);
}

#[test]
fn cursor_moves_on_every_fill_for_every_policy() {
    let mut lru = cache(64, 8, 4, WritePolicyConfig::WriteAllocate, LeastRecentlyUsed);
    let mut random = cache(64, 8, 4, WritePolicyConfig::WriteAllocate, Random::new(Some(5)));
    // 2 sets, every 0x10 stride stays in set 0
    let trace = [(Read, 0x0), (Read, 0x10), (Read, 0x0), (Read, 0x20)];
    run(&mut lru, &trace);
    run(&mut random, &trace);
    assert_eq!(lru.sets()[0].round_robin(), 3);
    assert_eq!(random.sets()[0].round_robin(), 3);
    assert_eq!(lru.sets()[1].round_robin(), 0);
}

#[test]
fn random_fills_before_evicting() {
    let mut c = cache(128, 16, 8, WritePolicyConfig::WriteAllocate, Random::new(Some(17)));
    // A single set, 8 distinct blocks fill it exactly
    let fills: Vec<(AccessKind, u32)> = (0..8).map(|i| (Read, i * 16)).collect();
    assert!(run(&mut c, &fills).iter().all(|o| *o == Fill));
    assert!(c.sets()[0].is_full());
    assert_eq!(c.access(Read, 0x1000, 4), Evict);
    assert_eq!(c.statistics().evictions, 1);
}

#[test]
fn round_robin_evicts_in_fill_order() {
    let mut c = cache(64, 16, 4, WritePolicyConfig::WriteAllocate, RoundRobin);
    let trace: Vec<(AccessKind, u32)> = (0..10).map(|i| (Read, i * 64)).collect();
    let outcomes = run(&mut c, &trace);
    assert_eq!(outcomes[..4], [Fill; 4]);
    assert_eq!(outcomes[4..], [Evict; 6]);
    // Blocks 8 and 9 went to ways 0 and 1
    let set = &c.sets()[0];
    assert_eq!(set.lines()[0].tag, c.decode(8 * 64).tag);
    assert_eq!(set.lines()[1].tag, c.decode(9 * 64).tag);
    assert_eq!(set.round_robin(), 2);
}

#[test]
fn counters_stay_consistent_over_long_traces() {
    for policy in [ReplacementPolicyConfig::RoundRobin, ReplacementPolicyConfig::Random, ReplacementPolicyConfig::LeastRecentlyUsed] {
        for write_policy in [WritePolicyConfig::WriteAllocate, WritePolicyConfig::NoWriteAllocate] {
            let config = CacheConfig {
                capacity: 4096,
                block_size: 32,
                ways: 4,
                replacement_policy: policy,
                write_policy,
                seed: Some(11),
            };
            let mut c = GenericCache::create(&config).unwrap();
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            let n = 100_000u64;
            let mut allocating_misses = 0;
            let mut evictions = 0;
            for _ in 0..n {
                let kind = if rng.gen_bool(0.3) { Write } else { Read };
                // Keep the working set a few times larger than the cache so all outcomes occur
                let address = rng.gen_range(0..16 * 4096u32);
                match c.access(kind, address, 4) {
                    Fill => allocating_misses += 1,
                    Evict => {
                        allocating_misses += 1;
                        evictions += 1;
                    }
                    Hit | Bypass => {}
                }
            }
            let stats = *c.statistics();
            assert_eq!(stats.accesses, n);
            assert_eq!(stats.hits + stats.misses, n);
            assert_eq!(stats.evictions, evictions);
            assert!(stats.evictions <= allocating_misses);
            assert!(stats.hits > 0 && stats.evictions > 0);
            assert!(c.valid_line_count() <= 4096 / 32);
            assert_eq!(c.destroy(), stats);
        }
    }
}

#[test]
fn addresses_are_taken_modulo_the_address_space() {
    let mut c = cache(1 << 16, 64, 8, WritePolicyConfig::WriteAllocate, LeastRecentlyUsed);
    assert_eq!(c.access(Read, u32::MAX, 1), Fill);
    assert_eq!(c.access(Read, u32::MAX - 63, 64), Hit);
    let d = c.decode(u32::MAX);
    assert_eq!(d.index, c.geometry().set_count - 1);
    assert_eq!(d.tag, u32::MAX >> c.geometry().tag_shift());
}

#[test]
fn seeded_random_caches_agree() {
    let config = CacheConfig {
        capacity: 512,
        block_size: 16,
        ways: 4,
        replacement_policy: ReplacementPolicyConfig::Random,
        write_policy: WritePolicyConfig::WriteAllocate,
        seed: Some(42),
    };
    let mut a = GenericCache::create(&config).unwrap();
    let mut b = GenericCache::create(&config).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for _ in 0..10_000 {
        let address = rng.gen_range(0..8192u32);
        assert_eq!(a.access(Read, address, 4), b.access(Read, address, 4));
    }
}
