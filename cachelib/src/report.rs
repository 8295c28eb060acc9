use std::fmt;
use crate::config::{Geometry, ReplacementPolicyConfig, WritePolicyConfig};

pub fn replacement_policy_name(policy: ReplacementPolicyConfig) -> &'static str {
    match policy {
        ReplacementPolicyConfig::RoundRobin => "round robin",
        ReplacementPolicyConfig::Random => "random",
        ReplacementPolicyConfig::LeastRecentlyUsed => "LRU",
    }
}

pub fn write_policy_name(policy: WritePolicyConfig) -> &'static str {
    match policy {
        WritePolicyConfig::WriteAllocate => "allocate",
        WritePolicyConfig::NoWriteAllocate => "no allocate",
    }
}

/// The configuration summary printed when a cache is created
#[derive(Debug, Copy, Clone)]
pub struct ConfigReport {
    pub geometry: Geometry,
    pub replacement_policy: ReplacementPolicyConfig,
    pub write_policy: WritePolicyConfig,
}

impl fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = &self.geometry;
        writeln!(f, "Cache configuration:")?;
        writeln!(f, "  capacity:        {:>6}", g.capacity)?;
        writeln!(f, "  blocksize:       {:>6}", g.block_size)?;
        writeln!(f, "  ways:            {:>6}", g.ways)?;
        writeln!(f, "  sets:            {:>6}", g.set_count)?;
        writeln!(f, "  tag shift:       {:>6}", g.tag_shift())?;
        writeln!(f, "  replacement:     {}", replacement_policy_name(self.replacement_policy))?;
        write!(f, "  on write miss:   {}", write_policy_name(self.write_policy))
    }
}
