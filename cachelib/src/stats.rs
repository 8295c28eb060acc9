use std::fmt;
use serde::{Deserialize, Serialize};

/// Cumulative counters for a cache. Can be serialised to the output format
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct Statistics {
    pub accesses: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Statistics {
    pub fn hit_ratio(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 / self.accesses as f64
        }
    }

    pub fn miss_ratio(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64
        }
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cache statistics:")?;
        writeln!(f, "  accesses:        {:>10}", self.accesses)?;
        writeln!(f, "  hits:            {:>10} ({:.2}%)", self.hits, self.hit_ratio() * 100.0)?;
        writeln!(f, "  misses:          {:>10} ({:.2}%)", self.misses, self.miss_ratio() * 100.0)?;
        write!(f, "  evictions:       {:>10}", self.evictions)
    }
}
