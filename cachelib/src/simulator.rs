use std::io::BufRead;
use std::time::{Duration, Instant};
use serde::{Deserialize, Serialize};
use crate::cache::{CacheTrait, GenericCache};
use crate::config::{CacheConfig, ConfigError};
use crate::stats::Statistics;
use crate::trace::{TraceError, TraceReader};

/// The simulator feeds a trace through a cache and collects results.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly
#[derive(Debug)]
pub struct Simulator {
    cache: GenericCache,
    result: SimulationResult,
    simulation_time: Duration,
}

/// The result of a cache simulation. Can be serialised to the output format
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub configuration: CacheConfig,
    pub statistics: Statistics,
}

impl Simulator {
    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A cache configuration, usually resulting from parsing JSON
    ///
    /// returns: Result<Simulator, ConfigError>
    pub fn new(config: &CacheConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            cache: GenericCache::create(config)?,
            result: SimulationResult {
                configuration: config.clone(),
                statistics: Statistics::default(),
            },
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Simulates every access in a textual trace, in order
    ///
    /// Accesses before a malformed line have already been applied when the error is returned
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace, see [`TraceReader`] for the format
    ///
    /// returns: Result<&SimulationResult, TraceError>
    pub fn simulate(&mut self, reader: impl BufRead) -> Result<&SimulationResult, TraceError> {
        let start = Instant::now();
        let mut events = 0u64;
        let outcome: Result<(), TraceError> = TraceReader::new(reader).try_for_each(|event| {
            let event = event?;
            self.cache.access(event.kind, event.address, event.length);
            events += 1;
            Ok(())
        });
        self.simulation_time += start.elapsed();
        self.result.statistics = *self.cache.statistics();
        log::debug!("simulated {events} accesses, {} lines valid", self.cache.valid_line_count());
        outcome.map(|_| &self.result)
    }

    pub fn cache(&self) -> &GenericCache {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Consumes the simulator, releasing the cache, and returns the final counters
    pub fn finish(self) -> Statistics {
        self.cache.destroy()
    }
}
