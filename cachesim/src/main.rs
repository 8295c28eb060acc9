use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use anyhow::{Context, Result};
use clap::Parser;
use cachelib::cache::CacheTrait;
use cachelib::config::{CacheConfig, ReplacementPolicyConfig, WritePolicyConfig};
use cachelib::io::open_trace;
use cachelib::simulator::Simulator;

#[derive(Parser, Debug)]
#[command(author, version, about = "Set-associative cache simulator", long_about = None)]
struct Args {
    /// Trace file, one `<r|w> <hex address> <length>` per line
    trace: PathBuf,

    /// JSON cache configuration. Overrides the dimension and policy flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Capacity in bytes
    #[arg(long, default_value_t = 32768)]
    capacity: u32,

    /// Block size in bytes
    #[arg(short, long, default_value_t = 32)]
    block_size: u32,

    /// Lines per set
    #[arg(short, long, default_value_t = 4)]
    ways: u32,

    #[arg(short, long, value_enum, default_value_t = ReplacementPolicyConfig::RoundRobin)]
    replacement: ReplacementPolicyConfig,

    #[arg(long, value_enum, default_value_t = WritePolicyConfig::WriteAllocate)]
    write_policy: WritePolicyConfig,

    /// Seed for the random replacement policy
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the result as JSON
    #[arg(short, long)]
    json: bool,

    /// Print timing information
    #[arg(short, long)]
    performance: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn cache_config(&self) -> Result<CacheConfig> {
        match &self.config {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("Couldn't open the config file at path {}", path.display()))?;
                CacheConfig::from_json_reader(BufReader::new(file)).context("Couldn't parse the config file")
            }
            None => Ok(CacheConfig {
                capacity: self.capacity,
                block_size: self.block_size,
                ways: self.ways,
                replacement_policy: self.replacement,
                write_policy: self.write_policy,
                seed: self.seed,
            }),
        }
    }
}

fn main() -> Result<()> {
    let start = Instant::now();
    let args = Args::parse();
    let filter = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = args.cache_config()?;
    let mut simulator = Simulator::new(&config).context("Invalid cache configuration")?;
    let trace_reader = open_trace(&args.trace).with_context(|| format!("Couldn't open the trace file at path {}", args.trace.display()))?;
    let result = simulator.simulate(trace_reader)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(result).context("Couldn't serialise the output")?);
    } else {
        println!("{}", result.statistics);
    }
    log::debug!("{} of {} lines valid at exit", simulator.cache().valid_line_count(), config.capacity / config.block_size);
    let simulation_time = *simulator.get_execution_time();
    let statistics = simulator.finish();
    if args.performance {
        let total_time = start.elapsed();
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Throughput: {:.0} accesses/s", statistics.accesses as f64 / simulation_time.as_secs_f64().max(f64::EPSILON));
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    Ok(())
}
