#[macro_use]
extern crate serde_derive;

use std::fs;
use std::process;

use docopt::Docopt;

mod bloom;
mod config;
mod dataset;
mod distribute;
mod entropy;
mod error;
mod hashcount;
mod numbers;
mod pipeline;
mod pool;
mod record;
mod report;
mod weight;

use config::Config;
use error::{CliResult, PprlError};
use pool::PoolSet;

static USAGE: &str = "
Encode one or more CSV datasets into salted Bloom filters for
privacy-preserving record linkage.

Usage:
    pprl [options]
    pprl (-h | --help)

Options:
    --conf <file>   Path to the JSON pipeline configuration.
                    [default: conf/default.json]
    --debug         Print the resolved configuration and stage traces.
    -h, --help      Display this message.
";

#[derive(Debug, Deserialize)]
struct Args {
    flag_conf: String,
    flag_debug: bool,
}

fn get_args() -> CliResult<Args> {
    Docopt::new(USAGE)
        .and_then(|d| d.help(true).deserialize())
        .map_err(PprlError::from)
}

fn run() -> CliResult<()> {
    let args = get_args()?;

    report::stage("init", "initializing config...");
    let raw_text = fs::read_to_string(&args.flag_conf)?;
    let raw: config::RawConfig = serde_json::from_str(&raw_text)?;
    let mut cfg = Config::from_raw(raw, args.flag_debug)?;

    if cfg.debug {
        report::debug_trace(&cfg, "init", &format!("{:#?}", cfg));
    }

    let pools = PoolSet::new(cfg.buffer_pool, cfg.hash_pool, cfg.max_routine, cfg.num_fields);

    report::stage("pipeline", "preparing datasets...");
    let datasets = pipeline::run(&mut cfg, &pools)?;

    report::print_report(&cfg, &datasets);

    Ok(())
}

fn main() {
    match run() {
        Ok(()) => process::exit(0),
        Err(PprlError::Flag(err)) => err.exit(),
        Err(err) => {
            eprintln!("pprl: {}", err);
            process::exit(1);
        }
    }
}
