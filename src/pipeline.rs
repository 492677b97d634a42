//! Top-level stage orchestration.
//!
//! A straight port of `original_source/src/pprl/util.go: PrepareDataset`,
//! which runs the same six steps in the same order and logs the same stage
//! boundaries. The state machine on `Config` (see `config::State`) is what
//! actually enforces the ordering; this function is just the sequence.

use crate::config::State;
use crate::dataset::Dataset;
use crate::error::CliResult;
use crate::pool::PoolSet;
use crate::{bloom, distribute, entropy, hashcount, report, weight};
use crate::config::Config;

/// Runs every stage from `Configured` to `IndexesReady`, returning the
/// loaded datasets with their records now carrying Bloom indices.
pub fn run(cfg: &mut Config, pools: &PoolSet) -> CliResult<Vec<Dataset>> {
    debug_assert_eq!(cfg.state, State::Configured);

    report::stage("load", "loading datasets...");
    let mut datasets = crate::dataset::load_all(cfg, pools)?;

    report::stage("entropy", "calculating entropy...");
    entropy::run(cfg, &mut datasets, pools)?;

    report::stage("weight", "calculating weights...");
    weight::run(cfg, &datasets);

    report::stage("distribute", "allocating bit budget...");
    distribute::run(cfg)?;

    report::stage("hashcount", "solving hash counts...");
    hashcount::run(cfg);

    report::stage("bloom", "setting bloom filters...");
    bloom::run(cfg, &mut datasets, pools);

    Ok(datasets)
}
