//! Shannon entropy calculator (component C4).
//!
//! Grounded in `original_source/src/pprl/util.go: entropy`/`go_first_pass`.
//! The record-count/existence bookkeeping those two Go passes duplicate is
//! already tracked by the loader (C3, `dataset.rs`), so this stage does a
//! single read-only pass building each non-ignored field's frequency table
//! and then folds it into an entropy value using the `total` already on
//! `FieldMeta` — one fewer full scan than the original without changing the
//! observable result.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::config::{Config, State};
use crate::dataset::Dataset;
use crate::pool::PoolSet;

/// `-sum(p * log2(p))` over a frequency table, dividing by `total` (not
/// `exists`) per spec.md §4.4 / §9: missing cells still shrink the
/// probability mass of the values that were observed.
pub fn entropy_value(freq: &HashMap<String, f64>, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    freq.values().fold(0.0, |acc, &count| {
        if count == 0.0 {
            acc
        } else {
            let p = count / total;
            acc - p * p.log2()
        }
    })
}

/// Computes entropy for every non-ignored field of every dataset,
/// parallelized per (dataset, field) and bounded by the worker pool.
pub fn run(cfg: &mut Config, datasets: &mut [Dataset], pools: &PoolSet) -> crate::error::CliResult<()> {
    debug_assert_eq!(cfg.state, State::Loaded);

    for dataset in datasets.iter_mut() {
        let num_fields = cfg.num_fields;
        let ignore = &cfg.ignore;
        let records = &dataset.records;

        let updates: Vec<(usize, HashMap<String, f64>, f64)> = pools.workers.install(|| {
            (0..num_fields)
                .into_par_iter()
                .filter(|&i| !ignore[i])
                .map(|i| {
                    let mut freq: HashMap<String, f64> = HashMap::new();
                    for record in records {
                        let raw = &record.fields[i].raw;
                        if raw != "n/a" {
                            *freq.entry(raw.clone()).or_insert(0.0) += 1.0;
                        }
                    }
                    let total = dataset.fields[i].total;
                    let entropy = entropy_value(&freq, total);
                    (i, freq, entropy)
                })
                .collect()
        });

        for (i, freq, entropy) in updates {
            dataset.fields[i].freq = freq;
            dataset.fields[i].entropy = entropy;
        }
    }

    cfg.state = State::EntropyKnown;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_s6_two_rows_one_missing() {
        // S6: values "x" and "" -> exists=1, total=2, freq {"x":1},
        // entropy = -(1/2)*log2(1/2) = 0.5
        let mut freq = HashMap::new();
        freq.insert("x".to_string(), 1.0);
        let e = entropy_value(&freq, 2.0);
        assert!((e - 0.5).abs() < 1e-9);
    }

    #[test]
    fn entropy_is_zero_for_constant_field() {
        let mut freq = HashMap::new();
        freq.insert("same".to_string(), 10.0);
        assert_eq!(entropy_value(&freq, 10.0), -0.0);
    }

    #[test]
    fn entropy_bounds_hold_for_uniform_distribution() {
        // 4 distinct values each occurring once: entropy should equal log2(4) = 2
        let mut freq = HashMap::new();
        for v in ["a", "b", "c", "d"] {
            freq.insert(v.to_string(), 1.0);
        }
        let e = entropy_value(&freq, 4.0);
        assert!((e - 2.0).abs() < 1e-9);
    }

    #[test]
    fn empty_total_is_zero_entropy() {
        let freq = HashMap::new();
        assert_eq!(entropy_value(&freq, 0.0), 0.0);
    }
}
