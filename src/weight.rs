//! Weight allocator (component C5).
//!
//! Grounded in `original_source/src/pprl/weight.go: weight_entropy`. The
//! original gates its inner accumulation on `ignore[i]` — the *dataset*
//! index of the outer loop — rather than `ignore[j]`, the field index it's
//! actually summing over. spec.md §9 flags this as almost certainly a typo
//! and directs implementers to gate on the field's own ignore flag, which
//! is what this does.

use crate::config::{Config, State};
use crate::dataset::Dataset;

/// `weight[i] = (sum_d nr_d * entropy_d[i]) / (sum_i numer[i])`, zero for
/// ignored fields. Mutates `cfg.weight` in place and advances the state
/// machine to `Weighted`.
pub fn run(cfg: &mut Config, datasets: &[Dataset]) {
    debug_assert_eq!(cfg.state, State::EntropyKnown);

    let mut numer = vec![0.0f64; cfg.num_fields];
    for i in 0..cfg.num_fields {
        if cfg.ignore[i] {
            continue;
        }
        for dataset in datasets {
            numer[i] += dataset.nr() as f64 * dataset.fields[i].entropy;
        }
    }

    let denom: f64 = numer.iter().sum();
    cfg.weight = if denom > 0.0 {
        numer.iter().map(|n| n / denom).collect()
    } else {
        vec![0.0; cfg.num_fields]
    };

    cfg.state = State::Weighted;
}
