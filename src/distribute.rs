//! Bit-budget distributor (component C6).
//!
//! Grounded in `original_source/src/pprl/encoding.go: prepare_encoding`'s
//! first half. spec.md §9 flags that loop's inner comparison
//! (`(*cf).m[i] < min && !distributed[i]`) as almost certainly meant to
//! read `m[j]`/`distributed[j]` — it's comparing against the field being
//! considered, not the outer redistribution-count index — and directs
//! implementers to the least-loaded-field reading used below.

use crate::config::{Config, State};
use crate::error::{CliResult, PprlError};

pub fn run(cfg: &mut Config) -> CliResult<()> {
    debug_assert_eq!(cfg.state, State::Weighted);

    let nf = cfg.num_fields;
    let mut m: Vec<usize> = (0..nf)
        .map(|i| (cfg.bloom_bits as f64 * cfg.weight[i]).floor() as usize)
        .collect();

    let sum: usize = m.iter().sum();
    if sum > cfg.bloom_bits {
        return Err(PprlError::BitOverflow);
    }
    let mut remaining = cfg.bloom_bits - sum;

    let mut selected = vec![false; nf];
    let mut dispatched: usize = 0;
    while remaining > 0 {
        let candidate = (0..nf)
            .filter(|&j| !cfg.ignore[j] && !selected[j])
            .min_by_key(|&j| m[j]);

        let chosen = match candidate {
            Some(j) => j,
            None => {
                // Every eligible field was already picked this round before
                // the `dispatched % nf == 0` reset fired; start a fresh
                // round instead of stalling.
                selected.iter_mut().for_each(|s| *s = false);
                (0..nf)
                    .filter(|&j| !cfg.ignore[j])
                    .min_by_key(|&j| m[j])
                    .expect("at least one non-ignored field must exist")
            }
        };

        m[chosen] += 1;
        selected[chosen] = true;
        dispatched += 1;
        remaining -= 1;

        if dispatched % nf == 0 {
            selected.iter_mut().for_each(|s| *s = false);
        }
    }

    let total: usize = m.iter().sum();
    if total != cfg.bloom_bits {
        return Err(PprlError::BitRedistributionFailed);
    }

    cfg.bit_quota = m;
    cfg.state = State::BitsAllocated;
    Ok(())
}
