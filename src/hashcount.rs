//! Hash-count solver (component C7).
//!
//! Grounded in `original_source/src/pprl/encoding.go: prepare_encoding`'s
//! second half. `k[i] = floor((log2 ratio) / log2((m[i]-1)/m[i]) / g[i])`;
//! IEEE-754 division lets the degenerate cases (`m[i] <= 1`, `g[i] == 0`)
//! fall out of the formula itself rather than needing special-cased
//! branches: `log2(0.0)` is `-inf`, and a finite value divided by `±inf` is
//! `0.0`, which truncates to `k[i] = 0` exactly as spec.md §4.7 requires.

use crate::config::{Config, State};

pub fn run(cfg: &mut Config) {
    debug_assert_eq!(cfg.state, State::BitsAllocated);

    let log_ratio = cfg.ratio.log2();

    cfg.hash_count = (0..cfg.num_fields)
        .map(|i| {
            if cfg.ignore[i] {
                return 0;
            }
            let m = cfg.bit_quota[i] as f64;
            let ratio_term = (m - 1.0) / m;
            let num_hash = (log_ratio / ratio_term.log2()) / cfg.avg_ngram[i];
            if num_hash.is_finite() && num_hash > 0.0 {
                num_hash as usize
            } else {
                0
            }
        })
        .collect();

    cfg.state = State::KsKnown;
}
