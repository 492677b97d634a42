//! Bloom indexer (component C8).
//!
//! Grounded in `original_source/src/pprl/encoding.go`'s `get_bloom_index`/
//! `get_index`/`hash_to_index`/`get_padding`. The original builds its salt
//! prefix through a small lookup-table "coin system"
//! (`padding_tbl`/`get_padding`) purely as a Go-era micro-optimization for
//! repeated string concatenation; `"*".repeat(j)` produces byte-identical
//! output and is the idiomatic Rust equivalent, so that's what's used here.

use rayon::prelude::*;

use crate::config::{Config, State};
use crate::dataset::Dataset;
use crate::numbers::bytes_to_u64_le;
use crate::pool::PoolSet;

/// `MD5(salt || ngram)`, folded into `[0, mb)` by XOR-ing the digest's two
/// little-endian 64-bit halves together.
pub fn hash_to_index(ngram: &str, salt_len: usize, mb: usize, scratch: &mut Vec<u8>) -> usize {
    scratch.clear();
    scratch.resize(salt_len, b'*');
    scratch.extend_from_slice(ngram.as_bytes());

    let digest = md5::compute(&scratch[..]);
    let h1 = bytes_to_u64_le(&digest[0..8]);
    let h2 = bytes_to_u64_le(&digest[8..16]);
    ((h1 ^ h2) % mb as u64) as usize
}

/// Fills in `bf_index` for every non-ignored field of every record across
/// every dataset. One rayon task per (dataset, record, field) triple,
/// bounded by the worker pool; each task borrows a scratch buffer from the
/// hash pool for salt+n-gram assembly.
pub fn run(cfg: &mut Config, datasets: &mut [Dataset], pools: &PoolSet) {
    debug_assert_eq!(cfg.state, State::KsKnown);

    let mb = cfg.bloom_bits;
    let ignore = &cfg.ignore;
    let k = &cfg.hash_count;

    for dataset in datasets.iter_mut() {
        pools.workers.install(|| {
            dataset.records.par_iter_mut().for_each(|record| {
                for (i, field) in record.fields.iter_mut().enumerate() {
                    if ignore[i] {
                        continue;
                    }
                    let k_i = k[i];
                    let mut matrix = vec![vec![0usize; field.ngram.len()]; k_i];
                    for (t, ngram) in field.ngram.iter().enumerate() {
                        for (j, row) in matrix.iter_mut().enumerate() {
                            let handle = pools.hash.acquire();
                            let idx = handle.with(|scratch| hash_to_index(ngram, j, mb, scratch));
                            row[t] = idx;
                        }
                    }
                    field.bf_index = matrix;
                }
            });
        });
    }

    cfg.state = State::IndexesReady;
}
