//! Process-scoped configuration (component C9 / data model `Config`).
//!
//! `RawConfig` is the `serde`-deserializable mirror of the JSON file
//! described in spec.md §6; `Config::from_raw` applies the defaulting and
//! validation rules of `original_source/src/pprl/data.go: init_config`,
//! producing the immutable-once-built value every pipeline stage reads.

use crate::error::{CliResult, PprlError};
use crate::pool;

/// The JSON shape of `--conf <path>`. Every field but `num_field` is
/// optional at the wire level; defaulting happens in `Config::from_raw`.
#[derive(Debug, Deserialize, Default)]
pub struct RawConfig {
    #[serde(default)]
    pub dataset: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub ignore: String,
    #[serde(default)]
    pub buffer: i64,
    #[serde(default)]
    pub hash: i64,
    pub num_field: Option<usize>,
    pub ngram: Option<usize>,
    #[serde(default)]
    pub bloom_bit: usize,
    #[serde(default)]
    pub block_bit: usize,
    #[serde(default)]
    pub max_routine: i64,
    pub ratio: Option<f64>,
}

/// Forward-only pipeline state, per spec.md §4's state machine. A stage
/// function that finds `self.state` behind where it expects is a
/// programming error, not a recoverable one — hence `debug_assert!` at each
/// transition rather than a `Result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    Created,
    Configured,
    Loaded,
    EntropyKnown,
    Weighted,
    BitsAllocated,
    KsKnown,
    IndexesReady,
}

#[derive(Debug)]
pub struct Config {
    pub prefix: String,
    pub paths: Vec<String>,
    pub sizes: Vec<usize>,
    /// Length `num_fields`; `true` at index `i` means field `i` is skipped
    /// everywhere downstream.
    pub ignore: Vec<bool>,
    pub num_fields: usize,
    pub ngram: usize,
    pub bloom_bits: usize,
    pub block_bits: usize,
    pub buffer_pool: usize,
    pub hash_pool: usize,
    pub max_routine: usize,
    pub ratio: f64,
    pub debug: bool,

    /// Per-field weight, populated by the weight allocator (C5).
    pub weight: Vec<f64>,
    /// Per-field bit quota `m[i]`, populated by the bit-budget distributor (C6).
    pub bit_quota: Vec<usize>,
    /// Per-field hash count `k[i]`, populated by the hash-count solver (C7).
    pub hash_count: Vec<usize>,
    /// Global, record-count-weighted average n-gram length per field.
    pub avg_ngram: Vec<f64>,

    pub state: State,
}

impl Config {
    /// Builds a validated `Config` from the freshly-parsed JSON file
    /// contents, applying every default and check in
    /// `original_source/src/pprl/data.go: init_config`.
    pub fn from_raw(raw: RawConfig, debug: bool) -> CliResult<Self> {
        let num_fields = match raw.num_field {
            Some(n) if n > 0 => n,
            _ => return Err(PprlError::MissingFieldCount),
        };

        let paths: Vec<String> = raw.dataset.split(',').map(str::to_owned).collect();
        let size_tokens: Vec<&str> = raw.size.split(',').collect();
        if size_tokens.len() != paths.len() {
            return Err(PprlError::ConfigSizeMismatch);
        }
        let sizes = size_tokens
            .iter()
            .map(|t| t.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| PprlError::InvalidSize)?;

        let ignore_tokens: Vec<&str> = if raw.ignore.trim().is_empty() {
            Vec::new()
        } else {
            raw.ignore.split(',').collect()
        };
        if ignore_tokens.len() >= num_fields {
            return Err(PprlError::InvalidIgnore);
        }
        let mut ignore = vec![false; num_fields];
        for token in &ignore_tokens {
            let idx: i64 = token.trim().parse().map_err(|_| PprlError::InvalidIgnore)?;
            if idx < 0 || idx as usize >= num_fields {
                return Err(PprlError::InvalidIgnore);
            }
            ignore[idx as usize] = true;
        }

        let buffer_pool = if raw.buffer <= 0 {
            pool::DEFAULT_BUFFER_POOL
        } else {
            raw.buffer as usize
        };
        let hash_pool = if raw.hash <= 0 {
            pool::DEFAULT_HASH_POOL
        } else {
            raw.hash as usize
        };
        let max_routine = if raw.max_routine <= 0 {
            pool::DEFAULT_MAX_ROUTINE
        } else {
            raw.max_routine as usize
        };
        let ngram = match raw.ngram {
            Some(n) if n != 0 => n,
            _ => 2,
        };
        let bloom_bits = if raw.bloom_bit == 0 { 1024 } else { raw.bloom_bit };
        let block_bits = if raw.block_bit == 0 { 4 } else { raw.block_bit };
        let ratio = match raw.ratio {
            Some(r) if r != 0.0 => r,
            _ => 0.5,
        };

        Ok(Config {
            prefix: raw.prefix,
            paths,
            sizes,
            ignore,
            num_fields,
            ngram,
            bloom_bits,
            block_bits,
            buffer_pool,
            hash_pool,
            max_routine,
            ratio,
            debug,
            weight: vec![0.0; num_fields],
            bit_quota: vec![0; num_fields],
            hash_count: vec![0; num_fields],
            avg_ngram: vec![0.0; num_fields],
            state: State::Configured,
        })
    }

    pub fn num_datasets(&self) -> usize {
        self.paths.len()
    }

    pub fn dataset_path(&self, i: usize) -> String {
        format!("{}/{}", self.prefix, self.paths[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(num_field: usize) -> RawConfig {
        RawConfig {
            dataset: "a.csv,b.csv".to_string(),
            prefix: "data".to_string(),
            size: "10,20".to_string(),
            ignore: String::new(),
            num_field: Some(num_field),
            ..Default::default()
        }
    }

    #[test]
    fn applies_defaults() {
        let cfg = Config::from_raw(raw(4), false).unwrap();
        assert_eq!(cfg.ngram, 2);
        assert_eq!(cfg.bloom_bits, 1024);
        assert_eq!(cfg.block_bits, 4);
        assert_eq!(cfg.buffer_pool, pool::DEFAULT_BUFFER_POOL);
        assert_eq!(cfg.hash_pool, pool::DEFAULT_HASH_POOL);
        assert_eq!(cfg.max_routine, pool::DEFAULT_MAX_ROUTINE);
        assert!((cfg.ratio - 0.5).abs() < f64::EPSILON);
        assert_eq!(cfg.ignore, vec![false; 4]);
        assert_eq!(cfg.state, State::Configured);
    }

    #[test]
    fn rejects_size_count_mismatch() {
        let mut r = raw(4);
        r.size = "10".to_string();
        assert!(matches!(
            Config::from_raw(r, false),
            Err(PprlError::ConfigSizeMismatch)
        ));
    }

    #[test]
    fn rejects_missing_num_field() {
        let mut r = raw(4);
        r.num_field = None;
        assert!(matches!(
            Config::from_raw(r, false),
            Err(PprlError::MissingFieldCount)
        ));
    }

    #[test]
    fn rejects_invalid_size_token() {
        let mut r = raw(4);
        r.size = "ten,20".to_string();
        assert!(matches!(
            Config::from_raw(r, false),
            Err(PprlError::InvalidSize)
        ));
    }

    #[test]
    fn parses_ignore_list() {
        let mut r = raw(4);
        r.ignore = "1,3".to_string();
        let cfg = Config::from_raw(r, false).unwrap();
        assert_eq!(cfg.ignore, vec![false, true, false, true]);
    }

    #[test]
    fn rejects_out_of_range_ignore() {
        let mut r = raw(4);
        r.ignore = "9".to_string();
        assert!(matches!(
            Config::from_raw(r, false),
            Err(PprlError::InvalidIgnore)
        ));
    }

    #[test]
    fn rejects_ignore_list_as_long_as_num_fields() {
        let mut r = raw(2);
        r.ignore = "0,1".to_string();
        assert!(matches!(
            Config::from_raw(r, false),
            Err(PprlError::InvalidIgnore)
        ));
    }
}
