//! Dataset loading and per-field metadata (component C3).
//!
//! Grounded in `original_source/src/pprl/data.go`'s `load_single_dataset`
//! and `original_source/src/pprl/util.go`'s `ngram`/`make_ngram`, re-cast
//! as a `rayon`-parallel loader over an explicit `PoolSet` rather than
//! goroutines pulling from process-global pools.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use rayon::prelude::*;

use crate::config::Config;
use crate::error::CliResult;
use crate::pool::PoolSet;
use crate::record::{Field, Record};

/// Per-field frequency table and n-gram accounting, one per dataset per
/// field (spec.md §3 `FieldMeta`).
#[derive(Debug, Clone, Default)]
pub struct FieldMeta {
    pub name: String,
    pub freq: HashMap<String, f64>,
    pub exists: f64,
    pub total: f64,
    pub entropy: f64,
    pub sum_n_gram: f64,
    pub avg_n_gram: f64,
}

/// One loaded dataset: its records plus per-field metadata and the
/// dataset-local average n-gram length `g_d`.
#[derive(Debug, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
    pub fields: Vec<FieldMeta>,
    pub avg_ngram: Vec<f64>,
}

impl Dataset {
    pub fn nr(&self) -> usize {
        self.records.len()
    }
}

/// Splits a raw padded string into its overlapping `ngram`-length
/// substrings. Operates on `char`s rather than bytes so a dataset with
/// non-ASCII text never panics on a byte boundary — the one deliberate
/// departure from the original's raw byte slicing (see DESIGN.md).
pub fn split_ngrams(padded: &str, ngram: usize) -> Vec<String> {
    let chars: Vec<char> = padded.chars().collect();
    if chars.len() < ngram {
        return Vec::new();
    }
    (0..=chars.len() - ngram)
        .map(|i| chars[i..i + ngram].iter().collect())
        .collect()
}

/// Builds `raw`/`padded`/`ngram` for one cell, per spec.md §4.3's empty-cell
/// policy, and returns `(field, is_present, ngram_count_for_sum)`.
fn build_field(cell: &str, ngram: usize) -> (Field, bool, f64) {
    let trimmed = cell.trim();
    let pad = " ".repeat(ngram.saturating_sub(1));

    if trimmed.is_empty() {
        let padded = format!(" {}", pad);
        let ngrams = split_ngrams(&padded, ngram);
        let field = Field {
            raw: "n/a".to_string(),
            padded,
            ngram: ngrams,
            bf_index: Vec::new(),
        };
        (field, false, 0.0)
    } else {
        let padded = format!("{}{}{}", pad, trimmed, pad);
        let ngrams = split_ngrams(&padded, ngram);
        let count = ngrams.len() as f64;
        let field = Field {
            raw: trimmed.to_string(),
            padded,
            ngram: ngrams,
            bf_index: Vec::new(),
        };
        (field, true, count)
    }
}

fn split_line(line: &str, buf: &mut Vec<String>) {
    buf.clear();
    for token in line.split(',') {
        buf.push(token.to_string());
    }
}

/// Loads one dataset file into records + per-field metadata. File scans are
/// sequential (matching spec.md §4.3's "file scans within a dataset are
/// sequential"); the cross-dataset parallelism lives in `load_all`.
fn load_one(cfg: &Config, index: usize, pools: &PoolSet) -> CliResult<Dataset> {
    let path = cfg.dataset_path(index);
    let file = File::open(&path)?;
    let mut lines = BufReader::new(file).lines();

    let mut fields: Vec<FieldMeta> = Vec::new();
    let mut records: Vec<Record> = Vec::new();

    if let Some(header) = lines.next() {
        let header = header?;
        let handle = pools.scratch.acquire();
        handle.with(|buf| {
            split_line(&header, buf);
            fields = (0..cfg.num_fields)
                .map(|i| FieldMeta {
                    name: buf.get(i).map(|s| s.trim().to_string()).unwrap_or_default(),
                    ..Default::default()
                })
                .collect();
        });
    }

    for line in lines {
        let line = line?;
        let handle = pools.scratch.acquire();
        let mut record = Record::new(cfg.num_fields, cfg.bloom_bits, cfg.block_bits);
        handle.with(|buf| {
            split_line(&line, buf);
            for i in 0..cfg.num_fields {
                let cell = buf.get(i).map(String::as_str).unwrap_or("");
                let (field, present, ngram_count) = build_field(cell, cfg.ngram);
                let meta = &mut fields[i];
                meta.total += 1.0;
                if present {
                    meta.exists += 1.0;
                    meta.sum_n_gram += ngram_count;
                }
                record.fields.push(field);
            }
        });
        records.push(record);
    }

    for (i, ignored) in cfg.ignore.iter().enumerate() {
        if *ignored {
            continue;
        }
        let meta = &mut fields[i];
        meta.avg_n_gram = if meta.exists > 0.0 {
            (meta.sum_n_gram / meta.exists).ceil()
        } else {
            0.0
        };
    }

    if records.len() != cfg.sizes[index] {
        crate::report::warn(
            "load",
            &format!(
                "dataset {} reports {} records in config but {} rows were \
                 read; using the observed count",
                index,
                cfg.sizes[index],
                records.len()
            ),
        );
    }

    let avg_ngram = fields.iter().map(|f| f.avg_n_gram).collect();

    Ok(Dataset {
        records,
        fields,
        avg_ngram,
    })
}

/// Loads every configured dataset in parallel (one rayon task per dataset,
/// bounded by the worker pool) and derives the global, record-count
/// weighted average n-gram length `g[i]` per spec.md §4.3's post-step.
pub fn load_all(cfg: &mut Config, pools: &PoolSet) -> CliResult<Vec<Dataset>> {
    debug_assert_eq!(cfg.state, crate::config::State::Configured);

    let cfg_ref: &Config = cfg;
    let datasets: CliResult<Vec<Dataset>> = pools.workers.install(|| {
        (0..cfg_ref.num_datasets())
            .into_par_iter()
            .map(|i| load_one(cfg_ref, i, pools))
            .collect()
    });
    let datasets = datasets?;

    let mut sum = vec![0.0f64; cfg.num_fields];
    let mut total_rows = 0.0f64;
    for d in &datasets {
        let nr = d.nr() as f64;
        total_rows += nr;
        for (i, g) in d.avg_ngram.iter().enumerate() {
            sum[i] += g * nr;
        }
    }
    cfg.avg_ngram = if total_rows > 0.0 {
        sum.iter().map(|s| (s / total_rows).ceil()).collect()
    } else {
        vec![0.0; cfg.num_fields]
    };

    cfg.state = crate::config::State::Loaded;
    Ok(datasets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ngram_count_identity() {
        // S5: "ab" padded with ngram = 2 -> " ab " -> [" a", "ab", "b "]
        let padded = " ab ";
        let grams = split_ngrams(padded, 2);
        assert_eq!(grams, vec![" a", "ab", "b "]);
        assert_eq!(grams.len(), padded.chars().count() - 2 + 1);
    }

    #[test]
    fn empty_cell_gets_sentinel_and_single_ngram() {
        let (field, present, count) = build_field("", 2);
        assert_eq!(field.raw, "n/a");
        assert_eq!(field.padded, "  ");
        assert_eq!(field.ngram.len(), 1);
        assert!(!present);
        assert_eq!(count, 0.0);
    }

    #[test]
    fn non_empty_cell_is_padded_symmetrically() {
        let (field, present, count) = build_field("  hello  ", 3);
        assert_eq!(field.raw, "hello");
        assert_eq!(field.padded, "  hello  ");
        assert!(present);
        assert_eq!(count, field.ngram.len() as f64);
    }

    #[test]
    fn loads_dataset_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "name,city").unwrap();
        writeln!(f, "alice,nyc").unwrap();
        writeln!(f, "bob,").unwrap();
        drop(f);

        let mut raw = crate::config::RawConfig {
            dataset: "d.csv".to_string(),
            prefix: dir.path().to_str().unwrap().to_string(),
            size: "2".to_string(),
            num_field: Some(2),
            ..Default::default()
        };
        raw.ngram = Some(2);
        let mut cfg = Config::from_raw(raw, false).unwrap();
        let pools = PoolSet::new(cfg.buffer_pool, cfg.hash_pool, cfg.max_routine, cfg.num_fields);

        let datasets = load_all(&mut cfg, &pools).unwrap();
        assert_eq!(datasets.len(), 1);
        let d = &datasets[0];
        assert_eq!(d.nr(), 2);
        assert_eq!(d.fields[0].name, "name");
        assert_eq!(d.fields[1].name, "city");
        assert_eq!(d.fields[1].exists, 1.0); // "nyc" present, second row empty
        assert_eq!(d.records[1].fields[1].raw, "n/a");
        assert_eq!(cfg.state, crate::config::State::Loaded);
    }
}
