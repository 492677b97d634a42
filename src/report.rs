//! Stage-tagged diagnostics and the final metadata report (component C10).
//!
//! Grounded in the model repo's `colored`-based terminal output
//! (`util::colorize_help` and friends) and in
//! `original_source/src/pprl/util.go: PrintMeta`/`print_meta`, which this
//! is a direct port of.

use std::io::IsTerminal;

use colored::Colorize;

use crate::config::Config;
use crate::dataset::Dataset;

fn tag(stage: &str) -> String {
    let label = format!("[pprl][{}]", stage);
    if std::io::stderr().is_terminal() {
        label.cyan().to_string()
    } else {
        label
    }
}

/// A stage-entry/exit line on stderr: `[pprl][stage] message`.
pub fn stage(name: &str, message: &str) {
    eprintln!("{} {}", tag(name), message);
}

/// A non-fatal warning, still stage-tagged so it greps the same way.
pub fn warn(name: &str, message: &str) {
    let label = format!("[pprl][{}] warning:", name);
    let label = if std::io::stderr().is_terminal() {
        label.yellow().to_string()
    } else {
        label
    };
    eprintln!("{} {}", label, message);
}

/// Verbose tracing gated on `--debug`.
pub fn debug_trace(cfg: &Config, name: &str, message: &str) {
    if cfg.debug {
        eprintln!("{} {}", tag(name), message);
    }
}

/// Port of `PrintMeta`/`print_meta`: per-field weight/k/m/g, then per
/// dataset per field, entropy/avg-n-gram or an ignored marker.
pub fn print_report(cfg: &Config, datasets: &[Dataset]) {
    for i in 0..cfg.num_fields {
        println!("Weight of field {}: {:.6}", i, cfg.weight[i]);
    }
    for i in 0..cfg.num_fields {
        println!(
            "k, m, g of field {}: {}, {}, {:.0}",
            i, cfg.hash_count[i], cfg.bit_quota[i], cfg.avg_ngram[i]
        );
    }
    for (d_idx, dataset) in datasets.iter().enumerate() {
        println!("Printing metadata for dataset {}...", d_idx);
        for i in 0..cfg.num_fields {
            let name = &dataset.fields[i].name;
            if cfg.ignore[i] {
                println!("[{}] field ignored.", name);
            } else {
                println!(
                    "[{}] entropy: {:.6}, avg_n_gram: {:.0}",
                    name, dataset.fields[i].entropy, dataset.avg_ngram[i]
                );
            }
        }
    }
}
