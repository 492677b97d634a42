//! End-to-end exercise of the `pprl` binary over a small fixture dataset,
//! in the spirit of the model repo's command-integration tests but without
//! its `Workdir` harness (never retrieved alongside this crate): we drive
//! the built binary directly through `std::process::Command`.

use std::fs;
use std::io::Write;
use std::process::Command;

fn write_dataset(dir: &std::path::Path, name: &str, rows: &[&str]) -> String {
    let path = dir.join(name);
    let mut f = fs::File::create(&path).unwrap();
    for row in rows {
        writeln!(f, "{}", row).unwrap();
    }
    path.to_str().unwrap().to_string()
}

#[test]
fn runs_full_pipeline_and_prints_a_report() {
    let dir = tempfile::tempdir().unwrap();

    write_dataset(
        &dir,
        "people.csv",
        &[
            "name,city",
            "alice,nyc",
            "bob,sf",
            "carol,nyc",
            "dave,",
        ],
    );

    let conf = serde_json::json!({
        "dataset": "people.csv",
        "prefix": dir.path().to_str().unwrap(),
        "size": "4",
        "num_field": 2,
        "ngram": 2,
        "bloom_bit": 128,
        "block_bit": 4,
        "ratio": 0.5
    });
    let conf_path = dir.path().join("conf.json");
    fs::write(&conf_path, serde_json::to_vec(&conf).unwrap()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pprl"))
        .arg("--conf")
        .arg(conf_path.to_str().unwrap())
        .output()
        .expect("failed to run pprl binary");

    assert!(
        output.status.success(),
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Weight of field 0"));
    assert!(stdout.contains("Weight of field 1"));
    assert!(stdout.contains("Printing metadata for dataset 0"));
}

#[test]
fn rejects_a_config_with_mismatched_size_list() {
    let dir = tempfile::tempdir().unwrap();
    write_dataset(&dir, "a.csv", &["name", "alice"]);
    write_dataset(&dir, "b.csv", &["name", "bob"]);

    let conf = serde_json::json!({
        "dataset": "a.csv,b.csv",
        "prefix": dir.path().to_str().unwrap(),
        "size": "1",
        "num_field": 1
    });
    let conf_path = dir.path().join("conf.json");
    fs::write(&conf_path, serde_json::to_vec(&conf).unwrap()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pprl"))
        .arg("--conf")
        .arg(conf_path.to_str().unwrap())
        .output()
        .expect("failed to run pprl binary");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("#size"));
}

#[test]
fn rejects_a_missing_config_file() {
    let output = Command::new(env!("CARGO_BIN_EXE_pprl"))
        .arg("--conf")
        .arg("/no/such/file.json")
        .output()
        .expect("failed to run pprl binary");

    assert!(!output.status.success());
}
