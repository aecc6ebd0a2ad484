use grpadj::manager::Report;
use grpadj::model::AdjustedBatch;
use std::{env, fs, fs::File, io::BufReader, path::PathBuf, process::Command};

#[test]
fn basic_workflow() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("basic_workflow");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_path = test_dir.join("config.toml");
    let config_contents = String::new()
        + "[adjust]\n"
        + "weights = [ 0.2, 0.3, 0.5,]\n"
        + "parallel = true\n"
        + "chunk_size = 1024\n"
        + "\n"
        + "[generate]\n"
        + "n_obs = 60000\n"
        + "n_labels = [ 1, 2, 5,]\n"
        + "prob_missing = 0.1\n"
        + "std_dev_noise = 1.0\n"
        + "seed = 42\n";

    fs::write(&config_path, config_contents).expect("failed to write config file");

    fn run_bin(args: &[&str]) {
        let bin = PathBuf::from(env!("CARGO_BIN_EXE_grpadj"));

        let output = Command::new(bin)
            .args(args)
            .output()
            .expect("failed to execute command");

        let stdout_str =
            std::str::from_utf8(&output.stdout).expect("failed to convert stdout to string");
        let stderr_str =
            std::str::from_utf8(&output.stderr).expect("failed to convert stderr to string");

        assert!(
            output.status.success(),
            "failed to run binary with {args:?}\nstdout:\n{stdout_str}\nstderr:\n{stderr_str}\n"
        );
    }

    let test_dir_str = test_dir
        .to_str()
        .expect("failed to convert test directory to string");

    run_bin(&["--work-dir", test_dir_str, "generate"]);
    run_bin(&["--work-dir", test_dir_str, "generate"]);

    run_bin(&["--work-dir", test_dir_str, "adjust"]);
    assert!(test_dir.join("adjusted-0000.msgpack").is_file());
    assert!(test_dir.join("adjusted-0001.msgpack").is_file());

    run_bin(&["--work-dir", test_dir_str, "report"]);
    let report =
        fs::read_to_string(test_dir.join("report.toml")).expect("failed to read report file");
    let report: Report = toml::from_str(&report).expect("failed to parse report file");
    assert_eq!(report.batches.len(), 2);

    for (batch_idx, batch_report) in report.batches.iter().enumerate() {
        let adjusted_path = test_dir.join(format!("adjusted-{batch_idx:04}.msgpack"));
        let file = File::open(&adjusted_path).expect("failed to open adjusted file");
        let adjusted: AdjustedBatch = rmp_serde::decode::from_read(BufReader::new(file))
            .expect("failed to decode adjusted file");

        let present: Vec<f64> = adjusted.vals.iter().flatten().copied().collect();
        let n_present = present.len() as f64;
        let mean = present.iter().sum::<f64>() / n_present;
        let diff_2_sum: f64 = present.iter().map(|val| (val - mean).powi(2)).sum();
        let std_dev = (diff_2_sum / (n_present - 1.0)).sqrt();

        let summary = &batch_report.summary;
        assert_eq!(batch_report.batch_idx, batch_idx);
        assert_eq!(summary.n_obs, 60000);
        assert_eq!(summary.n_missing, adjusted.vals.len() - present.len());
        assert!(summary.n_missing > 0);
        assert!((summary.mean - mean).abs() < 1e-8);
        assert!((summary.std_dev - std_dev).abs() < 1e-8);
    }

    run_bin(&["--work-dir", test_dir_str, "clean"]);
    assert!(!test_dir.join("adjusted-0000.msgpack").exists());
    assert!(!test_dir.join("report.toml").exists());
    assert!(test_dir.join("batch-0000.msgpack").is_file());

    fs::remove_dir_all(&test_dir).ok();
}

#[test]
fn mismatched_config_fails() {
    let test_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("mismatched_config");

    fs::remove_dir_all(&test_dir).ok();
    fs::create_dir(&test_dir).expect("failed to create test directory");

    let config_contents = String::new()
        + "[adjust]\n"
        + "weights = [ 0.65, 0.35,]\n"
        + "\n"
        + "[generate]\n"
        + "n_obs = 10\n"
        + "n_labels = [ 1,]\n"
        + "prob_missing = 0.0\n"
        + "std_dev_noise = 1.0\n";

    fs::write(test_dir.join("config.toml"), config_contents).expect("failed to write config file");

    let output = Command::new(env!("CARGO_BIN_EXE_grpadj"))
        .args(["--work-dir", test_dir.to_str().expect("invalid path"), "generate"])
        .output()
        .expect("failed to execute command");

    assert!(!output.status.success());

    fs::remove_dir_all(&test_dir).ok();
}
