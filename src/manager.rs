use crate::adjust::{AdjustOptions, group_adjust_with};
use crate::config::Config;
use crate::generate::generate_batch;
use crate::model::{AdjustedBatch, Batch};
use crate::stats::{Accumulator, AccumulatorReport};
use anyhow::{Context, Result};
use glob::glob;
use rmp_serde::{decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    time::Instant,
};

/// Summary of one adjusted batch.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchReport {
    pub batch_idx: usize,
    pub summary: AccumulatorReport,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
    pub batches: Vec<BatchReport>,
}

/// Work directory manager.
///
/// The work directory holds `config.toml`, the input batches
/// (`batch-NNNN.msgpack`), their adjusted counterparts
/// (`adjusted-NNNN.msgpack`) and the summary report (`report.toml`).
pub struct Manager {
    work_dir: PathBuf,
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(work_dir: P) -> Result<Self> {
        let work_dir = work_dir.as_ref().to_path_buf();

        let cfg =
            Config::from_file(work_dir.join("config.toml")).context("failed to construct cfg")?;
        log::info!("{cfg:#?}");

        Ok(Self { work_dir, cfg })
    }

    pub fn generate_batch(&self) -> Result<()> {
        let batch_idx = self
            .count_files("batch-*.msgpack")
            .context("failed to count batch files")?;

        let batch = generate_batch(&self.cfg.generate).context("failed to generate batch")?;

        let batch_file = self.batch_file(batch_idx);
        save_msgpack(&batch_file, &batch)?;
        log::info!("created {batch_file:?}");

        Ok(())
    }

    pub fn adjust_batches(&self) -> Result<()> {
        let opts = AdjustOptions {
            parallel: self.cfg.adjust.parallel,
            chunk_size: self.cfg.adjust.chunk_size,
        };
        let weights = &self.cfg.adjust.weights;

        let n_batches = self
            .count_files("batch-*.msgpack")
            .context("failed to count batch files")?;
        for batch_idx in 0..n_batches {
            let batch_file = self.batch_file(batch_idx);
            let batch: Batch = load_msgpack(&batch_file)?;
            log::info!("loaded {batch_file:?}");

            let start = Instant::now();
            let vals = group_adjust_with(&batch.vals, &batch.groups, weights, &opts)
                .with_context(|| format!("failed to adjust {batch_file:?}"))?;
            let elapsed = start.elapsed().as_secs_f64();
            log::info!("adjusted {} values in {elapsed:.6} s", vals.len());

            let adjusted = AdjustedBatch {
                vals,
                weights: weights.clone(),
            };
            let adjusted_file = self.adjusted_file(batch_idx);
            save_msgpack(&adjusted_file, &adjusted)?;
            log::info!("created {adjusted_file:?}");
        }

        Ok(())
    }

    pub fn report_batches(&self) -> Result<()> {
        let n_adjusted = self
            .count_files("adjusted-*.msgpack")
            .context("failed to count adjusted files")?;

        let mut batches = Vec::with_capacity(n_adjusted);
        for batch_idx in 0..n_adjusted {
            let adjusted: AdjustedBatch = load_msgpack(self.adjusted_file(batch_idx))?;

            let mut acc = Accumulator::new();
            adjusted.vals.iter().for_each(|&val| acc.add(val));
            batches.push(BatchReport {
                batch_idx,
                summary: acc.report(),
            });
        }

        let report = Report { batches };
        let contents = toml::to_string(&report).context("failed to serialize report")?;

        let report_file = self.report_file();
        let file = File::create(&report_file)
            .with_context(|| format!("failed to create {report_file:?}"))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .context("failed to write report")?;
        writer.flush().context("failed to flush writer stream")?;
        log::info!("created {report_file:?}");

        Ok(())
    }

    pub fn clean(&self) -> Result<()> {
        let pattern = self.work_dir.join("adjusted-*.msgpack");
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        for file in glob(pattern)
            .context("failed to glob adjusted files")?
            .filter_map(Result::ok)
        {
            fs::remove_file(&file).with_context(|| format!("failed to remove {file:?}"))?;
            log::info!("removed {file:?}");
        }

        let report_file = self.report_file();
        if report_file.exists() {
            fs::remove_file(&report_file)
                .with_context(|| format!("failed to remove {report_file:?}"))?;
            log::info!("removed {report_file:?}");
        }

        Ok(())
    }

    fn count_files(&self, pattern: &str) -> Result<usize> {
        let pattern = self.work_dir.join(pattern);
        let pattern = pattern.to_str().context("pattern is not valid UTF-8")?;
        let count = glob(pattern)
            .context("failed to glob files")?
            .filter_map(Result::ok)
            .count();
        Ok(count)
    }

    fn batch_file(&self, batch_idx: usize) -> PathBuf {
        self.work_dir.join(format!("batch-{batch_idx:04}.msgpack"))
    }

    fn adjusted_file(&self, batch_idx: usize) -> PathBuf {
        self.work_dir.join(format!("adjusted-{batch_idx:04}.msgpack"))
    }

    fn report_file(&self) -> PathBuf {
        self.work_dir.join("report.toml")
    }
}

fn save_msgpack<P: AsRef<Path>, T: Serialize>(file: P, val: &T) -> Result<()> {
    let file = file.as_ref();
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    let mut writer = BufWriter::new(file);
    encode::write(&mut writer, val).context("failed to serialize value")?;
    writer.flush().context("failed to flush writer stream")?;
    Ok(())
}

fn load_msgpack<P: AsRef<Path>, T: DeserializeOwned>(file: P) -> Result<T> {
    let file = file.as_ref();
    let file = File::open(file).with_context(|| format!("failed to open {file:?}"))?;
    let mut reader = BufReader::new(file);
    let val = decode::from_read(&mut reader).context("failed to deserialize value")?;
    Ok(val)
}
