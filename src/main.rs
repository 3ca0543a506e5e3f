// scoreseq CLI entry point.
//
// Usage:
//   scoreseq extract    [--config FILE] [--raw-dir DIR] [--composer NAME] [--suffix EXT] [--intermediate-dir DIR]
//   scoreseq preprocess [--config FILE] [--intermediate-dir DIR] [--output FILE]
//   scoreseq prepare    [--config FILE] [--output FILE] [--partition NAME] [--seq-length N]
//                       [--batch-size N] [--vocab-dir DIR]
//
// Log verbosity follows RUST_LOG (default: info).

use anyhow::{bail, Context, Result};
use scoreseq::config::PipelineConfig;
use scoreseq::pipeline::{self, StageReport};
use scoreseq::table::{write_rows, CorpusFilter};
use scoreseq::training::Vocabularies;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const USAGE: &str = "usage: scoreseq <extract|preprocess|prepare> [--config FILE] [options]";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1).filter(|s| !s.starts_with("--")) else {
        bail!(USAGE);
    };
    let config = load_config(&args)?;

    match command.as_str() {
        "extract" => run_extract(&config),
        "preprocess" => run_preprocess(&config),
        "prepare" => run_prepare(&config, parse_flag(&args, "--vocab-dir")?),
        other => bail!("unknown command {:?}\n{}", other, USAGE),
    }
}

/// Config file (or defaults) with command line flags applied on top
fn load_config(args: &[String]) -> Result<PipelineConfig> {
    let mut config = match parse_flag::<PathBuf>(args, "--config")? {
        Some(path) => PipelineConfig::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(v) = parse_flag(args, "--raw-dir")? {
        config.raw_dir = v;
    }
    if let Some(v) = parse_flag(args, "--composer")? {
        config.composer = v;
    }
    if let Some(v) = parse_flag(args, "--suffix")? {
        config.suffix = v;
    }
    if let Some(v) = parse_flag(args, "--intermediate-dir")? {
        config.intermediate_dir = v;
    }
    if let Some(v) = parse_flag(args, "--output")? {
        config.output_path = v;
    }
    if let Some(v) = parse_flag(args, "--partition")? {
        config.partition = v;
    }
    if let Some(v) = parse_flag(args, "--seq-length")? {
        config.seq_length = v;
    }
    if let Some(v) = parse_flag(args, "--batch-size")? {
        config.batch_size = v;
    }

    config.validate()?;
    Ok(config)
}

fn parse_flag<T: FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    let Some(i) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    let value = args.get(i + 1).with_context(|| format!("{} needs a value", flag))?;
    match value.parse() {
        Ok(v) => Ok(Some(v)),
        Err(_) => bail!("invalid value for {}: {:?}", flag, value),
    }
}

fn run_extract(config: &PipelineConfig) -> Result<()> {
    let report = pipeline::extract_corpus(&config.raw_dir, &config.composer, &config.suffix, &config.intermediate_dir)
        .context("extracting corpus")?;
    print_report("extract", &report);
    Ok(())
}

fn run_preprocess(config: &PipelineConfig) -> Result<()> {
    let filter = CorpusFilter::new(config.denylist.iter().cloned());
    let (rows, report) = pipeline::preprocess(&config.intermediate_dir, &filter).context("preprocessing corpus")?;

    if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    write_rows(&rows, &config.output_path).with_context(|| format!("writing {}", config.output_path.display()))?;

    print_report("preprocess", &report);
    println!("Wrote {} rows to {}", rows.len(), config.output_path.display());
    Ok(())
}

fn run_prepare(config: &PipelineConfig, vocab_dir: Option<PathBuf>) -> Result<()> {
    let vocabs = Vocabularies::default();
    let set = pipeline::prepare(&config.output_path, &config.partition, config.seq_length, &vocabs)
        .with_context(|| format!("preparing {}", config.output_path.display()))?;

    let pitch = set.pitch_batches(config.batch_size)?;
    let duration = set.duration_batches(config.batch_size)?;
    println!("Partition: {}", config.partition);
    println!("Windows: {} of length {}", set.len(), config.seq_length);
    println!(
        "Batches: {} pitch, {} duration, shape ({}, {}), {} windows dropped",
        pitch.batch_count(),
        duration.batch_count(),
        config.batch_size,
        config.seq_length - 1,
        pitch.dropped()
    );
    println!("Vocabulary: {} pitch ids, {} duration ids", vocabs.pitch.id_space(), vocabs.duration.id_space());

    if let Some(dir) = vocab_dir {
        write_vocabularies(&vocabs, &dir)?;
    }
    Ok(())
}

fn write_vocabularies(vocabs: &Vocabularies, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (name, vocab) in [("pitch", &vocabs.pitch), ("duration", &vocabs.duration)] {
        let path = dir.join(format!("{}_vocab.json", name));
        fs::write(&path, vocab.to_json()?).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn print_report(stage: &str, report: &StageReport) {
    println!("{}: {} files processed, {} failed", stage, report.succeeded, report.failures.len());
    for failure in &report.failures {
        println!("  {}: {}", failure.path.display(), failure.error);
    }
}
