//! Pipeline stages
//!
//! ```text
//! score files ──extract──▶ intermediate CSV per corpus
//!             ──preprocess──▶ final flat table
//!             ──prepare──▶ pitch / duration training streams
//! ```
//!
//! A file that fails in `extract` or `preprocess` is reported and skipped as
//! a whole; the other files are still processed.

use crate::extract::CorpusTable;
use crate::score::{list_corpus, read_score, CorpusFile, ScoreError};
use crate::table::csv_io::list_csv_files;
use crate::table::{normalize, read_corpus_table, read_rows, write_corpus_table, CorpusFilter, Row, TableError};
use crate::training::{DatasetError, TrainingSet, Vocabularies};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Score(#[from] ScoreError),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("cannot create {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

/// A file skipped by a stage and why
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a stage over many files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageReport {
    pub succeeded: usize,
    pub failures: Vec<Failure>,
}

impl StageReport {
    fn record<T>(&mut self, path: &Path, result: PipelineResult<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.succeeded += 1;
                Some(value)
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                self.failures.push(Failure { path: path.to_path_buf(), error: e.to_string() });
                None
            }
        }
    }
}

/// Extract every score of `<raw_dir>/<composer>/*.<suffix>` into `<out_dir>/<composer>_<corpus>.csv`
pub fn extract_corpus(raw_dir: &Path, composer: &str, suffix: &str, out_dir: &Path) -> PipelineResult<StageReport> {
    let files = list_corpus(raw_dir, composer, suffix)?;
    fs::create_dir_all(out_dir).map_err(|source| PipelineError::CreateDir {
        path: out_dir.display().to_string(),
        source,
    })?;
    log::info!("Extracting {} {} scores from {}", files.len(), composer, raw_dir.display());

    let mut report = StageReport::default();
    for (i, file) in files.iter().enumerate() {
        log::debug!("[{}/{}] {}", i + 1, files.len(), file.corpus);
        report.record(&file.path, extract_file(file, out_dir));
    }

    log::info!("Extracted {} scores, {} failed", report.succeeded, report.failures.len());
    Ok(report)
}

/// Extract one score into its intermediate CSV and return the written path
pub fn extract_file(file: &CorpusFile, out_dir: &Path) -> PipelineResult<PathBuf> {
    let score = read_score(&file.path)?;
    let table = CorpusTable::from_score(&score, &file.composer, &file.corpus);
    let path = out_dir.join(format!("{}_{}.csv", file.composer, file.corpus));
    write_corpus_table(&table, &path)?;
    Ok(path)
}

/// Normalize every intermediate CSV under `dir` into one filtered table
pub fn preprocess(dir: &Path, filter: &CorpusFilter) -> PipelineResult<(Vec<Row>, StageReport)> {
    let files = list_csv_files(dir)?;
    log::info!("Preprocessing {} corpus files from {}", files.len(), dir.display());

    let mut report = StageReport::default();
    let tables: Vec<CorpusTable> = files
        .iter()
        .filter_map(|path| report.record(path, read_corpus_table(path).map_err(PipelineError::from)))
        .collect();

    let rows = filter.apply(normalize(&tables));
    log::info!("Preprocessed {} corpora into {} rows", tables.len(), rows.len());
    Ok((rows, report))
}

/// Load the final table and build the training streams for one partition
pub fn prepare(table_path: &Path, partition: &str, seq_length: usize, vocabs: &Vocabularies) -> PipelineResult<TrainingSet> {
    let rows = read_rows(table_path)?;
    log::info!("Loaded {} rows from {}", rows.len(), table_path.display());
    Ok(TrainingSet::prepare(&rows, partition, seq_length, vocabs))
}
