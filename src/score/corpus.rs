//! Composer corpus listing

use super::{parse_musicxml, Score, ScoreError, ScoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// One score file of a composer's corpus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFile {
    pub composer: String,
    /// File stem, e.g. `bwv248.9-1`
    pub corpus: String,
    pub path: PathBuf,
}

/// List the files under `<root>/<composer>/` whose extension is `suffix`
///
/// The suffix may be given with or without its leading dot. Files are
/// returned sorted by name so runs are reproducible.
pub fn list_corpus(root: &Path, composer: &str, suffix: &str) -> ScoreResult<Vec<CorpusFile>> {
    let dir = root.join(composer);
    let suffix = suffix.trim_start_matches('.');

    let entries = fs::read_dir(&dir).map_err(|source| ScoreError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| ScoreError::Io { path: dir.display().to_string(), source })?
            .path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(suffix) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        files.push(CorpusFile {
            composer: composer.to_string(),
            corpus: stem.to_string(),
            path,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Read and parse one score file
pub fn read_score(path: &Path) -> ScoreResult<Score> {
    let xml = fs::read_to_string(path).map_err(|source| ScoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_musicxml(&xml)
}
