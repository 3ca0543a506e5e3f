//! Pipeline configuration

use crate::table::DEFAULT_DENYLIST;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("seq_length must be at least 2, got {0}")]
    SeqLength(usize),

    #[error("batch_size must be at least 1")]
    BatchSize,
}

/// Settings shared by the extract, preprocess and prepare stages
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Root holding one directory of score files per composer
    pub raw_dir: PathBuf,

    /// Where per-corpus intermediate CSV files are written and read
    pub intermediate_dir: PathBuf,

    /// Final flat table
    pub output_path: PathBuf,

    pub composer: String,

    /// Extension of score files to pick up
    pub suffix: String,

    /// Corpus ids dropped during preprocessing
    pub denylist: Vec<String>,

    /// Partition (voice) sequences are built from
    pub partition: String,

    pub seq_length: usize,

    pub batch_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/00_raw"),
            intermediate_dir: PathBuf::from("data/00_raw/bach"),
            output_path: PathBuf::from("data/01_preprocessed/bach.csv"),
            composer: "bach".to_string(),
            suffix: "musicxml".to_string(),
            denylist: DEFAULT_DENYLIST.iter().map(|s| s.to_string()).collect(),
            partition: "tenor".to_string(),
            seq_length: 50,
            batch_size: 64,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seq_length < 2 {
            return Err(ConfigError::SeqLength(self.seq_length));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::BatchSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(PipelineConfig::from_yaml("").unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = PipelineConfig::from_yaml("partition: bass\nseq_length: 16\n").unwrap();
        assert_eq!(config.partition, "bass");
        assert_eq!(config.seq_length, 16);
        assert_eq!(config.batch_size, 64);
        assert_eq!(config.denylist, vec!["bwv248.9-1", "bwv846", "bwv248.23-2"]);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(PipelineConfig::from_yaml("seq_length: 1"), Err(ConfigError::SeqLength(1))));
        assert!(matches!(PipelineConfig::from_yaml("batch_size: 0"), Err(ConfigError::BatchSize)));
        assert!(matches!(PipelineConfig::from_yaml("seq_length: [1]"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.yaml");
        fs::write(&path, "composer: palestrina\ndenylist: []\n").unwrap();

        let config = PipelineConfig::load(&path).unwrap();
        assert_eq!(config.composer, "palestrina");
        assert!(config.denylist.is_empty());
        assert!(matches!(PipelineConfig::load(&dir.path().join("missing.yaml")), Err(ConfigError::Io { .. })));
    }
}
