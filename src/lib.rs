//! Score-to-sequence preprocessing
//!
//! Reads MusicXML scores, flattens every part into per-measure event lists,
//! normalizes them into one row per pitch and turns a chosen partition into
//! fixed-length id windows for next-token training.
//!
//! - [`score`]: MusicXML reading into a small score model
//! - [`extract`]: event extraction and the wide per-corpus table
//! - [`table`]: literal cells, CSV persistence, normalization and filtering
//! - [`training`]: vocabularies, windows and batches
//! - [`pipeline`]: the extract / preprocess / prepare stages
//! - [`config`]: YAML settings for the stages

pub mod config;
pub mod extract;
pub mod pipeline;
pub mod score;
pub mod table;
pub mod training;

pub use config::{ConfigError, PipelineConfig};
pub use extract::{extract_events, CorpusTable, Event, PartitionEvents, REST_MARKER};
pub use pipeline::{extract_corpus, preprocess, prepare, PipelineError, StageReport};
pub use table::{CorpusFilter, Row, TableError};
pub use training::{generate_windows, Batch, Batches, TrainingSet, Vocabularies, Vocabulary};
