//! Training sequences
//!
//! Windowing, vocabulary encoding and batching of the flat event table into
//! `(input, target)` id arrays, one stream for pitches and one for durations.

pub mod batch;
pub mod dataset;
pub mod pitch;
pub mod vocab;
pub mod window;

pub use batch::{split_input_target, Batch, Batches};
pub use dataset::{select_partition, TrainingSet};
pub use pitch::{pitch_frequency, pitch_to_midi};
pub use vocab::{Vocabularies, Vocabulary, FIRST_TOKEN_ID, MASK_ID, OOV_ID, OOV_TOKEN};
pub use window::{generate_windows, group_by_corpus, slice_corpora, Windows};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("sequences must have at least 2 ids, got {0}")]
    SequenceTooShort(usize),

    #[error("all sequences must have the same length: expected {expected}, found {found}")]
    RaggedSequences { expected: usize, found: usize },
}

pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
