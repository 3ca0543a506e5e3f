//! Score input
//!
//! The hierarchical Score → Part → Measure → Element model, the MusicXML
//! reader that produces it, and composer corpus listing.

pub mod corpus;
pub mod model;
pub mod musicxml;

pub use corpus::{list_corpus, read_score, CorpusFile};
pub use model::{quarter_length_to_f64, Chord, Element, Measure, Note, Part, Pitch, QuarterLength, Rest, Score};
pub use musicxml::parse_musicxml;

use thiserror::Error;

/// Errors raised while reading a score
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Invalid value '{value}' for element '{element}': {reason}")]
    Invalid { element: String, value: String, reason: String },

    #[error("Unsupported MusicXML feature: {0}")]
    Unsupported(String),
}

pub type ScoreResult<T> = std::result::Result<T, ScoreError>;
