//! Flat event table
//!
//! Turns per-corpus wide tables into the long, one-row-per-pitch table the
//! training side reads, and persists both forms as semicolon CSV.
//!
//! # Architecture
//!
//! ```text
//! CorpusTable (partition columns × measures)
//!   ↓ [render cells with literal.rs]
//! intermediate CSV, one file per corpus
//!   ↓ [parse cells, melt, explode: normalize.rs]
//! Vec<Row> with dense node_id
//!   ↓ [denylist + rest fill: filter.rs]
//! final CSV
//! ```

pub mod csv_io;
pub mod filter;
pub mod literal;
pub mod normalize;

pub use csv_io::{read_corpus_table, read_rows, write_corpus_table, write_rows};
pub use filter::{CorpusFilter, DEFAULT_DENYLIST};
pub use literal::{parse_events, render_events, LiteralError};
pub use normalize::{normalize, normalize_corpus};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Duration written for the placeholder row of an absent measure
pub const MISSING_DURATION: &str = "nan";

/// One row of the flat event table; a chord contributes one row per pitch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub corpus: String,
    pub measure: u32,
    pub composer: String,
    pub partition: String,
    /// Literal of the source event, kept for inspection
    pub notes: String,
    pub node_id: u64,
    pub pitch: Option<String>,
    pub duration: String,
}

impl Row {
    /// True for the stand-in row of a measure with no events
    pub fn is_placeholder(&self) -> bool {
        self.duration == MISSING_DURATION
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("inconsistent {column} in {corpus}: '{found}' (expected '{expected}')")]
    Inconsistent {
        corpus: String,
        column: &'static str,
        expected: String,
        found: String,
    },

    #[error("bad cell for partition '{partition}', measure {measure}: {source}")]
    Cell {
        partition: String,
        measure: u32,
        #[source]
        source: LiteralError,
    },

    #[error("invalid measure index '{0}'")]
    InvalidMeasure(String),
}

pub type TableResult<T> = std::result::Result<T, TableError>;
