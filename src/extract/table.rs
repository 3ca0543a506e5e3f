//! Wide per-corpus table: one row per measure, one column per partition

use super::{extract_events, unique_name, Event, PartitionEvents};
use crate::score::Score;
use once_cell::sync::Lazy;
use regex::Regex;

static NON_LOWERCASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z]").expect("static regex"));

/// Columns every intermediate file carries after the partition columns
pub const STATIC_COLUMNS: [&str; 3] = ["measure", "composer", "corpus"];

/// Lower-case a part name and replace everything outside `a-z` with `_`
pub fn simplify_column_name(name: &str) -> String {
    NON_LOWERCASE.replace_all(&name.to_lowercase(), "_").into_owned()
}

/// Extracted events of one score file, ready to persist as the intermediate CSV
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusTable {
    pub composer: String,
    pub corpus: String,
    pub partitions: Vec<PartitionEvents>,
}

impl CorpusTable {
    pub fn new(composer: impl Into<String>, corpus: impl Into<String>, partitions: Vec<PartitionEvents>) -> Self {
        let mut table = Self {
            composer: composer.into(),
            corpus: corpus.into(),
            partitions,
        };
        table.pad_measures();
        table
    }

    /// Extract a score into column form with simplified, unique partition names
    ///
    /// Names never collide with `STATIC_COLUMNS`; a part called "Measure"
    /// becomes `measure_`.
    pub fn from_score(score: &Score, composer: &str, corpus: &str) -> Self {
        let mut partitions: Vec<PartitionEvents> = Vec::new();
        for mut partition in extract_events(score) {
            let simplified = simplify_column_name(&partition.name);
            let taken = STATIC_COLUMNS.into_iter().chain(partitions.iter().map(|p| p.name.as_str()));
            partition.name = unique_name(&simplified, taken);
            partitions.push(partition);
        }
        Self::new(composer, corpus, partitions)
    }

    pub fn measure_count(&self) -> usize {
        self.partitions.iter().map(|p| p.measures.len()).max().unwrap_or(0)
    }

    pub fn partition_names(&self) -> impl Iterator<Item = &str> {
        self.partitions.iter().map(|p| p.name.as_str())
    }

    /// Events of one partition in one measure; empty when the measure is absent
    pub fn cell(&self, partition: usize, measure: usize) -> &[Event] {
        self.partitions
            .get(partition)
            .and_then(|p| p.measures.get(measure))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parts shorter than the longest one get trailing empty measures
    fn pad_measures(&mut self) {
        let count = self.measure_count();
        for partition in &mut self.partitions {
            if partition.measures.len() < count {
                log::debug!(
                    "Padding partition {} of {} from {} to {} measures",
                    partition.name,
                    self.corpus,
                    partition.measures.len(),
                    count
                );
                partition.measures.resize_with(count, Vec::new);
            }
        }
    }
}
