//! Partition selection and encoded training streams

use super::batch::Batches;
use super::vocab::Vocabularies;
use super::window::slice_corpora;
use super::DatasetResult;
use crate::table::Row;

/// Rows of one partition, sorted by `(corpus, measure, node_id)`
///
/// Placeholder rows of absent measures are dropped here, so an absent
/// measure contributes nothing to the sequences of that partition.
pub fn select_partition(rows: &[Row], partition: &str) -> Vec<Row> {
    let mut selected: Vec<Row> = rows.iter().filter(|r| r.partition == partition).cloned().collect();

    let before = selected.len();
    selected.retain(|r| !r.is_placeholder());
    if selected.len() < before {
        log::info!("Dropped {} placeholder rows from partition {}", before - selected.len(), partition);
    }

    selected.sort_by(|a, b| {
        a.corpus
            .cmp(&b.corpus)
            .then(a.measure.cmp(&b.measure))
            .then(a.node_id.cmp(&b.node_id))
    });
    selected
}

/// Encoded windows of one partition, one id sequence per window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainingSet {
    pub pitch_ids: Vec<Vec<u32>>,
    pub duration_ids: Vec<Vec<u32>>,
}

impl TrainingSet {
    /// Select, window and encode; both streams stay positionally aligned
    pub fn prepare(rows: &[Row], partition: &str, seq_length: usize, vocabs: &Vocabularies) -> Self {
        let selected = select_partition(rows, partition);
        let windows = slice_corpora(&selected, seq_length);
        log::info!(
            "Partition {}: {} rows, {} windows of length {}",
            partition,
            selected.len(),
            windows.len(),
            seq_length
        );

        Self {
            pitch_ids: windows.pitches.iter().map(|w| vocabs.pitch.encode(w)).collect(),
            duration_ids: windows.durations.iter().map(|w| vocabs.duration.encode(w)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pitch_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitch_ids.is_empty()
    }

    pub fn pitch_batches(&self, batch_size: usize) -> DatasetResult<Batches<'_>> {
        Batches::new(&self.pitch_ids, batch_size)
    }

    pub fn duration_batches(&self, batch_size: usize) -> DatasetResult<Batches<'_>> {
        Batches::new(&self.duration_ids, batch_size)
    }
}
