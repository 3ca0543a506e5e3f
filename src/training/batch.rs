//! Next-token input/target pairs grouped into fixed-size batches

use super::{DatasetError, DatasetResult};
use ndarray::Array2;

/// `(sequence[..len-1], sequence[1..])`
pub fn split_input_target(sequence: &[u32]) -> (&[u32], &[u32]) {
    match sequence.len() {
        0 => (sequence, sequence),
        n => (&sequence[..n - 1], &sequence[1..]),
    }
}

/// One training batch, both arrays shaped `(batch_size, sequence_length - 1)`
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub input: Array2<u32>,
    pub target: Array2<u32>,
}

/// Iterator over full batches; a trailing partial batch is never yielded
#[derive(Debug, Clone)]
pub struct Batches<'a> {
    sequences: &'a [Vec<u32>],
    batch_size: usize,
    width: usize,
    next: usize,
}

impl<'a> Batches<'a> {
    /// All sequences must share one length of at least 2
    pub fn new(sequences: &'a [Vec<u32>], batch_size: usize) -> DatasetResult<Self> {
        if batch_size == 0 {
            return Err(DatasetError::InvalidBatchSize);
        }
        let length = sequences.first().map(Vec::len).unwrap_or(2);
        if length < 2 {
            return Err(DatasetError::SequenceTooShort(length));
        }
        if let Some(bad) = sequences.iter().find(|s| s.len() != length) {
            return Err(DatasetError::RaggedSequences { expected: length, found: bad.len() });
        }

        Ok(Self { sequences, batch_size, width: length - 1, next: 0 })
    }

    /// `floor(sequences / batch_size)`
    pub fn batch_count(&self) -> usize {
        self.sequences.len() / self.batch_size
    }

    /// Sequences left over after the last full batch
    pub fn dropped(&self) -> usize {
        self.sequences.len() % self.batch_size
    }
}

impl Iterator for Batches<'_> {
    type Item = Batch;

    fn next(&mut self) -> Option<Batch> {
        let end = self.next + self.batch_size;
        let chunk = self.sequences.get(self.next..end)?;
        self.next = end;

        let input = Array2::from_shape_fn((self.batch_size, self.width), |(i, j)| split_input_target(&chunk[i]).0[j]);
        let target = Array2::from_shape_fn((self.batch_size, self.width), |(i, j)| split_input_target(&chunk[i]).1[j]);
        Some(Batch { input, target })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.sequences.len() - self.next.min(self.sequences.len())) / self.batch_size;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Batches<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_split_input_target() {
        let (input, target) = split_input_target(&[5, 6, 7, 8]);
        assert_eq!(input, &[5, 6, 7]);
        assert_eq!(target, &[6, 7, 8]);
        for i in 0..input.len() - 1 {
            assert_eq!(target[i], input[i + 1]);
        }
        assert_eq!(split_input_target(&[]), (&[][..], &[][..]));
        assert_eq!(split_input_target(&[1]), (&[][..], &[][..]));
    }

    #[test]
    fn test_batches_drop_trailing_partial() {
        let sequences: Vec<Vec<u32>> = (0..7).map(|i| vec![i, i + 10, i + 20]).collect();
        let batches = Batches::new(&sequences, 3).unwrap();
        assert_eq!(batches.batch_count(), 2);
        assert_eq!(batches.dropped(), 1);
        assert_eq!(batches.len(), 2);

        let collected: Vec<Batch> = batches.collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].input, array![[0, 10], [1, 11], [2, 12]]);
        assert_eq!(collected[0].target, array![[10, 20], [11, 21], [12, 22]]);
        assert_eq!(collected[1].input.row(0).to_vec(), vec![3, 13]);
        assert_eq!(collected[1].input.shape(), &[3, 2]);
    }

    #[test]
    fn test_fewer_sequences_than_batch_size() {
        let sequences = vec![vec![1, 2], vec![3, 4]];
        assert_eq!(Batches::new(&sequences, 3).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_batches() {
        let sequences = vec![vec![1, 2, 3], vec![4, 5]];
        assert!(matches!(Batches::new(&sequences, 1), Err(DatasetError::RaggedSequences { expected: 3, found: 2 })));
        assert!(matches!(Batches::new(&sequences, 0), Err(DatasetError::InvalidBatchSize)));
        assert!(matches!(Batches::new(&[vec![1]], 1), Err(DatasetError::SequenceTooShort(1))));
    }
}
