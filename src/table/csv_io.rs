//! Semicolon CSV persistence
//!
//! Intermediate files: one per corpus, columns `{partitions..., measure,
//! composer, corpus}`, one record per measure, partition cells holding
//! literal event lists. Final file: one record per `Row`.

use super::literal::{parse_events, render_events};
use super::{Row, TableError, TableResult};
use crate::extract::{CorpusTable, PartitionEvents, STATIC_COLUMNS};
use std::fs;
use std::path::{Path, PathBuf};

const DELIMITER: u8 = b';';

pub fn write_corpus_table(table: &CorpusTable, path: &Path) -> TableResult<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(DELIMITER).from_path(path)?;

    let mut header: Vec<&str> = table.partition_names().collect();
    header.extend(STATIC_COLUMNS);
    writer.write_record(&header)?;

    for measure in 0..table.measure_count() {
        let mut record: Vec<String> = (0..table.partitions.len())
            .map(|p| render_events(table.cell(p, measure)))
            .collect();
        record.push(measure.to_string());
        record.push(table.composer.clone());
        record.push(table.corpus.clone());
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|source| TableError::Io { path: path.display().to_string(), source })?;
    Ok(())
}

pub fn read_corpus_table(path: &Path) -> TableResult<CorpusTable> {
    let mut reader = csv::ReaderBuilder::new().delimiter(DELIMITER).from_path(path)?;
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| {
        headers.iter().position(|h| h == name).ok_or(TableError::MissingColumn(name))
    };
    let measure_col = column("measure")?;
    let composer_col = column("composer")?;
    let corpus_col = column("corpus")?;

    let partition_cols: Vec<(usize, &str)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !STATIC_COLUMNS.contains(h))
        .collect();
    let mut partitions: Vec<PartitionEvents> = partition_cols
        .iter()
        .map(|(_, name)| PartitionEvents { name: name.to_string(), measures: Vec::new() })
        .collect();

    let mut composer: Option<String> = None;
    let mut corpus: Option<String> = None;

    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let measure_text = field(measure_col);
        match measure_text.trim().parse::<usize>() {
            Ok(m) if m == index => {}
            _ => return Err(TableError::InvalidMeasure(measure_text.to_string())),
        }

        let record_corpus = field(corpus_col).to_string();
        check_consistent(&mut corpus, record_corpus.clone(), "corpus", &record_corpus)?;
        check_consistent(&mut composer, field(composer_col).to_string(), "composer", &record_corpus)?;

        for (partition, (col, name)) in partitions.iter_mut().zip(&partition_cols) {
            let events = parse_events(field(*col)).map_err(|source| TableError::Cell {
                partition: name.to_string(),
                measure: index as u32,
                source,
            })?;
            partition.measures.push(events);
        }
    }

    Ok(CorpusTable::new(composer.unwrap_or_default(), corpus.unwrap_or_default(), partitions))
}

fn check_consistent(
    slot: &mut Option<String>,
    found: String,
    column: &'static str,
    corpus: &str,
) -> TableResult<()> {
    match slot {
        Some(expected) if *expected != found => Err(TableError::Inconsistent {
            corpus: corpus.to_string(),
            column,
            expected: expected.clone(),
            found,
        }),
        Some(_) => Ok(()),
        None => {
            *slot = Some(found);
            Ok(())
        }
    }
}

pub fn write_rows(rows: &[Row], path: &Path) -> TableResult<()> {
    let mut writer = csv::WriterBuilder::new().delimiter(DELIMITER).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| TableError::Io { path: path.display().to_string(), source })?;
    Ok(())
}

pub fn read_rows(path: &Path) -> TableResult<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new().delimiter(DELIMITER).from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<Row>, _>>()?;
    Ok(rows)
}

/// `.csv` files directly inside `dir`, sorted by name
pub fn list_csv_files(dir: &Path) -> TableResult<Vec<PathBuf>> {
    let io_err = |source| TableError::Io { path: dir.display().to_string(), source };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "csv") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
