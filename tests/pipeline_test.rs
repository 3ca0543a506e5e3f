// Extract → preprocess → prepare on small inline MusicXML corpora

use scoreseq::pipeline::{extract_corpus, prepare, preprocess};
use scoreseq::table::{read_rows, write_rows, CorpusFilter};
use scoreseq::training::Vocabularies;
use std::fs;
use std::path::Path;

fn score(parts: &[(&str, &str)]) -> String {
    let mut part_list = String::new();
    let mut body = String::new();
    for (i, (name, measures)) in parts.iter().enumerate() {
        part_list.push_str(&format!(
            r#"<score-part id="P{0}"><part-name>{1}</part-name></score-part>"#,
            i + 1,
            name
        ));
        body.push_str(&format!(r#"<part id="P{}">{}</part>"#, i + 1, measures));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 3.1 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">
<score-partwise version="3.1"><part-list>{}</part-list>{}</score-partwise>"#,
        part_list, body
    )
}

const TENOR_RESTS: &str = r#"
<measure number="1"><attributes><divisions>2</divisions></attributes><note><rest/><duration>2</duration></note></measure>
<measure number="2"><note><rest/><duration>2</duration></note></measure>
<measure number="3"><note><rest/><duration>4</duration></note></measure>"#;

const BASS_SHORT: &str = r#"
<measure number="1"><attributes><divisions>1</divisions></attributes>
  <note><pitch><step>C</step><octave>3</octave></pitch><duration>1</duration></note>
</measure>
<measure number="2">
  <note><pitch><step>C</step><octave>3</octave></pitch><duration>2</duration></note>
  <note><chord/><pitch><step>G</step><octave>3</octave></pitch><duration>2</duration></note>
</measure>"#;

fn write_corpus(root: &Path) {
    let dir = root.join("bach");
    fs::create_dir_all(&dir).unwrap();
    let chorale = score(&[("Tenor", TENOR_RESTS), ("Bass", BASS_SHORT)]);
    fs::write(dir.join("bwv1.musicxml"), &chorale).unwrap();
    fs::write(dir.join("bwv846.musicxml"), &chorale).unwrap();
    fs::write(dir.join("broken.musicxml"), "<score-partwise><part").unwrap();
    fs::write(dir.join("notes.txt"), "not a score").unwrap();
}

#[test]
fn test_extract_writes_one_file_per_corpus_and_skips_failures() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("intermediate");
    write_corpus(&raw);

    let report = extract_corpus(&raw, "bach", "musicxml", &out).unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("broken.musicxml"));

    assert!(out.join("bach_bwv1.csv").is_file());
    assert!(out.join("bach_bwv846.csv").is_file());

    let text = fs::read_to_string(out.join("bach_bwv1.csv")).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "tenor;bass;measure;composer;corpus",
            "[('P', 1.0)];[['C3', 1.0]];0;bach;bwv1",
            "[('P', 1.0)];[(['C3', 'G3'], 2.0)];1;bach;bwv1",
            "[('P', 2.0)];[];2;bach;bwv1",
        ]
    );
}

#[test]
fn test_missing_composer_directory_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(extract_corpus(tmp.path(), "bach", "musicxml", &tmp.path().join("out")).is_err());
}

#[test]
fn test_preprocess_normalizes_and_filters() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("intermediate");
    write_corpus(&raw);
    extract_corpus(&raw, "bach", "musicxml", &out).unwrap();

    let (rows, report) = preprocess(&out, &CorpusFilter::default()).unwrap();
    assert_eq!(report.succeeded, 2);
    assert!(report.failures.is_empty());

    assert!(rows.iter().all(|r| r.corpus == "bwv1"));
    let summary: Vec<(&str, u32, u64, &str, &str)> = rows
        .iter()
        .map(|r| (r.partition.as_str(), r.measure, r.node_id, r.pitch.as_deref().unwrap(), r.duration.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("tenor", 0, 0, "P", "1.0000"),
            ("tenor", 1, 1, "P", "1.0000"),
            ("tenor", 2, 2, "P", "2.0000"),
            ("bass", 0, 3, "C3", "1.0000"),
            ("bass", 1, 4, "C3", "2.0000"),
            ("bass", 1, 5, "G3", "2.0000"),
            ("bass", 2, 6, "P", "nan"),
        ]
    );
    assert_eq!(rows[4].notes, "(['C3', 'G3'], 2.0)");
    assert_eq!(rows[6].notes, "[None, None]");
}

#[test]
fn test_preprocess_keeps_denylisted_corpora_with_empty_denylist() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("intermediate");
    write_corpus(&raw);
    extract_corpus(&raw, "bach", "musicxml", &out).unwrap();

    let (rows, _) = preprocess(&out, &CorpusFilter::new(Vec::new())).unwrap();
    assert_eq!(rows.len(), 14);
    assert_eq!(rows.last().map(|r| r.node_id), Some(13));
    assert_eq!(rows[7].corpus, "bwv846");
}

#[test]
fn test_preprocess_skips_unreadable_intermediate_files() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("bach_good.csv"), "tenor;measure;composer;corpus\n[['D4', 0.5]];0;bach;good\n").unwrap();
    fs::write(tmp.path().join("bach_bad.csv"), "tenor;measure;composer;corpus\n[['D4', 0.5];0;bach;bad\n").unwrap();

    let (rows, report) = preprocess(tmp.path(), &CorpusFilter::default()).unwrap();
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].path.ends_with("bach_bad.csv"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].pitch.as_deref(), Some("D4"));
    assert_eq!(rows[0].duration, "0.5000");
}

#[test]
fn test_rest_only_partition_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("intermediate");
    let table = tmp.path().join("bach.csv");
    write_corpus(&raw);

    extract_corpus(&raw, "bach", "musicxml", &out).unwrap();
    let (rows, _) = preprocess(&out, &CorpusFilter::default()).unwrap();
    write_rows(&rows, &table).unwrap();
    assert_eq!(read_rows(&table).unwrap(), rows);

    let vocabs = Vocabularies::default();
    let set = prepare(&table, "tenor", 2, &vocabs).unwrap();
    let rest = vocabs.pitch.id_of("P");
    let one = vocabs.duration.id_of("1.0000");
    let two = vocabs.duration.id_of("2.0000");

    assert_eq!(set.len(), 2);
    assert_eq!(set.pitch_ids, vec![vec![rest, rest], vec![rest, rest]]);
    assert_eq!(set.duration_ids, vec![vec![one, one], vec![one, two]]);

    let batches: Vec<_> = set.duration_batches(1).unwrap().collect();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[1].input.shape(), &[1, 1]);
    assert_eq!(batches[1].input[[0, 0]], one);
    assert_eq!(batches[1].target[[0, 0]], two);
}

#[test]
fn test_absent_measures_contribute_no_training_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("intermediate");
    let table = tmp.path().join("bach.csv");
    write_corpus(&raw);

    extract_corpus(&raw, "bach", "musicxml", &out).unwrap();
    let (rows, _) = preprocess(&out, &CorpusFilter::default()).unwrap();
    write_rows(&rows, &table).unwrap();

    let vocabs = Vocabularies::default();
    // C3, C3, G3 survive; the padded third measure does not
    let set = prepare(&table, "bass", 3, &vocabs).unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(vocabs.pitch.decode(&set.pitch_ids[0]), vec!["C3", "C3", "G3"]);
    assert_eq!(vocabs.duration.decode(&set.duration_ids[0]), vec!["1.0000", "2.0000", "2.0000"]);
}

#[test]
fn test_part_named_like_a_fixed_column_survives_preprocess() {
    let tmp = tempfile::tempdir().unwrap();
    let raw = tmp.path().join("raw");
    let out = tmp.path().join("intermediate");
    let dir = raw.join("bach");
    fs::create_dir_all(&dir).unwrap();
    let melody = r#"<measure number="1"><attributes><divisions>1</divisions></attributes>
  <note><pitch><step>C</step><octave>4</octave></pitch><duration>1</duration></note>
</measure>"#;
    fs::write(dir.join("bwv2.musicxml"), score(&[("Measure", melody)])).unwrap();

    let report = extract_corpus(&raw, "bach", "musicxml", &out).unwrap();
    assert_eq!(report.succeeded, 1);
    let text = fs::read_to_string(out.join("bach_bwv2.csv")).unwrap();
    assert!(text.starts_with("measure_;measure;composer;corpus\n"));

    let (rows, report) = preprocess(&out, &CorpusFilter::default()).unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].partition, "measure_");
    assert_eq!(rows[0].pitch.as_deref(), Some("C4"));
}
