//! MusicXML reader
//!
//! Builds the lean score model from a `<score-partwise>` document using
//! roxmltree. Only what the event extractor needs is read: part names,
//! divisions, pitches, rests, chords and durations. Every other measure child
//! is kept as an opaque `Element::Other` so the extractor can drop it.

use super::model::{Chord, Element, Measure, Note, Part, Pitch, QuarterLength, Rest, Score};
use super::{ScoreError, ScoreResult};
use num_rational::Ratio;
use roxmltree::{Document, Node};
use std::collections::HashMap;

/// Parse a MusicXML string into a `Score`
///
/// ```
/// let xml = r#"<score-partwise version="3.1">
///   <part-list><score-part id="P1"><part-name>Tenor</part-name></score-part></part-list>
///   <part id="P1"><measure number="1">
///     <attributes><divisions>2</divisions></attributes>
///     <note><pitch><step>C</step><octave>4</octave></pitch><duration>2</duration></note>
///   </measure></part>
/// </score-partwise>"#;
///
/// let score = scoreseq::score::parse_musicxml(xml).unwrap();
/// assert_eq!(score.parts[0].name, "Tenor");
/// ```
pub fn parse_musicxml(xml: &str) -> ScoreResult<Score> {
    let xml = strip_doctype(xml);
    let doc = Document::parse(&xml).map_err(|e| ScoreError::Xml(e.to_string()))?;
    let root = doc.root_element();

    match root.tag_name().name() {
        "score-partwise" => parse_score_partwise(root),
        "score-timewise" => Err(ScoreError::Unsupported(
            "score-timewise format (use score-partwise instead)".to_string(),
        )),
        other => Err(ScoreError::Invalid {
            element: "root".to_string(),
            value: other.to_string(),
            reason: "expected <score-partwise>".to_string(),
        }),
    }
}

/// roxmltree rejects DTDs, and MusicXML files nearly always declare one
fn strip_doctype(xml: &str) -> String {
    let Some(start) = xml.find("<!DOCTYPE") else {
        return xml.to_string();
    };
    let rest = &xml[start..];
    let end = match (rest.find('['), rest.find('>')) {
        (Some(open), Some(close)) if open < close => rest.find("]>").map(|i| i + 2),
        (_, Some(close)) => Some(close + 1),
        _ => None,
    };
    match end {
        Some(end) => format!("{}{}", &xml[..start], &rest[end..]),
        None => xml.to_string(),
    }
}

fn parse_score_partwise(root: Node) -> ScoreResult<Score> {
    let part_names = root
        .children()
        .find(|n| n.has_tag_name("part-list"))
        .map(|list| parse_part_list(&list))
        .unwrap_or_default();

    let mut parts = Vec::new();
    for (index, part_node) in root.children().filter(|n| n.has_tag_name("part")).enumerate() {
        let name = part_node
            .attribute("id")
            .and_then(|id| part_names.get(id))
            .cloned()
            .unwrap_or_else(|| format!("Part {}", index + 1));
        parts.push(parse_part(&part_node, name)?);
    }

    Ok(Score { parts })
}

fn parse_part_list(part_list: &Node) -> HashMap<String, String> {
    part_list
        .children()
        .filter(|n| n.has_tag_name("score-part"))
        .filter_map(|score_part| {
            let id = score_part.attribute("id")?;
            let name = child_text(score_part, "part-name")?;
            Some((id.to_string(), name.trim().to_string()))
        })
        .collect()
}

fn parse_part(part_node: &Node, name: String) -> ScoreResult<Part> {
    // <divisions> carries over from one measure to the next
    let mut divisions = 1u32;
    let mut measures = Vec::new();

    for measure_node in part_node.children().filter(|n| n.has_tag_name("measure")) {
        measures.push(parse_measure(&measure_node, &mut divisions)?);
    }

    Ok(Part { name, measures })
}

fn parse_measure(measure_node: &Node, divisions: &mut u32) -> ScoreResult<Measure> {
    let mut measure = Measure::default();
    let mut primary_voice: Option<String> = None;

    for child in measure_node.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "attributes" => {
                if let Some(text) = child_text(child, "divisions") {
                    *divisions = parse_divisions(text)?;
                }
                measure.elements.push(Element::Other { kind: "attributes".to_string() });
            }
            "note" => {
                let voice = child_text(child, "voice").unwrap_or("1").trim().to_string();
                let primary = primary_voice.get_or_insert_with(|| voice.clone());
                if *primary != voice {
                    log::debug!("Skipping note in secondary voice {}", voice);
                    continue;
                }
                push_note(&mut measure.elements, &child, *divisions)?;
            }
            other => measure.elements.push(Element::Other { kind: other.to_string() }),
        }
    }

    Ok(measure)
}

fn parse_divisions(text: &str) -> ScoreResult<u32> {
    match text.trim().parse::<u32>() {
        Ok(d) if d > 0 => Ok(d),
        _ => Err(ScoreError::Invalid {
            element: "divisions".to_string(),
            value: text.to_string(),
            reason: "expected positive integer".to_string(),
        }),
    }
}

fn push_note(elements: &mut Vec<Element>, note_node: &Node, divisions: u32) -> ScoreResult<()> {
    let has = |tag: &str| note_node.children().any(|n| n.has_tag_name(tag));

    if has("unpitched") {
        elements.push(Element::Other { kind: "unpitched".to_string() });
        return Ok(());
    }

    let duration = if has("grace") {
        Ratio::from_integer(0)
    } else {
        parse_duration(note_node, divisions)?
    };

    if has("rest") {
        elements.push(Element::Rest(Rest { duration }));
        return Ok(());
    }

    let pitch_node = note_node
        .children()
        .find(|n| n.has_tag_name("pitch"))
        .ok_or_else(|| ScoreError::MissingElement("pitch".to_string()))?;
    let note = Note::new(parse_pitch(&pitch_node)?, duration);

    if !has("chord") {
        elements.push(Element::Note(note));
        return Ok(());
    }

    // <chord/> attaches this note to the previous one; the first member's duration wins
    match elements.pop() {
        Some(Element::Note(first)) => {
            let duration = first.duration;
            elements.push(Element::Chord(Chord { notes: vec![first, note], duration }));
        }
        Some(Element::Chord(mut chord)) => {
            chord.notes.push(note);
            elements.push(Element::Chord(chord));
        }
        previous => {
            elements.extend(previous);
            elements.push(Element::Note(note));
        }
    }
    Ok(())
}

fn parse_duration(note_node: &Node, divisions: u32) -> ScoreResult<QuarterLength> {
    let text = child_text(*note_node, "duration")
        .ok_or_else(|| ScoreError::MissingElement("duration".to_string()))?;
    let divs: u32 = text.trim().parse().map_err(|_| ScoreError::Invalid {
        element: "duration".to_string(),
        value: text.to_string(),
        reason: "expected non-negative integer".to_string(),
    })?;
    Ok(Ratio::new(divs, divisions))
}

fn parse_pitch(pitch_node: &Node) -> ScoreResult<Pitch> {
    let step_text = child_text(*pitch_node, "step")
        .ok_or_else(|| ScoreError::MissingElement("step".to_string()))?;
    let step = match step_text.trim() {
        s @ ("A" | "B" | "C" | "D" | "E" | "F" | "G") => s.chars().next().unwrap_or('C'),
        other => {
            return Err(ScoreError::Invalid {
                element: "step".to_string(),
                value: other.to_string(),
                reason: "expected a letter A-G".to_string(),
            })
        }
    };

    // Microtonal alterations are rounded to the nearest semitone
    let alter = child_text(*pitch_node, "alter")
        .and_then(|t| t.trim().parse::<f64>().ok())
        .map(|a| a.round().clamp(-4.0, 4.0) as i8)
        .unwrap_or(0);

    let octave_text = child_text(*pitch_node, "octave")
        .ok_or_else(|| ScoreError::MissingElement("octave".to_string()))?;
    // MusicXML octaves are 0-9; a negative one would render like a flat
    let octave = match octave_text.trim().parse::<i8>() {
        Ok(o) if (0..=9).contains(&o) => o,
        _ => {
            return Err(ScoreError::Invalid {
                element: "octave".to_string(),
                value: octave_text.to_string(),
                reason: "expected integer 0-9".to_string(),
            })
        }
    };

    Ok(Pitch::new(step, alter, octave))
}

fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children().find(|n| n.has_tag_name(tag)).and_then(|n| n.text())
}

#[cfg(test)]
#[path = "musicxml_tests.rs"]
mod tests;
