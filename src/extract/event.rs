//! Normalized musical events
//!
//! One event per note, rest or chord of a measure. Every event carries
//! exactly one duration in quarter notes.

/// Pitch label of a rest
pub const REST_MARKER: &str = "P";

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Note { pitch: String, duration: f64 },
    Rest { duration: f64 },
    Chord { pitches: Vec<String>, duration: f64 },
}

impl Event {
    pub fn duration(&self) -> f64 {
        match self {
            Event::Note { duration, .. } | Event::Rest { duration } | Event::Chord { duration, .. } => *duration,
        }
    }

    /// Pitch labels this event contributes to the flat table, one per row
    pub fn pitch_labels(&self) -> Vec<&str> {
        match self {
            Event::Note { pitch, .. } => vec![pitch.as_str()],
            Event::Rest { .. } => vec![REST_MARKER],
            Event::Chord { pitches, .. } => pitches.iter().map(String::as_str).collect(),
        }
    }
}

/// Render a duration the way vocabulary keys are written: exactly 4 decimals
///
/// ```
/// assert_eq!(scoreseq::extract::format_duration(1.0), "1.0000");
/// assert_eq!(scoreseq::extract::format_duration(0.375), "0.3750");
/// ```
pub fn format_duration(duration: f64) -> String {
    format!("{:.4}", duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_labels() {
        let note = Event::Note { pitch: "C4".to_string(), duration: 1.0 };
        assert_eq!(note.pitch_labels(), vec!["C4"]);

        let rest = Event::Rest { duration: 2.0 };
        assert_eq!(rest.pitch_labels(), vec!["P"]);

        let chord = Event::Chord {
            pitches: vec!["C4".to_string(), "E4".to_string(), "G4".to_string()],
            duration: 0.5,
        };
        assert_eq!(chord.pitch_labels(), vec!["C4", "E4", "G4"]);
        assert_eq!(chord.duration(), 0.5);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0.0000");
        assert_eq!(format_duration(0.125), "0.1250");
        assert_eq!(format_duration(1.0 / 3.0), "0.3333");
        assert_eq!(format_duration(8.0), "8.0000");
    }
}
