//! Lean score model consumed by the event extractor
//!
//! Just enough of a notated score to walk Score → Part → Measure → Element.
//! Durations are exact quarter lengths; pitches are already spelled the way
//! they appear in the token vocabulary (`C#4`, `B-3`).

use num_rational::Ratio;

/// Duration in quarter notes, kept exact until it is rendered
pub type QuarterLength = Ratio<u32>;

#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Measure {
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Note(Note),
    Rest(Rest),
    Chord(Chord),
    /// Anything else found in a measure (clef, direction, barline, unpitched note, ...)
    Other { kind: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub duration: QuarterLength,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rest {
    pub duration: QuarterLength,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chord {
    pub notes: Vec<Note>,
    pub duration: QuarterLength,
}

/// Spelled pitch: letter step, chromatic alteration in semitones, octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pitch {
    pub step: char,
    pub alter: i8,
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: char, alter: i8, octave: i8) -> Self {
        Self { step, alter, octave }
    }

    /// Pitch name with octave, `#` per semitone up and `-` per semitone down
    ///
    /// The octave is expected to be non-negative; the reader rejects anything
    /// outside 0-9, since `C-1` would read as C flat in octave 1.
    ///
    /// ```
    /// use scoreseq::score::Pitch;
    ///
    /// assert_eq!(Pitch::new('C', 1, 4).name_with_octave(), "C#4");
    /// assert_eq!(Pitch::new('B', -1, 3).name_with_octave(), "B-3");
    /// assert_eq!(Pitch::new('E', -2, 5).name_with_octave(), "E--5");
    /// ```
    pub fn name_with_octave(&self) -> String {
        let accidental = if self.alter >= 0 {
            "#".repeat(self.alter as usize)
        } else {
            "-".repeat(self.alter.unsigned_abs() as usize)
        };
        format!("{}{}{}", self.step, accidental, self.octave)
    }
}

impl Note {
    pub fn new(pitch: Pitch, duration: QuarterLength) -> Self {
        Self { pitch, duration }
    }
}

impl Element {
    pub fn duration(&self) -> Option<QuarterLength> {
        match self {
            Element::Note(note) => Some(note.duration),
            Element::Rest(rest) => Some(rest.duration),
            Element::Chord(chord) => Some(chord.duration),
            Element::Other { .. } => None,
        }
    }
}

/// Quarter length as a float, the form durations take once they leave the score
pub fn quarter_length_to_f64(duration: QuarterLength) -> f64 {
    *duration.numer() as f64 / *duration.denom() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_with_octave_naturals() {
        assert_eq!(Pitch::new('A', 0, 4).name_with_octave(), "A4");
        assert_eq!(Pitch::new('G', 0, 1).name_with_octave(), "G1");
    }

    #[test]
    fn test_name_with_octave_accidentals() {
        assert_eq!(Pitch::new('F', 2, 5).name_with_octave(), "F##5");
        assert_eq!(Pitch::new('D', -1, 2).name_with_octave(), "D-2");
        assert_eq!(Pitch::new('C', -2, 6).name_with_octave(), "C--6");
    }

    #[test]
    fn test_quarter_length_to_f64() {
        assert_eq!(quarter_length_to_f64(Ratio::new(1, 2)), 0.5);
        assert_eq!(quarter_length_to_f64(Ratio::new(3, 1)), 3.0);
        assert!((quarter_length_to_f64(Ratio::new(1, 3)) - 0.333_333).abs() < 1e-6);
    }

    #[test]
    fn test_element_duration() {
        let rest = Element::Rest(Rest { duration: Ratio::new(2, 1) });
        assert_eq!(rest.duration(), Some(Ratio::new(2, 1)));

        let clef = Element::Other { kind: "clef".to_string() };
        assert_eq!(clef.duration(), None);
    }
}
