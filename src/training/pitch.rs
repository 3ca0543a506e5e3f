//! Pitch token decoding, for auditioning decoded sequences

/// MIDI note number of a pitch token such as `C#4` or `B-3` (C4 = 60)
///
/// Returns `None` for the rest marker, `[UNK]`, and anything that is not a
/// spelled pitch with a non-negative octave in MIDI range.
pub fn pitch_to_midi(token: &str) -> Option<u8> {
    let mut chars = token.chars();
    let base: i32 = match chars.next()? {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let octave_start = rest.find(|c: char| c.is_ascii_digit())?;
    let (accidental, octave) = rest.split_at(octave_start);

    let alter = accidental
        .chars()
        .map(|c| match c {
            '#' => Some(1),
            '-' => Some(-1),
            _ => None,
        })
        .sum::<Option<i32>>()?;
    let octave: i32 = octave.parse().ok()?;

    let semi = base + alter + (octave + 1) * 12;
    u8::try_from(semi).ok().filter(|n| *n <= 127)
}

/// Equal-tempered frequency in Hz with A4 = 440
pub fn pitch_frequency(token: &str) -> Option<f64> {
    let midi = pitch_to_midi(token)?;
    Some(440.0 * 2f64.powf((midi as f64 - 69.0) / 12.0))
}
