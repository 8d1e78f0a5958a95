//! Scientific pitch notation

use super::AudioError;

/// Frequency of A4 in Hz
pub const A4_FREQUENCY: f32 = 440.0;

const A4_MIDI: i32 = 69;

/// MIDI number of a note name such as `C4`, `F#3` or `Bb2`
pub fn midi_number(name: &str) -> Result<i32, AudioError> {
    let invalid = || AudioError::InvalidNote(name.to_string());
    let mut chars = name.chars();

    let semitone = match chars.next().map(|c| c.to_ascii_uppercase()) {
        Some('C') => 0,
        Some('D') => 2,
        Some('E') => 4,
        Some('F') => 5,
        Some('G') => 7,
        Some('A') => 9,
        Some('B') => 11,
        _ => return Err(invalid()),
    };

    let rest = chars.as_str();
    let (accidental, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };
    let octave: i32 = octave.parse().map_err(|_| invalid())?;

    Ok((octave + 1) * 12 + semitone + accidental)
}

/// Frequency in Hz of a note name, equal temperament tuned to A4 = 440 Hz
pub fn frequency(name: &str) -> Result<f32, AudioError> {
    let midi = midi_number(name)?;
    Ok(A4_FREQUENCY * 2f32.powf((midi - A4_MIDI) as f32 / 12.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_pitches() {
        assert_relative_eq!(frequency("A4").unwrap(), 440.0);
        assert_relative_eq!(frequency("A3").unwrap(), 220.0, epsilon = 1e-3);
        assert_relative_eq!(frequency("C4").unwrap(), 261.626, epsilon = 1e-2);
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(midi_number("C#4").unwrap(), 61);
        assert_eq!(midi_number("Db4").unwrap(), 61);
        assert_eq!(midi_number("B-1").unwrap(), 11);
    }

    #[test]
    fn test_invalid_names() {
        assert!(matches!(frequency("H2"), Err(AudioError::InvalidNote(_))));
        assert!(matches!(frequency("C"), Err(AudioError::InvalidNote(_))));
        assert!(matches!(frequency(""), Err(AudioError::InvalidNote(_))));
    }
}
