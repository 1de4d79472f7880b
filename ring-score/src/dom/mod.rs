//! Notes of the track, distributed between monophonic voices.

pub mod midi_parse;

use crate::{
    error::{ConvertError, ConvertResult},
    primitives::Note,
};

/// Maximum simultaneous notes of a track.
pub const DEFAULT_LANES: usize = 8;

/// Monophonic lane: notes don't overlap and go in order of start.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Voice {
    notes: Vec<Note>,
}
impl Voice {
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// True if note overlaps none of the voice notes.
    pub fn accepts(&self, note: &Note) -> bool {
        !self.notes.iter().any(|other| note.overlaps(other))
    }

    fn push(&mut self, note: Note) {
        self.notes.push(note);
    }
}

/// Put every note to the first voice, that accepts it.
///
/// Notes are expected in order of start. Returns exactly `lanes`
/// voices, some of them may be empty.
///
/// # Errors
/// [ConvertError::VoiceOverflow] if no voice accepts a note.
///
/// # Example
/// ```
/// # use ring_score::dom::split_to_voices;
/// # use ring_score::primitives::{Note, PianoKey};
/// let c = PianoKey::from_midi(60).unwrap();
/// let e = PianoKey::from_midi(64).unwrap();
/// let voices = split_to_voices(
///     0,
///     vec![Note::new(0, 480, c, 480), Note::new(240, 480, e, 480)],
///     8,
/// )
/// .unwrap();
/// assert_eq!(voices.len(), 8);
/// assert_eq!(voices[1].notes()[0].key, e);
/// ```
pub fn split_to_voices(
    track: usize,
    notes: Vec<Note>,
    lanes: usize,
) -> ConvertResult<Vec<Voice>> {
    let mut voices = vec![Voice::default(); lanes];
    for (idx, note) in notes.into_iter().enumerate() {
        let lane = voices
            .iter()
            .position(|voice| voice.accepts(&note))
            .ok_or(ConvertError::VoiceOverflow {
                track,
                note: idx,
                lanes,
            })?;
        log::debug!(
            "track {}: note {} at tick {} goes to voice {}",
            track,
            note.key,
            note.start_tick,
            lane
        );
        voices[lane].push(note);
    }
    Ok(voices)
}

#[cfg(test)]
mod tests {
    use crate::{
        error::ConvertError,
        primitives::{Note, PianoKey},
    };

    use super::{split_to_voices, DEFAULT_LANES};

    fn note(start: u64, duration: u64, midi: u8) -> Note {
        Note::new(start, duration, PianoKey::from_midi(midi).unwrap(), 480)
    }

    fn lanes_of(voices: &[super::Voice]) -> Vec<(u8, usize)> {
        let mut result: Vec<(u8, usize)> = voices
            .iter()
            .enumerate()
            .flat_map(|(lane, voice)| {
                voice.notes().iter().map(move |n| (n.key.midi(), lane))
            })
            .collect();
        result.sort();
        result
    }

    #[test]
    fn overlapping_notes_first_fit() {
        let voices = split_to_voices(
            0,
            vec![note(0, 960, 60), note(240, 960, 64), note(480, 960, 67)],
            DEFAULT_LANES,
        )
        .unwrap();
        assert_eq!(lanes_of(&voices), vec![(60, 0), (64, 1), (67, 2)]);
        assert!(voices[3..].iter().all(|voice| voice.is_empty()));
    }

    #[test]
    fn touching_notes_alternate() {
        let voices = split_to_voices(
            0,
            vec![note(0, 480, 60), note(480, 480, 62), note(960, 480, 64)],
            DEFAULT_LANES,
        )
        .unwrap();
        assert_eq!(lanes_of(&voices), vec![(60, 0), (62, 1), (64, 0)]);
    }

    #[test]
    fn gap_reuses_first_voice() {
        let voices = split_to_voices(
            0,
            vec![note(0, 480, 60), note(481, 480, 62)],
            DEFAULT_LANES,
        )
        .unwrap();
        assert_eq!(voices[0].notes().len(), 2);
    }

    #[test]
    fn overflow() {
        let chord: Vec<_> = (60..69).map(|midi| note(0, 480, midi)).collect();
        assert_eq!(
            split_to_voices(4, chord.clone()[..8].to_vec(), DEFAULT_LANES)
                .map(|voices| voices.iter().all(|voice| voice.notes().len() == 1)),
            Ok(true)
        );
        assert_eq!(
            split_to_voices(4, chord, DEFAULT_LANES),
            Err(ConvertError::VoiceOverflow {
                track: 4,
                note: 8,
                lanes: 8
            })
        );
    }
}
