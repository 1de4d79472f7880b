//! Conversion of note-event timelines to ringtone text notation.
//!
//! ```
//! use ring_score::{convert, midi::MidiFile, render::RenderSettings};
//!
//! let file = MidiFile::from_json(r#"{"MIDIFile": {
//!     "TicksPerBeat": 480,
//!     "Track": [{"Event": [
//!         {"Delta": 0, "NoteOn": {"@Note": "60"}},
//!         {"Delta": 480, "NoteOff": {"@Note": "60"}}
//!     ]}]
//! }}"#).unwrap();
//! let score = convert(&file, &RenderSettings::default());
//! assert_eq!(score.to_string(), "---track 1\n-----voice 1\n4c4\n");
//! ```

pub mod dom;
pub mod error;
pub mod midi;
pub mod primitives;
pub mod render;

use dom::{midi_parse::assemble_notes, split_to_voices};
use error::ConvertResult;
use midi::{MidiFile, MidiTrack};
use render::{voice_tokens, RenderSettings, Score, TrackScore, VoiceScore};

/// Convert one track: assemble notes, split them to voices and
/// render non-empty voices.
///
/// `ticks_per_beat` is checked by the assembler, see
/// [dom::midi_parse::MAX_TICKS_PER_BEAT].
pub fn convert_track(
    index: usize,
    track: &MidiTrack,
    ticks_per_beat: u64,
    settings: &RenderSettings,
) -> ConvertResult<TrackScore> {
    let notes = assemble_notes(index, &track.events, ticks_per_beat)?;
    let voices = split_to_voices(index, notes, settings.lanes)?;
    let voices = voices
        .iter()
        .enumerate()
        .filter(|(_, voice)| !voice.is_empty())
        .map(|(lane, voice)| -> ConvertResult<VoiceScore> {
            Ok(VoiceScore {
                lane,
                tokens: voice_tokens(voice, settings)?,
            })
        })
        .collect::<ConvertResult<Vec<_>>>()?;
    Ok(TrackScore { index, voices })
}

/// Convert every track of the file independently.
///
/// Failed track doesn't affect others: its error takes its place
/// in the [Score].
pub fn convert(file: &MidiFile, settings: &RenderSettings) -> Score {
    let tracks = file
        .tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let result =
                convert_track(index, track, file.ticks_per_beat, settings);
            match &result {
                Ok(score) => log::info!(
                    "track {}: converted to {} voices",
                    index + 1,
                    score.voices.len()
                ),
                Err(err) => log::error!("track {}: {}", index + 1, err),
            }
            result
        })
        .collect();
    Score {
        settings: settings.clone(),
        tracks,
    }
}
