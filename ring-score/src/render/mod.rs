//! Rendering of voices to the ringtone text notation.
//!
//! Every quantized piece of a note becomes a token like `4.c#5`:
//! length label followed by lowercase key name. When the note starts
//! after the end of the previous note of the voice, rest token (`4p`)
//! precedes it.

use std::{fmt::Display, fs, path::Path};

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use crate::{
    dom::{Voice, DEFAULT_LANES},
    error::{ConvertResult, InputError},
    primitives::{
        quantize_duration, DurationTable, PianoKey, QuantizePolicy,
        QuantizedDuration, DEFAULT_DENOMINATORS,
    },
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Voices per track.
    pub lanes: usize,
    pub delimiter: String,
    pub rest_marker: char,
    pub policy: QuantizePolicy,
    /// Upper bound of pieces one note can be split to.
    pub max_chunks: usize,
    /// Plain lengths, dotted variants are added automatically.
    pub denominators: Vec<u64>,
}
impl RenderSettings {
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
    pub fn duration_table(&self) -> DurationTable {
        DurationTable::new(&self.denominators)
    }
}
impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lanes: DEFAULT_LANES,
            delimiter: ",".to_string(),
            rest_marker: 'p',
            policy: QuantizePolicy::default(),
            max_chunks: 256,
            denominators: DEFAULT_DENOMINATORS.to_vec(),
        }
    }
}

pub trait RendersToRingtone {
    fn render_ringtone(&self, settings: &RenderSettings) -> String;
}

impl RendersToRingtone for QuantizedDuration {
    fn render_ringtone(&self, _settings: &RenderSettings) -> String {
        self.label()
    }
}

impl RendersToRingtone for PianoKey {
    fn render_ringtone(&self, _settings: &RenderSettings) -> String {
        self.display_name()
    }
}

/// One quantized piece of a note.
#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    /// Rest before the note. Takes the length of the note.
    pub rest: Option<QuantizedDuration>,
    pub duration: QuantizedDuration,
    pub key: PianoKey,
}
impl RendersToRingtone for Token {
    fn render_ringtone(&self, settings: &RenderSettings) -> String {
        let note = format!(
            "{}{}",
            self.duration.render_ringtone(settings),
            self.key.render_ringtone(settings)
        );
        match &self.rest {
            None => note,
            Some(rest) => format!(
                "{}{}{}{}",
                rest.render_ringtone(settings),
                settings.rest_marker,
                settings.delimiter,
                note
            ),
        }
    }
}

/// Quantize notes of the voice and make tokens of them.
///
/// # Example
/// ```
/// # use ring_score::dom::split_to_voices;
/// # use ring_score::primitives::{Note, PianoKey};
/// # use ring_score::render::{voice_tokens, RenderSettings, RendersToRingtone};
/// let settings = RenderSettings::default();
/// let a = PianoKey::from_midi(69).unwrap();
/// let voices = split_to_voices(0, vec![Note::new(240, 240, a, 480)], 8).unwrap();
/// let tokens = voice_tokens(&voices[0], &settings).unwrap();
/// assert_eq!(tokens[0].render_ringtone(&settings), "8p,8a4");
/// ```
pub fn voice_tokens(
    voice: &Voice,
    settings: &RenderSettings,
) -> ConvertResult<Vec<Token>> {
    let table = settings.duration_table();
    let mut tokens = Vec::new();
    let mut voice_end = 0;
    for note in voice.notes() {
        let duration = note
            .duration_wholes()
            .unwrap_or(Fraction::new(0u64, 1u64));
        let pieces = quantize_duration(
            duration,
            &table,
            settings.policy,
            settings.max_chunks,
        )?;
        let mut rest = match note.start_tick > voice_end {
            true => pieces
                .first()
                .map(|piece| table.lookup(piece.duration.get()))
                .transpose()?,
            false => None,
        };
        for piece in pieces {
            tokens.push(Token {
                rest: rest.take(),
                duration: table.lookup(piece.duration.get())?,
                key: note.key,
            });
        }
        voice_end = note.end_tick().unwrap_or(note.start_tick);
    }
    Ok(tokens)
}

#[derive(Debug, PartialEq, Clone)]
pub struct VoiceScore {
    /// Index of the voice lane, empty lanes included.
    pub lane: usize,
    pub tokens: Vec<Token>,
}
impl RendersToRingtone for VoiceScore {
    fn render_ringtone(&self, settings: &RenderSettings) -> String {
        self.tokens
            .iter()
            .map(|token| token.render_ringtone(settings))
            .collect::<Vec<_>>()
            .join(&settings.delimiter)
    }
}

/// Non-empty voices of the converted track.
#[derive(Debug, PartialEq, Clone)]
pub struct TrackScore {
    pub index: usize,
    pub voices: Vec<VoiceScore>,
}

/// Result of conversion of the whole file.
#[derive(Debug, PartialEq, Clone)]
pub struct Score {
    pub settings: RenderSettings,
    pub tracks: Vec<ConvertResult<TrackScore>>,
}
impl Score {
    pub fn has_errors(&self) -> bool {
        self.tracks.iter().any(|track| track.is_err())
    }
}
impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, track) in self.tracks.iter().enumerate() {
            writeln!(f, "---track {}", idx + 1)?;
            match track {
                Err(err) => writeln!(f, "error: {}", err)?,
                Ok(track) => {
                    for (number, voice) in track.voices.iter().enumerate() {
                        writeln!(f, "-----voice {}", number + 1)?;
                        writeln!(f, "{}", voice.render_ringtone(&self.settings))?;
                    }
                }
            }
        }
        Ok(())
    }
}
