//! Serialized note-event timeline, as it comes from the outside.
//!
//! The layout follows the `MIDIFile` document, converted to JSON:
//!
//! ```json
//! {"MIDIFile": {
//!     "TicksPerBeat": 480,
//!     "Track": [{"Event": [
//!         {"Delta": 0, "NoteOn": {"@Note": "60"}},
//!         {"Delta": 480, "NoteOff": {"@Note": "60"}}
//!     ]}]
//! }}
//! ```
//!
//! or the `MIDIFile` XML document itself:
//!
//! ```xml
//! <MIDIFile>
//!   <TicksPerBeat>480</TicksPerBeat>
//!   <Track>
//!     <Event><Delta>0</Delta><NoteOn Channel="1" Note="60" Velocity="64"/></Event>
//!     <Event><Delta>480</Delta><NoteOff Channel="1" Note="60" Velocity="0"/></Event>
//!   </Track>
//! </MIDIFile>
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::InputError;

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "MIDIFile")]
    midi_file: MidiFile,
}

/// XML lists are repeated elements, one or many of them fill a `Vec`.
#[derive(Debug, Deserialize)]
struct XmlMidiFile {
    #[serde(rename = "TicksPerBeat")]
    ticks_per_beat: u64,
    #[serde(rename = "Track", default)]
    tracks: Vec<XmlTrack>,
}

#[derive(Debug, Deserialize)]
struct XmlTrack {
    #[serde(rename = "Event", default)]
    events: Vec<MidiEvent>,
}

impl From<XmlMidiFile> for MidiFile {
    fn from(value: XmlMidiFile) -> Self {
        Self::new(
            value.ticks_per_beat,
            value
                .tracks
                .into_iter()
                .map(|track| MidiTrack::new(track.events))
                .collect(),
        )
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct MidiFile {
    #[serde(rename = "TicksPerBeat")]
    pub ticks_per_beat: u64,
    #[serde(rename = "Track", default, deserialize_with = "one_or_many")]
    pub tracks: Vec<MidiTrack>,
}
impl MidiFile {
    pub fn new(ticks_per_beat: u64, tracks: Vec<MidiTrack>) -> Self {
        Self {
            ticks_per_beat,
            tracks,
        }
    }

    /// # Example
    /// ```
    /// # use ring_score::midi::MidiFile;
    /// let file = MidiFile::from_json(r#"{"MIDIFile": {
    ///     "TicksPerBeat": 96,
    ///     "Track": {"Event": {"Delta": 0, "NoteOn": {"@Note": 60}}}
    /// }}"#).unwrap();
    /// assert_eq!(file.ticks_per_beat, 96);
    /// assert_eq!(file.tracks[0].events[0].note_on.as_ref().unwrap().note, "60");
    /// ```
    pub fn from_json(json: &str) -> Result<Self, InputError> {
        let document: Document = serde_json::from_str(json)?;
        Ok(document.midi_file)
    }

    /// # Example
    /// ```
    /// # use ring_score::midi::MidiFile;
    /// let file = MidiFile::from_xml(r#"<MIDIFile>
    ///     <Format>1</Format>
    ///     <TicksPerBeat>96</TicksPerBeat>
    ///     <Track Number="0">
    ///         <Event><Delta>0</Delta><NoteOn Channel="1" Note="60" Velocity="90"/></Event>
    ///     </Track>
    /// </MIDIFile>"#).unwrap();
    /// assert_eq!(file.ticks_per_beat, 96);
    /// assert_eq!(file.tracks[0].events[0].note_on.as_ref().unwrap().note, "60");
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self, InputError> {
        let file: XmlMidiFile = quick_xml::de::from_str(xml)?;
        Ok(file.into())
    }

    /// Read the file, `.xml` is parsed as XML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => Self::from_xml(&text),
            _ => Self::from_json(&text),
        }
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        let document = Document {
            midi_file: self.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}

#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct MidiTrack {
    #[serde(rename = "Event", default, deserialize_with = "one_or_many")]
    pub events: Vec<MidiEvent>,
}
impl MidiTrack {
    pub fn new(events: Vec<MidiEvent>) -> Self {
        Self { events }
    }
}

/// Event with relative position.
///
/// NoteOn and NoteOff are independent: event may carry both, one
/// or none of them.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct MidiEvent {
    #[serde(rename = "Delta")]
    pub delta: u64,
    #[serde(rename = "NoteOn", default, skip_serializing_if = "Option::is_none")]
    pub note_on: Option<NoteRef>,
    #[serde(rename = "NoteOff", default, skip_serializing_if = "Option::is_none")]
    pub note_off: Option<NoteRef>,
}
impl MidiEvent {
    pub fn new(delta: u64) -> Self {
        Self {
            delta,
            ..Default::default()
        }
    }
    pub fn note_on(delta: u64, note: impl Into<String>) -> Self {
        Self::new(delta).with_note_on(note)
    }
    pub fn note_off(delta: u64, note: impl Into<String>) -> Self {
        Self::new(delta).with_note_off(note)
    }
    pub fn with_note_on(mut self, note: impl Into<String>) -> Self {
        self.note_on = Some(NoteRef::new(note));
        self
    }
    pub fn with_note_off(mut self, note: impl Into<String>) -> Self {
        self.note_off = Some(NoteRef::new(note));
        self
    }
}

/// String-encoded midi number of the note.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct NoteRef {
    #[serde(rename = "@Note", deserialize_with = "string_or_number")]
    pub note: String,
}
impl NoteRef {
    pub fn new(note: impl Into<String>) -> Self {
        Self { note: note.into() }
    }
}

/// XML-to-JSON converters collapse single-element lists to objects.
fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(item) => vec![item],
        OneOrMany::Many(items) => items,
    })
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }
    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use crate::error::InputError;

    use super::{MidiEvent, MidiFile, MidiTrack};

    #[test]
    fn parse_lists() {
        let file = MidiFile::from_json(
            r#"{"MIDIFile": {
                "TicksPerBeat": 480,
                "Track": [
                    {"Event": [
                        {"Delta": 0, "NoteOn": {"@Note": "60"}},
                        {"Delta": 480, "NoteOff": {"@Note": "60"},
                            "NoteOn": {"@Note": "62"}},
                        {"Delta": 10}
                    ]},
                    {}
                ]
            }}"#,
        )
        .unwrap();
        assert_eq!(
            file,
            MidiFile::new(
                480,
                vec![
                    MidiTrack::new(vec![
                        MidiEvent::note_on(0, "60"),
                        MidiEvent::note_off(480, "60").with_note_on("62"),
                        MidiEvent::new(10),
                    ]),
                    MidiTrack::default(),
                ]
            )
        );
    }

    #[test]
    fn parse_xml() {
        let file = MidiFile::from_xml(
            r#"<?xml version="1.0" encoding="ISO-8859-1"?>
            <MIDIFile>
                <Format>1</Format>
                <TrackCount>3</TrackCount>
                <TicksPerBeat>480</TicksPerBeat>
                <TimestampType>Delta</TimestampType>
                <Track Number="0">
                    <Event><Delta>0</Delta><NoteOn Channel="1" Note="60" Velocity="64"/></Event>
                    <Event>
                        <Delta>480</Delta>
                        <NoteOn Channel="1" Note="62" Velocity="64"/>
                        <NoteOff Channel="1" Note="60" Velocity="0"/>
                    </Event>
                    <Event><Delta>10</Delta><EndOfTrack/></Event>
                </Track>
                <Track Number="1">
                    <Event><Delta>0</Delta><NoteOff Channel="1" Note="40" Velocity="0"/></Event>
                </Track>
                <Track Number="2"></Track>
            </MIDIFile>"#,
        )
        .unwrap();
        assert_eq!(
            file,
            MidiFile::new(
                480,
                vec![
                    MidiTrack::new(vec![
                        MidiEvent::note_on(0, "60"),
                        MidiEvent::note_off(480, "60").with_note_on("62"),
                        MidiEvent::new(10),
                    ]),
                    MidiTrack::new(vec![MidiEvent::note_off(0, "40")]),
                    MidiTrack::default(),
                ]
            )
        );
        // Single track and event are lists as well.
        let file = MidiFile::from_xml(
            r#"<MIDIFile>
                <TicksPerBeat>96</TicksPerBeat>
                <Track><Event><Delta>0</Delta><NoteOn Note="64"/></Event></Track>
            </MIDIFile>"#,
        )
        .unwrap();
        assert_eq!(
            file,
            MidiFile::new(
                96,
                vec![MidiTrack::new(vec![MidiEvent::note_on(0, "64")])]
            )
        );
    }

    #[test]
    fn malformed() {
        assert!(MidiFile::from_json(r#"{"TicksPerBeat": 480}"#).is_err());
        assert!(MidiFile::from_json(
            r#"{"MIDIFile": {"TicksPerBeat": 480,
                "Track": {"Event": {"NoteOn": {"@Note": "60"}}}}}"#
        )
        .is_err());
        assert!(matches!(
            MidiFile::from_xml("<MIDIFile><Track/></MIDIFile>"),
            Err(InputError::Xml(_))
        ));
        assert!(matches!(
            MidiFile::from_xml(
                "<MIDIFile><TicksPerBeat>many</TicksPerBeat></MIDIFile>"
            ),
            Err(InputError::Xml(_))
        ));
    }

    #[test]
    fn json_round_trip() {
        let file = MidiFile::new(
            96,
            vec![MidiTrack::new(vec![
                MidiEvent::note_on(0, "64"),
                MidiEvent::note_off(96, "64"),
            ])],
        );
        let json = file.to_json().unwrap();
        assert_eq!(MidiFile::from_json(&json).unwrap(), file);
    }
}
