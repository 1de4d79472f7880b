use std::collections::HashMap;

use crate::{
    error::{ConvertError, ConvertResult},
    midi::{MidiEvent, NoteRef},
    primitives::{Note, PianoKey},
};

/// Largest division, that standard midi file header can hold.
pub const MAX_TICKS_PER_BEAT: u64 = 0x7FFF;

/// Turns relative NoteOn/NoteOff events of one track to closed notes.
///
/// Tolerates sloppy input: NoteOn for already sounding key and NoteOff
/// for silent key are skipped.
#[derive(Debug)]
pub struct NoteAssembler {
    track: usize,
    ticks_per_beat: u64,
    current_pos: u64,
    /// Index of the open note in `notes` by its key.
    opened: HashMap<PianoKey, usize>,
    notes: Vec<Note>,
}
impl NoteAssembler {
    /// # Errors
    /// [ConvertError::InvalidTicksPerBeat] unless `ticks_per_beat` is in
    /// `1..=MAX_TICKS_PER_BEAT`.
    pub fn new(track: usize, ticks_per_beat: u64) -> ConvertResult<Self> {
        if !(1..=MAX_TICKS_PER_BEAT).contains(&ticks_per_beat) {
            return Err(ConvertError::InvalidTicksPerBeat(ticks_per_beat));
        }
        Ok(Self {
            track,
            ticks_per_beat,
            current_pos: 0,
            opened: HashMap::new(),
            notes: Vec::new(),
        })
    }

    pub fn current_pos(&self) -> u64 {
        self.current_pos
    }

    /// Apply event, which is `index`-th in the track.
    ///
    /// NoteOn is applied before NoteOff.
    pub fn push(&mut self, index: usize, event: &MidiEvent) -> ConvertResult<()> {
        self.current_pos = self.current_pos.checked_add(event.delta).ok_or(
            ConvertError::TickOverflow {
                track: self.track,
                event: index,
            },
        )?;
        if let Some(note_on) = &event.note_on {
            let key = self.resolve(index, note_on)?;
            self.open(index, key);
        }
        if let Some(note_off) = &event.note_off {
            let key = self.resolve(index, note_off)?;
            self.close(index, key);
        }
        Ok(())
    }

    /// Closed notes in order of their NoteOn events.
    ///
    /// Notes, that are still open, are dropped.
    pub fn finish(self) -> Vec<Note> {
        for (key, idx) in self.opened.iter() {
            log::warn!(
                "track {}: note {} opened at tick {} is never closed, skipping it",
                self.track,
                key,
                self.notes[*idx].start_tick
            );
        }
        self.notes
            .into_iter()
            .filter(|note| !note.is_open())
            .collect()
    }

    fn resolve(&self, index: usize, note: &NoteRef) -> ConvertResult<PianoKey> {
        PianoKey::parse(&note.note).ok_or_else(|| ConvertError::OutOfRangeNote {
            track: self.track,
            event: index,
            note: note.note.clone(),
        })
    }

    fn open(&mut self, index: usize, key: PianoKey) {
        match self.opened.contains_key(&key) {
            true => log::debug!(
                "track {}, event {}: {} is already sounding, NoteOn ignored",
                self.track,
                index,
                key
            ),
            false => {
                self.notes
                    .push(Note::open(self.current_pos, key, self.ticks_per_beat));
                self.opened.insert(key, self.notes.len() - 1);
            }
        }
    }

    fn close(&mut self, index: usize, key: PianoKey) {
        match self.opened.remove(&key) {
            None => log::debug!(
                "track {}, event {}: {} is not sounding, NoteOff ignored",
                self.track,
                index,
                key
            ),
            Some(idx) => self.notes[idx].close(self.current_pos, self.ticks_per_beat),
        }
    }
}

/// Assemble all events of the track to closed notes.
pub fn assemble_notes(
    track: usize,
    events: &[MidiEvent],
    ticks_per_beat: u64,
) -> ConvertResult<Vec<Note>> {
    let mut assembler = NoteAssembler::new(track, ticks_per_beat)?;
    for (index, event) in events.iter().enumerate() {
        assembler.push(index, event)?;
    }
    Ok(assembler.finish())
}
