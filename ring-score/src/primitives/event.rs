//! A smallest piece of music, that is held by Voice.
use fraction::Fraction;

use super::{ticks_to_wholes, PianoKey};

/// Note, that is opened by NoteOn and closed by NoteOff.
///
/// While the note is open, its duration is unknown.
#[derive(Debug, PartialEq, Clone)]
pub struct Note {
    pub start_tick: u64,
    pub start_in_wholes: Fraction,
    pub key: PianoKey,
    duration_ticks: Option<u64>,
    duration_wholes: Option<Fraction>,
}
impl Note {
    pub fn open(start_tick: u64, key: PianoKey, ticks_per_beat: u64) -> Self {
        Self {
            start_tick,
            start_in_wholes: ticks_to_wholes(start_tick, ticks_per_beat),
            key,
            duration_ticks: None,
            duration_wholes: None,
        }
    }

    /// Build already closed note.
    ///
    /// End of the note is clamped to the last representable tick.
    ///
    /// # Example
    /// ```
    /// # use fraction::Fraction;
    /// # use ring_score::primitives::{Note, PianoKey};
    /// let note = Note::new(960, 480, PianoKey::from_midi(60).unwrap(), 480);
    /// assert_eq!(note.end_tick(), Some(1440));
    /// assert_eq!(note.duration_wholes(), Some(Fraction::new(1u64, 4u64)));
    /// assert_eq!(note.start_in_wholes, Fraction::new(1u64, 2u64));
    /// ```
    pub fn new(
        start_tick: u64,
        duration_ticks: u64,
        key: PianoKey,
        ticks_per_beat: u64,
    ) -> Self {
        let mut note = Self::open(start_tick, key, ticks_per_beat);
        note.close(start_tick.saturating_add(duration_ticks), ticks_per_beat);
        note
    }

    pub fn is_open(&self) -> bool {
        self.duration_ticks.is_none()
    }

    /// Set duration from the closing position.
    ///
    /// Position is never before the start, as events only move forward.
    pub fn close(&mut self, end_tick: u64, ticks_per_beat: u64) {
        let duration = end_tick.saturating_sub(self.start_tick);
        self.duration_ticks = Some(duration);
        self.duration_wholes = Some(ticks_to_wholes(duration, ticks_per_beat));
    }

    pub fn duration_ticks(&self) -> Option<u64> {
        self.duration_ticks
    }
    pub fn duration_wholes(&self) -> Option<Fraction> {
        self.duration_wholes
    }
    pub fn end_tick(&self) -> Option<u64> {
        Some(self.start_tick.saturating_add(self.duration_ticks?))
    }

    /// True if start or end of self lies in the bounds of other,
    /// bounds included.
    ///
    /// Open notes overlap nothing.
    ///
    /// # Example
    /// ```
    /// # use ring_score::primitives::{Note, PianoKey};
    /// let c = PianoKey::from_midi(60).unwrap();
    /// let a = Note::new(0, 480, c, 480);
    /// let b = Note::new(480, 480, c, 480);
    /// let d = Note::new(481, 480, c, 480);
    /// assert!(b.overlaps(&a));
    /// assert!(!d.overlaps(&a));
    /// ```
    pub fn overlaps(&self, other: &Self) -> bool {
        let (Some(s_end), Some(o_end)) = (self.end_tick(), other.end_tick())
        else {
            return false;
        };
        let in_other =
            |tick: u64| other.start_tick <= tick && tick <= o_end;
        in_other(self.start_tick) || in_other(s_end)
    }
}
