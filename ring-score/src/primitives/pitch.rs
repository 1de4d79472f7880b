pub use musical_note::{Accidental, Key, NoteName, Scale};

use musical_note::{Note, ResolvedNote};
use std::fmt::Display;

/// Lowest and highest midi numbers of the 88-key piano.
pub const LOWEST_KEY: u8 = 21;
pub const HIGHEST_KEY: u8 = 108;

/// One key of the piano keyboard.
///
/// Can be built only from a midi number in `21..=108`, so every
/// `PianoKey` is valid.
///
/// # Example
/// ```
/// # use ring_score::primitives::PianoKey;
/// let c4 = PianoKey::from_midi(60).unwrap();
/// assert_eq!(c4.to_string(), "C4");
/// assert_eq!(c4.display_name(), "c4");
/// assert_eq!(PianoKey::from_midi(20), None);
/// assert_eq!(PianoKey::parse("61").unwrap().display_name(), "c#4");
/// ```
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Copy)]
pub struct PianoKey {
    midi: u8,
}
impl PianoKey {
    pub fn from_midi(midi: u8) -> Option<Self> {
        match midi {
            LOWEST_KEY..=HIGHEST_KEY => Some(Self { midi }),
            _ => None,
        }
    }

    /// Resolve string-encoded midi number, as it comes in the events.
    pub fn parse(note: &str) -> Option<Self> {
        let midi: u8 = note.trim().parse().ok()?;
        Self::from_midi(midi)
    }

    pub fn midi(&self) -> u8 {
        self.midi
    }

    /// Black keys are spelled with sharps.
    pub fn is_black(&self) -> bool {
        matches!(self.midi % 12, 1 | 3 | 6 | 8 | 10)
    }

    /// Note, resolved in C major.
    pub fn resolve(&self) -> ResolvedNote {
        let accidental = self.is_black().then_some(Accidental::Sharp);
        let key = Key::new(NoteName::C, Accidental::White, Scale::Major);
        Note::from_midi(self.midi, accidental).resolve(key)
    }

    /// Scientific octave: middle C (60) is in the 4th.
    pub fn octave(&self) -> i8 {
        (self.midi / 12) as i8 - 1
    }

    /// Lowercase name, used in rendered tokens.
    pub fn display_name(&self) -> String {
        let resolved = self.resolve();
        let name = match resolved.note {
            NoteName::C => "c",
            NoteName::D => "d",
            NoteName::E => "e",
            NoteName::F => "f",
            NoteName::G => "g",
            NoteName::A => "a",
            NoteName::B => "b",
        };
        let accidental = match resolved.accidental {
            Accidental::Sharp => "#",
            Accidental::Flat => "b",
            _ => "",
        };
        format!("{}{}{}", name, accidental, self.octave())
    }
}
impl Display for PianoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name().to_uppercase())
    }
}
