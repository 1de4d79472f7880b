//! Elements, from which voices are constructed.
//!
//! At first, events of a track are assembled to Notes.
//! Then Notes are distributed between Voices.
//! Then every Note is split by quantized lengths
//! and rendered to ringtone tokens.

pub mod event;
pub mod fraction_tools;
pub mod length;
pub mod pitch;

pub use event::Note;
pub use fraction_tools::{
    quantize_duration, ticks_to_wholes, QuantizePolicy, QuantizedPiece,
};
pub use length::{
    DurationTable, QuantizedDuration, DEFAULT_DENOMINATORS, MAX_DENOMINATOR,
};
pub use pitch::{NoteName, PianoKey};
