use fraction::Fraction;
use thiserror;

/// Fatal anomalies. Each one aborts conversion of the track it was
/// raised in, other tracks are converted independently.
#[derive(Debug, PartialEq, Clone, thiserror::Error)]
pub enum ConvertError {
    #[error(
        "Out of range midi number: `{note}` \
        (track: {track}, event: {event})"
    )]
    OutOfRangeNote {
        track: usize,
        event: usize,
        note: String,
    },
    #[error(
        "Can't find the voice for note {note} in track {track}: \
        more than {lanes} notes sound simultaneously"
    )]
    VoiceOverflow {
        track: usize,
        note: usize,
        lanes: usize,
    },
    #[error("Duration {duration} is shorter than any quantized length")]
    DurationTooSmall { duration: Fraction },
    #[error("Duration {duration} needs more than {chunks} quantized pieces")]
    DurationTooLong { duration: Fraction, chunks: usize },
    #[error("No label for duration {duration}")]
    UnknownDuration { duration: Fraction },
    #[error("Ticks per beat should be in 1..=32767, got {0}")]
    InvalidTicksPerBeat(u64),
    #[error(
        "Position doesn't fit 64-bit ticks (track: {track}, event: {event})"
    )]
    TickOverflow { track: usize, event: usize },
}
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors of reading the input file, before the conversion starts.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Can not read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("Can not parse input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Can not parse xml input: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}
