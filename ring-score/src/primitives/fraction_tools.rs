//! Tools for expressing fractions as musical lengths.

use fraction::Fraction;
use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, ConvertResult};

use super::{DurationTable, QuantizedDuration};

/// Convert ticks to fractions of the whole note.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use ring_score::primitives::ticks_to_wholes;
/// assert_eq!(ticks_to_wholes(480, 480), Fraction::new(1u64, 4u64));
/// assert_eq!(ticks_to_wholes(720, 480), Fraction::new(3u64, 8u64));
/// ```
pub fn ticks_to_wholes(ticks: u64, ticks_per_beat: u64) -> Fraction {
    Fraction::new(ticks, ticks_per_beat.saturating_mul(4))
}

/// True if `duration` is longer than `chunks` pieces of `value`.
///
/// Compared by cross-multiplication in `u128`, so huge durations
/// don't overflow.
fn exceeds_chunks(duration: Fraction, value: Fraction, chunks: usize) -> bool {
    let (Some(numer), Some(denom), Some(v_numer), Some(v_denom)) = (
        duration.numer(),
        duration.denom(),
        value.numer(),
        value.denom(),
    ) else {
        return false;
    };
    let length = *numer as u128 * *v_denom as u128;
    (chunks as u128)
        .checked_mul(*v_numer as u128)
        .and_then(|limit| limit.checked_mul(*denom as u128))
        .map_or(false, |limit| length > limit)
}

/// What quantized values are compared with, while splitting a length.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantizePolicy {
    /// Compare with the whole length of the note: the largest value,
    /// fitting the note, is repeated until the note is covered.
    #[default]
    Original,
    /// Compare with the part, that is not covered yet.
    Remainder,
}

/// Quantized part of a longer length.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct QuantizedPiece {
    pub duration: QuantizedDuration,
    /// Distance from the start of the split length, in wholes.
    pub offset: Fraction,
}

/// Split length by values of the table, starting from the largest.
///
/// The cursor over the table only moves towards smaller values.
/// When the value under the cursor fits (see [QuantizePolicy]), it is
/// emitted, otherwise the cursor moves on.
///
/// "Fits" means `value <= target`, not `value >= target`: with a
/// descending scan `>=` would always take the largest value and never
/// fail. So the first value not longer than the note is repeated, and
/// `DurationTooSmall` is raised only when nothing fits.
///
/// # Errors
/// - [ConvertError::DurationTooSmall] if the cursor falls off the table.
/// - [ConvertError::DurationTooLong] if more than `max_chunks` pieces
///   are needed.
///
/// # Example
/// ```
/// # use fraction::Fraction;
/// # use ring_score::primitives::{
/// #     quantize_duration, DurationTable, QuantizePolicy, QuantizedDuration};
/// let table = DurationTable::default();
/// let pieces = quantize_duration(
///     Fraction::new(3u64, 1u64),
///     &table,
///     QuantizePolicy::Original,
///     256,
/// )
/// .unwrap();
/// assert_eq!(pieces.len(), 2);
/// assert_eq!(pieces[0].duration, QuantizedDuration::dotted(1));
/// assert_eq!(pieces[1].offset, Fraction::new(3u64, 2u64));
/// ```
pub fn quantize_duration(
    duration: Fraction,
    table: &DurationTable,
    policy: QuantizePolicy,
    max_chunks: usize,
) -> ConvertResult<Vec<QuantizedPiece>> {
    let too_small = ConvertError::DurationTooSmall { duration };
    match table.smallest() {
        Some(smallest) if duration >= smallest.get() => (),
        _ => return Err(too_small),
    }
    if let Some(largest) = table.values().first() {
        if exceeds_chunks(duration, largest.get(), max_chunks) {
            return Err(ConvertError::DurationTooLong {
                duration,
                chunks: max_chunks,
            });
        }
    }
    let zero = Fraction::new(0u64, 1u64);
    let values = table.values();
    let mut pieces = Vec::new();
    let mut remaining = duration;
    let mut offset = zero;
    let mut cursor = 0;
    while remaining > zero {
        let value = values.get(cursor).ok_or(too_small.clone())?;
        let target = match policy {
            QuantizePolicy::Original => duration,
            QuantizePolicy::Remainder => remaining,
        };
        if value.get() > target {
            cursor += 1;
            continue;
        }
        if pieces.len() >= max_chunks {
            return Err(ConvertError::DurationTooLong {
                duration,
                chunks: max_chunks,
            });
        }
        pieces.push(QuantizedPiece {
            duration: *value,
            offset,
        });
        offset += value.get();
        remaining -= value.get();
    }
    Ok(pieces)
}
