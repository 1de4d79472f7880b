use std::cmp::Ordering;

use fraction::Fraction;
use once_cell::sync::Lazy;

use crate::error::{ConvertError, ConvertResult};

/// Plain lengths of the ringtone format: whole down to 1/32.
pub const DEFAULT_DENOMINATORS: [u64; 6] = [1, 2, 4, 8, 16, 32];

static DEFAULT_TABLE: Lazy<DurationTable> =
    Lazy::new(|| DurationTable::new(&DEFAULT_DENOMINATORS));

/// Denominators above this one are not used by ringtone players.
pub const MAX_DENOMINATOR: u64 = 1 << 16;

/// One of legal output lengths, in wholes: `1/n` or dotted `3/2n`.
///
/// Keeps the plain denominator, so dotted lengths are labeled by it
/// even when `3/2n` reduces.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct QuantizedDuration {
    denominator: u64,
    dotted: bool,
}
impl QuantizedDuration {
    pub fn plain(denominator: u64) -> Self {
        Self {
            denominator,
            dotted: false,
        }
    }
    pub fn dotted(denominator: u64) -> Self {
        Self {
            denominator,
            dotted: true,
        }
    }
    pub fn get(&self) -> Fraction {
        match self.dotted {
            true => Fraction::new(3u64, self.denominator.saturating_mul(2)),
            false => Fraction::new(1u64, self.denominator),
        }
    }
    pub fn denominator(&self) -> u64 {
        self.denominator
    }
    pub fn is_dotted(&self) -> bool {
        self.dotted
    }

    /// Text label: denominator for plain lengths,
    /// denominator of the undotted length and "." for dotted.
    ///
    /// # Example
    /// ```
    /// # use ring_score::primitives::QuantizedDuration;
    /// assert_eq!(QuantizedDuration::plain(4).label(), "4");
    /// assert_eq!(QuantizedDuration::dotted(4).label(), "4.");
    /// assert_eq!(QuantizedDuration::dotted(1).label(), "1.");
    /// ```
    pub fn label(&self) -> String {
        match self.dotted {
            true => format!("{}.", self.denominator),
            false => format!("{}", self.denominator),
        }
    }
}
impl PartialOrd for QuantizedDuration {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.get().partial_cmp(&other.get())
    }
}

/// Immutable set of quantized lengths, sorted from the largest.
#[derive(Debug, PartialEq, Clone)]
pub struct DurationTable {
    values: Vec<QuantizedDuration>,
}
impl DurationTable {
    /// Build table of plain and dotted variants of `1/denominator`.
    ///
    /// Only powers of two up to [MAX_DENOMINATOR] are taken: other
    /// denominators have no ringtone length, and their dotted variants
    /// would collide with plain ones (`3/6 == 1/2`).
    pub fn new(denominators: &[u64]) -> Self {
        let mut values: Vec<QuantizedDuration> = denominators
            .iter()
            .filter(|denom| {
                let legal =
                    denom.is_power_of_two() && **denom <= MAX_DENOMINATOR;
                if !legal {
                    log::warn!("denominator {} is skipped", denom);
                }
                legal
            })
            .flat_map(|denom| {
                [
                    QuantizedDuration::plain(*denom),
                    QuantizedDuration::dotted(*denom),
                ]
            })
            .collect();
        values.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        values.dedup();
        Self { values }
    }

    /// Largest first.
    pub fn values(&self) -> &[QuantizedDuration] {
        &self.values
    }
    pub fn smallest(&self) -> Option<&QuantizedDuration> {
        self.values.last()
    }
    pub fn find(&self, duration: Fraction) -> Option<&QuantizedDuration> {
        self.values.iter().find(|value| value.get() == duration)
    }

    /// Entry of the table with the given length.
    ///
    /// Every token length is taken from here, so only lengths of the
    /// table get into the output.
    pub fn lookup(&self, duration: Fraction) -> ConvertResult<QuantizedDuration> {
        self.find(duration)
            .copied()
            .ok_or(ConvertError::UnknownDuration { duration })
    }
}
impl Default for DurationTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}
