use super::QuadratureDecoder;

/// Edge transitions per mechanical detent.
const COUNTS_PER_DETENT: i64 = 4;

/// Task-side consumer turning raw edge counts into whole detents.
///
/// Counts that do not make up a full detent are carried in a remainder until
/// later reads complete them. For every read,
/// `raw + previous_remainder == 4 * steps + remainder`, with truncating
/// division so the remainder keeps the sign of the running total.
#[derive(Debug, Default)]
pub struct RotationReader {
    remainder: i64,
}

impl RotationReader {
    /// Reader with an empty remainder.
    pub const fn new() -> Self {
        Self { remainder: 0 }
    }

    /// Take the decoder's count and convert it to detents.
    pub fn take_steps(&mut self, decoder: &QuadratureDecoder) -> i16 {
        self.fold(decoder.take_count())
    }

    /// Convert `raw` edge counts, carrying the remainder.
    ///
    /// A result beyond the `i16` range saturates; the excess stays in the
    /// remainder and is handed out by later reads.
    #[allow(clippy::arithmetic_side_effects)] // divisor is a non-zero constant
    pub fn fold(&mut self, raw: i32) -> i16 {
        let total = self.remainder.saturating_add(i64::from(raw));
        let whole = total / COUNTS_PER_DETENT;
        let steps = whole.clamp(i64::from(i16::MIN), i64::from(i16::MAX));
        self.remainder = total.saturating_sub(steps.saturating_mul(COUNTS_PER_DETENT));
        i16::try_from(steps).unwrap_or(0)
    }

    /// Counts carried to the next read.
    pub fn remainder(&self) -> i64 {
        self.remainder
    }
}
