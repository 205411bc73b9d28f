//! Numeric helpers centralizing rounding and safe casts.

use num_traits::cast::cast;

/// Round to two decimal places, half away from zero.
///
/// Matches the display convention for expected stats: `16.505` becomes
/// `16.51`, not `16.50`. Non-finite inputs collapse to 0.0.
#[must_use]
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Index into a sorted sample vector for the requested percentile.
///
/// Computes `round(samples * percentile / 100)` and clamps it into
/// `0..samples`, so extreme percentiles with small sample counts never index
/// past the end. Returns 0 when `samples` is 0.
#[must_use]
pub fn percentile_index(samples: usize, percentile: u8) -> usize {
    if samples == 0 {
        return 0;
    }
    let raw = cast::<usize, f64>(samples).unwrap_or(0.0) * f64::from(percentile) / 100.0;
    let index = cast::<f64, usize>(raw.round()).unwrap_or(0);
    index.min(samples - 1)
}
