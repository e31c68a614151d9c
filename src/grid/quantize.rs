//! Row resolution of a measure.

use num::Integer;

/// Finds the widest uniform row spacing which places a row on every occupied offset, that is
/// the greatest common divisor of `measure_ticks` and all of `offsets`.
///
/// An empty measure yields `measure_ticks`, which emits a single idle row.
///
/// ```
/// use fnf_sm::grid::quantize::minimal_step;
///
/// assert_eq!(minimal_step([0, 48, 96, 144], 192), 48);
/// assert_eq!(minimal_step([], 192), 192);
/// ```
#[must_use]
pub fn minimal_step(offsets: impl IntoIterator<Item = u64>, measure_ticks: u64) -> u64 {
    let mut step = measure_ticks;
    for offset in offsets {
        step = step.gcd(&offset);
        if step == 1 {
            break;
        }
    }
    step
}
