//! Display trigger — phase-locks successive rendered frames.
//!
//! Without triggering, a periodic waveform drifts across the screen
//! because each frame starts at an arbitrary phase.  [`align`] finds the
//! first rising crossing of the trigger level inside the leading portion
//! of the display window; starting the trace there makes successive
//! frames line up.  Sample-index precision is enough for a stable picture,
//! so no sub-sample interpolation is done here.

// ---------------------------------------------------------------------------
// align
// ---------------------------------------------------------------------------

/// Offset of the first rising crossing of `level` within the first
/// `search_len` samples of `window`.
///
/// The crossing is detected as the first positive first-difference of
/// `signum(sample − level)`, so a rise through the exact level value
/// (sign −1 → 0) triggers as well.  Returns 0 when no crossing is found,
/// and skips the search entirely (returning 0) when the window is shorter
/// than `search_len`.
///
/// # Example
///
/// ```rust
/// use audio_scope::dsp::align;
///
/// let window = [-5_i16, -3, -1, 2, 4, 4, 4, 4];
/// assert_eq!(align(&window, 0, 8), 2); // crossing between index 2 and 3
/// assert_eq!(align(&window, 0, 16), 0); // window shorter than search area
/// ```
pub fn align(window: &[i16], level: i16, search_len: usize) -> usize {
    if search_len == 0 || window.len() < search_len {
        return 0;
    }

    // i32 arithmetic: sample - level would overflow i16 at the extremes.
    let mut prev_sign = (i32::from(window[0]) - i32::from(level)).signum();
    for (i, &s) in window[..search_len].iter().enumerate().skip(1) {
        let sign = (i32::from(s) - i32::from(level)).signum();
        if sign - prev_sign > 0 {
            return i - 1;
        }
        prev_sign = sign;
    }
    0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_upward_crossing_found() {
        // Crosses zero between index 3 and 4.
        let window = [-4_i16, -3, -2, -1, 1, 2, 3, 4];
        assert_eq!(align(&window, 0, 8), 3);
    }

    #[test]
    fn first_of_two_crossings_wins() {
        let window = [-2_i16, 1, -2, 1, -2, 1, -2, 1];
        assert_eq!(align(&window, 0, 8), 0);
    }

    #[test]
    fn no_crossing_returns_zero() {
        let window = [5_i16, 6, 7, 8];
        assert_eq!(align(&window, 0, 4), 0);
    }

    #[test]
    fn falling_crossing_ignored() {
        let window = [4_i16, 3, 2, 1, -1, -2, -3, -4];
        assert_eq!(align(&window, 0, 8), 0);
    }

    #[test]
    fn window_shorter_than_search_area_skipped() {
        // A crossing exists, but the window doesn't cover the search area.
        let window = [-4_i16, -2, 2, 4];
        assert_eq!(align(&window, 0, 8), 0);
    }

    #[test]
    fn window_exactly_search_length_searched() {
        let window = [-4_i16, -2, 2, 4];
        assert_eq!(align(&window, 0, 4), 1);
    }

    #[test]
    fn crossing_outside_search_area_ignored() {
        let mut window = vec![-1_i16; 8];
        window.extend([1_i16; 8]); // crossing at index 7→8
        assert_eq!(align(&window, 0, 4), 0);
    }

    #[test]
    fn nonzero_level_respected() {
        // Crosses 100 between index 2 and 3 (crosses zero earlier).
        let window = [-50_i16, 10, 60, 150, 200, 200, 200, 200];
        assert_eq!(align(&window, 100, 8), 2);
    }

    #[test]
    fn rise_through_exact_level_triggers() {
        // signum goes -1 → 0 at index 2: that first difference is positive.
        let window = [-10_i16, -5, 0, 5, 10, 10, 10, 10];
        assert_eq!(align(&window, 0, 8), 1);
    }

    #[test]
    fn extreme_levels_do_not_overflow() {
        let window = [i16::MAX, i16::MIN, i16::MAX, i16::MIN];
        // sample − level spans the full i16 range twice over; the i32
        // arithmetic must survive and find the MIN → MAX rise.
        assert_eq!(align(&window, 0, 4), 1);
    }

    #[test]
    fn zero_search_length_returns_zero() {
        let window = [-1_i16, 1];
        assert_eq!(align(&window, 0, 0), 0);
    }

    #[test]
    fn empty_window_returns_zero() {
        assert_eq!(align(&[], 0, 4), 0);
    }
}
