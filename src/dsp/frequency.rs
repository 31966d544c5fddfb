//! Zero-crossing fundamental-frequency estimation.
//!
//! The estimator is a pure function over a sample window.  It is built for
//! responsive read-outs on live signals rather than metrological accuracy:
//!
//! * DC removal — the window mean is subtracted first, so a biased input
//!   (common with cheap capture hardware) measures the same as a centred
//!   one.
//! * Hysteresis — a crossing is only counted after the signal has dipped
//!   below `-5%` of the window peak, so noise wobbling around the zero
//!   line cannot re-trigger within one cycle.
//! * Sub-sample interpolation — each crossing time is refined by linear
//!   interpolation between the two straddling samples.
//! * Median of periods — an isolated glitch period (double-trigger or
//!   missed cycle) does not move the result.

/// Hysteresis band as a fraction of the window's peak amplitude.
pub const HYST_FRAC: f64 = 0.05;

// ---------------------------------------------------------------------------
// estimate
// ---------------------------------------------------------------------------

/// Estimate the fundamental frequency of `window` in Hz.
///
/// Returns `None` when no estimate is possible: fewer than 2 samples, a
/// silent/flat signal, or fewer than two detected crossings.  A returned
/// frequency is always strictly positive and finite.
///
/// # Arguments
///
/// * `window` — signed 16-bit PCM samples, single channel.
/// * `sample_rate` — capture rate in Hz; must be non-zero.
///
/// # Example
///
/// ```rust
/// use audio_scope::dsp::estimate;
///
/// // 480 Hz square wave at 48 kHz: 50 low samples, 50 high, repeated.
/// let mut wave = Vec::new();
/// for _ in 0..20 {
///     wave.extend(std::iter::repeat(-10_000_i16).take(50));
///     wave.extend(std::iter::repeat(10_000_i16).take(50));
/// }
/// let freq = estimate(&wave, 48_000).unwrap();
/// assert!((freq - 480.0).abs() < 1.0);
/// ```
pub fn estimate(window: &[i16], sample_rate: u32) -> Option<f64> {
    if window.len() < 2 || sample_rate == 0 {
        return None;
    }

    // Remove the DC component.
    let mean = window.iter().map(|&s| f64::from(s)).sum::<f64>() / window.len() as f64;
    let x: Vec<f64> = window.iter().map(|&s| f64::from(s) - mean).collect();

    let peak = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let peak = if peak == 0.0 { 1.0 } else { peak };
    let th = peak * HYST_FRAC;

    // Hysteretic scan: a full negative excursion below -th arms detection
    // of the next upward zero crossing; the crossing disarms it again.
    let mut crossings_t: Vec<f64> = Vec::new();
    let mut armed = false;

    for i in 1..x.len() {
        let (a, b) = (x[i - 1], x[i]);

        if !armed {
            if b <= -th {
                armed = true;
            }
            continue;
        }

        // Upward zero crossing
        if a < 0.0 && b >= 0.0 {
            // Linear interpolation for sub-sample accuracy
            let denom = b - a;
            let frac = if denom != 0.0 { -a / denom } else { 0.0 };
            crossings_t.push((i as f64 - 1.0 + frac) / f64::from(sample_rate));
            armed = false;
        }
    }

    if crossings_t.len() < 2 {
        return None;
    }

    let mut periods: Vec<f64> = crossings_t.windows(2).map(|w| w[1] - w[0]).collect();
    let t = median(&mut periods);
    if t <= 0.0 {
        return None;
    }
    Some(1.0 / t)
}

/// Median of `values`; an even count averages the two middle elements.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
