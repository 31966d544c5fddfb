//! Per-tick analysis — snapshot, rate-limited estimation, display slice.
//!
//! [`AnalysisCycle`] is the consumer side of the instrument.  The UI calls
//! [`AnalysisCycle::tick`] once per render frame (~33 ms); the cycle copies
//! a snapshot out of the shared ring buffer, recomputes the frequency
//! estimate at most once per [`HOP_INTERVAL`], and prepares the display
//! slice, trigger-aligned when triggering is enabled.
//!
//! The ring buffer lock is released before any analysis runs, so the
//! ingest thread can keep appending while `estimate`/`align` work on the
//! copy.  A tick never panics: any failure degrades to an empty display
//! frame and the previous read-outs persist.

use std::time::{Duration, Instant};

use crate::audio::SharedSampleBuffer;
use crate::dsp;

use super::state::ScopeState;

/// Analysis window for frequency estimation, in seconds.  Fixed and
/// independent of the user-adjustable visual window; two seconds of
/// signal gives the period median enough cycles to settle on low notes.
pub const WINDOW_SECS: f64 = 2.0;

/// Minimum interval between frequency recomputations.
pub const HOP_INTERVAL: Duration = Duration::from_millis(250);

/// Leading samples of the visual slice searched for a trigger crossing.
pub const TRIGGER_SEARCH: usize = 2048;

// ---------------------------------------------------------------------------
// AnalysisCycle
// ---------------------------------------------------------------------------

/// Consumer-side driver: owns the estimation timestamp and produces one
/// display frame per tick.
pub struct AnalysisCycle {
    sample_rate: u32,
    /// When the frequency estimate was last recomputed.
    last_calc: Option<Instant>,
}

impl AnalysisCycle {
    /// Create a cycle for a stream captured at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            last_calc: None,
        }
    }

    /// Run one render tick: returns the samples to display, starting at
    /// the trigger offset.
    ///
    /// Side effects on `state`: `frequency` is overwritten (even with
    /// `None`) whenever the hop interval has elapsed.
    pub fn tick(&mut self, buffer: &SharedSampleBuffer, state: &mut ScopeState) -> Vec<i16> {
        self.tick_at(Instant::now(), buffer, state)
    }

    fn tick_at(
        &mut self,
        now: Instant,
        buffer: &SharedSampleBuffer,
        state: &mut ScopeState,
    ) -> Vec<i16> {
        // Copy the tail out under the lock, analyse after releasing it.
        let snapshot = match buffer.lock() {
            Ok(buf) => buf.snapshot(),
            Err(e) => {
                log::warn!("sample buffer lock poisoned, skipping tick: {e}");
                return Vec::new();
            }
        };

        // 1. Frequency recomputation, rate-limited to the hop interval.
        let due = self
            .last_calc
            .map_or(true, |t| now.duration_since(t) >= HOP_INTERVAL);
        if due {
            self.last_calc = Some(now);
            let needed = (f64::from(self.sample_rate) * WINDOW_SECS) as usize;
            state.frequency = dsp::estimate(tail(&snapshot, needed), self.sample_rate);
        }

        // 2. Visual slice for this frame.
        let num_vis = (f64::from(self.sample_rate) * state.time_window) as usize;
        let vis = tail(&snapshot, num_vis);

        // 3. Trigger alignment (display-only; the signal is not modified).
        let offset = if state.trigger_on {
            dsp::align(vis, state.trigger_level, TRIGGER_SEARCH)
        } else {
            0
        };

        vis[offset..].to_vec()
    }
}

/// The most recent `n` samples of `data` (all of it when shorter).
fn tail(data: &[i16], n: usize) -> &[i16] {
    &data[data.len().saturating_sub(n)..]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{shared_buffer, SharedSampleBuffer};

    const RATE: u32 = 48_000;

    fn sine_wave(freq: f64, secs: f64) -> Vec<i16> {
        let n = (f64::from(RATE) * secs) as usize;
        (0..n)
            .map(|i| {
                let t = i as f64 / f64::from(RATE);
                (12_000.0 * (2.0 * std::f64::consts::PI * freq * t).sin()) as i16
            })
            .collect()
    }

    fn buffer_with(samples: &[i16]) -> SharedSampleBuffer {
        let buffer = shared_buffer(RATE);
        buffer.lock().unwrap().push_slice(samples);
        buffer
    }

    // ---- End-to-end ---------------------------------------------------------

    #[test]
    fn two_seconds_of_200hz_sine_measures_200() {
        let buffer = buffer_with(&sine_wave(200.0, 2.0));
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        cycle.tick(&buffer, &mut state);

        let freq = state.frequency.expect("estimate expected");
        assert!(freq > 198.0 && freq < 202.0, "freq = {freq}");
    }

    #[test]
    fn silent_buffer_yields_no_estimate() {
        let buffer = buffer_with(&vec![0_i16; RATE as usize]); // 1 s of silence
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        cycle.tick(&buffer, &mut state);

        assert_eq!(state.frequency, None);
    }

    #[test]
    fn empty_buffer_degrades_to_empty_frame() {
        let buffer = shared_buffer(RATE);
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        let display = cycle.tick(&buffer, &mut state);

        assert!(display.is_empty());
        assert_eq!(state.frequency, None);
    }

    #[test]
    fn short_capture_still_estimated() {
        // Only 0.5 s available — less than the 2 s analysis window; the
        // estimator runs on what there is.
        let buffer = buffer_with(&sine_wave(200.0, 0.5));
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        cycle.tick(&buffer, &mut state);

        let freq = state.frequency.expect("estimate expected");
        assert!(freq > 198.0 && freq < 202.0, "freq = {freq}");
    }

    // ---- Hop gating --------------------------------------------------------

    #[test]
    fn estimate_not_recomputed_within_hop_interval() {
        let buffer = buffer_with(&sine_wave(200.0, 2.0));
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        let t0 = Instant::now();
        cycle.tick_at(t0, &buffer, &mut state);
        assert!(state.frequency.is_some());

        // Swap the signal; 100 ms later the estimate must be unchanged.
        {
            let mut buf = buffer.lock().unwrap();
            buf.push_slice(&vec![0_i16; (RATE * crate::audio::RETENTION_SECS) as usize]);
        }
        let before = state.frequency;
        cycle.tick_at(t0 + Duration::from_millis(100), &buffer, &mut state);
        assert_eq!(state.frequency, before);
    }

    #[test]
    fn estimate_recomputed_after_hop_interval_even_to_none() {
        let buffer = buffer_with(&sine_wave(200.0, 2.0));
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        let t0 = Instant::now();
        cycle.tick_at(t0, &buffer, &mut state);
        assert!(state.frequency.is_some());

        // Evict the sine entirely, then tick past the hop interval: the
        // stale estimate must be dropped, not kept.
        {
            let mut buf = buffer.lock().unwrap();
            buf.push_slice(&vec![0_i16; (RATE * crate::audio::RETENTION_SECS) as usize]);
        }
        cycle.tick_at(t0 + Duration::from_millis(300), &buffer, &mut state);
        assert_eq!(state.frequency, None);
    }

    // ---- Display slicing ---------------------------------------------------

    #[test]
    fn display_respects_visual_window() {
        let buffer = buffer_with(&sine_wave(200.0, 2.0));
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();
        state.time_window = 0.01; // 480 samples at 48 kHz
        state.trigger_on = false;

        let display = cycle.tick(&buffer, &mut state);
        assert_eq!(display.len(), 480);
    }

    #[test]
    fn trigger_aligns_display_to_rising_edge() {
        // Square wave; the trigger must land the frame start on the last
        // sample before a rising edge.
        let mut wave = Vec::new();
        for _ in 0..500 {
            wave.extend(std::iter::repeat(-10_000_i16).take(50));
            wave.extend(std::iter::repeat(10_000_i16).take(50));
        }
        let buffer = buffer_with(&wave);
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();

        let display = cycle.tick(&buffer, &mut state);

        assert!(display.len() >= 2);
        assert!(display[0] <= 0, "display[0] = {}", display[0]);
        assert!(display[1] > 0, "display[1] = {}", display[1]);
    }

    #[test]
    fn trigger_off_returns_unaligned_slice() {
        let mut wave = vec![5_000_i16; 1_000]; // starts positive
        wave.extend(sine_wave(200.0, 1.0));
        let buffer = buffer_with(&wave);
        let mut cycle = AnalysisCycle::new(RATE);
        let mut state = ScopeState::new();
        state.trigger_on = false;
        state.time_window = 10.0; // whole buffer

        let display = cycle.tick(&buffer, &mut state);
        assert_eq!(display.len(), wave.len());
        assert_eq!(display[0], 5_000);
    }

    // ---- tail helper -------------------------------------------------------

    #[test]
    fn tail_shorter_input_returns_all() {
        let data = [1_i16, 2, 3];
        assert_eq!(tail(&data, 10), &data);
    }

    #[test]
    fn tail_returns_most_recent() {
        let data = [1_i16, 2, 3, 4, 5];
        assert_eq!(tail(&data, 2), &[4, 5]);
    }
}
