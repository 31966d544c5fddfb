//! Instrument state — display parameters and their keyboard adjustments.
//!
//! [`ScopeState`] is owned by the UI thread and passed by mutable
//! reference to the input handling and the analysis tick; there is no
//! process-wide singleton.  All fields are plain scalars — the producer
//! side never touches this struct.

/// Zoom step factor shared by the time and amplitude axes.
const ZOOM_STEP: f64 = 1.5;

/// Shortest selectable visual window in seconds (2 ms).
const MIN_TIME_WINDOW: f64 = 0.002;

/// Amplitude axis clamp range, in sample units.
const MIN_Y_LIMIT: f32 = 200.0;
const MAX_Y_LIMIT: f32 = 32_768.0;

// ---------------------------------------------------------------------------
// ScopeState
// ---------------------------------------------------------------------------

/// Mutable display parameters plus the latest frequency estimate.
#[derive(Debug, Clone)]
pub struct ScopeState {
    /// Visual window length in seconds (time-axis zoom).
    pub time_window: f64,
    /// Vertical scale: the displayed range is `±y_limit` sample units.
    pub y_limit: f32,
    /// Whether display triggering is active.
    pub trigger_on: bool,
    /// Trigger level in sample units.
    pub trigger_level: i16,
    /// Most recent frequency estimate in Hz; `None` until the estimator
    /// has locked onto a signal.
    pub frequency: Option<f64>,
}

impl ScopeState {
    /// State at startup: 1 s window, full vertical range, trigger on.
    pub fn new() -> Self {
        Self {
            time_window: 1.0,
            y_limit: MAX_Y_LIMIT,
            trigger_on: true,
            trigger_level: 0,
            frequency: None,
        }
    }

    // ── Keyboard operations ──────────────────────────────────────────────

    /// Widen the visual window (zoom out on the time axis).
    pub fn zoom_time_out(&mut self) {
        self.time_window *= ZOOM_STEP;
    }

    /// Narrow the visual window (zoom in on the time axis), floored at
    /// 2 ms.
    pub fn zoom_time_in(&mut self) {
        self.time_window = (self.time_window / ZOOM_STEP).max(MIN_TIME_WINDOW);
    }

    /// Shrink the vertical range (zoom in on the amplitude axis).
    pub fn zoom_amplitude_in(&mut self) {
        self.y_limit = (self.y_limit / ZOOM_STEP as f32).max(MIN_Y_LIMIT);
    }

    /// Grow the vertical range (zoom out on the amplitude axis), capped
    /// at the full 16-bit span.
    pub fn zoom_amplitude_out(&mut self) {
        self.y_limit = (self.y_limit * ZOOM_STEP as f32).min(MAX_Y_LIMIT);
    }

    /// Flip display triggering on or off.
    pub fn toggle_trigger(&mut self) {
        self.trigger_on = !self.trigger_on;
    }

    // ── Read-outs ────────────────────────────────────────────────────────

    /// Frequency read-out for the status display.
    pub fn frequency_label(&self) -> String {
        match self.frequency {
            Some(f) => format!("Frequency: {f:.3} Hz"),
            None => "Frequency: syncing...".into(),
        }
    }

    /// Control-line read-out: window length, vertical scale, trigger.
    pub fn controls_label(&self) -> String {
        format!(
            "Window: {:.0}ms | Scale: {:.0} | Trigger: {} [T]",
            self.time_window * 1_000.0,
            self.y_limit,
            if self.trigger_on { "ON" } else { "OFF" },
        )
    }
}

impl Default for ScopeState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
