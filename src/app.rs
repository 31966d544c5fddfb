//! Oscilloscope window — egui/eframe application.
//!
//! # Architecture
//!
//! [`ScopeApp`] is the top-level [`eframe::App`].  It owns the consumer
//! side of the instrument: the [`ScopeState`] display parameters, the
//! [`AnalysisCycle`], and a handle to the shared sample buffer filled by
//! the ingest thread.  Every frame it maps key presses onto state
//! adjustments, runs one analysis tick, and paints the trace.
//!
//! # Controls
//!
//! | Key | Action |
//! |-----|--------|
//! | `←` / `→` | Zoom the time axis in / out |
//! | `↑` / `↓` | Zoom the amplitude axis in / out |
//! | `T` | Toggle the display trigger |

use std::time::Duration;

use eframe::egui;

use crate::audio::SharedSampleBuffer;
use crate::scope::{AnalysisCycle, ScopeState};

/// Render cadence — repaint roughly 30 times per second.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Longest line strip handed to the painter; denser slices are decimated.
const MAX_TRACE_POINTS: usize = 2_048;

// ---------------------------------------------------------------------------
// ScopeApp
// ---------------------------------------------------------------------------

/// eframe application — the scope window.
pub struct ScopeApp {
    /// Display parameters, mutated by the keyboard handlers.
    state: ScopeState,
    /// Consumer-side analysis driver.
    cycle: AnalysisCycle,
    /// Sample ring shared with the ingest thread.
    buffer: SharedSampleBuffer,
    /// Capture rate, for the buffer-fill read-out.
    sample_rate: u32,
    /// Whether a capture stream is running (false → banner is shown).
    capture_active: bool,
}

impl ScopeApp {
    /// Create a new [`ScopeApp`].
    ///
    /// * `buffer`         — ring buffer the ingest thread appends to.
    /// * `sample_rate`    — actual capture rate in Hz.
    /// * `capture_active` — false when no input stream could be opened;
    ///   the scope still runs, displaying an empty trace.
    pub fn new(buffer: SharedSampleBuffer, sample_rate: u32, capture_active: bool) -> Self {
        Self {
            state: ScopeState::new(),
            cycle: AnalysisCycle::new(sample_rate),
            buffer,
            sample_rate,
            capture_active,
        }
    }

    // ── Keyboard handling ────────────────────────────────────────────────

    /// Map this frame's key presses onto state adjustments.
    fn handle_keys(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowRight) {
                self.state.zoom_time_out();
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                self.state.zoom_time_in();
            }
            if i.key_pressed(egui::Key::ArrowUp) {
                self.state.zoom_amplitude_in();
            }
            if i.key_pressed(egui::Key::ArrowDown) {
                self.state.zoom_amplitude_out();
            }
            if i.key_pressed(egui::Key::T) {
                self.state.toggle_trigger();
            }
        });
    }

    // ── Painting ─────────────────────────────────────────────────────────

    /// Paint the trace and the status read-outs into the full panel.
    fn draw_scope(&self, ui: &mut egui::Ui, display: &[i16]) {
        let (rect, _) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        let painter = ui.painter_at(rect);

        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        // Zero line
        painter.line_segment(
            [
                egui::pos2(rect.left(), rect.center().y),
                egui::pos2(rect.right(), rect.center().y),
            ],
            egui::Stroke::new(1.0, egui::Color32::from_rgb(0, 68, 0)),
        );

        self.draw_trace(&painter, rect, display);

        // Frequency read-out, top-left
        painter.text(
            rect.left_top() + egui::vec2(10.0, 8.0),
            egui::Align2::LEFT_TOP,
            self.state.frequency_label(),
            egui::FontId::proportional(18.0),
            egui::Color32::YELLOW,
        );

        // Control line, bottom-left
        let buffered = self
            .buffer
            .lock()
            .map(|buf| buf.duration_secs(self.sample_rate))
            .unwrap_or(0.0);
        painter.text(
            rect.left_bottom() + egui::vec2(10.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            format!("{} | Buffer: {buffered:.1}s", self.state.controls_label()),
            egui::FontId::proportional(12.0),
            egui::Color32::from_rgb(200, 200, 200),
        );

        if !self.capture_active {
            painter.text(
                rect.right_top() + egui::vec2(-10.0, 8.0),
                egui::Align2::RIGHT_TOP,
                "NO INPUT",
                egui::FontId::proportional(14.0),
                egui::Color32::from_rgb(255, 136, 68),
            );
        }
    }

    /// Paint the waveform as a line strip scaled to `±y_limit`.
    fn draw_trace(&self, painter: &egui::Painter, rect: egui::Rect, display: &[i16]) {
        if display.len() < 2 {
            return;
        }

        // Decimate long slices; the painter gains nothing from more
        // points than it has horizontal pixels.
        let stride = (display.len() / MAX_TRACE_POINTS).max(1);
        let samples: Vec<i16> = display.iter().step_by(stride).copied().collect();

        let n = samples.len();
        let half_height = rect.height() / 2.0;
        let points: Vec<egui::Pos2> = samples
            .iter()
            .enumerate()
            .map(|(i, &s)| {
                let x = rect.left() + i as f32 / (n - 1) as f32 * rect.width();
                let y = rect.center().y - f32::from(s) / self.state.y_limit * half_height;
                egui::pos2(x, y.clamp(rect.top(), rect.bottom()))
            })
            .collect();

        painter.add(egui::Shape::line(
            points,
            egui::Stroke::new(1.5, egui::Color32::from_rgb(0, 255, 0)),
        ));
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for ScopeApp {
    /// Called every frame by eframe: keys → analysis tick → paint.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);

        let display = self.cycle.tick(&self.buffer, &mut self.state);

        let frame = egui::Frame::new().fill(egui::Color32::BLACK);
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            self.draw_scope(ui, &display);
        });

        // Keep the trace live even without input events.
        ctx.request_repaint_after(FRAME_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("scope window closing");
    }
}
