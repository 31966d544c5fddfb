//! Application entry point — precision audio scope.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Open the capture device, spawn the ingest thread, start the cpal
//!    stream.
//! 4. Run [`eframe::run_native`] — blocks the main thread until the
//!    window is closed.
//!
//! Capture failure is not fatal: the scope opens with an empty trace and
//! a "NO INPUT" banner so the window, key bindings and read-outs can
//! still be exercised.

use std::sync::mpsc;

use audio_scope::{
    app::ScopeApp,
    audio::{self, AudioCapture, AudioFrame, SharedSampleBuffer, StreamHandle},
    config::AppConfig,
};

use eframe::egui;

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Audio Scope")
        .with_inner_size([width, height])
        .with_min_inner_size([480.0, 240.0]);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("audio scope starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Capture stream + ingest thread.  On any capture failure the scope
    // still opens, just without a signal.
    let (buffer, sample_rate, capture_active, _stream_handle): (
        SharedSampleBuffer,
        u32,
        bool,
        Option<StreamHandle>,
    ) = match AudioCapture::new(&config.audio) {
        Ok(capture) => {
            let sample_rate = capture.sample_rate();
            log::info!(
                "Using input device \"{}\" ({} Hz, {} ch)",
                capture.device_name(),
                sample_rate,
                capture.channels()
            );

            let buffer = audio::shared_buffer(sample_rate);
            let (frame_tx, frame_rx) = mpsc::channel::<AudioFrame>();
            audio::spawn_ingest(frame_rx, buffer.clone(), config.audio.capture_channel);

            match capture.start(frame_tx) {
                Ok(handle) => (buffer, sample_rate, true, Some(handle)),
                // The dropped sender shuts the ingest thread down again.
                Err(e) => {
                    log::warn!("Failed to start audio stream: {e}");
                    (buffer, sample_rate, false, None)
                }
            }
        }
        Err(e) => {
            log::warn!("Audio capture unavailable: {e}");
            let sample_rate = config.audio.sample_rate;
            (audio::shared_buffer(sample_rate), sample_rate, false, None)
        }
    };

    log::info!("Controls: arrows zoom time/amplitude, T toggles the trigger");

    // 4. Run the scope window (blocks until closed)
    let app = ScopeApp::new(buffer, sample_rate, capture_active);
    let options = native_options(&config);

    eframe::run_native("Audio Scope", options, Box::new(move |_cc| Ok(Box::new(app))))
}
