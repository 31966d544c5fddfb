//! Acquisition loop — capture frames in, ring buffer samples out.
//!
//! A dedicated thread drains [`AudioFrame`]s from the capture channel,
//! extracts the configured channel, and appends the result to the shared
//! ring buffer.  The mutex is taken only for the append itself, so the
//! capture side is never blocked behind analysis work.
//!
//! Failure policy: malformed frames (zero channels, no samples) are
//! dropped silently; the loop never panics and never reports back to the
//! capture thread.  It exits when the capture side hangs up.

use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::buffer::RingBuffer;
use super::capture::AudioFrame;
use super::channel::extract_channel;

/// Seconds of audio retained in the shared ring buffer.
pub const RETENTION_SECS: u32 = 10;

// ---------------------------------------------------------------------------
// SharedSampleBuffer
// ---------------------------------------------------------------------------

/// Thread-safe sample ring shared between the ingest thread (sole writer)
/// and the render tick (sole reader).
///
/// Lock discipline: hold for a single `push_slice` or `snapshot` only —
/// never across `estimate`/`align`, which run on the snapshot copy.
pub type SharedSampleBuffer = Arc<Mutex<RingBuffer<i16>>>;

/// Construct a [`SharedSampleBuffer`] sized to [`RETENTION_SECS`] of audio
/// at `sample_rate`.
pub fn shared_buffer(sample_rate: u32) -> SharedSampleBuffer {
    Arc::new(Mutex::new(RingBuffer::new(
        (sample_rate * RETENTION_SECS) as usize,
    )))
}

// ---------------------------------------------------------------------------
// Ingest thread
// ---------------------------------------------------------------------------

/// Spawn the acquisition thread.
///
/// Runs [`run_ingest`] until `frame_rx` disconnects (capture stream
/// dropped).
pub fn spawn_ingest(
    frame_rx: Receiver<AudioFrame>,
    buffer: SharedSampleBuffer,
    capture_channel: u16,
) -> JoinHandle<()> {
    std::thread::Builder::new()
        .name("audio-ingest".into())
        .spawn(move || run_ingest(frame_rx, buffer, capture_channel))
        .expect("failed to spawn audio-ingest thread")
}

/// Drain frames until the channel disconnects.
///
/// Deinterleaving happens *before* the lock is taken; the lock is held
/// only for the O(samples) append.
pub fn run_ingest(frame_rx: Receiver<AudioFrame>, buffer: SharedSampleBuffer, capture_channel: u16) {
    while let Ok(frame) = frame_rx.recv() {
        if frame.channels == 0 || frame.samples.is_empty() {
            log::debug!(
                "dropping malformed frame ({} samples, {} channels)",
                frame.samples.len(),
                frame.channels
            );
            continue;
        }

        let picked = extract_channel(&frame.samples, frame.channels, capture_channel);
        if picked.is_empty() {
            continue;
        }

        match buffer.lock() {
            Ok(mut buf) => buf.push_slice(&picked),
            // A poisoned lock means the consumer panicked; keep draining so
            // the capture thread's sends stay cheap.
            Err(e) => log::warn!("sample buffer lock poisoned: {e}"),
        }
    }

    log::info!("capture channel closed, ingest thread exiting");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
