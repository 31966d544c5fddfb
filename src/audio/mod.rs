//! Audio pipeline — capture → channel extraction → shared ring buffer.
//!
//! # Pipeline
//!
//! ```text
//! Device → cpal callback → AudioFrame (mpsc) → ingest thread
//!        → extract_channel → RingBuffer<i16> (Arc<Mutex<…>>)
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::mpsc;
//! use audio_scope::audio::{self, AudioCapture, AudioFrame};
//! use audio_scope::config::AudioConfig;
//!
//! let prefs = AudioConfig::default();
//! let capture = AudioCapture::new(&prefs).unwrap();
//!
//! let (tx, rx) = mpsc::channel::<AudioFrame>();
//! let buffer = audio::shared_buffer(capture.sample_rate());
//! let _ingest = audio::spawn_ingest(rx, buffer.clone(), prefs.capture_channel);
//! let _handle = capture.start(tx).unwrap(); // drop handle → stops stream
//! ```

pub mod buffer;
pub mod capture;
pub mod channel;
pub mod ingest;

pub use buffer::RingBuffer;
pub use capture::{AudioCapture, AudioFrame, CaptureError, StreamHandle};
pub use channel::extract_channel;
pub use ingest::{shared_buffer, spawn_ingest, SharedSampleBuffer, RETENTION_SECS};
