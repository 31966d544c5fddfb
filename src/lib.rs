//! Real-time audio oscilloscope with live fundamental-frequency read-out.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioFrame (mpsc) → ingest thread
//!           → extract_channel → RingBuffer<i16> ←─ AnalysisCycle (UI tick)
//!                                                   ├─ dsp::frequency::estimate
//!                                                   └─ dsp::trigger::align
//! ```
//!
//! The producer side (`audio`) and the consumer side (`scope`) share a
//! single [`audio::RingBuffer`] behind a mutex; the lock is held only to
//! append or to copy a snapshot, never during analysis.

pub mod app;
pub mod audio;
pub mod config;
pub mod dsp;
pub mod scope;
