//! Microphone / line-in capture via `cpal`.
//!
//! [`AudioCapture`] wraps the cpal host/device/stream lifecycle.  Call
//! [`AudioCapture::start`] to begin streaming [`AudioFrame`]s over an mpsc
//! channel.  The returned [`StreamHandle`] is a RAII guard — dropping it
//! stops the underlying cpal stream.
//!
//! Samples are delivered **raw**: interleaved `i16` at the device's channel
//! count and sample rate.  Devices that produce `f32` are converted to
//! `i16` in the callback; deinterleaving is left to the ingest side (see
//! [`crate::audio::extract_channel`]).

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Sample, SampleFormat, SampleRate, SupportedStreamConfigRange};
use std::sync::mpsc;
use thiserror::Error;

use crate::config::AudioConfig;

// ---------------------------------------------------------------------------
// AudioFrame
// ---------------------------------------------------------------------------

/// A single buffer of raw audio as delivered by the cpal callback.
///
/// Samples are interleaved signed 16-bit PCM.  Frame boundaries follow the
/// hardware's delivery cadence and carry no timing guarantees beyond sample
/// order.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Interleaved PCM samples in `-32768..=32767`.
    pub samples: Vec<i16>,
    /// Sample rate of this frame in Hz (e.g. 44100, 48000).
    pub sample_rate: u32,
    /// Number of interleaved channels (1 = mono, 2 = stereo, …).
    pub channels: u16,
}

// ---------------------------------------------------------------------------
// StreamHandle
// ---------------------------------------------------------------------------

/// RAII guard that keeps the cpal stream alive.
///
/// Dropping this value calls `cpal::Stream::drop` which pauses/stops the
/// underlying hardware stream.
pub struct StreamHandle {
    _stream: cpal::Stream,
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Errors that can occur while setting up or running the audio capture.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device found on the default audio host")]
    NoDevice,

    #[error("no input device matching \"{0}\" found")]
    DeviceNotFound(String),

    #[error("failed to enumerate input devices: {0}")]
    Devices(#[from] cpal::DevicesError),

    #[error("failed to query default input config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("device sample format {0:?} is not supported (need i16 or f32)")]
    UnsupportedFormat(cpal::SampleFormat),

    #[error("failed to build input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),
}

// ---------------------------------------------------------------------------
// AudioCapture
// ---------------------------------------------------------------------------

/// Input-device wrapper built on top of `cpal`.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::mpsc;
/// use audio_scope::audio::{AudioCapture, AudioFrame};
/// use audio_scope::config::AudioConfig;
///
/// let (tx, rx) = mpsc::channel::<AudioFrame>();
/// let capture = AudioCapture::new(&AudioConfig::default()).unwrap();
/// let _handle = capture.start(tx).unwrap();
/// // `_handle` keeps the stream alive; drop it to stop capturing.
/// ```
pub struct AudioCapture {
    device: cpal::Device,
    config: cpal::StreamConfig,
    sample_format: SampleFormat,
    /// Actual sample rate of the selected stream config (Hz).
    sample_rate: u32,
    /// Number of interleaved channels in each [`AudioFrame`].
    channels: u16,
}

impl AudioCapture {
    /// Create a new [`AudioCapture`] from the audio preferences.
    ///
    /// Device selection: when `prefs.device` is set, the first input device
    /// whose name contains that substring wins; otherwise the system
    /// default input device is used.
    ///
    /// Config selection: among the device's supported configs with an
    /// `i16` or `f32` sample format, the one whose rate range lies closest
    /// to `prefs.sample_rate` is chosen, clamped into that range.  When
    /// the device reports no such config the default input config is used
    /// as-is (its format is re-checked in [`start`](Self::start)).
    ///
    /// # Errors
    ///
    /// [`CaptureError::NoDevice`] / [`CaptureError::DeviceNotFound`] when
    /// no usable device exists, or a cpal enumeration error.
    pub fn new(prefs: &AudioConfig) -> Result<Self, CaptureError> {
        let host = cpal::default_host();

        let device = match &prefs.device {
            Some(name) => host
                .input_devices()?
                .find(|d| d.name().map(|n| n.contains(name.as_str())).unwrap_or(false))
                .ok_or_else(|| CaptureError::DeviceNotFound(name.clone()))?,
            None => host.default_input_device().ok_or(CaptureError::NoDevice)?,
        };

        let supported = match device
            .supported_input_configs()
            .ok()
            .and_then(|configs| pick_config(configs.collect(), prefs.sample_rate))
        {
            Some(config) => config,
            None => device.default_input_config()?,
        };

        let sample_format = supported.sample_format();
        let channels = supported.channels();
        let sample_rate = supported.sample_rate().0;
        let config: cpal::StreamConfig = supported.into();

        Ok(Self {
            device,
            config,
            sample_format,
            sample_rate,
            channels,
        })
    }

    /// Start capturing and send [`AudioFrame`]s to `tx`.
    ///
    /// The cpal callback runs on a dedicated audio thread; each time the
    /// hardware delivers a buffer the samples are forwarded over the
    /// channel.  Send errors (receiver dropped) are silently ignored so
    /// the audio thread never panics.
    ///
    /// # Errors
    ///
    /// [`CaptureError::UnsupportedFormat`] when the device produces a
    /// sample format other than `i16` or `f32`, or
    /// [`CaptureError::BuildStream`] / [`CaptureError::PlayStream`] if the
    /// platform rejects the stream configuration.
    pub fn start(&self, tx: mpsc::Sender<AudioFrame>) -> Result<StreamHandle, CaptureError> {
        let sample_rate = self.sample_rate;
        let channels = self.channels;

        let err_fn = |err: cpal::StreamError| {
            log::error!("cpal stream error: {err}");
        };

        let stream = match self.sample_format {
            SampleFormat::I16 => self.device.build_input_stream(
                &self.config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    let frame = AudioFrame {
                        samples: data.to_vec(),
                        sample_rate,
                        channels,
                    };
                    // Ignore send errors; the receiver may have been dropped.
                    let _ = tx.send(frame);
                },
                err_fn,
                None, // no timeout
            )?,
            SampleFormat::F32 => self.device.build_input_stream(
                &self.config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let frame = AudioFrame {
                        samples: data.iter().map(|&s| i16::from_sample(s)).collect(),
                        sample_rate,
                        channels,
                    };
                    let _ = tx.send(frame);
                },
                err_fn,
                None,
            )?,
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };

        stream.play()?;
        Ok(StreamHandle { _stream: stream })
    }

    /// Actual sample rate of the capture stream in Hz.
    ///
    /// This is the rate the stream was opened with (the configured
    /// preference when the device supports it, commonly 48 000 Hz).
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of interleaved channels in each [`AudioFrame`].
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Human-readable device name, for the startup log.
    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "<unknown>".into())
    }
}

/// Pick the supported config range closest to `target_rate`, restricted to
/// sample formats the stream builder can handle.
fn pick_config(
    configs: Vec<SupportedStreamConfigRange>,
    target_rate: u32,
) -> Option<cpal::SupportedStreamConfig> {
    let range = configs
        .into_iter()
        .filter(|c| matches!(c.sample_format(), SampleFormat::I16 | SampleFormat::F32))
        .min_by_key(|c| {
            let min_diff = (c.min_sample_rate().0 as i64 - target_rate as i64).abs();
            let max_diff = (c.max_sample_rate().0 as i64 - target_rate as i64).abs();
            min_diff.min(max_diff)
        })?;

    let rate = target_rate.clamp(range.min_sample_rate().0, range.max_sample_rate().0);
    Some(range.with_sample_rate(SampleRate(rate)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// `AudioFrame` must be `Send` so it can cross thread boundaries.
    #[test]
    fn audio_frame_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AudioFrame>();
    }

    #[test]
    fn audio_frame_fields() {
        let frame = AudioFrame {
            samples: vec![0_i16; 512],
            sample_rate: 48_000,
            channels: 2,
        };
        assert_eq!(frame.samples.len(), 512);
        assert_eq!(frame.sample_rate, 48_000);
        assert_eq!(frame.channels, 2);
    }

    #[test]
    fn f32_conversion_saturates() {
        // cpal's FromSample clamps out-of-range floats instead of wrapping.
        assert_eq!(i16::from_sample(0.0_f32), 0);
        assert_eq!(i16::from_sample(2.0_f32), i16::MAX);
        assert_eq!(i16::from_sample(-2.0_f32), i16::MIN);
    }
}
