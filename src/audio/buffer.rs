//! Fixed-capacity circular (ring) buffer for PCM samples.
//!
//! When the buffer is full, new samples **overwrite** the oldest data so
//! that the most-recent `capacity` samples are always available.  This
//! matches the oscilloscope scenario: the display and the frequency
//! estimator only ever look at the tail of the signal, never the head.
//!
//! The producer appends with [`RingBuffer::push_slice`]; the consumer reads
//! with [`RingBuffer::snapshot`], which copies the stored samples out in
//! chronological order without consuming them — the same tail can be
//! re-read on every render tick.
//!
//! # Example
//!
//! ```rust
//! use audio_scope::audio::RingBuffer;
//!
//! let mut buf = RingBuffer::new(4);
//! buf.push_slice(&[1_i16, 2, 3, 4, 5]); // 5 items → capacity 4 → oldest dropped
//! assert_eq!(buf.snapshot(), vec![2, 3, 4, 5]);
//! assert_eq!(buf.len(), 4); // snapshot does not consume
//! ```

// ---------------------------------------------------------------------------
// RingBuffer
// ---------------------------------------------------------------------------

/// A fixed-capacity circular buffer.
///
/// Generic over `T: Copy + Default` so it can store any `Copy` scalar,
/// though the capture pipeline uses `RingBuffer<i16>` exclusively.
///
/// ## Overflow behaviour
///
/// When [`push_slice`](Self::push_slice) would exceed `capacity`, the
/// oldest samples are silently overwritten.  The buffer never allocates
/// beyond its initial capacity and never applies backpressure to the
/// producer.
pub struct RingBuffer<T> {
    buf: Vec<T>,
    capacity: usize,
    /// Index of the *next* write position (wraps around `capacity`).
    write_pos: usize,
    /// Number of valid samples currently stored (≤ `capacity`).
    len: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Create a new ring buffer with the given `capacity`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "RingBuffer capacity must be > 0");
        Self {
            buf: vec![T::default(); capacity],
            capacity,
            write_pos: 0,
            len: 0,
        }
    }

    /// Append `data` to the buffer.
    ///
    /// If the total number of samples exceeds `capacity`, the oldest
    /// samples are overwritten (circular behaviour).  O(1) per sample.
    pub fn push_slice(&mut self, data: &[T]) {
        for &item in data {
            self.buf[self.write_pos] = item;
            self.write_pos = (self.write_pos + 1) % self.capacity;
            if self.len < self.capacity {
                self.len += 1;
            }
        }
    }

    /// Copy all stored samples out in chronological order.
    ///
    /// The buffer is left untouched — unlike a drain, the same tail can be
    /// snapshotted again on the next tick.  An empty buffer yields an
    /// empty vector.
    pub fn snapshot(&self) -> Vec<T> {
        if self.len == 0 {
            return Vec::new();
        }

        // When the buffer has never been fully filled, valid data starts at 0.
        // When the buffer is full (overflow has occurred), the oldest sample
        // sits at `write_pos` (the position the *next* write would go to).
        let read_pos = if self.len < self.capacity {
            0
        } else {
            self.write_pos
        };

        let mut result = Vec::with_capacity(self.len);
        for i in 0..self.len {
            result.push(self.buf[(read_pos + i) % self.capacity]);
        }
        result
    }

    /// Number of valid samples currently stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the buffer contains no samples.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of samples the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns `true` when the buffer has been filled to capacity at least
    /// once (i.e. overwrite occurs on the next push).
    pub fn is_full(&self) -> bool {
        self.len == self.capacity
    }

    /// Duration of the stored audio in seconds, assuming `sample_rate` Hz.
    pub fn duration_secs(&self, sample_rate: u32) -> f32 {
        if sample_rate == 0 {
            return 0.0;
        }
        self.len as f32 / sample_rate as f32
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
