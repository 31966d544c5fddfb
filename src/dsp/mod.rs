//! Signal processing — pure functions over sample windows.
//!
//! Both entry points are synchronous, allocation-light, and bounded by the
//! window length; they are always called on a snapshot copied out of the
//! ring buffer, never under its lock.

pub mod frequency;
pub mod trigger;

pub use frequency::{estimate, HYST_FRAC};
pub use trigger::align;
