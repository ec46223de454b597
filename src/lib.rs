//! Pinch-to-draw: paint on a mirrored webcam feed by pinching thumb and index
//! finger together.
//!
//! Each frame the hand tracker yields 21 normalized landmarks (or nothing).
//! The session measures the thumb-to-index gap, smooths the index tip into a
//! cursor, and runs a two-state stroke recorder that paints onto a persistent
//! RGBA canvas with undo/redo snapshots.
//!
//! | Module | Role |
//! |--------|------|
//! | [`gesture`] | distance, projection, pinch threshold |
//! | [`smoothing`] | exponential cursor smoothing |
//! | [`recorder`] | `Idle`/`Drawing` stroke state machine |
//! | [`history`] | bounded undo stack and redo stack |
//! | [`surface`] | [`surface::RasterSurface`] seam and the PNG-snapshotting [`surface::Canvas`] |
//! | [`session`] | per-frame pipeline owning all of the above |
//! | [`source`] | non-blocking landmark polling |
//! | [`tracker`] | external detector process and mouse fallback |
//! | [`config`] | `PINCH_*` environment configuration |
//! | [`controls`], [`compose`], [`overlay`], [`hud`], [`gamma`] | window-side helpers |

pub mod compose;
pub mod config;
pub mod controls;
pub mod error;
pub mod gamma;
pub mod gesture;
pub mod history;
pub mod hud;
pub mod overlay;
pub mod recorder;
pub mod session;
pub mod smoothing;
pub mod source;
pub mod surface;
pub mod tracker;
pub mod types;

#[cfg(test)]
mod test_support;

pub use error::Error;
