//! Rotary encoder: interrupt-side decoding and task-side reading.
//!
//! ```text
//!   GPIO edge IRQ ──► QuadratureDecoder::on_edge  (counter += table step)
//!                              │   critical section
//!   UI task ───────► RotationReader::take_steps   (count / 4, keep count % 4)
//! ```
//!
//! The decoder is the only writer of the raw count and the reader the only
//! consumer; the hand-over is a single read-and-reset under a critical
//! section, so neither side ever blocks on the other.

mod decoder;
mod reader;

pub use decoder::{step, PhaseLevels, QuadratureDecoder, TRANSITION_TABLE};
pub use reader::RotationReader;
