//! Audio modem library for transporting files over an acoustic channel
//!
//! Uses 256-tone FSK with Reed-Solomon FEC. One symbol carries one byte;
//! tone detection is Goertzel-based so decoding survives loudspeaker to
//! microphone recapture at moderate SNR.

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fec;
pub mod framing;
pub mod fsk;
pub mod gf256;
pub mod sync;
pub mod wav;

pub use decoder::{DecodedFile, Decoder};
pub use encoder::Encoder;
pub use error::{ModemError, Result};

// Configuration constants
pub const SAMPLE_RATE: usize = 44_100;
pub const SYMBOL_DURATION_MS: usize = 30;
pub const SAMPLES_PER_SYMBOL: usize = (SAMPLE_RATE * SYMBOL_DURATION_MS) / 1000; // 1323

// FSK configuration
pub const NUM_TONES: usize = 256;
pub const BASE_FREQ: f32 = 2000.0; // Hz
pub const FREQ_SPACING: f32 = 50.0; // Hz
pub const SYNC_FREQ: f32 = 1000.0; // Hz
pub const TONE_AMPLITUDE: f32 = 0.7;

// Frame configuration
pub const PREAMBLE_SYMBOLS: usize = 5;
pub const PREAMBLE_SAMPLES: usize = PREAMBLE_SYMBOLS * SAMPLES_PER_SYMBOL; // 6615
pub const LENGTH_SYMBOLS: usize = 4;

// FEC configuration
pub const RS_DATA_BYTES: usize = 223;
pub const RS_TOTAL_BYTES: usize = 255;
pub const RS_PARITY_BYTES: usize = RS_TOTAL_BYTES - RS_DATA_BYTES; // 32

/// Minimum Goertzel magnitude for a window to count as a sync tone.
/// Calibrated for samples in [-1, 1]; see `sync::find_preambles`.
pub const SYNC_MAGNITUDE_THRESHOLD: f32 = 10.0;
