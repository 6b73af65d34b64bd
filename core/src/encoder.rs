//! File → audio pipeline: packet framing, Reed-Solomon FEC, FSK modulation.

use crate::error::{ModemError, Result};
use crate::fec::FecEncoder;
use crate::framing;
use crate::fsk::FskModulator;
use crate::sync::generate_preamble;
use crate::{LENGTH_SYMBOLS, SAMPLES_PER_SYMBOL, SAMPLE_RATE};
use tracing::info;

pub struct Encoder {
    fec: FecEncoder,
    fsk: FskModulator,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            fec: FecEncoder::new(),
            fsk: FskModulator::new(),
        }
    }

    /// Encode a file into audio samples.
    ///
    /// Wire order: preamble, 4 length symbols (LE byte count of the
    /// FEC-encoded stream), one symbol per encoded byte, trailing preamble.
    pub fn encode(&self, file_name: &[u8], payload: &[u8]) -> Result<Vec<f32>> {
        let packet = framing::build_packet(file_name, payload)?;
        let encoded = self.fec.encode(&packet);
        let encoded_len = u32::try_from(encoded.len())
            .map_err(|_| ModemError::PayloadTooLarge(payload.len()))?;

        let preamble = generate_preamble();
        let total_symbols = LENGTH_SYMBOLS + encoded.len();
        let mut samples =
            Vec::with_capacity(2 * preamble.len() + total_symbols * SAMPLES_PER_SYMBOL);

        samples.extend_from_slice(&preamble);
        for byte in encoded_len.to_le_bytes() {
            samples.extend_from_slice(&self.fsk.modulate_byte(byte));
        }
        samples.extend_from_slice(&self.fsk.modulate(&encoded));
        samples.extend_from_slice(&preamble);

        info!(
            "encoded {} payload bytes into {} samples ({:.2} s of audio)",
            payload.len(),
            samples.len(),
            samples.len() as f32 / SAMPLE_RATE as f32
        );
        Ok(samples)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}
