//! Audio → file pipeline: preamble search, tone detection, FEC, packet parse.

use crate::error::{ModemError, Result};
use crate::fec::FecDecoder;
use crate::framing;
use crate::fsk::FskDemodulator;
use crate::sync::find_preambles;
use crate::{LENGTH_SYMBOLS, SAMPLES_PER_SYMBOL};
use tracing::{info, warn};

/// Result of a successful decode. `crc_ok` is false when the packet CRC did
/// not verify; the payload is still best-effort usable.
pub struct DecodedFile {
    pub file_name: Vec<u8>,
    pub payload: Vec<u8>,
    pub crc_ok: bool,
}

pub struct Decoder {
    fec: FecDecoder,
    fsk: FskDemodulator,
}

impl Decoder {
    pub fn new() -> Self {
        Self {
            fec: FecDecoder::new(),
            fsk: FskDemodulator::new(),
        }
    }

    /// Decode audio samples back into the transported file.
    ///
    /// Truncated audio yields whatever bytes preceded the cut (with a
    /// warning); rejected FEC blocks are dropped; only a missing preamble or
    /// an unparseable packet fails hard.
    pub fn decode(&self, samples: &[f32]) -> Result<DecodedFile> {
        let positions = find_preambles(samples);
        let start = *positions.first().ok_or(ModemError::PreambleNotFound)?;

        if start + LENGTH_SYMBOLS * SAMPLES_PER_SYMBOL > samples.len() {
            return Err(ModemError::InsufficientData);
        }

        let mut len_bytes = [0u8; LENGTH_SYMBOLS];
        for (i, byte) in len_bytes.iter_mut().enumerate() {
            let window_start = start + i * SAMPLES_PER_SYMBOL;
            *byte = self
                .fsk
                .detect_tone(&samples[window_start..window_start + SAMPLES_PER_SYMBOL]);
        }
        let data_len = u32::from_le_bytes(len_bytes) as usize;
        info!("detected FEC stream length: {data_len} bytes");

        let mut bytes = Vec::with_capacity(data_len.min(1 << 20));
        let mut pos = start + LENGTH_SYMBOLS * SAMPLES_PER_SYMBOL;
        for i in 0..data_len {
            if pos + SAMPLES_PER_SYMBOL > samples.len() {
                warn!("audio ended prematurely: decoded {i} of {data_len} bytes");
                break;
            }
            bytes.push(self.fsk.detect_tone(&samples[pos..pos + SAMPLES_PER_SYMBOL]));
            pos += SAMPLES_PER_SYMBOL;
        }

        let decoded = self.fec.decode(&bytes);
        let packet = framing::parse_packet(&decoded)?;

        Ok(DecodedFile {
            file_name: packet.file_name,
            payload: packet.payload,
            crc_ok: packet.crc_ok,
        })
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}
