//! Reed-Solomon (255, 223) forward error correction.
//!
//! Systematic encoding: each codeword is the 223 data bytes followed by 32
//! parity bytes. Decoding is verification-only: the tentative message is
//! re-encoded and compared against the received codeword, and the block is
//! accepted iff at most `RS_PARITY_BYTES / 2` byte positions disagree.
//! Blocks that fail verification are dropped from the output stream; the
//! packet layer's own length field bounds the meaningful prefix.

use crate::gf256::GaloisField;
use crate::{RS_DATA_BYTES, RS_PARITY_BYTES, RS_TOTAL_BYTES};
use tracing::debug;

/// g(x) = prod_{i=0..nsym-1} (x - alpha^i), highest-degree coefficient first.
fn generator_poly(gf: &GaloisField, nsym: usize) -> Vec<u8> {
    let mut g = vec![1u8];
    for i in 0..nsym {
        g = gf.poly_mul(&g, &[1, gf.alpha_pow(i)]);
    }
    g
}

/// Systematically encode one 223-byte message into a 255-byte codeword.
fn encode_block(gf: &GaloisField, gen: &[u8], msg: &[u8]) -> Vec<u8> {
    debug_assert_eq!(msg.len(), RS_DATA_BYTES);

    // Polynomial long division of msg * x^nsym by g(x); the remainder left
    // in r[223..255] is the parity.
    let mut r = vec![0u8; RS_TOTAL_BYTES];
    r[..RS_DATA_BYTES].copy_from_slice(msg);

    for i in 0..RS_DATA_BYTES {
        let c = r[i];
        if c != 0 {
            for (j, &g) in gen.iter().enumerate() {
                r[i + j] ^= gf.mul(g, c);
            }
        }
    }

    let mut codeword = msg.to_vec();
    codeword.extend_from_slice(&r[RS_DATA_BYTES..]);
    codeword
}

pub struct FecEncoder {
    gf: GaloisField,
    gen: Vec<u8>,
}

impl FecEncoder {
    pub fn new() -> Self {
        let gf = GaloisField::new();
        let gen = generator_poly(&gf, RS_PARITY_BYTES);
        Self { gf, gen }
    }

    /// Encode a byte stream into a sequence of 255-byte codewords.
    /// The final block is zero-padded to 223 bytes before encoding.
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(data.len().div_ceil(RS_DATA_BYTES) * RS_TOTAL_BYTES);
        for chunk in data.chunks(RS_DATA_BYTES) {
            if chunk.len() == RS_DATA_BYTES {
                encoded.extend_from_slice(&encode_block(&self.gf, &self.gen, chunk));
            } else {
                let mut block = [0u8; RS_DATA_BYTES];
                block[..chunk.len()].copy_from_slice(chunk);
                encoded.extend_from_slice(&encode_block(&self.gf, &self.gen, &block));
            }
        }
        encoded
    }
}

impl Default for FecEncoder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct FecDecoder {
    gf: GaloisField,
    gen: Vec<u8>,
}

impl FecDecoder {
    pub fn new() -> Self {
        let gf = GaloisField::new();
        let gen = generator_poly(&gf, RS_PARITY_BYTES);
        Self { gf, gen }
    }

    /// Verify one 255-byte codeword, returning its 223 message bytes if at
    /// most `RS_PARITY_BYTES / 2` byte positions disagree with a clean
    /// re-encoding of the tentative message.
    pub fn decode_block(&self, codeword: &[u8]) -> Option<Vec<u8>> {
        debug_assert_eq!(codeword.len(), RS_TOTAL_BYTES);

        let msg = &codeword[..RS_DATA_BYTES];
        let reencoded = encode_block(&self.gf, &self.gen, msg);

        let mismatches = codeword
            .iter()
            .zip(reencoded.iter())
            .filter(|(a, b)| a != b)
            .count();

        if mismatches <= RS_PARITY_BYTES / 2 {
            Some(msg.to_vec())
        } else {
            None
        }
    }

    /// Decode a stream of 255-byte codewords. Trailing partial blocks are
    /// ignored and blocks failing verification are dropped; the caller must
    /// slice the result using the packet's own length field.
    pub fn decode(&self, data: &[u8]) -> Vec<u8> {
        let mut decoded = Vec::with_capacity((data.len() / RS_TOTAL_BYTES) * RS_DATA_BYTES);
        for (index, block) in data.chunks_exact(RS_TOTAL_BYTES).enumerate() {
            match self.decode_block(block) {
                Some(msg) => decoded.extend_from_slice(&msg),
                None => debug!("dropping FEC block {index}: parity mismatch beyond tolerance"),
            }
        }
        decoded
    }
}

impl Default for FecDecoder {
    fn default() -> Self {
        Self::new()
    }
}
