//! 256-tone FSK: one symbol per byte.
//!
//! Byte value `k` maps to a sinusoid at `BASE_FREQ + k * FREQ_SPACING` held
//! for one symbol duration. Detection is non-coherent: the Goertzel filter
//! measures the magnitude of every candidate tone over the symbol window and
//! the strongest wins, so no phase synchronization is needed.

use crate::{
    BASE_FREQ, FREQ_SPACING, NUM_TONES, SAMPLES_PER_SYMBOL, SAMPLE_RATE, TONE_AMPLITUDE,
};
use std::f32::consts::PI;

/// Synthesize a single tone at 0.7 peak amplitude with a linear ramp over
/// the first and last tenth of the window to suppress click artifacts.
pub fn generate_tone(frequency: f32, num_samples: usize) -> Vec<f32> {
    let sample_rate = SAMPLE_RATE as f32;
    let mut tone: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate;
            TONE_AMPLITUDE * (2.0 * PI * frequency * t).sin()
        })
        .collect();

    let ramp = num_samples / 10;
    for i in 0..ramp {
        let envelope = i as f32 / ramp as f32;
        tone[i] *= envelope;
        tone[num_samples - 1 - i] *= envelope;
    }

    tone
}

/// Goertzel magnitude of `frequency` over the whole sample window.
///
/// Second-order IIR evaluation of a single DFT bin; much cheaper than a
/// full FFT when only a handful of frequencies matter.
pub fn goertzel_magnitude(samples: &[f32], frequency: f32) -> f32 {
    let omega = 2.0 * PI * frequency / SAMPLE_RATE as f32;
    let coeff = 2.0 * omega.cos();

    let mut q1 = 0.0f32;
    let mut q2 = 0.0f32;
    for &sample in samples {
        let q0 = coeff * q1 - q2 + sample;
        q2 = q1;
        q1 = q0;
    }

    let real = q1 - q2 * omega.cos();
    let imag = q2 * omega.sin();
    (real * real + imag * imag).sqrt()
}

fn tone_frequency(byte: u8) -> f32 {
    BASE_FREQ + byte as f32 * FREQ_SPACING
}

/// FSK modulator - maps bytes to fixed-duration tones.
pub struct FskModulator;

impl FskModulator {
    pub fn new() -> Self {
        Self
    }

    /// One symbol: a single tone held for `SAMPLES_PER_SYMBOL` samples.
    pub fn modulate_byte(&self, byte: u8) -> Vec<f32> {
        generate_tone(tone_frequency(byte), SAMPLES_PER_SYMBOL)
    }

    pub fn modulate(&self, bytes: &[u8]) -> Vec<f32> {
        let mut samples = Vec::with_capacity(bytes.len() * SAMPLES_PER_SYMBOL);
        for &byte in bytes {
            samples.extend_from_slice(&self.modulate_byte(byte));
        }
        samples
    }
}

impl Default for FskModulator {
    fn default() -> Self {
        Self::new()
    }
}

/// FSK demodulator - recovers the byte a symbol window carries.
pub struct FskDemodulator;

impl FskDemodulator {
    pub fn new() -> Self {
        Self
    }

    /// Sweep all 256 candidate tones over the window and return the byte of
    /// the strongest. Ties resolve to the lowest byte value because only a
    /// strictly greater magnitude displaces the running best.
    pub fn detect_tone(&self, window: &[f32]) -> u8 {
        let mut best_byte = 0u8;
        let mut best_magnitude = 0.0f32;

        for k in 0..NUM_TONES {
            let magnitude = goertzel_magnitude(window, tone_frequency(k as u8));
            if magnitude > best_magnitude {
                best_magnitude = magnitude;
                best_byte = k as u8;
            }
        }

        best_byte
    }
}

impl Default for FskDemodulator {
    fn default() -> Self {
        Self::new()
    }
}
