//! Preamble generation and search.
//!
//! A frame is bracketed by five consecutive sync tones at `SYNC_FREQ`. The
//! receiver scans in half-symbol strides and accepts a position when at
//! least four of the five symbol-sized windows carry sync energy, which
//! tolerates one window lost to alignment error or a dropout.

use crate::fsk::{generate_tone, goertzel_magnitude};
use crate::{
    PREAMBLE_SAMPLES, PREAMBLE_SYMBOLS, SAMPLES_PER_SYMBOL, SYNC_FREQ, SYNC_MAGNITUDE_THRESHOLD,
};

/// Five concatenated sync tones.
pub fn generate_preamble() -> Vec<f32> {
    let mut preamble = Vec::with_capacity(PREAMBLE_SAMPLES);
    for _ in 0..PREAMBLE_SYMBOLS {
        preamble.extend_from_slice(&generate_tone(SYNC_FREQ, SAMPLES_PER_SYMBOL));
    }
    preamble
}

/// Scan for preambles and return the data-start position after each match,
/// in stream order. The search cursor jumps past a matched preamble so the
/// same one is not reported twice.
pub fn find_preambles(samples: &[f32]) -> Vec<usize> {
    let mut positions = Vec::new();
    if samples.len() < PREAMBLE_SAMPLES {
        return positions;
    }

    let mut cursor = 0;
    while cursor + PREAMBLE_SAMPLES <= samples.len() {
        let mut matched = 0;
        for j in 0..PREAMBLE_SYMBOLS {
            let window_start = cursor + j * SAMPLES_PER_SYMBOL;
            let window = &samples[window_start..window_start + SAMPLES_PER_SYMBOL];
            if goertzel_magnitude(window, SYNC_FREQ) > SYNC_MAGNITUDE_THRESHOLD {
                matched += 1;
            }
        }

        if matched >= PREAMBLE_SYMBOLS - 1 {
            positions.push(cursor + PREAMBLE_SAMPLES);
            cursor += PREAMBLE_SAMPLES;
        } else {
            cursor += SAMPLES_PER_SYMBOL / 2;
        }
    }

    positions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preamble_length() {
        assert_eq!(generate_preamble().len(), PREAMBLE_SAMPLES);
    }

    #[test]
    fn clean_preamble_is_found_at_origin() {
        let mut samples = generate_preamble();
        samples.extend_from_slice(&vec![0.0; SAMPLES_PER_SYMBOL * 4]);

        let positions = find_preambles(&samples);
        assert_eq!(positions.first(), Some(&PREAMBLE_SAMPLES));
    }

    #[test]
    fn preamble_after_silence_is_found() {
        let lead_in = SAMPLES_PER_SYMBOL * 3;
        let mut samples = vec![0.0; lead_in];
        samples.extend_from_slice(&generate_preamble());
        samples.extend_from_slice(&vec![0.0; SAMPLES_PER_SYMBOL]);

        let positions = find_preambles(&samples);
        assert!(!positions.is_empty(), "no preamble found");
        // The 4-of-5 rule may lock before the tone fills all five windows,
        // so the reported start can lead the true one by up to two symbols
        // plus one search stride. It never lags it.
        let expected = lead_in + PREAMBLE_SAMPLES;
        let found = positions[0];
        assert!(found <= expected, "found {found} past expected {expected}");
        assert!(
            expected - found <= 2 * SAMPLES_PER_SYMBOL + SAMPLES_PER_SYMBOL / 2,
            "found {found} too far before expected {expected}"
        );
    }

    #[test]
    fn silence_has_no_preamble() {
        let samples = vec![0.0; PREAMBLE_SAMPLES * 3];
        assert!(find_preambles(&samples).is_empty());
    }

    #[test]
    fn data_tones_are_not_mistaken_for_sync() {
        // A run of data-band tones far from SYNC_FREQ.
        let samples = crate::fsk::generate_tone(crate::BASE_FREQ, PREAMBLE_SAMPLES * 2);
        assert!(find_preambles(&samples).is_empty());
    }

    #[test]
    fn both_frame_preambles_are_reported() {
        let preamble = generate_preamble();
        let mut samples = preamble.clone();
        samples.extend_from_slice(&vec![0.0; SAMPLES_PER_SYMBOL * 10]);
        samples.extend_from_slice(&preamble);

        let positions = find_preambles(&samples);
        assert_eq!(positions.len(), 2);
        assert_eq!(positions[0], PREAMBLE_SAMPLES);
    }
}
