//! RIFF/WAVE PCM container I/O.
//!
//! The writer always emits canonical 16-bit mono PCM at 44100 Hz. The
//! reader additionally accepts 8-bit PCM and stereo (averaged down to mono)
//! so recaptured recordings decode without preprocessing; float and other
//! bit depths are rejected.

use crate::error::{ModemError, Result};
use crate::SAMPLE_RATE;
use std::path::Path;
use tracing::warn;

/// Write samples as 16-bit mono PCM. Values are clamped to [-1, 1] before
/// scaling so modulator headroom mistakes cannot wrap.
pub fn write_wav_file(path: &Path, samples: &[f32]) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE as u32,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped * 32767.0) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

/// Read a PCM wave file into normalized mono samples.
pub fn read_wav_file(path: &Path) -> Result<Vec<f32>> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    if spec.sample_format != hound::SampleFormat::Int {
        return Err(ModemError::UnsupportedAudioFormat);
    }
    if spec.channels != 1 && spec.channels != 2 {
        return Err(ModemError::UnsupportedChannels(spec.channels));
    }
    if spec.sample_rate != SAMPLE_RATE as u32 {
        warn!(
            "sample rate is {} Hz, expected {} Hz; decoding may fail",
            spec.sample_rate, SAMPLE_RATE
        );
    }

    let scale = match spec.bits_per_sample {
        8 => 128.0,
        16 => 32768.0,
        other => return Err(ModemError::UnsupportedBitDepth(other)),
    };

    let samples = reader
        .samples::<i16>()
        .map(|s| s.map(|v| v as f32 / scale))
        .collect::<std::result::Result<Vec<f32>, _>>()?;

    if spec.channels == 2 {
        Ok(stereo_to_mono(&samples))
    } else {
        Ok(samples)
    }
}

/// Average interleaved stereo down to mono. A trailing unpaired sample is
/// dropped.
pub fn stereo_to_mono(samples: &[f32]) -> Vec<f32> {
    samples
        .chunks_exact(2)
        .map(|pair| (pair[0] + pair[1]) / 2.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_read_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let samples: Vec<f32> = (0..4410)
            .map(|i| (i as f32 * 0.05).sin() * 0.5)
            .collect();
        write_wav_file(&path, &samples).unwrap();

        let read_back = read_wav_file(&path).unwrap();
        assert_eq!(read_back.len(), samples.len());
        for (a, b) in samples.iter().zip(read_back.iter()) {
            assert!((a - b).abs() < 1.0 / 32767.0 * 2.0, "{a} vs {b}");
        }
    }

    #[test]
    fn writer_clamps_out_of_range_samples() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("clip.wav");

        write_wav_file(&path, &[2.0, -2.0, 0.0]).unwrap();
        let read_back = read_wav_file(&path).unwrap();
        assert!((read_back[0] - 1.0).abs() < 0.01);
        assert!((read_back[1] + 1.0).abs() < 0.01);
    }

    #[test]
    fn stereo_is_downmixed_by_averaging() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: SAMPLE_RATE as u32,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for &(l, r) in &[(8000i16, 16000i16), (-4000, -8000), (0, 32000)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let samples = read_wav_file(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] - 12000.0 / 32768.0).abs() < 1e-4);
        assert!((samples[1] + 6000.0 / 32768.0).abs() < 1e-4);
        assert!((samples[2] - 16000.0 / 32768.0).abs() < 1e-4);
    }

    #[test]
    fn eight_bit_input_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("8bit.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE as u32,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for v in [-128i8, 0, 127] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let samples = read_wav_file(&path).unwrap();
        assert_eq!(samples.len(), 3);
        assert!((samples[0] + 1.0).abs() < 1e-6);
        assert!(samples[1].abs() < 1e-6);
        assert!((samples[2] - 127.0 / 128.0).abs() < 1e-6);
    }

    #[test]
    fn float_wav_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("float.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE as u32,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(
            read_wav_file(&path),
            Err(ModemError::UnsupportedAudioFormat)
        ));
    }

    #[test]
    fn unsupported_bit_depth_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("24bit.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: SAMPLE_RATE as u32,
            bits_per_sample: 24,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        writer.write_sample(1_000_000i32).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(
            read_wav_file(&path),
            Err(ModemError::UnsupportedBitDepth(24))
        ));
    }
}
