//! Common test utilities for mp3press integration tests
//!
//! This module provides helper functions for assembling WAV byte images,
//! generating PCM test signals and scripting the MP3 engine boundary.

use std::io::Write;

use tempfile::NamedTempFile;

use mp3press_lib::codec::encoder::Mp3Engine;
use mp3press_lib::error::Result;

// ============================================================================
// WAV Byte Images
// ============================================================================

/// Format tag for integer PCM
pub const TAG_PCM: u16 = 0x0001;
/// Format tag for IEEE float
pub const TAG_IEEE_FLOAT: u16 = 0x0003;

/// Assemble a canonical RIFF/WAVE image with a 16-byte fmt chunk.
pub fn build_wav(
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    bits_per_sample: u16,
    data: &[u8],
) -> Vec<u8> {
    let byte_rate = sample_rate * u32::from(channels) * u32::from(bits_per_sample / 8);
    let block_align = channels * (bits_per_sample / 8);

    let mut image = Vec::new();
    image.extend_from_slice(b"RIFF");
    image.extend_from_slice(&(36 + data.len() as u32).to_le_bytes());
    image.extend_from_slice(b"WAVE");

    image.extend_from_slice(b"fmt ");
    image.extend_from_slice(&16u32.to_le_bytes());
    image.extend_from_slice(&format_tag.to_le_bytes());
    image.extend_from_slice(&channels.to_le_bytes());
    image.extend_from_slice(&sample_rate.to_le_bytes());
    image.extend_from_slice(&byte_rate.to_le_bytes());
    image.extend_from_slice(&block_align.to_le_bytes());
    image.extend_from_slice(&bits_per_sample.to_le_bytes());

    image.extend_from_slice(b"data");
    image.extend_from_slice(&(data.len() as u32).to_le_bytes());
    image.extend_from_slice(data);

    image
}

/// A plain 16-bit PCM image, the shape most encoders see in the wild.
pub fn build_pcm16_wav(channels: u16, sample_rate: u32, data: &[u8]) -> Vec<u8> {
    build_wav(TAG_PCM, channels, sample_rate, 16, data)
}

/// A WAV whose data chunk declares a different length than the PCM
/// payload that follows it.
pub fn build_wav_with_declared_data_len(
    channels: u16,
    sample_rate: u32,
    declared_len: u32,
    data: &[u8],
) -> Vec<u8> {
    let mut image = build_pcm16_wav(channels, sample_rate, data);
    // The data chunk size field sits right before the payload
    let size_at = image.len() - data.len() - 4;
    image[size_at..size_at + 4].copy_from_slice(&declared_len.to_le_bytes());
    image
}

// ============================================================================
// PCM Signal Generation
// ============================================================================

/// 440 Hz sine at half amplitude, 16-bit interleaved frames.
pub fn sine_pcm16(sample_rate: u32, channels: u16, frames: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(frames * channels as usize * 2);
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let sample =
            ((2.0 * std::f64::consts::PI * 440.0 * t).sin() * 0.5 * i16::MAX as f64) as i16;
        for _ch in 0..channels {
            data.extend_from_slice(&sample.to_le_bytes());
        }
    }
    data
}

/// Ascending 16-bit words, one per sample slot.
pub fn ramp_pcm16(words: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(words * 2);
    for i in 0..words {
        data.extend_from_slice(&(i as i16).to_le_bytes());
    }
    data
}

/// Deterministic garbage for malformed-input tests.
pub fn garbage_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Reproducible random-looking bytes.
pub fn random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        data.push((state >> 56) as u8);
    }
    data
}

// ============================================================================
// Temp Files
// ============================================================================

/// Write a byte image to a named temp file with a `.wav` suffix.
pub fn write_temp_wav(image: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::with_suffix(".wav").expect("Failed to create temp file");
    temp_file.write_all(image).expect("Failed to write image");
    temp_file.flush().expect("Failed to flush");
    temp_file
}

/// A sine-wave WAV file ready to encode.
pub fn write_sine_wav(channels: u16, sample_rate: u32, frames: usize) -> NamedTempFile {
    let pcm = sine_pcm16(sample_rate, channels, frames);
    write_temp_wav(&build_pcm16_wav(channels, sample_rate, &pcm))
}

// ============================================================================
// Scripted Engine
// ============================================================================

/// Engine double that records hand-offs and emits checkable bytes.
///
/// Each encode call appends one `0xAA` byte per sample, flush appends
/// `FLUSH`, and the configured tag frame is reported for patching.
pub struct RecordingEngine {
    pub calls: Vec<usize>,
    pub right_always_zero: bool,
    pub tag: Vec<u8>,
    pub leading: u64,
}

impl RecordingEngine {
    pub fn new() -> Self {
        RecordingEngine {
            calls: Vec::new(),
            right_always_zero: true,
            tag: Vec::new(),
            leading: 0,
        }
    }

    pub fn with_tag(tag: Vec<u8>, leading: u64) -> Self {
        RecordingEngine {
            tag,
            leading,
            ..RecordingEngine::new()
        }
    }

    pub fn encoded_samples(&self) -> usize {
        self.calls.iter().sum()
    }
}

impl Mp3Engine for RecordingEngine {
    fn frame_samples(&self) -> usize {
        1152
    }

    fn encode(&mut self, left: &[i32], right: &[i32], out: &mut Vec<u8>) -> Result<usize> {
        self.calls.push(left.len());
        if right.iter().any(|&s| s != 0) {
            self.right_always_zero = false;
        }
        out.clear();
        out.resize(left.len(), 0xAA);
        Ok(out.len())
    }

    fn flush(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        out.clear();
        out.extend_from_slice(b"FLUSH");
        Ok(out.len())
    }

    fn tag_frame(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        out.clear();
        out.extend_from_slice(&self.tag);
        Ok(self.tag.len())
    }

    fn leading_tag_size(&self) -> u64 {
        self.leading
    }
}

// ============================================================================
// Test Constants
// ============================================================================

/// Standard audio parameters
pub mod audio {
    pub const SAMPLE_RATE_8000: u32 = 8000;
    pub const SAMPLE_RATE_44100: u32 = 44100;
    pub const SAMPLE_RATE_48000: u32 = 48000;

    pub const CHANNELS_MONO: u16 = 1;
    pub const CHANNELS_STEREO: u16 = 2;

    /// Samples per engine hand-off
    pub const FRAME_SAMPLES: usize = 1152;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_image_layout() {
        let image = build_pcm16_wav(2, 44100, &[1, 2, 3, 4]);
        assert_eq!(&image[..4], b"RIFF");
        assert_eq!(&image[8..12], b"WAVE");
        assert_eq!(&image[12..16], b"fmt ");
        assert_eq!(&image[36..40], b"data");
        assert_eq!(image.len(), 44 + 4);
    }

    #[test]
    fn test_declared_data_len_override() {
        let image = build_wav_with_declared_data_len(1, 44100, 0xFFFF_FFFF, &[0; 8]);
        let size_at = image.len() - 8 - 4;
        assert_eq!(&image[size_at..size_at + 4], &[0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_random_data_reproducibility() {
        assert_eq!(random_data(64, 7), random_data(64, 7));
    }

    #[test]
    fn test_sine_length() {
        let pcm = sine_pcm16(44100, 2, 100);
        assert_eq!(pcm.len(), 100 * 2 * 2);
    }
}
