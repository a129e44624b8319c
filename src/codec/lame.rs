//! LAME-backed MP3 engine
//!
//! Wraps the `mp3lame_encoder` bindings behind [`Mp3Engine`]. The
//! bindings take 16-bit samples, so the canonical 32-bit words narrow to
//! their top half at this boundary and nowhere else.

use crate::codec::encoder::Mp3Engine;
use crate::codec::FRAME_SAMPLES;
use crate::error::{Error, Result};
use mp3lame_encoder::{Bitrate, Builder, DualPcm, Encoder, FlushNoGap, MonoPcm, Quality};
use std::mem::MaybeUninit;
use std::str::FromStr;

/// Worst-case flush output, per the LAME documentation.
const FLUSH_BUFFER_SIZE: usize = 7200;

/// Encoding effort/bitrate presets exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityPreset {
    /// Low latency, 128 kbps
    Fast,
    /// Balanced, 192 kbps
    #[default]
    Standard,
    /// Highest quality, 320 kbps
    Best,
}

impl FromStr for QualityPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fast" => Ok(QualityPreset::Fast),
            "standard" => Ok(QualityPreset::Standard),
            "best" => Ok(QualityPreset::Best),
            other => Err(Error::invalid_input(format!(
                "unknown quality preset '{}', expected fast, standard or best",
                other
            ))),
        }
    }
}

impl std::fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityPreset::Fast => write!(f, "fast"),
            QualityPreset::Standard => write!(f, "standard"),
            QualityPreset::Best => write!(f, "best"),
        }
    }
}

/// Production MP3 engine over the LAME bindings.
pub struct LameEngine {
    encoder: Encoder,
    channels: u16,
    left16: Vec<i16>,
    right16: Vec<i16>,
}

impl LameEngine {
    /// Configure and build a LAME encoder for one output stream.
    pub fn new(sample_rate: u32, channels: u16, quality: QualityPreset) -> Result<Self> {
        let mut builder =
            Builder::new().ok_or_else(|| Error::engine_init("could not allocate LAME context"))?;

        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| Error::engine_init(format!("set_sample_rate: {:?}", e)))?;
        builder
            .set_num_channels(channels as u8)
            .map_err(|e| Error::engine_init(format!("set_num_channels: {:?}", e)))?;

        match quality {
            QualityPreset::Fast => {
                builder
                    .set_brate(Bitrate::Kbps128)
                    .map_err(|e| Error::engine_init(format!("set_brate: {:?}", e)))?;
                builder
                    .set_quality(Quality::SecondWorst)
                    .map_err(|e| Error::engine_init(format!("set_quality: {:?}", e)))?;
            }
            QualityPreset::Standard => {
                builder
                    .set_brate(Bitrate::Kbps192)
                    .map_err(|e| Error::engine_init(format!("set_brate: {:?}", e)))?;
            }
            QualityPreset::Best => {
                builder
                    .set_brate(Bitrate::Kbps320)
                    .map_err(|e| Error::engine_init(format!("set_brate: {:?}", e)))?;
                builder
                    .set_quality(Quality::Best)
                    .map_err(|e| Error::engine_init(format!("set_quality: {:?}", e)))?;
            }
        }

        let encoder = builder
            .build()
            .map_err(|e| Error::engine_init(format!("build: {:?}", e)))?;

        Ok(LameEngine {
            encoder,
            channels,
            left16: Vec::with_capacity(FRAME_SAMPLES),
            right16: Vec::with_capacity(FRAME_SAMPLES),
        })
    }

    fn narrow_into(dst: &mut Vec<i16>, src: &[i32]) {
        dst.clear();
        dst.extend(src.iter().map(|&word| (word >> 16) as i16));
    }
}

impl Mp3Engine for LameEngine {
    fn frame_samples(&self) -> usize {
        FRAME_SAMPLES
    }

    fn encode(&mut self, left: &[i32], right: &[i32], out: &mut Vec<u8>) -> Result<usize> {
        Self::narrow_into(&mut self.left16, left);
        Self::narrow_into(&mut self.right16, right);

        out.clear();
        out.reserve(mp3lame_encoder::max_required_buffer_size(
            self.left16.len() + self.right16.len(),
        ));

        let written = if self.channels == 1 {
            self.encoder.encode_to_vec(MonoPcm(&self.left16), out)
        } else {
            self.encoder.encode_to_vec(
                DualPcm {
                    left: &self.left16,
                    right: &self.right16,
                },
                out,
            )
        }
        .map_err(|e| Error::encoder_internal(format!("encode: {:?}", e)))?;

        Ok(written)
    }

    fn flush(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        let mut buf: Vec<MaybeUninit<u8>> = vec![MaybeUninit::uninit(); FLUSH_BUFFER_SIZE];
        let written = self
            .encoder
            .flush::<FlushNoGap>(&mut buf)
            .map_err(|e| Error::encoder_internal(format!("flush: {:?}", e)))?;

        out.clear();
        out.extend(buf[..written].iter().map(|m| unsafe { m.assume_init() }));
        Ok(written)
    }

    fn tag_frame(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        // The bindings expose no tag-frame query; report none so the
        // patch step skips itself
        out.clear();
        Ok(0)
    }

    fn leading_tag_size(&self) -> u64 {
        0
    }
}
