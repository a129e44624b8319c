//! Input format handling
//!
//! The pipeline only parses RIFF/WAVE containers, but it recognizes a few
//! legacy stream categories so the delay trimming applied around a stream
//! matches what that category needs.

pub mod wav;

pub use wav::WaveFormat;

use std::fmt;

/// MPEG layer III decoder delay in samples.
const MP3_DECODER_DELAY: i32 = 528;
/// MPEG layer I/II decoder delay in samples.
const MPEG12_DECODER_DELAY: i32 = 240;

/// Input categories the pipeline distinguishes.
///
/// Only `Wave` and `Raw` can actually be read; the MPEG categories exist
/// because their decoder delay changes the trim applied to the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// RIFF/WAVE container
    Wave,
    /// Headerless PCM
    Raw,
    /// MPEG layer I stream
    Mp1,
    /// MPEG layer II stream
    Mp2,
    /// MPEG layer III stream
    Mp3,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Wave => write!(f, "wave"),
            InputKind::Raw => write!(f, "raw pcm"),
            InputKind::Mp1 => write!(f, "mp1"),
            InputKind::Mp2 => write!(f, "mp2"),
            InputKind::Mp3 => write!(f, "mp3"),
        }
    }
}

/// Samples discarded around a stream to cancel decoder delay.
///
/// `skip_start` samples are dropped before the first retained sample,
/// `skip_end` samples are withheld at the tail of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrimPolicy {
    pub skip_start: usize,
    pub skip_end: usize,
}

impl TrimPolicy {
    /// Derive the trim for an input category.
    pub fn for_kind(kind: InputKind) -> Self {
        let mut skip_start: i32 = 0;
        let mut skip_end: i32 = 0;

        match kind {
            InputKind::Mp3 => {
                skip_start = MP3_DECODER_DELAY + 1;
                skip_end = 0 - (MP3_DECODER_DELAY + 1);
            }
            InputKind::Mp1 | InputKind::Mp2 => {
                skip_start = MPEG12_DECODER_DELAY + 1;
            }
            InputKind::Wave | InputKind::Raw => {}
        }

        TrimPolicy {
            skip_start: skip_start.max(0) as usize,
            skip_end: skip_end.max(0) as usize,
        }
    }

    /// Total samples the trim removes from the stream.
    pub fn total(&self) -> usize {
        self.skip_start + self.skip_end
    }
}
