//! RIFF/WAVE header parsing
//!
//! Scans the container chunk by chunk until the audio data is located.
//! Only enough of the header is interpreted to drive sample unpacking;
//! everything else is skipped over.

use crate::error::{Error, Result};
use crate::util::ByteReader;
use std::io::{Read, Seek, SeekFrom};
use tracing::debug;

/// Chunk and form identifiers, stored high byte first in the file.
const WAV_ID_RIFF: i32 = 0x5249_4646; // "RIFF"
const WAV_ID_WAVE: i32 = 0x5741_5645; // "WAVE"
const WAV_ID_FMT: i32 = 0x666d_7420; // "fmt "
const WAV_ID_DATA: i32 = 0x6461_7461; // "data"

/// Format tags accepted in the fmt chunk.
const WAVE_FORMAT_PCM: u16 = 0x0001;
const WAVE_FORMAT_IEEE_FLOAT: u16 = 0x0003;
/// Marker tag whose real format hides in the extension block.
const WAVE_FORMAT_EXTENSIBLE: u16 = 0xFFFE;

/// Declared data length meaning "size unknown".
pub const UNKNOWN_DATA_SIZE: u32 = u32::MAX;

/// How many sub-chunks the scanner visits before declaring the file corrupt.
const MAX_CHUNK_SCAN: usize = 20;

/// Everything the pipeline needs to know about an input stream.
///
/// Built once when a file is opened and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveFormat {
    /// Number of interleaved channels (1 or 2)
    pub channels: u16,
    /// Sample rate declared by the header, in Hz
    pub sample_rate: u32,
    /// Storage width of one sample (8, 16, 24 or 32)
    pub bits_per_sample: u16,
    /// Samples are IEEE floats rather than integers
    pub is_float: bool,
    /// 8-bit samples use the unsigned WAV convention
    pub is_unsigned_8bit: bool,
    /// Sample frames in the data chunk, `None` when the header does not say
    pub total_samples: Option<u64>,
}

impl WaveFormat {
    /// Format assumed for headerless PCM input.
    pub fn raw_pcm(channels: u16, sample_rate: u32) -> Self {
        WaveFormat {
            channels,
            sample_rate,
            bits_per_sample: 16,
            is_float: false,
            is_unsigned_8bit: true,
            total_samples: None,
        }
    }

    /// Bytes occupied by one sample of one channel.
    pub fn bytes_per_sample(&self) -> usize {
        (usize::from(self.bits_per_sample) + 7) / 8
    }

    /// Bytes occupied by one sample frame across all channels.
    pub fn frame_bytes(&self) -> usize {
        usize::from(self.channels) * self.bytes_per_sample()
    }

    /// Parse a WAVE header, leaving the reader positioned at the first
    /// byte of PCM data.
    pub fn read<R: Read + Seek>(reader: &mut R) -> Result<WaveFormat> {
        if reader.read_i32_be()? != WAV_ID_RIFF {
            return Err(Error::NotRecognized);
        }
        parse_wave_header(reader)
    }
}

/// Round an odd chunk length up to the even byte the container pads to.
fn make_even(len: i32) -> i32 {
    if len & 0x01 != 0 {
        len + 1
    } else {
        len
    }
}

fn skip_bytes<R: Read + Seek>(reader: &mut R, len: i64, what: &str) -> Result<()> {
    reader
        .seek(SeekFrom::Current(len))
        .map_err(|e| Error::corrupt(format!("could not skip {} chunk: {}", what, e)))?;
    Ok(())
}

/// Scan the chunks following the RIFF magic.
///
/// The fmt chunk fills in the sample description, the data chunk ends the
/// scan, and anything else is stepped over. A file that hides its data
/// chunk deeper than [`MAX_CHUNK_SCAN`] chunks is treated as corrupt.
fn parse_wave_header<R: Read + Seek>(reader: &mut R) -> Result<WaveFormat> {
    let mut format_tag: u16 = 0;
    let mut channels: u16 = 0;
    let mut samples_per_sec: u32 = 0;
    let mut bits_per_sample: u16 = 0;
    let mut data_length: u32 = 0;
    let mut found_data = false;

    // Declared RIFF length, unvalidated
    let _file_length = reader.read_i32_le()?;
    if reader.read_i32_be()? != WAV_ID_WAVE {
        return Err(Error::corrupt("missing WAVE form type"));
    }

    for _ in 0..MAX_CHUNK_SCAN {
        let chunk_type = reader.read_i32_be()?;

        if chunk_type == WAV_ID_FMT {
            let mut sub_size = make_even(reader.read_i32_le()?);
            if sub_size < 16 {
                return Err(Error::corrupt("fmt chunk too short"));
            }

            format_tag = reader.read_i16_le()? as u16;
            sub_size -= 2;
            channels = reader.read_i16_le()? as u16;
            sub_size -= 2;
            samples_per_sec = reader.read_i32_le()? as u32;
            sub_size -= 4;
            let _avg_bytes_per_sec = reader.read_i32_le()?;
            sub_size -= 4;
            let _block_align = reader.read_i16_le()?;
            sub_size -= 2;
            bits_per_sample = reader.read_i16_le()? as u16;
            sub_size -= 2;

            // The extensible layout stores the real tag in its sub format
            if sub_size > 9 && format_tag == WAVE_FORMAT_EXTENSIBLE {
                let _cb_size = reader.read_i16_le()?;
                let _valid_bits = reader.read_i16_le()?;
                let _channel_mask = reader.read_i32_le()?;
                format_tag = reader.read_i16_le()? as u16;
                sub_size -= 10;
            }

            if sub_size > 0 {
                skip_bytes(reader, i64::from(sub_size), "fmt")?;
            }
        } else if chunk_type == WAV_ID_DATA {
            data_length = reader.read_i32_le()? as u32;
            found_data = true;
            // Audio data found, read no further
            break;
        } else {
            let sub_size = make_even(reader.read_i32_le()?);
            skip_bytes(reader, i64::from(sub_size), "unhandled")?;
        }
    }

    if !found_data {
        return Err(Error::corrupt("no data chunk"));
    }

    // A file whose data chunk precedes any fmt chunk falls out here with
    // a zero tag
    if format_tag != WAVE_FORMAT_PCM && format_tag != WAVE_FORMAT_IEEE_FLOAT {
        return Err(Error::UnsupportedFormat(format_tag));
    }
    if channels != 1 && channels != 2 {
        return Err(Error::UnsupportedChannels(channels));
    }
    if !matches!(bits_per_sample, 8 | 16 | 24 | 32) {
        return Err(Error::corrupt(format!(
            "only 8, 16, 24 and 32 bit samples are supported, got {}",
            bits_per_sample
        )));
    }

    let is_float = format_tag == WAVE_FORMAT_IEEE_FLOAT;
    let frame_bytes = u64::from(channels) * ((u64::from(bits_per_sample) + 7) / 8);
    let total_samples = if data_length == UNKNOWN_DATA_SIZE {
        None
    } else {
        Some(u64::from(data_length) / frame_bytes)
    };

    debug!(
        channels,
        sample_rate = samples_per_sec,
        bits = bits_per_sample,
        float = is_float,
        data_bytes = data_length,
        "parsed wave header"
    );

    Ok(WaveFormat {
        channels,
        sample_rate: samples_per_sec,
        bits_per_sample,
        is_float,
        is_unsigned_8bit: bits_per_sample == 8,
        total_samples,
    })
}
