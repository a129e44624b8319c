//! Raw sample unpacking and normalization
//!
//! Every input sample, whatever its storage width, is widened into a
//! 32-bit word with the significant bits left-justified. Narrow samples
//! keep their low bits zero, so a 16-bit `0x7FFF` and a 32-bit
//! `0x7FFF0000` describe the same amplitude. IEEE float inputs get a
//! second pass that rescales the unit range onto the full 32-bit span.

use crate::error::{Error, Result};
use crate::format::WaveFormat;
use std::io::Read;

/// Unpacks raw little-endian sample bytes into normalized `i32` words.
#[derive(Debug)]
pub struct SampleUnpacker {
    bytes_per_sample: usize,
    is_unsigned_8bit: bool,
    is_float: bool,
    raw: Vec<u8>,
}

impl SampleUnpacker {
    /// Build an unpacker for a parsed input format.
    ///
    /// Float input must already be stored in 32-bit words; any other
    /// declared width cannot be reinterpreted and poisons the whole run,
    /// not just this file.
    pub fn for_format(format: &WaveFormat) -> Result<Self> {
        if format.is_float && format.bits_per_sample != 32 {
            return Err(Error::platform(format!(
                "ieee float input must be 32-bit, got {} bits",
                format.bits_per_sample
            )));
        }

        Ok(SampleUnpacker {
            bytes_per_sample: format.bytes_per_sample(),
            is_unsigned_8bit: format.is_unsigned_8bit,
            is_float: format.is_float,
            raw: Vec::new(),
        })
    }

    /// Read up to `samples_to_read` samples from `reader`, replacing the
    /// contents of `out` with the normalized words. Returns how many
    /// samples were actually read; trailing bytes short of a full sample
    /// are dropped.
    pub fn read_samples<R: Read>(
        &mut self,
        reader: &mut R,
        out: &mut Vec<i32>,
        samples_to_read: usize,
    ) -> Result<usize> {
        let want_bytes = samples_to_read * self.bytes_per_sample;
        self.raw.resize(want_bytes, 0);

        let mut filled = 0;
        while filled < want_bytes {
            let n = reader.read(&mut self.raw[filled..want_bytes])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        let samples_read = filled / self.bytes_per_sample;

        out.clear();
        out.reserve(samples_read);
        for chunk in self.raw[..samples_read * self.bytes_per_sample].chunks_exact(self.bytes_per_sample) {
            out.push(self.unpack_one(chunk));
        }

        if self.is_float {
            for word in out.iter_mut() {
                *word = rescale_float(f32::from_bits(*word as u32));
            }
        }

        Ok(samples_read)
    }

    /// Widen one stored sample into a left-justified 32-bit word.
    fn unpack_one(&self, bytes: &[u8]) -> i32 {
        match self.bytes_per_sample {
            1 if self.is_unsigned_8bit => {
                // Recenter around zero, then pad the low bits to keep
                // full-scale values symmetric
                ((u32::from(bytes[0] ^ 0x80) << 24) | 0x7f << 16) as i32
            }
            1 => (u32::from(bytes[0]) << 24) as i32,
            2 => ((u32::from(bytes[0]) << 16) | (u32::from(bytes[1]) << 24)) as i32,
            3 => {
                ((u32::from(bytes[0]) << 8)
                    | (u32::from(bytes[1]) << 16)
                    | (u32::from(bytes[2]) << 24)) as i32
            }
            _ => i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }
}

/// Map a unit-range float onto the full 32-bit integer span.
///
/// Both the positive and negative scale collapse to 2^31 once rounded
/// to f32. Ties move away from zero, the cast truncates back toward it,
/// and out-of-range input pins to the nearest extreme.
fn rescale_float(u: f32) -> i32 {
    const SCALE: f32 = 2_147_483_648.0;

    if u >= 1.0 {
        i32::MAX
    } else if u <= -1.0 {
        i32::MIN
    } else if u >= 0.0 {
        (u * SCALE + 0.5) as i32
    } else {
        (u * SCALE - 0.5) as i32
    }
}
