//! Elastic per-file PCM buffering
//!
//! Sits between the sample reader and the encoder so that delay trimming
//! and the encoder's fixed frame granularity never have to line up with
//! how many samples a single read produced. The buffer drops a configured
//! number of samples at the start of the stream and withholds another
//! batch at the end, and hands out at most one encoder frame per take.

use crate::format::TrimPolicy;

/// Two-channel sample buffer with edge trimming.
///
/// `skip_start` counts samples still to be discarded from the front of
/// the stream; `skip_end` samples are permanently withheld at the tail
/// and never reported as available.
#[derive(Debug)]
pub struct PcmRingBuffer {
    left: Vec<i32>,
    right: Vec<i32>,
    skip_start: usize,
    skip_end: usize,
}

impl PcmRingBuffer {
    /// Create an empty buffer seeded with the stream's trim.
    pub fn new(trim: TrimPolicy) -> Self {
        PcmRingBuffer {
            left: Vec::new(),
            right: Vec::new(),
            skip_start: trim.skip_start,
            skip_end: trim.skip_end,
        }
    }

    /// Samples that may be taken right now.
    ///
    /// The trailing margin stays invisible, even while parts of it sit
    /// in the buffer.
    pub fn available(&self) -> usize {
        self.left.len().saturating_sub(self.skip_end)
    }

    /// Number of buffered samples, including the withheld tail.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Append one read's worth of de-interleaved samples.
    ///
    /// Consumes the remaining start trim before retaining anything; a
    /// block that ends inside the trimmed lead-in leaves the buffer
    /// untouched. Returns the new availability.
    pub fn append(&mut self, left: &[i32], right: &[i32]) -> usize {
        debug_assert_eq!(left.len(), right.len());
        let read = left.len();

        if self.skip_start >= read {
            self.skip_start -= read;
            return self.available();
        }

        self.left.extend_from_slice(&left[self.skip_start..]);
        self.right.extend_from_slice(&right[self.skip_start..]);
        self.skip_start = 0;

        self.available()
    }

    /// Move up to `min(want, max)` samples from the front of the buffer
    /// into the caller's channel slices. Returns how many were copied.
    pub fn take(
        &mut self,
        left_out: &mut [i32],
        right_out: &mut [i32],
        want: usize,
        max: usize,
    ) -> usize {
        let taken = want.min(max).min(self.left.len());
        if taken > 0 {
            left_out[..taken].copy_from_slice(&self.left[..taken]);
            right_out[..taken].copy_from_slice(&self.right[..taken]);
            self.left.drain(..taken);
            self.right.drain(..taken);
        }
        taken
    }
}
