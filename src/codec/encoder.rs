//! The boundary to the external MP3 engine
//!
//! The pipeline never looks inside the encoder. It feeds fixed-size
//! frames of canonical 32-bit samples across this trait and writes
//! whatever bytes come back.

use crate::error::Result;

/// Largest byte count a single engine call is expected to produce,
/// sized for a full frame plus embedded album art in the tag frame.
pub const MAX_MP3_BUFFER: usize = 16384 + 128 * 1024;

/// An MP3 encoding engine consumed as a black box.
///
/// Implementations clear `out` and append their bytes to it; the
/// returned count always equals `out.len()`. Engine failures are fatal
/// for the file being encoded but never for the batch.
pub trait Mp3Engine {
    /// Most samples per channel accepted by one `encode` call.
    fn frame_samples(&self) -> usize;

    /// Encode one block of samples. Both channel slices are always
    /// supplied and equally long; mono engines ignore `right`, which the
    /// caller zero-fills.
    fn encode(&mut self, left: &[i32], right: &[i32], out: &mut Vec<u8>) -> Result<usize>;

    /// Drain whatever the engine still buffers. Called exactly once,
    /// after the last `encode`.
    fn flush(&mut self, out: &mut Vec<u8>) -> Result<usize>;

    /// Produce the trailing tag frame that replaces the placeholder at
    /// the front of the stream. Zero means the engine has none to offer,
    /// which callers treat as "skip the patch".
    fn tag_frame(&mut self, out: &mut Vec<u8>) -> Result<usize>;

    /// Bytes of leading metadata the engine emitted before the first
    /// audio frame. The tag patch seeks to this offset.
    fn leading_tag_size(&self) -> u64;
}
