//! PCM handling and the MP3 engine boundary

pub mod encoder;
pub mod lame;
pub mod pcm_buffer;
pub mod unpack;

pub use encoder::{Mp3Engine, MAX_MP3_BUFFER};
pub use lame::{LameEngine, QualityPreset};
pub use pcm_buffer::PcmRingBuffer;
pub use unpack::SampleUnpacker;

/// Most samples per channel handed to the engine in one call, matching
/// the MPEG-1 layer III granule count.
pub const FRAME_SAMPLES: usize = 1152;
