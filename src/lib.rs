//! mp3press - A parallel WAV to MP3 batch encoder
//!
//! mp3press reads RIFF/WAVE (or headerless PCM) input, normalizes the
//! samples into a canonical 32-bit representation and feeds them frame
//! by frame to the LAME MP3 engine, one worker per input file.
//!
//! # Architecture
//!
//! The crate is organized into several key modules:
//!
//! - `format`: RIFF/WAVE header parsing and delay-trim policy
//! - `codec`: Sample normalization, the PCM hand-off buffer and the
//!   MP3 engine boundary
//! - `pipeline`: The per-file open/stream/flush/tag-patch sequence
//! - `batch`: Input discovery and the parallel per-file workers
//! - `util`: Byte-level read helpers

pub mod batch;
pub mod codec;
pub mod error;
pub mod format;
pub mod pipeline;
pub mod util;

pub use error::{Error, Result};

/// mp3press version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;

/// Configuration for the mp3press library
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Maximum number of worker threads for batch encoding
    pub max_threads: Option<usize>,
    /// Enable verbose logging
    pub verbose: bool,
    /// Enable debug output
    pub debug: bool,
}

/// Initialize the mp3press library with the given configuration
pub fn init(config: Config) -> Result<()> {
    // Initialize thread pool if max_threads is specified
    if let Some(threads) = config.max_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| Error::Init(format!("Failed to initialize thread pool: {}", e)))?;
    }

    // Initialize logging
    if config.verbose || config.debug {
        let level = if config.debug { "debug" } else { "info" };
        tracing_subscriber::fmt().with_env_filter(level).init();
    }

    Ok(())
}
