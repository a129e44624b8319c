//! Error types for mp3press

use thiserror::Error;

/// Result type alias for mp3press operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for mp3press
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not a RIFF stream at all
    #[error("unsupported audio format (not a RIFF file)")]
    NotRecognized,

    /// Input claims to be RIFF/WAVE but violates the container layout
    #[error("corrupt or unsupported WAVE file: {0}")]
    Corrupt(String),

    /// WAVE format tag is neither integer PCM nor IEEE float
    #[error("unsupported data format: 0x{0:04x}")]
    UnsupportedFormat(u16),

    /// Channel count outside mono/stereo
    #[error("unsupported number of channels: {0}")]
    UnsupportedChannels(u16),

    /// Environment precondition violated; aborts the whole run
    #[error("platform error: {0}")]
    Platform(String),

    /// MP3 engine could not be constructed
    #[error("encoder init failed: {0}")]
    EngineInit(String),

    /// MP3 engine rejected the output buffer as too small
    #[error("mp3 buffer is not big enough")]
    EncoderBufferTooSmall,

    /// MP3 engine reported an internal failure
    #[error("mp3 internal error: {0}")]
    EncoderInternal(String),

    /// Library initialization failed
    #[error("Initialization error: {0}")]
    Init(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a corrupt-container error
    pub fn corrupt<S: Into<String>>(msg: S) -> Self {
        Error::Corrupt(msg.into())
    }

    /// Create a platform error
    pub fn platform<S: Into<String>>(msg: S) -> Self {
        Error::Platform(msg.into())
    }

    /// Create an engine init error
    pub fn engine_init<S: Into<String>>(msg: S) -> Self {
        Error::EngineInit(msg.into())
    }

    /// Create an engine internal error
    pub fn encoder_internal<S: Into<String>>(msg: S) -> Self {
        Error::EncoderInternal(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for errors that must abort the whole batch run, not just
    /// the file that raised them.
    pub fn is_run_fatal(&self) -> bool {
        matches!(self, Error::Platform(_))
    }
}
