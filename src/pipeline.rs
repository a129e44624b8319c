//! Per-file encoding pipeline
//!
//! Drives one input file through header parse, sample normalization, the
//! trimming PCM buffer and the MP3 engine, then patches the engine's
//! trailing tag frame back over the reserved spot near the start of the
//! output. Frames are handed to the engine in file order and never exceed
//! the engine's frame granularity.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::codec::encoder::{Mp3Engine, MAX_MP3_BUFFER};
use crate::codec::lame::LameEngine;
use crate::codec::pcm_buffer::PcmRingBuffer;
use crate::codec::unpack::SampleUnpacker;
use crate::codec::{QualityPreset, FRAME_SAMPLES};
use crate::error::{Error, Result};
use crate::format::{InputKind, TrimPolicy, WaveFormat};

/// Channel count assumed for headerless PCM input.
pub const RAW_CHANNELS: u16 = 2;
/// Sample rate assumed for headerless PCM input unless overridden.
pub const RAW_SAMPLE_RATE: u32 = 44100;

/// Per-run settings shared by every worker.
#[derive(Debug, Clone, Default)]
pub struct EncodeOptions {
    /// Bitrate/effort preset for the engine.
    pub quality: QualityPreset,
    /// Replaces the header sample rate (or the raw-input assumption).
    pub sample_rate: Option<u32>,
    /// Treat input as headerless 16-bit little-endian PCM.
    pub raw: bool,
}

/// Encode one input file to `output`.
///
/// The output file is created only once the input header has been
/// accepted, so rejected input leaves nothing behind.
pub fn encode_file(input: &Path, output: &Path, opts: &EncodeOptions) -> Result<()> {
    let file = File::open(input)?;
    let stream_len = file.metadata().map(|m| m.len()).ok();
    let mut reader = BufReader::new(file);

    let (format, kind) = if opts.raw {
        debug!("assuming raw pcm input");
        let rate = opts.sample_rate.unwrap_or(RAW_SAMPLE_RATE);
        (WaveFormat::raw_pcm(RAW_CHANNELS, rate), InputKind::Raw)
    } else {
        let mut format = WaveFormat::read(&mut reader)?;
        if let Some(rate) = opts.sample_rate {
            format.sample_rate = rate;
        }
        (format, InputKind::Wave)
    };

    let engine = LameEngine::new(format.sample_rate, format.channels, opts.quality)?;
    let mut pipeline = IngestionPipeline::new(format, kind, stream_len, engine)?;

    let out_file = File::create(output)?;
    let mut writer = BufWriter::new(out_file);

    info!("Start encoding [{} -> {}]", input.display(), output.display());
    debug!(
        "encoding as {} Hz, {} channel(s), quality {}",
        pipeline.format.sample_rate, pipeline.format.channels, opts.quality
    );

    pipeline.run(&mut reader, &mut writer)?;
    writer.flush()?;

    info!("Encoding {} done", output.display());
    Ok(())
}

/// Streams one audio source through an MP3 engine.
pub struct IngestionPipeline<E> {
    format: WaveFormat,
    unpacker: SampleUnpacker,
    buffer: PcmRingBuffer,
    engine: E,
    /// Samples expected per channel, reduced by the trim. `None` when the
    /// source never declared a length and no estimate was possible.
    total: Option<u64>,
    /// Stop reading once `total` samples came in. Off for estimated
    /// totals, where the count is only informational.
    careful: bool,
    samples_read: u64,
    interleaved: Vec<i32>,
    block_left: Vec<i32>,
    block_right: Vec<i32>,
    frame_left: Vec<i32>,
    frame_right: Vec<i32>,
    mp3_buf: Vec<u8>,
}

impl<E: Mp3Engine> IngestionPipeline<E> {
    /// Set up the pipeline for one source.
    ///
    /// `stream_len` is the source length in bytes when known; it feeds
    /// the sample-count estimate for sources that do not declare one.
    pub fn new(
        format: WaveFormat,
        kind: InputKind,
        stream_len: Option<u64>,
        engine: E,
    ) -> Result<Self> {
        let frame = engine.frame_samples();
        if frame == 0 || frame > FRAME_SAMPLES {
            return Err(Error::engine_init(format!(
                "engine frame size {} out of range (1..={})",
                frame, FRAME_SAMPLES
            )));
        }

        let unpacker = SampleUnpacker::for_format(&format)?;
        let trim = TrimPolicy::for_kind(kind);

        let mut careful = kind == InputKind::Wave;
        let mut total = format.total_samples;
        if total.is_none() {
            if let Some(len) = stream_len {
                total = Some(len / (2 * u64::from(format.channels)));
                careful = false;
            }
        }
        // The trimmed samples never reach the engine, so they leave the
        // expected count as well
        if let Some(n) = total.as_mut() {
            *n = n.saturating_sub(trim.total() as u64);
        }

        Ok(IngestionPipeline {
            format,
            unpacker,
            buffer: PcmRingBuffer::new(trim),
            engine,
            total,
            careful,
            samples_read: 0,
            interleaved: Vec::new(),
            block_left: Vec::new(),
            block_right: Vec::new(),
            frame_left: vec![0; frame],
            frame_right: vec![0; frame],
            mp3_buf: Vec::new(),
        })
    }

    /// Encode the whole stream, flush the engine, then patch the
    /// trailing tag frame over the reserved leading region.
    ///
    /// Read, encode and write failures are fatal for the file; a failed
    /// tag patch only logs a warning.
    pub fn run<R: Read, W: Write + Seek>(&mut self, reader: &mut R, writer: &mut W) -> Result<()> {
        let leading = self.engine.leading_tag_size();

        loop {
            let samples = self.next_frame(reader)?;
            self.engine.encode(
                &self.frame_left[..samples],
                &self.frame_right[..samples],
                &mut self.mp3_buf,
            )?;
            writer.write_all(&self.mp3_buf)?;
            if samples == 0 {
                break;
            }
        }

        self.engine.flush(&mut self.mp3_buf)?;
        writer.write_all(&self.mp3_buf)?;

        self.patch_tag(writer, leading);
        Ok(())
    }

    /// Tear down the pipeline and hand the engine back.
    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Pull the next frame out of the buffer, reading as often as needed
    /// while incoming samples still fall inside the trimmed lead-in.
    /// Returns 0 at end of stream.
    fn next_frame<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let available = loop {
            let read = self.read_block(reader)?;
            let available = self.buffer.append(&self.block_left, &self.block_right);
            if read == 0 || available > 0 {
                break available;
            }
        };

        Ok(self.buffer.take(
            &mut self.frame_left,
            &mut self.frame_right,
            available,
            self.engine.frame_samples(),
        ))
    }

    /// Read up to one frame's worth of samples per channel and split them
    /// into the per-channel block buffers. Mono input leaves the right
    /// block zero-filled.
    fn read_block<R: Read>(&mut self, reader: &mut R) -> Result<usize> {
        let channels = self.format.channels as usize;

        let mut want = self.engine.frame_samples();
        if self.careful {
            if let Some(total) = self.total {
                let remaining = total.saturating_sub(self.samples_read);
                if total != 0 && remaining < want as u64 {
                    want = remaining as usize;
                }
            }
        }

        let words = self
            .unpacker
            .read_samples(reader, &mut self.interleaved, want * channels)?;
        let samples = words / channels;

        self.block_left.clear();
        self.block_right.clear();
        if channels == 2 {
            for pair in self.interleaved[..samples * 2].chunks_exact(2) {
                self.block_left.push(pair[0]);
                self.block_right.push(pair[1]);
            }
        } else {
            self.block_left.extend_from_slice(&self.interleaved[..samples]);
            self.block_right.resize(samples, 0);
        }

        if self.total.is_some() {
            self.samples_read += samples as u64;
        }
        Ok(samples)
    }

    /// Overwrite the reserved leading region with the engine's trailing
    /// tag frame. Every failure here is non-fatal.
    fn patch_tag<W: Write + Seek>(&mut self, writer: &mut W, leading: u64) {
        let size = match self.engine.tag_frame(&mut self.mp3_buf) {
            Ok(size) => size,
            Err(e) => {
                warn!("could not build trailing tag frame: {}", e);
                return;
            }
        };

        if size == 0 {
            debug!("no trailing tag frame exists");
            return;
        }
        if size > MAX_MP3_BUFFER {
            debug!("trailing tag frame exceeds buffer size");
            return;
        }

        if let Err(e) = writer.seek(SeekFrom::Start(leading)) {
            warn!("can't update trailing tag frame: {}", e);
            return;
        }
        if let Err(e) = writer.write_all(&self.mp3_buf) {
            warn!("failed to write trailing tag frame: {}", e);
        }
    }
}
