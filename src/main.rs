//! mp3press CLI
//!
//! A command-line tool for batch WAV to MP3 encoding

use clap::Parser;
use std::path::PathBuf;

use mp3press_lib::batch::{self, BatchOptions};
use mp3press_lib::codec::QualityPreset;
use mp3press_lib::pipeline::EncodeOptions;
use mp3press_lib::{init, Config};

#[derive(Parser)]
#[command(name = "mp3press")]
#[command(about = "mp3press - parallel WAV to MP3 encoder", long_about = None)]
#[command(version)]
struct Cli {
    /// Input WAV file or directory of WAV files
    input: PathBuf,

    /// Output file path (single-file input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Search subdirectories recursively
    #[arg(short, long)]
    recursive: bool,

    /// Quality level (fast, standard, best)
    #[arg(short, long, default_value = "standard")]
    quality: QualityPreset,

    /// Treat input as headerless 16-bit little-endian PCM
    #[arg(long)]
    raw: bool,

    /// Override the sample rate declared by the input
    #[arg(long, value_name = "HZ")]
    sample_rate: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Number of worker threads to use
    #[arg(short = 't', long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize the library
    let config = Config {
        max_threads: cli.threads,
        verbose: cli.verbose,
        debug: cli.debug,
    };

    init(config)?;

    println!("mp3press v{}", mp3press_lib::VERSION);

    let opts = BatchOptions {
        recursive: cli.recursive,
        output: cli.output,
        encode: EncodeOptions {
            quality: cli.quality,
            sample_rate: cli.sample_rate,
            raw: cli.raw,
        },
    };

    let summary = batch::run(&cli.input, &opts)?;

    println!(
        "{} file(s) encoded, {} failed",
        summary.encoded,
        summary.failed.len()
    );
    for (path, err) in &summary.failed {
        eprintln!("  {}: {}", path.display(), err);
    }

    if !summary.all_ok() {
        anyhow::bail!("{} file(s) failed to encode", summary.failed.len());
    }

    Ok(())
}
