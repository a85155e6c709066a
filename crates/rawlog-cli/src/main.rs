//! rawlog - camera RAW to log and Adobe RGB deliverables
//!
//! Decodes a RAW file, converts it through ACES AP0 into the chosen camera
//! log encoding, optionally applies a creative LUT, and writes a TIFF or JPEG.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

mod commands;
mod config;
mod logging;

use config::{Options, Settings};

#[derive(Parser)]
#[command(name = "rawlog")]
#[command(author, version, about = "Convert camera RAW files to camera log and Adobe RGB deliverables")]
#[command(long_about = "
Converts camera RAW files through ACES AP0 into a camera log encoding,
optionally applies a 3D LUT, and writes an RGB TIFF or JPEG.

INPUT may be a single RAW file, a directory, or a glob pattern. For a
directory or pattern, OUTPUT is a directory and files are processed in
parallel. A single OUTPUT file's extension (.tif, .tiff, .jpg, .jpeg)
picks the format; --format picks it for directory output.

Examples:
  rawlog DSCF0001.RAF out.tif                       # F-Log2 -> Adobe RGB
  rawlog A001.ARW out.tif --log-space S-Log3 --exposure -0.5
  rawlog A001.ARW preview.jpg                       # 8-bit JPEG, quality 95
  rawlog shots/ renders/ --lut look.cube --lut-space Rec.709
  rawlog 'card/*.NEF' masters/ --log-space N-Log --log-output
")]
struct Cli {
    /// RAW file, directory, or glob pattern
    input: PathBuf,

    /// Output TIFF/JPEG (single file) or directory (batch)
    output: PathBuf,

    /// Target log space (F-Log, F-Log2, F-Log2C, S-Log3, V-Log, N-Log, ...)
    #[arg(long)]
    log_space: Option<String>,

    /// Camera matrix source: metadata, adobe
    #[arg(long)]
    matrix_method: Option<String>,

    /// Manual exposure in stops (overrides metadata and auto exposure)
    #[arg(long, allow_hyphen_values = true)]
    exposure: Option<f64>,

    /// Auto-exposure metering: average, center-weighted, highlight-safe, hybrid, matrix
    #[arg(long)]
    metering: Option<String>,

    /// Creative 3D LUT (.cube), applied to the log signal
    #[arg(long)]
    lut: Option<PathBuf>,

    /// Output gamut of the LUT: Rec.709, Rec.2020 (required with --lut)
    #[arg(long)]
    lut_space: Option<String>,

    /// LUT interpolation: tetrahedral, trilinear
    #[arg(long)]
    interpolation: Option<String>,

    /// Output bit depth: 8 or 16
    #[arg(long)]
    depth: Option<u8>,

    /// Output format for directory output: tiff, jpeg
    #[arg(long)]
    format: Option<String>,

    /// Write the log (or LUT) signal instead of Adobe RGB
    #[arg(long)]
    log_output: bool,

    /// YAML config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Options given as flags.
    fn options(&self) -> Options {
        Options {
            log_space: self.log_space.clone(),
            matrix_method: self.matrix_method.clone(),
            exposure: self.exposure,
            metering: self.metering.clone(),
            lut: self.lut.clone(),
            lut_space: self.lut_space.clone(),
            interpolation: self.interpolation.clone(),
            depth: self.depth,
            format: self.format.clone(),
            log_output: self.log_output.then_some(true),
            threads: self.threads,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    let file_options = match &cli.config {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let batch = commands::batch::is_batch(&cli.input);
    let output_file = (!batch && !cli.output.is_dir()).then_some(cli.output.as_path());
    let settings = Settings::resolve(file_options.merged(cli.options()), output_file)?;
    debug!(?settings, "Resolved settings");

    // Configure thread pool
    if settings.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(settings.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let pipeline = settings.pipeline()?;

    if batch {
        commands::batch::run(&pipeline, &cli.input, &cli.output, settings.format)
    } else {
        commands::render::run(&pipeline, &cli.input, &cli.output, settings.format)
    }
}
