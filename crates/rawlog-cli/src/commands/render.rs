//! Single-file conversion.

use anyhow::Result;
use rawlog_color::{CancelToken, Pipeline};
use rawlog_io::OutputFormat;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Where a single render lands: `output` itself, or `output/<stem>.<ext>`
/// when `output` is an existing directory.
pub fn output_path(input: &Path, output: &Path, format: OutputFormat) -> PathBuf {
    if output.is_dir() {
        super::batch::output_path(output, input, format)
    } else {
        output.to_path_buf()
    }
}

pub fn run(pipeline: &Pipeline, input: &Path, output: &Path, format: OutputFormat) -> Result<()> {
    trace!(input = %input.display(), output = %output.display(), "render::run");

    let output = output_path(input, output, format);
    let result = super::process_file(pipeline, input, &output, &CancelToken::new())?;
    println!(
        "{} -> {} ({:+.2} stops, {})",
        input.display(),
        output.display(),
        result.exposure.stops,
        result.exposure.source
    );
    Ok(())
}
