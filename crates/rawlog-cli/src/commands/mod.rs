//! Command implementations.

pub mod batch;
pub mod render;

use anyhow::{Context, Result};
use rawlog_color::{CancelToken, Pipeline, PipelineOutput};
use rawlog_core::RenderedImage;
use rawlog_io::{DecodedRaw, RawDecoder, RawloaderDecoder};
use std::path::Path;
use tracing::info;

/// Decode a RAW file.
pub fn load_raw(path: &Path) -> Result<DecodedRaw> {
    RawloaderDecoder::new()
        .decode(path)
        .with_context(|| format!("Failed to decode: {}", path.display()))
}

/// Save a rendered image in the format named by `path`'s extension.
pub fn save(path: &Path, image: &RenderedImage) -> Result<()> {
    rawlog_io::write(path, image)
        .with_context(|| format!("Failed to save: {}", path.display()))
}

/// Decode, run and write one file.
///
/// Nothing is written unless every stage succeeds.
pub fn process_file(
    pipeline: &Pipeline,
    input: &Path,
    output: &Path,
    cancel: &CancelToken,
) -> Result<PipelineOutput> {
    let decoded = load_raw(input)?;
    let result = pipeline
        .run(decoded.buffer, &decoded.metadata, cancel)
        .with_context(|| format!("Failed to process: {}", input.display()))?;
    save(output, &result.image)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        stops = result.exposure.stops,
        source = %result.exposure.source,
        profile = result.image.profile(),
        "Rendered"
    );
    Ok(result)
}
