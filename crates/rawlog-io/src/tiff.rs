//! TIFF output for rendered images.
//!
//! Writes RGB8 or RGB16 depending on the image's [`BitDepth`], with
//! Deflate compression and the horizontal predictor. The color profile
//! name goes into `ImageDescription`; Adobe RGB (1998) output also embeds
//! its ICC profile (tag 34675) so color-managed viewers do not assume sRGB.
//!
//! The encoder writes into a temporary file next to the destination, which
//! is renamed into place only after the last byte is flushed. A failed
//! write leaves no file at `path`.

use rawlog_core::{BitDepth, RenderedImage};
use std::io::{Seek, Write};
use std::path::Path;
use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tiff::tags::{Predictor, Tag};
use tracing::debug;

use crate::output::write_atomic;
use crate::{IoError, IoResult, icc};

const SOFTWARE: &str = concat!("rawlog ", env!("CARGO_PKG_VERSION"));

/// Writes `image` to `path` as a TIFF.
///
/// # Errors
///
/// [`IoError::Io`] when the temporary file cannot be created or
/// persisted, [`IoError::EncodeError`] when encoding fails.
pub fn write<P: AsRef<Path>>(path: P, image: &RenderedImage) -> IoResult<()> {
    let path = path.as_ref();
    write_atomic(path, |out| encode(out, image))?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        bits = image.depth().bits(),
        profile = image.profile(),
        "Wrote TIFF"
    );
    Ok(())
}

/// Encodes `image` into an in-memory TIFF.
pub fn write_to_memory(image: &RenderedImage) -> IoResult<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    encode(&mut cursor, image)?;
    Ok(cursor.into_inner())
}

fn encode<W: Write + Seek>(out: W, image: &RenderedImage) -> IoResult<()> {
    let icc = icc::profile_for(image.profile())?;
    let encoder = TiffEncoder::new(out)
        .map_err(|e: tiff::TiffError| IoError::EncodeError(e.to_string()))?
        .with_compression(Compression::Deflate(DeflateLevel::Balanced))
        .with_predictor(Predictor::Horizontal);

    match image.depth() {
        BitDepth::Sixteen => {
            write_image::<colortype::RGB16, _>(encoder, image, icc.as_deref(), image.data())
        }
        BitDepth::Eight => {
            write_image::<colortype::RGB8, _>(encoder, image, icc.as_deref(), &image.to_u8())
        }
    }
}

fn write_image<C, W>(
    mut encoder: TiffEncoder<W>,
    image: &RenderedImage,
    icc: Option<&[u8]>,
    data: &[C::Inner],
) -> IoResult<()>
where
    C: colortype::ColorType,
    [C::Inner]: tiff::encoder::TiffValue,
    W: Write + Seek,
{
    let encode_err = |e: tiff::TiffError| IoError::EncodeError(e.to_string());

    let mut tiff_image = encoder
        .new_image::<C>(image.width(), image.height())
        .map_err(encode_err)?;
    tiff_image
        .encoder()
        .write_tag(Tag::ImageDescription, image.profile())
        .map_err(encode_err)?;
    tiff_image
        .encoder()
        .write_tag(Tag::Software, SOFTWARE)
        .map_err(encode_err)?;
    if let Some(icc) = icc {
        tiff_image
            .encoder()
            .write_tag(Tag::IccProfile, icc)
            .map_err(encode_err)?;
    }
    tiff_image.write_data(data).map_err(encode_err)
}
