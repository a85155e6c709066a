//! JPEG output for rendered images.
//!
//! Always 8-bit: quality 95, 4:4:4 chroma and optimized Huffman tables.
//! Adobe RGB (1998) output embeds its ICC profile in APP2.

use jpeg_encoder::{ColorType, Encoder, EncodingError, SamplingFactor};
use rawlog_core::RenderedImage;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::output::write_atomic;
use crate::{IoError, IoResult, icc};

/// Encoder quality (1-100).
pub const QUALITY: u8 = 95;

/// Writes `image` to `path` as a JPEG.
///
/// A 16-bit image is narrowed to 8 bits first.
pub fn write<P: AsRef<Path>>(path: P, image: &RenderedImage) -> IoResult<()> {
    let path = path.as_ref();
    write_atomic(path, |out| encode(out, image))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        profile = image.profile(),
        "Wrote JPEG"
    );
    Ok(())
}

/// Encodes `image` into an in-memory JPEG.
pub fn write_to_memory(image: &RenderedImage) -> IoResult<Vec<u8>> {
    let mut buffer = Vec::new();
    encode(&mut buffer, image)?;
    Ok(buffer)
}

fn encode<W: Write>(out: W, image: &RenderedImage) -> IoResult<()> {
    let too_large = || {
        IoError::UnsupportedFormat(format!(
            "{}x{} exceeds the JPEG limit of 65535 pixels per side",
            image.width(),
            image.height()
        ))
    };
    let width = u16::try_from(image.width()).map_err(|_| too_large())?;
    let height = u16::try_from(image.height()).map_err(|_| too_large())?;
    let encode_err = |e: EncodingError| IoError::EncodeError(e.to_string());

    let mut encoder = Encoder::new(out, QUALITY);
    encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
    encoder.set_optimized_huffman_tables(true);
    if let Some(icc) = icc::profile_for(image.profile())? {
        encoder.add_icc_profile(&icc).map_err(encode_err)?;
    }
    encoder
        .encode(&image.to_u8(), width, height, ColorType::Rgb)
        .map_err(encode_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jpeg_decoder::{Decoder, PixelFormat};
    use rawlog_core::BitDepth;

    fn gray(depth: BitDepth, code: u16) -> RenderedImage {
        RenderedImage::new(16, 8, depth, vec![code; 16 * 8 * 3], "Adobe RGB (1998)").unwrap()
    }

    #[test]
    fn test_decodes_as_8bit_rgb() {
        let bytes = write_to_memory(&gray(BitDepth::Eight, 117)).unwrap();
        let mut decoder = Decoder::new(std::io::Cursor::new(bytes));
        let pixels = decoder.decode().unwrap();
        let info = decoder.info().unwrap();
        assert_eq!((info.width, info.height), (16, 8));
        assert_eq!(info.pixel_format, PixelFormat::RGB24);
        assert!(pixels.iter().all(|&v| v.abs_diff(117) <= 1), "{pixels:?}");
    }

    #[test]
    fn test_sixteen_bit_is_narrowed() {
        // 30069 / 65535 * 255 = 117.0
        let bytes = write_to_memory(&gray(BitDepth::Sixteen, 30069)).unwrap();
        let pixels = Decoder::new(std::io::Cursor::new(bytes)).decode().unwrap();
        assert!(pixels.iter().all(|&v| v.abs_diff(117) <= 1));
    }

    #[test]
    fn test_embeds_icc_profile() {
        let bytes = write_to_memory(&gray(BitDepth::Eight, 200)).unwrap();
        let mut decoder = Decoder::new(std::io::Cursor::new(bytes));
        decoder.decode().unwrap();
        let embedded = decoder.icc_profile().unwrap();
        assert_eq!(embedded, icc::profile_for("Adobe RGB (1998)").unwrap().unwrap());
    }

    #[test]
    fn test_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.jpg");
        write(&path, &gray(BitDepth::Eight, 64)).unwrap();
        assert_eq!(&std::fs::read(&path).unwrap()[..2], &[0xFF, 0xD8]);
    }
}
