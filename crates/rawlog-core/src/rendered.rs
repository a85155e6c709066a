//! Quantized delivery rasters.

use crate::error::sample_count;
use crate::{CoreError, CoreResult};

/// Output bit depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 8 bits per channel.
    Eight,
    /// 16 bits per channel.
    #[default]
    Sixteen,
}

impl BitDepth {
    /// Bits per channel.
    pub fn bits(self) -> u8 {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
        }
    }

    /// Largest code value, `2^bits - 1`.
    pub fn max_code(self) -> u16 {
        match self {
            Self::Eight => u8::MAX as u16,
            Self::Sixteen => u16::MAX,
        }
    }

    /// Parses 8 or 16.
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            _ => None,
        }
    }
}

/// Quantized RGB raster ready for encoding.
///
/// Code values are stored as `u16` for both depths; an 8-bit image keeps
/// every value in `0..=255`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    data: Vec<u16>,
    width: u32,
    height: u32,
    depth: BitDepth,
    profile: &'static str,
}

impl RenderedImage {
    /// Wraps quantized samples.
    ///
    /// `profile` names the color encoding of the codes (e.g.
    /// `"Adobe RGB (1998)"` or `"F-Log2"`).
    pub fn new(
        width: u32,
        height: u32,
        depth: BitDepth,
        data: Vec<u16>,
        profile: &'static str,
    ) -> CoreResult<Self> {
        let expected = sample_count(width, height)?;
        if data.len() != expected {
            return Err(CoreError::DataLength {
                expected,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            depth,
            profile,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bit depth of the code values.
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Declared color profile name.
    pub fn profile(&self) -> &'static str {
        self.profile
    }

    /// Interleaved code values.
    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Code values as bytes, for 8-bit encoders.
    ///
    /// 16-bit codes are rescaled to `0..=255` with rounding.
    pub fn to_u8(&self) -> Vec<u8> {
        match self.depth {
            BitDepth::Eight => self.data.iter().map(|&v| v.min(255) as u8).collect(),
            BitDepth::Sixteen => self
                .data
                .iter()
                .map(|&v| ((v as u32 * 255 + 32767) / 65535) as u8)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth() {
        assert_eq!(BitDepth::Sixteen.max_code(), 65535);
        assert_eq!(BitDepth::Eight.max_code(), 255);
        assert_eq!(BitDepth::from_bits(8), Some(BitDepth::Eight));
        assert_eq!(BitDepth::from_bits(12), None);
        assert_eq!(BitDepth::default(), BitDepth::Sixteen);
    }

    #[test]
    fn test_rendered_validates_length() {
        assert!(RenderedImage::new(1, 1, BitDepth::Eight, vec![0, 128, 255], "sRGB").is_ok());
        assert!(RenderedImage::new(1, 2, BitDepth::Eight, vec![0; 3], "sRGB").is_err());
    }

    #[test]
    fn test_to_u8_rescales_sixteen_bit() {
        let wide = RenderedImage::new(1, 1, BitDepth::Sixteen, vec![0, 32768, 65535], "sRGB").unwrap();
        assert_eq!(wide.to_u8(), vec![0, 128, 255]);

        let narrow = RenderedImage::new(1, 1, BitDepth::Eight, vec![0, 128, 255], "sRGB").unwrap();
        assert_eq!(narrow.to_u8(), vec![0, 128, 255]);
    }
}
