//! Delivery rendering: linearize, convert, encode, clip, quantize.
//!
//! # Delivery path
//!
//! ```text
//! Log(name)       ─ log decode ─┐
//!                               ├─ gamut → Adobe RGB ─ x^(256/563) ─ clip ─ quantize
//! Display(space)  ─ BT.1886 ────┘
//! ```
//!
//! The clip here is the only clip in the pipeline.
//!
//! [`RenderTarget::LogSignal`] skips the delivery conversion and quantizes
//! the log (or LUT) signal as-is, for a flat master.

use rawlog_core::{BitDepth, Encoding, PixelBuffer, RenderedImage};
use rawlog_math::Cat;
use rawlog_math::simd::clamp01_inplace;
use rawlog_primaries::ColorSpaceDescriptor;
use rawlog_transfer::gamma::{adobe_rgb_oetf, bt1886_eotf};
use rayon::prelude::*;
use tracing::debug;

use crate::gamut::GamutTransform;
use crate::log::LogStage;
use crate::{ColorError, ColorResult};

/// Delivery color space.
pub const DELIVERY_SPACE: &str = "Adobe RGB (1998)";

/// What the renderer writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    /// Display-ready Adobe RGB (1998).
    #[default]
    Delivery,
    /// The log or LUT signal, quantized without conversion.
    LogSignal,
}

/// Quantizes one value: clip to `[0, 1]`, scale, round half away from zero.
///
/// NaN quantizes to 0.
#[inline]
pub fn quantize(v: f32, depth: BitDepth) -> u16 {
    if v.is_nan() {
        return 0;
    }
    let max = depth.max_code() as f32;
    (v.clamp(0.0, 1.0) * max).round() as u16
}

/// Final stage: produces a [`RenderedImage`].
#[derive(Debug, Clone, Copy)]
pub struct OutputRenderer {
    delivery: ColorSpaceDescriptor,
    depth: BitDepth,
    target: RenderTarget,
    cat: Cat,
}

impl OutputRenderer {
    /// Renderer for Adobe RGB (1998) at `depth`.
    pub fn new(depth: BitDepth) -> ColorResult<Self> {
        Ok(Self {
            delivery: rawlog_primaries::lookup(DELIVERY_SPACE)?,
            depth,
            target: RenderTarget::default(),
            cat: Cat::default(),
        })
    }

    /// Sets the render target.
    pub fn with_target(mut self, target: RenderTarget) -> Self {
        self.target = target;
        self
    }

    /// Sets the chromatic adaptation used for the delivery conversion.
    pub fn with_cat(mut self, cat: Cat) -> Self {
        self.cat = cat;
        self
    }

    /// Output bit depth.
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Render target.
    pub fn target(&self) -> RenderTarget {
        self.target
    }

    /// Renders `buffer`.
    ///
    /// # Errors
    ///
    /// [`ColorError::EncodingMismatch`] for a scene-linear buffer, and
    /// lookup errors when the tag names an unknown log or color space.
    pub fn render(&self, buffer: PixelBuffer) -> ColorResult<RenderedImage> {
        match (self.target, buffer.encoding()) {
            (_, found @ Encoding::SceneLinear(_)) => Err(ColorError::mismatch(
                "render",
                "a log or display signal",
                found,
            )),
            (RenderTarget::LogSignal, enc) => self.quantize(&buffer, enc.name()),
            (RenderTarget::Delivery, Encoding::Log(name)) => {
                let stage = LogStage::new(name)?;
                let linear = stage.decode(buffer)?;
                self.deliver(linear)
            }
            (RenderTarget::Delivery, Encoding::Display(space)) => {
                let linear = buffer
                    .map_pixels(|[r, g, b]| {
                        [
                            bt1886_eotf(r as f64) as f32,
                            bt1886_eotf(g as f64) as f32,
                            bt1886_eotf(b as f64) as f32,
                        ]
                    })
                    .retag(Encoding::SceneLinear(space));
                self.deliver(linear)
            }
        }
    }

    /// Scene-linear buffer → delivery codes.
    fn deliver(&self, linear: PixelBuffer) -> ColorResult<RenderedImage> {
        let src = rawlog_primaries::lookup(linear.encoding().name())?;
        let to_delivery = GamutTransform::between(&src, &self.delivery, self.cat)?;
        debug!(src = src.name, dst = self.delivery.name, depth = self.depth.bits(), "Rendering delivery");

        let mut encoded = to_delivery.apply(linear)?.map_pixels(|rgb| {
            rgb.map(|v| adobe_rgb_oetf(v as f64) as f32)
        });
        // hard gamut clip
        encoded.par_rows_mut(|_, row| clamp01_inplace(row));
        self.quantize(&encoded, self.delivery.name)
    }

    fn quantize(&self, buffer: &PixelBuffer, profile: &'static str) -> ColorResult<RenderedImage> {
        let depth = self.depth;
        let codes: Vec<u16> = buffer.data().par_iter().map(|&v| quantize(v, depth)).collect();
        Ok(RenderedImage::new(
            buffer.width(),
            buffer.height(),
            depth,
            codes,
            profile,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_boundaries() {
        assert_eq!(quantize(1.0, BitDepth::Sixteen), 65535);
        assert_eq!(quantize(0.0, BitDepth::Sixteen), 0);
        assert_eq!(quantize(1.5, BitDepth::Sixteen), 65535);
        assert_eq!(quantize(-0.2, BitDepth::Sixteen), 0);
        assert_eq!(quantize(f32::NAN, BitDepth::Sixteen), 0);
        assert_eq!(quantize(1.0, BitDepth::Eight), 255);
        assert_eq!(quantize(0.5, BitDepth::Eight), 128);
    }

    #[test]
    fn test_log_signal_passthrough() {
        let r = OutputRenderer::new(BitDepth::Sixteen)
            .unwrap()
            .with_target(RenderTarget::LogSignal);
        let buf = PixelBuffer::filled(2, 1, [0.0, 0.5, 1.0], Encoding::Log("F-Log2")).unwrap();
        let img = r.render(buf).unwrap();
        assert_eq!(img.profile(), "F-Log2");
        assert_eq!(&img.data()[..3], &[0, 32768, 65535]);
    }

    #[test]
    fn test_display_white_is_full_scale() {
        // BT.1886 white in Rec.709 is D65 white, which is Adobe RGB white.
        let r = OutputRenderer::new(BitDepth::Sixteen).unwrap();
        let buf = PixelBuffer::filled(1, 1, [1.0; 3], Encoding::Display("Rec.709")).unwrap();
        let img = r.render(buf).unwrap();
        assert_eq!(img.profile(), DELIVERY_SPACE);
        assert_eq!(img.data(), &[65535, 65535, 65535]);
    }

    #[test]
    fn test_log_middle_gray_renders_neutral() {
        let r = OutputRenderer::new(BitDepth::Eight).unwrap();
        let stage = LogStage::new("F-Log2").unwrap();
        let code = stage.encode_value(0.18);
        let buf = PixelBuffer::filled(1, 1, [code; 3], Encoding::Log("F-Log2")).unwrap();
        let img = r.render(buf).unwrap();
        let px = img.data();
        // 0.18^(256/563) ≈ 0.4585 → 117
        assert!(px.iter().all(|&v| (116..=118).contains(&v)), "{px:?}");
        assert_eq!(px[0], px[1]);
        assert_eq!(px[1], px[2]);
    }

    #[test]
    fn test_rejects_scene_linear() {
        let r = OutputRenderer::new(BitDepth::Sixteen).unwrap();
        let buf = PixelBuffer::filled(1, 1, [0.18; 3], Encoding::SceneLinear("F-Gamut")).unwrap();
        assert!(matches!(r.render(buf), Err(ColorError::EncodingMismatch { .. })));
    }
}
