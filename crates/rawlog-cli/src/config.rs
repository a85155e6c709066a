//! Run configuration: YAML file merged with command-line flags.
//!
//! ```yaml
//! log_space: S-Log3
//! matrix_method: metadata
//! metering: hybrid
//! lut: looks/print.cube
//! lut_space: Rec.709
//! depth: 16
//! format: tiff
//! threads: 8
//! ```
//!
//! Every key is optional. A flag given on the command line replaces the
//! file's value.

use anyhow::{Context, Result};
use rawlog_color::{
    ColorError, ColorResult, LutSpace, MatrixMethod, Metering, Pipeline, RenderTarget,
};
use rawlog_core::BitDepth;
use rawlog_io::OutputFormat;
use rawlog_lut::Interpolation;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Log space used when neither file nor flags name one.
pub const DEFAULT_LOG_SPACE: &str = "F-Log2";

/// Raw option values, as read from YAML or collected from flags.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub log_space: Option<String>,
    pub matrix_method: Option<String>,
    pub exposure: Option<f64>,
    pub metering: Option<String>,
    pub lut: Option<PathBuf>,
    pub lut_space: Option<String>,
    pub interpolation: Option<String>,
    pub depth: Option<u8>,
    pub format: Option<String>,
    pub log_output: Option<bool>,
    pub threads: Option<usize>,
}

impl Options {
    /// Reads a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Parses YAML text. An empty document yields all defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// `self` with every value set in `over` replaced.
    pub fn merged(self, over: Options) -> Self {
        Self {
            log_space: over.log_space.or(self.log_space),
            matrix_method: over.matrix_method.or(self.matrix_method),
            exposure: over.exposure.or(self.exposure),
            metering: over.metering.or(self.metering),
            lut: over.lut.or(self.lut),
            lut_space: over.lut_space.or(self.lut_space),
            interpolation: over.interpolation.or(self.interpolation),
            depth: over.depth.or(self.depth),
            format: over.format.or(self.format),
            log_output: over.log_output.or(self.log_output),
            threads: over.threads.or(self.threads),
        }
    }
}

/// Validated settings for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_space: String,
    pub matrix_method: MatrixMethod,
    pub exposure: Option<f64>,
    pub metering: Metering,
    pub lut: Option<(PathBuf, LutSpace)>,
    pub interpolation: Interpolation,
    pub depth: BitDepth,
    pub format: OutputFormat,
    pub target: RenderTarget,
    pub threads: usize,
}

impl Settings {
    /// Validates `options` and fills in defaults.
    ///
    /// `output_file` is the single output path, if there is one; its
    /// extension picks the format. Every problem is a
    /// [`ColorError::UsageError`].
    pub fn resolve(options: Options, output_file: Option<&Path>) -> ColorResult<Self> {
        let matrix_method = parse(options.matrix_method, "matrix method", MatrixMethod::from_name)?
            .unwrap_or_default();
        let metering = parse(options.metering, "metering mode", Metering::from_name)?.unwrap_or_default();
        let interpolation =
            parse(options.interpolation, "interpolation", Interpolation::from_name)?.unwrap_or_default();
        let lut_space = parse(options.lut_space, "LUT space", LutSpace::from_name)?;

        let lut = match (options.lut, lut_space) {
            (Some(path), Some(space)) => Some((path, space)),
            (Some(path), None) => {
                return Err(usage(format!(
                    "--lut {} requires --lut-space (Rec.709 or Rec.2020)",
                    path.display()
                )));
            }
            (None, Some(space)) => {
                return Err(usage(format!("--lut-space {space} given without --lut")));
            }
            (None, None) => None,
        };

        let named = parse(options.format, "output format", OutputFormat::from_name)?;
        let implied = output_file
            .map(OutputFormat::from_path)
            .transpose()
            .map_err(|e| usage(e.to_string()))?;
        let format = match (named, implied) {
            (Some(named), Some(implied)) if named != implied => {
                return Err(usage(format!(
                    "--format {named} conflicts with the {implied} output extension"
                )));
            }
            (named, implied) => named.or(implied).unwrap_or_default(),
        };

        let depth = options
            .depth
            .map(|bits| {
                BitDepth::from_bits(bits).ok_or_else(|| usage(format!("depth must be 8 or 16, got {bits}")))
            })
            .transpose()?;
        let depth = match (depth, format) {
            (Some(BitDepth::Sixteen), OutputFormat::Jpeg) => {
                return Err(usage("JPEG output is 8-bit only".to_string()));
            }
            (_, OutputFormat::Jpeg) => BitDepth::Eight,
            (depth, OutputFormat::Tiff) => depth.unwrap_or_default(),
        };

        if let Some(stops) = options.exposure.filter(|s| !s.is_finite()) {
            return Err(usage(format!("exposure must be finite, got {stops}")));
        }

        Ok(Self {
            log_space: options.log_space.unwrap_or_else(|| DEFAULT_LOG_SPACE.to_string()),
            matrix_method,
            exposure: options.exposure,
            metering,
            lut,
            interpolation,
            depth,
            format,
            target: if options.log_output.unwrap_or(false) {
                RenderTarget::LogSignal
            } else {
                RenderTarget::Delivery
            },
            threads: options.threads.unwrap_or(0),
        })
    }

    /// Loads the LUT (if any) and builds the pipeline.
    pub fn pipeline(&self) -> Result<Pipeline> {
        let mut builder = Pipeline::builder(self.log_space.clone())
            .matrix_method(self.matrix_method)
            .exposure(self.exposure)
            .metering(self.metering)
            .interpolation(self.interpolation)
            .depth(self.depth)
            .target(self.target);

        if let Some((path, space)) = &self.lut {
            let lut = rawlog_lut::cube::read_3d(path)
                .with_context(|| format!("Failed to load LUT: {}", path.display()))?;
            info!(path = %path.display(), size = lut.size(), space = %space, "Loaded LUT");
            builder = builder.lut(Arc::new(lut), *space);
        }
        Ok(builder.build()?)
    }
}

fn usage(message: String) -> ColorError {
    ColorError::UsageError(message)
}

fn parse<T>(value: Option<String>, what: &str, from_name: fn(&str) -> Option<T>) -> ColorResult<Option<T>> {
    value
        .map(|v| from_name(&v).ok_or_else(|| usage(format!("unknown {what}: {v}"))))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::resolve(Options::default(), None).unwrap();
        assert_eq!(s.log_space, "F-Log2");
        assert_eq!(s.matrix_method, MatrixMethod::Metadata);
        assert_eq!(s.metering, Metering::Hybrid);
        assert_eq!(s.interpolation, Interpolation::Tetrahedral);
        assert_eq!(s.depth, BitDepth::Sixteen);
        assert_eq!(s.format, OutputFormat::Tiff);
        assert_eq!(s.target, RenderTarget::Delivery);
        assert_eq!(s.lut, None);
        assert_eq!(s.threads, 0);
    }

    #[test]
    fn test_yaml_keys() {
        let yaml = "
log_space: S-Log3
matrix_method: adobe
exposure: -1.5
metering: center-weighted
lut: look.cube
lut_space: Rec.2020
interpolation: trilinear
depth: 8
format: tiff
log_output: true
threads: 4
";
        let s = Settings::resolve(Options::from_yaml(yaml).unwrap(), None).unwrap();
        assert_eq!(s.log_space, "S-Log3");
        assert_eq!(s.matrix_method, MatrixMethod::Adobe);
        assert_eq!(s.exposure, Some(-1.5));
        assert_eq!(s.metering, Metering::CenterWeighted);
        assert_eq!(s.lut, Some((PathBuf::from("look.cube"), LutSpace::Rec2020)));
        assert_eq!(s.interpolation, Interpolation::Trilinear);
        assert_eq!(s.depth, BitDepth::Eight);
        assert_eq!(s.target, RenderTarget::LogSignal);
        assert_eq!(s.threads, 4);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Options::from_yaml("log_spcae: V-Log\n").is_err());
        assert_eq!(Options::from_yaml("  \n").unwrap(), Options::default());
    }

    #[test]
    fn test_flags_override_file() {
        let file = Options {
            log_space: Some("V-Log".into()),
            depth: Some(8),
            exposure: Some(1.0),
            ..Default::default()
        };
        let flags = Options {
            log_space: Some("N-Log".into()),
            ..Default::default()
        };
        let merged = file.merged(flags);
        assert_eq!(merged.log_space.as_deref(), Some("N-Log"));
        assert_eq!(merged.depth, Some(8));
        assert_eq!(merged.exposure, Some(1.0));
    }

    #[test]
    fn test_lut_without_space_is_usage_error() {
        let options = Options {
            lut: Some("look.cube".into()),
            ..Default::default()
        };
        assert!(matches!(Settings::resolve(options, None), Err(ColorError::UsageError(_))));

        let options = Options {
            lut_space: Some("Rec.709".into()),
            ..Default::default()
        };
        assert!(matches!(Settings::resolve(options, None), Err(ColorError::UsageError(_))));
    }

    #[test]
    fn test_bad_values_are_usage_errors() {
        for options in [
            Options { depth: Some(12), ..Default::default() },
            Options { metering: Some("spot".into()), ..Default::default() },
            Options { matrix_method: Some("dcp".into()), ..Default::default() },
            Options { interpolation: Some("cubic".into()), ..Default::default() },
            Options { exposure: Some(f64::INFINITY), ..Default::default() },
            Options { format: Some("png".into()), ..Default::default() },
        ] {
            assert!(matches!(Settings::resolve(options, None), Err(ColorError::UsageError(_))));
        }
    }

    #[test]
    fn test_format_follows_output_extension() {
        let s = Settings::resolve(Options::default(), Some(Path::new("out/frame.JPG"))).unwrap();
        assert_eq!(s.format, OutputFormat::Jpeg);
        assert_eq!(s.depth, BitDepth::Eight);

        let s = Settings::resolve(Options::default(), Some(Path::new("frame.tiff"))).unwrap();
        assert_eq!(s.format, OutputFormat::Tiff);
        assert_eq!(s.depth, BitDepth::Sixteen);

        let named = Options {
            format: Some("jpeg".into()),
            ..Default::default()
        };
        assert_eq!(Settings::resolve(named, None).unwrap().format, OutputFormat::Jpeg);
    }

    #[test]
    fn test_format_conflicts_are_usage_errors() {
        let unknown_ext = Settings::resolve(Options::default(), Some(Path::new("frame.png")));
        assert!(matches!(unknown_ext, Err(ColorError::UsageError(_))));

        let mismatch = Options {
            format: Some("jpeg".into()),
            ..Default::default()
        };
        let mismatch = Settings::resolve(mismatch, Some(Path::new("frame.tif")));
        assert!(matches!(mismatch, Err(ColorError::UsageError(_))));

        let deep_jpeg = Options {
            depth: Some(16),
            ..Default::default()
        };
        let deep_jpeg = Settings::resolve(deep_jpeg, Some(Path::new("frame.jpg")));
        assert!(matches!(deep_jpeg, Err(ColorError::UsageError(_))));
    }

    #[test]
    fn test_pipeline_rejects_unknown_log_space() {
        let s = Settings::resolve(
            Options {
                log_space: Some("D-Log".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        let err = s.pipeline().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ColorError>(),
            Some(ColorError::UnsupportedLogSpace(_))
        ));
    }

    #[test]
    fn test_pipeline_missing_lut_file() {
        let s = Settings::resolve(
            Options {
                lut: Some("/nonexistent/look.cube".into()),
                lut_space: Some("Rec.709".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap();
        assert!(s.pipeline().is_err());
    }
}
