//! Output format selection and write-then-rename persistence.

use rawlog_core::RenderedImage;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::{IoError, IoResult, jpeg, tiff};

/// Delivery file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Deflate-compressed RGB TIFF at the image's bit depth.
    #[default]
    Tiff,
    /// Baseline JPEG, 8-bit, quality [`jpeg::QUALITY`].
    Jpeg,
}

impl OutputFormat {
    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Tiff => "tiff",
            Self::Jpeg => "jpeg",
        }
    }

    /// File extension written for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Tiff => "tif",
            Self::Jpeg => "jpg",
        }
    }

    /// Parses a format name or extension (`tif`, `tiff`, `jpg`, `jpeg`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tif" | "tiff" => Some(Self::Tiff),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Format implied by `path`'s extension.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedFormat`] for a missing or unknown extension.
    pub fn from_path(path: &Path) -> IoResult<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_name)
            .ok_or_else(|| {
                IoError::UnsupportedFormat(format!(
                    "{}: expected a .tif, .tiff, .jpg or .jpeg output",
                    path.display()
                ))
            })
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Writes `image` in the format implied by `path`'s extension.
pub fn write<P: AsRef<Path>>(path: P, image: &RenderedImage) -> IoResult<()> {
    let path = path.as_ref();
    match OutputFormat::from_path(path)? {
        OutputFormat::Tiff => tiff::write(path, image),
        OutputFormat::Jpeg => jpeg::write(path, image),
    }
}

/// Runs `encode` into a temporary file beside `path`, then renames it into
/// place. A failed encode leaves no file at `path`.
pub(crate) fn write_atomic<F>(path: &Path, encode: F) -> IoResult<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> IoResult<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut out = BufWriter::new(tmp.as_file_mut());
        encode(&mut out)?;
        out.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| IoError::Io(e.error))?;
    Ok(())
}
