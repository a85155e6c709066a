//! `.cube` 3D LUT text files (Adobe / Resolve flavor).
//!
//! # Format
//!
//! ```text
//! # Comment
//! TITLE "LUT Name"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! 1.0 1.0 1.0
//! ```
//!
//! Data lines are in red-fastest order, which is also the in-memory order
//! of [`Lut3D`], so no reordering happens on either side. Resolve's
//! `LUT_3D_INPUT_RANGE lo hi` is accepted as a uniform domain.
//!
//! # Example
//!
//! ```rust,ignore
//! use rawlog_lut::cube;
//!
//! let lut = cube::read_3d("look.cube")?;
//! ```

use crate::{Lut3D, LutError, LutResult};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Loads a `.cube` file.
pub fn read_3d<P: AsRef<Path>>(path: P) -> LutResult<Lut3D> {
    parse_3d(BufReader::new(File::open(path)?))
}

/// Parses `.cube` text.
///
/// Errors carry the 1-based line number of the offending line. A file
/// declaring `LUT_1D_SIZE` is rejected.
pub fn parse_3d<R: BufRead>(reader: R) -> LutResult<Lut3D> {
    let mut size = None;
    let (mut domain_min, mut domain_max) = ([0.0f32; 3], [1.0f32; 3]);
    let mut data = Vec::new();
    let mut last_line = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = line?;
        let line = line.trim();

        let Some(keyword) = line.split_whitespace().next().filter(|k| !k.starts_with('#')) else {
            continue;
        };
        match keyword {
            "TITLE" => continue,
            "LUT_3D_SIZE" => {
                if size.is_some() {
                    return Err(parse_err(line_no, "duplicate LUT_3D_SIZE"));
                }
                size = Some(parse_size(line, line_no)?);
            }
            "LUT_1D_SIZE" => {
                return Err(parse_err(line_no, "expected 3D LUT, found 1D"));
            }
            "DOMAIN_MIN" => domain_min = parse_values(line, 1, line_no)?,
            "DOMAIN_MAX" => domain_max = parse_values(line, 1, line_no)?,
            "LUT_3D_INPUT_RANGE" => {
                let [lo, hi] = parse_values(line, 1, line_no)?;
                domain_min = [lo; 3];
                domain_max = [hi; 3];
            }
            _ if keyword.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                return Err(parse_err(line_no, format!("unknown keyword {keyword}")));
            }
            _ => {
                if size.is_none() {
                    return Err(parse_err(line_no, "data before LUT_3D_SIZE"));
                }
                data.push(parse_values(line, 0, line_no)?);
            }
        }
    }

    let size = size.ok_or_else(|| parse_err(last_line, "missing LUT_3D_SIZE"))?;
    let expected = size.saturating_mul(size).saturating_mul(size);
    if data.len() != expected {
        return Err(parse_err(
            last_line,
            format!("expected {expected} values, found {}", data.len()),
        ));
    }

    Lut3D::new(data, size)?.with_domain(domain_min, domain_max)
}

/// Saves `lut` as a `.cube` file.
///
/// The domain lines are emitted only when the domain differs from `[0, 1]`.
pub fn write_3d<P: AsRef<Path>>(path: P, lut: &Lut3D) -> LutResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_to(&mut writer, lut)?;
    writer.flush()?;
    Ok(())
}

fn write_to<W: Write>(writer: &mut W, lut: &Lut3D) -> LutResult<()> {
    writeln!(writer, "# Generated by rawlog-lut")?;
    writeln!(writer, "LUT_3D_SIZE {}", lut.size())?;

    let ([r0, g0, b0], [r1, g1, b1]) = (lut.domain_min(), lut.domain_max());
    if lut.domain_min() != [0.0; 3] || lut.domain_max() != [1.0; 3] {
        writeln!(writer, "DOMAIN_MIN {r0} {g0} {b0}")?;
        writeln!(writer, "DOMAIN_MAX {r1} {g1} {b1}")?;
    }
    writeln!(writer)?;

    for [r, g, b] in lut.data() {
        writeln!(writer, "{r:.6} {g:.6} {b:.6}")?;
    }
    Ok(())
}

fn parse_err(line: usize, message: impl Into<String>) -> LutError {
    LutError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_size(line: &str, line_no: usize) -> LutResult<usize> {
    let value = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| parse_err(line_no, "invalid size line"))?;
    value
        .parse()
        .map_err(|_| parse_err(line_no, format!("invalid size value {value:?}")))
}

/// Parses `N` floats after the first `skip` tokens.
fn parse_values<const N: usize>(line: &str, skip: usize, line_no: usize) -> LutResult<[f32; N]> {
    let tokens: Vec<&str> = line.split_whitespace().skip(skip).collect();
    if tokens.len() != N {
        return Err(parse_err(
            line_no,
            format!("expected {N} values, found {}: {line}", tokens.len()),
        ));
    }
    let mut out = [0.0f32; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = parse_float(token, line_no)?;
    }
    Ok(out)
}

fn parse_float(token: &str, line_no: usize) -> LutResult<f32> {
    token
        .parse()
        .map_err(|_| parse_err(line_no, format!("invalid number {token:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Cursor;

    const SMALL: &str = r#"
# Test LUT
TITLE "Test Grade"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 1.0 1.0 1.0

0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
"#;

    #[test]
    fn parse_3d_cube() {
        let lut = parse_3d(Cursor::new(SMALL)).expect("parse failed");
        assert_eq!(lut.size(), 2);
        // red-fastest: the second data line is (r=1, g=0, b=0)
        assert_eq!(lut.get(1, 0, 0), [1.0, 0.0, 0.0]);
        assert_eq!(lut.get(0, 0, 1), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn rejects_1d() {
        let err = parse_3d(Cursor::new("TITLE \"x\"\nLUT_1D_SIZE 3\n")).unwrap_err();
        assert!(matches!(err, LutError::Parse { line: 2, .. }), "{err}");
    }

    #[test]
    fn reports_bad_line() {
        let text = SMALL.replace("1.0 1.0 0.0", "1.0 oops 0.0");
        let err = parse_3d(Cursor::new(text)).unwrap_err();
        // blank first line, so "1.0 1.0 0.0" is line 11
        assert!(matches!(err, LutError::Parse { line: 11, .. }), "{err}");
    }

    #[test]
    fn rejects_short_data() {
        let text = "LUT_3D_SIZE 2\n0 0 0\n1 0 0\n";
        assert!(matches!(
            parse_3d(Cursor::new(text)),
            Err(LutError::Parse { .. })
        ));
        assert!(matches!(
            parse_3d(Cursor::new("0 0 0\n")),
            Err(LutError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn input_range_sets_domain() {
        let text = SMALL.replace("DOMAIN_MIN 0.0 0.0 0.0\nDOMAIN_MAX 1.0 1.0 1.0", "LUT_3D_INPUT_RANGE -0.25 1.25");
        let lut = parse_3d(Cursor::new(text)).expect("parse failed");
        assert_eq!(lut.domain_min(), [-0.25; 3]);
        assert_eq!(lut.domain_max(), [1.25; 3]);
    }

    #[test]
    fn roundtrip_3d() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("warm.cube");

        let lut = Lut3D::identity(4)
            .unwrap()
            .with_domain([0.0; 3], [2.0; 3])
            .unwrap();
        write_3d(&path, &lut).unwrap();
        let loaded = read_3d(&path).unwrap();

        assert_eq!(loaded.size(), 4);
        assert_eq!(loaded.domain_max(), [2.0; 3]);
        for (a, b) in lut.data().iter().zip(loaded.data()) {
            for c in 0..3 {
                assert_abs_diff_eq!(a[c], b[c], epsilon = 1e-6);
            }
        }
    }
}
