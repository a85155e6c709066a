//! Batch conversion of a directory or glob pattern.

use anyhow::{Context, Result, bail};
use rawlog_color::{CancelToken, Pipeline};
use rawlog_io::{OutputFormat, is_raw_path};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{error, info, trace, warn};

/// Whether `input` names a batch: a directory or a glob pattern.
///
/// An existing file is never a pattern, even if its name contains `[`.
pub fn is_batch(input: &Path) -> bool {
    if input.is_file() {
        return false;
    }
    input.is_dir() || input.to_string_lossy().contains(['*', '?', '['])
}

/// RAW files under a directory (not recursive) or matching a pattern,
/// sorted by path.
pub fn collect_inputs(input: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = if input.is_dir() {
        std::fs::read_dir(input)
            .with_context(|| format!("Failed to list: {}", input.display()))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file() && is_raw_path(p))
            .collect()
    } else {
        let pattern = input.to_string_lossy();
        glob::glob(&pattern)
            .with_context(|| format!("Invalid pattern: {pattern}"))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file() && is_raw_path(p))
            .collect()
    };
    files.sort();
    Ok(files)
}

/// `output_dir/<stem>.<ext>`.
pub fn output_path(output_dir: &Path, input: &Path, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", stem(input), format.extension()))
}

fn stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// Output path for each of `files`, in order.
///
/// Inputs sharing a stem (`a.dng` and `a.NEF`) keep their extension in the
/// name (`a_dng.tif`, `a_NEF.tif`). Stems compare case-insensitively.
///
/// # Errors
///
/// Fails if two inputs would still write the same file.
pub fn plan_outputs(files: &[PathBuf], output_dir: &Path, format: OutputFormat) -> Result<Vec<PathBuf>> {
    let key = |p: &Path| stem(p).to_lowercase();
    let mut stems: HashMap<String, usize> = HashMap::new();
    for file in files {
        *stems.entry(key(file)).or_default() += 1;
    }

    let outputs: Vec<PathBuf> = files
        .iter()
        .map(|file| {
            if stems[&key(file)] > 1 {
                let ext = file.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
                output_dir.join(format!("{}_{ext}.{}", stem(file), format.extension()))
            } else {
                output_path(output_dir, file, format)
            }
        })
        .collect();

    let mut seen = HashSet::new();
    for (file, output) in files.iter().zip(&outputs) {
        if !seen.insert(output.to_string_lossy().to_lowercase()) {
            bail!(
                "{} would overwrite another output: {}",
                file.display(),
                output.display()
            );
        }
    }
    Ok(outputs)
}

pub fn run(pipeline: &Pipeline, input: &Path, output_dir: &Path, format: OutputFormat) -> Result<()> {
    trace!(input = %input.display(), output = %output_dir.display(), "batch::run");

    let files = collect_inputs(input)?;
    if files.is_empty() {
        warn!(input = %input.display(), "No RAW files found");
        println!("No RAW files found in {}", input.display());
        return Ok(());
    }
    let outputs = plan_outputs(&files, output_dir, format)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create: {}", output_dir.display()))?;
    info!(files = files.len(), output = %output_dir.display(), %format, "Starting batch");

    let cancel = CancelToken::new();
    let results: Vec<Result<()>> = files
        .par_iter()
        .zip(&outputs)
        .map(|(file, output)| super::process_file(pipeline, file, output, &cancel).map(|_| ()))
        .collect();

    let mut success = 0;
    let mut failed = 0;
    for (file, r) in files.iter().zip(results) {
        match r {
            Ok(()) => success += 1,
            Err(e) => {
                failed += 1;
                error!(file = %file.display(), "{e:#}");
                eprintln!("Error: {e:#}");
            }
        }
    }

    info!(success, failed, "Batch complete");
    println!("Processed: {success} success, {failed} failed");

    if failed > 0 {
        bail!("{failed} of {} files failed", files.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_raw_extensions_only() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.NEF", "a.dng", "notes.txt", "c.raf", "preview.jpg"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("sub.dng")).unwrap();

        let files = collect_inputs(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, ["a.dng", "b.NEF", "c.raf"]);
    }

    #[test]
    fn test_glob_pattern() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["x1.arw", "x2.arw", "y.arw"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let pattern = dir.path().join("x*.arw");
        assert!(is_batch(&pattern));
        assert_eq!(collect_inputs(&pattern).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let pipeline = Pipeline::builder("F-Log2").build().unwrap();
        run(&pipeline, dir.path(), &out, OutputFormat::Tiff).unwrap();
        assert!(!out.exists());
    }

    #[test]
    fn test_failures_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.dng"), b"not a raw").unwrap();
        let out = dir.path().join("out");
        let pipeline = Pipeline::builder("F-Log2").build().unwrap();
        let err = run(&pipeline, dir.path(), &out, OutputFormat::Tiff).unwrap_err();
        assert!(err.to_string().contains("1 of 1"));
        assert!(!out.join("broken.tif").exists());
    }

    #[test]
    fn test_existing_file_with_glob_characters_is_single() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("shot[1].dng");
        fs::write(&file, b"x").unwrap();
        assert!(!is_batch(&file));

        // the same name as a pattern matches nothing
        assert!(collect_inputs(&file).unwrap().is_empty());
        assert!(is_batch(&dir.path().join("missing[1].dng")));
    }

    #[test]
    fn test_output_names() {
        assert_eq!(
            output_path(Path::new("/out"), Path::new("/in/IMG_0001.CR3"), OutputFormat::Tiff),
            PathBuf::from("/out/IMG_0001.tif")
        );
        assert_eq!(
            output_path(Path::new("/out"), Path::new("/in/IMG_0001.CR3"), OutputFormat::Jpeg),
            PathBuf::from("/out/IMG_0001.jpg")
        );
    }

    #[test]
    fn test_shared_stems_keep_their_extension() {
        let files = [
            PathBuf::from("/in/a.dng"),
            PathBuf::from("/in/a.NEF"),
            PathBuf::from("/in/b.raf"),
        ];
        let outputs = plan_outputs(&files, Path::new("/out"), OutputFormat::Tiff).unwrap();
        assert_eq!(
            outputs,
            [
                PathBuf::from("/out/a_dng.tif"),
                PathBuf::from("/out/a_NEF.tif"),
                PathBuf::from("/out/b.tif"),
            ]
        );
    }

    #[test]
    fn test_unresolvable_collision_is_an_error() {
        // a.dng and A.nef disambiguate to a_dng; a_dng.raf is already that name
        let files = [
            PathBuf::from("/in/a.dng"),
            PathBuf::from("/in/A.nef"),
            PathBuf::from("/in/a_dng.raf"),
        ];
        let err = plan_outputs(&files, Path::new("/out"), OutputFormat::Jpeg).unwrap_err();
        assert!(err.to_string().contains("a_dng.raf"), "{err}");
    }
}
