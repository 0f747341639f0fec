//! Optional lossless recompression of the written master image.
//!
//! Compression never aborts a run: every failure is a [`CrushWarning`] and the
//! uncompressed master stays valid.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

/// Why a crush pass produced no (or a questionable) result.
#[derive(Debug, Error)]
pub enum CrushWarning {
    #[error("Unknown crusher for the \"{0}\" file suffix - skipped")]
    UnsupportedFormat(String),
    #[error("Unable to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Failed(String),
}

/// Result of a successful crush pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crushed {
    pub path: PathBuf,
    /// Anything the compressor printed on stderr despite exiting cleanly.
    pub diagnostics: Option<String>,
}

/// A lossless post-processor for the master image.
pub trait Compressor {
    /// Compress `input`, writing the result next to it.
    fn run(&self, input: &Path) -> Result<Crushed, CrushWarning>;
}

/// `name.ext` -> `name.crushed.ext`. `None` when the path has no extension.
pub fn crushed_path(path: &Path) -> Option<PathBuf> {
    let stem = path.file_stem()?;
    let ext = path.extension()?;
    let mut file_name = OsString::from(stem);
    file_name.push(".crushed.");
    file_name.push(ext);
    Some(path.with_file_name(file_name))
}

/// Runs `pngcrush -q -reduce -brute -l 9 <in> <out>` on PNG masters.
#[derive(Debug, Clone)]
pub struct PngCrush {
    program: String,
}

impl Default for PngCrush {
    fn default() -> Self {
        Self {
            program: "pngcrush".into(),
        }
    }
}

impl PngCrush {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable name or path.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, input: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-q", "-reduce", "-brute", "-l", "9"])
            .arg(input)
            .arg(output);
        cmd
    }
}

impl Compressor for PngCrush {
    fn run(&self, input: &Path) -> Result<Crushed, CrushWarning> {
        let suffix = input
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !suffix.eq_ignore_ascii_case("png") {
            return Err(CrushWarning::UnsupportedFormat(suffix));
        }
        let output = crushed_path(input).ok_or_else(|| CrushWarning::UnsupportedFormat(suffix))?;

        let mut cmd = self.command(input, &output);
        tracing::info!(command = ?cmd, "crushing master");
        let out = cmd.output().map_err(|source| CrushWarning::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&out.stdout);
        if !stdout.trim().is_empty() {
            tracing::info!("{}", stdout.trim_end());
        }
        let stderr = String::from_utf8_lossy(&out.stderr).trim_end().to_string();
        if !out.status.success() {
            let msg = if stderr.is_empty() {
                format!(
                    "Unable to crush master image: {} exited with {}",
                    self.program, out.status
                )
            } else {
                stderr
            };
            return Err(CrushWarning::Failed(msg));
        }
        Ok(Crushed {
            path: output,
            diagnostics: (!stderr.is_empty()).then_some(stderr),
        })
    }
}

/// Compressor that leaves the master untouched; reports the input as output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCompressor;

impl Compressor for NoopCompressor {
    fn run(&self, input: &Path) -> Result<Crushed, CrushWarning> {
        Ok(Crushed {
            path: input.to_path_buf(),
            diagnostics: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crushed_path_inserts_before_extension() {
        assert_eq!(
            crushed_path(Path::new("out/master.png")),
            Some(PathBuf::from("out/master.crushed.png"))
        );
        assert_eq!(
            crushed_path(Path::new("a.b.png")),
            Some(PathBuf::from("a.b.crushed.png"))
        );
        assert_eq!(crushed_path(Path::new("noext")), None);
    }

    #[test]
    fn command_line_matches_pngcrush_flags() {
        let crusher = PngCrush::new();
        let cmd = crusher.command(Path::new("m.png"), Path::new("m.crushed.png"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(cmd.get_program(), "pngcrush");
        assert_eq!(
            args,
            vec!["-q", "-reduce", "-brute", "-l", "9", "m.png", "m.crushed.png"]
        );
    }
}
