//! Rendering DOT descriptions into images.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use strum_macros::{Display, EnumString, IntoStaticStr};
use tempfile::TempPath;
use tracing::{debug, info};

use pkgdep_error::{Error, Result};

/// Image formats the renderer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Svg,
    Png,
    #[strum(to_string = "jpg", serialize = "jpeg")]
    Jpg,
    Pdf,
}

impl OutputFormat {
    /// File extension, also the Graphviz `-T` argument.
    pub fn extension(&self) -> &'static str {
        (*self).into()
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Svg => "image/svg+xml",
            OutputFormat::Png => "image/png",
            OutputFormat::Jpg => "image/jpeg",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

/// A rendered image on disk. The file is removed when the artifact is dropped.
#[derive(Debug)]
pub struct Artifact {
    path: TempPath,
    format: OutputFormat,
}

impl Artifact {
    pub fn new(path: TempPath, format: OutputFormat) -> Self {
        Self { path, format }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Read the whole image.
    pub fn read(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(|e| {
            Error::from(e)
                .with_operation("render::read_artifact")
                .with_context("path", self.path.display().to_string())
        })
    }
}

/// Create an empty temporary file to render into.
pub fn artifact_file(format: OutputFormat) -> Result<TempPath> {
    let file = tempfile::Builder::new()
        .prefix("pkgdep-")
        .suffix(&format!(".{}", format.extension()))
        .tempfile()
        .map_err(|e| Error::from(e).with_operation("render::artifact_file"))?;
    Ok(file.into_temp_path())
}

/// Turns a graph description into an image.
pub trait Renderer: Send + Sync {
    fn render(&self, description: &[u8], format: OutputFormat) -> Result<Artifact>;
}

/// Renders with the Graphviz `dot` binary. One attempt per call.
#[derive(Debug, Clone)]
pub struct GraphvizRenderer {
    binary: PathBuf,
}

impl Default for GraphvizRenderer {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("dot"),
        }
    }
}

impl GraphvizRenderer {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn failed(&self, message: impl Into<String>) -> Error {
        Error::render_failed(message)
            .with_operation("render::graphviz")
            .with_context("binary", self.binary.display().to_string())
    }
}

impl Renderer for GraphvizRenderer {
    fn render(&self, description: &[u8], format: OutputFormat) -> Result<Artifact> {
        let start = Instant::now();
        let path = artifact_file(format)?;
        debug!(binary = %self.binary.display(), %format, path = %path.display(), "rendering");

        let mut child = Command::new(&self.binary)
            .arg(format!("-T{}", format.extension()))
            .arg("-o")
            .arg(&*path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.failed("failed to start renderer").set_source(e))?;

        // Feed stdin on its own thread so a renderer that stops reading early
        // is still waited on and its stderr reported.
        let stdin = child.stdin.take();
        let (written, output) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(description),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(std::io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output =
            output.map_err(|e| self.failed("failed to wait for renderer").set_source(e))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let err = self
                .failed(stderr.trim().to_string())
                .with_context("status", output.status.to_string());
            return Err(match written {
                Err(e) => err.set_source(e),
                Ok(()) => err,
            });
        }
        written.map_err(|e| self.failed("failed to write description").set_source(e))?;

        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(self.failed("renderer produced no artifact"));
        }

        info!(
            "Rendering {}: {:.2}s ({} bytes)",
            format,
            start.elapsed().as_secs_f64(),
            size
        );
        Ok(Artifact::new(path, format))
    }
}
