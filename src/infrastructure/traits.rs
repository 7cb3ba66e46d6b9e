//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::Output;
use std::sync::Arc;

use tracing::{debug, warn};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Write string content to file, replacing it.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create (or truncate) a file and return an unbuffered writer for it.
    ///
    /// A failed write must not leave bytes behind for a later flush.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// External command runner abstraction.
pub trait CommandRunner: Send + Sync {
    /// Run a command with arguments.
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Turns a graph description file into a raster image.
///
/// Rendering is fire-and-forget: implementations report problems through
/// logging and never fail the caller.
pub trait ImageRenderer: Send + Sync {
    fn render(&self, graph: &Path, image: &Path);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(File::create(path)?))
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Real command runner implementation.
#[derive(Debug, Default)]
pub struct RealCommandRunner;

impl CommandRunner for RealCommandRunner {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        std::process::Command::new(cmd).args(args).output()
    }
}

/// Renders graphs with the Graphviz `dot` executable.
pub struct GraphvizRenderer {
    cmd: Arc<dyn CommandRunner>,
    program: String,
    format: String,
}

impl GraphvizRenderer {
    pub fn new(
        cmd: Arc<dyn CommandRunner>,
        program: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            cmd,
            program: program.into(),
            format: format.into(),
        }
    }

    /// Arguments passed to the renderer: `<graph> -T<format> -o <image>`.
    pub fn args(&self, graph: &Path, image: &Path) -> Vec<String> {
        vec![
            graph.to_string_lossy().into_owned(),
            format!("-T{}", self.format),
            "-o".to_string(),
            image.to_string_lossy().into_owned(),
        ]
    }
}

impl ImageRenderer for GraphvizRenderer {
    fn render(&self, graph: &Path, image: &Path) {
        let args = self.args(graph, image);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        match self.cmd.run(&self.program, &args) {
            Ok(output) if output.status.success() => {
                debug!("rendered {} -> {}", graph.display(), image.display());
            }
            Ok(output) => {
                warn!(
                    "{} exited with {} for {}: {}",
                    self.program,
                    output.status,
                    graph.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            Err(e) => {
                warn!("cannot run {} for {}: {}", self.program, graph.display(), e);
            }
        }
    }
}

/// Renderer that produces nothing.
#[derive(Debug, Default)]
pub struct NoopRenderer;

impl ImageRenderer for NoopRenderer {
    fn render(&self, graph: &Path, _image: &Path) {
        debug!("rendering disabled, skipping {}", graph.display());
    }
}
