//! Dump pipeline
//!
//! Writes a graph file per dump, hands it to the image renderer and links
//! the resulting image from the visual log. Artifact names carry the dump
//! sequence number as fixed-width lowercase hex so they sort in order.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::visual_log::VisualLog;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::{DumpSettings, Settings};
use crate::domain::{render_dot, BinarySearchTree, NodeId, Palette};
use crate::infrastructure::traits::{FileSystem, ImageRenderer};

/// File naming for dump artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpLayout {
    logs_dir: PathBuf,
    dot_dir: PathBuf,
    image_dir: PathBuf,
    log_file: PathBuf,
    image_format: String,
}

impl From<&DumpSettings> for DumpLayout {
    fn from(settings: &DumpSettings) -> Self {
        Self {
            logs_dir: settings.logs_dir.clone(),
            dot_dir: settings.dot_dir.clone(),
            image_dir: settings.image_dir.clone(),
            log_file: settings.log_file.clone(),
            image_format: settings.image_format.clone(),
        }
    }
}

impl DumpLayout {
    /// Shared file stem of all artifacts of dump `index`.
    pub fn stem(index: usize) -> String {
        format!("tree_dump{index:04x}")
    }

    /// Directories that must exist before the first dump.
    pub fn directories(&self) -> [PathBuf; 3] {
        [
            self.logs_dir.clone(),
            self.logs_dir.join(&self.image_dir),
            self.logs_dir.join(&self.dot_dir),
        ]
    }

    pub fn log_path(&self) -> PathBuf {
        self.logs_dir.join(&self.log_file)
    }

    pub fn dot_path(&self, index: usize) -> PathBuf {
        self.logs_dir
            .join(&self.dot_dir)
            .join(format!("{}.dot", Self::stem(index)))
    }

    /// Image location as referenced from the visual log (relative to `logs_dir`).
    pub fn image_ref(&self, index: usize) -> String {
        // the log is HTML, so always use forward slashes
        let dir = self.image_dir.to_string_lossy().replace('\\', "/");
        format!("{}/{}.{}", dir, Self::stem(index), self.image_format)
    }

    pub fn image_path(&self, index: usize) -> PathBuf {
        self.logs_dir
            .join(&self.image_dir)
            .join(format!("{}.{}", Self::stem(index), self.image_format))
    }
}

/// Files produced by one successful dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpArtifact {
    /// Sequence number of the dump
    pub index: usize,
    /// Graph description file
    pub dot_path: PathBuf,
    /// Where the renderer was asked to put the image
    pub image_path: PathBuf,
    /// Image reference written to the visual log
    pub image_ref: String,
}

/// Service producing sequential tree dumps and the visual log.
pub struct DumpService {
    fs: Arc<dyn FileSystem>,
    renderer: Arc<dyn ImageRenderer>,
    layout: DumpLayout,
    palette: Palette,
    /// One entry per successful dump, so its count is the sequence number
    log: VisualLog,
}

impl DumpService {
    /// Create the output directories and start a fresh visual log.
    #[instrument(
        level = "debug",
        skip_all,
        fields(logs_dir = %settings.dump.logs_dir.display())
    )]
    pub fn open(
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn ImageRenderer>,
        settings: &Settings,
    ) -> ApplicationResult<Self> {
        let layout = DumpLayout::from(&settings.dump);

        for dir in layout.directories() {
            fs.create_dir_all(&dir)
                .with_path_context("create directory", &dir)?;
        }

        let log_path = layout.log_path();
        let sink = fs
            .create(&log_path)
            .with_path_context("open visual log", &log_path)?;
        debug!("visual log: {}", log_path.display());

        Ok(Self {
            fs,
            renderer,
            layout,
            palette: settings.palette(),
            log: VisualLog::new(sink),
        })
    }

    /// Dump the current shape of `tree`, optionally highlighting one node.
    ///
    /// A failed dump leaves already written files in place and does not
    /// advance the sequence number.
    #[instrument(level = "debug", skip(self, tree), fields(index = self.log.entries()))]
    pub fn dump(
        &mut self,
        tree: &BinarySearchTree,
        highlight: Option<NodeId>,
    ) -> ApplicationResult<DumpArtifact> {
        let index = self.log.entries();

        let dot_path = self.layout.dot_path(index);
        let dot = render_dot(tree, highlight, &self.palette);
        self.fs
            .write(&dot_path, &dot)
            .with_path_context("write graph", &dot_path)?;

        let image_path = self.layout.image_path(index);
        self.renderer.render(&dot_path, &image_path);

        let image_ref = self.layout.image_ref(index);
        self.log
            .append(index, &image_ref)
            .with_path_context("append to visual log", &self.layout.log_path())?;

        info!("dump {} written to {}", index, dot_path.display());

        Ok(DumpArtifact {
            index,
            dot_path,
            image_path,
            image_ref,
        })
    }

    /// Number of successful dumps.
    pub fn dump_count(&self) -> usize {
        self.log.entries()
    }

    /// Flush and close the visual log.
    pub fn close(self) -> ApplicationResult<()> {
        let log_path = self.layout.log_path();
        self.log
            .close()
            .with_path_context("close visual log", &log_path)
    }
}
