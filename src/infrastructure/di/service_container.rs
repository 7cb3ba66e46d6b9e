//! Service container for dependency injection
//!
//! Wires up sessions with their collaborators.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::TreeSession;
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::traits::{
    CommandRunner, FileSystem, GraphvizRenderer, ImageRenderer, NoopRenderer, RealCommandRunner,
    RealFileSystem,
};

/// Container holding the shared collaborators of all sessions.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Image renderer, chosen from `dump.render`
    pub renderer: Arc<dyn ImageRenderer>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    ///
    /// `cmd` only reaches the Graphviz renderer.
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let renderer: Arc<dyn ImageRenderer> = if settings.dump.render {
            Arc::new(GraphvizRenderer::new(
                cmd,
                settings.dump.dot_command.clone(),
                settings.dump.image_format.clone(),
            ))
        } else {
            debug!("image rendering disabled");
            Arc::new(NoopRenderer)
        };
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            renderer,
        }
    }

    /// Open a session over a fresh tree of `capacity` slots.
    pub fn session(&self, capacity: usize) -> ApplicationResult<TreeSession> {
        TreeSession::init(
            capacity,
            self.fs.clone(),
            self.renderer.clone(),
            &self.settings,
        )
    }
}
