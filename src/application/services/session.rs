//! Tree session: one tree plus its dump pipeline, from init to destroy.

use std::io::Write;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::dump::{DumpArtifact, DumpService};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::{BinarySearchTree, NodeId, NodeValue, Traversal};
use crate::infrastructure::traits::{FileSystem, ImageRenderer};

struct Live {
    tree: BinarySearchTree,
    dumps: DumpService,
}

/// Owns a tree and its dump pipeline.
///
/// After [`TreeSession::destroy`] every operation fails with
/// [`ApplicationError::NullTree`].
pub struct TreeSession {
    live: Option<Live>,
}

impl TreeSession {
    /// Allocate the arena, then open the dump pipeline.
    ///
    /// Capacity errors are reported before any file is touched.
    #[instrument(level = "debug", skip(fs, renderer, settings))]
    pub fn init(
        capacity: usize,
        fs: Arc<dyn FileSystem>,
        renderer: Arc<dyn ImageRenderer>,
        settings: &Settings,
    ) -> ApplicationResult<Self> {
        let tree = BinarySearchTree::with_capacity(capacity)?;
        let dumps = DumpService::open(fs, renderer, settings)?;
        Ok(Self {
            live: Some(Live { tree, dumps }),
        })
    }

    fn live(&self) -> ApplicationResult<&Live> {
        self.live.as_ref().ok_or(ApplicationError::NullTree)
    }

    fn live_mut(&mut self) -> ApplicationResult<&mut Live> {
        self.live.as_mut().ok_or(ApplicationError::NullTree)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, value: NodeValue) -> ApplicationResult<NodeId> {
        let live = self.live_mut()?;
        let id = live.tree.insert(value)?;
        debug!(
            "inserted {} at {}, {} slots left",
            value,
            id,
            live.tree.arena().remaining()
        );
        Ok(id)
    }

    /// Dump the tree, highlighting the node at `highlight` if given.
    pub fn dump(&mut self, highlight: Option<NodeId>) -> ApplicationResult<DumpArtifact> {
        let Live { tree, dumps } = self.live_mut()?;
        dumps.dump(tree, highlight)
    }

    /// Dump the tree, highlighting the topmost node holding `value`.
    pub fn dump_value(&mut self, value: NodeValue) -> ApplicationResult<DumpArtifact> {
        let Live { tree, dumps } = self.live_mut()?;
        let highlight = tree.find(value);
        dumps.dump(tree, highlight)
    }

    pub fn traversal(&self, order: Traversal) -> ApplicationResult<String> {
        Ok(self.live()?.tree.traversal(order))
    }

    /// Stream a traversal into `out`; sink failures become dump errors.
    pub fn write_traversal(&self, order: Traversal, out: &mut dyn Write) -> ApplicationResult<()> {
        self.live()?
            .tree
            .write_traversal(order, out)
            .map_err(|e| ApplicationError::dump(format!("write {order} traversal"), e))
    }

    pub fn tree(&self) -> ApplicationResult<&BinarySearchTree> {
        Ok(&self.live()?.tree)
    }

    pub fn dump_count(&self) -> ApplicationResult<usize> {
        Ok(self.live()?.dumps.dump_count())
    }

    /// Release the arena and close the visual log. Calling it again is a no-op.
    #[instrument(level = "debug", skip(self))]
    pub fn destroy(&mut self) -> ApplicationResult<()> {
        match self.live.take() {
            Some(Live { tree, dumps }) => {
                debug!("releasing {} of {} slots", tree.len(), tree.capacity());
                drop(tree);
                dumps.close()
            }
            None => Ok(()),
        }
    }
}
