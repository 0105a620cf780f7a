//! Service context bundling the port trait objects.

use std::sync::Arc;

use crate::adapters::live::LiveFileSystem;
use crate::ports::filesystem::FileSystem;

/// Bundles the external boundaries a run talks to.
///
/// Ports are shared with loader tasks, so they are held behind `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    /// Filesystem for manifest I/O.
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContext {
    /// Creates a context backed by the real filesystem.
    #[must_use]
    pub fn live() -> Self {
        Self { fs: Arc::new(LiveFileSystem) }
    }

    /// Creates a context around the given filesystem.
    #[must_use]
    pub fn with_fs(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}
