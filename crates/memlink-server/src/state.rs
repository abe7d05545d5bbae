//! Shared handler state.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use memlink_graph::MemoryGraph;

/// State injected into every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub memory: MemoryGraph,
    pub static_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(memory: MemoryGraph, static_dir: impl AsRef<Path>) -> Self {
        Self {
            memory,
            static_dir: Arc::new(static_dir.as_ref().to_path_buf()),
        }
    }
}
