//! Documentation tooling: combine per-directory README files into one.
//!
//! # Data Flow
//! ```text
//! app_dir (recursive walk, sorted)
//!     → combine.rs collect_readmes (files named `file_name`, minus output)
//!     → combine.rs combine (title + "## relative/path" sections)
//!     → output file
//!
//! Watch mode:
//!     watcher.rs detects README change
//!     → debounce
//!     → combine again
//! ```

pub mod combine;
pub mod watcher;

use std::path::PathBuf;

pub use combine::{collect_readmes, combine, combine_readmes, CombineReport};
pub use watcher::DocsWatcher;

/// Errors from the documentation tooling.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}

impl DocsError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| DocsError::Io { action, path, source }
    }
}
