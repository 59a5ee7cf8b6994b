//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files and
//! every section has defaults, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// README combiner settings.
    pub docs: DocsConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Service demo scenario.
    pub demo: DemoConfig,
}

/// README combiner configuration.
///
/// `app_dir` and `output` are resolved against `root` when relative.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DocsConfig {
    /// Project root; section headings are paths relative to it.
    pub root: PathBuf,

    /// Directory searched recursively for README files.
    pub app_dir: PathBuf,

    /// Where the combined document is written.
    pub output: PathBuf,

    /// Exact file name to collect.
    pub file_name: String,

    /// Top-level heading of the combined document.
    pub title: String,

    /// Quiet period before a watch-mode rebuild, in milliseconds.
    pub watch_debounce_ms: u64,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            app_dir: PathBuf::from("src/app"),
            output: PathBuf::from("src/app/README.md"),
            file_name: "README.md".to_string(),
            title: "Combined Documentation".to_string(),
            watch_debounce_ms: 200,
        }
    }
}

impl DocsConfig {
    /// Build a config rooted at `root` with default relative paths.
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn resolved_app_dir(&self) -> PathBuf {
        resolve(&self.root, &self.app_dir)
    }

    pub fn resolved_output(&self) -> PathBuf {
        resolve(&self.root, &self.output)
    }
}

fn resolve(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// tracing-subscriber filter directive; `RUST_LOG` takes precedence.
    pub log_filter: Option<String>,
}

/// Service demo scenario: a service starts at `initial` and a timer writes
/// each of `updates` in turn, `delay_ms` apart.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    pub initial: String,
    pub updates: Vec<String>,
    pub delay_ms: u64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            initial: "initial".to_string(),
            updates: vec!["new value".to_string()],
            delay_ms: 2000,
        }
    }
}
