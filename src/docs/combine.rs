//! README collection and concatenation.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::config::DocsConfig;
use crate::docs::DocsError;
use crate::observability::metrics;

/// Outcome of a combine run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineReport {
    /// Combined files, relative to the project root.
    pub files: Vec<String>,
    pub output: PathBuf,
    pub bytes_written: usize,
}

/// Recursively find files named `file_name` under `dir`.
///
/// Directory entries are visited in lexicographic order, so the result is
/// stable across platforms.
pub fn collect_readmes(dir: &Path, file_name: &str) -> Result<Vec<PathBuf>, DocsError> {
    let mut found = Vec::new();
    walk(dir, file_name, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) -> Result<(), DocsError> {
    let mut entries = fs::read_dir(dir)
        .map_err(DocsError::io("read directory", dir))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(DocsError::io("read directory", dir))?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let file_type = entry.file_type().map_err(DocsError::io("stat", &path))?;
        if file_type.is_dir() {
            walk(&path, file_name, found)?;
        } else if entry.file_name() == file_name {
            found.push(path);
        }
    }
    Ok(())
}

/// Path of `path` relative to `root`, `/`-separated.
///
/// Files outside `root` get a `..`-prefixed path, computed on the absolute
/// forms of both paths.
pub fn relative_heading(root: &Path, path: &Path) -> String {
    if let Ok(relative) = path.strip_prefix(root) {
        return join_normal(relative.components());
    }

    let root = absolute(root);
    let path = absolute(path);
    let root_parts: Vec<Component<'_>> = root.components().collect();
    let path_parts: Vec<Component<'_>> = path.components().collect();
    let common = root_parts
        .iter()
        .zip(&path_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = root_parts[common..]
        .iter()
        .filter(|c| matches!(c, Component::Normal(_)))
        .map(|_| "..".to_string());
    let rest = join_normal(path_parts[common..].iter().copied());
    ups.chain((!rest.is_empty()).then_some(rest)).collect::<Vec<_>>().join("/")
}

fn join_normal<'a>(components: impl Iterator<Item = Component<'a>>) -> String {
    components
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Concatenate `files` under a `# {title}` heading, one `## {relative path}`
/// section per file.
pub fn combine(root: &Path, files: &[PathBuf], title: &str) -> Result<String, DocsError> {
    let mut combined = format!("# {}\n\n", title);
    for path in files {
        let heading = relative_heading(root, path);
        let content = fs::read_to_string(path).map_err(DocsError::io("read", path))?;
        combined.push_str(&format!("## {}\n\n", heading));
        combined.push_str(&content);
        combined.push_str("\n\n");
    }
    Ok(combined)
}

/// Collect, combine and write according to `config`.
///
/// The output file is never one of its own inputs, even when it lives inside
/// `app_dir` and matches `file_name`.
pub fn combine_readmes(config: &DocsConfig) -> Result<CombineReport, DocsError> {
    let app_dir = config.resolved_app_dir();
    let output = config.resolved_output();

    let result = write_combined(config, &app_dir, &output);

    match &result {
        Ok(report) => {
            metrics::record_readmes_combined(report.files.len());
            metrics::record_combine_run("ok");
            tracing::info!(
                files = report.files.len(),
                bytes = report.bytes_written,
                output = %report.output.display(),
                "README files combined"
            );
        }
        Err(e) => {
            metrics::record_combine_run("error");
            tracing::error!(error = %e, "Combining README files failed");
        }
    }
    result
}

fn write_combined(config: &DocsConfig, app_dir: &Path, output: &Path) -> Result<CombineReport, DocsError> {
    let files: Vec<PathBuf> = collect_readmes(app_dir, &config.file_name)?
        .into_iter()
        .filter(|path| !same_file(path, output))
        .collect();

    let combined = combine(&config.root, &files, &config.title)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(DocsError::io("create directory", parent))?;
    }
    fs::write(output, &combined).map_err(DocsError::io("write", output))?;

    let headings = files
        .iter()
        .map(|path| relative_heading(&config.root, path))
        .collect();
    Ok(CombineReport {
        files: headings,
        output: output.to_path_buf(),
        bytes_written: combined.len(),
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
