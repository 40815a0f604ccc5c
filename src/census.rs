use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CensusError;

pub const DEFAULT_EXTENSIONS: [&str; 4] = [".txt", ".py", ".pdf", ".jpg"];

/// Lowercase with a leading dot, `None` for blank input.
pub fn normalize_extension(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    Some(format!(".{}", trimmed.to_lowercase()))
}

/// Extension of `file_name` in the same normalized form, `None` for
/// dotfiles and names without an extension.
pub fn extension_of(file_name: &Path) -> Option<String> {
    let ext = file_name.extension()?.to_string_lossy();
    Some(format!(".{}", ext.to_lowercase()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionCensus {
    pub root: PathBuf,
    pub tracked: Vec<ExtensionCount>,
    pub total: u64,
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

impl ExtensionCensus {
    pub fn tracked_sum(&self) -> u64 {
        self.tracked.iter().map(|t| t.count).sum()
    }

    pub fn other(&self) -> u64 {
        self.total.saturating_sub(self.tracked_sum())
    }

    pub fn count(&self, extension: &str) -> Option<u64> {
        let wanted = normalize_extension(extension)?;
        self.tracked
            .iter()
            .find(|t| t.extension == wanted)
            .map(|t| t.count)
    }

    pub fn percentage_of(&self, count: u64) -> f64 {
        percentage(count, self.total)
    }

    /// Text used for the `file_census` snapshot value.
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Total: {} files", self.total)];
        for tracked in self.tracked.iter().filter(|t| t.count > 0) {
            lines.push(format!(
                "{}: {} ({:.1}%)",
                tracked.extension,
                tracked.count,
                self.percentage_of(tracked.count)
            ));
        }
        let other = self.other();
        if other > 0 {
            lines.push(format!("Other: {} ({:.1}%)", other, self.percentage_of(other)));
        }
        lines.join("\n")
    }
}

pub fn summary_or_error(result: &Result<ExtensionCensus, CensusError>) -> String {
    match result {
        Ok(census) => census.summary(),
        Err(err) => err.to_string(),
    }
}

/// Walks every file under `root`, counting files per tracked extension.
/// Symlinks are never followed. Unreadable directories below the root are
/// skipped.
pub fn run_census(root: &Path, extensions: &[String]) -> Result<ExtensionCensus, CensusError> {
    let _span = tracing::debug_span!("collector.census", root = %root.display()).entered();

    let metadata =
        fs::metadata(root).map_err(|e| CensusError::from_io(root.to_path_buf(), e))?;
    if !metadata.is_dir() {
        return Err(CensusError::NotADirectory(root.to_path_buf()));
    }

    let mut tracked: Vec<ExtensionCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for ext in extensions.iter().filter_map(|e| normalize_extension(e)) {
        if !index.contains_key(&ext) {
            index.insert(ext.clone(), tracked.len());
            tracked.push(ExtensionCount {
                extension: ext,
                count: 0,
            });
        }
    }

    let mut total = 0u64;
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(CensusError::from_io(dir, e)),
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };
        for entry in entries.flatten() {
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                stack.push(path);
                continue;
            }
            // A link to a directory is neither walked nor counted.
            if file_type.is_symlink() && path.is_dir() {
                continue;
            }

            total += 1;
            if let Some(ext) = extension_of(Path::new(&entry.file_name()))
                && let Some(&slot) = index.get(&ext)
            {
                tracked[slot].count += 1;
            }
        }
    }

    if total == 0 {
        return Err(CensusError::NoFiles(root.to_path_buf()));
    }

    Ok(ExtensionCensus {
        root: root.to_path_buf(),
        tracked,
        total,
    })
}
