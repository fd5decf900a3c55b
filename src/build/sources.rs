use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Every file below `root` whose name ends with `suffix`, in traversal order.
/// Siblings are visited by name so the compiler command line is reproducible.
///
/// Never fails: a missing root or unreadable entries simply contribute nothing.
pub fn collect_sources(root: &Path, suffix: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.file_name().to_string_lossy().ends_with(suffix))
        .map(|e| e.into_path())
        .collect()
}
