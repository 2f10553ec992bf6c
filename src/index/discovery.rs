//! Recursive discovery of indexable files under a root directory.
//!
//! Returns paths relative to `root`, in `walkdir`'s own traversal order —
//! deterministic per filesystem but unspecified globally. The builder
//! treats this order as authoritative for DocId assignment; it does not
//! re-sort.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

pub fn discover_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .to_string_lossy()
                .ends_with(extension)
        })
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}
