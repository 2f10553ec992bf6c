//! Crate-wide configuration.
//!
//! Mirrors the indexed directory's on-disk layout (base folder name, the
//! three well-known file names within it) and the query engine's default
//! threshold. Named presets follow the same `Default` + `for_*()` shape the
//! rest of this codebase's ancestry uses for its own configuration structs.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hidden folder created inside the indexed directory, e.g. `.webdex`.
    pub base_dir: String,

    /// Binary index file name, relative to `base_dir`.
    pub index_file: String,

    /// File-list text file name, relative to `base_dir`.
    pub list_file: String,

    /// Stop-words snapshot file name, relative to `base_dir`.
    pub stop_words_file: String,

    /// Extension (including the leading dot) that `discover_files` matches.
    pub html_extension: String,

    /// Default query threshold when the CLI doesn't override it.
    pub default_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: ".webdex".to_string(),
            index_file: "index.dat".to_string(),
            list_file: "list.txt".to_string(),
            stop_words_file: "stop_words.txt".to_string(),
            html_extension: ".html".to_string(),
            default_threshold: 1.0,
        }
    }
}

impl Config {
    /// Shorter threshold, useful when testing the pruning heuristic without
    /// constructing large synthetic corpora.
    pub fn for_testing() -> Self {
        Self {
            base_dir: ".webdex-test".to_string(),
            ..Self::default()
        }
    }

    pub fn base_dir_in(&self, root: &std::path::Path) -> std::path::PathBuf {
        root.join(&self.base_dir)
    }

    pub fn index_file_path(&self, base_dir: &std::path::Path) -> std::path::PathBuf {
        base_dir.join(&self.index_file)
    }

    pub fn list_file_path(&self, base_dir: &std::path::Path) -> std::path::PathBuf {
        base_dir.join(&self.list_file)
    }

    pub fn stop_words_file_path(&self, base_dir: &std::path::Path) -> std::path::PathBuf {
        base_dir.join(&self.stop_words_file)
    }

    pub fn index_path(&self, root: &std::path::Path) -> std::path::PathBuf {
        self.index_file_path(&self.base_dir_in(root))
    }

    pub fn list_path(&self, root: &std::path::Path) -> std::path::PathBuf {
        self.list_file_path(&self.base_dir_in(root))
    }

    pub fn stop_words_path(&self, root: &std::path::Path) -> std::path::PathBuf {
        self.stop_words_file_path(&self.base_dir_in(root))
    }
}
