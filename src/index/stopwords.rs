//! Stop-word filtering: a word is rejected if it is shorter than three
//! bytes or present in the loaded set, whichever file it's being tested
//! against (indexing or a query) the same rule applies.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopFilter {
    words: BTreeSet<String>,
}

impl StopFilter {
    pub fn new(words: impl IntoIterator<Item = String>) -> Self {
        Self {
            words: words.into_iter().collect(),
        }
    }

    /// Loads whitespace-separated words from `path` into the filter's set.
    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut words = BTreeSet::new();
        for line in reader.lines() {
            for word in line?.split_whitespace() {
                words.insert(word.to_string());
            }
        }
        Ok(Self { words })
    }

    /// True iff `word` is shorter than three bytes or a member of the set.
    pub fn is_stop(&self, word: &str) -> bool {
        word.len() < 3 || self.words.contains(word)
    }

    /// Writes the filter's words, whitespace-separated, to `path` — the
    /// snapshot taken alongside a constructed index so a later query can
    /// reload the exact filter used at index time.
    pub fn snapshot(&self, path: &Path) -> Result<()> {
        let mut out = File::create(path)?;
        let joined = self.words.iter().cloned().collect::<Vec<_>>().join(" ");
        out.write_all(joined.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn rejects_short_words_and_set_members() {
        let filter = StopFilter::new(["of".to_string(), "the".to_string()]);
        assert!(filter.is_stop("of")); // also short
        assert!(filter.is_stop("the")); // in set
        assert!(filter.is_stop("to")); // too short, not in set
        assert!(!filter.is_stop("hello"));
    }

    #[test]
    fn load_and_snapshot_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stop_words.txt");
        std::fs::write(&path, "the of and").unwrap();

        let filter = StopFilter::load(&path).unwrap();
        assert!(filter.is_stop("the"));
        assert!(filter.is_stop("of"));
        assert!(filter.is_stop("and"));
        assert!(!filter.is_stop("hello"));

        let snap_path = dir.path().join("snapshot.txt");
        filter.snapshot(&snap_path).unwrap();
        let reloaded = StopFilter::load(&snap_path).unwrap();
        assert_eq!(reloaded, filter);
    }
}
