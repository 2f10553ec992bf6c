//! Query engine: opens a constructed index directory, builds an in-memory
//! term→offset dictionary by a single sequential scan, and evaluates
//! multi-term queries by frequency-ascending threshold pruning followed by
//! sorted-list intersection.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::entry::{intersect, DocId, Entry, EntryReader};
use crate::index::stopwords::StopFilter;
use crate::index::tokenize::TokenStream;

/// Everything a query produced, split from the indexing-related notices
/// (stop words and threshold pruning) the original engine prints alongside
/// results — callers decide how (or whether) to render them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub notices: Vec<String>,
    pub results: Vec<PathBuf>,
}

impl SearchReport {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

pub struct QueryEngine {
    index_path: PathBuf,
    file_list: Vec<PathBuf>,
    stop_filter: Option<StopFilter>,
    dictionary: BTreeMap<String, u64>,
}

impl QueryEngine {
    /// Opens `root`'s index directory: loads the file list, loads a stop
    /// filter if a snapshot is present, then scans the index file once to
    /// build the term→offset dictionary (the entry body at each offset is
    /// read and discarded during this pass).
    pub fn open(root: &Path, config: &Config) -> Result<Self> {
        let base_dir = config.base_dir_in(root);
        let index_path = config.index_file_path(&base_dir);
        if !index_path.is_file() {
            return Err(Error::MissingIndex(root.to_path_buf()));
        }

        let file_list = read_file_list(&config.list_file_path(&base_dir))?;

        let stop_words_path = config.stop_words_file_path(&base_dir);
        let stop_filter = if stop_words_path.is_file() {
            Some(StopFilter::load(&stop_words_path)?)
        } else {
            None
        };

        let dictionary = build_dictionary(&index_path)?;

        Ok(Self {
            index_path,
            file_list,
            stop_filter,
            dictionary,
        })
    }

    /// Tokenizes and stems `query`, drops stop words (recording a notice
    /// per dropped term), looks up each remaining term's posting list,
    /// applies the frequency-ascending threshold pruning policy, and
    /// intersects what survives.
    pub fn search(&self, query: &str, threshold: f64) -> Result<SearchReport> {
        let mut notices = Vec::new();
        let mut terms = Vec::new();
        for token in TokenStream::new(std::io::Cursor::new(query.as_bytes().to_vec())) {
            if token.is_empty() {
                continue;
            }
            if let Some(filter) = &self.stop_filter {
                if filter.is_stop(&token) {
                    notices.push(format!("Stop word \"{token}\" is ignored."));
                    continue;
                }
            }
            terms.push(token);
        }

        let mut pairs: Vec<(String, Entry)> = Vec::with_capacity(terms.len());
        let mut reader = EntryReader::new(File::open(&self.index_path)?, &self.index_path);
        for term in terms {
            let entry = match self.dictionary.get(&term) {
                Some(&offset) => reader.read_entry_at(offset)?,
                None => Entry::new(),
            };
            pairs.push((term, entry));
        }

        pairs.sort_by_key(|(_, entry)| entry.freq);
        let k = (pairs.len() as f64 * threshold).floor() as usize;

        let mut result: Option<Vec<DocId>> = None;
        for (i, (term, entry)) in pairs.iter().enumerate() {
            if i > k {
                notices.push(format!("\"{term}\" is ignored due to threshold."));
                continue;
            }
            result = Some(match result {
                None => entry.docs().to_vec(),
                Some(acc) => intersect(&acc, entry.docs()),
            });
        }

        let results = match result {
            Some(docs) if !docs.is_empty() => docs
                .into_iter()
                .filter_map(|id| self.file_list.get(id as usize).cloned())
                .collect(),
            _ => Vec::new(),
        };

        Ok(SearchReport { notices, results })
    }
}

fn read_file_list(path: &Path) -> Result<Vec<PathBuf>> {
    let reader = BufReader::new(File::open(path)?);
    let mut files = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        files.push(PathBuf::from(line));
    }
    Ok(files)
}

fn build_dictionary(index_path: &Path) -> Result<BTreeMap<String, u64>> {
    let mut reader = EntryReader::new(File::open(index_path)?, index_path);
    let n = reader.read_header()?;
    let mut dictionary = BTreeMap::new();
    for _ in 0..n {
        let offset = reader.position()?;
        let (term, _entry) = reader.read_entry()?.ok_or_else(|| Error::CorruptEntry {
            path: index_path.to_path_buf(),
            reason: "fewer entries than the header declared".to_string(),
        })?;
        dictionary.insert(term, offset);
    }
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::construct::{gen_index, gen_index_large};
    use std::fs;
    use tempfile::tempdir;

    fn s1_corpus(dir: &Path) {
        fs::write(dir.join("a.html"), "<b>Hello</b> world hello").unwrap();
        fs::write(dir.join("b.html"), "World of HELLO").unwrap();
    }

    #[test]
    fn s1_conjunctive_query_over_two_files() {
        let dir = tempdir().unwrap();
        s1_corpus(dir.path());
        let config = Config::default();
        gen_index(dir.path(), &config, None).unwrap();

        let engine = QueryEngine::open(dir.path(), &config).unwrap();
        let report = engine.search("hello world", 1.0).unwrap();
        assert!(report.notices.is_empty());
        let mut results: Vec<_> = report.results.iter().map(|p| p.display().to_string()).collect();
        results.sort();
        assert_eq!(results, vec!["a.html", "b.html"]);
    }

    #[test]
    fn s2_stop_word_notice_then_no_results() {
        let dir = tempdir().unwrap();
        s1_corpus(dir.path());
        let config = Config::default();
        let filter = StopFilter::new(["of".to_string()]);
        gen_index(dir.path(), &config, Some(&filter)).unwrap();

        let engine = QueryEngine::open(dir.path(), &config).unwrap();
        let report = engine.search("of", 1.0).unwrap();
        assert_eq!(report.notices, vec!["Stop word \"of\" is ignored."]);
        assert!(report.is_empty());
    }

    #[test]
    fn s4_short_token_is_flagged_as_stop_word() {
        let dir = tempdir().unwrap();
        s1_corpus(dir.path());
        let config = Config::default();
        gen_index(dir.path(), &config, Some(&StopFilter::default())).unwrap();

        let engine = QueryEngine::open(dir.path(), &config).unwrap();
        let report = engine.search("be", 1.0).unwrap();
        assert_eq!(report.notices, vec!["Stop word \"be\" is ignored."]);
    }

    #[test]
    fn s5_threshold_pruning_keeps_three_lowest_frequency_terms() {
        let dir = tempdir().unwrap();
        // alpha: 100 occurrences across docs 0,1; beta: 2 occurrences in doc 0;
        // gamma: 50 occurrences across docs 0,1; delta: 3 occurrences in doc 0.
        let mut doc0 = String::new();
        for _ in 0..60 {
            doc0.push_str("alpha ");
        }
        for _ in 0..2 {
            doc0.push_str("beta ");
        }
        for _ in 0..30 {
            doc0.push_str("gamma ");
        }
        for _ in 0..3 {
            doc0.push_str("delta ");
        }
        let mut doc1 = String::new();
        for _ in 0..40 {
            doc1.push_str("alpha ");
        }
        for _ in 0..20 {
            doc1.push_str("gamma ");
        }
        fs::write(dir.path().join("doc0.html"), doc0).unwrap();
        fs::write(dir.path().join("doc1.html"), doc1).unwrap();

        let config = Config::default();
        gen_index(dir.path(), &config, None).unwrap();

        let engine = QueryEngine::open(dir.path(), &config).unwrap();
        let report = engine.search("alpha beta gamma delta", 0.5).unwrap();

        // Sorted ascending by freq: beta(2), delta(3), gamma(50), alpha(100).
        // k = floor(4 * 0.5) = 2, and the pruning test is `i > k`, so only
        // alpha (index 3) is pruned; gamma (index 2) still participates.
        assert_eq!(
            report.notices,
            vec!["\"alpha\" is ignored due to threshold.".to_string()]
        );
        // beta and delta both only occur in doc0, and gamma occurs in both
        // docs, so the three-way intersection is still {0}.
        assert_eq!(report.results, vec![PathBuf::from("doc0.html")]);
    }

    #[test]
    fn external_and_in_memory_construction_answer_queries_identically() {
        let dir = tempdir().unwrap();
        for i in 0..6 {
            fs::write(dir.path().join(format!("doc{i}.html")), format!("shared term{i}")).unwrap();
        }

        let small_config = Config {
            base_dir: ".small".to_string(),
            ..Config::default()
        };
        let large_config = Config {
            base_dir: ".large".to_string(),
            ..Config::default()
        };
        gen_index(dir.path(), &small_config, None).unwrap();
        gen_index_large(dir.path(), &large_config, None).unwrap();

        let small_engine = QueryEngine::open(dir.path(), &small_config).unwrap();
        let large_engine = QueryEngine::open(dir.path(), &large_config).unwrap();

        let small_report = small_engine.search("shared", 1.0).unwrap();
        let large_report = large_engine.search("shared", 1.0).unwrap();
        assert_eq!(small_report.results.len(), large_report.results.len());
        assert_eq!(small_report.results.len(), 6);
    }

    #[test]
    fn missing_index_is_an_error() {
        let dir = tempdir().unwrap();
        let config = Config::default();
        let err = QueryEngine::open(dir.path(), &config).unwrap_err();
        assert!(matches!(err, Error::MissingIndex(_)));
    }

    #[test]
    fn s6_corrupt_index_surfaces_a_format_error() {
        let dir = tempdir().unwrap();
        s1_corpus(dir.path());
        let config = Config::default();
        gen_index(dir.path(), &config, None).unwrap();

        let index_path = config.index_path(dir.path());
        let mut bytes = fs::read(&index_path).unwrap();
        bytes.truncate(bytes.len() - 2); // chop off mid-entry
        fs::write(&index_path, bytes).unwrap();

        let err = QueryEngine::open(dir.path(), &config).unwrap_err();
        assert!(matches!(err, Error::CorruptEntry { .. }));
    }
}
