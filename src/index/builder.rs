//! In-memory index builder: accumulates a `term → Entry` mapping from a
//! stream of documents and serializes it in the §4.1 envelope format.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use crate::error::Result;
use crate::index::discovery::discover_files;
use crate::index::entry::{write_entry, DocId, Entry};
use crate::index::stopwords::StopFilter;
use crate::index::tokenize::TokenStream;

#[derive(Debug, Default)]
pub struct Builder {
    terms: BTreeMap<String, Entry>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all accumulated state; the builder is reusable afterward.
    pub fn clear(&mut self) {
        self.terms.clear();
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Indexes the file at `path` under `doc_id`. A file that cannot be
    /// opened is logged as a warning and skipped — the caller is
    /// responsible for still consuming `doc_id` for the next document.
    pub fn add_file(&mut self, path: &Path, doc_id: DocId, stop_filter: Option<&StopFilter>) {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("warning: skipping unreadable file {}: {}", path.display(), e);
                return;
            }
        };
        let tokens = TokenStream::new(BufReader::new(file));
        for token in tokens {
            if token.is_empty() {
                continue;
            }
            if let Some(filter) = stop_filter {
                if filter.is_stop(&token) {
                    continue;
                }
            }
            self.terms.entry(token).or_insert_with(Entry::new).record(doc_id);
        }
    }

    /// Discovers files under `dir` and indexes each in turn, assigning
    /// consecutive DocIds starting at `id_start`. Returns the id one past
    /// the last document indexed, and the relative paths indexed in
    /// DocId order.
    pub fn add_dir(
        &mut self,
        dir: &Path,
        id_start: DocId,
        stop_filter: Option<&StopFilter>,
        extension: &str,
    ) -> (DocId, Vec<std::path::PathBuf>) {
        let files = discover_files(dir, extension);
        let mut id = id_start;
        for rel in &files {
            self.add_file(&dir.join(rel), id, stop_filter);
            id += 1;
        }
        (id, files)
    }

    /// Emits the envelope of §4.1: a known `n_entries` count followed by
    /// each entry in ascending term order (guaranteed by `BTreeMap`'s
    /// iteration order, independent of insertion order).
    pub fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        out.write_all(&(self.terms.len() as u32).to_le_bytes())?;
        for (term, entry) in &self.terms {
            write_entry(out, term, entry)?;
        }
        Ok(())
    }

    /// Writes one line per term in the form `term: freq doc doc …`, in
    /// ascending term order. A diagnostic aid, not part of the query path.
    pub fn dump<W: Write>(&self, out: &mut W) -> Result<()> {
        for (term, entry) in &self.terms {
            write!(out, "{}: {}", term, entry.freq)?;
            for doc in entry.docs() {
                write!(out, " {}", doc)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.terms.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn add_file_tracks_freq_and_docs() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.html");
        let b = dir.path().join("b.html");
        fs::write(&a, "<b>Hello</b> world hello").unwrap();
        fs::write(&b, "World of HELLO").unwrap();

        let mut builder = Builder::new();
        builder.add_file(&a, 0, None);
        builder.add_file(&b, 1, None);

        let hello = builder.terms.get("hello").unwrap();
        assert_eq!(hello.freq, 3);
        assert_eq!(hello.docs(), &[0, 1]);

        let world = builder.terms.get("world").unwrap();
        assert_eq!(world.freq, 2);
        assert_eq!(world.docs(), &[0, 1]);
    }

    #[test]
    fn add_file_skips_unreadable_file() {
        let mut builder = Builder::new();
        builder.add_file(Path::new("/does/not/exist.html"), 0, None);
        assert!(builder.is_empty());
    }

    #[test]
    fn stop_filter_excludes_from_both_freq_and_docs() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.html");
        fs::write(&a, "the quick of the fox").unwrap();
        let filter = StopFilter::new(["the".to_string(), "of".to_string()]);

        let mut builder = Builder::new();
        builder.add_file(&a, 0, Some(&filter));
        assert!(builder.entries().all(|(t, _)| t != "the" && t != "of"));
    }

    #[test]
    fn serialize_is_in_ascending_term_order() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("a.html");
        fs::write(&a, "zebra apple mango").unwrap();

        let mut builder = Builder::new();
        builder.add_file(&a, 0, None);

        let mut buf = Vec::new();
        builder.serialize(&mut buf).unwrap();

        let mut reader = crate::index::entry::EntryReader::new(std::io::Cursor::new(buf), "mem");
        let n = reader.read_header().unwrap();
        assert_eq!(n, 3);
        let mut terms = Vec::new();
        for _ in 0..n {
            let (t, _) = reader.read_entry().unwrap().unwrap();
            terms.push(t);
        }
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
    }
}
