//! Streaming two-pointer merge of two sorted index files into one, without
//! loading either fully into memory.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::Result;
use crate::index::entry::{merge_entries, EntryReader, IndexWriter};

/// Reads two well-formed index files, both sorted by term, and writes
/// their deep merge to `path_out`: entries combine via `merge_entries` on
/// equal terms, and the output stays in ascending term order throughout.
/// At most one `(term, Entry)` pair per input is resident at a time.
pub fn merge_files(path_a: &Path, path_b: &Path, path_out: &Path) -> Result<()> {
    let mut a = EntryReader::new(File::open(path_a)?, path_a);
    let mut b = EntryReader::new(File::open(path_b)?, path_b);
    a.read_header()?;
    b.read_header()?;

    let out = File::create(path_out)?;
    let mut writer = IndexWriter::create(BufWriter::new(out))?;

    let mut head_a = a.read_entry()?;
    let mut head_b = b.read_entry()?;

    loop {
        match (&head_a, &head_b) {
            (None, None) => break,
            (Some(_), None) => {
                let (term, entry) = head_a.take().unwrap();
                writer.write_entry(&term, &entry)?;
                head_a = a.read_entry()?;
            }
            (None, Some(_)) => {
                let (term, entry) = head_b.take().unwrap();
                writer.write_entry(&term, &entry)?;
                head_b = b.read_entry()?;
            }
            (Some((term_a, _)), Some((term_b, _))) => {
                if term_a < term_b {
                    let (term, entry) = head_a.take().unwrap();
                    writer.write_entry(&term, &entry)?;
                    head_a = a.read_entry()?;
                } else if term_b < term_a {
                    let (term, entry) = head_b.take().unwrap();
                    writer.write_entry(&term, &entry)?;
                    head_b = b.read_entry()?;
                } else {
                    let (term, entry_a) = head_a.take().unwrap();
                    let (_, entry_b) = head_b.take().unwrap();
                    let merged = merge_entries(&entry_a, &entry_b);
                    writer.write_entry(&term, &merged)?;
                    head_a = a.read_entry()?;
                    head_b = b.read_entry()?;
                }
            }
        }
    }

    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::builder::Builder;
    use crate::index::entry::EntryReader;
    use std::fs;
    use tempfile::tempdir;

    fn build_single(dir: &Path, name: &str, text: &str, doc_id: u32) -> std::path::PathBuf {
        let html = dir.join(format!("{name}.html"));
        fs::write(&html, text).unwrap();
        let mut builder = Builder::new();
        builder.add_file(&html, doc_id, None);
        let part_path = dir.join(format!("{name}.part"));
        let mut buf = Vec::new();
        builder.serialize(&mut buf).unwrap();
        fs::write(&part_path, buf).unwrap();
        part_path
    }

    fn read_all(path: &Path) -> Vec<(String, u32, Vec<u32>)> {
        let mut reader = EntryReader::new(File::open(path).unwrap(), path);
        let n = reader.read_header().unwrap();
        let mut out = Vec::new();
        for _ in 0..n {
            let (term, entry) = reader.read_entry().unwrap().unwrap();
            out.push((term, entry.freq, entry.docs().to_vec()));
        }
        out
    }

    #[test]
    fn merges_two_partials() {
        let dir = tempdir().unwrap();
        let a = build_single(dir.path(), "a", "<b>Hello</b> world hello", 0);
        let b = build_single(dir.path(), "b", "World of HELLO", 1);
        let out = dir.path().join("merged.dat");

        merge_files(&a, &b, &out).unwrap();

        let entries = read_all(&out);
        let hello = entries.iter().find(|(t, _, _)| t == "hello").unwrap();
        assert_eq!(hello.1, 3);
        assert_eq!(hello.2, vec![0, 1]);

        let world = entries.iter().find(|(t, _, _)| t == "world").unwrap();
        assert_eq!(world.1, 2);
        assert_eq!(world.2, vec![0, 1]);

        let mut terms: Vec<_> = entries.iter().map(|(t, _, _)| t.clone()).collect();
        let mut sorted = terms.clone();
        sorted.sort();
        assert_eq!(terms, sorted);
        terms.dedup();
        assert_eq!(terms.len(), entries.len());
    }

    #[test]
    fn merge_is_commutative() {
        let dir = tempdir().unwrap();
        let a = build_single(dir.path(), "a", "alpha beta", 0);
        let b = build_single(dir.path(), "b", "beta gamma", 1);

        let out1 = dir.path().join("ab.dat");
        let out2 = dir.path().join("ba.dat");
        merge_files(&a, &b, &out1).unwrap();
        merge_files(&b, &a, &out2).unwrap();

        assert_eq!(fs::read(out1).unwrap(), fs::read(out2).unwrap());
    }
}
