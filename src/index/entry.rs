//! Binary codec for a single `(term, Entry)` record and the index file
//! envelope that wraps a sequence of them.
//!
//! Layout (little-endian, packed, no padding):
//!
//! ```text
//! u32 term_len
//! u8  term_bytes[term_len]
//! u32 freq
//! u32 doc_count
//! u32 docs[doc_count]
//! ```
//!
//! An index file is `u32 n_entries` followed by `n_entries` such records in
//! ascending term order. `n_entries` is a placeholder backpatched once the
//! true count is known (see `IndexWriter`); the direct serializer in
//! `builder.rs` knows its count up front and writes it directly instead.

use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crate::error::{Error, Result};

pub type DocId = u32;

/// The posting list for one term: a total occurrence count and the
/// strictly ascending, deduplicated set of documents containing the term.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub freq: u32,
    docs: Vec<DocId>,
}

impl Entry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of this entry's term in `doc_id`.
    ///
    /// `doc_id` must be greater than or equal to every previously recorded
    /// id (the builder calls this with monotonically increasing ids); the
    /// id is appended to `docs` only if it differs from the current last
    /// element, preserving per-document uniqueness, while `freq` always
    /// increments.
    pub fn record(&mut self, doc_id: DocId) {
        if self.docs.last() != Some(&doc_id) {
            self.docs.push(doc_id);
        }
        self.freq += 1;
    }

    /// Build an entry directly from a pre-sorted, deduplicated doc list and
    /// an explicit frequency, as produced by `read_entry`.
    pub fn from_parts(freq: u32, docs: Vec<DocId>) -> Self {
        Self { freq, docs }
    }

    pub fn docs(&self) -> &[DocId] {
        &self.docs
    }

    pub fn doc_count(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// `freq = a.freq + b.freq`; `docs` is the ascending set-union of the two
/// inputs, inserting a shared DocId exactly once.
pub fn merge_entries(a: &Entry, b: &Entry) -> Entry {
    let mut docs = Vec::with_capacity(a.docs.len() + b.docs.len());
    let (mut i, mut j) = (0, 0);
    while i < a.docs.len() && j < b.docs.len() {
        match a.docs[i].cmp(&b.docs[j]) {
            std::cmp::Ordering::Less => {
                docs.push(a.docs[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                docs.push(b.docs[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                docs.push(a.docs[i]);
                i += 1;
                j += 1;
            }
        }
    }
    docs.extend_from_slice(&a.docs[i..]);
    docs.extend_from_slice(&b.docs[j..]);
    Entry {
        freq: a.freq + b.freq,
        docs,
    }
}

/// Standard ascending two-pointer intersection; output is ascending with no
/// duplicates (assuming both inputs already are).
pub fn intersect(a: &[DocId], b: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

pub fn write_entry<W: Write>(out: &mut W, term: &str, entry: &Entry) -> Result<()> {
    debug_assert!(!term.is_empty(), "write_entry must not emit an empty term");
    let term_bytes = term.as_bytes();
    out.write_all(&(term_bytes.len() as u32).to_le_bytes())?;
    out.write_all(term_bytes)?;
    out.write_all(&entry.freq.to_le_bytes())?;
    out.write_all(&(entry.docs.len() as u32).to_le_bytes())?;
    for doc in &entry.docs {
        out.write_all(&doc.to_le_bytes())?;
    }
    Ok(())
}

/// Reads `u32 n_entries` at the current position.
pub fn write_header_placeholder<W: Write>(out: &mut W) -> Result<()> {
    out.write_all(&0u32.to_le_bytes())?;
    Ok(())
}

/// Wraps a reader to decode `(term, Entry)` records and, when the reader is
/// also `Seek`, to expose its byte position before each record — the
/// mechanism the query engine uses to build its term→offset dictionary
/// without reverse-engineering offsets from decoded sizes.
pub struct EntryReader<R> {
    inner: R,
    path: PathBuf,
}

impl<R: Read> EntryReader<R> {
    pub fn new(inner: R, path: impl AsRef<std::path::Path>) -> Self {
        Self {
            inner,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.inner.read_exact(&mut buf).map_err(|e| self.corrupt(e))?;
        Ok(u32::from_le_bytes(buf))
    }

    fn corrupt(&self, e: io::Error) -> Error {
        Error::CorruptEntry {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }

    /// Reads one `(term, Entry)` record. Returns `Ok(None)` on a clean EOF
    /// at the `term_len` field; any other short read is a corrupt-entry
    /// error.
    pub fn read_entry(&mut self) -> Result<Option<(String, Entry)>> {
        let mut len_buf = [0u8; 4];
        let mut filled = 0;
        while filled < 4 {
            let n = self.inner.read(&mut len_buf[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Ok(None);
                }
                return Err(self.corrupt(io::Error::from(io::ErrorKind::UnexpectedEof)));
            }
            filled += n;
        }
        let term_len = u32::from_le_bytes(len_buf) as usize;

        let mut term_bytes = vec![0u8; term_len];
        self.inner
            .read_exact(&mut term_bytes)
            .map_err(|e| self.corrupt(e))?;
        let term = String::from_utf8(term_bytes).map_err(|e| Error::CorruptEntry {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let freq = self.read_u32()?;
        let doc_count = self.read_u32()? as usize;
        let mut docs = Vec::with_capacity(doc_count);
        for _ in 0..doc_count {
            docs.push(self.read_u32()?);
        }

        Ok(Some((term, Entry::from_parts(freq, docs))))
    }

    /// Reads the `n_entries` envelope header.
    pub fn read_header(&mut self) -> Result<u32> {
        self.read_u32()
    }
}

impl<R: Read + Seek> EntryReader<R> {
    /// Byte offset of the next byte to be read — the position of an
    /// upcoming entry's `term_len` field if called right before
    /// `read_entry`.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Reads exactly one entry at `offset`, treating a clean EOF there as
    /// an offset-out-of-range error rather than "no entry" — callers only
    /// ever seek to offsets they previously recorded from this same file.
    pub fn read_entry_at(&mut self, offset: u64) -> Result<Entry> {
        self.seek_to(offset)?;
        match self.read_entry()? {
            Some((_, entry)) => Ok(entry),
            None => Err(Error::OffsetOutOfRange {
                path: self.path.clone(),
                offset,
            }),
        }
    }
}

/// Writes the envelope header speculatively, then backpatches it once the
/// payload is fully written. Requires a random-access (`Write + Seek`) sink
/// — the merger's only output path, since it doesn't know its entry count
/// up front.
pub struct IndexWriter<W> {
    inner: W,
    header_pos: u64,
    count: u32,
}

impl<W: Write + Seek> IndexWriter<W> {
    pub fn create(mut inner: W) -> Result<Self> {
        let header_pos = inner.stream_position()?;
        write_header_placeholder(&mut inner)?;
        Ok(Self {
            inner,
            header_pos,
            count: 0,
        })
    }

    pub fn write_entry(&mut self, term: &str, entry: &Entry) -> Result<()> {
        write_entry(&mut self.inner, term, entry)?;
        self.count += 1;
        Ok(())
    }

    /// Backpatches `n_entries` and flushes. Consumes the writer so the
    /// header is always written exactly once.
    pub fn finish(mut self) -> Result<()> {
        let end = self.inner.stream_position()?;
        self.inner.seek(SeekFrom::Start(self.header_pos))?;
        self.inner.write_all(&self.count.to_le_bytes())?;
        self.inner.seek(SeekFrom::Start(end))?;
        self.inner.flush()?;
        Ok(())
    }
}
