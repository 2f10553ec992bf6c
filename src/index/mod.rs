//! Inverted file index: the entry codec, builder, merger, construction
//! drivers, and query engine described in the top-level crate docs.

pub mod builder;
pub mod construct;
pub mod discovery;
pub mod entry;
pub mod merge;
pub mod query;
pub mod stopwords;
pub mod tokenize;

pub use builder::Builder;
pub use entry::{intersect, merge_entries, DocId, Entry};
pub use query::{QueryEngine, SearchReport};
pub use stopwords::StopFilter;
