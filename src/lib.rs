//! webdex: an inverted file index and search engine over a directory tree
//! of HTML documents.
//!
//! ## Pipeline
//! - indexing: `files -> TokenStream -> StopFilter -> Builder -> {serialize
//!   | partial files -> Merger} -> index file + file list + stop-words
//!   snapshot`
//! - querying: `query -> TokenStream -> StopFilter -> offset lookup ->
//!   seek + read posting lists -> threshold prune -> intersect -> paths`
//!
//! See `index::construct` for the two construction drivers and
//! `index::query` for the query engine.

pub mod config;
pub mod index;

mod error;

pub use config::Config;
pub use error::{Error, Result};
pub use index::construct::{gen_index, gen_index_large};
pub use index::{Builder, DocId, Entry, QueryEngine, SearchReport, StopFilter};
