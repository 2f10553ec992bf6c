//! Construction drivers that turn a directory of HTML files into an index
//! directory: the simple in-memory path (`gen_index`) and the external,
//! balanced-binary-merge-tree path (`gen_index_large`) for corpora too
//! large to hold in memory at once.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::index::builder::Builder;
use crate::index::merge::merge_files;
use crate::index::stopwords::StopFilter;

fn prepare(root: &Path, config: &Config) -> Result<(Vec<PathBuf>, PathBuf)> {
    if !root.is_dir() {
        return Err(Error::MissingDirectory(root.to_path_buf()));
    }
    let base_dir = config.base_dir_in(root);
    fs::create_dir_all(&base_dir)?;
    let files = crate::index::discovery::discover_files(root, &config.html_extension);
    Ok((files, base_dir))
}

fn write_list(base_dir: &Path, config: &Config, files: &[PathBuf]) -> Result<()> {
    let mut out = fs::File::create(config.list_file_path(base_dir))?;
    for file in files {
        writeln!(out, "{}", file.display())?;
    }
    Ok(())
}

fn write_stop_words(base_dir: &Path, config: &Config, stop_filter: Option<&StopFilter>) -> Result<()> {
    if let Some(filter) = stop_filter {
        filter.snapshot(&config.stop_words_file_path(base_dir))?;
    }
    Ok(())
}

/// Simple in-memory construction: one builder, one pass over every
/// document, one `serialize` call. Suitable when the corpus fits
/// comfortably in memory.
pub fn gen_index(root: &Path, config: &Config, stop_filter: Option<&StopFilter>) -> Result<()> {
    let (files, base_dir) = prepare(root, config)?;
    write_stop_words(&base_dir, config, stop_filter)?;

    let mut builder = Builder::new();
    for (id, rel) in files.iter().enumerate() {
        builder.add_file(&root.join(rel), id as u32, stop_filter);
    }

    let mut out = fs::File::create(config.index_file_path(&base_dir))?;
    builder.serialize(&mut out)?;

    write_list(&base_dir, config, &files)
}

/// External-memory construction: one partial index per document, combined
/// through a balanced-binary merge tree so peak memory stays at one
/// single-document builder plus O(1) per active merge.
pub fn gen_index_large(root: &Path, config: &Config, stop_filter: Option<&StopFilter>) -> Result<()> {
    let (files, base_dir) = prepare(root, config)?;
    write_stop_words(&base_dir, config, stop_filter)?;

    let index_path = config.index_file_path(&base_dir);

    if files.is_empty() {
        let mut out = fs::File::create(&index_path)?;
        out.write_all(&0u32.to_le_bytes())?;
        return write_list(&base_dir, config, &files);
    }

    let mut builder = Builder::new();
    for (id, rel) in files.iter().enumerate() {
        builder.add_file(&root.join(rel), id as u32, stop_filter);
        let mut out = fs::File::create(part_path(&base_dir, id as u32, id as u32))?;
        builder.serialize(&mut out)?;
        builder.clear();
    }

    let n = files.len() as u32;
    merge_tree(&base_dir, 0, n - 1)?;

    fs::rename(part_path(&base_dir, 0, n - 1), &index_path)?;
    write_list(&base_dir, config, &files)
}

fn part_path(base_dir: &Path, l: u32, r: u32) -> PathBuf {
    base_dir.join(format!("index_part_{l}to{r}.tmp"))
}

fn merge_tree(base_dir: &Path, l: u32, r: u32) -> Result<()> {
    if l == r {
        return Ok(());
    }
    let m = (l + r) / 2;
    merge_tree(base_dir, l, m)?;
    merge_tree(base_dir, m + 1, r)?;

    let left = part_path(base_dir, l, m);
    let right = part_path(base_dir, m + 1, r);
    let out = part_path(base_dir, l, r);
    merge_files(&left, &right, &out)?;
    fs::remove_file(&left)?;
    fs::remove_file(&right)?;
    Ok(())
}
