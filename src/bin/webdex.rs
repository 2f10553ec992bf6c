//! Command-line front end over the `webdex` library: build an index over a
//! directory of HTML files, search it (one-shot or interactively), or dump
//! its contents for inspection.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use webdex::config::Config;
use webdex::index::builder::Builder;
use webdex::index::stopwords::StopFilter;
use webdex::{gen_index, gen_index_large, Error, QueryEngine, Result};

#[derive(Parser)]
#[command(name = "webdex", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an inverted index over a directory of HTML files.
    Index {
        dir: PathBuf,

        /// Use the external merge-tree construction path instead of the
        /// in-memory one.
        #[arg(short = 'l', long)]
        large: bool,

        /// Stop-word list to load for construction (snapshotted alongside
        /// the index).
        #[arg(short, long, value_name = "FILE")]
        stop: Option<PathBuf>,

        /// Suppress progress output.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Query an already-built index.
    Search {
        dir: PathBuf,

        /// Run a single query and exit; omit for interactive mode.
        #[arg(short, long)]
        query: Option<String>,

        /// Fraction of the lowest-frequency query terms to keep (1.0 keeps
        /// every term).
        #[arg(short, long)]
        threshold: Option<f64>,
    },

    /// Print every indexed term with its frequency and document list.
    Dump { dir: PathBuf },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::default();

    let result = match cli.command {
        Commands::Index {
            dir,
            large,
            stop,
            quiet,
        } => run_index(&dir, &config, large, stop.as_deref(), quiet),
        Commands::Search {
            dir,
            query,
            threshold,
        } => run_search(&dir, &config, query.as_deref(), threshold),
        Commands::Dump { dir } => run_dump(&dir, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_index(dir: &Path, config: &Config, large: bool, stop: Option<&Path>, quiet: bool) -> Result<()> {
    let index_path = config.index_path(dir);
    if index_path.is_file() && !confirm_rebuild(dir)? {
        println!("Index construction cancelled.");
        return Ok(());
    }

    let stop_filter = stop.map(StopFilter::load).transpose()?;

    if !quiet {
        println!("Indexing {}...", dir.display());
    }

    if large {
        gen_index_large(dir, config, stop_filter.as_ref())?;
    } else {
        gen_index(dir, config, stop_filter.as_ref())?;
    }

    if !quiet {
        println!("Done.");
    }
    Ok(())
}

/// Prompts `Index already exists for <dir>. Rebuild? [y/N]: ` and returns
/// whether the user confirmed — any answer other than `y`/`Y` declines
/// (§7 kind 6: construction must exit successfully without touching the
/// existing index).
fn confirm_rebuild(dir: &Path) -> Result<bool> {
    print!("Index already exists for {}. Rebuild? [y/N]: ", dir.display());
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

fn run_search(dir: &Path, config: &Config, query: Option<&str>, threshold: Option<f64>) -> Result<()> {
    let engine = QueryEngine::open(dir, config)?;
    let threshold = threshold.unwrap_or(config.default_threshold);

    match query {
        Some(q) => print_report(&engine.search(q, threshold)?),
        None => interactive_search(&engine, threshold)?,
    }
    Ok(())
}

fn interactive_search(engine: &QueryEngine, threshold: f64) -> Result<()> {
    loop {
        print!("Enter query (or '/q' to quit): ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() || line == "/q" {
            break;
        }
        print_report(&engine.search(line, threshold)?);
    }
    Ok(())
}

fn print_report(report: &webdex::SearchReport) {
    for notice in &report.notices {
        println!("{notice}");
    }
    if report.is_empty() {
        println!("No results found.");
    } else {
        for path in &report.results {
            println!("{}", path.display());
        }
    }
}

fn run_dump(dir: &Path, config: &Config) -> Result<()> {
    // Reuse the builder's dump format over a freshly rebuilt in-memory
    // index rather than requiring a prior `index` run.
    if !dir.is_dir() {
        return Err(Error::MissingDirectory(dir.to_path_buf()));
    }
    let mut builder = Builder::new();
    let files = webdex::index::discovery::discover_files(dir, &config.html_extension);
    for (id, rel) in files.iter().enumerate() {
        builder.add_file(&dir.join(rel), id as u32, None);
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    builder.dump(&mut handle)
}
