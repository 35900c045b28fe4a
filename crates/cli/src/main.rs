//! CLI tool for compiling markdown slide decks and diffing them against a cache.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use deck_core::{DiffEngine, PresentationCache, SlideDiff, SlideParser, UpdatePlan};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Compile markdown slide decks and detect what changed between versions.
#[derive(Parser, Debug)]
#[command(name = "deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the compiled presentation model as JSON
    Parse {
        /// Input markdown file
        input: PathBuf,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Leave layouts unset when a slide does not declare one
        #[arg(long)]
        no_infer_layout: bool,
    },

    /// Write a fingerprint cache for a presentation
    Cache {
        /// Input markdown file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare a presentation against a previously written cache
    Diff {
        /// Cache file written by `deck cache`
        cache: PathBuf,

        /// Input markdown file
        input: PathBuf,

        /// Print the diff as JSON instead of a summary
        #[arg(short, long)]
        json: bool,

        /// Replace the cache file with a snapshot of the new version
        #[arg(short, long)]
        update: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    match &args.command {
        Command::Parse {
            input,
            pretty,
            no_infer_layout,
        } => {
            let parser = SlideParser::new().with_layout_inference(!no_infer_layout);
            let presentation = parser.parse(&read_source(input)?);
            log::debug!("Parsed {} slides from {}", presentation.slide_count(), input.display());

            let json = if *pretty {
                serde_json::to_string_pretty(&presentation)?
            } else {
                serde_json::to_string(&presentation)?
            };
            println!("{}", json);
        }
        Command::Cache { input, output } => {
            let presentation = SlideParser::new().parse(&read_source(input)?);
            let cache = DiffEngine::new().fingerprinter().build_cache(&presentation);
            let json = cache.to_json()?;

            match output {
                Some(path) => {
                    write_output(path, &json)?;
                    log::debug!("Written to: {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Diff {
            cache,
            input,
            json,
            update,
        } => {
            let cached = read_cache(cache)?;
            let presentation = SlideParser::new().parse(&read_source(input)?);
            let engine = DiffEngine::new();
            let diff = engine.diff(&cached, &presentation);

            if *json {
                println!("{}", serde_json::to_string_pretty(&diff)?);
            } else {
                print_summary(&diff);
            }

            if *update {
                let snapshot = engine.fingerprinter().build_cache(&presentation);
                write_output(cache, &snapshot.to_json()?)?;
                log::debug!("Cache updated: {}", cache.display());
            }
        }
    }

    Ok(())
}

/// Print a human-readable description of a diff.
fn print_summary(diff: &SlideDiff) {
    println!("type: {}", diff.diff_type.as_str());
    println!("frontmatter changed: {}", diff.frontmatter_changed);
    if !diff.modified_indices.is_empty() {
        println!("modified: {:?}", diff.modified_indices);
    }
    if !diff.added_indices.is_empty() {
        println!("added: {:?}", diff.added_indices);
    }
    if !diff.removed_indices.is_empty() {
        println!("removed: {:?}", diff.removed_indices);
    }

    match diff.update_plan() {
        UpdatePlan::Unchanged => println!("plan: nothing to do"),
        UpdatePlan::Patch { render, remove } => {
            println!("plan: remove slides {:?}, re-render slides {:?}", remove, render)
        }
        UpdatePlan::FullRender => println!("plan: full re-render"),
    }
}

/// Read a markdown source file.
fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Read and decode a cache file.
fn read_cache(path: &Path) -> Result<PresentationCache> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read cache {}", path.display()))?;
    PresentationCache::from_json(&json)
        .with_context(|| format!("Failed to load cache {}", path.display()))
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
