//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Pick a not-yet-published open-access paper for the weekly digest.
///
/// Paper Digest rotates through a list of topics by ISO week, searches
/// OpenAlex for recent open-access papers, skips papers already mentioned in
/// published posts and hands one of the rest to the summarizer.
#[derive(Parser, Debug)]
#[command(name = "paper-digest")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch candidates for this week's topic and write the handoff file
    Pick(PickArgs),
    /// Show the topic of the week and the fallback order
    Topic(TopicArgs),
    /// Check whether a paper was already published
    Check(CheckArgs),
    /// Show the effective configuration
    Config,
}

/// Where published posts live.
#[derive(Args, Debug, Clone, Default)]
pub struct CorpusArgs {
    /// Directory holding published posts
    #[arg(long, value_name = "DIR")]
    pub posts_dir: Option<PathBuf>,

    /// Extension of post files (default: qmd)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,
}

/// Which topics rotate and which day the run is for.
#[derive(Args, Debug, Clone, Default)]
pub struct RotationArgs {
    /// File with one topic per line (`name` or `name | concept-id`)
    #[arg(long, value_name = "FILE")]
    pub topics_file: Option<PathBuf>,

    /// Run as if today were this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub date: Option<NaiveDate>,
}

/// Arguments for `pick`.
#[derive(Args, Debug, Clone, Default)]
pub struct PickArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    #[command(flatten)]
    pub rotation: RotationArgs,

    /// Handoff file for the summarizer
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Only consider papers published within this many days (1-3650)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=3650))]
    pub lookback_days: Option<u32>,

    /// Papers fetched per topic (1-200)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=200))]
    pub per_page: Option<u8>,

    /// Seed for the random choice among eligible papers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report the selection without writing the handoff file
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for `topic`.
#[derive(Args, Debug, Clone, Default)]
pub struct TopicArgs {
    #[command(flatten)]
    pub rotation: RotationArgs,
}

/// Arguments for `check`.
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// DOI or source URI to look for
    pub identifier: String,

    /// Also match on this title
    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub corpus: CorpusArgs,
}
