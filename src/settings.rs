//! Effective settings: file config defaults merged with CLI overrides.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use paper_digest_core::handoff::DEFAULT_HANDOFF_FILE;
use paper_digest_core::source::DEFAULT_OPENALEX_BASE_URL;
use paper_digest_core::topics::load_topics;
use paper_digest_core::{
    DEFAULT_ARTIFACT_EXTENSION, DirectoryLedger, HttpSettings, RotationSettings, Topic,
    default_topics,
};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{CorpusArgs, PickArgs, RotationArgs};

const DEFAULT_POSTS_DIR: &str = "posts";

/// Where a run's topic list came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopicsOrigin {
    /// A topics file, from the CLI or the config file.
    File(PathBuf),
    /// The inline `topics` array of the config file.
    Config,
    /// Built-in rotation.
    Builtin,
}

impl std::fmt::Display for TopicsOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Config => f.write_str("config"),
            Self::Builtin => f.write_str("builtin"),
        }
    }
}

/// Fully resolved settings for one command invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub posts_dir: PathBuf,
    pub artifact_extension: String,
    pub output_file: PathBuf,
    pub topics: Vec<Topic>,
    pub topics_origin: TopicsOrigin,
    pub rotation: RotationSettings,
    pub api_base_url: String,
    pub mailto: Option<String>,
    pub http: HttpSettings,
}

impl Settings {
    /// Resolves settings with no command-specific overrides.
    pub fn resolve(file: Option<&FileConfig>) -> Result<Self> {
        Self::resolve_with(file, &CorpusArgs::default(), &RotationArgs::default())
    }

    /// Resolves settings for `pick`, applying every override it accepts.
    pub fn for_pick(file: Option<&FileConfig>, args: &PickArgs) -> Result<Self> {
        let mut settings = Self::resolve_with(file, &args.corpus, &args.rotation)?;
        if let Some(output) = &args.output {
            settings.output_file.clone_from(output);
        }
        if let Some(lookback_days) = args.lookback_days {
            settings.rotation.lookback_days = lookback_days;
        }
        if let Some(per_page) = args.per_page {
            settings.rotation.per_page = per_page;
        }
        Ok(settings)
    }

    /// Resolves settings, letting CLI corpus and rotation flags win over
    /// the file config.
    pub fn resolve_with(
        file: Option<&FileConfig>,
        corpus: &CorpusArgs,
        rotation: &RotationArgs,
    ) -> Result<Self> {
        let empty = FileConfig::default();
        let file = file.unwrap_or(&empty);

        let (topics, topics_origin) = resolve_topics(file, rotation.topics_file.as_deref())?;
        let artifact_extension = resolve_extension(file, corpus)?;

        let mut rotation_settings = RotationSettings::default();
        if let Some(lookback_days) = file.lookback_days {
            rotation_settings.lookback_days = lookback_days;
        }
        if let Some(per_page) = file.per_page {
            rotation_settings.per_page = per_page;
        }

        let mut http = HttpSettings::default();
        if let Some(connect_timeout_secs) = file.connect_timeout_secs {
            http.connect_timeout_secs = connect_timeout_secs;
        }
        if let Some(read_timeout_secs) = file.read_timeout_secs {
            http.read_timeout_secs = read_timeout_secs;
        }

        Ok(Self {
            posts_dir: resolve_posts_dir(file, corpus),
            artifact_extension,
            output_file: file
                .output_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HANDOFF_FILE)),
            topics,
            topics_origin,
            rotation: rotation_settings,
            api_base_url: file
                .api_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENALEX_BASE_URL.to_string()),
            mailto: file.mailto.clone().filter(|m| !m.trim().is_empty()),
            http,
        })
    }

    /// Ledger over the configured posts directory.
    #[must_use]
    pub fn ledger(&self) -> DirectoryLedger {
        DirectoryLedger::new(&self.posts_dir).with_extension(&self.artifact_extension)
    }
}

/// Resolves only the posts corpus, for commands that never rotate topics.
///
/// Topic settings are not read, so a stale `topics_file` cannot fail a
/// lookup.
pub fn resolve_ledger(file: Option<&FileConfig>, corpus: &CorpusArgs) -> Result<DirectoryLedger> {
    let empty = FileConfig::default();
    let file = file.unwrap_or(&empty);
    let posts_dir = resolve_posts_dir(file, corpus);
    let extension = resolve_extension(file, corpus)?;
    Ok(DirectoryLedger::new(posts_dir).with_extension(&extension))
}

fn resolve_posts_dir(file: &FileConfig, corpus: &CorpusArgs) -> PathBuf {
    corpus
        .posts_dir
        .clone()
        .or_else(|| file.posts_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_POSTS_DIR))
}

fn resolve_extension(file: &FileConfig, corpus: &CorpusArgs) -> Result<String> {
    let extension = corpus
        .extension
        .as_deref()
        .or_else(|| file.artifact_extension.as_deref())
        .unwrap_or(DEFAULT_ARTIFACT_EXTENSION)
        .trim_start_matches('.');
    if extension.is_empty() {
        bail!("Post file extension must not be empty");
    }
    Ok(extension.to_string())
}

/// Topic precedence: CLI topics file, config topics file, inline config
/// topics, built-in rotation.
fn resolve_topics(
    file: &FileConfig,
    cli_topics_file: Option<&Path>,
) -> Result<(Vec<Topic>, TopicsOrigin)> {
    let (topics, origin) = if let Some(path) = cli_topics_file.or(file.topics_file.as_deref()) {
        (load_topics(path)?, TopicsOrigin::File(path.to_path_buf()))
    } else if let Some(topics) = &file.topics {
        (topics.clone(), TopicsOrigin::Config)
    } else {
        (default_topics(), TopicsOrigin::Builtin)
    };

    if topics.is_empty() {
        bail!(
            "No topics configured ({origin})\n  Suggestion: add at least one `name` or `name | concept-id` line"
        );
    }
    Ok((topics, origin))
}

/// Default log filter when `RUST_LOG` is unset.
///
/// CLI flags win over the config file; `--quiet` wins over `-v`.
#[must_use]
pub fn resolve_default_log_level(
    verbose: u8,
    quiet: bool,
    file_verbosity: Option<VerbositySetting>,
) -> &'static str {
    if quiet {
        return VerbositySetting::Quiet.log_level();
    }
    match verbose {
        0 => file_verbosity
            .unwrap_or(VerbositySetting::Default)
            .log_level(),
        1 => VerbositySetting::Verbose.log_level(),
        _ => VerbositySetting::Debug.log_level(),
    }
}
