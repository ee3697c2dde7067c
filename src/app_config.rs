//! Application configuration loading for CLI defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use paper_digest_core::Topic;
use paper_digest_core::topics::parse_topic_line;

/// TOML-backed file configuration for paper-digest defaults.
#[derive(Debug, Clone, Default)]
pub struct FileConfig {
    /// Directory holding published posts.
    pub posts_dir: Option<PathBuf>,
    /// Extension of post files.
    pub artifact_extension: Option<String>,
    /// Handoff file written by `pick`.
    pub output_file: Option<PathBuf>,
    /// Inline topic rotation (`name` or `name | concept-id` entries).
    pub topics: Option<Vec<Topic>>,
    /// File with one topic per line; wins over `topics`.
    pub topics_file: Option<PathBuf>,
    /// Publication-date lookback window in days.
    pub lookback_days: Option<u32>,
    /// Works fetched per topic.
    pub per_page: Option<u8>,
    /// Catalog API base URL.
    pub api_base_url: Option<String>,
    /// Contact address for the `OpenAlex` polite pool.
    pub mailto: Option<String>,
    /// Catalog client connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Catalog client request timeout in seconds.
    pub read_timeout_secs: Option<u64>,
    /// Default verbosity mode.
    pub verbosity: Option<VerbositySetting>,
}

impl FileConfig {
    /// Validates config values against runtime and CLI constraints.
    pub fn validate(&self) -> Result<()> {
        if let Some(lookback_days) = self.lookback_days
            && !(1..=3650).contains(&lookback_days)
        {
            bail!(
                "Invalid config value for `lookback_days`: {lookback_days}. Expected range: 1..=3650"
            );
        }
        if let Some(per_page) = self.per_page
            && !(1..=200).contains(&per_page)
        {
            bail!("Invalid config value for `per_page`: {per_page}. Expected range: 1..=200");
        }
        if let Some(topics) = &self.topics
            && topics.is_empty()
        {
            bail!("Invalid config value for `topics`: list must contain at least one topic");
        }
        if let Some(extension) = &self.artifact_extension
            && extension.trim_start_matches('.').is_empty()
        {
            bail!("Invalid config value for `artifact_extension`: must not be empty");
        }
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("read_timeout_secs", self.read_timeout_secs)?;
        Ok(())
    }
}

fn validate_timeout_secs(field: &str, value: Option<u64>) -> Result<()> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=3600).contains(&value) {
        bail!("Invalid config value for `{field}`: {value}. Expected range: 1..=3600");
    }
    Ok(())
}

/// Supported config verbosity labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbositySetting {
    Default,
    Verbose,
    Quiet,
    Debug,
}

impl VerbositySetting {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Verbose => "verbose",
            Self::Quiet => "quiet",
            Self::Debug => "debug",
        }
    }

    /// Log filter used when this setting applies.
    #[must_use]
    pub fn log_level(self) -> &'static str {
        match self {
            Self::Default => "info",
            Self::Verbose => "debug",
            Self::Quiet => "error",
            Self::Debug => "trace",
        }
    }
}

/// Loaded config metadata.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    /// Whether configuration was loaded from disk.
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/paper-digest/config.toml`
/// 2. `$HOME/.config/paper-digest/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("paper-digest")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("paper-digest")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from default path if present.
pub fn load_default_file_config() -> Result<LoadedConfig> {
    let path = resolve_default_config_path();
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedConfig { path, config: None });
    };

    if !path_ref.exists() {
        return Ok(LoadedConfig { path, config: None });
    }

    let config = load_file_config(path_ref)?;
    Ok(LoadedConfig {
        path,
        config: Some(config),
    })
}

fn load_file_config(path: &Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_config_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

fn parse_config_str(raw: &str) -> Result<FileConfig> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "posts_dir" => {
                cfg.posts_dir = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "artifact_extension" => {
                cfg.artifact_extension = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "output_file" => {
                cfg.output_file = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "topics" => {
                let entries = parse_string_array(value).with_context(invalid)?;
                let mut topics = Vec::with_capacity(entries.len());
                for entry in entries {
                    let Some(topic) = parse_topic_line(&entry) else {
                        bail!("Invalid topic entry '{entry}' on line {line_no}");
                    };
                    topics.push(topic);
                }
                cfg.topics = Some(topics);
            }
            "topics_file" => {
                cfg.topics_file = Some(PathBuf::from(
                    parse_string_literal(value).with_context(invalid)?,
                ));
            }
            "lookback_days" => {
                let parsed = parse_integer_u64(value).with_context(invalid)?;
                let days = u32::try_from(parsed)
                    .map_err(|_| anyhow::anyhow!("lookback_days out of range for u32"))?;
                cfg.lookback_days = Some(days);
            }
            "per_page" => {
                cfg.per_page = Some(parse_integer_u8(value).with_context(invalid)?);
            }
            "api_base_url" => {
                cfg.api_base_url = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "mailto" => {
                cfg.mailto = Some(parse_string_literal(value).with_context(invalid)?);
            }
            "connect_timeout_secs" => {
                cfg.connect_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "read_timeout_secs" => {
                cfg.read_timeout_secs = Some(parse_integer_u64(value).with_context(invalid)?);
            }
            "verbosity" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.verbosity = Some(parse_verbosity(&parsed).with_context(|| {
                    format!("Invalid `verbosity` value '{parsed}' on line {line_no}")
                })?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

/// Parses a single-line array of double-quoted strings: `["a", "b"]`.
fn parse_string_array(raw_value: &str) -> Result<Vec<String>> {
    let Some(inner) = raw_value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        bail!("Expected array of double-quoted strings");
    };

    let mut items = Vec::new();
    let mut in_string = false;
    let mut start = 0;
    for (index, ch) in inner.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            ',' if !in_string => {
                items.push(&inner[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if in_string {
        bail!("Unterminated string in array");
    }
    items.push(&inner[start..]);

    let mut parsed = Vec::new();
    for (position, item) in items.iter().enumerate() {
        let item = item.trim();
        // A trailing comma leaves one empty tail item.
        if item.is_empty() && position + 1 == items.len() {
            continue;
        }
        parsed.push(parse_string_literal(item)?);
    }
    Ok(parsed)
}

fn parse_integer_u8(raw_value: &str) -> Result<u8> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<u16>()?;
    u8::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u8"))
}

fn parse_integer_u64(raw_value: &str) -> Result<u64> {
    let token = raw_value.trim();
    if token.is_empty() {
        bail!("Expected integer value");
    }
    let value = token.parse::<i128>()?;
    if value < 0 {
        bail!("Expected non-negative integer");
    }
    u64::try_from(value).map_err(|_| anyhow::anyhow!("Integer value out of range for u64"))
}

fn parse_verbosity(value: &str) -> Result<VerbositySetting> {
    match value {
        "default" => Ok(VerbositySetting::Default),
        "verbose" => Ok(VerbositySetting::Verbose),
        "quiet" => Ok(VerbositySetting::Quiet),
        "debug" => Ok(VerbositySetting::Debug),
        _ => bail!("Expected one of: default, verbose, quiet, debug"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_partial_fields() {
        let cfg = parse_config_str(
            "posts_dir = \"../data-blog/posts\"\nper_page = 25\nverbosity = \"quiet\"\n",
        )
        .unwrap();
        assert_eq!(cfg.posts_dir, Some(PathBuf::from("../data-blog/posts")));
        assert_eq!(cfg.per_page, Some(25));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Quiet));
        assert!(cfg.lookback_days.is_none());
        assert!(cfg.topics.is_none());
    }

    #[test]
    fn test_parse_config_all_fields() {
        let cfg = parse_config_str(
            r#"
# paper-digest defaults
posts_dir = "posts"
artifact_extension = "md"
output_file = "handoff/paper.json"
topics = ["Artificial Intelligence", "NLP | C204321447"]
topics_file = "topics.txt"
lookback_days = 90
per_page = 20
api_base_url = "http://localhost:9999"
mailto = "digest@example.com"   # polite pool
connect_timeout_secs = 5
read_timeout_secs = 60
verbosity = "debug"
"#,
        )
        .unwrap();
        assert_eq!(cfg.artifact_extension.as_deref(), Some("md"));
        assert_eq!(cfg.output_file, Some(PathBuf::from("handoff/paper.json")));
        assert_eq!(
            cfg.topics,
            Some(vec![
                Topic::new("Artificial Intelligence"),
                Topic::with_id("NLP", "C204321447"),
            ])
        );
        assert_eq!(cfg.topics_file, Some(PathBuf::from("topics.txt")));
        assert_eq!(cfg.lookback_days, Some(90));
        assert_eq!(cfg.per_page, Some(20));
        assert_eq!(cfg.api_base_url.as_deref(), Some("http://localhost:9999"));
        assert_eq!(cfg.mailto.as_deref(), Some("digest@example.com"));
        assert_eq!(cfg.connect_timeout_secs, Some(5));
        assert_eq!(cfg.read_timeout_secs, Some(60));
        assert_eq!(cfg.verbosity, Some(VerbositySetting::Debug));
    }

    #[test]
    fn test_parse_config_unknown_key_errors() {
        let err = parse_config_str("concurrency = 4").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_parse_config_missing_equals_errors() {
        let err = parse_config_str("posts_dir \"posts\"").unwrap_err();
        assert!(err.to_string().contains("expected key = value"));
    }

    #[test]
    fn test_parse_config_unquoted_string_errors() {
        assert!(parse_config_str("posts_dir = posts").is_err());
    }

    #[test]
    fn test_parse_config_out_of_range_values() {
        assert!(parse_config_str("per_page = 0").is_err());
        assert!(parse_config_str("per_page = 300").is_err());
        assert!(parse_config_str("lookback_days = 0").is_err());
        assert!(parse_config_str("lookback_days = -5").is_err());
        assert!(parse_config_str("read_timeout_secs = 7200").is_err());
    }

    #[test]
    fn test_parse_config_empty_topics_rejected() {
        let err = parse_config_str("topics = []").unwrap_err();
        assert!(err.to_string().contains("at least one topic"));
    }

    #[test]
    fn test_parse_config_bad_verbosity() {
        assert!(parse_config_str("verbosity = \"loud\"").is_err());
    }

    #[test]
    fn test_strip_inline_comment_keeps_hash_in_string() {
        assert_eq!(
            strip_inline_comment("mailto = \"a#b@example.com\" # note"),
            "mailto = \"a#b@example.com\" "
        );
    }

    #[test]
    fn test_parse_string_array_variants() {
        assert_eq!(parse_string_array("[]").unwrap(), Vec::<String>::new());
        assert_eq!(
            parse_string_array("[\"a, b\", \"c\",]").unwrap(),
            vec!["a, b".to_string(), "c".to_string()]
        );
        assert!(parse_string_array("\"a\"").is_err());
        assert!(parse_string_array("[\"a]").is_err());
        assert!(parse_string_array("[a]").is_err());
    }

    #[test]
    fn test_verbosity_log_levels() {
        assert_eq!(VerbositySetting::Default.log_level(), "info");
        assert_eq!(VerbositySetting::Verbose.log_level(), "debug");
        assert_eq!(VerbositySetting::Quiet.log_level(), "error");
        assert_eq!(VerbositySetting::Debug.log_level(), "trace");
    }
}
