//! Config command handler: show effective configuration.

use anyhow::Result;

use crate::app_config::{LoadedConfig, VerbositySetting};
use crate::settings::{Settings, resolve_default_log_level};

pub fn run_config_show_command(
    loaded_config: &LoadedConfig,
    verbose: u8,
    quiet: bool,
) -> Result<()> {
    let file_config = loaded_config.config.as_ref();
    let effective = Settings::resolve(file_config)?;

    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.loaded_from_file() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("posts_dir = {}", effective.posts_dir.display());
    println!("artifact_extension = {}", effective.artifact_extension);
    println!("output_file = {}", effective.output_file.display());
    let names: Vec<String> = effective.topics.iter().map(ToString::to_string).collect();
    println!("topics = {}", names.join(", "));
    println!("topics_source = {}", effective.topics_origin);
    println!("lookback_days = {}", effective.rotation.lookback_days);
    println!("per_page = {}", effective.rotation.per_page);
    println!("api_base_url = {}", effective.api_base_url);
    println!(
        "mailto = {}",
        effective.mailto.as_deref().unwrap_or("<unset>")
    );
    println!(
        "connect_timeout_secs = {}",
        effective.http.connect_timeout_secs
    );
    println!("read_timeout_secs = {}", effective.http.read_timeout_secs);
    println!(
        "verbosity = {}",
        file_config
            .and_then(|c| c.verbosity)
            .unwrap_or(VerbositySetting::Default)
            .as_str()
    );
    println!(
        "log_level = {}",
        resolve_default_log_level(verbose, quiet, file_config.and_then(|c| c.verbosity))
    );

    Ok(())
}
