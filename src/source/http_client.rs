//! HTTP client construction for catalog sources.
//!
//! Timeouts are passed in explicitly through [`HttpSettings`] so callers
//! decide them at start-up.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use reqwest::{Client, ClientBuilder, Proxy};
use tracing::warn;

use crate::user_agent;

use super::SourceError;

/// Default connect timeout for catalog requests.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default overall request timeout for catalog requests.
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 30;

/// Network settings for catalog clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds.
    pub read_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
        }
    }
}

/// Builds the HTTP client used by a catalog source.
///
/// `source_name` only appears in logs and errors.
///
/// # Errors
///
/// Returns [`SourceError::ClientBuild`] when client construction fails.
pub fn build_source_http_client(
    source_name: &str,
    settings: HttpSettings,
) -> Result<Client, SourceError> {
    let user_agent = user_agent::default_source_user_agent();

    match try_build_client(&user_agent, settings, false) {
        Ok(client) => Ok(client),
        Err(BuildClientFailure::Panic) => {
            // Some sandboxed macOS environments panic while reading system
            // proxy settings; retry with env proxies only.
            warn!(
                source = source_name,
                "HTTP client hit system proxy panic; using env-proxy fallback builder"
            );
            try_build_client(&user_agent, settings, true)
                .map_err(|failure| client_build_error(source_name, failure))
        }
        Err(failure) => Err(client_build_error(source_name, failure)),
    }
}

enum BuildClientFailure {
    Panic,
    Build(reqwest::Error),
}

fn client_build_error(source_name: &str, failure: BuildClientFailure) -> SourceError {
    let reason = match failure {
        BuildClientFailure::Panic => "client construction panicked".to_string(),
        BuildClientFailure::Build(error) => error.to_string(),
    };
    SourceError::ClientBuild {
        source_name: source_name.to_string(),
        reason,
    }
}

fn try_build_client(
    user_agent: &str,
    settings: HttpSettings,
    disable_system_proxy_lookup: bool,
) -> Result<Client, BuildClientFailure> {
    let user_agent = user_agent.to_string();
    catch_unwind(AssertUnwindSafe(move || {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .timeout(Duration::from_secs(settings.read_timeout_secs))
            .user_agent(user_agent)
            .gzip(true);
        if disable_system_proxy_lookup {
            builder = apply_env_proxy_fallback(builder.no_proxy());
        }
        builder.build().map_err(BuildClientFailure::Build)
    }))
    .map_err(|_| BuildClientFailure::Panic)?
}

fn apply_env_proxy_fallback(mut builder: ClientBuilder) -> ClientBuilder {
    let https = first_env(&["HTTPS_PROXY", "https_proxy", "ALL_PROXY", "all_proxy"]);
    if let Some(proxy) = https
        && let Ok(resolved) = Proxy::https(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    let http = first_env(&["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"]);
    if let Some(proxy) = http
        && let Ok(resolved) = Proxy::http(&proxy)
    {
        builder = builder.proxy(resolved);
    }
    builder
}

fn first_env(names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    })
}
