//! Shared User-Agent string for catalog HTTP clients.
//!
//! `OpenAlex` asks clients to identify themselves; the project URL gives the
//! operator of the API a way to reach us.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/paper-digest";

/// Default User-Agent for catalog requests.
#[must_use]
pub(crate) fn default_source_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("paper-digest/{version} (research-digest; +{PROJECT_UA_URL})")
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_contains_version_and_project_url() {
        let ua = default_source_user_agent();
        assert!(
            ua.contains(PROJECT_UA_URL),
            "UA must contain project URL: {ua}"
        );
        assert_eq!(
            env!("CARGO_PKG_VERSION"),
            ua.strip_prefix("paper-digest/")
                .and_then(|s| s.split(' ').next())
                .expect("UA has version"),
            "UA must contain crate version"
        );
    }
}
