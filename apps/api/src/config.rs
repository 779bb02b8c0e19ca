use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use crate::document::mutator::PlaceholderScope;

/// Application configuration loaded from environment variables.
/// Startup fails with a descriptive error if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub docs_api_base_url: String,
    pub docs_api_token: String,
    pub anthropic_api_key: String,
    /// CV template key → document id, parsed from `CV_TEMPLATES`
    /// (e.g. "TME=1AbC...,SDR=1DeF...").
    pub templates: HashMap<String, String>,
    /// Label substring identifying the headline heading paragraph
    /// (typically the candidate's name as it appears in the template).
    pub headline_label: String,
    /// `{id}` is substituted with the document id to build the edit link
    /// returned to the caller.
    pub doc_edit_url_template: String,
    pub placeholder_scope: PlaceholderScope,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            docs_api_base_url: require_env("DOCS_API_BASE_URL")?,
            docs_api_token: require_env("DOCS_API_TOKEN")?,
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            templates: parse_template_map(&require_env("CV_TEMPLATES")?)?,
            headline_label: require_env("CV_HEADLINE_LABEL")?,
            doc_edit_url_template: std::env::var("DOC_EDIT_URL_TEMPLATE")
                .unwrap_or_else(|_| "https://docs.google.com/document/d/{id}/edit".to_string()),
            placeholder_scope: if env_flag("PLACEHOLDER_FIRST_ONLY") {
                PlaceholderScope::FirstOccurrence
            } else {
                PlaceholderScope::AllOccurrences
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Parses "KEY=doc_id,KEY2=doc_id2" into a template map.
fn parse_template_map(raw: &str) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for pair in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, doc_id)) = pair.split_once('=') else {
            bail!("CV_TEMPLATES entry '{pair}' is not KEY=doc_id");
        };
        let (key, doc_id) = (key.trim(), doc_id.trim());
        if key.is_empty() || doc_id.is_empty() {
            bail!("CV_TEMPLATES entry '{pair}' has an empty key or doc id");
        }
        map.insert(key.to_string(), doc_id.to_string());
    }
    if map.is_empty() {
        bail!("CV_TEMPLATES must define at least one template");
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_map() {
        let map = parse_template_map("TME=doc1, SDR=doc2 ,AI/ML=doc3").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map["TME"], "doc1");
        assert_eq!(map["SDR"], "doc2");
        assert_eq!(map["AI/ML"], "doc3");
    }

    #[test]
    fn test_parse_template_map_rejects_malformed_entry() {
        assert!(parse_template_map("TME").is_err());
        assert!(parse_template_map("=doc1").is_err());
        assert!(parse_template_map("TME=").is_err());
    }

    #[test]
    fn test_parse_template_map_rejects_empty() {
        assert!(parse_template_map("").is_err());
        assert!(parse_template_map(" , ").is_err());
    }
}
