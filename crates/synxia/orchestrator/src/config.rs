//! Runtime configuration for the synxia compiler.
//!
//! Configuration can be loaded from environment variables, from a JSON document, or
//! constructed programmatically. The default configuration reproduces the utility
//! grammar exactly.

use anyhow::{Context as _, Result};
use log::warn;
use serde::Deserialize;
use std::env;
use synxia_media_queries::ColorSchemeMatch;

/// Well-known id of the one style element synthesized rules are appended to.
pub const STYLE_ELEMENT_ID: &str = "synxia-style";

/// Runtime configuration for rule synthesis.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SynxiaConfig {
    /// `id` attribute given to the style element rules are appended to
    pub style_element_id: String,
    /// How `dark.` / `light.` markers are recognised inside a token
    pub color_scheme_match: ColorSchemeMatch,
    /// Whether tokens that produce no rule are reported at trace level
    pub trace_dropped_tokens: bool,
}

impl Default for SynxiaConfig {
    fn default() -> Self {
        Self {
            style_element_id: STYLE_ELEMENT_ID.to_owned(),
            color_scheme_match: ColorSchemeMatch::Substring,
            trace_dropped_tokens: true,
        }
    }
}

impl SynxiaConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables:
    /// - `SYNXIA_STYLE_ID`: id of the style element (default: `synxia-style`)
    /// - `SYNXIA_COLOR_SCHEME_MATCH`: `substring` or `prefix` (default: `substring`)
    /// - `SYNXIA_TRACE_DROPPED`: set to "0" to stop tracing dropped tokens
    ///
    /// Unset, empty or unrecognised values fall back to the defaults. Variables are
    /// read once, when this is called.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a configuration from any variable source keyed like the environment.
    #[must_use]
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let style_element_id = lookup("SYNXIA_STYLE_ID")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or(defaults.style_element_id);
        let color_scheme_match = match lookup("SYNXIA_COLOR_SCHEME_MATCH") {
            Some(name) => ColorSchemeMatch::from_name(name.trim()).unwrap_or_else(|| {
                warn!("SYNXIA_COLOR_SCHEME_MATCH={name:?} is not substring or prefix; using substring");
                defaults.color_scheme_match
            }),
            None => defaults.color_scheme_match,
        };
        let trace_dropped_tokens = lookup("SYNXIA_TRACE_DROPPED").as_deref() != Some("0");
        Self {
            style_element_id,
            color_scheme_match,
            trace_dropped_tokens,
        }
    }

    /// Parse a JSON configuration document. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if the document is not valid JSON or a field has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid synxia configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|&(key, value)| (key.to_owned(), value.to_owned()))
            .collect()
    }

    #[test]
    fn defaults_follow_the_grammar() {
        let config = SynxiaConfig::default();
        assert_eq!(config.style_element_id, "synxia-style");
        assert_eq!(config.color_scheme_match, ColorSchemeMatch::Substring);
        assert!(config.trace_dropped_tokens);
    }

    #[test]
    fn variables_override_defaults() {
        let source = vars(&[
            ("SYNXIA_STYLE_ID", "atoms"),
            ("SYNXIA_COLOR_SCHEME_MATCH", "PREFIX"),
            ("SYNXIA_TRACE_DROPPED", "0"),
        ]);
        let config = SynxiaConfig::from_vars(|key| source.get(key).cloned());
        assert_eq!(config.style_element_id, "atoms");
        assert_eq!(config.color_scheme_match, ColorSchemeMatch::Prefix);
        assert!(!config.trace_dropped_tokens);
    }

    #[test]
    fn bad_variables_fall_back() {
        let source = vars(&[
            ("SYNXIA_STYLE_ID", "  "),
            ("SYNXIA_COLOR_SCHEME_MATCH", "anchored"),
            ("SYNXIA_TRACE_DROPPED", "no"),
        ]);
        let config = SynxiaConfig::from_vars(|key| source.get(key).cloned());
        assert_eq!(config, SynxiaConfig::default());
    }

    #[test]
    fn process_environment_is_read_like_any_variable_source() {
        let from_process = SynxiaConfig::from_env();
        let snapshot: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with("SYNXIA_"))
            .collect();
        assert_eq!(
            from_process,
            SynxiaConfig::from_vars(|key| snapshot.get(key).cloned())
        );
    }

    #[test]
    fn json_fills_missing_fields() -> Result<()> {
        let config = SynxiaConfig::from_json_str(r#"{"color_scheme_match":"prefix"}"#)?;
        assert_eq!(config.color_scheme_match, ColorSchemeMatch::Prefix);
        assert_eq!(config.style_element_id, STYLE_ELEMENT_ID);
        assert!(config.trace_dropped_tokens);
        Ok(())
    }

    #[test]
    fn json_rejects_unknown_modes() -> Result<()> {
        for document in [r#"{"color_scheme_match":"exact"}"#, "not json"] {
            match SynxiaConfig::from_json_str(document) {
                Ok(config) => bail!("accepted {document:?} as {config:?}"),
                Err(err) => assert!(err.to_string().contains("invalid synxia configuration")),
            }
        }
        Ok(())
    }
}
