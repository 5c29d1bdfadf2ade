//! TOML configuration for prefixes and fallback OIDs.
//!
//! ```toml
//! [prefixes]
//! item_group_prefix = "IG"
//! item_prefix = "IT"
//!
//! [oids]
//! study_oid = "CDISC01"
//! metadata_version_oid = "MDV.1"
//! ```
//!
//! Upper-case section and key names are accepted as well.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dsjson_convert::JsonExportOptions;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "PREFIXES")]
    pub prefixes: Prefixes,
    #[serde(alias = "OIDS")]
    pub oids: Oids,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Prefixes {
    #[serde(alias = "ITEM_GROUP_PREFIX")]
    pub item_group_prefix: String,
    #[serde(alias = "ITEM_PREFIX")]
    pub item_prefix: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        let options = JsonExportOptions::default();
        Self {
            item_group_prefix: options.item_group_prefix,
            item_prefix: options.item_prefix,
        }
    }
}

/// OIDs written by `to-json` when no Define-XML is given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Oids {
    #[serde(alias = "STUDY_OID")]
    pub study_oid: String,
    #[serde(alias = "METADATA_VERSION_OID")]
    pub metadata_version_oid: String,
}

impl Config {
    /// Load `path`, or the defaults when no path is given or the file does
    /// not exist. A file that exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match fs::read_to_string(path) {
            Ok(content) => {
                let config = Self::parse(&content)
                    .with_context(|| format!("parse config {}", path.display()))?;
                tracing::info!(path = %path.display(), "loaded config");
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e).with_context(|| format!("read config {}", path.display())),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn json_export_options(&self) -> JsonExportOptions {
        JsonExportOptions::default()
            .with_item_group_prefix(self.prefixes.item_group_prefix.as_str())
            .with_item_prefix(self.prefixes.item_prefix.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.prefixes.item_prefix, "IT");
        assert_eq!(config.prefixes.item_group_prefix, "");
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = Config::parse("[prefixes]\nitem_group_prefix = \"IG\"\n").unwrap();
        assert_eq!(config.prefixes.item_group_prefix, "IG");
        assert_eq!(config.prefixes.item_prefix, "IT");
        assert_eq!(config.oids, Oids::default());
    }

    #[test]
    fn upper_case_keys_are_accepted() {
        let config = Config::parse(
            "[prefixes]\nITEM_PREFIX = \"\"\n[oids]\nSTUDY_OID = \"S1\"\nMETADATA_VERSION_OID = \"M1\"\n",
        )
        .unwrap();
        assert_eq!(config.prefixes.item_prefix, "");
        assert_eq!(config.oids.study_oid, "S1");
        assert_eq!(config.oids.metadata_version_oid, "M1");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[prefixes\n").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }
}
