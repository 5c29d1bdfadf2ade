//! Reader and writer options.

use chrono::NaiveDateTime;

use super::MissingValue;
use crate::header::{format_xpt_datetime, truncate_str};

/// Options for reading XPT files.
#[derive(Debug, Clone)]
pub struct XptReaderOptions {
    /// Trim trailing spaces from character values (default: true).
    pub trim_strings: bool,
}

impl Default for XptReaderOptions {
    fn default() -> Self {
        Self { trim_strings: true }
    }
}

impl XptReaderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep trailing spaces on character values.
    #[must_use]
    pub fn keep_padding(mut self) -> Self {
        self.trim_strings = false;
        self
    }
}

/// Options for writing XPT files.
#[derive(Debug, Clone)]
pub struct XptWriterOptions {
    /// SAS version string (max 8 chars, default: "9.4").
    pub sas_version: String,
    /// Operating system name (max 8 chars, default: "RUST").
    pub os_name: String,
    /// Created datetime (default: current time).
    pub created: Option<NaiveDateTime>,
    /// Modified datetime (default: created time).
    pub modified: Option<NaiveDateTime>,
    /// Missing code written for non-finite numbers (default: Standard ".").
    pub default_missing: MissingValue,
}

impl Default for XptWriterOptions {
    fn default() -> Self {
        Self {
            sas_version: "9.4".to_string(),
            os_name: "RUST".to_string(),
            created: None,
            modified: None,
            default_missing: MissingValue::Standard,
        }
    }
}

impl XptWriterOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sas_version(mut self, version: impl Into<String>) -> Self {
        self.sas_version = truncate_str(&version.into(), 8);
        self
    }

    #[must_use]
    pub fn with_os_name(mut self, os: impl Into<String>) -> Self {
        self.os_name = truncate_str(&os.into(), 8);
        self
    }

    #[must_use]
    pub fn with_created(mut self, datetime: NaiveDateTime) -> Self {
        self.created = Some(datetime);
        self
    }

    #[must_use]
    pub fn with_modified(mut self, datetime: NaiveDateTime) -> Self {
        self.modified = Some(datetime);
        self
    }

    /// Set both header datetimes, making the output independent of the clock.
    #[must_use]
    pub fn with_timestamp(self, datetime: NaiveDateTime) -> Self {
        self.with_created(datetime).with_modified(datetime)
    }

    #[must_use]
    pub fn with_default_missing(mut self, missing: MissingValue) -> Self {
        self.default_missing = missing;
        self
    }

    /// Created datetime (current time if not set).
    #[must_use]
    pub fn get_created(&self) -> NaiveDateTime {
        self.created
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }

    /// Modified datetime (created time if not set).
    #[must_use]
    pub fn get_modified(&self) -> NaiveDateTime {
        self.modified.unwrap_or_else(|| self.get_created())
    }

    #[must_use]
    pub fn format_created(&self) -> String {
        format_xpt_datetime(self.get_created())
    }

    #[must_use]
    pub fn format_modified(&self) -> String {
        format_xpt_datetime(self.get_modified())
    }
}
