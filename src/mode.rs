//! Source modes and the keys that identify an image within a mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two image sources is active for a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// A file uploaded to the editor's input directory
    #[default]
    File,
    /// A remote http(s) location
    Url,
}

impl SourceMode {
    /// The selector value for this mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::File => "file",
            SourceMode::Url => "url",
        }
    }

    /// Both modes in selector order.
    pub fn all() -> &'static [SourceMode] {
        &[SourceMode::File, SourceMode::Url]
    }

    /// Interpret a source selector value. Absent or unknown values mean `File`.
    pub fn from_selector(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("url") => SourceMode::Url,
            _ => SourceMode::File,
        }
    }

    /// The selector's option list.
    pub fn selector_options() -> Vec<String> {
        Self::all().iter().map(|m| m.as_str().to_string()).collect()
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The identifying value of an image within a mode: a filename or a URL.
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey(String);

impl SourceKey {
    /// Normalize a raw widget value. Absent or blank values have no key.
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        let trimmed = raw?.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the key is usable in URL mode.
    pub fn is_http_url(&self) -> bool {
        is_http_url(&self.0)
    }
}

impl fmt::Display for SourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check for an `http://` or `https://` prefix, ignoring scheme case.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    ["http://", "https://"].iter().any(|scheme| {
        value.len() > scheme.len()
            && value
                .get(..scheme.len())
                .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
