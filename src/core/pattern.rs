//! Key pattern normalization and stateless match iteration.

use std::ops::Range;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Matches `gettext("key")` / `gettext('key')`, key in group 1.
pub const DEFAULT_FUNCTION_PATTERN: &str = r#"gettext\(\s*["']([^"']+)["']\s*\)"#;

/// A key pattern as supplied by the user.
///
/// In configuration files a plain string is literal text, while an object
/// carries a regular expression and optional flags:
///
/// ```json
/// { "functionPattern": { "regex": "t\\(\"([^\"]+)\"\\)", "flags": "i" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PatternSource {
    /// Text matched verbatim.
    Literal(String),
    /// Regular expression source with JavaScript-style flags.
    Regex {
        regex: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        flags: String,
    },
}

impl PatternSource {
    pub fn regex(source: impl Into<String>) -> Self {
        Self::Regex {
            regex: source.into(),
            flags: String::new(),
        }
    }
}

impl Default for PatternSource {
    fn default() -> Self {
        Self::regex(DEFAULT_FUNCTION_PATTERN)
    }
}

/// One match of a [`NormalizedPattern`] within a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Byte range of the whole match.
    pub range: Range<usize>,
    /// Captured groups; index 0 is the whole match. `None` for groups that
    /// did not participate.
    pub groups: Vec<Option<String>>,
}

impl MatchRecord {
    /// The whole matched text.
    pub fn text(&self) -> &str {
        self.group(0).unwrap_or_default()
    }

    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|g| g.as_deref())
    }
}

/// A compiled key pattern that always scans the whole text with `^`/`$`
/// anchoring at line boundaries.
///
/// Matching keeps no position between calls: every [`find_all`] starts
/// from the beginning of its input.
///
/// [`find_all`]: NormalizedPattern::find_all
#[derive(Debug, Clone)]
pub struct NormalizedPattern {
    regex: Regex,
}

impl NormalizedPattern {
    pub fn new(source: &PatternSource) -> Result<Self, ConfigError> {
        let (pattern, case_insensitive, dot_all) = match source {
            PatternSource::Literal(text) => (regex::escape(text), false, false),
            PatternSource::Regex { regex, flags } => {
                let mut case_insensitive = false;
                let mut dot_all = false;
                for flag in flags.chars() {
                    match flag {
                        'i' => case_insensitive = true,
                        's' => dot_all = true,
                        // Global and multi-line are always on; sticky and
                        // unicode have no effect on this engine.
                        'g' | 'm' | 'u' | 'y' => {}
                        other => return Err(ConfigError::UnsupportedFlag { flag: other }),
                    }
                }
                (regex.clone(), case_insensitive, dot_all)
            }
        };

        let regex = RegexBuilder::new(&pattern)
            .multi_line(true)
            .crlf(true)
            .case_insensitive(case_insensitive)
            .dot_matches_new_line(dot_all)
            .build()
            .map_err(|error| ConfigError::InvalidPattern {
                source_text: pattern.clone(),
                error,
            })?;

        Ok(Self { regex })
    }

    /// Number of capture groups, including the implicit whole-match group.
    pub fn group_count(&self) -> usize {
        self.regex.captures_len()
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// All non-overlapping matches in `text`, left to right.
    pub fn find_all(&self, text: &str) -> Vec<MatchRecord> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let groups = caps
                    .iter()
                    .map(|m| m.map(|m| m.as_str().to_string()))
                    .collect();
                Some(MatchRecord {
                    range: whole.range(),
                    groups,
                })
            })
            .collect()
    }
}
