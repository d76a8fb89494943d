//! Error types for the extraction core.
//!
//! - `ConfigError`: static misconfiguration detected while building an [`Extractor`].
//! - `ExtractionError`: a match that did not yield a key while processing a unit.
//! - `FinalizeError`: an inconsistency found while inverting key tables at run end.
//!
//! None of these are transient. They all call for a configuration fix.
//!
//! [`Extractor`]: crate::core::Extractor

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`functionReplace` is required when a custom `functionPattern` is set")]
    CustomPatternWithoutReplace,

    #[error("`functionReplace` is required when `mangle` is enabled")]
    MangleWithoutReplace,

    #[error("`groupIndex` must name at least one capture group")]
    EmptyGroupIndex,

    #[error("invalid `functionPattern` /{source_text}/: {error}")]
    InvalidPattern {
        source_text: String,
        #[source]
        error: regex::Error,
    },

    #[error("unsupported regex flag '{flag}' in `functionPattern` (supported: g, i, m, s, u, y)")]
    UnsupportedFlag { flag: char },

    #[error("invalid `moduleFilter` pattern \"{pattern}\": {error}")]
    InvalidModuleFilter {
        pattern: String,
        #[source]
        error: regex::Error,
    },

    #[error("invalid `functionReplace` template \"{template}\": {reason}")]
    InvalidTemplate { template: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "no capture group in {indices:?} matched a key in \"{matched}\" ({unit}); check `groupIndex` against `functionPattern`"
)]
pub struct ExtractionError {
    /// Identifier of the unit being processed.
    pub unit: String,
    /// The full text of the offending match.
    pub matched: String,
    /// Group indices that were tried, in order.
    pub indices: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinalizeError {
    #[error(
        "assigned key \"{assigned}\" in group \"{group}\" maps to both \"{first}\" and \"{second}\""
    )]
    DuplicateAssignedKey {
        group: String,
        assigned: String,
        first: String,
        second: String,
    },
}
