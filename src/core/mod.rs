//! Key extraction and mangling core.
//!
//! The host hands every unit of work, a `(text, identifier, group)` tuple, to a
//! [`Run`] started from an [`Extractor`]:
//!
//! ```
//! use keymangle::core::{Extractor, ExtractorOptions, PatternSource, UnitOutcome};
//!
//! let extractor = Extractor::new(ExtractorOptions {
//!     function_pattern: Some(PatternSource::regex(r#"t\("([^"]+)"\)"#)),
//!     function_replace: Some(r#"t("$1")"#.to_string()),
//!     mangle: true,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut run = extractor.begin_run("");
//! let outcome = run.process_unit(r#"t("greeting")"#, "src/app.js", "main").unwrap();
//! assert_eq!(outcome, UnitOutcome::Rewritten(r#"t("0")"#.to_string()));
//!
//! let finished = run.finish(serde_json::Value::Null).unwrap();
//! assert_eq!(finished.result.group("main").unwrap().get("0"), Some("greeting"));
//! ```

pub mod engine;
pub mod error;
pub mod id_gen;
pub mod key_table;
pub mod module_filter;
pub mod pattern;
pub mod result;
pub mod template;

pub use engine::{Extractor, ExtractorOptions, FinishedRun, RewriteScope, Run, UnitOutcome};
pub use error::{ConfigError, ExtractionError, FinalizeError};
pub use key_table::{KeyMapping, KeyTable};
pub use module_filter::{DEFAULT_MODULE_FILTER, ModuleFilter};
pub use pattern::{DEFAULT_FUNCTION_PATTERN, PatternSource};
pub use result::{DoneHook, RunResult, RunStats};
