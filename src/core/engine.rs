//! The extraction and mangling pass.
//!
//! An [`Extractor`] holds the validated configuration and can start any
//! number of [`Run`]s. Each run owns its key tables and identifier generator,
//! so numbering restarts at `0` for every run and nothing leaks between runs.

use std::collections::HashMap;
use std::ops::Range;
use std::time::Instant;

use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ConfigError, ExtractionError, FinalizeError};
use super::id_gen::IdGenerator;
use super::key_table::KeyTable;
use super::module_filter::ModuleFilter;
use super::pattern::{MatchRecord, NormalizedPattern, PatternSource};
use super::result::{DoneHook, RunResult, RunStats};
use super::template::ReplacementTemplate;

/// Which parts of a unit's text a mangled replacement is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RewriteScope {
    /// Every occurrence of a matched substring anywhere in the unit.
    #[default]
    Everywhere,
    /// Only the positions where the pattern matched.
    Matches,
}

/// Options accepted by [`Extractor::new`].
pub struct ExtractorOptions {
    /// Key pattern. `None` uses the built-in `gettext(...)` pattern.
    pub function_pattern: Option<PatternSource>,
    /// Replacement template used when mangling.
    pub function_replace: Option<String>,
    /// Candidate key groups, tried in order.
    pub group_index: Vec<usize>,
    /// Module filter stages. `None` uses the default script filter.
    pub module_filter: Option<Vec<String>>,
    pub mangle: bool,
    pub rewrite_scope: RewriteScope,
    /// Called once for every finished run.
    pub done: Option<DoneHook>,
}

impl Default for ExtractorOptions {
    fn default() -> Self {
        Self {
            function_pattern: None,
            function_replace: None,
            group_index: vec![1],
            module_filter: None,
            mangle: false,
            rewrite_scope: RewriteScope::default(),
            done: None,
        }
    }
}

/// Validated, immutable extraction configuration.
pub struct Extractor {
    pattern: NormalizedPattern,
    template: Option<ReplacementTemplate>,
    group_index: Vec<usize>,
    module_filter: ModuleFilter,
    mangle: bool,
    rewrite_scope: RewriteScope,
    done: Option<DoneHook>,
}

impl Extractor {
    pub fn new(options: ExtractorOptions) -> Result<Self, ConfigError> {
        let ExtractorOptions {
            function_pattern,
            function_replace,
            group_index,
            module_filter,
            mangle,
            rewrite_scope,
            done,
        } = options;

        if function_pattern.is_some() && function_replace.is_none() {
            return Err(ConfigError::CustomPatternWithoutReplace);
        }
        if mangle && function_replace.is_none() {
            return Err(ConfigError::MangleWithoutReplace);
        }
        if group_index.is_empty() {
            return Err(ConfigError::EmptyGroupIndex);
        }

        let pattern = NormalizedPattern::new(&function_pattern.unwrap_or_default())?;
        let template = function_replace
            .map(|t| ReplacementTemplate::parse(&t, pattern.group_count()))
            .transpose()?;
        let module_filter = match module_filter {
            Some(stages) => ModuleFilter::new(&stages)?,
            None => ModuleFilter::default(),
        };

        if group_index.iter().all(|&i| i >= pattern.group_count()) {
            tracing::warn!(
                pattern = pattern.as_str(),
                ?group_index,
                "no configured group index exists in the key pattern; every match will fail"
            );
        }

        if mangle
            && let Some(template) = &template
            && !template
                .referenced_groups()
                .any(|i| group_index.contains(&i))
        {
            tracing::warn!(
                ?group_index,
                "`functionReplace` references no key group; mangled identifiers will not appear in rewritten text"
            );
        }

        Ok(Self {
            pattern,
            template,
            group_index,
            module_filter,
            mangle,
            rewrite_scope,
            done,
        })
    }

    pub fn is_mangling(&self) -> bool {
        self.mangle
    }

    pub fn module_filter(&self) -> &ModuleFilter {
        &self.module_filter
    }

    /// Start a new run with fresh key tables and identifier numbering.
    pub fn begin_run(&self, name: impl Into<String>) -> Run<'_> {
        let name = name.into();
        tracing::debug!(run = %name, mangle = self.mangle, "run started");
        Run {
            extractor: self,
            name,
            tables: Vec::new(),
            table_index: HashMap::new(),
            id_gen: IdGenerator::new(),
            stats: RunStats::default(),
            started: Instant::now(),
        }
    }

    /// First configured group index that captured non-empty text.
    fn key_group(&self, record: &MatchRecord) -> Option<usize> {
        self.group_index
            .iter()
            .copied()
            .find(|&i| record.group(i).is_some_and(|text| !text.is_empty()))
    }
}

/// What happened to one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    /// The module filter rejected the unit.
    Skipped,
    /// Keys (if any) were recorded; the text needs no change.
    Unchanged,
    /// Keys were recorded and the text was rewritten.
    Rewritten(String),
}

/// A finished run: per-group mappings plus the counters collected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedRun {
    pub result: RunResult,
    pub stats: RunStats,
}

/// State of one run. Units must be fed one at a time.
pub struct Run<'a> {
    extractor: &'a Extractor,
    name: String,
    tables: Vec<(String, KeyTable)>,
    table_index: HashMap<String, usize>,
    id_gen: IdGenerator,
    stats: RunStats,
    started: Instant,
}

impl Run<'_> {
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Key table of `group`, if any unit of that group was extracted.
    pub fn table(&self, group: &str) -> Option<&KeyTable> {
        self.table_index.get(group).map(|&i| &self.tables[i].1)
    }

    /// Extract keys from one unit and, when mangling, rewrite its text.
    ///
    /// A unit is processed atomically: if any match lacks a key, the error is
    /// returned and nothing from this unit is recorded.
    pub fn process_unit(
        &mut self,
        text: &str,
        unit: &str,
        group: &str,
    ) -> Result<UnitOutcome, ExtractionError> {
        let extractor = self.extractor;
        self.stats.units_seen += 1;

        if !extractor.module_filter.accepts(unit) {
            self.stats.units_skipped += 1;
            tracing::debug!(unit, "skipped by module filter");
            return Ok(UnitOutcome::Skipped);
        }

        let matches = extractor.pattern.find_all(text);
        let mut keyed = Vec::with_capacity(matches.len());
        for record in &matches {
            let Some(winner) = extractor.key_group(record) else {
                self.stats.units_failed += 1;
                return Err(ExtractionError {
                    unit: unit.to_string(),
                    matched: record.text().to_string(),
                    indices: extractor.group_index.clone(),
                });
            };
            keyed.push((record, winner));
        }

        let slot = match self.table_index.get(group) {
            Some(&slot) => slot,
            None => {
                self.tables.push((group.to_string(), KeyTable::new()));
                self.table_index.insert(group.to_string(), self.tables.len() - 1);
                self.tables.len() - 1
            }
        };
        let table = &mut self.tables[slot].1;
        let template = extractor.template.as_ref().filter(|_| extractor.mangle);

        let mut replacements: Vec<(Range<usize>, String)> = Vec::new();
        let mut new_keys = 0;
        for (record, winner) in keyed {
            let original = record.group(winner).unwrap_or_default();
            let assigned = match table.get(original) {
                Some(assigned) => assigned.to_string(),
                None => {
                    let assigned = if extractor.mangle {
                        self.id_gen.next_id()
                    } else {
                        original.to_string()
                    };
                    table.insert(original, assigned.clone());
                    new_keys += 1;
                    assigned
                }
            };

            if let Some(template) = template {
                let replacement = template.render(record.text(), |i| {
                    if i == winner {
                        assigned.as_str()
                    } else if extractor.group_index.contains(&i) {
                        ""
                    } else {
                        record.group(i).unwrap_or_default()
                    }
                });
                replacements.push((record.range.clone(), replacement));
            }
        }

        self.stats.units_extracted += 1;
        self.stats.matches += matches.len();
        tracing::debug!(
            unit,
            group,
            matches = matches.len(),
            new_keys,
            "extracted keys"
        );

        if replacements.is_empty() {
            return Ok(UnitOutcome::Unchanged);
        }

        let rewritten = match extractor.rewrite_scope {
            RewriteScope::Everywhere => rewrite_everywhere(text, &replacements),
            RewriteScope::Matches => rewrite_matches(text, &replacements),
        };

        if rewritten == text {
            Ok(UnitOutcome::Unchanged)
        } else {
            self.stats.units_rewritten += 1;
            Ok(UnitOutcome::Rewritten(rewritten))
        }
    }

    /// Invert every group's table, notify the completion hook and return
    /// the result. `host` is passed through to the hook unchanged.
    pub fn finish(self, host: Value) -> Result<FinishedRun, FinalizeError> {
        let Run {
            extractor,
            name,
            tables,
            mut stats,
            started,
            ..
        } = self;

        let groups = tables
            .into_iter()
            .map(|(group, table)| table.invert(&group).map(|mapping| (group, mapping)))
            .collect::<Result<Vec<_>, _>>()?;

        stats.elapsed = started.elapsed();
        stats.host = host;
        let result = RunResult::new(name, groups);

        tracing::debug!(
            run = %result.run_name,
            groups = result.group_count(),
            keys = result.key_count(),
            "run finished"
        );

        if let Some(done) = &extractor.done {
            done(&result, &stats);
        }

        Ok(FinishedRun { result, stats })
    }
}

/// Replace only the matched ranges.
fn rewrite_matches(text: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (range, replacement) in replacements {
        out.push_str(&text[last..range.start]);
        out.push_str(replacement);
        last = range.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Replace every occurrence of each distinct matched substring in a single
/// left-to-right pass. The first match of a substring decides its replacement.
fn rewrite_everywhere(text: &str, replacements: &[(Range<usize>, String)]) -> String {
    let mut by_match: HashMap<&str, &str> = HashMap::new();
    let mut needles: Vec<&str> = Vec::new();
    for (range, replacement) in replacements {
        let matched = &text[range.clone()];
        if matched.is_empty() {
            continue;
        }
        if !by_match.contains_key(matched) {
            by_match.insert(matched, replacement.as_str());
            needles.push(matched);
        }
    }
    if needles.is_empty() {
        return text.to_string();
    }

    // Longest first so that overlapping alternatives prefer the longer one.
    needles.sort_by(|a, b| b.len().cmp(&a.len()));
    let alternation = needles
        .iter()
        .map(|needle| regex::escape(needle))
        .collect::<Vec<_>>()
        .join("|");

    match RegexBuilder::new(&alternation).size_limit(1 << 28).build() {
        Ok(finder) => finder
            .replace_all(text, |caps: &regex::Captures<'_>| {
                by_match.get(&caps[0]).copied().unwrap_or_default().to_string()
            })
            .into_owned(),
        Err(err) => {
            tracing::debug!(%err, "alternation too large, scanning needles directly");
            scan_replace(text, &needles, &by_match)
        }
    }
}

/// Single left-to-right pass that replaces, at each position, the first
/// needle (longest first) that starts there. Replaced text is never scanned
/// again.
fn scan_replace(text: &str, needles: &[&str], by_match: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(ch) = rest.chars().next() {
        match needles.iter().find(|needle| rest.starts_with(**needle)) {
            Some(needle) => {
                out.push_str(by_match.get(needle).copied().unwrap_or_default());
                rest = &rest[needle.len()..];
            }
            None => {
                out.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    out
}
