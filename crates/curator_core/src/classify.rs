//! Relevance classification of search results.
//!
//! [`ClassificationEngine`] owns a [`ClassificationState`] and recomputes its
//! selection on demand. Evaluation is total: malformed rules pass every
//! record and unparsable dates never satisfy a date comparison.
use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use curator_logging::curator_debug;
use serde::{Deserialize, Serialize};

use crate::dates::{cutoff_for_months, months_before, parse_published_date};
use crate::rule::{Operator, Rule};
use crate::words::word_count;
use crate::{RecordId, ResultRecord};

/// Minimum word count (exclusive) for programmatic selection.
pub const PROGRAMMATIC_MIN_WORDS: usize = 500;
/// Maximum age in months for programmatic selection.
pub const PROGRAMMATIC_MAX_AGE_MONTHS: i64 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Fixed heuristic: long, dated, recent.
    #[default]
    Programmatic,
    /// User-defined rules, all of which must hold.
    Heuristic,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Programmatic => "programmatic",
            Mode::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationState {
    pub mode: Mode,
    pub rules: Vec<Rule>,
    pub selected_ids: BTreeSet<RecordId>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassificationEngine {
    state: ClassificationState,
}

impl ClassificationEngine {
    pub fn new(state: ClassificationState) -> Self {
        Self { state }
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn rules(&self) -> &[Rule] {
        &self.state.rules
    }

    pub fn selected_ids(&self) -> &BTreeSet<RecordId> {
        &self.state.selected_ids
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.state.selected_ids.contains(id)
    }

    /// Switch strategy. The current selection is left untouched until the
    /// next evaluation.
    pub fn set_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
    }

    pub fn set_rules(&mut self, rules: Vec<Rule>) {
        self.state.rules = rules;
    }

    pub fn evaluate(&mut self, records: &[ResultRecord]) -> &BTreeSet<RecordId> {
        self.evaluate_at(records, Utc::now())
    }

    /// Recompute the selection with `now` as the reference for relative
    /// dates. The previous selection is replaced in one assignment.
    pub fn evaluate_at(
        &mut self,
        records: &[ResultRecord],
        now: DateTime<Utc>,
    ) -> &BTreeSet<RecordId> {
        let selected: BTreeSet<RecordId> = match self.state.mode {
            Mode::Programmatic => {
                let cutoff = months_before(now, PROGRAMMATIC_MAX_AGE_MONTHS);
                records
                    .iter()
                    .filter(|record| passes_programmatic(record, cutoff))
                    .map(|record| record.id.clone())
                    .collect()
            }
            Mode::Heuristic => {
                let rules = &self.state.rules;
                records
                    .iter()
                    .filter(|record| rules.iter().all(|rule| rule_matches(rule, record, now)))
                    .map(|record| record.id.clone())
                    .collect()
            }
        };
        curator_debug!(
            "classified mode={} rules={} records={} selected={}",
            self.state.mode,
            self.state.rules.len(),
            records.len(),
            selected.len()
        );
        self.state.selected_ids = selected;
        &self.state.selected_ids
    }
}

fn passes_programmatic(record: &ResultRecord, cutoff: Option<DateTime<Utc>>) -> bool {
    if word_count(&record.text) <= PROGRAMMATIC_MIN_WORDS {
        return false;
    }
    let published = record.published_date.as_deref().and_then(parse_published_date);
    match (published, cutoff) {
        (Some(published), Some(cutoff)) => published >= cutoff,
        _ => false,
    }
}

/// Whether `record` satisfies a single rule at time `now`.
pub fn rule_matches(rule: &Rule, record: &ResultRecord, now: DateTime<Utc>) -> bool {
    match rule {
        Rule::Text {
            operator: Operator::Contains,
            needle,
        } => record.text.to_lowercase().contains(&needle.to_lowercase()),
        Rule::Text { .. } => true,
        Rule::WordCount {
            operator,
            threshold,
        } => {
            let count = word_count(&record.text) as f64;
            match operator {
                Operator::GreaterThan => count > *threshold,
                Operator::LessThan => count < *threshold,
                Operator::GreaterOrEqual => count >= *threshold,
                Operator::LessOrEqual => count <= *threshold,
                Operator::Contains => true,
            }
        }
        Rule::PublishedDate { operator, months } => {
            let published = record.published_date.as_deref().and_then(parse_published_date);
            let cutoff = cutoff_for_months(now, *months);
            // Only strict comparisons are implemented; inclusive ones pass.
            match (operator, published, cutoff) {
                (Operator::GreaterThan, Some(published), Some(cutoff)) => published > cutoff,
                (Operator::LessThan, Some(published), Some(cutoff)) => published < cutoff,
                (Operator::GreaterThan | Operator::LessThan, _, _) => false,
                _ => true,
            }
        }
        Rule::Unrecognized { .. } => true,
    }
}
