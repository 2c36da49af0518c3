use std::fmt;

use serde::{Deserialize, Serialize};

/// Record attribute a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleField {
    Text,
    WordCount,
    PublishedDate,
}

impl RuleField {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleField::Text => "text",
            RuleField::WordCount => "wordCount",
            RuleField::PublishedDate => "publishedDate",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "text" => Some(RuleField::Text),
            "wordCount" => Some(RuleField::WordCount),
            "publishedDate" => Some(RuleField::PublishedDate),
            _ => None,
        }
    }

    /// Operators the editing surface offers for this field.
    pub fn operators(self) -> &'static [Operator] {
        match self {
            RuleField::Text => &[Operator::Contains],
            RuleField::WordCount | RuleField::PublishedDate => &[
                Operator::GreaterThan,
                Operator::LessThan,
                Operator::GreaterOrEqual,
                Operator::LessOrEqual,
            ],
        }
    }
}

impl fmt::Display for RuleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    Contains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
}

impl Operator {
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Contains => "contains",
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::GreaterOrEqual => ">=",
            Operator::LessOrEqual => "<=",
        }
    }

    /// Accepts both the symbolic and the spelled-out operator names.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "contains" => Some(Operator::Contains),
            ">" | "greaterThan" => Some(Operator::GreaterThan),
            "<" | "lessThan" => Some(Operator::LessThan),
            ">=" | "greaterOrEqual" => Some(Operator::GreaterOrEqual),
            "<=" | "lessOrEqual" => Some(Operator::LessOrEqual),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One classification predicate, tagged by the field it inspects.
///
/// Each variant carries the value type its field expects. Combinations the
/// evaluator has no meaning for (a `contains` on a word count, `>=` on a
/// date, an operator or field it has never heard of) are still representable
/// and evaluate permissively, so a half-edited rule never hides results.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Text { operator: Operator, needle: String },
    WordCount { operator: Operator, threshold: f64 },
    /// `months` is relative to evaluation time, not an absolute date.
    PublishedDate { operator: Operator, months: f64 },
    Unrecognized { field: String, operator: String, value: String },
}

impl Rule {
    pub fn text_contains(needle: impl Into<String>) -> Self {
        Rule::Text {
            operator: Operator::Contains,
            needle: needle.into(),
        }
    }

    pub fn word_count(operator: Operator, threshold: f64) -> Self {
        Rule::WordCount {
            operator,
            threshold,
        }
    }

    pub fn published_within(operator: Operator, months: f64) -> Self {
        Rule::PublishedDate { operator, months }
    }

    pub fn field(&self) -> Option<RuleField> {
        match self {
            Rule::Text { .. } => Some(RuleField::Text),
            Rule::WordCount { .. } => Some(RuleField::WordCount),
            Rule::PublishedDate { .. } => Some(RuleField::PublishedDate),
            Rule::Unrecognized { field, .. } => RuleField::parse(field),
        }
    }

    /// Whether this rule lets every record through regardless of its value.
    ///
    /// True for operators the field does not offer, unknown fields or
    /// operators, and the inclusive date comparisons, which are not
    /// implemented.
    pub fn is_permissive(&self) -> bool {
        match self {
            Rule::Text { operator, .. } | Rule::WordCount { operator, .. } => self
                .field()
                .is_some_and(|field| !field.operators().contains(operator)),
            Rule::PublishedDate { operator, .. } => {
                !matches!(operator, Operator::GreaterThan | Operator::LessThan)
            }
            Rule::Unrecognized { .. } => true,
        }
    }

    /// Back to the editable form, e.g. to re-display the active rules.
    pub fn to_draft(&self) -> RuleDraft {
        match self {
            Rule::Text { operator, needle } => RuleDraft {
                field: RuleField::Text.as_str().to_string(),
                operator: operator.symbol().to_string(),
                value: needle.clone(),
            },
            Rule::WordCount {
                operator,
                threshold,
            } => RuleDraft {
                field: RuleField::WordCount.as_str().to_string(),
                operator: operator.symbol().to_string(),
                value: threshold.to_string(),
            },
            Rule::PublishedDate { operator, months } => RuleDraft {
                field: RuleField::PublishedDate.as_str().to_string(),
                operator: operator.symbol().to_string(),
                value: months.to_string(),
            },
            Rule::Unrecognized {
                field,
                operator,
                value,
            } => RuleDraft {
                field: field.clone(),
                operator: operator.clone(),
                value: value.clone(),
            },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let draft = self.to_draft();
        write!(f, "{} {} {:?}", draft.field, draft.operator, draft.value)
    }
}

/// A rule as typed into the editing surface: three raw strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: String,
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self {
            field: RuleField::Text.as_str().to_string(),
            operator: Operator::Contains.symbol().to_string(),
            value: String::new(),
        }
    }
}

impl RuleDraft {
    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Normalize into a typed rule. Never fails: numeric fields coerce their
    /// value with [`coerce_number`], unknown fields or operators become
    /// [`Rule::Unrecognized`].
    pub fn to_rule(&self) -> Rule {
        let field = RuleField::parse(&self.field);
        let operator = Operator::parse(&self.operator);
        let (Some(field), Some(operator)) = (field, operator) else {
            return Rule::Unrecognized {
                field: self.field.clone(),
                operator: self.operator.clone(),
                value: self.value.clone(),
            };
        };
        match field {
            RuleField::Text => Rule::Text {
                operator,
                needle: self.value.clone(),
            },
            RuleField::WordCount => Rule::WordCount {
                operator,
                threshold: coerce_number(&self.value),
            },
            RuleField::PublishedDate => Rule::PublishedDate {
                operator,
                months: coerce_number(&self.value),
            },
        }
    }
}

/// Lenient numeric conversion for rule values typed as free text.
///
/// Surrounding whitespace is ignored and blank input is `0`. Input that does
/// not parse as a decimal number (or parses to NaN) is also `0`. The only
/// spelled-out infinity accepted is `Infinity`, optionally signed; overflowing
/// literals such as `1e400` still become infinite.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    let unsigned = trimmed.trim_start_matches(['+', '-']);
    let spelled_out = unsigned.starts_with(|c: char| c.is_ascii_alphabetic());
    if spelled_out && unsigned != "Infinity" {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_nan() => value,
        _ => 0.0,
    }
}
