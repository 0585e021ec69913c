//! Field rules for imported records.
//!
//! Each entity has one function that checks every field of a raw record and
//! either returns the typed candidate or a [`ValidationFailure`] listing every
//! rule that failed. None of these functions panic or touch storage.

use crate::domain::model::{coerce_integer, EntityKind, NewCategory, NewProduct, RawCategory, RawProduct};
use serde_json::Value;
use std::fmt;

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 12;
pub const PRICE_MIN: f64 = 0.0;
pub const PRICE_MAX: f64 = 200.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    Required,
    String,
    Length { min: usize, max: usize },
    Integer,
    Numeric,
    Between { min: f64, max: f64 },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("is required"),
            Rule::String => f.write_str("must be a string"),
            Rule::Length { min, max } => write!(f, "must be between {} and {} characters", min, max),
            Rule::Integer => f.write_str("must be an integer"),
            Rule::Numeric => f.write_str("must be a number"),
            Rule::Between { min, max } => write!(f, "must be between {} and {}", min, max),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub rule: Rule,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.rule)
    }
}

/// Why a record was rejected. The external id is kept as given, since an
/// invalid one is itself a possible reason for the rejection.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationFailure {
    pub kind: EntityKind,
    pub external_id: Value,
    pub violations: Vec<FieldViolation>,
}

impl ValidationFailure {
    pub fn external_id_label(&self) -> String {
        match &self.external_id {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The line shown to the operator for a skipped record.
    pub fn operator_line(&self) -> String {
        format!("{} {} did not pass validation", self.external_id_label(), self.kind)
    }

    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reasons: Vec<String> = self.violations.iter().map(ToString::to_string).collect();
        write!(f, "{}: {}", self.operator_line(), reasons.join("; "))
    }
}

fn check_title(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<String> {
    let title = match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s),
        _ => {
            violations.push(FieldViolation { field: "title", rule: Rule::String });
            return None;
        }
    };

    let Some(title) = title else {
        violations.push(FieldViolation { field: "title", rule: Rule::Required });
        return None;
    };

    let chars = title.chars().count();
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&chars) {
        violations.push(FieldViolation {
            field: "title",
            rule: Rule::Length { min: TITLE_MIN_CHARS, max: TITLE_MAX_CHARS },
        });
        return None;
    }

    Some(title.clone())
}

/// `Some(None)` is a valid absent id; `None` means the rule failed.
/// A blank string counts as absent, like `null`.
fn check_external_id(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<Option<i64>> {
    if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
        return Some(None);
    }
    match coerce_integer(value) {
        Some(id) => Some(Some(id)),
        None => {
            violations.push(FieldViolation { field: "eId", rule: Rule::Integer });
            None
        }
    }
}

fn coerce_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn check_price(value: &Value, violations: &mut Vec<FieldViolation>) -> Option<f64> {
    if value.is_null() || value.as_str().is_some_and(|s| s.trim().is_empty()) {
        violations.push(FieldViolation { field: "price", rule: Rule::Required });
        return None;
    }

    let Some(price) = coerce_numeric(value) else {
        violations.push(FieldViolation { field: "price", rule: Rule::Numeric });
        return None;
    };

    if !(PRICE_MIN..=PRICE_MAX).contains(&price) {
        violations.push(FieldViolation {
            field: "price",
            rule: Rule::Between { min: PRICE_MIN, max: PRICE_MAX },
        });
        return None;
    }

    Some(price)
}

pub fn validate_category(raw: &RawCategory) -> Result<NewCategory, ValidationFailure> {
    let mut violations = Vec::new();
    let title = check_title(&raw.title, &mut violations);
    let external_id = check_external_id(&raw.e_id, &mut violations);

    match (title, external_id) {
        (Some(title), Some(external_id)) if violations.is_empty() => {
            Ok(NewCategory { external_id, title })
        }
        _ => Err(ValidationFailure {
            kind: EntityKind::Category,
            external_id: raw.e_id.clone(),
            violations,
        }),
    }
}

pub fn validate_product(raw: &RawProduct) -> Result<NewProduct, ValidationFailure> {
    let mut violations = Vec::new();
    let title = check_title(&raw.title, &mut violations);
    let external_id = check_external_id(&raw.e_id, &mut violations);
    let price = check_price(&raw.price, &mut violations);

    match (title, external_id, price) {
        (Some(title), Some(external_id), Some(price)) if violations.is_empty() => Ok(NewProduct {
            external_id,
            title,
            price,
        }),
        _ => Err(ValidationFailure {
            kind: EntityKind::Product,
            external_id: raw.e_id.clone(),
            violations,
        }),
    }
}
