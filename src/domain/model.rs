use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Product,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Category => f.write_str("Category"),
            EntityKind::Product => f.write_str("Product"),
        }
    }
}

/// A category object as it appears in `categories.json`. Fields stay untyped
/// so that bad values reach the validator instead of failing decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "eId", default)]
    pub e_id: Value,
    #[serde(default)]
    pub title: Value,
}

/// A product object as it appears in `products.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawProduct {
    #[serde(rename = "eId", default)]
    pub e_id: Value,
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(rename = "categoriesEId", default)]
    pub categories_e_id: Value,
    #[serde(rename = "categoryEId", default)]
    pub category_e_id: Value,
}

impl RawCategory {
    /// Non-object elements become a record with every field absent.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

impl RawProduct {
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The category reference list: `categoriesEId` wins, then `categoryEId`,
    /// and a record carrying neither references no categories.
    pub fn category_refs(&self) -> Vec<i64> {
        let refs = if !self.categories_e_id.is_null() {
            &self.categories_e_id
        } else if !self.category_e_id.is_null() {
            &self.category_e_id
        } else {
            return Vec::new();
        };

        match refs {
            Value::Array(items) => items.iter().filter_map(coerce_integer).collect(),
            scalar => coerce_integer(scalar).into_iter().collect(),
        }
    }
}

/// 2^63, exact in `f64`. Integral floats must lie in `[-2^63, 2^63)`.
const I64_FLOAT_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Integer coercion shared by the `integer` rule and reference lookup:
/// JSON integers, integral floats, and trimmed strings parsing as `i64`.
/// Numbers outside the `i64` range never coerce.
pub fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) if n.is_f64() => n
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= -I64_FLOAT_BOUND && *f < I64_FLOAT_BOUND)
            .map(|f| f as i64),
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// A category that passed validation and is ready to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub external_id: Option<i64>,
    pub title: String,
}

/// A product that passed validation and is ready to be created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub external_id: Option<i64>,
    pub title: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub external_id: Option<i64>,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub external_id: Option<i64>,
    pub title: String,
    pub price: f64,
}
