use std::fmt;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::format_value;

/// Identifier normalization shared by stock items, scans and the unexpected registry.
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// ---------------------------------------------------------------------------
// Stock items
// ---------------------------------------------------------------------------

/// One expected inventory line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockItem {
    pub id: String,
    pub raw_id: String,
    pub expected_quantity: i64,
    pub scanned_count: i64,
    pub unit_price: Decimal,
    pub attributes: Attributes,
}

impl StockItem {
    pub fn new(raw_id: &str, expected_quantity: i64, unit_price: Decimal) -> Self {
        let raw_id = raw_id.trim();
        Self {
            id: normalize_id(raw_id),
            raw_id: raw_id.to_string(),
            expected_quantity,
            scanned_count: 0,
            unit_price,
            attributes: Attributes::default(),
        }
    }

    /// `expected_quantity - scanned_count`; negative on over-scan.
    pub fn remaining(&self) -> i64 {
        self.expected_quantity.saturating_sub(self.scanned_count)
    }

    pub fn status(&self) -> ItemStatus {
        ItemStatus::from_counts(self.expected_quantity, self.scanned_count)
    }

    /// Saturates at `Decimal::MAX` rather than overflowing.
    pub fn expected_value(&self) -> Decimal {
        Decimal::from(self.expected_quantity).saturating_mul(self.unit_price)
    }

    pub fn scanned_value(&self) -> Decimal {
        Decimal::from(self.scanned_count).saturating_mul(self.unit_price)
    }

    /// Case-insensitive substring match over raw id and every attribute value.
    pub fn matches_filter(&self, needle_upper: &str) -> bool {
        if needle_upper.is_empty() {
            return true;
        }
        self.raw_id.to_uppercase().contains(needle_upper)
            || self
                .attributes
                .values()
                .any(|v| v.to_uppercase().contains(needle_upper))
    }
}

/// Ordered source-column name → raw cell value.
///
/// Serialized as a JSON object whose key order follows the source columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Insert or replace; replacing keeps the original position.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        let column = column.into();
        let value = value.into();
        match self.0.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.0.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::default();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (column, value) in &self.0 {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AttributesVisitor;

        impl<'de> Visitor<'de> for AttributesVisitor {
            type Value = Attributes;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column name to cell text")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Attributes, A::Error> {
                let mut attrs = Attributes::default();
                while let Some((column, value)) = access.next_entry::<String, String>()? {
                    attrs.insert(column, value);
                }
                Ok(attrs)
            }
        }

        deserializer.deserialize_map(AttributesVisitor)
    }
}

// ---------------------------------------------------------------------------
// Unexpected scans
// ---------------------------------------------------------------------------

/// A scanned identifier with no expected item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnexpectedScanRecord {
    /// First-seen raw text.
    pub raw_id: String,
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Field mapping
// ---------------------------------------------------------------------------

/// Caller-declared column roles. Blank names are stored as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    #[serde(default)]
    pub unique_id_header: String,
    #[serde(default)]
    pub quantity_header: Option<String>,
    #[serde(default)]
    pub price_header: Option<String>,
}

impl FieldMapping {
    pub fn new(unique_id: &str, quantity: Option<&str>, price: Option<&str>) -> Self {
        Self {
            unique_id_header: unique_id.trim().to_string(),
            quantity_header: non_blank(quantity),
            price_header: non_blank(price),
        }
    }

    pub fn has_unique_id(&self) -> bool {
        !self.unique_id_header.trim().is_empty()
    }

    pub fn quantity(&self) -> Option<&str> {
        self.quantity_header.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }

    pub fn price(&self) -> Option<&str> {
        self.price_header.as_deref().map(str::trim).filter(|h| !h.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        !self.has_unique_id() && self.quantity().is_none() && self.price().is_none()
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Currency
// ---------------------------------------------------------------------------

/// Currency symbol or code frozen for one load; empty when none was detected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyContext(String);

impl CurrencyContext {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn symbol(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn format(&self, amount: Decimal) -> String {
        format_value(amount, true, self)
    }
}

impl fmt::Display for CurrencyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Status + scan outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    Pending,
    Partial,
    Complete,
    OverScan,
}

impl ItemStatus {
    /// Four-way rule over `remaining = expected - scanned`.
    pub fn from_counts(expected_quantity: i64, scanned_count: i64) -> Self {
        let remaining = expected_quantity.saturating_sub(scanned_count);
        if remaining == expected_quantity {
            Self::Pending
        } else if remaining < 0 {
            Self::OverScan
        } else if remaining == 0 {
            Self::Complete
        } else {
            Self::Partial
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Partial => write!(f, "PARTIAL"),
            Self::Complete => write!(f, "COMPLETE"),
            Self::OverScan => write!(f, "OVER-SCAN"),
        }
    }
}

/// Result of applying one scan event to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    Matched {
        id: String,
        /// Token as typed or scanned for this event.
        scanned_as: String,
        expected_quantity: i64,
        scanned_count: i64,
        remaining: i64,
    },
    Unexpected {
        id: String,
        scanned_as: String,
        count: u32,
    },
}

impl ScanOutcome {
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    /// Operator-facing line for this scan.
    pub fn message(&self) -> String {
        match self {
            Self::Matched {
                scanned_as,
                expected_quantity,
                scanned_count,
                remaining,
                ..
            } => {
                if *remaining >= 0 {
                    format!("SUCCESS: Item {scanned_as} checked in. {remaining} remaining.")
                } else if *remaining == -1 {
                    format!(
                        "OVER-SCAN ALERT: Item {scanned_as} is now over its expected quantity of {expected_quantity}."
                    )
                } else {
                    format!(
                        "OVER-SCAN ALERT: Item {scanned_as} scanned again. Count is now {scanned_count} (Expected {expected_quantity})."
                    )
                }
            }
            Self::Unexpected { scanned_as, count, .. } => {
                format!("UNEXPECTED ITEM: ID {scanned_as} not on list. Scanned {count} time(s).")
            }
        }
    }
}
