//! Record normalization
//!
//! Turns raw catalog cells into comparable forms. Every function here is total:
//! missing or unparseable input degrades to empty text or [`Price::Unknown`],
//! never to an error.

use crate::record::{Cell, Record, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid html tag regex"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Hierarchy separator in raw category values
pub const CATEGORY_SEPARATOR: char = '>';

/// Separator used when rejoining normalized category segments
pub const CANONICAL_CATEGORY_SEPARATOR: &str = " > ";

/// Clean free text for comparison
///
/// Lowercases, replaces HTML-like tags with a space, drops non-ASCII characters,
/// removes ASCII punctuation entirely, collapses whitespace runs and trims.
pub fn clean_text(cell: &Cell) -> String {
    if cell.is_missing() {
        return String::new();
    }
    clean_str(&cell.as_text())
}

/// [`clean_text`] over a plain string
pub fn clean_str(text: &str) -> String {
    let lowered = text.to_lowercase();
    let untagged = HTML_TAG.replace_all(&lowered, " ");
    let stripped: String = untagged
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_punctuation())
        .collect();
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// A normalized price
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Price {
    Known(f64),
    /// No numeric value could be extracted. Never compared as zero.
    #[default]
    Unknown,
}

impl Price {
    #[inline]
    #[must_use]
    pub fn is_known(&self) -> bool {
        matches!(self, Price::Known(_))
    }

    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Price::Known(v) => Some(*v),
            Price::Unknown => None,
        }
    }

    /// Absolute difference, known only when both sides are known
    pub fn abs_diff(&self, other: &Price) -> Option<f64> {
        match (self, other) {
            (Price::Known(a), Price::Known(b)) => Some((a - b).abs()),
            _ => None,
        }
    }
}

/// Extract a price from a loosely formatted value
///
/// Every character other than an ASCII digit or `.` is removed before parsing,
/// so `"$1,234.56"` parses as 1234.56 and `"-5"` as 5.
pub fn normalize_price(cell: &Cell) -> Price {
    if cell.is_missing() {
        return Price::Unknown;
    }
    let digits: String = cell
        .as_text()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match digits.parse::<f64>() {
        Ok(value) => Price::Known(value),
        Err(_) => Price::Unknown,
    }
}

/// A normalized hierarchical category, as an ordered list of segments
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether both paths are non-empty and share at least one segment
    ///
    /// Segment order is ignored; this is a set intersection.
    pub fn overlaps(&self, other: &CategoryPath) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        let tokens: ahash::AHashSet<&str> = self.segments.iter().map(String::as_str).collect();
        other.segments.iter().any(|s| tokens.contains(s.as_str()))
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(CANONICAL_CATEGORY_SEPARATOR))
    }
}

/// Normalize a hierarchical category such as `"Shoes > Running"`
///
/// Segments are trimmed and lowercased. Empty input yields an empty path,
/// not a path holding one empty segment.
pub fn normalize_category(cell: &Cell) -> CategoryPath {
    if cell.is_missing() {
        return CategoryPath::default();
    }
    let segments: Vec<String> = cell
        .as_text()
        .split(CATEGORY_SEPARATOR)
        .map(|segment| segment.trim().to_lowercase())
        .collect();

    // a lone blank segment renders as "" and counts as no category
    if segments.len() == 1 && segments[0].is_empty() {
        return CategoryPath::default();
    }
    CategoryPath::new(segments)
}

/// Immutable, comparable view of a [`Record`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub clean_title: String,
    /// Normalized but not used for scoring
    pub clean_detail: String,
    pub clean_category: CategoryPath,
    pub price_norm: Price,
}

impl NormalizedRecord {
    pub fn from_record(record: &Record) -> Self {
        Self {
            clean_title: clean_text(&record.title),
            clean_detail: clean_text(&record.detail),
            clean_category: normalize_category(&record.category),
            price_norm: normalize_price(&record.price),
        }
    }
}

/// Normalize a single record
#[inline]
pub fn normalize(record: &Record) -> NormalizedRecord {
    NormalizedRecord::from_record(record)
}

/// Normalize every row of a table, preserving row order
pub fn normalize_table(table: &Table) -> Vec<NormalizedRecord> {
    table.records.iter().map(normalize).collect()
}
