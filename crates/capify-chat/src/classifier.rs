//! Field classification for free-form messages.
//!
//! Decides which transaction field a piece of text represents. Rules are
//! checked in a fixed order and the first match wins:
//! Date, Amount, Category, Subcategory, then Description as the fallback.

use std::sync::{Arc, LazyLock};

use capify_core::{FieldKind, Taxonomy};
use chrono::NaiveDate;
use num_bigint::BigInt;
use regex::Regex;
use tracing::debug;

// =============================================================================
// Compiled patterns (compiled once, reused across calls)
// =============================================================================

// ASCII classes only: `\d` would also accept other Unicode digits.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2})\.([0-9]{2})\.([0-9]{4})$").expect("Invalid date regex"));

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+$").expect("Invalid amount regex"));

// =============================================================================
// Lexical checks
// =============================================================================

/// Parse a strict `DD.MM.YYYY` calendar date.
///
/// Exactly two day digits, two month digits and four year digits; the
/// date must exist (no 31.04, no 29.02 outside leap years, no year 0).
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let caps = DATE_RE.captures(text)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;
    if year < 1 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Whether `text` is a valid strict calendar date.
pub fn is_date(text: &str) -> bool {
    parse_date(text).is_some()
}

/// Parse a signed whole-number amount of any magnitude.
///
/// Surrounding whitespace is ignored. An optional single leading `-`, then
/// ASCII digits only.
pub fn parse_amount(text: &str) -> Option<BigInt> {
    let text = text.trim();
    if !is_amount(text) {
        return None;
    }
    text.parse().ok()
}

/// Whether `text` has the shape of an amount.
pub fn is_amount(text: &str) -> bool {
    AMOUNT_RE.is_match(text.trim())
}

// =============================================================================
// FieldClassifier
// =============================================================================

/// Rule-based classifier over a fixed taxonomy.
///
/// Stateless apart from the shared taxonomy, so the same input always
/// yields the same kind.
#[derive(Debug, Clone)]
pub struct FieldClassifier {
    taxonomy: Arc<Taxonomy>,
}

impl FieldClassifier {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classify already-trimmed text. Total: always returns a kind.
    pub fn classify(&self, text: &str) -> FieldKind {
        let kind = if is_date(text) {
            FieldKind::Date
        } else if is_amount(text) {
            FieldKind::Amount
        } else if self.taxonomy.is_category(text) {
            FieldKind::Category
        } else if self.taxonomy.is_subcategory(text) {
            // Parent category is deliberately not inferred here.
            FieldKind::Subcategory
        } else {
            FieldKind::Description
        };
        debug!(kind = ?kind, len = text.len(), "Classified message");
        kind
    }
}

impl Default for FieldClassifier {
    fn default() -> Self {
        Self::new(Arc::new(Taxonomy::default()))
    }
}

// =============================================================================
// Tests
// =============================================================================
