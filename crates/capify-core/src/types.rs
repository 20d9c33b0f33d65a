use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

// =============================================================================
// Enums
// =============================================================================

/// Which transaction field a message was classified as.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Calendar date in `DD.MM.YYYY` form.
    Date,
    /// Signed whole number of any size.
    Amount,
    /// A taxonomy category name.
    Category,
    /// A name from the flattened subcategory set.
    Subcategory,
    /// Free text; the fallback for everything else.
    Description,
}

impl FieldKind {
    /// All kinds, in classification priority order.
    pub const ALL: [FieldKind; 5] = [
        FieldKind::Date,
        FieldKind::Amount,
        FieldKind::Category,
        FieldKind::Subcategory,
        FieldKind::Description,
    ];

    /// Lowercase field name as used in replies.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Date => "date",
            FieldKind::Amount => "amount",
            FieldKind::Category => "category",
            FieldKind::Subcategory => "subcategory",
            FieldKind::Description => "description",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action offered next to the editable draft summary.
///
/// The transport hands the token back when the user presses a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionToken {
    Edit,
    Confirm,
}

impl ActionToken {
    /// Actions in the order they are laid out on the keyboard.
    pub const ALL: [ActionToken; 2] = [ActionToken::Edit, ActionToken::Confirm];

    /// Opaque callback payload carried by the button.
    pub fn token(&self) -> &'static str {
        match self {
            ActionToken::Edit => "1",
            ActionToken::Confirm => "2",
        }
    }

    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            ActionToken::Edit => "Edit",
            ActionToken::Confirm => "Confirm",
        }
    }

    /// Look up an action by its callback payload.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.token() == token)
    }
}

impl fmt::Display for ActionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque user identifier supplied by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

// =============================================================================
// Draft
// =============================================================================

/// In-progress transaction assembled from successive messages.
///
/// Every field starts absent and is only ever set by an explicit
/// assignment; there is no link back to the owning user.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub date: Option<String>,
    #[serde(default, with = "decimal")]
    pub amount: Option<BigInt>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub description: Option<String>,
}

impl Draft {
    /// Stored value of a field rendered as text, if assigned.
    pub fn value_of(&self, kind: FieldKind) -> Option<String> {
        match kind {
            FieldKind::Date => self.date.clone(),
            FieldKind::Amount => self.amount.as_ref().map(BigInt::to_string),
            FieldKind::Category => self.category.clone(),
            FieldKind::Subcategory => self.subcategory.clone(),
            FieldKind::Description => self.description.clone(),
        }
    }
}

/// Amounts serialize as decimal strings so no digit is lost.
mod decimal {
    use std::str::FromStr;

    use num_bigint::BigInt;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Option<BigInt>, s: S) -> Result<S::Ok, S::Error> {
        match amount {
            Some(a) => s.serialize_some(&a.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<BigInt>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|text| BigInt::from_str(&text).map_err(serde::de::Error::custom))
            .transpose()
    }
}
