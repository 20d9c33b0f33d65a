//! Applies a classified field to a draft.

use capify_core::{Draft, FieldKind, UserId};
use tracing::debug;

use crate::classifier::parse_amount;
use crate::error::ChatError;
use crate::session::SessionStore;

/// Last-write-wins field updater.
///
/// Overwrites exactly one field per call and never checks cross-field
/// consistency (a subcategory may disagree with the category).
#[derive(Debug, Default, Clone, Copy)]
pub struct DraftUpdater;

impl DraftUpdater {
    /// Store `text` into the field named by `kind`.
    ///
    /// Amounts are stored as the parsed integer, however many digits it
    /// has; every other kind stores the text unchanged. Fails only for an amount that does not parse,
    /// which the classifier never produces.
    pub fn apply(&self, draft: &mut Draft, kind: FieldKind, text: &str) -> Result<(), ChatError> {
        match kind {
            FieldKind::Date => draft.date = Some(text.to_string()),
            FieldKind::Amount => {
                let amount =
                    parse_amount(text).ok_or_else(|| ChatError::InvalidAmount(text.to_string()))?;
                draft.amount = Some(amount);
            }
            FieldKind::Category => draft.category = Some(text.to_string()),
            FieldKind::Subcategory => draft.subcategory = Some(text.to_string()),
            FieldKind::Description => draft.description = Some(text.to_string()),
        }
        Ok(())
    }

    /// Apply to the user's draft in `store` and return the updated snapshot.
    ///
    /// The user's draft lock is held for the whole update.
    pub fn apply_to(
        &self,
        store: &SessionStore,
        user: &UserId,
        kind: FieldKind,
        text: &str,
    ) -> Result<Draft, ChatError> {
        let draft = store.with_draft(user, |draft| {
            self.apply(draft, kind, text)?;
            Ok::<_, ChatError>(draft.clone())
        })?;
        debug!(user = %user, field = %kind, "Draft updated");
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn test_apply_date() {
        let mut draft = Draft::default();
        DraftUpdater.apply(&mut draft, FieldKind::Date, "15.03.2024").unwrap();
        assert_eq!(draft.date.as_deref(), Some("15.03.2024"));
    }

    #[test]
    fn test_apply_amount_parses_signed_integer() {
        let mut draft = Draft::default();
        DraftUpdater.apply(&mut draft, FieldKind::Amount, "-100").unwrap();
        assert_eq!(draft.amount, Some(BigInt::from(-100)));
    }

    #[test]
    fn test_apply_amount_beyond_machine_integers() {
        let mut draft = Draft::default();
        for text in ["99999999999999999999999", "-99999999999999999999999"] {
            DraftUpdater.apply(&mut draft, FieldKind::Amount, text).unwrap();
            assert_eq!(draft.value_of(FieldKind::Amount).as_deref(), Some(text));
        }
    }

    #[test]
    fn test_apply_amount_last_write_wins() {
        let mut draft = Draft::default();
        DraftUpdater.apply(&mut draft, FieldKind::Amount, "5").unwrap();
        DraftUpdater.apply(&mut draft, FieldKind::Amount, "7").unwrap();
        assert_eq!(draft.amount, Some(BigInt::from(7)));
    }

    #[test]
    fn test_apply_leaves_other_fields_untouched() {
        let mut draft = Draft {
            date: Some("01.01.2024".to_string()),
            amount: Some(BigInt::from(3)),
            category: Some("Everyday".to_string()),
            subcategory: Some("Food".to_string()),
            description: None,
        };
        let before = draft.clone();
        DraftUpdater
            .apply(&mut draft, FieldKind::Description, "lunch")
            .unwrap();
        assert_eq!(draft.description.as_deref(), Some("lunch"));
        assert_eq!(draft.date, before.date);
        assert_eq!(draft.amount, before.amount);
        assert_eq!(draft.category, before.category);
        assert_eq!(draft.subcategory, before.subcategory);
    }

    #[test]
    fn test_apply_does_not_check_category_consistency() {
        let mut draft = Draft::default();
        DraftUpdater
            .apply(&mut draft, FieldKind::Category, "Investments")
            .unwrap();
        DraftUpdater
            .apply(&mut draft, FieldKind::Subcategory, "Food")
            .unwrap();
        assert_eq!(draft.category.as_deref(), Some("Investments"));
        assert_eq!(draft.subcategory.as_deref(), Some("Food"));
    }

    #[test]
    fn test_apply_invalid_amount_leaves_draft_unchanged() {
        let mut draft = Draft {
            amount: Some(BigInt::from(9)),
            ..Draft::default()
        };
        let err = DraftUpdater
            .apply(&mut draft, FieldKind::Amount, "12.5")
            .unwrap_err();
        assert!(matches!(err, ChatError::InvalidAmount(ref t) if t == "12.5"));
        assert_eq!(draft.amount, Some(BigInt::from(9)));
    }

    #[test]
    fn test_apply_to_store_returns_snapshot() {
        let store = SessionStore::new();
        let user = UserId::new("u1");
        let snapshot = DraftUpdater
            .apply_to(&store, &user, FieldKind::Category, "Everyday")
            .unwrap();
        assert_eq!(snapshot.category.as_deref(), Some("Everyday"));
        assert_eq!(store.snapshot(&user), Some(snapshot));
    }

    #[test]
    fn test_apply_to_store_error_propagates() {
        let store = SessionStore::new();
        let user = UserId::new("u1");
        let result = DraftUpdater.apply_to(&store, &user, FieldKind::Amount, "abc");
        assert!(matches!(result, Err(ChatError::InvalidAmount(_))));
        // The session still exists, but nothing was written
        assert_eq!(store.snapshot(&user), Some(Draft::default()));
    }
}
