//! Category registry.
//!
//! Maps each category to its ordered subcategories and keeps a flattened
//! subcategory set for membership tests that ignore the parent.

use std::collections::{HashMap, HashSet};

use crate::error::{CapifyError, Result};

/// Categories used when the config file declares none.
pub(crate) const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("Everyday", &["Food", "Restaurant"]),
    ("Investments", &["Stocks", "Funds"]),
];

/// Immutable registry of categories and their subcategories.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    categories: Vec<String>,
    children: HashMap<String, Vec<String>>,
    /// Union of all subcategories in first-seen order.
    flattened: Vec<String>,
    flattened_set: HashSet<String>,
}

impl Taxonomy {
    /// Build a taxonomy from `(category, subcategories)` pairs.
    ///
    /// Category order is preserved. Names must be non-empty and categories
    /// must be unique; a subcategory may appear under several categories.
    pub fn new<I, C, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (C, Vec<S>)>,
        C: Into<String>,
        S: Into<String>,
    {
        let mut categories = Vec::new();
        let mut children: HashMap<String, Vec<String>> = HashMap::new();
        let mut flattened = Vec::new();
        let mut flattened_set = HashSet::new();

        for (category, subs) in entries {
            let category = category.into();
            if category.is_empty() {
                return Err(CapifyError::Taxonomy("empty category name".to_string()));
            }
            if children.contains_key(&category) {
                return Err(CapifyError::Taxonomy(format!(
                    "duplicate category: {}",
                    category
                )));
            }

            let mut own = Vec::with_capacity(subs.len());
            for sub in subs {
                let sub = sub.into();
                if sub.is_empty() {
                    return Err(CapifyError::Taxonomy(format!(
                        "empty subcategory name under {}",
                        category
                    )));
                }
                if flattened_set.insert(sub.clone()) {
                    flattened.push(sub.clone());
                }
                own.push(sub);
            }

            categories.push(category.clone());
            children.insert(category, own);
        }

        Ok(Self {
            categories,
            children,
            flattened,
            flattened_set,
        })
    }

    /// Category names in declaration order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Exact, case-sensitive category test.
    pub fn is_category(&self, text: &str) -> bool {
        self.children.contains_key(text)
    }

    /// Exact, case-sensitive test against the flattened subcategory set.
    pub fn is_subcategory(&self, text: &str) -> bool {
        self.flattened_set.contains(text)
    }

    /// The flattened subcategory list, first-seen order, no duplicates.
    pub fn subcategories(&self) -> &[String] {
        &self.flattened
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(
            DEFAULT_CATEGORIES
                .iter()
                .map(|(category, subs)| (*category, subs.to_vec())),
        )
        .expect("built-in taxonomy is valid")
    }
}
