//! Expense categories
//!
//! The endpoint sends categories as squashed lowercase keys
//! ("laborexpense"). Known keys map to a closed set of variants, anything else
//! is carried through as `Other` with its canonical key so it still shows up
//! in totals and tables.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Separator between a category and its subcategory in P&L row keys
/// ("operatingexpense|utilities")
pub const SUBCATEGORY_SEPARATOR: char = '|';

/// Expense category
///
/// Variant order is the canonical category order used for rows and tie-breaks.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExpenseCategory {
    Cogs,
    FoodAndBeveragesPurchases,
    FixedExpense,
    LaborExpense,
    OperatingExpense,
    Misc,
    Other(String),
}

impl ExpenseCategory {
    /// Categories charted by default on the percent-of-sales view
    pub const CHARTED: [ExpenseCategory; 5] = [
        ExpenseCategory::FoodAndBeveragesPurchases,
        ExpenseCategory::FixedExpense,
        ExpenseCategory::LaborExpense,
        ExpenseCategory::OperatingExpense,
        ExpenseCategory::Misc,
    ];

    /// Canonicalize a raw key: trimmed, lowercased
    pub fn from_key(raw: &str) -> Self {
        let key = raw.trim().to_lowercase();
        match key.as_str() {
            "cogs" => ExpenseCategory::Cogs,
            "foodandbeveragespurchases" => ExpenseCategory::FoodAndBeveragesPurchases,
            "fixedexpense" => ExpenseCategory::FixedExpense,
            "laborexpense" => ExpenseCategory::LaborExpense,
            "operatingexpense" => ExpenseCategory::OperatingExpense,
            "misc" => ExpenseCategory::Misc,
            _ => ExpenseCategory::Other(key),
        }
    }

    /// Key as sent by the endpoint
    pub fn key(&self) -> &str {
        match self {
            ExpenseCategory::Cogs => "cogs",
            ExpenseCategory::FoodAndBeveragesPurchases => "foodandbeveragespurchases",
            ExpenseCategory::FixedExpense => "fixedexpense",
            ExpenseCategory::LaborExpense => "laborexpense",
            ExpenseCategory::OperatingExpense => "operatingexpense",
            ExpenseCategory::Misc => "misc",
            ExpenseCategory::Other(key) => key,
        }
    }

    /// Human-readable label, falling back to the raw key
    pub fn label(&self) -> &str {
        match self {
            ExpenseCategory::Cogs => "COGS",
            ExpenseCategory::FoodAndBeveragesPurchases => "Food & Beverage",
            ExpenseCategory::FixedExpense => "Fixed",
            ExpenseCategory::LaborExpense => "Labor",
            ExpenseCategory::OperatingExpense => "Operating",
            ExpenseCategory::Misc => "Misc",
            ExpenseCategory::Other(key) => key,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, ExpenseCategory::Other(_))
    }
}

impl From<String> for ExpenseCategory {
    fn from(value: String) -> Self {
        ExpenseCategory::from_key(&value)
    }
}

impl From<&str> for ExpenseCategory {
    fn from(value: &str) -> Self {
        ExpenseCategory::from_key(value)
    }
}

impl From<ExpenseCategory> for String {
    fn from(category: ExpenseCategory) -> Self {
        category.key().to_string()
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// P&L row key: a category, optionally split into a subcategory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    pub category: ExpenseCategory,
    pub subcategory: Option<String>,
}

impl RowKey {
    /// Split "category|subcategory"; an empty subcategory counts as none
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(SUBCATEGORY_SEPARATOR) {
            Some((category, subcategory)) => {
                let subcategory = subcategory.trim();
                Self {
                    category: ExpenseCategory::from_key(category),
                    subcategory: (!subcategory.is_empty()).then(|| subcategory.to_string()),
                }
            }
            None => Self {
                category: ExpenseCategory::from_key(raw),
                subcategory: None,
            },
        }
    }

    /// Wire key, the inverse of [`RowKey::parse`]
    pub fn key(&self) -> String {
        match &self.subcategory {
            Some(sub) => format!("{}{}{}", self.category.key(), SUBCATEGORY_SEPARATOR, sub),
            None => self.category.key().to_string(),
        }
    }

    /// Display label: "Operating" or "Operating - Utilities"
    pub fn label(&self) -> String {
        match &self.subcategory {
            Some(sub) => format!("{} - {}", self.category.label(), sub),
            None => self.category.label().to_string(),
        }
    }
}

// Serialized as its wire key so row maps stay valid JSON objects
impl Serialize for RowKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl From<ExpenseCategory> for RowKey {
    fn from(category: ExpenseCategory) -> Self {
        Self {
            category,
            subcategory: None,
        }
    }
}
