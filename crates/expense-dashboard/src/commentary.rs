//! Top cost category and the one-line commentary under the charts

use serde::Serialize;
use std::fmt;

use crate::category::ExpenseCategory;
use crate::format::{CurrencyFormat, percent};
use crate::kpi::{compute_kpis, percent_of};
use crate::month::MonthSelector;
use crate::snapshot::{CategoryAmounts, DashboardSnapshot};

/// Shown when no category stands out (no data, or every total is zero)
pub const VARIOUS_CATEGORIES: &str = "various categories";

/// Result of the top-category search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TopCategory {
    Category { category: ExpenseCategory, amount: f64 },
    Various,
}

impl TopCategory {
    pub fn category(&self) -> Option<&ExpenseCategory> {
        match self {
            TopCategory::Category { category, .. } => Some(category),
            TopCategory::Various => None,
        }
    }
}

impl fmt::Display for TopCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopCategory::Category { category, .. } => f.write_str(category.label()),
            TopCategory::Various => f.write_str(VARIOUS_CATEGORIES),
        }
    }
}

/// Category with the strictly greatest amount
///
/// Ties go to the category that comes first in canonical category order.
pub fn top_category(totals: &CategoryAmounts) -> TopCategory {
    let mut best: Option<(&ExpenseCategory, f64)> = None;

    for (category, amount) in totals.iter() {
        if amount <= 0.0 {
            continue;
        }
        match best {
            Some((_, best_amount)) if amount <= best_amount => {}
            _ => best = Some((category, amount)),
        }
    }

    match best {
        Some((category, amount)) => TopCategory::Category {
            category: category.clone(),
            amount,
        },
        None => TopCategory::Various,
    }
}

/// Top category for a month selection of a snapshot
pub fn top_category_for(snapshot: &DashboardSnapshot, selector: MonthSelector) -> TopCategory {
    top_category(&snapshot.monthly_category_totals.totals_for(selector))
}

/// Commentary sentence for the selected scope
pub fn commentary(
    snapshot: &DashboardSnapshot,
    selector: MonthSelector,
    currency: &CurrencyFormat,
) -> String {
    let scope = match selector {
        MonthSelector::All => "this year".to_string(),
        MonthSelector::Month(month) => format!("in {}", month.label()),
    };

    match top_category_for(snapshot, selector) {
        TopCategory::Category { category, amount } => {
            // Same sales figure as the KPI tiles for this scope
            let sales = compute_kpis(snapshot, selector).total_sales;
            if sales > 0.0 {
                format!(
                    "{} was the largest expense {} at {} ({} of sales).",
                    category.label(),
                    scope,
                    currency.amount(amount),
                    percent(percent_of(amount, sales))
                )
            } else {
                format!(
                    "{} was the largest expense {} at {}.",
                    category.label(),
                    scope,
                    currency.amount(amount)
                )
            }
        }
        TopCategory::Various => format!("Expenses {} are spread across {}.", scope, VARIOUS_CATEGORIES),
    }
}
