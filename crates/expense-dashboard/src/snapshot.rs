//! Parsed dashboard snapshot
//!
//! A snapshot is the full result of one endpoint fetch. It is parsed once,
//! never mutated, and handed by reference to every aggregation. A new fetch
//! produces a new snapshot; the previous one is simply dropped.
//!
//! Parsing is lenient in the same places the dashboards were: unknown month
//! keys are dropped, null or unparsable amounts become zero, and spreadsheet
//! strings like "₱1,234.50" are read as numbers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use crate::category::{ExpenseCategory, RowKey};
use crate::error::Result;
use crate::month::{MonthKey, MonthSelector};

// =============================================================================
// Lookup-with-default maps
// =============================================================================

/// Sum starting from +0.0; an empty sum is 0.0, never -0.0
pub(crate) fn sum_amounts<I: IntoIterator<Item = f64>>(amounts: I) -> f64 {
    amounts.into_iter().fold(0.0, |acc, amount| acc + amount)
}

/// Month -> amount. Absent months read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyAmounts(BTreeMap<MonthKey, f64>);

impl MonthlyAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Amount for a month, 0 when absent
    pub fn get(&self, month: MonthKey) -> f64 {
        self.0.get(&month).copied().unwrap_or(0.0)
    }

    /// Add to a month (repeated keys such as "jan" and "january" accumulate)
    pub fn add(&mut self, month: MonthKey, amount: f64) {
        *self.0.entry(month).or_insert(0.0) += amount;
    }

    pub fn contains(&self, month: MonthKey) -> bool {
        self.0.contains_key(&month)
    }

    /// Entries in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (MonthKey, f64)> + '_ {
        self.0.iter().map(|(month, amount)| (*month, *amount))
    }

    pub fn total(&self) -> f64 {
        sum_amounts(self.0.values().copied())
    }

    /// Sum over the months covered by a selector
    pub fn total_for(&self, selector: MonthSelector) -> f64 {
        match selector {
            MonthSelector::All => self.total(),
            MonthSelector::Month(month) => self.get(month),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(MonthKey, f64)> for MonthlyAmounts {
    fn from_iter<I: IntoIterator<Item = (MonthKey, f64)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (month, amount) in iter {
            amounts.add(month, amount);
        }
        amounts
    }
}

/// Category -> amount. Absent categories read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CategoryAmounts(BTreeMap<ExpenseCategory, f64>);

static NO_CATEGORIES: CategoryAmounts = CategoryAmounts(BTreeMap::new());

impl CategoryAmounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &ExpenseCategory) -> f64 {
        self.0.get(category).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, category: ExpenseCategory, amount: f64) {
        *self.0.entry(category).or_insert(0.0) += amount;
    }

    /// Entries in canonical category order
    pub fn iter(&self) -> impl Iterator<Item = (&ExpenseCategory, f64)> + '_ {
        self.0.iter().map(|(category, amount)| (category, *amount))
    }

    pub fn total(&self) -> f64 {
        sum_amounts(self.0.values().copied())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ExpenseCategory, f64)> for CategoryAmounts {
    fn from_iter<I: IntoIterator<Item = (ExpenseCategory, f64)>>(iter: I) -> Self {
        let mut amounts = Self::new();
        for (category, amount) in iter {
            amounts.add(category, amount);
        }
        amounts
    }
}

/// Month -> category -> amount
///
/// Amounts are additive: a month's categories sum to that month's expenses and
/// a category's months sum to its annual total.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MonthlyCategoryTotals(BTreeMap<MonthKey, CategoryAmounts>);

impl MonthlyCategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Categories for a month, empty when the month is absent
    pub fn month(&self, month: MonthKey) -> &CategoryAmounts {
        self.0.get(&month).unwrap_or(&NO_CATEGORIES)
    }

    pub fn add(&mut self, month: MonthKey, category: ExpenseCategory, amount: f64) {
        self.0.entry(month).or_default().add(category, amount);
    }

    /// Record a month as present even when it has no categories
    pub fn touch_month(&mut self, month: MonthKey) {
        self.0.entry(month).or_default();
    }

    /// Total expenses for one month
    pub fn month_total(&self, month: MonthKey) -> f64 {
        self.month(month).total()
    }

    /// Annual total for one category
    pub fn category_total(&self, category: &ExpenseCategory) -> f64 {
        sum_amounts(self.0.values().map(|amounts| amounts.get(category)))
    }

    /// Category totals summed over the months a selector covers
    pub fn totals_for(&self, selector: MonthSelector) -> CategoryAmounts {
        match selector {
            MonthSelector::Month(month) => self.month(month).clone(),
            MonthSelector::All => self
                .0
                .values()
                .flat_map(|amounts| amounts.iter().map(|(c, a)| (c.clone(), a)))
                .collect(),
        }
    }

    /// Sum over every month and category
    pub fn grand_total(&self) -> f64 {
        sum_amounts(self.0.values().map(CategoryAmounts::total))
    }

    /// Months that have category data, in calendar order
    pub fn months_present(&self) -> Vec<MonthKey> {
        self.0.keys().copied().collect()
    }

    /// Every category seen in any month, in canonical order
    pub fn categories(&self) -> BTreeSet<ExpenseCategory> {
        self.0
            .values()
            .flat_map(|amounts| amounts.iter().map(|(c, _)| c.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Category -> target percent of sales. Reference lines only.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Targets(BTreeMap<ExpenseCategory, f64>);

impl Targets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target for a category; a missing target is not zero, it is no target
    pub fn get(&self, category: &ExpenseCategory) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn set(&mut self, category: ExpenseCategory, percent: f64) {
        self.0.insert(category, percent);
    }

    /// Overlay `overrides` on top of these targets
    pub fn merged_with(&self, overrides: &Targets) -> Targets {
        let mut merged = self.clone();
        for (category, percent) in &overrides.0 {
            merged.0.insert(category.clone(), *percent);
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExpenseCategory, f64)> + '_ {
        self.0.iter().map(|(category, percent)| (category, *percent))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(ExpenseCategory, f64)> for Targets {
    fn from_iter<I: IntoIterator<Item = (ExpenseCategory, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Precomputed P&L / summary rows: row key -> month -> amount
pub type RowTotals = BTreeMap<RowKey, MonthlyAmounts>;

// =============================================================================
// Snapshot
// =============================================================================

/// One endpoint response, canonicalized
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Precomputed grand total of sales, when the endpoint sends one
    pub total_sales: Option<f64>,
    /// Precomputed total expenses (used only for consistency checks)
    pub total_expenses: Option<f64>,
    pub total_revenue: Option<f64>,
    /// Opaque backend figure, never derived here
    pub cashout: Option<f64>,
    /// Sales per month: the first non-empty of `monthlySales`,
    /// `salesPerMonth` and `totalSalesPerMonth`
    pub monthly_sales: MonthlyAmounts,
    /// `totalSalesPerMonth` exactly as sent; the sales-vs-expenses comparison
    /// prefers it over `monthly_sales`
    pub monthly_total_sales: MonthlyAmounts,
    /// Per-month expense totals, when the endpoint sends them separately
    pub monthly_expenses: MonthlyAmounts,
    pub monthly_category_totals: MonthlyCategoryTotals,
    pub targets: Targets,
    pub pnl_data: RowTotals,
    pub summary_map: RowTotals,
}

/// Wire shape of the endpoint response; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSnapshot {
    total_sales: Option<Value>,
    total_expenses: Option<Value>,
    total_revenue: Option<Value>,
    cashout: Option<Value>,
    monthly_sales: Option<Map<String, Value>>,
    sales_per_month: Option<Map<String, Value>>,
    total_sales_per_month: Option<Map<String, Value>>,
    total_expenses_per_month: Option<Map<String, Value>>,
    monthly_category_totals: Option<Map<String, Value>>,
    targets: Option<Map<String, Value>>,
    pnl_data: Option<Map<String, Value>>,
    summary_map: Option<Map<String, Value>>,
}

impl DashboardSnapshot {
    /// Parse an endpoint response body
    pub fn from_json(body: &str) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(body)?;
        Ok(Self::from_raw(raw))
    }

    /// Parse an already-decoded JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let raw: RawSnapshot = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawSnapshot) -> Self {
        let monthly_total_sales = raw
            .total_sales_per_month
            .as_ref()
            .map(|map| parse_monthly_amounts(map, "totalSalesPerMonth"))
            .unwrap_or_default();

        // Variants name the sales map differently; first non-empty wins
        let monthly_sales = [raw.monthly_sales, raw.sales_per_month, raw.total_sales_per_month]
            .into_iter()
            .flatten()
            .find(|map| !map.is_empty())
            .map(|map| parse_monthly_amounts(&map, "monthlySales"))
            .unwrap_or_default();

        let snapshot = Self {
            total_sales: raw.total_sales.as_ref().map(|v| parse_amount(v, "totalSales")),
            total_expenses: raw.total_expenses.as_ref().map(|v| parse_amount(v, "totalExpenses")),
            total_revenue: raw.total_revenue.as_ref().map(|v| parse_amount(v, "totalRevenue")),
            cashout: raw.cashout.as_ref().map(|v| parse_amount(v, "cashout")),
            monthly_sales,
            monthly_total_sales,
            monthly_expenses: raw
                .total_expenses_per_month
                .map(|map| parse_monthly_amounts(&map, "totalExpensesPerMonth"))
                .unwrap_or_default(),
            monthly_category_totals: raw
                .monthly_category_totals
                .map(|map| parse_monthly_category_totals(&map))
                .unwrap_or_default(),
            targets: raw.targets.map(|map| parse_targets(&map)).unwrap_or_default(),
            pnl_data: raw
                .pnl_data
                .map(|map| parse_row_totals(&map, "pnlData"))
                .unwrap_or_default(),
            summary_map: raw
                .summary_map
                .map(|map| parse_row_totals(&map, "summaryMap"))
                .unwrap_or_default(),
        };

        debug!(
            sales_months = snapshot.monthly_sales.iter().count(),
            expense_months = snapshot.monthly_category_totals.months_present().len(),
            targets = !snapshot.targets.is_empty(),
            "parsed dashboard snapshot"
        );

        snapshot
    }
}

// =============================================================================
// Canonicalization helpers
// =============================================================================

/// Read a JSON amount leniently: numbers, numeric strings, null
fn parse_amount(value: &Value, field: &str) -> f64 {
    let amount = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::Null => 0.0,
        Value::String(s) => parse_amount_str(s).unwrap_or_else(|| {
            warn!(field, value = %s, "unparsable amount, using 0");
            0.0
        }),
        other => {
            warn!(field, value = %other, "non-numeric amount, using 0");
            0.0
        }
    };

    if amount.is_finite() { amount } else { 0.0 }
}

/// Spreadsheet-style amount string: "₱1,234.50", "(1,234)" for negatives
///
/// Blank strings are 0. None when the text holds no usable number.
fn parse_amount_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let (negative, body) = match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, trimmed),
    };

    // Thousands separators are followed by exactly three digits; anything
    // else ("1.234,50", "1,5") is a comma-decimal format
    let bad_grouping = body
        .split(',')
        .skip(1)
        .any(|group| group.chars().take_while(char::is_ascii_digit).count() != 3);
    if bad_grouping {
        return None;
    }

    // Strip currency symbols, thousands separators and whitespace
    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let amount: f64 = cleaned.parse().ok()?;
    Some(if negative { -amount } else { amount })
}

fn parse_month(raw: &str, field: &str) -> Option<MonthKey> {
    match raw.parse::<MonthKey>() {
        Ok(month) => Some(month),
        Err(_) => {
            warn!(field, key = raw, "dropping unrecognized month key");
            None
        }
    }
}

fn parse_monthly_amounts(map: &Map<String, Value>, field: &str) -> MonthlyAmounts {
    map.iter()
        .filter_map(|(key, value)| Some((parse_month(key, field)?, parse_amount(value, field))))
        .collect()
}

fn parse_monthly_category_totals(map: &Map<String, Value>) -> MonthlyCategoryTotals {
    let mut totals = MonthlyCategoryTotals::new();

    for (key, value) in map {
        let Some(month) = parse_month(key, "monthlyCategoryTotals") else {
            continue;
        };
        let Value::Object(categories) = value else {
            // A null month is just an empty month
            if !value.is_null() {
                warn!(month = %month, "category totals are not an object, skipping month");
            }
            continue;
        };
        // `{}` still marks the month as reported
        totals.touch_month(month);
        for (category, amount) in categories {
            totals.add(
                month,
                ExpenseCategory::from_key(category),
                parse_amount(amount, "monthlyCategoryTotals"),
            );
        }
    }

    totals
}

fn parse_targets(map: &Map<String, Value>) -> Targets {
    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (ExpenseCategory::from_key(key), parse_amount(value, "targets")))
        .collect()
}

fn parse_row_totals(map: &Map<String, Value>, field: &str) -> RowTotals {
    let mut rows = RowTotals::new();

    for (key, value) in map {
        let Value::Object(months) = value else {
            warn!(field, row = key.as_str(), "row is not a month object, skipping");
            continue;
        };
        let row = rows.entry(RowKey::parse(key)).or_default();
        for (month_key, amount) in months {
            if let Some(month) = parse_month(month_key, field) {
                row.add(month, parse_amount(amount, field));
            }
        }
    }

    rows
}
