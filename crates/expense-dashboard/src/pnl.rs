//! P&L and summary tables (category x month pivot)
//!
//! Tables hold raw amounts. Columns always follow calendar order and rows
//! follow canonical category order, so two fetches of the same data render
//! identically. Formatting, including blank zero cells, happens in
//! [`PnlTable::render`].

use serde::Serialize;

use crate::category::RowKey;
use crate::format::CurrencyFormat;
use crate::month::{MonthKey, MonthSelector};
use crate::snapshot::{
    DashboardSnapshot, MonthlyAmounts, MonthlyCategoryTotals, RowTotals, sum_amounts,
};

/// Row key in `pnlData` that carries sales rather than an expense
pub const SALES_ROW_KEY: &str = "sales";

/// What a row represents in the statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Sales,
    Expense,
    TotalExpenses,
    NetIncome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlRow {
    pub key: String,
    pub label: String,
    pub kind: RowKind,
    /// One amount per table month, same order as [`PnlTable::months`]
    pub amounts: Vec<f64>,
    pub total: f64,
}

impl PnlRow {
    fn new(key: String, label: String, kind: RowKind, amounts: Vec<f64>) -> Self {
        let total = sum_amounts(amounts.iter().copied());
        Self {
            key,
            label,
            kind,
            amounts,
            total,
        }
    }

    fn from_monthly(
        key: String,
        label: String,
        kind: RowKind,
        monthly: &MonthlyAmounts,
        months: &[MonthKey],
    ) -> Self {
        let amounts = months.iter().map(|&month| monthly.get(month)).collect();
        Self::new(key, label, kind, amounts)
    }

    /// Amount for a month column, 0 when the month is not in the table
    pub fn amount(&self, months: &[MonthKey], month: MonthKey) -> f64 {
        months
            .iter()
            .position(|&m| m == month)
            .and_then(|idx| self.amounts.get(idx))
            .copied()
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PnlTable {
    pub months: Vec<MonthKey>,
    pub rows: Vec<PnlRow>,
    pub show_total: bool,
}

impl PnlTable {
    fn new(selector: MonthSelector, show_total: bool) -> Self {
        Self {
            months: selector.months(),
            rows: Vec::new(),
            show_total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, key: &str) -> Option<&PnlRow> {
        self.rows.iter().find(|row| row.key == key)
    }

    /// Header line: "Category", month labels, optional "Total"
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["Category".to_string()];
        header.extend(self.months.iter().map(|m| m.label().to_string()));
        if self.show_total {
            header.push("Total".to_string());
        }
        header
    }

    /// Formatted body rows; zero cells render as empty strings
    pub fn render(&self, currency: &CurrencyFormat) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.label.clone()];
                cells.extend(row.amounts.iter().map(|&amount| currency.cell(amount)));
                if self.show_total {
                    cells.push(currency.cell(row.total));
                }
                cells
            })
            .collect()
    }
}

/// One row per expense category from the monthly category totals
pub fn category_table(
    totals: &MonthlyCategoryTotals,
    selector: MonthSelector,
    show_total: bool,
) -> PnlTable {
    let mut table = PnlTable::new(selector, show_total);
    table.rows = expense_rows_from_totals(totals, &table.months);
    table
}

/// One row per key of a precomputed `pnlData` / `summaryMap` structure
pub fn rows_table(rows: &RowTotals, selector: MonthSelector, show_total: bool) -> PnlTable {
    let mut table = PnlTable::new(selector, show_total);
    table.rows = rows
        .iter()
        .map(|(key, monthly)| {
            PnlRow::from_monthly(key.key(), key.label(), RowKind::Expense, monthly, &table.months)
        })
        .collect();
    table
}

/// Full statement: Sales, each expense line, Total Expenses, Net Income
///
/// Every `pnlData` row under the sales category (including "sales|dine-in"
/// style splits) is summed into the Sales line; without any, sales come from
/// the monthly sales map. Expense lines come from the remaining `pnlData` rows
/// (keeping any subcategory split), or from the monthly category totals when
/// `pnlData` carries no expense rows.
pub fn profit_and_loss(
    snapshot: &DashboardSnapshot,
    selector: MonthSelector,
    show_total: bool,
) -> PnlTable {
    let mut table = PnlTable::new(selector, show_total);
    let months = table.months.clone();

    let (sales_rows, expense_rows): (Vec<_>, Vec<_>) =
        snapshot.pnl_data.iter().partition(|(key, _)| is_sales_row(key));

    let sales_monthly = if sales_rows.is_empty() {
        snapshot.monthly_sales.clone()
    } else {
        sales_rows
            .iter()
            .flat_map(|(_, monthly)| monthly.iter())
            .collect()
    };

    let expense_rows: Vec<PnlRow> = if expense_rows.is_empty() {
        expense_rows_from_totals(&snapshot.monthly_category_totals, &months)
    } else {
        expense_rows
            .into_iter()
            .map(|(key, monthly)| {
                PnlRow::from_monthly(key.key(), key.label(), RowKind::Expense, monthly, &months)
            })
            .collect()
    };

    if sales_monthly.is_empty() && expense_rows.is_empty() {
        return table;
    }

    let sales = PnlRow::from_monthly(
        SALES_ROW_KEY.to_string(),
        "Sales".to_string(),
        RowKind::Sales,
        &sales_monthly,
        &months,
    );

    let total_expenses: Vec<f64> = (0..months.len())
        .map(|idx| sum_amounts(expense_rows.iter().map(|row| row.amounts[idx])))
        .collect();
    let net_income: Vec<f64> = sales
        .amounts
        .iter()
        .zip(&total_expenses)
        .map(|(sales, expenses)| sales - expenses)
        .collect();

    table.rows.push(sales);
    table.rows.extend(expense_rows);
    table.rows.push(PnlRow::new(
        "totalExpenses".to_string(),
        "Total Expenses".to_string(),
        RowKind::TotalExpenses,
        total_expenses,
    ));
    table.rows.push(PnlRow::new(
        "netIncome".to_string(),
        "Net Income".to_string(),
        RowKind::NetIncome,
        net_income,
    ));
    table
}

/// Sales rows in `pnlData`, with or without a subcategory
fn is_sales_row(key: &RowKey) -> bool {
    key.category.key() == SALES_ROW_KEY
}

fn expense_rows_from_totals(totals: &MonthlyCategoryTotals, months: &[MonthKey]) -> Vec<PnlRow> {
    totals
        .categories()
        .into_iter()
        .map(|category| {
            let amounts = months
                .iter()
                .map(|&month| totals.month(month).get(&category))
                .collect();
            PnlRow::new(
                category.key().to_string(),
                category.label().to_string(),
                RowKind::Expense,
                amounts,
            )
        })
        .collect()
}
