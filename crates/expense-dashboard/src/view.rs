//! Filtered view over one snapshot
//!
//! Bundles the snapshot with the current year/month/category filter so callers
//! pass one value around instead of keeping a global "current data".

use serde::Serialize;

use crate::category::ExpenseCategory;
use crate::commentary::{self, TopCategory};
use crate::format::CurrencyFormat;
use crate::kpi::{self, KpiSnapshot, MonthlyComparison};
use crate::month::{MonthKey, MonthSelector};
use crate::percent::{self, PercentSeries, TargetLine};
use crate::pnl::{self, PnlTable};
use crate::snapshot::{DashboardSnapshot, Targets};

/// Snapshot plus filter
pub struct DashboardView<'a> {
    snapshot: &'a DashboardSnapshot,
    selector: MonthSelector,
    categories: Vec<ExpenseCategory>,
    targets: Targets,
}

impl<'a> DashboardView<'a> {
    /// View over a snapshot with the default charted categories
    pub fn new(snapshot: &'a DashboardSnapshot, selector: MonthSelector) -> Self {
        Self {
            snapshot,
            selector,
            categories: ExpenseCategory::CHARTED.to_vec(),
            targets: snapshot.targets.clone(),
        }
    }

    /// Restrict charts to these categories (empty keeps the current set)
    pub fn with_categories(mut self, categories: Vec<ExpenseCategory>) -> Self {
        if !categories.is_empty() {
            self.categories = categories;
        }
        self
    }

    /// Overlay local target overrides on the snapshot's targets
    pub fn with_target_overrides(mut self, overrides: &Targets) -> Self {
        self.targets = self.snapshot.targets.merged_with(overrides);
        self
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        self.snapshot
    }

    pub fn selector(&self) -> MonthSelector {
        self.selector
    }

    pub fn categories(&self) -> &[ExpenseCategory] {
        &self.categories
    }

    pub fn kpis(&self) -> KpiSnapshot {
        kpi::compute_kpis(self.snapshot, self.selector)
    }

    pub fn month_axis(&self) -> Vec<MonthKey> {
        percent::month_axis(self.snapshot, self.selector)
    }

    pub fn percent_series(&self) -> Vec<PercentSeries> {
        percent::percent_of_sales(self.snapshot, &self.categories, self.selector)
    }

    pub fn target_lines(&self) -> Vec<TargetLine> {
        percent::target_lines(&self.targets, &self.categories, self.month_axis().len())
    }

    pub fn top_category(&self) -> TopCategory {
        commentary::top_category_for(self.snapshot, self.selector)
    }

    pub fn commentary(&self, currency: &CurrencyFormat) -> String {
        commentary::commentary(self.snapshot, self.selector, currency)
    }

    pub fn sales_vs_expenses(&self) -> Vec<MonthlyComparison> {
        kpi::sales_vs_expenses(self.snapshot)
            .into_iter()
            .filter(|row| self.selector.contains(row.month))
            .collect()
    }

    pub fn profit_and_loss(&self, show_total: bool) -> PnlTable {
        pnl::profit_and_loss(self.snapshot, self.selector, show_total)
    }

    /// Summary table from `summaryMap`, or category totals when it is absent
    pub fn summary_table(&self, show_total: bool) -> PnlTable {
        if self.snapshot.summary_map.is_empty() {
            pnl::category_table(&self.snapshot.monthly_category_totals, self.selector, show_total)
        } else {
            pnl::rows_table(&self.snapshot.summary_map, self.selector, show_total)
        }
    }

    /// Everything the dashboard shows, as one serializable value
    pub fn report(&self, currency: &CurrencyFormat, show_total: bool) -> DashboardReport {
        DashboardReport {
            selector: self.selector,
            kpis: self.kpis(),
            top_category: self.top_category(),
            commentary: self.commentary(currency),
            month_axis: self.month_axis(),
            percent_series: self.percent_series(),
            target_lines: self.target_lines(),
            sales_vs_expenses: self.sales_vs_expenses(),
            profit_and_loss: self.profit_and_loss(show_total),
        }
    }
}

/// Serializable bundle of every derived view
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub selector: MonthSelector,
    pub kpis: KpiSnapshot,
    pub top_category: TopCategory,
    pub commentary: String,
    pub month_axis: Vec<MonthKey>,
    pub percent_series: Vec<PercentSeries>,
    pub target_lines: Vec<TargetLine>,
    pub sales_vs_expenses: Vec<MonthlyComparison>,
    pub profit_and_loss: PnlTable,
}
