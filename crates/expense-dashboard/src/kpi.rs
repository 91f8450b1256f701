//! Headline KPIs: sales, expenses, revenue, cashout

use serde::Serialize;
use tracing::debug;

use crate::month::{MonthKey, MonthSelector};
use crate::snapshot::DashboardSnapshot;

/// Difference below which reported and computed totals are considered equal
const CONSISTENCY_TOLERANCE: f64 = 0.005;

/// KPI tiles for one month selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSnapshot {
    pub total_sales: f64,
    pub total_expenses: f64,
    /// Sales minus expenses; negative when expenses exceed sales
    pub revenue: f64,
    /// Passed through from the endpoint untouched
    pub cashout: Option<f64>,
}

impl KpiSnapshot {
    /// Expenses as a percent of sales
    pub fn expense_ratio(&self) -> f64 {
        percent_of(self.total_expenses, self.total_sales)
    }

    /// Revenue as a percent of sales
    pub fn margin(&self) -> f64 {
        percent_of(self.revenue, self.total_sales)
    }
}

/// `amount` as a percent of `sales`; 0 whenever sales are not positive
pub fn percent_of(amount: f64, sales: f64) -> f64 {
    if sales > 0.0 {
        let percent = amount / sales * 100.0;
        if percent.is_finite() { percent } else { 0.0 }
    } else {
        0.0
    }
}

pub fn revenue(sales: f64, expenses: f64) -> f64 {
    sales - expenses
}

/// Compute the KPI tiles for a month selection
///
/// For the whole year, sales come from the endpoint's precomputed grand total
/// when present. Expenses are always summed from the category totals.
pub fn compute_kpis(snapshot: &DashboardSnapshot, selector: MonthSelector) -> KpiSnapshot {
    let (total_sales, total_expenses) = match selector {
        MonthSelector::All => (
            snapshot
                .total_sales
                .unwrap_or_else(|| snapshot.monthly_sales.total()),
            snapshot.monthly_category_totals.grand_total(),
        ),
        MonthSelector::Month(month) => (
            snapshot.monthly_sales.get(month),
            snapshot.monthly_category_totals.month_total(month),
        ),
    };

    let kpis = KpiSnapshot {
        total_sales,
        total_expenses,
        revenue: revenue(total_sales, total_expenses),
        cashout: snapshot.cashout,
    };
    debug!(%selector, ?kpis, "computed KPIs");
    kpis
}

/// One bar pair on the sales-vs-expenses chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyComparison {
    pub month: MonthKey,
    pub sales: f64,
    pub expenses: f64,
    pub net: f64,
}

/// Sales and expenses for every month with any activity, in calendar order
///
/// Sales come from `totalSalesPerMonth` when the endpoint sends it, otherwise
/// the merged monthly sales. Expenses use the endpoint's per-month totals when
/// present, otherwise the sum of each month's categories.
pub fn sales_vs_expenses(snapshot: &DashboardSnapshot) -> Vec<MonthlyComparison> {
    let monthly_sales = if snapshot.monthly_total_sales.is_empty() {
        &snapshot.monthly_sales
    } else {
        &snapshot.monthly_total_sales
    };

    MonthKey::ALL
        .into_iter()
        .map(|month| {
            let sales = monthly_sales.get(month);
            let expenses = monthly_expense_total(snapshot, month);
            MonthlyComparison {
                month,
                sales,
                expenses,
                net: revenue(sales, expenses),
            }
        })
        .filter(|row| row.sales > 0.0 || row.expenses > 0.0)
        .collect()
}

/// Total expenses for one month
pub fn monthly_expense_total(snapshot: &DashboardSnapshot, month: MonthKey) -> f64 {
    if snapshot.monthly_expenses.is_empty() {
        snapshot.monthly_category_totals.month_total(month)
    } else {
        snapshot.monthly_expenses.get(month)
    }
}

/// Reported vs computed total expenses
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseConsistency {
    pub reported: f64,
    pub computed: f64,
}

impl ExpenseConsistency {
    pub fn difference(&self) -> f64 {
        self.reported - self.computed
    }

    pub fn is_consistent(&self) -> bool {
        self.difference().abs() < CONSISTENCY_TOLERANCE
    }
}

/// Compare the endpoint's `totalExpenses` with the sum of its categories
///
/// None when either side is missing.
pub fn expense_consistency(snapshot: &DashboardSnapshot) -> Option<ExpenseConsistency> {
    let reported = snapshot.total_expenses?;
    if snapshot.monthly_category_totals.is_empty() {
        return None;
    }
    Some(ExpenseConsistency {
        reported,
        computed: snapshot.monthly_category_totals.grand_total(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn january_snapshot() -> DashboardSnapshot {
        DashboardSnapshot::from_value(json!({
            "monthlySales": { "january": 1000 },
            "monthlyCategoryTotals": {
                "january": { "cogs": 200, "laborexpense": 300 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_single_month_kpis() {
        let snapshot = january_snapshot();
        let kpis = compute_kpis(&snapshot, MonthSelector::Month(MonthKey::January));
        assert_eq!(kpis.total_sales, 1000.0);
        assert_eq!(kpis.total_expenses, 500.0);
        assert_eq!(kpis.revenue, 500.0);
        assert_eq!(kpis.expense_ratio(), 50.0);
        assert_eq!(kpis.cashout, None);
    }

    #[test]
    fn test_missing_month_is_zero() {
        let snapshot = january_snapshot();
        let kpis = compute_kpis(&snapshot, MonthSelector::Month(MonthKey::June));
        assert_eq!(kpis.total_sales, 0.0);
        assert_eq!(kpis.total_expenses, 0.0);
        assert_eq!(kpis.revenue, 0.0);
        assert_eq!(kpis.expense_ratio(), 0.0);
    }

    #[test]
    fn test_all_months_prefers_precomputed_sales() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "totalSales": 5000,
            "cashout": 1200,
            "monthlySales": { "january": 1000, "february": 2000 },
            "monthlyCategoryTotals": {
                "january": { "cogs": 100 },
                "february": { "misc": 50, "fixedexpense": 25 }
            }
        }))
        .unwrap();

        let kpis = compute_kpis(&snapshot, MonthSelector::All);
        assert_eq!(kpis.total_sales, 5000.0);
        assert_eq!(kpis.total_expenses, 175.0);
        assert_eq!(kpis.revenue, 4825.0);
        assert_eq!(kpis.cashout, Some(1200.0));
    }

    #[test]
    fn test_all_months_sums_sales_without_total() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "monthlySales": { "january": 1000, "february": 2000 }
        }))
        .unwrap();
        assert_eq!(compute_kpis(&snapshot, MonthSelector::All).total_sales, 3000.0);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = DashboardSnapshot::from_value(json!({ "totalSales": 750 })).unwrap();
        let kpis = compute_kpis(&snapshot, MonthSelector::All);
        assert_eq!(kpis.total_expenses, 0.0);
        assert_eq!(kpis.revenue, kpis.total_sales);
    }

    #[test]
    fn test_monthly_expenses_match_category_sums() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "monthlyCategoryTotals": {
                "march": { "cogs": 12.5, "misc": 7.5, "rent": 30 },
                "april": { "laborexpense": 99 }
            }
        }))
        .unwrap();

        for month in snapshot.monthly_category_totals.months_present() {
            let summed: f64 = snapshot
                .monthly_category_totals
                .month(month)
                .iter()
                .map(|(_, amount)| amount)
                .sum();
            let kpis = compute_kpis(&snapshot, MonthSelector::Month(month));
            assert_eq!(kpis.total_expenses, summed);
        }
    }

    #[test]
    fn test_percent_of_guards_division() {
        assert_eq!(percent_of(200.0, 1000.0), 20.0);
        assert_eq!(percent_of(200.0, 0.0), 0.0);
        assert_eq!(percent_of(200.0, -50.0), 0.0);
        assert_eq!(percent_of(f64::INFINITY, 10.0), 0.0);
        assert!(percent_of(123.0, 0.0).is_finite());
    }

    #[test]
    fn test_revenue_can_be_negative() {
        assert_eq!(revenue(100.0, 250.0), -150.0);
        assert_eq!(revenue(250.0, 100.0), 150.0);
    }

    #[test]
    fn test_sales_vs_expenses_skips_idle_months() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "monthlySales": { "march": 300, "january": 100 },
            "monthlyCategoryTotals": {
                "february": { "cogs": 40 },
                "march": { "cogs": 60 }
            }
        }))
        .unwrap();

        let rows = sales_vs_expenses(&snapshot);
        let months: Vec<_> = rows.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![MonthKey::January, MonthKey::February, MonthKey::March]);
        assert_eq!(rows[1].sales, 0.0);
        assert_eq!(rows[1].net, -40.0);
        assert_eq!(rows[2].net, 240.0);
    }

    #[test]
    fn test_sales_vs_expenses_prefers_reported_monthly_expenses() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "totalSalesPerMonth": { "may": 500 },
            "totalExpensesPerMonth": { "may": 125 },
            "monthlyCategoryTotals": { "may": { "cogs": 100 } }
        }))
        .unwrap();
        let rows = sales_vs_expenses(&snapshot);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].expenses, 125.0);
    }

    #[test]
    fn test_expense_consistency() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "totalExpenses": 510,
            "monthlyCategoryTotals": { "january": { "cogs": 200, "laborexpense": 300 } }
        }))
        .unwrap();
        let check = expense_consistency(&snapshot).unwrap();
        assert_eq!(check.difference(), 10.0);
        assert!(!check.is_consistent());

        assert!(expense_consistency(&january_snapshot()).is_none());
    }

    #[test]
    fn test_sales_vs_expenses_uses_total_sales_per_month() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "salesPerMonth": { "january": 800 },
            "totalSalesPerMonth": { "january": 1000, "february": 900 },
            "monthlyCategoryTotals": { "january": { "cogs": 200 } }
        }))
        .unwrap();
        let rows = sales_vs_expenses(&snapshot);
        let months: Vec<_> = rows.iter().map(|r| r.month).collect();
        assert_eq!(months, vec![MonthKey::January, MonthKey::February]);
        assert_eq!(rows[0].sales, 1000.0);
        assert_eq!(rows[0].net, 800.0);
        assert_eq!(rows[1].sales, 900.0);

        // Percent-of-sales figures keep reading salesPerMonth
        assert_eq!(snapshot.monthly_sales.get(MonthKey::January), 800.0);
    }

    #[test]
    fn test_missing_month_kpis_serialize_as_positive_zero() {
        let kpis = compute_kpis(&january_snapshot(), MonthSelector::Month(MonthKey::May));
        let json = serde_json::to_string(&kpis).unwrap();
        assert_eq!(
            json,
            r#"{"totalSales":0.0,"totalExpenses":0.0,"revenue":0.0,"cashout":null}"#
        );

        let empty = compute_kpis(&DashboardSnapshot::default(), MonthSelector::All);
        let json = serde_json::to_string(&empty).unwrap();
        assert!(!json.contains("-0.0"), "{json}");
    }
}
