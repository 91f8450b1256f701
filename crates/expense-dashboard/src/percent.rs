//! Expenses as a percent of sales, per category per month
//!
//! Every series has exactly one point per month on the axis. A category with
//! no amount in a month gets a 0% point rather than a gap.

use serde::Serialize;

use crate::category::ExpenseCategory;
use crate::format::round1;
use crate::kpi::percent_of;
use crate::month::{MonthKey, MonthSelector};
use crate::snapshot::{DashboardSnapshot, Targets};

/// One month of one category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PercentPoint {
    pub month: MonthKey,
    pub amount: f64,
    pub sales: f64,
    /// Full precision; round only for display
    pub percent: f64,
}

impl PercentPoint {
    /// Percent rounded to one decimal for labels
    pub fn display_percent(&self) -> f64 {
        round1(self.percent)
    }
}

/// One bar series on the percent-of-sales chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentSeries {
    pub category: ExpenseCategory,
    pub label: String,
    pub points: Vec<PercentPoint>,
}

impl PercentSeries {
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.percent).collect()
    }

    pub fn display_values(&self) -> Vec<f64> {
        self.points.iter().map(PercentPoint::display_percent).collect()
    }
}

/// Dashed target reference line for a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetLine {
    pub category: ExpenseCategory,
    pub label: String,
    pub percent: f64,
    /// The target repeated once per month on the axis
    pub values: Vec<f64>,
}

/// Months shown on the chart axis
///
/// The whole year shows only months that have category data; a single month
/// shows just that month.
pub fn month_axis(snapshot: &DashboardSnapshot, selector: MonthSelector) -> Vec<MonthKey> {
    match selector {
        MonthSelector::All => snapshot.monthly_category_totals.months_present(),
        MonthSelector::Month(month) => vec![month],
    }
}

/// Percent-of-sales series for each requested category, in the order given
pub fn percent_of_sales(
    snapshot: &DashboardSnapshot,
    categories: &[ExpenseCategory],
    selector: MonthSelector,
) -> Vec<PercentSeries> {
    let months = month_axis(snapshot, selector);

    categories
        .iter()
        .map(|category| PercentSeries {
            category: category.clone(),
            label: category.label().to_string(),
            points: months
                .iter()
                .map(|&month| {
                    let amount = snapshot.monthly_category_totals.month(month).get(category);
                    let sales = snapshot.monthly_sales.get(month);
                    PercentPoint {
                        month,
                        amount,
                        sales,
                        percent: percent_of(amount, sales),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Target lines for the requested categories that have a target
pub fn target_lines(
    targets: &Targets,
    categories: &[ExpenseCategory],
    axis_len: usize,
) -> Vec<TargetLine> {
    categories
        .iter()
        .filter_map(|category| {
            let percent = targets.get(category)?;
            Some(TargetLine {
                category: category.clone(),
                label: format!("{} Target ({}%)", category.label(), percent),
                percent,
                values: vec![percent; axis_len],
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot::from_value(json!({
            "monthlySales": { "january": 1000, "february": 0, "march": 3000 },
            "monthlyCategoryTotals": {
                "march": { "laborexpense": 1000 },
                "january": { "cogs": 200, "laborexpense": 300 },
                "february": { "cogs": 50 }
            },
            "targets": { "laborexpense": 30, "cogs": 32.5 }
        }))
        .unwrap()
    }

    #[test]
    fn test_january_percentages() {
        let series = percent_of_sales(
            &snapshot(),
            &[ExpenseCategory::Cogs, ExpenseCategory::LaborExpense],
            MonthSelector::Month(MonthKey::January),
        );
        assert_eq!(series[0].values(), vec![20.0]);
        assert_eq!(series[1].values(), vec![30.0]);
        assert_eq!(series[1].label, "Labor");
    }

    #[test]
    fn test_series_align_with_month_axis() {
        let snapshot = snapshot();
        let series = percent_of_sales(
            &snapshot,
            &[ExpenseCategory::Cogs, ExpenseCategory::Misc],
            MonthSelector::All,
        );
        let axis = month_axis(&snapshot, MonthSelector::All);
        assert_eq!(axis, vec![MonthKey::January, MonthKey::February, MonthKey::March]);

        for s in &series {
            assert_eq!(s.points.len(), axis.len());
        }
        // Misc never appears but still has a zero point per month
        assert_eq!(series[1].values(), vec![0.0, 0.0, 0.0]);
        // February has zero sales: guarded to 0 instead of infinity
        assert_eq!(series[0].points[1].amount, 50.0);
        assert_eq!(series[0].points[1].percent, 0.0);
    }

    #[test]
    fn test_display_rounding_keeps_precision() {
        let series = percent_of_sales(
            &snapshot(),
            &[ExpenseCategory::LaborExpense],
            MonthSelector::Month(MonthKey::March),
        );
        let point = series[0].points[0];
        assert!((point.percent - 33.333_333).abs() < 1e-5);
        assert_eq!(point.display_percent(), 33.3);
        assert_eq!(series[0].display_values(), vec![33.3]);
    }

    #[test]
    fn test_target_lines() {
        let snapshot = snapshot();
        let lines = target_lines(
            &snapshot.targets,
            &[ExpenseCategory::Cogs, ExpenseCategory::Misc, ExpenseCategory::LaborExpense],
            3,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].label, "COGS Target (32.5%)");
        assert_eq!(lines[1].label, "Labor Target (30%)");
        assert_eq!(lines[1].values, vec![30.0; 3]);
    }

    #[test]
    fn test_empty_month_object_stays_on_axis() {
        let snapshot = DashboardSnapshot::from_value(json!({
            "monthlySales": { "january": 1000, "february": 500 },
            "monthlyCategoryTotals": {
                "january": { "cogs": 200 },
                "february": {},
                "march": null
            }
        }))
        .unwrap();
        let axis = month_axis(&snapshot, MonthSelector::All);
        assert_eq!(axis, vec![MonthKey::January, MonthKey::February]);

        let series = percent_of_sales(&snapshot, &[ExpenseCategory::Cogs], MonthSelector::All);
        assert_eq!(series[0].values(), vec![20.0, 0.0]);
    }
}
