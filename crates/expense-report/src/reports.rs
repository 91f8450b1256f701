//! Report generation (CSV outputs and console tables)

use anyhow::Result;
use csv::Writer;
use expense_dashboard::format::{normalize_zero, percent};
use expense_dashboard::{CurrencyFormat, DashboardView, MonthKey, PercentSeries, PnlTable, TargetLine, percent_of};
use std::io::Write;
use std::path::Path;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tracing::info;

use crate::constants;

/// Bundled report inputs to reduce function argument counts
pub struct ReportData<'a> {
    pub view: &'a DashboardView<'a>,
    pub currency: &'a CurrencyFormat,
    pub year: i32,
    pub show_total: bool,
}

// =============================================================================
// CSV reports
// =============================================================================

/// Generate all CSV reports
pub fn generate_all_reports(output_dir: &Path, data: &ReportData) -> Result<()> {
    let path = output_dir.join(constants::SUMMARY_FILENAME);
    write_summary_csv(Writer::from_path(&path)?, data.view)?;
    report_generated(&path);

    let path = output_dir.join(constants::PNL_FILENAME);
    write_table_csv(Writer::from_path(&path)?, &data.view.profit_and_loss(data.show_total))?;
    report_generated(&path);

    let path = output_dir.join(constants::CATEGORY_SUMMARY_FILENAME);
    write_table_csv(Writer::from_path(&path)?, &data.view.summary_table(data.show_total))?;
    report_generated(&path);

    let path = output_dir.join(constants::PERCENT_OF_SALES_FILENAME);
    write_percent_csv(
        Writer::from_path(&path)?,
        &data.view.month_axis(),
        &data.view.percent_series(),
    )?;
    report_generated(&path);

    Ok(())
}

fn report_generated(path: &Path) {
    info!(path = %path.display(), "wrote report");
    println!("  Generated: {}", path.display());
}

/// summary.csv: sales vs expenses per month with a TOTAL row
pub fn write_summary_csv<W: Write>(mut wtr: Writer<W>, view: &DashboardView) -> Result<()> {
    wtr.write_record(["Month", "Sales", "Expenses", "Net", "Expense_Pct"])?;

    let rows = view.sales_vs_expenses();
    let mut total_sales = 0.0;
    let mut total_expenses = 0.0;

    for row in &rows {
        total_sales += row.sales;
        total_expenses += row.expenses;

        wtr.write_record([
            row.month.name(),
            &format!("{:.2}", row.sales),
            &format!("{:.2}", row.expenses),
            &format!("{:.2}", normalize_zero(row.net)),
            &format!("{:.1}", percent_of(row.expenses, row.sales)),
        ])?;
    }

    wtr.write_record([
        "TOTAL",
        &format!("{:.2}", total_sales),
        &format!("{:.2}", total_expenses),
        &format!("{:.2}", normalize_zero(total_sales - total_expenses)),
        &format!("{:.1}", percent_of(total_expenses, total_sales)),
    ])?;

    wtr.flush()?;
    Ok(())
}

/// P&L or category table with raw amounts (zero stays "0.00" in CSV)
pub fn write_table_csv<W: Write>(mut wtr: Writer<W>, table: &PnlTable) -> Result<()> {
    wtr.write_record(table.header())?;

    for row in &table.rows {
        let mut record = vec![row.label.clone()];
        record.extend(row.amounts.iter().map(|a| format!("{:.2}", normalize_zero(*a))));
        if table.show_total {
            record.push(format!("{:.2}", normalize_zero(row.total)));
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// percent_of_sales.csv: one row per category, one column per month
pub fn write_percent_csv<W: Write>(
    mut wtr: Writer<W>,
    months: &[MonthKey],
    series: &[PercentSeries],
) -> Result<()> {
    let mut header = vec!["Category".to_string()];
    header.extend(months.iter().map(|m| m.label().to_string()));
    wtr.write_record(&header)?;

    for s in series {
        let mut record = vec![s.label.clone()];
        record.extend(s.points.iter().map(|p| format!("{:.1}", p.display_percent())));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

// =============================================================================
// Console output
// =============================================================================

/// Render a header + rows as a console table, amounts right-aligned
pub fn render_table(header: Vec<String>, rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header);
    for row in rows {
        builder.push_record(row);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));
    table.to_string()
}

/// KPI tile labels and formatted values
pub fn kpi_lines(view: &DashboardView, currency: &CurrencyFormat) -> Vec<(&'static str, String)> {
    let kpis = view.kpis();
    let mut lines = vec![
        ("Total Sales", currency.amount(kpis.total_sales)),
        ("Total Expenses", currency.amount(kpis.total_expenses)),
        ("Revenue", currency.amount(kpis.revenue)),
        ("Expense Ratio", percent(kpis.expense_ratio())),
    ];
    if let Some(cashout) = kpis.cashout {
        lines.push(("Cashout", currency.amount(cashout)));
    }
    lines
}

/// Percent-of-sales table with a target column
pub fn percent_rows(
    series: &[PercentSeries],
    targets: &[TargetLine],
) -> Vec<Vec<String>> {
    series
        .iter()
        .map(|s| {
            let mut row = vec![s.label.clone()];
            row.extend(s.points.iter().map(|p| percent(p.percent)));
            let target = targets
                .iter()
                .find(|t| t.category == s.category)
                .map(|t| percent(t.percent))
                .unwrap_or_default();
            row.push(target);
            row
        })
        .collect()
}

pub fn print_kpis(view: &DashboardView, currency: &CurrencyFormat) {
    for (label, value) in kpi_lines(view, currency) {
        println!("  {:<18}{:>18}", format!("{}:", label), value);
    }
}

pub fn print_percent_table(view: &DashboardView) {
    let months = view.month_axis();
    if months.is_empty() {
        println!("No category data for {}.", view.selector());
        return;
    }

    let mut header = vec!["Category".to_string()];
    header.extend(months.iter().map(|m| m.label().to_string()));
    header.push("Target".to_string());

    println!("EXPENSES AS % OF SALES:");
    println!(
        "{}",
        render_table(header, percent_rows(&view.percent_series(), &view.target_lines()))
    );
}

pub fn print_pnl_table(title: &str, table: &PnlTable, currency: &CurrencyFormat) {
    if table.is_empty() {
        println!("{}: no data.", title);
        return;
    }
    println!("{}:", title);
    println!("{}", render_table(table.header(), table.render(currency)));
}

/// Print summary to console
pub fn print_summary(data: &ReportData) {
    let view = data.view;

    println!("\n============================================================");
    println!(
        "          FINANCIAL SUMMARY ({}, {})",
        data.year,
        if view.selector().is_all() {
            "all months".to_string()
        } else {
            view.selector().to_string()
        }
    );
    println!(
        "          Generated {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M")
    );
    println!("============================================================\n");

    println!("SALES & EXPENSES:");
    print_kpis(view, data.currency);

    println!("\nCOMMENTARY:");
    println!("  {}\n", view.commentary(data.currency));

    print_percent_table(view);
    println!();
    print_pnl_table("PROFIT & LOSS", &view.profit_and_loss(data.show_total), data.currency);

    println!("============================================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use expense_dashboard::{DashboardSnapshot, MonthSelector};
    use serde_json::json;

    fn snapshot() -> DashboardSnapshot {
        DashboardSnapshot::from_value(json!({
            "cashout": 420,
            "monthlySales": { "january": 1000, "february": 0 },
            "monthlyCategoryTotals": {
                "january": { "cogs": 200, "laborexpense": 300 },
                "february": { "misc": 50 }
            },
            "targets": { "laborexpense": 30 }
        }))
        .unwrap()
    }

    fn csv_string<F>(write: F) -> String
    where
        F: FnOnce(Writer<&mut Vec<u8>>) -> Result<()>,
    {
        let mut buf = Vec::new();
        write(Writer::from_writer(&mut buf)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_summary_csv() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot, MonthSelector::All);
        let out = csv_string(|w| write_summary_csv(w, &view));
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "Month,Sales,Expenses,Net,Expense_Pct");
        assert_eq!(lines[1], "january,1000.00,500.00,500.00,50.0");
        assert_eq!(lines[2], "february,0.00,50.00,-50.00,0.0");
        assert_eq!(lines[3], "TOTAL,1000.00,550.00,450.00,55.0");
    }

    #[test]
    fn test_table_csv_keeps_zeros() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot, MonthSelector::Month(MonthKey::February));
        let out = csv_string(|w| write_table_csv(w, &view.profit_and_loss(true)));
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "Category,February,Total");
        assert_eq!(lines[1], "Sales,0.00,0.00");
        assert_eq!(lines.last().copied(), Some("Net Income,-50.00,-50.00"));
    }

    #[test]
    fn test_percent_csv() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot, MonthSelector::All);
        let out = csv_string(|w| write_percent_csv(w, &view.month_axis(), &view.percent_series()));
        let lines: Vec<_> = out.lines().collect();

        assert_eq!(lines[0], "Category,January,February");
        assert!(lines.contains(&"Labor,30.0,0.0"));
        assert!(lines.contains(&"Misc,0.0,0.0"));
    }

    #[test]
    fn test_kpi_lines_include_cashout() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot, MonthSelector::Month(MonthKey::January));
        let lines = kpi_lines(&view, &CurrencyFormat::default());
        assert_eq!(lines[0], ("Total Sales", "₱1,000.00".to_string()));
        assert_eq!(lines[2], ("Revenue", "₱500.00".to_string()));
        assert_eq!(lines[3], ("Expense Ratio", "50.0%".to_string()));
        assert_eq!(lines[4], ("Cashout", "₱420.00".to_string()));
    }

    #[test]
    fn test_percent_rows_with_targets() {
        let snapshot = snapshot();
        let view = DashboardView::new(&snapshot, MonthSelector::Month(MonthKey::January));
        let rows = percent_rows(&view.percent_series(), &view.target_lines());
        let labor = rows.iter().find(|r| r[0] == "Labor").unwrap();
        assert_eq!(labor, &vec!["Labor".to_string(), "30.0%".to_string(), "30.0%".to_string()]);
        let misc = rows.iter().find(|r| r[0] == "Misc").unwrap();
        assert_eq!(misc[2], "");
    }

    #[test]
    fn test_render_table_contains_cells() {
        let rendered = render_table(
            vec!["Category".to_string(), "January".to_string()],
            vec![vec!["Sales".to_string(), "₱1,000.00".to_string()]],
        );
        assert!(rendered.contains("Category"));
        assert!(rendered.contains("₱1,000.00"));
    }
}
