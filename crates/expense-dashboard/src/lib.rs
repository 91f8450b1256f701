//! Sales and expense aggregation for the finance dashboards
//!
//! Takes one snapshot from the spreadsheet-backed dashboard endpoint and
//! derives everything the dashboards display: KPI tiles, expenses as a
//! percent of sales, the top cost category, and P&L tables.
//!
//! Every function here is a pure function of its inputs. Missing months and
//! categories count as zero and percentages over zero sales are zero, so
//! nothing fails on incomplete data; only malformed JSON is an error.

pub mod category;
pub mod commentary;
pub mod error;
pub mod format;
pub mod kpi;
pub mod month;
pub mod percent;
pub mod pnl;
pub mod snapshot;
pub mod view;

pub use category::{ExpenseCategory, RowKey, SUBCATEGORY_SEPARATOR};
pub use commentary::{TopCategory, VARIOUS_CATEGORIES};
pub use error::{DashboardError, Result};
pub use format::CurrencyFormat;
pub use kpi::{KpiSnapshot, MonthlyComparison, percent_of, revenue};
pub use month::{MonthKey, MonthSelector};
pub use percent::{PercentPoint, PercentSeries, TargetLine};
pub use pnl::{PnlRow, PnlTable, RowKind};
pub use snapshot::{CategoryAmounts, DashboardSnapshot, MonthlyAmounts, MonthlyCategoryTotals, Targets};
pub use view::{DashboardReport, DashboardView};
