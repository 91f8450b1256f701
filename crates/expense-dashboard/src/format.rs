//! Currency, percent and label formatting
//!
//! Pure string transforms. Aggregation keeps full precision; rounding only
//! happens here.

use serde::{Deserialize, Serialize};

/// Philippine peso, the dashboards' default currency
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₱";
pub const DEFAULT_CURRENCY_CODE: &str = "PHP";

/// Currency display settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub code: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            code: DEFAULT_CURRENCY_CODE.to_string(),
        }
    }
}

impl CurrencyFormat {
    pub fn new(symbol: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            code: code.into(),
        }
    }

    /// "₱1,234.50", "-₱20.00"
    pub fn amount(&self, value: f64) -> String {
        if !value.is_finite() {
            return format!("{}0.00", self.symbol);
        }

        let cents = (value.abs() * 100.0).round() as u64;
        let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
        format!(
            "{}{}{}.{:02}",
            sign,
            self.symbol,
            group_thousands(cents / 100),
            cents % 100
        )
    }

    /// Table cell: zero renders as an empty string
    pub fn cell(&self, value: f64) -> String {
        if round2(value) == 0.0 {
            String::new()
        } else {
            self.amount(value)
        }
    }
}

/// "20.0%"
pub fn percent(value: f64) -> String {
    format!("{:.1}%", normalize_zero(round1(value)))
}

/// Round to one decimal place (chart labels)
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to cents
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Normalize -0.0 to 0.0 for cleaner display
pub fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// "january" -> "January"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn group_thousands(mut whole: u64) -> String {
    let mut groups = Vec::new();
    while whole >= 1000 {
        groups.push(format!("{:03}", whole % 1000));
        whole /= 1000;
    }
    groups.push(whole.to_string());
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formatting() {
        let peso = CurrencyFormat::default();
        assert_eq!(peso.amount(0.0), "₱0.00");
        assert_eq!(peso.amount(1000.0), "₱1,000.00");
        assert_eq!(peso.amount(1234567.891), "₱1,234,567.89");
        assert_eq!(peso.amount(999.999), "₱1,000.00");
        assert_eq!(peso.amount(-20.5), "-₱20.50");
        assert_eq!(peso.amount(-0.001), "₱0.00");
    }

    #[test]
    fn test_custom_symbol() {
        let usd = CurrencyFormat::new("$", "USD");
        assert_eq!(usd.amount(42.1), "$42.10");
    }

    #[test]
    fn test_zero_cells_are_empty() {
        let peso = CurrencyFormat::default();
        assert_eq!(peso.cell(0.0), "");
        assert_eq!(peso.cell(-0.0), "");
        assert_eq!(peso.cell(1000.0), "₱1,000.00");
    }

    #[test]
    fn test_percent_and_rounding() {
        assert_eq!(percent(20.0), "20.0%");
        assert_eq!(percent(33.333), "33.3%");
        assert_eq!(percent(-0.01), "0.0%");
        assert_eq!(round1(12.349), 12.3);
        assert_eq!(round2(1.005_1), 1.01);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("january"), "January");
        assert_eq!(capitalize(""), "");
    }
}
