//! Canonical month keys and the month selector
//!
//! The dashboard endpoint keys everything by lowercase month name. Columns and
//! chart axes are always emitted in calendar order, never in the order the
//! source map happened to iterate.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DashboardError;

/// One of the twelve canonical months
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum MonthKey {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl MonthKey {
    /// All months in calendar order
    pub const ALL: [MonthKey; 12] = [
        MonthKey::January,
        MonthKey::February,
        MonthKey::March,
        MonthKey::April,
        MonthKey::May,
        MonthKey::June,
        MonthKey::July,
        MonthKey::August,
        MonthKey::September,
        MonthKey::October,
        MonthKey::November,
        MonthKey::December,
    ];

    /// Lowercase key as used by the endpoint ("january")
    pub fn name(self) -> &'static str {
        match self {
            MonthKey::January => "january",
            MonthKey::February => "february",
            MonthKey::March => "march",
            MonthKey::April => "april",
            MonthKey::May => "may",
            MonthKey::June => "june",
            MonthKey::July => "july",
            MonthKey::August => "august",
            MonthKey::September => "september",
            MonthKey::October => "october",
            MonthKey::November => "november",
            MonthKey::December => "december",
        }
    }

    /// Capitalized display label ("January")
    pub fn label(self) -> &'static str {
        match self {
            MonthKey::January => "January",
            MonthKey::February => "February",
            MonthKey::March => "March",
            MonthKey::April => "April",
            MonthKey::May => "May",
            MonthKey::June => "June",
            MonthKey::July => "July",
            MonthKey::August => "August",
            MonthKey::September => "September",
            MonthKey::October => "October",
            MonthKey::November => "November",
            MonthKey::December => "December",
        }
    }

    /// Calendar number, 1-12
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Self> {
        number
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx as usize))
            .copied()
    }

    /// Month of any chrono date or datetime
    pub fn of_date<D: Datelike>(date: &D) -> Self {
        // Datelike::month() is always 1-12
        Self::ALL[date.month0() as usize]
    }
}

impl From<chrono::Month> for MonthKey {
    fn from(month: chrono::Month) -> Self {
        Self::ALL[month.number_from_month() as usize - 1]
    }
}

impl From<MonthKey> for chrono::Month {
    fn from(month: MonthKey) -> Self {
        match month {
            MonthKey::January => chrono::Month::January,
            MonthKey::February => chrono::Month::February,
            MonthKey::March => chrono::Month::March,
            MonthKey::April => chrono::Month::April,
            MonthKey::May => chrono::Month::May,
            MonthKey::June => chrono::Month::June,
            MonthKey::July => chrono::Month::July,
            MonthKey::August => chrono::Month::August,
            MonthKey::September => chrono::Month::September,
            MonthKey::October => chrono::Month::October,
            MonthKey::November => chrono::Month::November,
            MonthKey::December => chrono::Month::December,
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts full names and three-letter abbreviations, any case ("Jan", "SEPT", " march ")
impl FromStr for MonthKey {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        if key.len() < 3 {
            return Err(DashboardError::UnknownMonth(s.to_string()));
        }

        Self::ALL
            .into_iter()
            .find(|month| month.name() == key || (key.len() <= 4 && month.name().starts_with(&key)))
            .ok_or_else(|| DashboardError::UnknownMonth(s.to_string()))
    }
}

impl TryFrom<String> for MonthKey {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Month filter applied to every aggregation: a single month or the whole year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MonthSelector {
    #[default]
    All,
    Month(MonthKey),
}

impl MonthSelector {
    /// Months covered by this selector, in calendar order
    pub fn months(self) -> Vec<MonthKey> {
        match self {
            MonthSelector::All => MonthKey::ALL.to_vec(),
            MonthSelector::Month(month) => vec![month],
        }
    }

    pub fn contains(self, month: MonthKey) -> bool {
        match self {
            MonthSelector::All => true,
            MonthSelector::Month(selected) => selected == month,
        }
    }

    pub fn is_all(self) -> bool {
        matches!(self, MonthSelector::All)
    }
}

impl From<MonthKey> for MonthSelector {
    fn from(month: MonthKey) -> Self {
        MonthSelector::Month(month)
    }
}

impl fmt::Display for MonthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthSelector::All => f.write_str("all"),
            MonthSelector::Month(month) => month.fmt(f),
        }
    }
}

impl FromStr for MonthSelector {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(MonthSelector::All);
        }
        s.parse::<MonthKey>()
            .map(MonthSelector::Month)
            .map_err(|_| DashboardError::UnknownSelector(s.to_string()))
    }
}

impl TryFrom<String> for MonthSelector {
    type Error = DashboardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthSelector> for String {
    fn from(selector: MonthSelector) -> Self {
        selector.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_canonical_order() {
        let names: Vec<_> = MonthKey::ALL.iter().map(|m| m.name()).collect();
        assert_eq!(names.first(), Some(&"january"));
        assert_eq!(names.last(), Some(&"december"));
        assert!(MonthKey::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_parse_full_and_abbreviated() {
        assert_eq!("january".parse::<MonthKey>().unwrap(), MonthKey::January);
        assert_eq!(" March ".parse::<MonthKey>().unwrap(), MonthKey::March);
        assert_eq!("Sep".parse::<MonthKey>().unwrap(), MonthKey::September);
        assert_eq!("sept".parse::<MonthKey>().unwrap(), MonthKey::September);
        assert_eq!("DEC".parse::<MonthKey>().unwrap(), MonthKey::December);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("ju".parse::<MonthKey>().is_err());
        assert!("total".parse::<MonthKey>().is_err());
        assert!("".parse::<MonthKey>().is_err());
        // Truncated long names are not abbreviations
        assert!("septem".parse::<MonthKey>().is_err());
    }

    #[test]
    fn test_number_round_trip_with_chrono() {
        for month in MonthKey::ALL {
            assert_eq!(MonthKey::from_number(month.number()), Some(month));
            assert_eq!(MonthKey::from(chrono::Month::from(month)), month);
        }
        assert_eq!(MonthKey::from_number(0), None);
        assert_eq!(MonthKey::from_number(13), None);
    }

    #[test]
    fn test_of_date() {
        let date = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        assert_eq!(MonthKey::of_date(&date), MonthKey::July);
    }

    #[test]
    fn test_selector_parse_and_months() {
        assert_eq!("ALL".parse::<MonthSelector>().unwrap(), MonthSelector::All);
        assert_eq!(
            "feb".parse::<MonthSelector>().unwrap(),
            MonthSelector::Month(MonthKey::February)
        );
        assert!(matches!(
            "q1".parse::<MonthSelector>(),
            Err(DashboardError::UnknownSelector(_))
        ));

        assert_eq!(MonthSelector::All.months().len(), 12);
        assert_eq!(MonthSelector::Month(MonthKey::May).months(), vec![MonthKey::May]);
        assert!(MonthSelector::All.contains(MonthKey::May));
        assert!(!MonthSelector::Month(MonthKey::June).contains(MonthKey::May));
    }

    #[test]
    fn test_selector_serde() {
        let json = serde_json::to_string(&MonthSelector::Month(MonthKey::April)).unwrap();
        assert_eq!(json, "\"april\"");
        let parsed: MonthSelector = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(parsed, MonthSelector::All);
    }
}
