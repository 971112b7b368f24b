use crate::error::DatasetError;
use chrono::NaiveDate;
use dash_utils::dates::{format_month_label, parse_month_label, YearMonth};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One point on the shared month axis, displayed as "Jul-21".
///
/// Stored as the first day of the month so labels order chronologically
/// rather than alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthLabel(NaiveDate);

impl MonthLabel {
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_date(&self.0)
    }
}

impl From<YearMonth> for MonthLabel {
    fn from(ym: YearMonth) -> Self {
        // YearMonth guarantees a valid month, so day 1 always exists.
        MonthLabel(NaiveDate::from_ymd_opt(ym.year, ym.month, 1).unwrap_or(NaiveDate::MIN))
    }
}

impl FromStr for MonthLabel {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_month_label(s)
            .map(MonthLabel)
            .map_err(|_| DatasetError::InvalidMonth(s.to_string()))
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_month_label(&self.0))
    }
}

impl Serialize for MonthLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::MonthLabel;

    #[test]
    fn test_month_label_orders_chronologically() {
        let dec: MonthLabel = "Dec-20".parse().unwrap();
        let jan: MonthLabel = "Jan-21".parse().unwrap();
        assert!(dec < jan);
        assert_eq!(jan.to_string(), "Jan-21");
        assert_eq!(jan.year_month().to_string(), "2021-01");
    }

    #[test]
    fn test_month_label_serializes_as_label() {
        let jul: MonthLabel = "Jul-21".parse().unwrap();
        assert_eq!(serde_json::to_string(&jul).unwrap(), "\"Jul-21\"");
    }

    #[test]
    fn test_invalid_month_label() {
        assert!("13-21".parse::<MonthLabel>().is_err());
    }
}
