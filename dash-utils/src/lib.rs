//! Shared utility functions for dashboard crates.

/// Date utility functions
pub mod dates {
    use anyhow::{anyhow, bail};
    use chrono::{Datelike, NaiveDate};
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::str::FromStr;

    /// Display format of a month on the chart axis: "Jul-21"
    pub const MONTH_LABEL_FORMAT: &str = "%b-%y";

    /// Format the month of a date as "Mon-YY", e.g. "Jul-21"
    pub fn format_month_label(date: &NaiveDate) -> String {
        date.format(MONTH_LABEL_FORMAT).to_string()
    }

    /// Parse a "Mon-YY" label into the first day of that month.
    pub fn parse_month_label(s: &str) -> anyhow::Result<NaiveDate> {
        let padded = format!("01-{}", s.trim());
        Ok(NaiveDate::parse_from_str(&padded, "%d-%b-%y")?)
    }

    /// A calendar month key, ordered chronologically and displayed as "YYYY-MM".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    pub struct YearMonth {
        pub year: i32,
        pub month: u32,
    }

    impl YearMonth {
        pub fn new(year: i32, month: u32) -> anyhow::Result<Self> {
            if !(1..=12).contains(&month) {
                bail!("month out of range: {month}");
            }
            Ok(YearMonth { year, month })
        }

        pub fn from_date(date: &NaiveDate) -> Self {
            YearMonth {
                year: date.year(),
                month: date.month(),
            }
        }

        /// The next calendar month.
        pub fn succ(&self) -> Self {
            if self.month == 12 {
                YearMonth {
                    year: self.year + 1,
                    month: 1,
                }
            } else {
                YearMonth {
                    year: self.year,
                    month: self.month + 1,
                }
            }
        }

        /// Every month from `start` through `end` (inclusive).
        pub fn range_inclusive(start: YearMonth, end: YearMonth) -> Vec<YearMonth> {
            let mut months = Vec::new();
            let mut current = start;
            while current <= end {
                months.push(current);
                current = current.succ();
            }
            months
        }
    }

    impl fmt::Display for YearMonth {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:04}-{:02}", self.year, self.month)
        }
    }

    impl FromStr for YearMonth {
        type Err = anyhow::Error;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            let (year, month) = s
                .trim()
                .split_once('-')
                .ok_or_else(|| anyhow!("expected YYYY-MM, got {s:?}"))?;
            YearMonth::new(year.parse()?, month.parse()?)
        }
    }

    /// Parse a day from the formats found in exchange-rate exports.
    ///
    /// Accepts day-first dates separated by `-` or `/` ("27-07-2021",
    /// "1/2/22", two-digit years are taken as 20xx) and ISO dates, optionally
    /// followed by a time ("2022-03-01", "2022-03-01 10:00").
    pub fn parse_day(s: &str) -> anyhow::Result<NaiveDate> {
        let s = s.trim().trim_matches('"').trim();
        if let Some(date) = parse_day_first(s) {
            return date;
        }
        let iso = s.get(..10).unwrap_or(s);
        Ok(NaiveDate::parse_from_str(iso, "%Y-%m-%d")?)
    }

    fn parse_day_first(s: &str) -> Option<anyhow::Result<NaiveDate>> {
        let sep = if s.contains('/') { '/' } else { '-' };
        let parts: Vec<&str> = s.split(sep).collect();
        let [d, m, y] = parts.as_slice() else {
            return None;
        };
        let all_digits = |p: &str, min: usize, max: usize| {
            (min..=max).contains(&p.len()) && p.chars().all(|c| c.is_ascii_digit())
        };
        if !(all_digits(*d, 1, 2) && all_digits(*m, 1, 2) && all_digits(*y, 2, 4)) {
            return None;
        }
        let year = if y.len() == 2 {
            format!("20{y}")
        } else {
            y.to_string()
        };
        let parsed = (|| -> anyhow::Result<NaiveDate> {
            let (year, month, day) = (year.parse()?, m.parse()?, d.parse()?);
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| anyhow!("invalid calendar date {s:?}"))
        })();
        Some(parsed)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_month_label_round_trip() {
            let date = parse_month_label("Jul-21").unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2021, 7, 1).unwrap());
            assert_eq!(format_month_label(&date), "Jul-21");
        }

        #[test]
        fn test_parse_month_label_rejects_garbage() {
            assert!(parse_month_label("Foo-21").is_err());
            assert!(parse_month_label("").is_err());
        }

        #[test]
        fn test_parse_day_formats() {
            let expected = NaiveDate::from_ymd_opt(2021, 7, 27).unwrap();
            assert_eq!(parse_day("27-07-2021").unwrap(), expected);
            assert_eq!(parse_day("27/7/21").unwrap(), expected);
            assert_eq!(parse_day("2021-07-27").unwrap(), expected);
            assert_eq!(parse_day("\"2021-07-27 13:45\"").unwrap(), expected);
            assert!(parse_day("yesterday").is_err());
            assert!(parse_day("31-02-2022").is_err());
        }

        #[test]
        fn test_year_month_ordering_and_display() {
            let dec = YearMonth::new(2021, 12).unwrap();
            let jan = dec.succ();
            assert_eq!(jan.to_string(), "2022-01");
            assert!(dec < jan);
            assert_eq!("2022-01".parse::<YearMonth>().unwrap(), jan);
            assert!(YearMonth::new(2022, 13).is_err());
        }

        #[test]
        fn test_year_month_range() {
            let months = YearMonth::range_inclusive(
                YearMonth::new(2021, 11).unwrap(),
                YearMonth::new(2022, 2).unwrap(),
            );
            let labels: Vec<String> = months.iter().map(|m| m.to_string()).collect();
            assert_eq!(labels, vec!["2021-11", "2021-12", "2022-01", "2022-02"]);
        }
    }
}

/// Number rounding and display helpers
pub mod numbers {
    /// Round to the nearest integer, halves rounding up (2.5 -> 3, -2.5 -> -2).
    pub fn round_half_up(value: f64) -> i64 {
        (value + 0.5).floor() as i64
    }

    /// Format a value rounded to a whole number with comma thousands separators.
    pub fn format_thousands(value: f64) -> String {
        let rounded = round_half_up(value);
        let digits = rounded.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        if rounded < 0 {
            format!("-{grouped}")
        } else {
            grouped
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_round_half_up() {
            assert_eq!(round_half_up(2.5), 3);
            assert_eq!(round_half_up(2.49), 2);
            assert_eq!(round_half_up(-2.5), -2);
        }

        #[test]
        fn test_format_thousands() {
            assert_eq!(format_thousands(0.0), "0");
            assert_eq!(format_thousands(999.0), "999");
            assert_eq!(format_thousands(1390771.0), "1,390,771");
            assert_eq!(format_thousands(-26493.0), "-26,493");
            assert_eq!(format_thousands(1515.4), "1,515");
        }
    }
}
