//! Monthly averages of daily USD/LBP exchange-rate exports.
//!
//! The exports come from different sources with different headers (some in
//! Arabic), so the date and value columns are found by keyword. Rows that
//! cannot be read are skipped; a file whose columns cannot be identified is
//! an error.

use anyhow::{bail, Context};
use csv::ReaderBuilder;
use dash_utils::dates::{parse_day, YearMonth};
use dash_utils::numbers::round_half_up;
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Daily parallel-market rates.
pub const MARKET_RATE_FILE: &str = "usd-to-lbp-market-rate.csv";

/// Sayrafa platform rates, first existing file wins.
pub const SAYRAFA_FILE_OPTIONS: [&str; 2] = ["sayrafa-until-july-2022.csv", "sayrafa.csv"];

const DATE_KEYWORDS: [&str; 4] = ["date", "time", "datetime", "تاريخ"];
const VALUE_KEYWORDS: [&str; 6] = ["usd", "lbp", "rate", "سعر", "صرف", "dollar"];
/// "Bank": headers like "مصرف لبنان" name the source, not a rate.
const EXCLUDED_VALUE_KEYWORD: &str = "مصرف";

/// Column positions of the day and the rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateColumns {
    pub date: usize,
    pub value: usize,
}

fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .replace('"', "")
        .trim()
        .to_lowercase()
}

/// Find the date and value columns by header keyword.
///
/// `source` names the file in the error when either column is missing.
pub fn infer_columns(headers: &[&str], source: &str) -> anyhow::Result<RateColumns> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let date = normalized
        .iter()
        .position(|h| DATE_KEYWORDS.iter().any(|k| h.contains(k)));
    let value = normalized.iter().position(|h| {
        VALUE_KEYWORDS.iter().any(|k| h.contains(k)) && !h.contains(EXCLUDED_VALUE_KEYWORD)
    });
    match (date, value) {
        (Some(date), Some(value)) => Ok(RateColumns { date, value }),
        _ => bail!(
            "could not infer columns for {source}, headers: {}",
            headers.join("|")
        ),
    }
}

/// Parse the numeric prefix of a cell ("19,408" reads as 19, "20300 LBP" as 20300).
fn parse_leading_number(cell: &str) -> Option<f64> {
    let cell = cell.replace('"', "");
    let cell = cell.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (i, c) in cell.char_indices() {
        match c {
            '+' | '-' if i == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = i + c.len_utf8();
    }
    if !seen_digit {
        return None;
    }
    cell[..end].trim_end_matches('.').parse().ok()
}

/// Integer-rounded mean rate per calendar month.
pub fn monthly_averages<R: Read>(
    reader: R,
    source: &str,
) -> anyhow::Result<BTreeMap<YearMonth, i64>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .with_context(|| format!("failed to read headers of {source}"))?
        .clone();
    let header_list: Vec<&str> = headers.iter().collect();
    let columns = infer_columns(&header_list, source)?;
    let min_fields = columns.date.max(columns.value) + 1;

    let mut monthly: BTreeMap<YearMonth, (f64, usize)> = BTreeMap::new();
    let mut skipped = 0usize;
    for (row, result) in rdr.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                debug!("{source} row {}: unreadable record: {e}", row + 1);
                skipped += 1;
                continue;
            }
        };
        if record.len() < min_fields {
            skipped += 1;
            continue;
        }
        let date_cell = record.get(columns.date).unwrap_or("");
        let value_cell = record.get(columns.value).unwrap_or("");
        let (Ok(day), Some(value)) = (parse_day(date_cell), parse_leading_number(value_cell)) else {
            debug!("{source} row {}: skipping {date_cell:?} / {value_cell:?}", row + 1);
            skipped += 1;
            continue;
        };
        let entry = monthly.entry(YearMonth::from_date(&day)).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    info!(
        "{source}: {} months averaged, {skipped} rows skipped",
        monthly.len()
    );

    Ok(monthly
        .into_iter()
        .map(|(month, (sum, count))| (month, round_half_up(sum / count as f64)))
        .collect())
}

pub fn monthly_averages_from_path(path: &Path) -> anyhow::Result<BTreeMap<YearMonth, i64>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    monthly_averages(file, &path.display().to_string())
}

/// The Sayrafa export in `data_dir`, trying each known file name in order.
pub fn locate_sayrafa_file(data_dir: &Path) -> anyhow::Result<PathBuf> {
    SAYRAFA_FILE_OPTIONS
        .iter()
        .map(|name| data_dir.join(name))
        .find(|path| path.exists())
        .with_context(|| {
            format!(
                "Sayrafa CSV not found in {} (tried {})",
                data_dir.display(),
                SAYRAFA_FILE_OPTIONS.join(", ")
            )
        })
}

/// Averages for `months`, `None` where a month had no readable rows.
pub fn pick(averages: &BTreeMap<YearMonth, i64>, months: &[YearMonth]) -> Vec<Option<i64>> {
    months.iter().map(|m| averages.get(m).copied()).collect()
}

/// Render picked averages as "[19408, 19587, null]".
pub fn format_picked(values: &[Option<i64>]) -> String {
    let items: Vec<String> = values
        .iter()
        .map(|v| v.map_or_else(|| "null".to_string(), |v| v.to_string()))
        .collect();
    format!("[{}]", items.join(", "))
}

/// One printed line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub label: &'static str,
    pub values: Vec<Option<i64>>,
}

/// Months that extend phase 3 (Feb-Jul 2022) and the phase 2 months used
/// as a cross-check against the figures already compiled in.
fn report_windows() -> anyhow::Result<(Vec<YearMonth>, Vec<YearMonth>)> {
    let extension = YearMonth::range_inclusive(YearMonth::new(2022, 2)?, YearMonth::new(2022, 7)?);
    let phase2 = YearMonth::range_inclusive(YearMonth::new(2021, 7)?, YearMonth::new(2022, 1)?);
    Ok((extension, phase2))
}

pub fn build_report(data_dir: &Path) -> anyhow::Result<Vec<ReportLine>> {
    let market = monthly_averages_from_path(&data_dir.join(MARKET_RATE_FILE))?;
    let sayrafa = monthly_averages_from_path(&locate_sayrafa_file(data_dir)?)?;
    let (extension, phase2) = report_windows()?;
    Ok(vec![
        ReportLine {
            label: "Market averages Feb-Jul 2022",
            values: pick(&market, &extension),
        },
        ReportLine {
            label: "Sayrafa averages Feb-Jul 2022",
            values: pick(&sayrafa, &extension),
        },
        ReportLine {
            label: "Existing Phase2 Market (Jul21-Jan22)",
            values: pick(&market, &phase2),
        },
        ReportLine {
            label: "Existing Phase2 Sayrafa (Jul21-Jan22)",
            values: pick(&sayrafa, &phase2),
        },
    ])
}

pub fn run_monthly_rates(data_dir: &Path) -> anyhow::Result<()> {
    info!("Averaging exchange rates in {}", data_dir.display());
    for line in build_report(data_dir)? {
        println!("{}: {}", line.label, format_picked(&line.values));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MARKET_CSV: &str = "\"Date\",\"USD to LBP\",\"Source\"
\"27-07-2021\",\"19000\",x
\"28/07/21\",\"19801\",x
2021-08-01,20100,x
not a date,20000,x
02-08-2021,n/a,x
short
2022-02-03,20938 LBP,x
";

    #[test]
    fn test_infer_columns_english_and_arabic() {
        let cols = infer_columns(&["\"Date\"", "Open", "USD to LBP"], "a.csv").unwrap();
        assert_eq!(cols, RateColumns { date: 0, value: 2 });

        let cols = infer_columns(&["مصرف لبنان", "التاريخ", "سعر الصرف"], "b.csv").unwrap();
        assert_eq!(cols, RateColumns { date: 1, value: 2 });
    }

    #[test]
    fn test_infer_columns_failure_names_file_and_headers() {
        let err = infer_columns(&["day", "price"], "market.csv").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("market.csv"));
        assert!(msg.contains("day|price"));
    }

    #[test]
    fn test_parse_leading_number() {
        assert_eq!(parse_leading_number("20300"), Some(20300.0));
        assert_eq!(parse_leading_number("\"20300 LBP\""), Some(20300.0));
        assert_eq!(parse_leading_number("-1.5x"), Some(-1.5));
        assert_eq!(parse_leading_number("19,408"), Some(19.0));
        assert_eq!(parse_leading_number("n/a"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn test_monthly_averages_skip_bad_rows() {
        let averages = monthly_averages(MARKET_CSV.as_bytes(), "market").unwrap();
        let jul = YearMonth::new(2021, 7).unwrap();
        let aug = YearMonth::new(2021, 8).unwrap();
        let feb = YearMonth::new(2022, 2).unwrap();
        // (19000 + 19801) / 2 = 19400.5, rounds up
        assert_eq!(averages.get(&jul), Some(&19401));
        assert_eq!(averages.get(&aug), Some(&20100));
        assert_eq!(averages.get(&feb), Some(&20938));
        assert_eq!(averages.len(), 3);
        assert_eq!(
            pick(&averages, &[jul, YearMonth::new(2021, 9).unwrap()]),
            vec![Some(19401), None]
        );
    }

    #[test]
    fn test_format_picked() {
        assert_eq!(format_picked(&[Some(1), None, Some(3)]), "[1, null, 3]");
        assert_eq!(format_picked(&[]), "[]");
    }

    #[test]
    fn test_build_report_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MARKET_RATE_FILE), MARKET_CSV).unwrap();
        fs::write(
            dir.path().join("sayrafa.csv"),
            "date,rate\n2021-07-05,15000\n2021-07-20,16000\n",
        )
        .unwrap();

        let report = build_report(dir.path()).unwrap();
        assert_eq!(report.len(), 4);
        assert_eq!(report[0].values, vec![Some(20938), None, None, None, None, None]);
        assert_eq!(report[3].values[0], Some(15500));
        assert_eq!(report[3].values.len(), 7);
    }

    #[test]
    fn test_sayrafa_file_preference() {
        let dir = tempfile::tempdir().unwrap();
        assert!(locate_sayrafa_file(dir.path()).is_err());
        fs::write(dir.path().join("sayrafa.csv"), "date,rate\n").unwrap();
        assert!(locate_sayrafa_file(dir.path()).unwrap().ends_with("sayrafa.csv"));
        fs::write(dir.path().join("sayrafa-until-july-2022.csv"), "date,rate\n").unwrap();
        assert!(locate_sayrafa_file(dir.path())
            .unwrap()
            .ends_with("sayrafa-until-july-2022.csv"));
    }

    #[test]
    fn test_missing_columns_is_fatal() {
        let err = monthly_averages("day,price\n2021-07-01,1\n".as_bytes(), "odd.csv").unwrap_err();
        assert!(err.to_string().contains("odd.csv"));
    }
}
