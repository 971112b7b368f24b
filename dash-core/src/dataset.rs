//! The master dataset: one month axis and every series aligned to it.
//!
//! The dashboard has no backend. The monthly figures live in
//! `fixtures/arrivals.csv` and are embedded into every binary at compile
//! time, then validated once when a view mounts.

use crate::error::DatasetError;
use crate::month::MonthLabel;
use crate::reading::Reading;
use crate::series::{Series, SeriesKey};
use csv::ReaderBuilder;
use log::debug;
use std::collections::BTreeMap;

/// Monthly arrivals, tests and exchange rates: `month,<series columns...>`.
pub const ARRIVALS_CSV: &str = include_str!("../../fixtures/arrivals.csv");

/// Column holding the month label.
pub const MONTH_COLUMN: &str = "month";

#[derive(Debug, Clone, PartialEq)]
pub struct MasterDataset {
    months: Vec<MonthLabel>,
    series: BTreeMap<SeriesKey, Series>,
}

impl MasterDataset {
    /// Validate a month axis and its series.
    ///
    /// Keys not supplied become all-gap series so every key is always
    /// present. Fails if the axis is not strictly increasing or any series
    /// length differs from the axis length.
    pub fn new(
        months: Vec<MonthLabel>,
        series: Vec<(SeriesKey, Vec<Reading>)>,
    ) -> Result<Self, DatasetError> {
        if let Some(index) = months.windows(2).position(|w| w[0] >= w[1]) {
            return Err(DatasetError::MonthOrder { index: index + 1 });
        }
        let mut by_key = BTreeMap::new();
        for (key, readings) in series {
            if readings.len() != months.len() {
                return Err(DatasetError::LengthMismatch {
                    series: key.label().to_string(),
                    expected: months.len(),
                    found: readings.len(),
                });
            }
            by_key.insert(key, Series::new(key.label(), readings));
        }
        for key in SeriesKey::ALL {
            by_key
                .entry(key)
                .or_insert_with(|| Series::absent(key.label(), months.len()));
        }
        Ok(MasterDataset {
            months,
            series: by_key,
        })
    }

    /// Parse the fixture layout: a `month` column followed by one column
    /// per series. Unknown columns are ignored; blank cells are gaps.
    pub fn from_csv(csv_data: &str) -> Result<Self, DatasetError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        let headers = rdr.headers()?.clone();
        let column_index = |name: &str| headers.iter().position(|h| h == name);

        let month_idx = column_index(MONTH_COLUMN)
            .ok_or_else(|| DatasetError::MissingColumn(MONTH_COLUMN.to_string()))?;
        let series_columns: Vec<(SeriesKey, usize)> = SeriesKey::ALL
            .iter()
            .filter_map(|key| column_index(key.column()).map(|idx| (*key, idx)))
            .collect();

        let mut months = Vec::new();
        let mut columns: Vec<Vec<Reading>> = vec![Vec::new(); series_columns.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let label = record.get(month_idx).unwrap_or("");
            months.push(label.parse::<MonthLabel>()?);
            for ((key, idx), readings) in series_columns.iter().zip(columns.iter_mut()) {
                let cell = record.get(*idx).unwrap_or("");
                let reading =
                    Reading::parse_cell(cell).ok_or_else(|| DatasetError::InvalidReading {
                        row: row + 1,
                        column: key.column().to_string(),
                        value: cell.to_string(),
                    })?;
                readings.push(reading);
            }
        }
        debug!(
            "parsed {} months x {} series from dataset CSV",
            months.len(),
            series_columns.len()
        );

        let series = series_columns
            .into_iter()
            .map(|(key, _)| key)
            .zip(columns)
            .collect();
        MasterDataset::new(months, series)
    }

    /// The dataset compiled into the binary.
    pub fn compiled() -> Result<Self, DatasetError> {
        MasterDataset::from_csv(ARRIVALS_CSV)
    }

    pub fn months(&self) -> &[MonthLabel] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn series(&self, key: SeriesKey) -> &Series {
        // `new` inserts every key, so the lookup cannot miss.
        &self.series[&key]
    }

    pub fn iter_series(&self) -> impl Iterator<Item = (SeriesKey, &Series)> {
        self.series.iter().map(|(k, s)| (*k, s))
    }

    pub fn index_of(&self, month: &MonthLabel) -> Option<usize> {
        self.months.binary_search(month).ok()
    }
}
