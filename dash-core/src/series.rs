use crate::reading::Reading;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Whether a series counts things (summed on cards) or quotes a rate (averaged).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Volume,
    Rate,
}

/// The named series compiled into the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKey {
    /// Arrivals according to flight manifests
    Manifest,
    /// Estimated arrivals (monthly)
    Estimated,
    /// Tests reported by the original testing authority
    UlTests,
    /// USD/LBP parallel market rate
    MarketRate,
    /// USD/LBP rate on the secondary (Sayrafa) platform
    SayrafaRate,
    /// Tests reported by the provider that took over from the original authority
    SecondaryProvider,
}

impl SeriesKey {
    pub const ALL: [SeriesKey; 6] = [
        SeriesKey::Manifest,
        SeriesKey::Estimated,
        SeriesKey::UlTests,
        SeriesKey::MarketRate,
        SeriesKey::SayrafaRate,
        SeriesKey::SecondaryProvider,
    ];

    /// Column header in the fixture CSV.
    pub fn column(&self) -> &'static str {
        match self {
            SeriesKey::Manifest => "manifest",
            SeriesKey::Estimated => "estimated",
            SeriesKey::UlTests => "ul_tests",
            SeriesKey::MarketRate => "market_rate",
            SeriesKey::SayrafaRate => "sayrafa_rate",
            SeriesKey::SecondaryProvider => "secondary_provider",
        }
    }

    /// Label shown in legends, tooltips and cards.
    pub fn label(&self) -> &'static str {
        match self {
            SeriesKey::Manifest => "Manifest",
            SeriesKey::Estimated => "Estimated",
            SeriesKey::UlTests => "UL",
            SeriesKey::MarketRate => "Market Rate",
            SeriesKey::SayrafaRate => "Sayrafa Rate",
            SeriesKey::SecondaryProvider => "Secondary Provider",
        }
    }

    pub fn kind(&self) -> SeriesKind {
        match self {
            SeriesKey::MarketRate | SeriesKey::SayrafaRate => SeriesKind::Rate,
            _ => SeriesKind::Volume,
        }
    }

    pub fn unit(&self) -> Option<&'static str> {
        match self.kind() {
            SeriesKind::Rate => Some("LBP"),
            SeriesKind::Volume => None,
        }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named run of readings aligned 1:1 with a month axis.
///
/// Series are never changed in place: every transformation returns a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    readings: Vec<Reading>,
}

impl Series {
    pub fn new(name: impl Into<String>, readings: Vec<Reading>) -> Self {
        Series {
            name: name.into(),
            readings,
        }
    }

    /// Build from optional values; `None` becomes a gap.
    pub fn from_options(name: impl Into<String>, values: &[Option<f64>]) -> Self {
        Series::new(name, values.iter().map(|&v| Reading::from(v)).collect())
    }

    /// An all-gap series of the given length.
    pub fn absent(name: impl Into<String>, len: usize) -> Self {
        Series::new(name, vec![Reading::Absent; len])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Reading at `index`; out of range reads as a gap.
    pub fn get(&self, index: usize) -> Reading {
        self.readings.get(index).copied().unwrap_or(Reading::Absent)
    }

    /// Iterate over real values only, skipping gaps.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().filter_map(|r| r.value())
    }

    pub fn has_data(&self) -> bool {
        self.readings.iter().any(|r| r.is_present())
    }

    pub fn with_name(&self, name: impl Into<String>) -> Series {
        Series::new(name, self.readings.clone())
    }

    /// Sub-range of the series. Panics if `range` is outside the series,
    /// callers slice with validated phase boundaries.
    pub fn slice(&self, range: Range<usize>) -> Series {
        Series::new(self.name.clone(), self.readings[range].to_vec())
    }

    /// Replace every reading whose index fails `keep` with a gap.
    pub fn masked(&self, keep: impl Fn(usize) -> bool) -> Series {
        let readings = self
            .readings
            .iter()
            .enumerate()
            .map(|(i, &r)| if keep(i) { r } else { Reading::Absent })
            .collect();
        Series::new(self.name.clone(), readings)
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Series {
        Series::new(
            self.name.clone(),
            self.readings.iter().map(|r| r.map(&f)).collect(),
        )
    }

    pub fn reversed(&self) -> Series {
        Series::new(self.name.clone(), self.readings.iter().rev().copied().collect())
    }

    /// Absolute values, for comparing rates by magnitude.
    pub fn magnitude(&self) -> Series {
        self.map(f64::abs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Series {
        Series::from_options("A", &[Some(100.0), None, Some(-300.0)])
    }

    #[test]
    fn test_present_values_skip_gaps() {
        let values: Vec<f64> = sample().present_values().collect();
        assert_eq!(values, vec![100.0, -300.0]);
        assert!(sample().has_data());
        assert!(!Series::absent("B", 3).has_data());
    }

    #[test]
    fn test_transformations_return_new_series() {
        let original = sample();
        let masked = original.masked(|i| i != 0);
        assert_eq!(masked.get(0), Reading::Absent);
        assert_eq!(original.get(0), Reading::Present(100.0));

        assert_eq!(original.magnitude().get(2), Reading::Present(300.0));
        assert_eq!(original.reversed().get(0), Reading::Present(-300.0));
        assert_eq!(original.slice(1..3).len(), 2);
    }

    #[test]
    fn test_out_of_range_reads_as_gap() {
        assert_eq!(sample().get(10), Reading::Absent);
    }

    #[test]
    fn test_series_key_metadata() {
        assert_eq!(SeriesKey::MarketRate.unit(), Some("LBP"));
        assert_eq!(SeriesKey::Manifest.kind(), SeriesKind::Volume);
        assert_eq!(SeriesKey::UlTests.to_string(), "UL");
        assert_eq!(
            serde_json::to_string(&SeriesKey::SayrafaRate).unwrap(),
            "\"sayrafa_rate\""
        );
    }
}
