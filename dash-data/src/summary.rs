//! Summary card figures over the currently visible data.
//!
//! Gaps are excluded, never counted as zero: they add nothing to a sum and
//! do not enter an average's denominator.

use crate::error::SummaryError;
use crate::phase::Phase;
use crate::visibility::VisibilityState;
use dash_core::series::{Series, SeriesKey, SeriesKind};
use dash_utils::numbers::format_thousands;
use serde::Serialize;
use std::fmt;

/// A mean, or "not applicable" when nothing was there to average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Average {
    Value(f64),
    NotApplicable,
}

impl Average {
    pub fn value(&self) -> Option<f64> {
        match self {
            Average::Value(v) => Some(*v),
            Average::NotApplicable => None,
        }
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Value(v) => f.write_str(&format_thousands(*v)),
            Average::NotApplicable => f.write_str("N/A"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extrema {
    pub min: f64,
    pub max: f64,
}

/// Total of the real readings; 0 when the series is hidden or has none.
pub fn sum(series: &Series, visible: bool) -> f64 {
    if !visible {
        return 0.0;
    }
    series.present_values().sum()
}

/// Mean of the real readings.
pub fn average(series: &Series, visible: bool) -> Average {
    if !visible {
        return Average::NotApplicable;
    }
    let (total, count) = series
        .present_values()
        .fold((0.0, 0usize), |(t, c), v| (t + v, c + 1));
    if count == 0 {
        Average::NotApplicable
    } else {
        Average::Value(total / count as f64)
    }
}

/// Smallest and largest real reading. Fails on a series with no data;
/// check `Series::has_data` first when that is expected.
pub fn extrema(series: &Series) -> Result<Extrema, SummaryError> {
    series
        .present_values()
        .fold(None, |acc: Option<Extrema>, v| {
            Some(match acc {
                None => Extrema { min: v, max: v },
                Some(e) => Extrema {
                    min: e.min.min(v),
                    max: e.max.max(v),
                },
            })
        })
        .ok_or_else(|| SummaryError::NoData {
            series: series.name().to_string(),
        })
}

/// Rise from the lowest to the highest rate, in percent of the lowest.
/// `None` when the lowest rate is zero.
pub fn devaluation_percent(extrema: &Extrema) -> Option<f64> {
    if extrema.min == 0.0 {
        return None;
    }
    Some((extrema.max - extrema.min) / extrema.min * 100.0)
}

/// What a card shows: a total for volumes, an average for rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CardValue {
    Total(f64),
    Average(Average),
}

impl fmt::Display for CardValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardValue::Total(v) => f.write_str(&format_thousands(*v)),
            CardValue::Average(avg) => write!(f, "{avg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCard {
    pub key: SeriesKey,
    pub label: &'static str,
    pub value: CardValue,
}

impl SummaryCard {
    /// Card text with the series unit, e.g. "19,408 LBP" or "N/A".
    pub fn display_value(&self) -> String {
        match (self.value, self.key.unit()) {
            (CardValue::Average(Average::NotApplicable), _) | (_, None) => self.value.to_string(),
            (_, Some(unit)) => format!("{} {unit}", self.value),
        }
    }
}

/// Cards for `keys` over a view, honouring series visibility.
pub fn summary_cards(
    view: &Phase,
    visibility: &VisibilityState,
    keys: &[SeriesKey],
) -> Vec<SummaryCard> {
    keys.iter()
        .map(|&key| {
            let series = view.series(key);
            let visible = visibility.is_series_visible(key);
            let value = match key.kind() {
                SeriesKind::Volume => CardValue::Total(sum(series, visible)),
                SeriesKind::Rate => CardValue::Average(average(series, visible)),
            };
            SummaryCard {
                key,
                label: key.label(),
                value,
            }
        })
        .collect()
}
