//! Values for a month the user has pinned by clicking the chart.

use crate::phase::Phase;
use crate::visibility::DifferenceOverlayKind;
use dash_core::month::MonthLabel;
use dash_core::reading::Reading;
use dash_core::series::SeriesKey;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointReadout {
    pub month: MonthLabel,
    pub values: Vec<(SeriesKey, Reading)>,
    /// Absolute gap for each overlay pair; market rates by magnitude.
    pub differences: Vec<(DifferenceOverlayKind, Reading)>,
}

impl PointReadout {
    /// Readout for the view's `index`-th month, `None` past the end.
    pub fn at(view: &Phase, index: usize) -> Option<PointReadout> {
        let month = *view.months.get(index)?;
        let reading = |key: SeriesKey| {
            let r = view.series(key).get(index);
            if key == SeriesKey::MarketRate {
                r.map(f64::abs)
            } else {
                r
            }
        };
        let values = SeriesKey::ALL.iter().map(|&k| (k, reading(k))).collect();
        let differences = DifferenceOverlayKind::ALL
            .iter()
            .map(|&kind| {
                let (a, b) = kind.pair();
                (kind, reading(a).zip_with(reading(b), |x, y| (y - x).abs()))
            })
            .collect();
        Some(PointReadout {
            month,
            values,
            differences,
        })
    }

    pub fn value(&self, key: SeriesKey) -> Reading {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(Reading::Absent, |(_, r)| *r)
    }

    pub fn difference(&self, kind: DifferenceOverlayKind) -> Reading {
        self.differences
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(Reading::Absent, |(_, r)| *r)
    }
}
