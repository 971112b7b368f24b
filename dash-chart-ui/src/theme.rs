use dash_core::series::SeriesKey;
use dash_data::visibility::DifferenceOverlayKind;
use serde::{Deserialize, Serialize};

/// Colour scheme of a view. Passed in by the page instead of observed from the DOM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Built-in ECharts theme name, `None` for the default light theme.
    pub fn engine_theme(self) -> Option<&'static str> {
        match self {
            Theme::Light => None,
            Theme::Dark => Some("dark"),
        }
    }

    pub fn series_color(self, key: SeriesKey) -> &'static str {
        match (key, self) {
            (SeriesKey::Manifest, _) => "#6b7280",
            (SeriesKey::Estimated, Theme::Light) => "#111827",
            (SeriesKey::Estimated, Theme::Dark) => "#f9fafb",
            (SeriesKey::UlTests, _) => "#2563eb",
            (SeriesKey::MarketRate, _) => "#dc2626",
            (SeriesKey::SayrafaRate, _) => "#16a34a",
            (SeriesKey::SecondaryProvider, _) => "#0891b2",
        }
    }

    pub fn overlay_color(self, kind: DifferenceOverlayKind) -> &'static str {
        match (kind, self) {
            (DifferenceOverlayKind::ManifestEstimated, Theme::Light) => "#8b5cf6",
            (DifferenceOverlayKind::ManifestEstimated, Theme::Dark) => "#c4b5fd",
            (DifferenceOverlayKind::EstimatedUl, Theme::Light) => "#4f46e5",
            (DifferenceOverlayKind::EstimatedUl, Theme::Dark) => "#6366f1",
            (DifferenceOverlayKind::MarketSayrafa, Theme::Light) => "#ea580c",
            (DifferenceOverlayKind::MarketSayrafa, Theme::Dark) => "#f97316",
        }
    }

    pub fn divider_color(self) -> &'static str {
        match self {
            Theme::Light => "#e5e7eb",
            Theme::Dark => "#374151",
        }
    }

    /// Page background and text colours.
    pub fn page_colors(self) -> (&'static str, &'static str) {
        match self {
            Theme::Light => ("#ffffff", "#111827"),
            Theme::Dark => ("#111827", "#f9fafb"),
        }
    }
}
