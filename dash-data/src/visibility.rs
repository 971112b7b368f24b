//! Toggle state for one mounted view.
//!
//! Every flag is independent: any combination is valid and flipping a flag
//! twice restores the previous state. Series and phases default to shown,
//! overlays default to off. Only the exceptions are stored, so the state
//! serializes small and compares by value.

use dash_core::series::SeriesKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A band drawn between two series to show the gap between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceOverlayKind {
    ManifestEstimated,
    EstimatedUl,
    MarketSayrafa,
}

impl DifferenceOverlayKind {
    pub const ALL: [DifferenceOverlayKind; 3] = [
        DifferenceOverlayKind::ManifestEstimated,
        DifferenceOverlayKind::EstimatedUl,
        DifferenceOverlayKind::MarketSayrafa,
    ];

    /// The two series the band spans.
    pub fn pair(&self) -> (SeriesKey, SeriesKey) {
        match self {
            DifferenceOverlayKind::ManifestEstimated => (SeriesKey::Manifest, SeriesKey::Estimated),
            DifferenceOverlayKind::EstimatedUl => (SeriesKey::Estimated, SeriesKey::UlTests),
            DifferenceOverlayKind::MarketSayrafa => (SeriesKey::MarketRate, SeriesKey::SayrafaRate),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DifferenceOverlayKind::ManifestEstimated => "Δ Estimated vs Manifest",
            DifferenceOverlayKind::EstimatedUl => "Δ UL vs Estimated",
            DifferenceOverlayKind::MarketSayrafa => "Δ Market vs Sayrafa",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityState {
    hidden_series: BTreeSet<SeriesKey>,
    hidden_phases: BTreeSet<String>,
    overlays: BTreeSet<DifferenceOverlayKind>,
    provider_transition: bool,
}

fn flip<T: Ord>(set: &mut BTreeSet<T>, item: T) {
    if !set.remove(&item) {
        set.insert(item);
    }
}

impl VisibilityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_series_visible(&self, key: SeriesKey) -> bool {
        !self.hidden_series.contains(&key)
    }

    pub fn toggle_series(&mut self, key: SeriesKey) {
        flip(&mut self.hidden_series, key);
    }

    pub fn set_series_visible(&mut self, key: SeriesKey, visible: bool) {
        if visible {
            self.hidden_series.remove(&key);
        } else {
            self.hidden_series.insert(key);
        }
    }

    pub fn is_phase_visible(&self, phase_id: &str) -> bool {
        !self.hidden_phases.contains(phase_id)
    }

    pub fn toggle_phase(&mut self, phase_id: &str) {
        flip(&mut self.hidden_phases, phase_id.to_string());
    }

    pub fn set_phase_visible(&mut self, phase_id: &str, visible: bool) {
        if visible {
            self.hidden_phases.remove(phase_id);
        } else {
            self.hidden_phases.insert(phase_id.to_string());
        }
    }

    pub fn is_overlay_enabled(&self, kind: DifferenceOverlayKind) -> bool {
        self.overlays.contains(&kind)
    }

    pub fn toggle_overlay(&mut self, kind: DifferenceOverlayKind) {
        flip(&mut self.overlays, kind);
    }

    /// An overlay is drawn only while both of its series are shown.
    pub fn is_overlay_active(&self, kind: DifferenceOverlayKind) -> bool {
        let (a, b) = kind.pair();
        self.is_overlay_enabled(kind) && self.is_series_visible(a) && self.is_series_visible(b)
    }

    pub fn is_provider_transition_enabled(&self) -> bool {
        self.provider_transition
    }

    pub fn toggle_provider_transition(&mut self) {
        self.provider_transition = !self.provider_transition;
    }
}
