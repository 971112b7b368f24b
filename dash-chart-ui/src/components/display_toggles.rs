//! Series, overlay, transition and display toggles.

use crate::components::ToggleButton;
use crate::state::AppState;
use crate::theme::Theme;
use dash_core::series::SeriesKey;
use dash_data::visibility::{DifferenceOverlayKind, VisibilityState};
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct DisplayTogglesProps {
    pub series: Vec<SeriesKey>,
    #[props(default = Vec::new())]
    pub overlays: Vec<DifferenceOverlayKind>,
    /// Offer the test-provider transition toggle
    #[props(default = false)]
    pub provider_transition: bool,
}

/// Series with a toggle right now. The secondary provider is only drawn as
/// part of the provider transition.
pub fn drawn_series(series: &[SeriesKey], visibility: &VisibilityState) -> Vec<SeriesKey> {
    series
        .iter()
        .copied()
        .filter(|&key| {
            key != SeriesKey::SecondaryProvider || visibility.is_provider_transition_enabled()
        })
        .collect()
}

/// (on, dimmed) for an overlay button. The button follows the overlay's own
/// flag, dimmed while one of its two series is hidden.
pub fn overlay_button(visibility: &VisibilityState, kind: DifferenceOverlayKind) -> (bool, bool) {
    let enabled = visibility.is_overlay_enabled(kind);
    (enabled, enabled && !visibility.is_overlay_active(kind))
}

#[component]
pub fn DisplayToggles(props: DisplayTogglesProps) -> Element {
    let mut state = use_context::<AppState>();
    let visibility = (state.visibility)();
    let theme = (state.theme)();
    let rtl = (state.rtl)();

    rsx! {
        div {
            style: "display: flex; flex-direction: column; gap: 8px; margin: 8px 0;",
            div {
                style: "display: flex; gap: 8px; flex-wrap: wrap;",
                for key in drawn_series(&props.series, &visibility) {
                    ToggleButton {
                        key: "{key:?}",
                        label: key.label().to_string(),
                        active: visibility.is_series_visible(key),
                        color: theme.series_color(key).to_string(),
                        on_toggle: move |_| state.visibility.write().toggle_series(key),
                    }
                }
            }
            if !props.overlays.is_empty() || props.provider_transition {
                div {
                    style: "display: flex; gap: 8px; flex-wrap: wrap;",
                    for kind in props.overlays.iter().copied() {
                        ToggleButton {
                            key: "{kind:?}",
                            label: kind.label().to_string(),
                            active: overlay_button(&visibility, kind).0,
                            dimmed: overlay_button(&visibility, kind).1,
                            color: theme.overlay_color(kind).to_string(),
                            on_toggle: move |_| state.visibility.write().toggle_overlay(kind),
                        }
                    }
                    if props.provider_transition {
                        ToggleButton {
                            label: "UL → Secondary Provider".to_string(),
                            active: visibility.is_provider_transition_enabled(),
                            color: theme.series_color(SeriesKey::SecondaryProvider).to_string(),
                            on_toggle: move |_| state.visibility.write().toggle_provider_transition(),
                        }
                    }
                }
            }
            div {
                style: "display: flex; gap: 8px; flex-wrap: wrap;",
                ToggleButton {
                    label: "Dark mode".to_string(),
                    active: theme == Theme::Dark,
                    on_toggle: move |_| {
                        let next = (state.theme)().toggled();
                        state.theme.set(next);
                    },
                }
                ToggleButton {
                    label: "Right-to-left".to_string(),
                    active: rtl,
                    on_toggle: move |_| {
                        let next = !(state.rtl)();
                        state.rtl.set(next);
                    },
                }
            }
        }
    }
}
