//! Application state managed via Dioxus context.
//!
//! `AppState` bundles the reactive signals shared by every dashboard page and
//! is provided with `use_context_provider`. Child components retrieve it with
//! `use_context::<AppState>()`.

use crate::theme::Theme;
use dash_data::phase::PhaseSelection;
use dash_data::visibility::VisibilityState;
use dioxus::prelude::*;

/// Shared application state for all dashboard pages.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Whether the page is still preparing its data
    pub loading: Signal<bool>,
    /// Error message shown above the chart
    pub error_msg: Signal<Option<String>>,
    /// Phase currently shown
    pub selection: Signal<PhaseSelection>,
    /// Series, phase, overlay and transition toggles
    pub visibility: Signal<VisibilityState>,
    /// Pinned point, as an index into the current view
    pub selected_index: Signal<Option<usize>>,
    pub theme: Signal<Theme>,
    /// Right-to-left layout
    pub rtl: Signal<bool>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    pub fn new() -> Self {
        Self {
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            selection: Signal::new(PhaseSelection::All),
            visibility: Signal::new(VisibilityState::new()),
            selected_index: Signal::new(None),
            theme: Signal::new(Theme::default()),
            rtl: Signal::new(false),
        }
    }

    /// Switch phase and drop any pinned point, which belongs to the old view.
    pub fn select_phase(&mut self, selection: PhaseSelection) {
        self.selection.set(selection);
        self.selected_index.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
