//! Phase selection and per-phase visibility.

use crate::components::ToggleButton;
use crate::state::AppState;
use dash_core::phase_definition::{PhaseDefinition, ALL_PHASES_ID, ALL_PHASES_NAME};
use dash_data::phase::PhaseSelection;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct PhaseSelectorProps {
    pub phases: Vec<PhaseDefinition>,
}

/// Dropdown choosing between "All Phases" and a single phase.
#[component]
pub fn PhaseSelector(props: PhaseSelectorProps) -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.selection)();

    let on_change = move |evt: Event<FormData>| {
        let value = evt.value();
        let selection = if value == ALL_PHASES_ID {
            PhaseSelection::All
        } else {
            PhaseSelection::Phase(value)
        };
        log::debug!("phase selected: {}", selection.id());
        state.select_phase(selection);
    };

    rsx! {
        label {
            style: "font-weight: bold; display: inline-flex; gap: 6px; align-items: center;",
            "Phase: "
            select {
                onchange: on_change,
                option {
                    value: "{ALL_PHASES_ID}",
                    selected: current == PhaseSelection::All,
                    "{ALL_PHASES_NAME}"
                }
                for phase in props.phases.iter() {
                    option {
                        key: "{phase.id}",
                        value: "{phase.id}",
                        selected: current.id() == phase.id,
                        "{phase.name}"
                    }
                }
            }
        }
    }
}

/// Show/hide buttons for each phase, only meaningful on the combined view.
#[component]
pub fn PhaseToggles(props: PhaseSelectorProps) -> Element {
    let mut state = use_context::<AppState>();
    if (state.selection)() != PhaseSelection::All {
        return rsx! {};
    }
    let visibility = (state.visibility)();

    rsx! {
        div {
            style: "display: flex; gap: 8px; flex-wrap: wrap; align-items: center;",
            for phase in props.phases.iter() {
                ToggleButton {
                    key: "{phase.id}",
                    label: phase.name.to_string(),
                    active: visibility.is_phase_visible(phase.id),
                    on_toggle: {
                        let id = phase.id;
                        move |_| state.visibility.write().toggle_phase(id)
                    },
                }
            }
        }
    }
}
