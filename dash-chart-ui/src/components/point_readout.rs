//! Values for the pinned month.

use dash_core::reading::Reading;
use dash_data::readout::PointReadout;
use dash_data::visibility::VisibilityState;
use dash_utils::numbers::format_thousands;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct PointReadoutViewProps {
    pub readout: Option<PointReadout>,
    pub visibility: VisibilityState,
    pub on_clear: EventHandler<()>,
}

fn text(reading: Reading) -> String {
    reading
        .value()
        .map(format_thousands)
        .unwrap_or_else(|| "No data".to_string())
}

#[component]
pub fn PointReadoutView(props: PointReadoutViewProps) -> Element {
    let Some(readout) = props.readout.as_ref() else {
        return rsx! {
            p {
                style: "font-size: 12px; opacity: 0.7; margin: 4px 0;",
                "Click a point on the chart to pin its month."
            }
        };
    };
    let rows: Vec<(String, String)> = readout
        .values
        .iter()
        .filter(|(key, _)| props.visibility.is_series_visible(*key))
        .map(|(key, r)| (key.label().to_string(), text(*r)))
        .chain(readout.differences.iter().map(|(kind, r)| (kind.label().to_string(), text(*r))))
        .collect();

    rsx! {
        div {
            style: "padding: 8px 12px; margin: 8px 0; border: 1px solid #CCFF00; border-radius: 6px;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                strong { "{readout.month}" }
                button {
                    style: "background: transparent; border: none; cursor: pointer; color: inherit;",
                    onclick: move |_| props.on_clear.call(()),
                    "Clear"
                }
            }
            table {
                style: "width: 100%; font-size: 13px;",
                tbody {
                    for (label, value) in rows {
                        tr {
                            key: "{label}",
                            td { "{label}" }
                            td { style: "text-align: right;", "{value}" }
                        }
                    }
                }
            }
        }
    }
}
