//! Summary card row.

use dash_data::summary::SummaryCard;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct SummaryCardsProps {
    pub cards: Vec<SummaryCard>,
    /// Extra (label, value) cards appended after the series cards
    #[props(default = Vec::new())]
    pub extra: Vec<(String, String)>,
}

#[component]
pub fn SummaryCards(props: SummaryCardsProps) -> Element {
    let items: Vec<(String, String)> = props
        .cards
        .iter()
        .map(|c| (c.label.to_string(), c.display_value()))
        .chain(props.extra.iter().cloned())
        .collect();

    rsx! {
        div {
            style: "display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 12px; margin: 12px 0;",
            for (label, value) in items {
                div {
                    key: "{label}",
                    style: "padding: 12px; border: 1px solid #d1d5db; border-radius: 8px;",
                    div { style: "font-size: 12px; opacity: 0.7;", "{label}" }
                    div { style: "font-size: 20px; font-weight: bold;", "{value}" }
                }
            }
        }
    }
}
