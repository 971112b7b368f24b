//! Chart header with title and period.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartHeaderProps {
    pub title: String,
    /// Period of the current view (e.g., "01-07-2021 to 09-01-2022")
    #[props(default = String::new())]
    pub period: String,
    #[props(default = String::new())]
    pub unit_description: String,
}

#[component]
pub fn ChartHeader(props: ChartHeaderProps) -> Element {
    rsx! {
        div {
            style: "margin-bottom: 8px;",
            h3 {
                style: "margin: 0 0 4px 0; font-size: 18px;",
                "{props.title}"
            }
            if !props.period.is_empty() {
                p {
                    style: "margin: 0; font-size: 12px; opacity: 0.7;",
                    "Period: {props.period}"
                }
            }
            if !props.unit_description.is_empty() {
                p {
                    style: "margin: 0; font-size: 12px; opacity: 0.7;",
                    "Y-axis: {props.unit_description}"
                }
            }
        }
    }
}
