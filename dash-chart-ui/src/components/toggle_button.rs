//! Pill-shaped on/off button used for every toggle on the pages.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ToggleButtonProps {
    pub label: String,
    pub active: bool,
    /// Swatch colour shown next to the label
    #[props(default = String::new())]
    pub color: String,
    /// On, but with nothing to draw right now
    #[props(default = false)]
    pub dimmed: bool,
    pub on_toggle: EventHandler<()>,
}

#[component]
pub fn ToggleButton(props: ToggleButtonProps) -> Element {
    let opacity = match (props.active, props.dimmed) {
        (true, false) => "1",
        (true, true) => "0.7",
        (false, _) => "0.45",
    };
    let border = if props.active { "#4b5563" } else { "#d1d5db" };
    let border_style = if props.dimmed { "dashed" } else { "solid" };
    let style = format!(
        "display: inline-flex; align-items: center; gap: 6px; padding: 4px 10px; \
         border: 1px {border_style} {border}; border-radius: 999px; background: transparent; \
         color: inherit; cursor: pointer; opacity: {opacity}; font-size: 13px;"
    );
    let swatch = format!(
        "width: 10px; height: 10px; border-radius: 50%; background: {};",
        props.color
    );

    rsx! {
        button {
            style: "{style}",
            "aria-pressed": "{props.active}",
            onclick: move |_| props.on_toggle.call(()),
            if !props.color.is_empty() {
                span { style: "{swatch}" }
            }
            "{props.label}"
        }
    }
}
