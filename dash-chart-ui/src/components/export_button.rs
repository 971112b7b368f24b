//! PNG export button with status feedback.

use dioxus::prelude::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExportStatus {
    #[default]
    Idle,
    Done(String),
    Error(String),
}

#[derive(Props, Clone, PartialEq)]
pub struct ExportButtonProps {
    pub status: ExportStatus,
    pub on_export: EventHandler<()>,
}

#[component]
pub fn ExportButton(props: ExportButtonProps) -> Element {
    let feedback = match &props.status {
        ExportStatus::Idle => None,
        ExportStatus::Done(message) => Some(("#15803d", message.clone())),
        ExportStatus::Error(err) => Some(("#C62828", err.clone())),
    };

    rsx! {
        div {
            style: "display: inline-flex; gap: 8px; align-items: center;",
            button {
                style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #d1d5db; cursor: pointer; background: #2563eb; color: white;",
                onclick: move |_| props.on_export.call(()),
                "Export PNG"
            }
            if let Some((color, message)) = feedback {
                span { style: "font-size: 12px; color: {color};", "{message}" }
            }
        }
    }
}
