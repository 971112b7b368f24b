//! Reusable Dioxus RSX components for the dashboard pages.

mod chart_container;
mod chart_header;
mod display_toggles;
mod error_display;
mod export_button;
mod loading_spinner;
mod phase_selector;
mod point_readout;
mod summary_cards;
mod toggle_button;

pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use display_toggles::DisplayToggles;
pub use error_display::ErrorDisplay;
pub use export_button::{ExportButton, ExportStatus};
pub use loading_spinner::LoadingSpinner;
pub use phase_selector::{PhaseSelector, PhaseToggles};
pub use point_readout::PointReadoutView;
pub use summary_cards::SummaryCards;
pub use toggle_button::ToggleButton;
