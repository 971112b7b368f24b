//! Shared Dioxus components and ECharts bridge for the dashboard pages.
//!
//! This crate provides:
//! - `js_bridge`: the chart engine seam and an RAII handle per mounted chart
//! - `options`: declarative ECharts option builders (pure, testable natively)
//! - `theme`: the light/dark palette passed down explicitly
//! - `state`: reactive AppState with Dioxus Signals
//! - `components`: reusable RSX components (toggles, cards, containers, ...)

pub mod components;
pub mod js_bridge;
pub mod options;
pub mod state;
pub mod theme;
