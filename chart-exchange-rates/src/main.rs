//! USD/LBP Exchange Rate
//!
//! The monthly average market rate over the same months as the arrivals
//! page, drawn on an inverted axis so the devaluation reads downward.

use dash_chart_ui::components::{
    ChartContainer, ChartHeader, DisplayToggles, ErrorDisplay, ExportButton, ExportStatus,
    LoadingSpinner, PhaseSelector, PhaseToggles, PointReadoutView, SummaryCards,
};
use dash_chart_ui::js_bridge::{self, ChartHandle, EchartsBridge};
use dash_chart_ui::options::{display_index, rates_option, ChartContext};
use dash_chart_ui::state::AppState;
use dash_core::dataset::MasterDataset;
use dash_core::phase_definition::PHASE_DEFINITIONS;
use dash_core::series::SeriesKey;
use dash_data::phase::{segment_phases, Phase, PhaseBoundaryTable, PhaseTable};
use dash_data::readout::PointReadout;
use dash_data::summary::{devaluation_percent, extrema, summary_cards};
use dash_data::visibility::VisibilityState;
use dash_utils::numbers::format_thousands;
use dioxus::prelude::*;

const CHART_CONTAINER_ID: &str = "exchange-rates-chart";
const EXPORT_FILE_NAME: &str = "usd-lbp-rates.png";
const MOUNT_RETRY_MS: i32 = 100;
const MAX_MOUNT_ATTEMPTS: u32 = 100;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("exchange-rates-root"))
        .launch(App);
}

fn load_phases() -> Result<PhaseTable, String> {
    let dataset = MasterDataset::compiled().map_err(|e| e.to_string())?;
    let boundaries = PhaseBoundaryTable::compiled(dataset.len()).map_err(|e| e.to_string())?;
    segment_phases(&dataset, &boundaries).map_err(|e| e.to_string())
}

/// Lowest, highest and devaluation cards for the visible market rate.
fn rate_cards(view: &Phase, visibility: &VisibilityState) -> Vec<(String, String)> {
    if !visibility.is_series_visible(SeriesKey::MarketRate) {
        return Vec::new();
    }
    let Ok(range) = extrema(&view.series(SeriesKey::MarketRate).magnitude()) else {
        return vec![("Devaluation".to_string(), "N/A".to_string())];
    };
    let devaluation = devaluation_percent(&range)
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "N/A".to_string());
    vec![
        ("Lowest".to_string(), format!("{} LBP", format_thousands(range.min))),
        ("Highest".to_string(), format!("{} LBP", format_thousands(range.max))),
        ("Devaluation".to_string(), devaluation),
    ]
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let mut table: Signal<Option<PhaseTable>> = use_signal(|| None);
    let mut chart: Signal<Option<ChartHandle<EchartsBridge>>> = use_signal(|| None);
    let mount_attempt = use_signal(|| 0u32);
    let mut export_status = use_signal(ExportStatus::default);

    let view: Memo<Option<Phase>> = use_memo(move || {
        let selection = (state.selection)();
        let visibility = (state.visibility)();
        let table = table.read();
        match table.as_ref()?.view(&selection, &visibility) {
            Ok(v) => Some(v),
            Err(e) => {
                log::warn!("no view for {}: {e}", selection.id());
                None
            }
        }
    });

    // ─── Effect 1: Parse the compiled dataset once on mount ───
    use_effect(move || {
        match load_phases() {
            Ok(t) => table.set(Some(t)),
            Err(e) => {
                log::error!("failed to prepare rate data: {e}");
                state.error_msg.set(Some(e));
            }
        }
        state.loading.set(false);
    });

    // ─── Effect 2: Mount the chart; remount on theme change ───
    use_effect(move || {
        let theme = (state.theme)();
        let attempt = mount_attempt();
        if (state.loading)() {
            return;
        }
        chart.set(None);
        match ChartHandle::mount(EchartsBridge::new(), CHART_CONTAINER_ID, theme) {
            Some(handle) => {
                handle.on_point_click(move |clicked| {
                    let Some(len) = view.peek().as_ref().map(Phase::len) else {
                        return;
                    };
                    let mut selected = state.selected_index;
                    selected.set(Some(display_index(clicked, len, *state.rtl.peek())));
                });
                chart.set(Some(handle));
            }
            None if attempt < MAX_MOUNT_ATTEMPTS => {
                let mut mount_attempt = mount_attempt;
                spawn(async move {
                    js_bridge::wait_ms(MOUNT_RETRY_MS).await;
                    mount_attempt += 1;
                });
            }
            None => {
                state
                    .error_msg
                    .set(Some("The chart engine did not load.".to_string()));
            }
        }
    });

    // ─── Effect 3: Rebuild the option on any view or toggle change ───
    use_effect(move || {
        let handle = chart.read();
        let (Some(handle), Some(current)) = (handle.as_ref(), view()) else {
            return;
        };
        let ctx = ChartContext {
            theme: handle.theme(),
            rtl: (state.rtl)(),
            selected: (state.selected_index)(),
        };
        handle.set_option(&rates_option(&current, &(state.visibility)(), &ctx));
    });

    let on_export = move |_| {
        let status = match chart.read().as_ref() {
            Some(handle) => match handle.export_png(EXPORT_FILE_NAME) {
                Ok(_) => ExportStatus::Done(format!("Saved {EXPORT_FILE_NAME}")),
                Err(e) => ExportStatus::Error(e.to_string()),
            },
            None => ExportStatus::Error("The chart is not ready yet.".to_string()),
        };
        export_status.set(status);
    };

    let (background, foreground) = (state.theme)().page_colors();
    let dir = if (state.rtl)() { "rtl" } else { "ltr" };
    let visibility = (state.visibility)();

    rsx! {
        div {
            dir: "{dir}",
            style: "max-width: 1100px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif; background: {background}; color: {foreground};",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                if let Some(current) = view() {
                    ChartHeader {
                        title: format!("USD to LBP Exchange Rate: {}", current.name),
                        period: current.period.clone(),
                        unit_description: "LBP per USD, inverted".to_string(),
                    }

                    div {
                        style: "display: flex; gap: 12px; flex-wrap: wrap; align-items: center;",
                        PhaseSelector { phases: PHASE_DEFINITIONS.to_vec() }
                        PhaseToggles { phases: PHASE_DEFINITIONS.to_vec() }
                        ExportButton { status: export_status(), on_export: on_export }
                    }

                    DisplayToggles { series: vec![SeriesKey::MarketRate] }

                    SummaryCards {
                        cards: summary_cards(&current, &visibility, &[SeriesKey::MarketRate]),
                        extra: rate_cards(&current, &visibility),
                    }

                    PointReadoutView {
                        readout: (state.selected_index)().and_then(|i| PointReadout::at(&current, i)),
                        visibility: visibility.clone(),
                        on_clear: move |_| state.selected_index.set(None),
                    }
                }

                ChartContainer {
                    id: CHART_CONTAINER_ID.to_string(),
                    loading: chart.read().is_none(),
                    min_height: 480,
                }
            }
        }
    }
}
