//! Arrivals & Exchange Rates
//!
//! Arrival volumes (manifest, estimated, UL tests) on an upper grid and
//! USD/LBP rates on a lower grid, sharing one month axis.
//!
//! Data flow:
//! 1. The arrivals CSV is embedded in `dash-core` and parsed on mount into
//!    the master dataset, then segmented into phases.
//! 2. The current view (single phase, or all phases with hidden phases
//!    blanked) is a memo over the selection and visibility signals.
//! 3. The chart is mounted once the container exists and remounted on theme
//!    change; every view or toggle change rebuilds the ECharts option.

use dash_chart_ui::components::{
    ChartContainer, ChartHeader, DisplayToggles, ErrorDisplay, ExportButton, ExportStatus,
    LoadingSpinner, PhaseSelector, PhaseToggles, PointReadoutView, SummaryCards,
};
use dash_chart_ui::js_bridge::{self, ChartHandle, EchartsBridge};
use dash_chart_ui::options::{arrivals_option, display_index, ChartContext};
use dash_chart_ui::state::AppState;
use dash_core::dataset::MasterDataset;
use dash_core::phase_definition::{provider_cutover_index, PHASE_DEFINITIONS};
use dash_core::series::SeriesKey;
use dash_data::phase::{segment_phases, Phase, PhaseBoundaryTable, PhaseTable};
use dash_data::readout::PointReadout;
use dash_data::summary::summary_cards;
use dash_data::visibility::DifferenceOverlayKind;
use dioxus::prelude::*;

/// DOM id for the chart container div.
const CHART_CONTAINER_ID: &str = "arrivals-chart";
const EXPORT_FILE_NAME: &str = "arrivals-exchange-rates.png";
const MOUNT_RETRY_MS: i32 = 100;
const MAX_MOUNT_ATTEMPTS: u32 = 100;

const CARD_SERIES: [SeriesKey; 5] = [
    SeriesKey::Manifest,
    SeriesKey::Estimated,
    SeriesKey::UlTests,
    SeriesKey::MarketRate,
    SeriesKey::SayrafaRate,
];

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("arrivals-root"))
        .launch(App);
}

/// Everything derived once from the compiled dataset.
#[derive(Clone, PartialEq)]
struct Prepared {
    table: PhaseTable,
    cutover: Option<usize>,
}

fn prepare() -> Result<Prepared, String> {
    let dataset = MasterDataset::compiled().map_err(|e| e.to_string())?;
    let boundaries = PhaseBoundaryTable::compiled(dataset.len()).map_err(|e| e.to_string())?;
    let table = segment_phases(&dataset, &boundaries).map_err(|e| e.to_string())?;
    let cutover = provider_cutover_index(dataset.months());
    if cutover.is_none() {
        log::warn!("provider cutover month is outside the dataset");
    }
    log::info!(
        "loaded {} months in {} phases",
        dataset.len(),
        table.phases().len()
    );
    Ok(Prepared { table, cutover })
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let mut prepared: Signal<Option<Prepared>> = use_signal(|| None);
    let mut chart: Signal<Option<ChartHandle<EchartsBridge>>> = use_signal(|| None);
    let mount_attempt = use_signal(|| 0u32);
    let mut export_status = use_signal(ExportStatus::default);

    let view: Memo<Option<Result<Phase, String>>> = use_memo(move || {
        let selection = (state.selection)();
        let visibility = (state.visibility)();
        prepared.read().as_ref().map(|p| {
            p.table
                .view(&selection, &visibility)
                .map_err(|e| e.to_string())
        })
    });

    // ─── Effect 1: Parse the compiled dataset once on mount ───
    use_effect(move || {
        match prepare() {
            Ok(p) => prepared.set(Some(p)),
            Err(e) => {
                log::error!("failed to prepare arrivals data: {e}");
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
        // The old instance is disposed before the new one is created.
        chart.set(None);
        match ChartHandle::mount(EchartsBridge::new(), CHART_CONTAINER_ID, theme) {
            Some(handle) => {
                handle.on_point_click(move |clicked| {
                    let len = match &*view.peek() {
                        Some(Ok(v)) => v.len(),
                        _ => return,
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
        let Some(handle) = handle.as_ref() else {
            return;
        };
        let Some(Ok(current)) = view() else {
            return;
        };
        let cutover = prepared.read().as_ref().and_then(|p| p.cutover);
        let ctx = ChartContext {
            theme: handle.theme(),
            rtl: (state.rtl)(),
            selected: (state.selected_index)(),
        };
        match arrivals_option(&current, &(state.visibility)(), cutover, &ctx) {
            Ok(option) => handle.set_option(&option),
            Err(e) => {
                log::error!("failed to build arrivals chart: {e}");
                state.error_msg.set(Some(e.to_string()));
            }
        }
    });

    let on_export = move |_| {
        let status = match chart.read().as_ref() {
            Some(handle) => match handle.export_png(EXPORT_FILE_NAME) {
                Ok(path) => {
                    log::info!("exported chart via {path:?}");
                    ExportStatus::Done(format!("Saved {EXPORT_FILE_NAME}"))
                }
                Err(e) => ExportStatus::Error(e.to_string()),
            },
            None => ExportStatus::Error("The chart is not ready yet.".to_string()),
        };
        export_status.set(status);
    };

    let (background, foreground) = (state.theme)().page_colors();
    let dir = if (state.rtl)() { "rtl" } else { "ltr" };
    let visibility = (state.visibility)();
    let current = match view() {
        Some(Ok(v)) => Some(v),
        Some(Err(e)) => {
            log::debug!("no view: {e}");
            None
        }
        None => None,
    };

    // ─── Render ───
    rsx! {
        div {
            dir: "{dir}",
            style: "max-width: 1200px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif; background: {background}; color: {foreground};",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                if let Some(current) = current {
                    ChartHeader {
                        title: format!("Arrivals & Exchange Rates: {}", current.name),
                        period: current.period.clone(),
                        unit_description: "Arrivals (upper), LBP per USD (lower)".to_string(),
                    }

                    div {
                        style: "display: flex; gap: 12px; flex-wrap: wrap; align-items: center;",
                        PhaseSelector { phases: PHASE_DEFINITIONS.to_vec() }
                        PhaseToggles { phases: PHASE_DEFINITIONS.to_vec() }
                        ExportButton { status: export_status(), on_export: on_export }
                    }

                    DisplayToggles {
                        series: SeriesKey::ALL.to_vec(),
                        overlays: DifferenceOverlayKind::ALL.to_vec(),
                        provider_transition: true,
                    }

                    SummaryCards { cards: summary_cards(&current, &visibility, &CARD_SERIES) }

                    PointReadoutView {
                        readout: (state.selected_index)().and_then(|i| PointReadout::at(&current, i)),
                        visibility: visibility.clone(),
                        on_clear: move |_| state.selected_index.set(None),
                    }
                }

                ChartContainer {
                    id: CHART_CONTAINER_ID.to_string(),
                    loading: chart.read().is_none(),
                    min_height: 640,
                }

                p {
                    style: "font-size: 11px; opacity: 0.7; text-align: center; margin-top: 4px;",
                    "Market rate shown by magnitude against the 1515 LBP official peg. Hidden phases appear as gaps."
                }
            }
        }
    }
}
