//! Financial Flow
//!
//! Who paid in (debit) and what the money was spent on (credit), drawn as an
//! inner pie and an outer ring, with the same figures as tables below.

use dash_chart_ui::components::{
    ChartContainer, ChartHeader, ErrorDisplay, ExportButton, ExportStatus, LoadingSpinner,
    ToggleButton,
};
use dash_chart_ui::js_bridge::{self, ChartHandle, EchartsBridge};
use dash_chart_ui::options::flows_option;
use dash_chart_ui::state::AppState;
use dash_chart_ui::theme::Theme;
use dash_core::financial_flow::{FinancialFlows, FlowGroup};
use dash_data::share::{shares, Share};
use dash_utils::numbers::format_thousands;
use dioxus::prelude::*;

const CHART_CONTAINER_ID: &str = "financial-flows-chart";
const EXPORT_FILE_NAME: &str = "financial-flows.png";
const MOUNT_RETRY_MS: i32 = 100;
const MAX_MOUNT_ATTEMPTS: u32 = 100;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("financial-flows-root"))
        .launch(App);
}

#[derive(Clone, PartialEq, Default)]
struct FlowShares {
    payers: Vec<Share>,
    expenses: Vec<Share>,
}

fn load_shares() -> Result<FlowShares, String> {
    let flows = FinancialFlows::compiled().map_err(|e| e.to_string())?;
    Ok(FlowShares {
        payers: shares(&flows.group(FlowGroup::Payers)),
        expenses: shares(&flows.group(FlowGroup::Expenses)),
    })
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let mut flow_shares: Signal<FlowShares> = use_signal(FlowShares::default);
    let mut chart: Signal<Option<ChartHandle<EchartsBridge>>> = use_signal(|| None);
    let mount_attempt = use_signal(|| 0u32);
    let mut export_status = use_signal(ExportStatus::default);

    // ─── Effect 1: Parse the compiled flows once on mount ───
    use_effect(move || {
        match load_shares() {
            Ok(s) => flow_shares.set(s),
            Err(e) => {
                log::error!("failed to load financial flows: {e}");
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
            Some(handle) => chart.set(Some(handle)),
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

    // ─── Effect 3: Draw the pies ───
    use_effect(move || {
        let handle = chart.read();
        let Some(handle) = handle.as_ref() else {
            return;
        };
        let s = flow_shares.read();
        handle.set_option(&flows_option(&s.payers, &s.expenses, handle.theme()));
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

    let theme = (state.theme)();
    let (background, foreground) = theme.page_colors();
    let s = flow_shares();

    rsx! {
        div {
            style: "max-width: 1200px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif; background: {background}; color: {foreground};",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                ChartHeader { title: "Financial Flow".to_string() }

                div {
                    style: "display: flex; gap: 12px; align-items: center;",
                    ToggleButton {
                        label: "Dark mode".to_string(),
                        active: theme == Theme::Dark,
                        on_toggle: move |_| state.theme.set(theme.toggled()),
                    }
                    ExportButton { status: export_status(), on_export: on_export }
                }

                div {
                    style: "display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 24px; margin: 12px 0;",
                    ShareTable { title: FlowGroup::Payers.title().to_string(), column: "Debit".to_string(), rows: s.payers.clone() }
                    ShareTable { title: FlowGroup::Expenses.title().to_string(), column: "Credit".to_string(), rows: s.expenses.clone() }
                }

                ChartContainer {
                    id: CHART_CONTAINER_ID.to_string(),
                    loading: chart.read().is_none(),
                    min_height: 560,
                }
            }
        }
    }
}

/// One flow group as a table of amount and share.
#[component]
fn ShareTable(title: String, column: String, rows: Vec<Share>) -> Element {
    let total = format_thousands(rows.iter().map(|r| r.value).sum());
    let lines: Vec<(String, String, i64)> = rows
        .iter()
        .map(|r| (r.name.clone(), format_thousands(r.value), r.percent))
        .collect();
    rsx! {
        div {
            h4 { style: "margin: 0 0 8px 0;", "{title}" }
            table {
                style: "width: 100%; border-collapse: collapse; font-size: 13px;",
                thead {
                    tr {
                        th { style: "text-align: start;", "Name" }
                        th { style: "text-align: end;", "{column}" }
                        th { style: "text-align: end;", "Percentage" }
                    }
                }
                tbody {
                    for (name, amount, percent) in lines {
                        tr {
                            key: "{name}",
                            td { "{name}" }
                            td { style: "text-align: end;", "${amount}" }
                            td { style: "text-align: end;", "{percent}%" }
                        }
                    }
                    tr {
                        style: "font-weight: bold;",
                        td { "Total" }
                        td { style: "text-align: end;", "${total}" }
                        td { style: "text-align: end;", "100%" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_shares() {
        let s = load_shares().unwrap();
        assert_eq!(s.payers.len(), 3);
        assert_eq!(s.expenses.len(), 4);
        assert_eq!(s.payers[0].name, "Airlines");
        assert_eq!(s.payers[0].percent, 65);
    }
}
