//! ECharts option builders.
//!
//! Each page describes its chart as one JSON option built here from the
//! current view and toggles. Nothing in this module touches the DOM, so the
//! options are tested natively.

use crate::theme::Theme;
use dash_core::series::{Series, SeriesKey};
use dash_data::derived::{overlay_for, transition_for};
use dash_data::error::SeriesError;
use dash_data::phase::Phase;
use dash_data::share::Share;
use dash_data::visibility::{DifferenceOverlayKind, VisibilityState};
use dash_utils::numbers::format_thousands;
use serde_json::{json, Value};

/// Official USD/LBP peg, drawn as a reference line on rate charts.
pub const OFFICIAL_PEG_LBP: f64 = 1515.0;

const HIGHLIGHT_COLOR: &str = "#CCFF00";
const PAYER_COLORS: [&str; 3] = ["#FF6B6B", "#4ECDC4", "#45B7D1"];
const EXPENSE_COLORS: [&str; 4] = ["#96CEB4", "#FFEAA7", "#DDA0DD", "#98D8C8"];

/// Display settings shared by the builders.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartContext {
    pub theme: Theme,
    pub rtl: bool,
    /// Pinned point as an index into the view.
    pub selected: Option<usize>,
}

/// Map between view order and display order. The mapping is its own inverse.
pub fn display_index(index: usize, len: usize, rtl: bool) -> usize {
    if rtl && index < len {
        len - 1 - index
    } else {
        index
    }
}

fn ordered(series: &Series, rtl: bool) -> Series {
    if rtl {
        series.reversed()
    } else {
        series.clone()
    }
}

/// Series data, or an empty list when hidden so the legend entry stays.
fn data(series: &Series, visible: bool) -> Value {
    if visible {
        json!(series.readings())
    } else {
        json!([])
    }
}

fn line(name: &str, data: Value, color: &str, axis: usize) -> Value {
    json!({
        "name": name,
        "type": "line",
        "xAxisIndex": axis,
        "yAxisIndex": axis,
        "data": data,
        "smooth": axis == 0,
        "connectNulls": false,
        "lineStyle": { "width": if axis == 0 { 3 } else { 2 } },
        "itemStyle": { "color": color },
        "areaStyle": { "opacity": 0.1, "color": color },
        "emphasis": { "focus": "series" },
    })
}

fn peg_mark_line() -> Value {
    json!({
        "silent": true,
        "symbol": "none",
        "lineStyle": { "color": HIGHLIGHT_COLOR, "width": 2, "type": "solid" },
        "data": [{
            "yAxis": OFFICIAL_PEG_LBP,
            "label": { "show": true, "position": "insideEndTop", "formatter": "1515 LBP" },
        }],
    })
}

/// An invisible carrier series holding the vertical line at the pinned month.
fn selected_marker(month: &str, axis: usize) -> Value {
    json!({
        "name": "Selected Month",
        "type": "line",
        "xAxisIndex": axis,
        "yAxisIndex": axis,
        "data": [],
        "silent": true,
        "showSymbol": false,
        "lineStyle": { "opacity": 0 },
        "markLine": {
            "symbol": "none",
            "animation": false,
            "lineStyle": { "color": HIGHLIGHT_COLOR, "width": 2, "type": "solid" },
            "label": { "show": false },
            "data": [{ "xAxis": month }],
        },
    })
}

fn overlay_axis(kind: DifferenceOverlayKind) -> usize {
    match kind {
        DifferenceOverlayKind::MarketSayrafa => 1,
        _ => 0,
    }
}

/// Stacked pair: an invisible base line at the lower series, then the gap
/// filled above it.
fn overlay_series(
    view: &Phase,
    kind: DifferenceOverlayKind,
    ctx: &ChartContext,
) -> Result<[Value; 2], SeriesError> {
    let overlay = overlay_for(view, kind)?;
    let axis = overlay_axis(kind);
    let stack = format!("{kind:?}");
    let color = ctx.theme.overlay_color(kind);
    let base = json!({
        "name": overlay.base.name(),
        "type": "line",
        "xAxisIndex": axis,
        "yAxisIndex": axis,
        "stack": stack,
        "data": ordered(&overlay.base, ctx.rtl).readings(),
        "connectNulls": false,
        "showSymbol": false,
        "silent": true,
        "lineStyle": { "opacity": 0 },
        "tooltip": { "show": false },
    });
    let diff = json!({
        "name": overlay.diff.name(),
        "type": "line",
        "xAxisIndex": axis,
        "yAxisIndex": axis,
        "stack": stack,
        "data": ordered(&overlay.diff, ctx.rtl).readings(),
        "connectNulls": false,
        "showSymbol": false,
        "lineStyle": { "width": 0 },
        "itemStyle": { "color": color },
        "areaStyle": { "opacity": 0.35, "color": color },
    });
    Ok([base, diff])
}

fn value_axis(name: &str, grid: usize, rtl: bool) -> Value {
    json!({
        "gridIndex": grid,
        "type": "value",
        "name": name,
        "position": if rtl { "right" } else { "left" },
        "splitLine": { "show": true, "lineStyle": { "type": "dashed", "opacity": 0.3 } },
    })
}

fn grid(rtl: bool, top: Value, bottom: &str) -> Value {
    json!({
        "left": if rtl { "4%" } else { "10%" },
        "right": if rtl { "10%" } else { "4%" },
        "top": top,
        "bottom": bottom,
    })
}

fn data_zoom(axes: Value) -> Value {
    json!([
        { "type": "inside", "xAxisIndex": axes, "start": 0, "end": 100 },
        { "type": "slider", "xAxisIndex": axes, "start": 0, "end": 100, "height": 40, "bottom": 10 },
    ])
}

fn pinned_month(view: &Phase, ctx: &ChartContext) -> Option<String> {
    ctx.selected
        .and_then(|i| view.months.get(i))
        .map(|m| m.to_string())
}

/// The arrivals page: arrival volumes on the upper grid, exchange rates on
/// the lower grid, sharing one month axis.
///
/// `master_cutover` is the master index of the test-provider cutover month;
/// the provider transition is only drawn when it is known.
pub fn arrivals_option(
    view: &Phase,
    visibility: &VisibilityState,
    master_cutover: Option<usize>,
    ctx: &ChartContext,
) -> Result<Value, SeriesError> {
    let rtl = ctx.rtl;
    let display = if rtl { view.reversed() } else { view.clone() };
    let months: Vec<String> = display.months.iter().map(|m| m.to_string()).collect();
    let shown = |key: SeriesKey| visibility.is_series_visible(key);
    let color = |key: SeriesKey| ctx.theme.series_color(key);

    let mut series = vec![
        line(
            SeriesKey::Manifest.label(),
            data(display.series(SeriesKey::Manifest), shown(SeriesKey::Manifest)),
            color(SeriesKey::Manifest),
            0,
        ),
        line(
            SeriesKey::Estimated.label(),
            data(display.series(SeriesKey::Estimated), shown(SeriesKey::Estimated)),
            color(SeriesKey::Estimated),
            0,
        ),
    ];

    match master_cutover {
        Some(cutover) if visibility.is_provider_transition_enabled() => {
            let transition = transition_for(view, cutover)?;
            series.push(line(
                SeriesKey::UlTests.label(),
                data(&ordered(&transition.before_segment, rtl), shown(SeriesKey::UlTests)),
                color(SeriesKey::UlTests),
                0,
            ));
            let mut after = line(
                SeriesKey::SecondaryProvider.label(),
                data(
                    &ordered(&transition.after_segment, rtl),
                    shown(SeriesKey::SecondaryProvider),
                ),
                color(SeriesKey::SecondaryProvider),
                0,
            );
            after["lineStyle"]["type"] = json!("dashed");
            series.push(after);
        }
        _ => series.push(line(
            SeriesKey::UlTests.label(),
            data(display.series(SeriesKey::UlTests), shown(SeriesKey::UlTests)),
            color(SeriesKey::UlTests),
            0,
        )),
    }

    let mut market = line(
        SeriesKey::MarketRate.label(),
        data(
            &display.series(SeriesKey::MarketRate).magnitude(),
            shown(SeriesKey::MarketRate),
        ),
        color(SeriesKey::MarketRate),
        1,
    );
    market["areaStyle"]["opacity"] = json!(0.3);
    market["markLine"] = peg_mark_line();
    series.push(market);
    series.push(line(
        SeriesKey::SayrafaRate.label(),
        data(display.series(SeriesKey::SayrafaRate), shown(SeriesKey::SayrafaRate)),
        color(SeriesKey::SayrafaRate),
        1,
    ));

    for kind in DifferenceOverlayKind::ALL {
        if visibility.is_overlay_active(kind) {
            series.extend(overlay_series(view, kind, ctx)?);
        }
    }

    if let Some(month) = pinned_month(view, ctx) {
        series.push(selected_marker(&month, 0));
        series.push(selected_marker(&month, 1));
    }

    let legend: Vec<&str> = series
        .iter()
        .filter_map(|s| s["name"].as_str())
        .filter(|name| *name != "Selected Month" && !name.ends_with("(base)"))
        .collect();

    let mut rate_axis = value_axis("Market Rate", 1, rtl);
    rate_axis["min"] = json!(OFFICIAL_PEG_LBP);

    Ok(json!({
        "tooltip": { "trigger": "axis", "axisPointer": { "type": "cross" } },
        "legend": { "data": legend, "top": 10 },
        "axisPointer": {
            "link": [{ "xAxisIndex": [0, 1] }],
            "triggerOn": "mousemove|click",
            "lineStyle": { "type": "solid", "width": 2, "color": HIGHLIGHT_COLOR },
        },
        "grid": [grid(rtl, json!(80), "55%"), grid(rtl, json!("55%"), "15%")],
        "xAxis": [
            {
                "gridIndex": 0,
                "type": "category",
                "boundaryGap": false,
                "data": months,
                "axisLabel": { "show": false },
            },
            {
                "gridIndex": 1,
                "type": "category",
                "boundaryGap": false,
                "data": months,
                "axisLabel": { "rotate": 45 },
            },
        ],
        "yAxis": [
            value_axis("Arrivals", 0, rtl),
            rate_axis,
        ],
        "dataZoom": data_zoom(json!([0, 1])),
        "series": series,
    }))
}

/// The exchange-rate page: market rate magnitudes on an inverted value axis,
/// so devaluation reads as the line falling away from the top.
pub fn rates_option(view: &Phase, visibility: &VisibilityState, ctx: &ChartContext) -> Value {
    let display = if ctx.rtl { view.reversed() } else { view.clone() };
    let months: Vec<String> = display.months.iter().map(|m| m.to_string()).collect();
    let key = SeriesKey::MarketRate;

    let mut market = line(
        "USD to LBP Rate",
        data(&display.series(key).magnitude(), visibility.is_series_visible(key)),
        ctx.theme.series_color(key),
        0,
    );
    market["smooth"] = json!(false);
    market["areaStyle"]["opacity"] = json!(0.3);
    market["markLine"] = peg_mark_line();

    let mut series = vec![market];
    if let Some(month) = pinned_month(view, ctx) {
        series.push(selected_marker(&month, 0));
    }

    let mut rate_axis = value_axis("LBP per USD", 0, ctx.rtl);
    rate_axis["inverse"] = json!(true);
    rate_axis["min"] = json!(0);

    json!({
        "tooltip": { "trigger": "axis" },
        "grid": [grid(ctx.rtl, json!(60), "20%")],
        "xAxis": [{
            "type": "category",
            "boundaryGap": false,
            "data": months,
            "axisLabel": { "rotate": 45 },
        }],
        "yAxis": [rate_axis],
        "dataZoom": data_zoom(json!([0])),
        "series": series,
    })
}

/// Legend entry of a slice, e.g. "Airlines: 65%". Doubles as the slice name
/// since legend text can only be the name.
fn legend_name(share: &Share) -> String {
    format!("{}: {}%", share.name, share.percent)
}

/// Slices carry their own pre-formatted label and tooltip so amounts get
/// thousands separators.
fn pie(name: &str, shares: &[Share], radius: [&str; 2], colors: &[&str]) -> Value {
    let data: Vec<Value> = shares
        .iter()
        .map(|s| {
            let amount = format_thousands(s.value);
            json!({
                "name": legend_name(s),
                "value": s.value,
                "label": { "formatter": format!("{}\n${amount}\n({}%)", s.name, s.percent) },
                "tooltip": {
                    "formatter": format!("{name}<br/>{}: ${amount} ({}%)", s.name, s.percent),
                },
            })
        })
        .collect();
    json!({
        "name": name,
        "type": "pie",
        "radius": radius,
        "center": ["50%", "50%"],
        "data": data,
        "label": { "show": true, "position": "outside", "fontSize": 11 },
        "labelLine": { "show": true, "length": 15, "length2": 10 },
        "itemStyle": { "borderRadius": 5, "borderColor": "#fff", "borderWidth": 2 },
        "color": colors,
    })
}

fn flow_legend(shares: &[Share], side: &str) -> Value {
    let names: Vec<String> = shares.iter().map(legend_name).collect();
    let mut legend = json!({
        "orient": "vertical",
        "top": "bottom",
        "data": names,
        "textStyle": { "fontSize": 12 },
    });
    legend[side] = json!(side);
    legend
}

fn side_caption(text: &str, side: &str, color: &str) -> Value {
    let mut caption = json!({
        "type": "text",
        "top": "80%",
        "style": { "text": text, "fontSize": 18, "fontWeight": "bold", "fill": color },
    });
    caption[side] = json!("5%");
    caption
}

/// The financial-flow page: payers as the inner pie, expense types as the
/// outer ring, each with its own legend ("IN" on the left, "OUT" on the
/// right).
pub fn flows_option(payers: &[Share], expenses: &[Share], theme: Theme) -> Value {
    let (_, text) = theme.page_colors();
    json!({
        "tooltip": { "trigger": "item" },
        "textStyle": { "color": text },
        "legend": [flow_legend(payers, "left"), flow_legend(expenses, "right")],
        "graphic": [side_caption("IN", "left", text), side_caption("OUT", "right", text)],
        "series": [
            pie("Payer (Debit)", payers, ["0%", "30%"], &PAYER_COLORS),
            pie("Expense Type (Credit)", expenses, ["40%", "70%"], &EXPENSE_COLORS),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::dataset::MasterDataset;
    use dash_core::financial_flow::{FinancialFlows, FlowGroup};
    use dash_core::phase_definition::provider_cutover_index;
    use dash_data::phase::{segment_phases, PhaseBoundaryTable, PhaseSelection, PhaseTable};
    use dash_data::share::shares;

    fn table() -> (PhaseTable, usize) {
        let dataset = MasterDataset::compiled().unwrap();
        let boundaries = PhaseBoundaryTable::compiled(dataset.len()).unwrap();
        let cutover = provider_cutover_index(dataset.months()).unwrap();
        (segment_phases(&dataset, &boundaries).unwrap(), cutover)
    }

    fn phase(table: &PhaseTable, id: &str) -> Phase {
        table
            .view(&PhaseSelection::Phase(id.to_string()), &VisibilityState::new())
            .unwrap()
    }

    fn named<'a>(option: &'a Value, name: &str) -> &'a Value {
        option["series"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == name)
            .unwrap_or_else(|| panic!("no series named {name}"))
    }

    #[test]
    fn test_display_index_is_involution() {
        assert_eq!(display_index(0, 5, true), 4);
        assert_eq!(display_index(display_index(1, 5, true), 5, true), 1);
        assert_eq!(display_index(2, 5, false), 2);
    }

    #[test]
    fn test_arrivals_hidden_series_keeps_legend_entry() {
        let (table, cutover) = table();
        let view = phase(&table, "phase2");
        let mut visibility = VisibilityState::new();
        visibility.toggle_series(SeriesKey::Manifest);
        let option =
            arrivals_option(&view, &visibility, Some(cutover), &ChartContext::default()).unwrap();
        assert_eq!(named(&option, "Manifest")["data"], json!([]));
        assert!(option["legend"]["data"]
            .as_array()
            .unwrap()
            .contains(&json!("Manifest")));
        assert_eq!(named(&option, "Estimated")["data"].as_array().unwrap().len(), 7);
    }

    #[test]
    fn test_arrivals_peg_line_and_rate_axis() {
        let (table, cutover) = table();
        let option = arrivals_option(
            table.all(),
            &VisibilityState::new(),
            Some(cutover),
            &ChartContext::default(),
        )
        .unwrap();
        let market = named(&option, "Market Rate");
        assert_eq!(market["markLine"]["data"][0]["yAxis"], json!(1515.0));
        assert_eq!(market["yAxisIndex"], json!(1));
        assert_eq!(option["yAxis"][1]["min"], json!(1515.0));
        assert!(market["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|v| v.as_f64().map_or(true, |x| x >= 0.0)));
    }

    #[test]
    fn test_arrivals_overlay_is_stacked() {
        let (table, cutover) = table();
        let view = phase(&table, "phase2");
        let mut visibility = VisibilityState::new();
        visibility.toggle_overlay(DifferenceOverlayKind::ManifestEstimated);
        let option =
            arrivals_option(&view, &visibility, Some(cutover), &ChartContext::default()).unwrap();
        let base = named(&option, "Δ Estimated vs Manifest (base)");
        let diff = named(&option, "Δ Estimated vs Manifest");
        assert_eq!(base["stack"], diff["stack"]);
        assert!(diff["data"]
            .as_array()
            .unwrap()
            .iter()
            .all(|v| v.as_f64().map_or(true, |x| x >= 0.0)));
        assert!(!option["legend"]["data"]
            .as_array()
            .unwrap()
            .contains(&json!("Δ Estimated vs Manifest (base)")));
    }

    #[test]
    fn test_arrivals_overlay_skipped_when_series_hidden() {
        let (table, cutover) = table();
        let view = phase(&table, "phase2");
        let mut visibility = VisibilityState::new();
        visibility.toggle_overlay(DifferenceOverlayKind::MarketSayrafa);
        visibility.toggle_series(SeriesKey::SayrafaRate);
        let option =
            arrivals_option(&view, &visibility, Some(cutover), &ChartContext::default()).unwrap();
        assert!(!option["series"]
            .as_array()
            .unwrap()
            .iter()
            .any(|s| s["name"] == "Δ Market vs Sayrafa"));
    }

    #[test]
    fn test_arrivals_provider_transition_segments() {
        let (table, cutover) = table();
        let view = table.all().clone();
        let mut visibility = VisibilityState::new();
        visibility.toggle_provider_transition();
        let option =
            arrivals_option(&view, &visibility, Some(cutover), &ChartContext::default()).unwrap();
        let before = named(&option, "UL")["data"].as_array().unwrap().clone();
        let after = named(&option, "Secondary Provider")["data"].as_array().unwrap().clone();
        for (i, (b, a)) in before.iter().zip(&after).enumerate() {
            if i == cutover {
                assert_eq!(b, a);
                assert!(b.is_number());
            } else {
                assert!(b.is_null() || a.is_null(), "both segments at {i}");
            }
        }
    }

    #[test]
    fn test_arrivals_hidden_phase_has_no_transition_point() {
        let (table, cutover) = table();
        let mut visibility = VisibilityState::new();
        visibility.toggle_phase("phase2");
        visibility.toggle_provider_transition();
        let view = table.view(&PhaseSelection::All, &visibility).unwrap();
        let option =
            arrivals_option(&view, &visibility, Some(cutover), &ChartContext::default()).unwrap();
        assert!(named(&option, "UL")["data"][cutover].is_null());
        assert!(named(&option, "Secondary Provider")["data"][cutover].is_null());
    }

    #[test]
    fn test_arrivals_rtl_reverses_months() {
        let (table, cutover) = table();
        let view = phase(&table, "phase2");
        let ctx = ChartContext {
            rtl: true,
            ..Default::default()
        };
        let option = arrivals_option(&view, &VisibilityState::new(), Some(cutover), &ctx).unwrap();
        assert_eq!(option["xAxis"][0]["data"][0], json!("Jan-22"));
        assert_eq!(option["yAxis"][0]["position"], json!("right"));
        let manifest = named(&option, "Manifest")["data"].as_array().unwrap().clone();
        let expected = view.series(SeriesKey::Manifest).readings().last().copied();
        assert_eq!(manifest.first(), Some(&json!(expected.unwrap())));
    }

    #[test]
    fn test_selected_month_marker() {
        let (table, cutover) = table();
        let view = phase(&table, "phase2");
        let ctx = ChartContext {
            selected: Some(2),
            ..Default::default()
        };
        let option = arrivals_option(&view, &VisibilityState::new(), Some(cutover), &ctx).unwrap();
        let markers: Vec<&Value> = option["series"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|s| s["name"] == "Selected Month")
            .collect();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0]["markLine"]["data"][0]["xAxis"], json!("Sep-21"));
    }

    #[test]
    fn test_rates_axis_is_inverted() {
        let (table, _) = table();
        let option = rates_option(table.all(), &VisibilityState::new(), &ChartContext::default());
        assert_eq!(option["yAxis"][0]["inverse"], json!(true));
        let data = option["series"][0]["data"].as_array().unwrap();
        assert_eq!(data.len(), table.all().len());
        assert!(data.iter().all(|v| v.as_f64().map_or(true, |x| x > 0.0)));
    }

    #[test]
    fn test_flows_two_pies() {
        let flows = FinancialFlows::compiled().unwrap();
        let payers = shares(&flows.group(FlowGroup::Payers));
        let expenses = shares(&flows.group(FlowGroup::Expenses));
        let option = flows_option(&payers, &expenses, Theme::Light);
        assert_eq!(option["series"][0]["radius"], json!(["0%", "30%"]));
        assert_eq!(option["series"][1]["data"].as_array().unwrap().len(), 4);
        assert_eq!(option["series"][0]["data"][0]["name"], json!("Airlines: 65%"));
    }

    #[test]
    fn test_flows_amounts_use_thousands_separators() {
        let flows = FinancialFlows::compiled().unwrap();
        let payers = shares(&flows.group(FlowGroup::Payers));
        let expenses = shares(&flows.group(FlowGroup::Expenses));
        let option = flows_option(&payers, &expenses, Theme::Dark);

        let airlines = &option["series"][0]["data"][0];
        assert_eq!(airlines["label"]["formatter"], json!("Airlines\n$192,515\n(65%)"));
        assert_eq!(
            airlines["tooltip"]["formatter"],
            json!("Payer (Debit)<br/>Airlines: $192,515 (65%)")
        );
        assert_eq!(
            option["series"][1]["data"][0]["label"]["formatter"],
            json!("Treasury (MoF)\n$185,609\n(63%)")
        );
    }

    #[test]
    fn test_flows_legends_and_captions() {
        let flows = FinancialFlows::compiled().unwrap();
        let payers = shares(&flows.group(FlowGroup::Payers));
        let expenses = shares(&flows.group(FlowGroup::Expenses));
        let option = flows_option(&payers, &expenses, Theme::Light);

        assert_eq!(option["legend"][0]["left"], json!("left"));
        assert_eq!(
            option["legend"][0]["data"],
            json!(["Airlines: 65%", "American Express: 33%", "Border PCR: 2%"])
        );
        assert_eq!(option["legend"][1]["right"], json!("right"));
        assert_eq!(option["legend"][1]["data"][3], json!("Other (supplies, rent, tests..): 4%"));
        assert_eq!(option["graphic"][0]["style"]["text"], json!("IN"));
        assert_eq!(option["graphic"][1]["right"], json!("5%"));
        assert_eq!(option["graphic"][1]["style"]["text"], json!("OUT"));
    }
}
