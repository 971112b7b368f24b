//! Text rendering of the summary cards for the compiled dataset.

use anyhow::Context;
use dash_core::dataset::MasterDataset;
use dash_core::series::SeriesKey;
use dash_data::phase::{segment_phases, Phase, PhaseBoundaryTable, PhaseSelection};
use dash_data::summary::{devaluation_percent, extrema, summary_cards};
use dash_data::visibility::VisibilityState;
use log::info;

/// Render one phase as the lines the dashboard cards would show.
pub fn render_phase(phase: &Phase) -> Vec<String> {
    let mut lines = vec![format!("{} ({})", phase.name, phase.period)];
    for card in summary_cards(phase, &VisibilityState::new(), &SeriesKey::ALL) {
        lines.push(format!("  {:<20} {}", card.label, card.display_value()));
    }
    let market = phase.series(SeriesKey::MarketRate);
    if let Ok(range) = extrema(market) {
        let devaluation = devaluation_percent(&range)
            .map_or_else(|| "N/A".to_string(), |pct| format!("{pct:.1}%"));
        lines.push(format!(
            "  {:<20} {} .. {} LBP, devaluation {devaluation}",
            "Market range", range.min, range.max
        ));
    }
    lines
}

pub fn summary_lines(phase: Option<&str>) -> anyhow::Result<Vec<String>> {
    let dataset = MasterDataset::compiled().context("compiled dataset is invalid")?;
    let boundaries =
        PhaseBoundaryTable::compiled(dataset.len()).context("compiled phase table is invalid")?;
    let table = segment_phases(&dataset, &boundaries)?;

    let selected: Vec<&Phase> = match phase {
        Some(id) => {
            let selection = PhaseSelection::Phase(id.to_string());
            let found = table
                .get(&selection)
                .with_context(|| format!("unknown phase {id:?}"))?;
            vec![found]
        }
        None => table.phases().iter().chain([table.all()]).collect(),
    };
    info!("Summarising {} phase(s)", selected.len());
    Ok(selected.into_iter().flat_map(render_phase).collect())
}

pub fn run_summary(phase: Option<&str>) -> anyhow::Result<()> {
    for line in summary_lines(phase)? {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_for_phase2() {
        let lines = summary_lines(Some("phase2")).unwrap();
        assert_eq!(lines[0], "Phase 2 (01-07-2021 to 09-01-2022)");
        assert!(lines.iter().any(|l| l.contains("Manifest") && l.ends_with("1,390,771")));
        assert!(lines.iter().any(|l| l.contains("Market Rate") && l.ends_with("21,496 LBP")));
        assert!(lines.iter().any(|l| l.contains("devaluation 60.8%")));
    }

    #[test]
    fn test_summary_all_phases() {
        let lines = summary_lines(None).unwrap();
        let headers: Vec<&String> = lines.iter().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[3], "All Phases (01-07-2020 to 28-02-2022)");
        // No Sayrafa data before July 2021.
        assert!(lines[1..8].iter().any(|l| l.contains("Sayrafa Rate") && l.ends_with("N/A")));
    }

    #[test]
    fn test_unknown_phase() {
        assert!(summary_lines(Some("phase9")).is_err());
    }
}
