//! Hand-authored phase table over the compiled month axis.
//!
//! Each phase is a contiguous run of months during which one data
//! collection regime applied. These indices are the only place the phase
//! cutoffs are written down; slicing and masking both derive from them.

use crate::month::MonthLabel;
use serde::Serialize;

/// Identifier of the synthetic view that combines every phase.
pub const ALL_PHASES_ID: &str = "all";

/// Display name of the combined view.
pub const ALL_PHASES_NAME: &str = "All Phases";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhaseDefinition {
    pub id: &'static str,
    pub name: &'static str,
    /// Human-readable day range, "DD-MM-YYYY to DD-MM-YYYY".
    pub period: &'static str,
    /// First month index, inclusive.
    pub start: usize,
    /// One past the last month index.
    pub end: usize,
}

/// Phases of the compiled dataset (Jul-20 .. Feb-22).
///
/// Phase 2 ends on 09-01-2022 and phase 3 starts on 10-01-2022, so January
/// 2022 is split mid-month; monthly data assigns it to phase 2.
pub const PHASE_DEFINITIONS: [PhaseDefinition; 3] = [
    PhaseDefinition {
        id: "phase1",
        name: "Phase 1",
        period: "01-07-2020 to 30-06-2021",
        start: 0,
        end: 12,
    },
    PhaseDefinition {
        id: "phase2",
        name: "Phase 2",
        period: "01-07-2021 to 09-01-2022",
        start: 12,
        end: 19,
    },
    PhaseDefinition {
        id: "phase3",
        name: "Phase 3",
        period: "10-01-2022 to 28-02-2022",
        start: 19,
        end: 20,
    },
];

/// Month in which the secondary provider took over test reporting from the
/// original authority. Both reported partial figures that month.
pub const PROVIDER_CUTOVER_MONTH: &str = "Jan-22";

/// Resolve the provider cutover month to an index on `months`.
pub fn provider_cutover_index(months: &[MonthLabel]) -> Option<usize> {
    let cutover: MonthLabel = PROVIDER_CUTOVER_MONTH.parse().ok()?;
    months.iter().position(|m| *m == cutover)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::MasterDataset;

    #[test]
    fn test_phases_start_on_expected_months() {
        let dataset = MasterDataset::compiled().unwrap();
        let months = dataset.months();
        let starts: Vec<String> = PHASE_DEFINITIONS
            .iter()
            .map(|p| months[p.start].to_string())
            .collect();
        assert_eq!(starts, vec!["Jul-20", "Jul-21", "Feb-22"]);
        assert_eq!(PHASE_DEFINITIONS[2].end, dataset.len());
    }

    #[test]
    fn test_provider_cutover_index() {
        let dataset = MasterDataset::compiled().unwrap();
        assert_eq!(provider_cutover_index(dataset.months()), Some(18));
        assert_eq!(provider_cutover_index(&dataset.months()[..10]), None);
    }
}
