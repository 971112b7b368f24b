//! Phase segmentation of the master month axis.
//!
//! `PhaseBoundaryTable` is built once from the phase definitions and
//! checked against the axis length. Slicing a phase out of the master data
//! and masking hidden phases in the combined view both go through it, so
//! the two can never disagree about where a phase starts or ends.

use crate::error::PhaseError;
use crate::visibility::VisibilityState;
use dash_core::dataset::MasterDataset;
use dash_core::month::MonthLabel;
use dash_core::phase_definition::{
    PhaseDefinition, ALL_PHASES_ID, ALL_PHASES_NAME, PHASE_DEFINITIONS,
};
use dash_core::series::{Series, SeriesKey};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

/// Validated phase boundaries over an axis of `len` months.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseBoundaryTable {
    phases: Vec<PhaseDefinition>,
    len: usize,
}

impl PhaseBoundaryTable {
    /// Check that `definitions` partition `0..len` in order, with no empty
    /// phase, no gap and no overlap.
    pub fn new(definitions: &[PhaseDefinition], len: usize) -> Result<Self, PhaseError> {
        let mut expected_start = 0;
        for def in definitions {
            if def.start != expected_start {
                return Err(PhaseError::NotContiguous {
                    id: def.id.to_string(),
                    expected_start,
                    start: def.start,
                });
            }
            if def.end <= def.start {
                return Err(PhaseError::EmptyPhase {
                    id: def.id.to_string(),
                });
            }
            if def.end > len {
                return Err(PhaseError::OutOfBounds {
                    id: def.id.to_string(),
                    end: def.end,
                    len,
                });
            }
            expected_start = def.end;
        }
        if expected_start != len {
            return Err(PhaseError::Incomplete {
                covered: expected_start,
                len,
            });
        }
        Ok(PhaseBoundaryTable {
            phases: definitions.to_vec(),
            len,
        })
    }

    /// Boundaries from the compiled phase table.
    pub fn compiled(len: usize) -> Result<Self, PhaseError> {
        PhaseBoundaryTable::new(&PHASE_DEFINITIONS, len)
    }

    pub fn phases(&self) -> &[PhaseDefinition] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, id: &str) -> Option<&PhaseDefinition> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn range(&self, id: &str) -> Option<Range<usize>> {
        self.get(id).map(|p| p.start..p.end)
    }

    /// The phase owning master index `index`.
    pub fn phase_at(&self, index: usize) -> Option<&PhaseDefinition> {
        self.phases
            .iter()
            .find(|p| (p.start..p.end).contains(&index))
    }

    /// Period covering every phase: first phase's start day to last phase's end day.
    fn combined_period(&self) -> String {
        let first = self.phases.first().map(|p| p.period).unwrap_or_default();
        let last = self.phases.last().map(|p| p.period).unwrap_or_default();
        let from = first.split(" to ").next().unwrap_or(first);
        let to = last.rsplit(" to ").next().unwrap_or(last);
        format!("{from} to {to}")
    }
}

/// Which phase the user has selected.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseSelection {
    #[default]
    All,
    Phase(String),
}

impl PhaseSelection {
    pub fn id(&self) -> &str {
        match self {
            PhaseSelection::All => ALL_PHASES_ID,
            PhaseSelection::Phase(id) => id.as_str(),
        }
    }
}

/// A contiguous slice of the master data: its months plus every series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    pub period: String,
    /// Master index of this phase's first month.
    pub start: usize,
    pub months: Vec<MonthLabel>,
    pub series: BTreeMap<SeriesKey, Series>,
}

impl Phase {
    pub fn len(&self) -> usize {
        self.months.len()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    pub fn series(&self, key: SeriesKey) -> &Series {
        // Phases are only built from a MasterDataset, which carries every key.
        &self.series[&key]
    }

    /// Master index of the view's `i`-th month.
    pub fn master_index(&self, i: usize) -> usize {
        self.start + i
    }

    /// Right-to-left display order: months and all series reversed.
    pub fn reversed(&self) -> Phase {
        Phase {
            months: self.months.iter().rev().copied().collect(),
            series: self
                .series
                .iter()
                .map(|(k, s)| (*k, s.reversed()))
                .collect(),
            ..self.clone()
        }
    }
}

/// Every phase sliced out of the master data, plus the unsliced "all" view.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    boundaries: PhaseBoundaryTable,
    phases: Vec<Phase>,
    all: Phase,
}

impl PhaseTable {
    pub fn boundaries(&self) -> &PhaseBoundaryTable {
        &self.boundaries
    }

    /// Individual phases in axis order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn all(&self) -> &Phase {
        &self.all
    }

    pub fn get(&self, selection: &PhaseSelection) -> Option<&Phase> {
        match selection {
            PhaseSelection::All => Some(&self.all),
            PhaseSelection::Phase(id) => self.phases.iter().find(|p| &p.id == id),
        }
    }

    /// The data a view should draw: a single phase as-is, or the combined
    /// view with hidden phases blanked out.
    pub fn view(
        &self,
        selection: &PhaseSelection,
        visibility: &VisibilityState,
    ) -> Result<Phase, PhaseError> {
        match selection {
            PhaseSelection::All => Ok(filter_by_phase_visibility(
                &self.all,
                &self.boundaries,
                visibility,
            )),
            PhaseSelection::Phase(id) => self
                .get(selection)
                .cloned()
                .ok_or_else(|| PhaseError::UnknownPhase(id.clone())),
        }
    }
}

/// Slice every series of `dataset` into the phases of `boundaries`.
///
/// For every phase `p` and offset `i`, `p.series[k][i]` is the master
/// reading at `p.start + i`.
pub fn segment_phases(
    dataset: &MasterDataset,
    boundaries: &PhaseBoundaryTable,
) -> Result<PhaseTable, PhaseError> {
    if boundaries.len() != dataset.len() {
        return Err(PhaseError::AxisMismatch {
            boundaries: boundaries.len(),
            dataset: dataset.len(),
        });
    }

    let slice = |range: Range<usize>| -> (Vec<MonthLabel>, BTreeMap<SeriesKey, Series>) {
        let months = dataset.months()[range.clone()].to_vec();
        let series = dataset
            .iter_series()
            .map(|(key, s)| (key, s.slice(range.clone())))
            .collect();
        (months, series)
    };

    let phases = boundaries
        .phases()
        .iter()
        .map(|def| {
            let (months, series) = slice(def.start..def.end);
            Phase {
                id: def.id.to_string(),
                name: def.name.to_string(),
                period: def.period.to_string(),
                start: def.start,
                months,
                series,
            }
        })
        .collect::<Vec<_>>();

    let (months, series) = slice(0..dataset.len());
    let all = Phase {
        id: ALL_PHASES_ID.to_string(),
        name: ALL_PHASES_NAME.to_string(),
        period: boundaries.combined_period(),
        start: 0,
        months,
        series,
    };
    debug!(
        "segmented {} months into {} phases",
        dataset.len(),
        phases.len()
    );

    Ok(PhaseTable {
        boundaries: boundaries.clone(),
        phases,
        all,
    })
}

/// Blank out every reading that falls in a hidden phase.
///
/// Month labels are kept so the x-axis does not change size; only the
/// plotted values disappear. Indices not owned by any phase are left alone.
pub fn filter_by_phase_visibility(
    all: &Phase,
    boundaries: &PhaseBoundaryTable,
    visibility: &VisibilityState,
) -> Phase {
    let shown = |i: usize| {
        boundaries
            .phase_at(all.master_index(i))
            .map_or(true, |p| visibility.is_phase_visible(p.id))
    };
    Phase {
        series: all
            .series
            .iter()
            .map(|(k, s)| (*k, s.masked(&shown)))
            .collect(),
        ..all.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::reading::Reading;
    use proptest::prelude::*;

    const DEFS: [PhaseDefinition; 2] = [
        PhaseDefinition {
            id: "early",
            name: "Early",
            period: "01-07-2021 to 31-08-2021",
            start: 0,
            end: 2,
        },
        PhaseDefinition {
            id: "late",
            name: "Late",
            period: "01-09-2021 to 30-09-2021",
            start: 2,
            end: 3,
        },
    ];

    fn small_dataset() -> MasterDataset {
        let months = ["Jul-21", "Aug-21", "Sep-21"]
            .iter()
            .map(|m| m.parse().unwrap())
            .collect();
        MasterDataset::new(
            months,
            vec![(
                SeriesKey::Manifest,
                vec![Reading::Present(100.0), Reading::Absent, Reading::Present(300.0)],
            )],
        )
        .unwrap()
    }

    fn def(id: &'static str, start: usize, end: usize) -> PhaseDefinition {
        PhaseDefinition {
            id,
            name: id,
            period: "",
            start,
            end,
        }
    }

    #[test]
    fn test_boundary_validation() {
        assert!(PhaseBoundaryTable::new(&DEFS, 3).is_ok());
        assert_eq!(
            PhaseBoundaryTable::new(&DEFS, 4).unwrap_err(),
            PhaseError::Incomplete { covered: 3, len: 4 }
        );
        assert!(matches!(
            PhaseBoundaryTable::new(&DEFS, 2).unwrap_err(),
            PhaseError::OutOfBounds { end: 3, len: 2, .. }
        ));
        let gap = [def("a", 0, 1), def("b", 2, 3)];
        assert!(matches!(
            PhaseBoundaryTable::new(&gap, 3).unwrap_err(),
            PhaseError::NotContiguous { expected_start: 1, start: 2, .. }
        ));
        let overlap = [def("a", 0, 2), def("b", 1, 3)];
        assert!(matches!(
            PhaseBoundaryTable::new(&overlap, 3).unwrap_err(),
            PhaseError::NotContiguous { .. }
        ));
        let empty = [def("a", 0, 0), def("b", 0, 3)];
        assert!(matches!(
            PhaseBoundaryTable::new(&empty, 3).unwrap_err(),
            PhaseError::EmptyPhase { .. }
        ));
    }

    #[test]
    fn test_segment_phases_slices_consistently() {
        let dataset = small_dataset();
        let boundaries = PhaseBoundaryTable::new(&DEFS, 3).unwrap();
        let table = segment_phases(&dataset, &boundaries).unwrap();

        let late = table.get(&PhaseSelection::Phase("late".into())).unwrap();
        assert_eq!(late.months[0].to_string(), "Sep-21");
        assert_eq!(late.series(SeriesKey::Manifest).readings(), &[Reading::Present(300.0)]);

        let all = table.all();
        assert_eq!(all.len(), 3);
        assert_eq!(all.period, "01-07-2021 to 30-09-2021");
        assert_eq!(all.name, "All Phases");
    }

    #[test]
    fn test_segment_rejects_mismatched_axis() {
        let dataset = small_dataset();
        let boundaries = PhaseBoundaryTable::new(&[def("a", 0, 2)], 2).unwrap();
        assert_eq!(
            segment_phases(&dataset, &boundaries).unwrap_err(),
            PhaseError::AxisMismatch {
                boundaries: 2,
                dataset: 3
            }
        );
    }

    #[test]
    fn test_hidden_phase_blanks_values_keeps_months() {
        let dataset = small_dataset();
        let boundaries = PhaseBoundaryTable::new(&DEFS, 3).unwrap();
        let table = segment_phases(&dataset, &boundaries).unwrap();
        let mut visibility = VisibilityState::new();
        visibility.toggle_phase("early");

        let view = table.view(&PhaseSelection::All, &visibility).unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(
            view.series(SeriesKey::Manifest).readings(),
            &[Reading::Absent, Reading::Absent, Reading::Present(300.0)]
        );
    }

    #[test]
    fn test_single_phase_view_ignores_phase_visibility() {
        let dataset = small_dataset();
        let boundaries = PhaseBoundaryTable::new(&DEFS, 3).unwrap();
        let table = segment_phases(&dataset, &boundaries).unwrap();
        let mut visibility = VisibilityState::new();
        visibility.toggle_phase("early");
        let view = table
            .view(&PhaseSelection::Phase("early".into()), &visibility)
            .unwrap();
        assert_eq!(view.series(SeriesKey::Manifest).get(0), Reading::Present(100.0));
        assert!(matches!(
            table.view(&PhaseSelection::Phase("nope".into()), &visibility),
            Err(PhaseError::UnknownPhase(_))
        ));
    }

    #[test]
    fn test_reversed_view() {
        let dataset = small_dataset();
        let table = segment_phases(&dataset, &PhaseBoundaryTable::new(&DEFS, 3).unwrap()).unwrap();
        let reversed = table.all().reversed();
        assert_eq!(reversed.months[0].to_string(), "Sep-21");
        assert_eq!(reversed.series(SeriesKey::Manifest).get(0), Reading::Present(300.0));
    }

    #[test]
    fn test_compiled_phases() {
        let dataset = MasterDataset::compiled().unwrap();
        let boundaries = PhaseBoundaryTable::compiled(dataset.len()).unwrap();
        let table = segment_phases(&dataset, &boundaries).unwrap();
        let lens: Vec<usize> = table.phases().iter().map(|p| p.len()).collect();
        assert_eq!(lens, vec![12, 7, 1]);
        assert_eq!(table.all().period, "01-07-2020 to 28-02-2022");
        assert_eq!(boundaries.phase_at(18).map(|p| p.id), Some("phase2"));
        assert_eq!(boundaries.phase_at(19).map(|p| p.id), Some("phase3"));
    }

    proptest! {
        // Showing only phase P in the combined view yields exactly P's slice
        // over P's range, and gaps everywhere else.
        #[test]
        fn prop_masking_matches_slicing(
            values in prop::collection::vec(prop::option::of(-1.0e6f64..1.0e6), 20),
        ) {
            let dataset = MasterDataset::compiled().unwrap();
            let readings: Vec<Reading> = values.iter().map(|v| Reading::from(*v)).collect();
            let dataset = MasterDataset::new(
                dataset.months().to_vec(),
                vec![(SeriesKey::Estimated, readings)],
            ).unwrap();
            let boundaries = PhaseBoundaryTable::compiled(dataset.len()).unwrap();
            let table = segment_phases(&dataset, &boundaries).unwrap();

            for phase in table.phases() {
                let mut visibility = VisibilityState::new();
                for other in boundaries.phases().iter().filter(|p| p.id != phase.id) {
                    visibility.set_phase_visible(other.id, false);
                }
                let view = table.view(&PhaseSelection::All, &visibility).unwrap();
                let masked = view.series(SeriesKey::Estimated);
                let sliced = phase.series(SeriesKey::Estimated);
                for i in 0..dataset.len() {
                    let expected = if (phase.start..phase.start + phase.len()).contains(&i) {
                        sliced.get(i - phase.start)
                    } else {
                        Reading::Absent
                    };
                    prop_assert_eq!(masked.get(i), expected);
                }
            }
        }
    }
}
