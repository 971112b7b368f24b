//! Overlay series derived from the current view.
//!
//! Nothing here is cached: overlays are recomputed from the view whenever
//! a toggle or the selected phase changes.

use crate::error::SeriesError;
use crate::phase::Phase;
use crate::visibility::DifferenceOverlayKind;
use dash_core::reading::Reading;
use dash_core::series::{Series, SeriesKey};
use serde::Serialize;

/// A stacked pair: an invisible `base` band up to the lower line, then a
/// visible `diff` band up to the higher one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceOverlay {
    pub base: Series,
    pub diff: Series,
}

/// One reported figure split across the provider change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderTransition {
    pub before_segment: Series,
    pub after_segment: Series,
}

fn check_lengths(a: &Series, b: &Series) -> Result<(), SeriesError> {
    if a.len() != b.len() {
        return Err(SeriesError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// Per index: `base = min(a, b)`, `diff = |a - b|`. A gap on either side
/// gives a gap in both outputs.
pub fn compute_difference(a: &Series, b: &Series) -> Result<DifferenceOverlay, SeriesError> {
    check_lengths(a, b)?;
    let name = format!("Δ {} vs {}", b.name(), a.name());
    let (base, diff): (Vec<Reading>, Vec<Reading>) = a
        .readings()
        .iter()
        .zip(b.readings())
        .map(|(&x, &y)| (x.zip_with(y, f64::min), x.zip_with(y, |x, y| (x - y).abs())))
        .unzip();
    Ok(DifferenceOverlay {
        base: Series::new(format!("{name} (base)"), base),
        diff: Series::new(name, diff),
    })
}

/// Split a reported figure at the month one provider handed over to another.
///
/// Before `cutover` only `before` is reported, after it only `after`. In the
/// cutover month both providers reported partial figures, so both segments
/// carry their sum, with a missing side counting as zero. The two segments
/// meet at that point and the line stays continuous. With both sides
/// missing (e.g. a hidden phase) the cutover is a gap in both segments.
pub fn compute_provider_transition(
    before: &Series,
    after: &Series,
    cutover: usize,
) -> Result<ProviderTransition, SeriesError> {
    check_lengths(before, after)?;
    if cutover >= before.len() {
        return Err(SeriesError::CutoverOutOfRange {
            cutover,
            len: before.len(),
        });
    }
    let overlap = match (before.get(cutover), after.get(cutover)) {
        (Reading::Absent, Reading::Absent) => Reading::Absent,
        (b, a) => Reading::Present(b.or_zero() + a.or_zero()),
    };
    let mut before_segment = Vec::with_capacity(before.len());
    let mut after_segment = Vec::with_capacity(after.len());
    for i in 0..before.len() {
        let (b, a) = match i.cmp(&cutover) {
            std::cmp::Ordering::Less => (before.get(i), Reading::Absent),
            std::cmp::Ordering::Equal => (overlap, overlap),
            std::cmp::Ordering::Greater => (Reading::Absent, after.get(i)),
        };
        before_segment.push(b);
        after_segment.push(a);
    }
    Ok(ProviderTransition {
        before_segment: Series::new(before.name(), before_segment),
        after_segment: Series::new(after.name(), after_segment),
    })
}

/// The difference overlay of `kind` over a view. Market rates are compared
/// by magnitude.
pub fn overlay_for(view: &Phase, kind: DifferenceOverlayKind) -> Result<DifferenceOverlay, SeriesError> {
    let (a, b) = kind.pair();
    let magnitude = |key: SeriesKey| match key {
        SeriesKey::MarketRate => view.series(key).magnitude(),
        _ => view.series(key).clone(),
    };
    let overlay = compute_difference(&magnitude(a), &magnitude(b))?;
    Ok(DifferenceOverlay {
        base: overlay.base.with_name(format!("{} (base)", kind.label())),
        diff: overlay.diff.with_name(kind.label()),
    })
}

/// The test-provider transition over a view, given the master index of the
/// cutover month. Views that end before the cutover show only the original
/// provider; views that start after it only the new one.
pub fn transition_for(view: &Phase, master_cutover: usize) -> Result<ProviderTransition, SeriesError> {
    let before = view.series(SeriesKey::UlTests);
    let after = view.series(SeriesKey::SecondaryProvider);
    if master_cutover < view.start {
        return Ok(ProviderTransition {
            before_segment: Series::absent(before.name(), before.len()),
            after_segment: after.clone(),
        });
    }
    let local = master_cutover - view.start;
    if local >= view.len() {
        return Ok(ProviderTransition {
            before_segment: before.clone(),
            after_segment: Series::absent(after.name(), after.len()),
        });
    }
    compute_provider_transition(before, after, local)
}
