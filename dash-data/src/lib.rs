//! View computations for the dashboard.
//!
//! Everything here is a pure function over in-memory series:
//! - `phase`: slicing the master axis into phases and masking hidden phases
//! - `derived`: difference overlays and the provider transition split
//! - `summary`: card totals, averages and extrema over visible data
//! - `visibility`: the toggle state those computations read
//! - `readout`: values for a pinned month
//! - `share`: pie slice percentages

pub mod derived;
pub mod error;
pub mod phase;
pub mod readout;
pub mod share;
pub mod summary;
pub mod visibility;
