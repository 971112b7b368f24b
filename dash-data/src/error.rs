use std::fmt;

/// Invalid phase boundaries or an unknown phase reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseError {
    EmptyPhase { id: String },
    OutOfBounds { id: String, end: usize, len: usize },
    /// Phases must follow each other with no gap and no overlap.
    NotContiguous { id: String, expected_start: usize, start: usize },
    /// The last phase must end where the month axis ends.
    Incomplete { covered: usize, len: usize },
    /// The boundary table was built for an axis of a different length.
    AxisMismatch { boundaries: usize, dataset: usize },
    UnknownPhase(String),
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseError::EmptyPhase { id } => write!(f, "phase {id:?} covers no months"),
            PhaseError::OutOfBounds { id, end, len } => {
                write!(f, "phase {id:?} ends at {end}, past the {len}-month axis")
            }
            PhaseError::NotContiguous {
                id,
                expected_start,
                start,
            } => write!(
                f,
                "phase {id:?} starts at {start}, expected {expected_start}"
            ),
            PhaseError::Incomplete { covered, len } => {
                write!(f, "phases cover {covered} of {len} months")
            }
            PhaseError::AxisMismatch { boundaries, dataset } => write!(
                f,
                "phase boundaries describe {boundaries} months, dataset has {dataset}"
            ),
            PhaseError::UnknownPhase(id) => write!(f, "unknown phase {id:?}"),
        }
    }
}

impl std::error::Error for PhaseError {}

/// Two series that must line up do not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    LengthMismatch { left: usize, right: usize },
    CutoverOutOfRange { cutover: usize, len: usize },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::LengthMismatch { left, right } => {
                write!(f, "series lengths differ: {left} vs {right}")
            }
            SeriesError::CutoverOutOfRange { cutover, len } => {
                write!(f, "cutover index {cutover} is outside a {len}-month series")
            }
        }
    }
}

impl std::error::Error for SeriesError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryError {
    /// Extrema of a series with no real readings.
    NoData { series: String },
}

impl fmt::Display for SummaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryError::NoData { series } => write!(f, "series {series:?} has no data"),
        }
    }
}

impl std::error::Error for SummaryError {}
