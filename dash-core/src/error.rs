use std::fmt;

/// Errors raised while building a master dataset or its fixtures.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    Csv(String),
    MissingColumn(String),
    InvalidMonth(String),
    InvalidReading {
        row: usize,
        column: String,
        value: String,
    },
    /// The month axis must be strictly increasing.
    MonthOrder { index: usize },
    LengthMismatch {
        series: String,
        expected: usize,
        found: usize,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Csv(msg) => write!(f, "CSV error: {msg}"),
            DatasetError::MissingColumn(column) => write!(f, "missing column {column:?}"),
            DatasetError::InvalidMonth(label) => write!(f, "invalid month label {label:?}"),
            DatasetError::InvalidReading { row, column, value } => {
                write!(f, "row {row}: invalid value {value:?} in column {column:?}")
            }
            DatasetError::MonthOrder { index } => {
                write!(f, "month axis is not increasing at index {index}")
            }
            DatasetError::LengthMismatch {
                series,
                expected,
                found,
            } => write!(
                f,
                "series {series:?} has {found} readings, month axis has {expected}"
            ),
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Csv(err.to_string())
    }
}
