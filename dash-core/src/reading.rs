use serde::{Serialize, Serializer};

/// A single monthly value: either a real measurement or an explicit gap.
///
/// `Absent` is never zero. Arithmetic goes through the helpers below so a
/// gap cannot leak into a sum or a comparison by accident.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Reading {
    Present(f64),
    #[default]
    Absent,
}

impl Reading {
    pub fn value(self) -> Option<f64> {
        match self {
            Reading::Present(v) => Some(v),
            Reading::Absent => None,
        }
    }

    pub fn is_present(self) -> bool {
        matches!(self, Reading::Present(_))
    }

    pub fn is_absent(self) -> bool {
        !self.is_present()
    }

    /// The value, or zero for a gap. Only for places where a gap
    /// explicitly counts as nothing reported (e.g. provider overlap sums).
    pub fn or_zero(self) -> f64 {
        self.value().unwrap_or(0.0)
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Reading {
        match self {
            Reading::Present(v) => Reading::Present(f(v)),
            Reading::Absent => Reading::Absent,
        }
    }

    /// Combine two readings; absent if either side is absent.
    pub fn zip_with(self, other: Reading, f: impl FnOnce(f64, f64) -> f64) -> Reading {
        match (self, other) {
            (Reading::Present(a), Reading::Present(b)) => Reading::Present(f(a, b)),
            _ => Reading::Absent,
        }
    }

    /// Parse a CSV cell. Blank cells and "null" mark a gap.
    pub fn parse_cell(cell: &str) -> Option<Reading> {
        let cell = cell.trim();
        if cell.is_empty() || cell.eq_ignore_ascii_case("null") {
            return Some(Reading::Absent);
        }
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Reading::Present)
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reading::Absent, Reading::Present)
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Reading::Present(value)
    }
}

/// Gaps serialize as `null` so the chart engine draws them as breaks.
impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reading::Present(v) => serializer.serialize_f64(*v),
            Reading::Absent => serializer.serialize_none(),
        }
    }
}
