use crate::error::DatasetError;
use serde::{Deserialize, Serialize};

/// Payer and expense-type breakdowns, `group,name,value` in USD.
pub const FINANCIAL_FLOWS_CSV: &str = include_str!("../../fixtures/financial_flows.csv");

/// Which side of the in/out pie a slice belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowGroup {
    /// Who paid in (inner ring)
    Payers,
    /// Where the money went (outer ring)
    Expenses,
}

impl FlowGroup {
    pub fn title(&self) -> &'static str {
        match self {
            FlowGroup::Payers => "Payers",
            FlowGroup::Expenses => "Expense Types",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowSlice {
    pub group: FlowGroup,
    pub name: String,
    pub value: f64,
}

/// All financial flow slices, in fixture order.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialFlows(pub Vec<FlowSlice>);

impl FinancialFlows {
    pub fn from_csv(csv_data: &str) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());
        let slices = rdr
            .deserialize::<FlowSlice>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FinancialFlows(slices))
    }

    pub fn compiled() -> Result<Self, DatasetError> {
        FinancialFlows::from_csv(FINANCIAL_FLOWS_CSV)
    }

    pub fn group(&self, group: FlowGroup) -> Vec<FlowSlice> {
        self.0.iter().filter(|s| s.group == group).cloned().collect()
    }
}
