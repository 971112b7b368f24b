use dash_core::financial_flow::FlowSlice;
use dash_utils::numbers::round_half_up;
use serde::Serialize;

/// A pie slice with its whole-percent share of the group total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Share {
    pub name: String,
    pub value: f64,
    pub percent: i64,
}

/// Percent of the group total per slice. A zero or empty total gives 0 %.
pub fn shares(slices: &[FlowSlice]) -> Vec<Share> {
    let total: f64 = slices.iter().map(|s| s.value).sum();
    slices
        .iter()
        .map(|s| Share {
            name: s.name.clone(),
            value: s.value,
            percent: if total == 0.0 {
                0
            } else {
                round_half_up(s.value / total * 100.0)
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dash_core::financial_flow::{FinancialFlows, FlowGroup};

    #[test]
    fn test_compiled_shares() {
        let flows = FinancialFlows::compiled().unwrap();
        let payers: Vec<i64> = shares(&flows.group(FlowGroup::Payers))
            .iter()
            .map(|s| s.percent)
            .collect();
        assert_eq!(payers, vec![65, 33, 2]);
        let expenses: Vec<i64> = shares(&flows.group(FlowGroup::Expenses))
            .iter()
            .map(|s| s.percent)
            .collect();
        assert_eq!(expenses, vec![63, 26, 6, 4]);
    }

    #[test]
    fn test_zero_total() {
        let slices = vec![FlowSlice {
            group: FlowGroup::Payers,
            name: "Nobody".to_string(),
            value: 0.0,
        }];
        assert_eq!(shares(&slices)[0].percent, 0);
        assert!(shares(&[]).is_empty());
    }
}
