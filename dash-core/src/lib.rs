pub mod dataset;
pub mod error;
pub mod financial_flow;
pub mod month;
pub mod phase_definition;
pub mod reading;
pub mod series;
