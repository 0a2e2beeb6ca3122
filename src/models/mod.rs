pub mod enums;
pub mod inputs;
pub mod result;

use thiserror::Error;

pub use enums::*;
pub use inputs::{parse_numeric, PanelForm, PatientInputs, Selections};
pub use result::{
    CalculationResult, DrugInfo, InfusionResult, InfusionSteps, ResultSection, SimpleResult,
};

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
