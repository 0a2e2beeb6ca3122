use crate::format::{fixed, span};
use crate::models::{CalculationResult, PatientInputs, ResultSection, SimpleResult};

pub const MAX_DOSE_MG: f64 = 2000.0;
/// 50% magnesium sulfate.
pub const STOCK_MG_PER_ML: f64 = 500.0;
pub const TARGET_MG_PER_ML: f64 = 60.0;

/// The three regimens derived from one weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnesiumDose {
    pub nicu_min_ml: f64,
    pub nicu_max_ml: f64,
    pub min_mg: f64,
    pub max_mg: f64,
    pub min_ml: f64,
    pub max_ml: f64,
    pub capped: bool,
}

pub fn magnesium_dose(weight_kg: f64) -> MagnesiumDose {
    let uncapped_max = weight_kg * 50.0;
    let capped = uncapped_max > MAX_DOSE_MG;
    let max_mg = uncapped_max.min(MAX_DOSE_MG);
    let min_mg = (weight_kg * 25.0).min(max_mg);
    MagnesiumDose {
        nicu_min_ml: weight_kg * 0.1,
        nicu_max_ml: weight_kg * 0.2,
        min_mg,
        max_mg,
        min_ml: min_mg / STOCK_MG_PER_ML,
        max_ml: max_mg / STOCK_MG_PER_ML,
        capped,
    }
}

pub fn calculate(inputs: &PatientInputs) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let d = magnesium_dose(w);

    let total_min = d.min_mg / TARGET_MG_PER_ML;
    let total_max = d.max_mg / TARGET_MG_PER_ML;
    let diluent_min = total_min - d.min_ml;
    let diluent_max = total_max - d.max_ml;
    let mg_range = format!("{} mg", span(d.min_mg, d.max_mg, 0));

    let mut result = SimpleResult::new("Magnesium Replacement")
        .dose_range("25-50 mg/kg/dose")
        .section(
            ResultSection::new(
                "NICU (Hypomagnesemia)",
                format!("{} ml", span(d.nicu_min_ml, d.nicu_max_ml, 2)),
            )
            .with_detail("0.1-0.2 ml/kg BD for 3 doses"),
        )
        .section(
            ResultSection::new(
                "General Ward (50% MgSulfate)",
                format!(
                    "{mg_range} ({} - {} ml)",
                    fixed(d.min_ml, 2),
                    fixed(d.max_ml, 2)
                ),
            )
            .with_detail("25-50 mg/kg BD for 3 doses"),
        )
        .section(
            ResultSection::new(
                "Dilution",
                format!(
                    "{}-{} ml + {}-{} ml NS = {}-{} ml",
                    fixed(d.min_ml, 2),
                    fixed(d.max_ml, 2),
                    fixed(diluent_min, 1),
                    fixed(diluent_max, 1),
                    fixed(total_min, 1),
                    fixed(total_max, 1)
                ),
            )
            .with_detail("Target: 60 mg/ml"),
        )
        .section(
            ResultSection::new("Status Asthmaticus", mg_range)
                .with_detail("25-50 mg/kg over 20-30 mins"),
        )
        .note("Stock: 50% MgSulfate = 500 mg/ml")
        .note(format!(
            "Max single dose: {} mg ({} ml)",
            fixed(MAX_DOSE_MG, 0),
            fixed(MAX_DOSE_MG / STOCK_MG_PER_ML, 0)
        ))
        .note("Compatible: NS, D5W")
        .note("Infuse over 2-4 hours");

    if d.capped {
        result = result.warning("Dose capped at maximum (2g per dose)");
    }
    Some(result.into())
}
