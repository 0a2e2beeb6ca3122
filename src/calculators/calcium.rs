use crate::format::fixed;
use crate::models::{CalculationResult, PatientInputs, ResultSection, SimpleResult};

/// Calcium gluconate 10%: 100 mg/kg, stock 100 mg/mL.
pub const MG_PER_KG: f64 = 100.0;
pub const MAX_DOSE_MG: f64 = 3000.0;
pub const STOCK_MG_PER_ML: f64 = 100.0;
/// Final concentration after dilution.
pub const TARGET_MG_PER_ML: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalciumDose {
    pub dose_mg: f64,
    pub volume_ml: f64,
    pub diluent_ml: f64,
    pub total_ml: f64,
    pub capped: bool,
}

pub fn calcium_dose(weight_kg: f64) -> CalciumDose {
    let uncapped = weight_kg * MG_PER_KG;
    let capped = uncapped > MAX_DOSE_MG;
    let dose_mg = uncapped.min(MAX_DOSE_MG);
    let volume_ml = dose_mg / STOCK_MG_PER_ML;
    let total_ml = dose_mg / TARGET_MG_PER_ML;
    CalciumDose {
        dose_mg,
        volume_ml,
        diluent_ml: total_ml - volume_ml,
        total_ml,
        capped,
    }
}

/// BD when a level below 7 is supplied, otherwise OD.
pub fn frequency(calcium_level: Option<f64>) -> &'static str {
    match calcium_level {
        Some(level) if level < 7.0 => "BD",
        _ => "OD",
    }
}

pub fn calculate(inputs: &PatientInputs) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let dose = calcium_dose(w);

    let mut result = SimpleResult::new("Calcium Gluconate 10% IV")
        .section(ResultSection::new(
            "Dose",
            format!("{} mg ({} ml)", fixed(dose.dose_mg, 0), fixed(dose.volume_ml, 1)),
        ))
        .section(
            ResultSection::new(
                "Dilution",
                format!(
                    "{} ml + {} ml NS = {} ml",
                    fixed(dose.volume_ml, 1),
                    fixed(dose.diluent_ml, 1),
                    fixed(dose.total_ml, 1)
                ),
            )
            .with_detail("Target: 50 mg/ml"),
        )
        .frequency(frequency(inputs.calcium))
        .dose_range("50-100 mg/kg/dose")
        .note("Dose: 100 mg/kg (1 ml/kg)")
        .note(format!(
            "Max: {} mg ({} ml)",
            fixed(MAX_DOSE_MG, 0),
            fixed(MAX_DOSE_MG / STOCK_MG_PER_ML, 0)
        ))
        .note("Compatible: NS, D5W")
        .note("Infuse over 1 hour");

    if dose.capped {
        result = result.warning("Dose capped at maximum (3 g / 30 ml)");
    }
    Some(result.into())
}
