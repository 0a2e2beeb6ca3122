use crate::format::{fixed, span};
use crate::models::{CalculationResult, PatientInputs, ResultSection, SimpleResult};

/// IV maximum per dose, independent of weight.
pub const IV_MAX_MEQ: f64 = 6.0;
pub const PO_MAX_MEQ: f64 = 20.0;
/// 15% KCl.
pub const STOCK_MEQ_PER_ML: f64 = 2.0;

pub const PERIPHERAL_MEQ_PER_ML: f64 = 0.08;
pub const CENTRAL_MEQ_PER_ML: f64 = 0.15;
pub const CENTRAL_RESTRICTED_MEQ_PER_ML: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotassiumDose {
    pub iv_max_meq: f64,
    pub bolus_min_meq: f64,
    pub bolus_max_meq: f64,
    pub po_min_meq: f64,
    pub po_max_meq: f64,
    pub po_capped: bool,
}

pub fn potassium_dose(weight_kg: f64) -> PotassiumDose {
    let po_uncapped = weight_kg;
    let po_max_meq = po_uncapped.min(PO_MAX_MEQ);
    PotassiumDose {
        iv_max_meq: IV_MAX_MEQ,
        bolus_min_meq: weight_kg * 0.5,
        bolus_max_meq: weight_kg,
        po_min_meq: (weight_kg * 0.5).min(po_max_meq),
        po_max_meq,
        po_capped: po_uncapped > PO_MAX_MEQ,
    }
}

/// "a-b ml + c-d ml NS = e-f ml" for the bolus range at a line concentration.
fn dilution(dose: &PotassiumDose, meq_per_ml: f64) -> String {
    let drug_min = dose.bolus_min_meq / STOCK_MEQ_PER_ML;
    let drug_max = dose.bolus_max_meq / STOCK_MEQ_PER_ML;
    let total_min = dose.bolus_min_meq / meq_per_ml;
    let total_max = dose.bolus_max_meq / meq_per_ml;
    format!(
        "{}-{} ml + {}-{} ml NS = {}-{} ml",
        fixed(drug_min, 2),
        fixed(drug_max, 2),
        fixed(total_min - drug_min, 0),
        fixed(total_max - drug_max, 0),
        fixed(total_min, 0),
        fixed(total_max, 0)
    )
}

pub fn calculate(inputs: &PatientInputs) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let d = potassium_dose(w);

    let mut result = SimpleResult::new("Potassium (Hypokalemia)")
        .dose_range("0.5-1 mEq/kg/dose")
        .section(
            ResultSection::new("IV Max", format!("{} mEq", fixed(d.iv_max_meq, 0)))
                .with_detail("Fixed maximum per dose regardless of weight"),
        )
        .section(
            ResultSection::new(
                "IV Bolus",
                format!(
                    "{} - {} mEq ({} - {} ml)",
                    fixed(d.bolus_min_meq, 1),
                    fixed(d.bolus_max_meq, 1),
                    fixed(d.bolus_min_meq / STOCK_MEQ_PER_ML, 2),
                    fixed(d.bolus_max_meq / STOCK_MEQ_PER_ML, 2)
                ),
            )
            .with_detail("0.5 mEq/kg over 1hr | 1 mEq/kg over 2hr"),
        )
        .section(ResultSection::new(
            "Peripheral (80 mEq/L)",
            dilution(&d, PERIPHERAL_MEQ_PER_ML),
        ))
        .section(ResultSection::new(
            "Central (15 mEq/100ml)",
            dilution(&d, CENTRAL_MEQ_PER_ML),
        ))
        .section(ResultSection::new(
            "Central - Fluid Restricted (20 mEq/100ml)",
            dilution(&d, CENTRAL_RESTRICTED_MEQ_PER_ML),
        ))
        .section(
            ResultSection::new(
                "PO (KCl)",
                format!("{} mEq", span(d.po_min_meq, d.po_max_meq, 1)),
            )
            .with_detail(if d.po_capped {
                "0.5-1 mEq/kg, can be given BD (MAX REACHED)"
            } else {
                "0.5-1 mEq/kg, can be given BD"
            }),
        )
        .note(format!(
            "IV max: {} mEq/dose | PO max: {} mEq/dose",
            fixed(IV_MAX_MEQ, 0),
            fixed(PO_MAX_MEQ, 0)
        ))
        .note("Stock: 15% KCl = 2 mEq/ml")
        .note("Compatible: NS, D5W, LR")
        .note("Monitor ECG if giving >0.5 mEq/kg/hr");

    if d.po_capped {
        result = result.warning("PO dose capped at maximum (20 mEq)");
    }
    Some(result.into())
}
