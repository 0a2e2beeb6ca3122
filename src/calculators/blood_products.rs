//! Transfusion volumes for blood products, and vitamin K for a prolonged PT.

use crate::format::{fixed, grouped, plain};
use crate::models::inputs::positive;
use crate::models::{
    BloodProduct, CalculationResult, PatientInputs, ResultSection, SimpleResult, VitaminKGroup,
};

pub const PRBC_ML_PER_KG: f64 = 15.0;
pub const PRBC_MAX_ML: f64 = 280.0;
pub const CRYO_ML_PER_KG: f64 = 5.0;
pub const CRYO_UNIT_ML: f64 = 25.0;
pub const CRYO_MAX_UNITS: u32 = 4;
pub const PLATELETS_ML_PER_KG: f64 = 10.0;
pub const PLATELETS_MAX_ML: f64 = 300.0;

pub fn prbc_volume(weight_kg: f64) -> f64 {
    (weight_kg * PRBC_ML_PER_KG).min(PRBC_MAX_ML)
}

pub fn platelet_volume(weight_kg: f64) -> f64 {
    (weight_kg * PLATELETS_ML_PER_KG).min(PLATELETS_MAX_ML)
}

/// Cryoprecipitate volume (mL) and whole units.
pub fn cryo_dose(weight_kg: f64) -> (f64, u32) {
    let volume = weight_kg * CRYO_ML_PER_KG;
    let units = ((volume / CRYO_UNIT_ML).ceil() as u32).min(CRYO_MAX_UNITS);
    (volume, units)
}

/// FFP dose text and its basis, banded by weight.
pub fn ffp_dose(weight_kg: f64) -> (String, &'static str) {
    if weight_kg <= 20.0 {
        (format!("{} ml", fixed(weight_kg * 10.0, 0)), "10 ml/kg")
    } else if weight_kg <= 35.0 {
        ("200 ml (1 unit)".into(), "20-35 kg")
    } else if weight_kg <= 40.0 {
        ("2 units".into(), "30-40 kg")
    } else {
        ("3 units".into(), ">40 kg")
    }
}

fn packed_red_cells(w: f64) -> SimpleResult {
    let dose = prbc_volume(w);
    let mut result = SimpleResult::new("Packed RBC")
        .subtitle("Indication: Low Hemoglobin")
        .dose_range("15 ml/kg")
        .section(
            ResultSection::new("Volume", format!("{} ml", fixed(dose, 0))).with_detail(format!(
                "{} kg × 15 ml/kg = {} ml",
                plain(w),
                fixed(dose, 0)
            )),
        )
        .section(ResultSection::new("Duration", "3-4 hours"))
        .section(ResultSection::new("Max Dose", "1 unit (280 ml)"))
        .note("10-15 ml/kg raises Hb by approximately 2-3 g/dL")
        .note("Max: 1 unit (280 ml)")
        .note("Use leukocyte-reduced, irradiated blood for neonates");
    if w * PRBC_ML_PER_KG > PRBC_MAX_ML {
        result = result.warning("Volume capped at 1 unit (280 ml)");
    }
    result
}

fn fresh_frozen_plasma(w: f64) -> SimpleResult {
    let (dose, basis) = ffp_dose(w);
    SimpleResult::new("Fresh Frozen Plasma (FFP)")
        .subtitle("Indication: Prolonged aPTT")
        .dose_range("10 ml/kg (up to 20 kg)")
        .section(ResultSection::new("Dose", dose).with_detail(basis))
        .section(ResultSection::new("Duration", "Over 30 mins"))
        .note("Should not be given prophylactically in non-bleeding children with minor abnormalities")
        .note("Up to 20 kg: 10 ml/kg over 30 mins")
        .note("20-35 kg: 200 ml (1 unit)")
        .note("30-40 kg: 2 units")
        .note(">40 kg: 3 units")
}

fn cryoprecipitate(w: f64, fibrinogen: Option<f64>) -> SimpleResult {
    let (volume, units) = cryo_dose(w);
    let mut result = SimpleResult::new("Cryoprecipitate")
        .subtitle("Indication: Low Fibrinogen (usually < 125 mg/dL)")
        .dose_range("5 ml/kg")
        .section(
            ResultSection::new("Volume", format!("{} ml", fixed(volume, 0)))
                .with_detail(format!("{} kg × 5 ml/kg", plain(w))),
        )
        .section(ResultSection::new(
            "Units",
            format!("{units} units (each unit = 25 ml)"),
        ))
        .section(ResultSection::new("Duration", "Over 30 mins"));
    if let Some(fib) = fibrinogen {
        result = result.section(ResultSection::new(
            "Fibrinogen",
            format!("Current: {} mg/dL", plain(fib)),
        ));
    }
    result
        .note("5 ml/kg over 30 mins")
        .note("Max: 4 units (each unit 25 ml = 100 ml total)")
        .note("Contains fibrinogen, Factor VIII, Factor XIII, vWF")
}

fn platelets(w: f64, count: Option<f64>) -> SimpleResult {
    let dose = platelet_volume(w);
    let mut result = SimpleResult::new("Platelets")
        .subtitle("Indication: Low Platelets (< 30,000 in asymptomatic patients)")
        .dose_range("10 ml/kg")
        .section(
            ResultSection::new("Volume", format!("{} ml", fixed(dose, 0))).with_detail(format!(
                "{} kg × 10 ml/kg = {} ml",
                plain(w),
                fixed(dose, 0)
            )),
        )
        .section(ResultSection::new("Duration", "Over 30 mins"));
    if let Some(count) = count {
        result = result.section(ResultSection::new(
            "Platelet Count",
            format!("Current: {}/µL", grouped(count)),
        ));
    }
    result
        .note("In asymptomatic patients (no bleeding): consider transfusion if < 30,000")
        .note("10 ml/kg over 30 mins")
        .note("Max: 1 unit (300 ml)")
        .note("Expected rise: 50,000-100,000/µL per unit")
}

fn vitamin_k(group: VitaminKGroup) -> SimpleResult {
    let (dose, basis) = match group {
        VitaminKGroup::Infant => ("1-2 mg", "Infant/Child: 1-2 mg/dose OD IV"),
        VitaminKGroup::Adolescent => ("2.5-10 mg", "Adolescent: 2.5-10 mg per dose IV"),
    };
    SimpleResult::new("Vitamin K")
        .subtitle("Indication: Prolonged PT")
        .dose_range(dose)
        .frequency("OD IV")
        .section(ResultSection::new("Dose", dose).with_detail("OD IV"))
        .note(basis)
        .note("Effect seen in 6-8 hours")
        .note("May need to repeat if still prolonged")
}

pub fn calculate(
    inputs: &PatientInputs,
    product: BloodProduct,
    vitamin_k_group: VitaminKGroup,
) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let result = match product {
        BloodProduct::PackedRedCells => packed_red_cells(w),
        BloodProduct::FreshFrozenPlasma => fresh_frozen_plasma(w),
        BloodProduct::Cryoprecipitate => cryoprecipitate(w, positive(inputs.fibrinogen)),
        BloodProduct::Platelets => platelets(w, positive(inputs.platelet_count)),
        BloodProduct::VitaminK => vitamin_k(vitamin_k_group),
    };
    Some(result.into())
}
