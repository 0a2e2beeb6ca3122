use crate::config::DEFAULT_TARGET_SODIUM;
use crate::format::{fixed, plain, span};
use crate::models::inputs::{nonzero, nonzero_or};
use crate::models::{
    CalculationResult, HyponatremiaSeverity, PatientInputs, ResultSection, SimpleResult,
    SodiumDisorder,
};

use super::reference::{tier, HYPERNATREMIA_DEFAULT_WINDOW, HYPERNATREMIA_WINDOWS};

/// Free-water plan for hypernatremia.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeWaterPlan {
    pub deficit_ml: f64,
    pub maintenance_ml: f64,
    pub total_ml: f64,
    pub window_hours: u32,
    pub rate_ml_per_hr: f64,
}

/// Correction window in hours, by current Na.
pub fn correction_window(current_na: f64) -> u32 {
    tier(current_na, HYPERNATREMIA_WINDOWS, HYPERNATREMIA_DEFAULT_WINDOW)
}

pub fn free_water_plan(weight_kg: f64, current_na: f64, target_na: f64) -> FreeWaterPlan {
    let deficit_ml = 4.0 * weight_kg * (current_na - target_na);
    let maintenance_ml = weight_kg * 100.0;
    let total_ml = maintenance_ml + deficit_ml;
    let window_hours = correction_window(current_na);
    FreeWaterPlan {
        deficit_ml,
        maintenance_ml,
        total_ml,
        window_hours,
        rate_ml_per_hr: total_ml / f64::from(window_hours),
    }
}

/// Na deficit (mEq): weight x 0.6 x (target - current).
pub fn sodium_deficit(weight_kg: f64, current_na: f64, target_na: f64) -> f64 {
    weight_kg * 0.6 * (target_na - current_na)
}

fn severe_hyponatremia(w: f64) -> SimpleResult {
    SimpleResult::new("Hyponatremia Correction (Severe)")
        .subtitle("Na < 125 with seizure or encephalopathy")
        .dose_range("3-5 ml/kg bolus (3% NaCl)")
        .section(
            ResultSection::new(
                "3% NaCl Bolus",
                format!("{} ml", span(w * 3.0, w * 5.0, 0)),
            )
            .with_detail("Over 15-30 mins"),
        )
        .section(
            ResultSection::new(
                "3% NaCl Infusion",
                format!("{} ml/hr", span(w, w * 2.0, 0)),
            )
            .with_detail("1-2 ml/kg/hr continuous"),
        )
        .section(
            ResultSection::new("Goal", "Increase Na by 6-8 mEq/L")
                .with_detail("Check Na every 20 mins until symptoms resolve"),
        )
        .note("Reference: Maintenance = 1-3 mEq/kg (1 mEq = 2 ml of 3% NaCl)")
        .note("3% NaCl = 0.513 mEq/ml (513 mEq/L)")
        .note("May repeat bolus up to 2 times")
        .warning("Do not exceed 10-12 mEq/L rise in 24 hours")
}

fn mild_hyponatremia(w: f64, na: f64, target: f64) -> SimpleResult {
    SimpleResult::new("Hyponatremia Correction (Mild)")
        .subtitle(format!("Na {} mEq/L", plain(na)))
        .dose_range("Na deficit formula")
        .section(ResultSection::new(
            "Na Deficit",
            format!("{} mEq", fixed(sodium_deficit(w, na, target), 1)),
        ))
        .section(ResultSection::new(
            "Na Maintenance",
            format!("{} mEq/day", span(w * 2.0, w * 5.0, 1)),
        ))
        .section(ResultSection::new(
            "Fluid Options",
            "NS: 154 | 1/2NS: 77 | 3%NaCl: 513 mEq/L",
        ))
        .note("Correction max 10-12 mEq/day = 0.5 mEq/hr")
}

fn hypernatremia(w: f64, na: f64, target: f64) -> SimpleResult {
    let plan = free_water_plan(w, na, target);
    SimpleResult::new("Hypernatremia Correction")
        .subtitle(format!("Na {} mEq/L", plain(na)))
        .dose_range("Free water deficit formula")
        .section(ResultSection::new(
            "Free Water Deficit",
            format!("{} ml", fixed(plan.deficit_ml, 1)),
        ))
        .section(ResultSection::new(
            "Total Fluid",
            format!("{} ml over {}h", fixed(plan.total_ml, 0), plan.window_hours),
        ))
        .section(ResultSection::new(
            "Rate",
            format!("{} ml/hr", fixed(plan.rate_ml_per_hr, 1)),
        ))
        .warning("Don't drop Na >12 mEq/24hr")
}

/// Requires a weight and a non-zero current Na; target defaults to 140.
pub fn calculate(
    inputs: &PatientInputs,
    disorder: SodiumDisorder,
    severity: HyponatremiaSeverity,
) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let na = nonzero(inputs.sodium)?;
    let target = nonzero_or(inputs.target_sodium, DEFAULT_TARGET_SODIUM);

    let result = match (disorder, severity) {
        (SodiumDisorder::Hyponatremia, HyponatremiaSeverity::Severe) => severe_hyponatremia(w),
        (SodiumDisorder::Hyponatremia, HyponatremiaSeverity::Mild) => {
            mild_hyponatremia(w, na, target)
        }
        (SodiumDisorder::Hypernatremia, _) => hypernatremia(w, na, target),
    };
    Some(result.into())
}
