//! Glucose infusion rate, forward (from fluid intake) and inverse (rate for a target GIR).

use crate::config::DEFAULT_DEXTROSE_PERCENT;
use crate::format::{fixed, plain};
use crate::models::inputs::nonzero;
use crate::models::{CalculationResult, PatientInputs, ResultSection, SimpleResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlucoseDelivery {
    pub total_fluid_ml_day: f64,
    pub glucose_g_day: f64,
    pub glucose_mg_day: f64,
    /// mg/kg/min
    pub gir: f64,
    pub hourly_rate_ml: f64,
}

pub fn glucose_delivery(weight_kg: f64, tfi_ml_kg_day: f64, dextrose_percent: f64) -> GlucoseDelivery {
    let total_fluid_ml_day = tfi_ml_kg_day * weight_kg;
    let glucose_g_day = total_fluid_ml_day * (dextrose_percent / 100.0);
    let glucose_mg_day = glucose_g_day * 1000.0;
    GlucoseDelivery {
        total_fluid_ml_day,
        glucose_g_day,
        glucose_mg_day,
        gir: glucose_mg_day / weight_kg / 24.0 / 60.0,
        hourly_rate_ml: total_fluid_ml_day / 24.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfusion {
    pub rate_ml_hr: f64,
    pub daily_volume_ml: f64,
    pub tfi_ml_kg_day: f64,
}

/// Rate (mL/hr) = GIR x 6 x weight / dextrose %.
pub fn target_infusion(weight_kg: f64, target_gir: f64, dextrose_percent: f64) -> TargetInfusion {
    let rate_ml_hr = target_gir * 6.0 * weight_kg / dextrose_percent;
    let daily_volume_ml = rate_ml_hr * 24.0;
    TargetInfusion {
        rate_ml_hr,
        daily_volume_ml,
        tfi_ml_kg_day: daily_volume_ml / weight_kg,
    }
}

fn dextrose(inputs: &PatientInputs) -> Option<f64> {
    nonzero(Some(inputs.dextrose_percent.unwrap_or(DEFAULT_DEXTROSE_PERCENT)))
}

fn with_reference_notes(result: SimpleResult) -> SimpleResult {
    result
        .note("Normal GIR: 4-6 mg/kg/min (neonates)")
        .note("Hypoglycemia: May need 6-8 mg/kg/min")
        .note("Max peripheral: ~12.5% dextrose")
        .note("Central line needed for >12.5% dextrose")
}

/// GIR from total fluid intake (mL/kg/day) and dextrose %.
pub fn gir(inputs: &PatientInputs) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let tfi = nonzero(inputs.total_fluid_intake)?;
    let dex = dextrose(inputs)?;
    let d = glucose_delivery(w, tfi, dex);

    let total = fixed(d.total_fluid_ml_day, 1);
    let grams = fixed(d.glucose_g_day, 2);
    let mg = fixed(d.glucose_mg_day, 0);
    let gir = fixed(d.gir, 2);

    let result = SimpleResult::new("Glucose Infusion Rate")
        .subtitle(format!("D{}% at {} ml/kg/day", plain(dex), plain(tfi)))
        .section(ResultSection::new("GIR", format!("{gir} mg/kg/min")))
        .section(
            ResultSection::new("Total Fluid", format!("{total} ml/day")).with_detail(format!(
                "Total Fluid/day = TFI × Weight = {} × {} = {total} ml/day",
                plain(tfi),
                plain(w)
            )),
        )
        .section(
            ResultSection::new("Glucose", format!("{grams} g/day")).with_detail(format!(
                "Glucose (g) = Fluid × D{}%/100 = {total} × {} = {grams} g",
                plain(dex),
                plain(dex / 100.0)
            )),
        )
        .section(
            ResultSection::new("Glucose (mg)", format!("{mg} mg/day"))
                .with_detail(format!("Glucose (mg) = {grams} × 1000 = {mg} mg")),
        )
        .section(
            ResultSection::new("Calculation", format!("{gir} mg/kg/min")).with_detail(format!(
                "GIR = {mg} mg ÷ {} kg ÷ 24 hr ÷ 60 min = {gir} mg/kg/min",
                plain(w)
            )),
        )
        .section(ResultSection::new(
            "Hourly Rate",
            format!("{} ml/hr", fixed(d.hourly_rate_ml, 1)),
        ));
    Some(with_reference_notes(result).into())
}

/// Infusion rate delivering a target GIR (mg/kg/min).
pub fn gir_infusion_rate(inputs: &PatientInputs) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let target = nonzero(inputs.target_gir)?;
    let dex = dextrose(inputs)?;
    let t = target_infusion(w, target, dex);

    let rate = fixed(t.rate_ml_hr, 2);
    let result = SimpleResult::new("Infusion Rate for Target GIR")
        .subtitle(format!("GIR {} mg/kg/min with D{}%", plain(target), plain(dex)))
        .section(
            ResultSection::new("Infusion Rate", format!("{rate} ml/hr")).with_detail(format!(
                "Rate = GIR × 6 × Weight ÷ D% = {} × 6 × {} ÷ {} = {rate} ml/hr",
                plain(target),
                plain(w),
                plain(dex)
            )),
        )
        .section(ResultSection::new(
            "Daily Volume",
            format!("{} ml/day", fixed(t.daily_volume_ml, 1)),
        ))
        .section(ResultSection::new(
            "TFI",
            format!("{} ml/kg/day", fixed(t.tfi_ml_kg_day, 1)),
        ));
    Some(with_reference_notes(result).into())
}
