//! Electrolyte infusion dilutions.
//!
//! Each drug turns a weight into a capped dose, the stock volume to draw,
//! the diluent needed to reach a safe final concentration, and a rate.
//! Without a weight every drug returns the "Enter Weight First" placeholder.

use crate::config::DEFAULT_KCL_CUSTOM_MEQ_PER_100ML;
use crate::format::{fixed, plain, span};
use crate::models::inputs::nonzero_or;
use crate::models::{
    CalculationResult, DrugInfo, ElectrolyteDrug, InfusionResult, InfusionSteps, KclConcentration,
    KclLine, LineType, PatientInputs, SimpleResult,
};

use super::reference::{self, kcl_line_limit, to_owned_list};

/// Options the infusion panel exposes for KCl and Addiphos.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InfusionOptions {
    pub kcl_line: KclLine,
    pub kcl_concentration: KclConcentration,
    pub addiphos_line: LineType,
}

/// A weight-scaled range clamped to a per-dose cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CappedRange {
    pub min: f64,
    pub max: f64,
    pub capped: bool,
}

/// Upper bound clamped to `cap`; lower bound never exceeds the clamped upper.
pub fn capped_range(weight_kg: f64, per_kg_min: f64, per_kg_max: f64, cap: f64) -> CappedRange {
    let uncapped = weight_kg * per_kg_max;
    let max = uncapped.min(cap);
    CappedRange {
        min: (weight_kg * per_kg_min).min(max),
        max,
        capped: uncapped > cap,
    }
}

fn cap_suffix(capped: bool) -> &'static str {
    if capped {
        " (MAX)"
    } else {
        ""
    }
}

fn capped_formula(capped: bool, cap: f64, unit: &str) -> String {
    if capped {
        format!(" -> capped at {} {unit}", plain(cap))
    } else {
        String::new()
    }
}

pub fn calculate(
    inputs: &PatientInputs,
    drug: ElectrolyteDrug,
    options: &InfusionOptions,
) -> CalculationResult {
    let Some(w) = inputs.weight() else {
        return SimpleResult::enter_weight_first().into();
    };
    let result = match drug {
        ElectrolyteDrug::CalciumGluconate => calcium_gluconate(w),
        ElectrolyteDrug::PotassiumChloride => {
            let custom = nonzero_or(inputs.kcl_custom_meq_per_100ml, DEFAULT_KCL_CUSTOM_MEQ_PER_100ML);
            potassium_chloride(w, options.kcl_line, options.kcl_concentration, custom)
        }
        ElectrolyteDrug::MagnesiumSulfate => magnesium_sulfate(w),
        ElectrolyteDrug::SodiumBicarbonate => sodium_bicarbonate(w),
        ElectrolyteDrug::CalciumChloride => calcium_chloride(w),
        ElectrolyteDrug::Addiphos => addiphos(w, options.addiphos_line),
    };
    result.into()
}

// ═══════════════════════════════════════════════════════════
// Calcium gluconate 10%
// ═══════════════════════════════════════════════════════════

pub fn calcium_gluconate(w: f64) -> InfusionResult {
    const MAX_MG: f64 = 1000.0;
    let uncapped = w * 100.0;
    let capped = uncapped > MAX_MG;
    let dose_mg = uncapped.min(MAX_MG);
    let dose_ml = dose_mg / 100.0;
    let total = dose_mg / 50.0;
    let diluent = total - dose_ml;

    let mut warnings = Vec::new();
    if capped {
        warnings.push("Dose capped at maximum (1g / 10ml)".to_string());
    }

    InfusionResult {
        title: "Calcium Gluconate 10%".into(),
        drug_info: DrugInfo {
            concentration: "100 mg/ml (0.45 mEq/ml)".into(),
            target_dilution: "50 mg/ml".into(),
            max_dose: format!("{} mg ({} ml)", plain(MAX_MG), plain(MAX_MG / 100.0)),
            dose_range: "50-100 mg/kg/dose".into(),
            line_recommendation: None,
        },
        calculation: InfusionSteps {
            dose: format!("{} mg{}", fixed(dose_mg, 0), cap_suffix(capped)),
            dose_formula: format!(
                "{} kg x 100 mg/kg = {} mg{}",
                plain(w),
                fixed(uncapped, 0),
                capped_formula(capped, MAX_MG, "mg")
            ),
            drug_volume: format!("{} ml", fixed(dose_ml, 1)),
            diluent: format!("{} ml (NS or D5W)", fixed(diluent, 1)),
            total_volume: format!("{} ml (at 50 mg/ml)", fixed(total, 1)),
            duration: "1 hour".into(),
            rate: format!("{} ml/hr", fixed(total, 1)),
        },
        preparation: format!(
            "Draw {} ml Ca Gluconate + {} ml NS = {} ml",
            fixed(dose_ml, 1),
            fixed(diluent, 1),
            fixed(total, 1)
        ),
        compatible: to_owned_list(reference::CALCIUM_GLUCONATE_COMPATIBLE),
        incompatible: to_owned_list(reference::CALCIUM_GLUCONATE_INCOMPATIBLE),
        warnings,
    }
}

// ═══════════════════════════════════════════════════════════
// Potassium chloride
// ═══════════════════════════════════════════════════════════

/// Volumes for the 0.5-1 mEq/kg KCl range at a line's maximum concentration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KclDilution {
    pub dose: CappedRange,
    pub drug_volume_min: f64,
    pub drug_volume_max: f64,
    pub total_volume_min: f64,
    pub total_volume_max: f64,
    pub diluent_min: f64,
    pub diluent_max: f64,
    /// Minimum dose over 1 hour.
    pub rate_1h: f64,
    /// Maximum dose over 2 hours.
    pub rate_2h: f64,
}

pub const KCL_MAX_MEQ: f64 = 40.0;

pub fn kcl_dilution(w: f64, stock_meq_per_ml: f64, target_meq_per_ml: f64) -> KclDilution {
    let dose = capped_range(w, 0.5, 1.0, KCL_MAX_MEQ);
    let drug_volume_min = dose.min / stock_meq_per_ml;
    let drug_volume_max = dose.max / stock_meq_per_ml;
    let total_volume_min = dose.min / target_meq_per_ml;
    let total_volume_max = dose.max / target_meq_per_ml;
    KclDilution {
        dose,
        drug_volume_min,
        drug_volume_max,
        total_volume_min,
        total_volume_max,
        diluent_min: total_volume_min - drug_volume_min,
        diluent_max: total_volume_max - drug_volume_max,
        rate_1h: total_volume_min,
        rate_2h: total_volume_max / 2.0,
    }
}

pub fn potassium_chloride(
    w: f64,
    line: KclLine,
    concentration: KclConcentration,
    custom_meq_per_100ml: f64,
) -> InfusionResult {
    let limit = kcl_line_limit(line, custom_meq_per_100ml);
    let target_label = match line {
        KclLine::Custom => format!("{} mEq/100ml (Custom)", plain(custom_meq_per_100ml)),
        _ => limit.label.to_string(),
    };
    let d = kcl_dilution(w, concentration.meq_per_ml(), limit.meq_per_ml);

    let mut warnings = Vec::new();
    if d.dose.capped {
        warnings.push("Dose capped at maximum (40 mEq)".to_string());
    }

    InfusionResult {
        title: "Potassium Chloride (KCl)".into(),
        drug_info: DrugInfo {
            concentration: concentration.label().into(),
            target_dilution: target_label,
            max_dose: format!("{} mEq/dose", plain(KCL_MAX_MEQ)),
            dose_range: "0.5-1 mEq/kg/dose".into(),
            line_recommendation: Some(limit.recommendation.into()),
        },
        calculation: InfusionSteps {
            dose: format!(
                "{} - {} mEq{}",
                fixed(d.dose.min, 2),
                fixed(d.dose.max, 2),
                cap_suffix(d.dose.capped)
            ),
            dose_formula: "0.5 mEq/kg over 1hr | 1 mEq/kg over 2hr".into(),
            drug_volume: format!(
                "{} - {} ml",
                fixed(d.drug_volume_min, 2),
                fixed(d.drug_volume_max, 2)
            ),
            diluent: format!(
                "{} - {} ml NS",
                fixed(d.diluent_min, 0),
                fixed(d.diluent_max, 0)
            ),
            total_volume: format!(
                "{} - {} ml",
                fixed(d.total_volume_min, 0),
                fixed(d.total_volume_max, 0)
            ),
            duration: "1-2 hours".into(),
            rate: format!(
                "{} ml/hr (1h) | {} ml/hr (2h)",
                fixed(d.rate_1h, 1),
                fixed(d.rate_2h, 1)
            ),
        },
        preparation: format!(
            "{} ml KCl {}% + {} ml NS = {} ml",
            fixed(d.drug_volume_max, 2),
            concentration.as_str(),
            fixed(d.diluent_max, 0),
            fixed(d.total_volume_max, 0)
        ),
        compatible: to_owned_list(reference::KCL_COMPATIBLE),
        incompatible: to_owned_list(reference::KCL_INCOMPATIBLE),
        warnings,
    }
}

// ═══════════════════════════════════════════════════════════
// Magnesium sulfate 50%
// ═══════════════════════════════════════════════════════════

pub fn magnesium_sulfate(w: f64) -> InfusionResult {
    const MAX_MG: f64 = 2000.0;
    let dose = capped_range(w, 25.0, 50.0, MAX_MG);
    let drug_min = dose.min / 500.0;
    let drug_max = dose.max / 500.0;
    let total_min = dose.min / 60.0;
    let total_max = dose.max / 60.0;
    let diluent_min = total_min - drug_min;
    let diluent_max = total_max - drug_max;

    let mut warnings = Vec::new();
    if dose.capped {
        warnings.push("Dose capped at maximum (2g)".to_string());
    }

    InfusionResult {
        title: "Magnesium Sulfate 50%".into(),
        drug_info: DrugInfo {
            concentration: "500 mg/ml (2 mmol/ml, 4 mEq/ml)".into(),
            target_dilution: "60 mg/ml".into(),
            max_dose: format!("{} mg ({} ml)", plain(MAX_MG), plain(MAX_MG / 500.0)),
            dose_range: "25-50 mg/kg/dose".into(),
            line_recommendation: None,
        },
        calculation: InfusionSteps {
            dose: format!(
                "{} - {} mg{}",
                fixed(dose.min, 0),
                fixed(dose.max, 0),
                cap_suffix(dose.capped)
            ),
            dose_formula: format!(
                "{} kg x 25-50 mg/kg{}",
                plain(w),
                capped_formula(dose.capped, MAX_MG, "mg")
            ),
            drug_volume: format!("{} ml", span(drug_min, drug_max, 2)),
            diluent: format!("{} ml", span(diluent_min, diluent_max, 1)),
            total_volume: format!("{} ml", span(total_min, total_max, 1)),
            duration: "2-4 hours".into(),
            rate: format!(
                "{} - {} ml/hr",
                fixed(total_min / 4.0, 1),
                fixed(total_max / 2.0, 1)
            ),
        },
        preparation: format!(
            "Draw {} ml MgSO4 50% + {} ml diluent = {} ml",
            fixed(drug_max, 2),
            fixed(diluent_max, 1),
            fixed(total_max, 1)
        ),
        compatible: to_owned_list(reference::MGSO4_COMPATIBLE),
        incompatible: to_owned_list(reference::MGSO4_INCOMPATIBLE),
        warnings,
    }
}

// ═══════════════════════════════════════════════════════════
// Sodium bicarbonate 8.4%
// ═══════════════════════════════════════════════════════════

pub fn sodium_bicarbonate(w: f64) -> InfusionResult {
    const MAX_MEQ: f64 = 50.0;
    let dose = capped_range(w, 1.0, 2.0, MAX_MEQ);
    // 1 mEq/mL stock diluted 1:1.
    let total_min = dose.min + dose.min;
    let total_max = dose.max + dose.max;

    let mut warnings = Vec::new();
    if dose.capped {
        warnings.push("Dose capped at maximum (50 mEq)".to_string());
    }

    InfusionResult {
        title: "Sodium Bicarbonate 8.4%".into(),
        drug_info: DrugInfo {
            concentration: "1 mEq/ml (8.4%)".into(),
            target_dilution: "1:1 dilution (1 mEq in 2 ml final volume)".into(),
            max_dose: format!(
                "{} mEq/dose (neonates), 100 mEq (older children)",
                plain(MAX_MEQ)
            ),
            dose_range: "1-2 mEq/kg/dose".into(),
            line_recommendation: None,
        },
        calculation: InfusionSteps {
            dose: format!(
                "{} - {} mEq{}",
                fixed(dose.min, 1),
                fixed(dose.max, 1),
                cap_suffix(dose.capped)
            ),
            dose_formula: format!(
                "{} kg x 1-2 mEq/kg{}",
                plain(w),
                capped_formula(dose.capped, MAX_MEQ, "mEq")
            ),
            drug_volume: format!("{} ml", span(dose.min, dose.max, 1)),
            diluent: format!(
                "{} - {} ml (1:1 dilution)",
                fixed(dose.min, 1),
                fixed(dose.max, 1)
            ),
            total_volume: format!("{} ml", span(total_min, total_max, 1)),
            duration: "30 min - 1 hour".into(),
            rate: format!(
                "{} ml/hr (1h) or {} ml/hr (30min)",
                fixed(total_max, 1),
                fixed(total_max * 2.0, 1)
            ),
        },
        preparation: format!(
            "Draw {} ml NaHCO3 + {} ml NS = {} ml",
            fixed(dose.max, 1),
            fixed(dose.max, 1),
            fixed(total_max, 1)
        ),
        compatible: to_owned_list(reference::NAHCO3_COMPATIBLE),
        incompatible: to_owned_list(reference::NAHCO3_INCOMPATIBLE),
        warnings,
    }
}

// ═══════════════════════════════════════════════════════════
// Calcium chloride 10%
// ═══════════════════════════════════════════════════════════

pub fn calcium_chloride(w: f64) -> InfusionResult {
    const MAX_MG: f64 = 1000.0;
    let uncapped = w * 10.0;
    let capped = uncapped > MAX_MG;
    let dose_mg = uncapped.min(MAX_MG);
    let dose_ml = dose_mg / 100.0;
    let total = dose_mg / 15.0;
    let diluent = total - dose_ml;

    let mut warnings = Vec::new();
    if capped {
        warnings.push("Dose capped at maximum (1g)".to_string());
    }
    warnings.push("CENTRAL LINE PREFERRED - Highly vesicant!".to_string());
    warnings.push("If peripheral: use large vein, dilute well, infuse slowly".to_string());

    InfusionResult {
        title: "Calcium Chloride 10%".into(),
        drug_info: DrugInfo {
            concentration: "100 mg/ml (1.4 mEq/ml)".into(),
            target_dilution: "15-20 mg/ml (peripheral) or undiluted (central)".into(),
            max_dose: format!("{} mg ({} ml)", plain(MAX_MG), plain(MAX_MG / 100.0)),
            dose_range: "10-20 mg/kg/dose".into(),
            line_recommendation: None,
        },
        calculation: InfusionSteps {
            dose: format!("{} mg{}", fixed(dose_mg, 0), cap_suffix(capped)),
            dose_formula: format!(
                "{} kg x 10 mg/kg{}",
                plain(w),
                capped_formula(capped, MAX_MG, "mg")
            ),
            drug_volume: format!("{} ml", fixed(dose_ml, 2)),
            diluent: format!("{} ml (for peripheral at 15 mg/ml)", fixed(diluent, 1)),
            total_volume: format!("{} ml", fixed(total, 1)),
            duration: "1 hour (10 min minimum)".into(),
            rate: format!("{} ml/hr", fixed(total, 1)),
        },
        preparation: format!(
            "Draw {} ml CaCl2 + {} ml NS = {} ml",
            fixed(dose_ml, 2),
            fixed(diluent, 1),
            fixed(total, 1)
        ),
        compatible: to_owned_list(reference::CACL2_COMPATIBLE),
        incompatible: to_owned_list(reference::CACL2_INCOMPATIBLE),
        warnings,
    }
}

// ═══════════════════════════════════════════════════════════
// Addiphos
// ═══════════════════════════════════════════════════════════

pub fn addiphos(w: f64, line: LineType) -> InfusionResult {
    const MAX_MMOL: f64 = 15.0;
    let dose = capped_range(w, 0.5, 1.5, MAX_MMOL);
    let (target, target_label) = match line {
        LineType::Peripheral => (0.05, "0.05 mmol/ml (peripheral)"),
        LineType::Central => (0.12, "0.12 mmol/ml (central)"),
    };
    let volume_min = dose.min / 2.0;
    let volume_max = dose.max / 2.0;
    let total_min = dose.min / target;
    let total_max = dose.max / target;
    let diluent_min = total_min - volume_min;
    let diluent_max = total_max - volume_max;

    let mut warnings = Vec::new();
    if dose.capped {
        warnings.push("Dose capped at maximum (15 mmol)".to_string());
    }

    InfusionResult {
        title: "Addiphos (Phosphate)".into(),
        drug_info: DrugInfo {
            concentration: "1 ml = 2 mmol phosphate".into(),
            target_dilution: target_label.into(),
            max_dose: format!("{} mmol/dose", plain(MAX_MMOL)),
            dose_range: "0.5-1.5 mmol/kg/day".into(),
            line_recommendation: None,
        },
        calculation: InfusionSteps {
            dose: format!(
                "{} - {} mmol/day{}",
                fixed(dose.min, 1),
                fixed(dose.max, 1),
                cap_suffix(dose.capped)
            ),
            dose_formula: format!(
                "{} kg x 0.5-1.5 mmol/kg/day{}",
                plain(w),
                capped_formula(dose.capped, MAX_MMOL, "mmol")
            ),
            drug_volume: format!("{} ml", span(volume_min, volume_max, 2)),
            diluent: format!(
                "{} - {} ml (to achieve {target_label})",
                fixed(diluent_min, 0),
                fixed(diluent_max, 0)
            ),
            total_volume: format!("{} ml", span(total_min, total_max, 0)),
            duration: "4-6 hours (slow infusion)".into(),
            rate: "Divide into 2-4 doses per day".into(),
        },
        preparation: format!(
            "For max dose: {} ml Addiphos + {} ml NS = {} ml",
            fixed(volume_max, 2),
            fixed(diluent_max, 0),
            fixed(total_max, 0)
        ),
        compatible: to_owned_list(reference::ADDIPHOS_COMPATIBLE),
        incompatible: to_owned_list(reference::ADDIPHOS_INCOMPATIBLE),
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kcl_peripheral_ten_kg() {
        let d = kcl_dilution(10.0, 2.0, 0.08);
        assert_eq!(d.dose.max, 10.0);
        assert_eq!(d.drug_volume_max, 5.0);
        assert_eq!(d.total_volume_max, 125.0);
        assert_eq!(d.diluent_max, 120.0);
        assert_eq!(d.rate_2h, 62.5);

        let r = potassium_chloride(10.0, KclLine::Peripheral, KclConcentration::FifteenPercent, 4.0);
        assert_eq!(r.preparation, "5.00 ml KCl 15% + 120 ml NS = 125 ml");
        assert_eq!(r.drug_info.line_recommendation.as_deref(), Some("Peripheral line safe"));
        assert_eq!(r.calculation.dose, "5.00 - 10.00 mEq");
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn kcl_line_and_strength_toggle() {
        let r = potassium_chloride(10.0, KclLine::Central, KclConcentration::TenPercent, 4.0);
        assert_eq!(r.drug_info.concentration, "10% KCl = 1.34 mEq/ml");
        assert_eq!(r.drug_info.target_dilution, "15 mEq/100ml (Central)");
        assert_eq!(r.drug_info.line_recommendation.as_deref(), Some("Central line required"));
        assert_eq!(r.calculation.drug_volume, "3.73 - 7.46 ml");
        assert_eq!(r.calculation.total_volume, "33 - 67 ml");
    }

    #[test]
    fn kcl_custom_concentration() {
        let r = potassium_chloride(10.0, KclLine::Custom, KclConcentration::FifteenPercent, 10.0);
        assert_eq!(r.drug_info.target_dilution, "10 mEq/100ml (Custom)");
        assert_eq!(r.drug_info.line_recommendation.as_deref(), Some("Central line required"));
        assert_eq!(r.calculation.total_volume, "50 - 100 ml");
    }

    #[test]
    fn kcl_cap() {
        let r = potassium_chloride(50.0, KclLine::Peripheral, KclConcentration::FifteenPercent, 4.0);
        assert_eq!(r.calculation.dose, "25.00 - 40.00 mEq (MAX)");
        assert_eq!(r.warnings, vec!["Dose capped at maximum (40 mEq)"]);
    }

    #[test]
    fn calcium_gluconate_cap() {
        let r = calcium_gluconate(15.0);
        assert_eq!(r.calculation.dose, "1000 mg (MAX)");
        assert_eq!(
            r.calculation.dose_formula,
            "15 kg x 100 mg/kg = 1500 mg -> capped at 1000 mg"
        );
        assert_eq!(r.calculation.rate, "20.0 ml/hr");
        assert_eq!(r.warnings[0], "Dose capped at maximum (1g / 10ml)");
        assert!(r.incompatible.contains(&"Ceftriaxone".to_string()));
    }

    #[test]
    fn magnesium_sulfate_rates() {
        let r = magnesium_sulfate(12.0);
        assert_eq!(r.calculation.dose, "300 - 600 mg");
        assert_eq!(r.calculation.total_volume, "5.0 - 10.0 ml");
        assert_eq!(r.calculation.rate, "1.3 - 5.0 ml/hr");
    }

    #[test]
    fn bicarbonate_equal_volume() {
        let r = sodium_bicarbonate(5.0);
        assert_eq!(r.calculation.total_volume, "10.0 - 20.0 ml");
        assert_eq!(r.calculation.rate, "20.0 ml/hr (1h) or 40.0 ml/hr (30min)");
        assert_eq!(r.preparation, "Draw 10.0 ml NaHCO3 + 10.0 ml NS = 20.0 ml");
    }

    #[test]
    fn calcium_chloride_cap_warning_comes_first() {
        let r = calcium_chloride(120.0);
        assert_eq!(
            r.warnings,
            vec![
                "Dose capped at maximum (1g)",
                "CENTRAL LINE PREFERRED - Highly vesicant!",
                "If peripheral: use large vein, dilute well, infuse slowly",
            ]
        );
        let r = calcium_chloride(10.0);
        assert_eq!(r.warnings[0], "CENTRAL LINE PREFERRED - Highly vesicant!");
        assert_eq!(r.calculation.drug_volume, "1.00 ml");
    }

    #[test]
    fn addiphos_line_changes_target() {
        let p = addiphos(10.0, LineType::Peripheral);
        let c = addiphos(10.0, LineType::Central);
        assert_eq!(p.calculation.total_volume, "100 - 300 ml");
        assert_eq!(c.calculation.total_volume, "42 - 125 ml");
        assert_eq!(p.preparation, "For max dose: 7.50 ml Addiphos + 293 ml NS = 300 ml");
    }

    #[test]
    fn placeholder_without_weight() {
        for drug in ElectrolyteDrug::ALL {
            let r = calculate(&PatientInputs::default(), *drug, &InfusionOptions::default());
            assert_eq!(r.title(), "Enter Weight First");
        }
    }

    #[test]
    fn dispatch_uses_custom_kcl_input() {
        let inputs = PatientInputs {
            kcl_custom_meq_per_100ml: Some(5.0),
            ..PatientInputs::with_weight(10.0)
        };
        let options = InfusionOptions {
            kcl_line: KclLine::Custom,
            ..Default::default()
        };
        let r = calculate(&inputs, ElectrolyteDrug::PotassiumChloride, &options);
        assert_eq!(r.as_infusion().unwrap().drug_info.target_dilution, "5 mEq/100ml (Custom)");
    }
}
