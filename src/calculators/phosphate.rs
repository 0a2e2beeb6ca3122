use crate::format::fixed;
use crate::models::{CalculationResult, PatientInputs, PhosphateSeverity, ResultSection, SimpleResult};

pub const MAX_DOSE_MMOL: f64 = 15.0;
/// Addiphos: 1 mL = 2 mmol.
pub const STOCK_MMOL_PER_ML: f64 = 2.0;
pub const PERIPHERAL_MMOL_PER_ML: f64 = 0.05;
pub const CENTRAL_MMOL_PER_ML: f64 = 0.12;

/// mmol/kg bounds and label for a severity.
pub fn severity_range(severity: PhosphateSeverity) -> (f64, f64, &'static str) {
    match severity {
        PhosphateSeverity::Severe => (0.25, 0.5, "Severe (P < 1 mg/dL)"),
        PhosphateSeverity::Moderate => (0.08, 0.16, "Moderate (P 1-2 mg/dL)"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhosphateDose {
    pub min_mmol: f64,
    pub max_mmol: f64,
    pub capped: bool,
}

pub fn phosphate_dose(weight_kg: f64, severity: PhosphateSeverity) -> PhosphateDose {
    let (lo, hi, _) = severity_range(severity);
    let uncapped = weight_kg * hi;
    let max_mmol = uncapped.min(MAX_DOSE_MMOL);
    PhosphateDose {
        min_mmol: (weight_kg * lo).min(max_mmol),
        max_mmol,
        capped: uncapped > MAX_DOSE_MMOL,
    }
}

fn dilution(dose: &PhosphateDose, mmol_per_ml: f64) -> String {
    let drug_min = dose.min_mmol / STOCK_MMOL_PER_ML;
    let drug_max = dose.max_mmol / STOCK_MMOL_PER_ML;
    let total_min = dose.min_mmol / mmol_per_ml;
    let total_max = dose.max_mmol / mmol_per_ml;
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

pub fn calculate(inputs: &PatientInputs, severity: PhosphateSeverity) -> Option<CalculationResult> {
    let w = inputs.weight()?;
    let d = phosphate_dose(w, severity);
    let (lo, hi, label) = severity_range(severity);

    let mut result = SimpleResult::new("Phosphate Replacement (IV)")
        .dose_range(format!("{lo}-{hi} mmol/kg"))
        .section(ResultSection::new("Severity", label))
        .section(ResultSection::new(
            "Dose",
            format!(
                "{} - {} mmol ({} - {} ml Addiphos)",
                fixed(d.min_mmol, 2),
                fixed(d.max_mmol, 2),
                fixed(d.min_mmol / STOCK_MMOL_PER_ML, 2),
                fixed(d.max_mmol / STOCK_MMOL_PER_ML, 2)
            ),
        ))
        .section(ResultSection::new(
            "Dilution - Peripheral (0.05 mmol/ml)",
            dilution(&d, PERIPHERAL_MMOL_PER_ML),
        ))
        .section(ResultSection::new(
            "Dilution - Central (0.12 mmol/ml)",
            dilution(&d, CENTRAL_MMOL_PER_ML),
        ))
        .section(ResultSection::new("Infusion", "Over 4-6 hours (slow)"))
        .note("Stock: Addiphos 1 ml = 2 mmol")
        .note(format!("Max single dose: {} mmol", fixed(MAX_DOSE_MMOL, 0)))
        .note("Compatible: NS, D5W")
        .warning("Rapid infusion can cause severe hypocalcemia!");

    if d.capped {
        result = result.warning("Dose capped at maximum (15 mmol)");
    }
    Some(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(w: f64, severity: PhosphateSeverity) -> SimpleResult {
        calculate(&PatientInputs::with_weight(w), severity)
            .and_then(|r| r.as_simple().cloned())
            .unwrap()
    }

    #[test]
    fn moderate_ten_kg() {
        let d = phosphate_dose(10.0, PhosphateSeverity::Moderate);
        assert!((d.min_mmol - 0.8).abs() < 1e-12);
        assert!((d.max_mmol - 1.6).abs() < 1e-12);
        assert!(!d.capped);

        let r = run(10.0, PhosphateSeverity::Moderate);
        assert_eq!(r.dose_range.as_deref(), Some("0.08-0.16 mmol/kg"));
        assert_eq!(r.find_section("Severity").unwrap().value, "Moderate (P 1-2 mg/dL)");
        assert_eq!(
            r.find_section("Dose").unwrap().value,
            "0.80 - 1.60 mmol (0.40 - 0.80 ml Addiphos)"
        );
        assert_eq!(r.warnings, vec!["Rapid infusion can cause severe hypocalcemia!"]);
    }

    #[test]
    fn severe_caps_at_fifteen() {
        let d = phosphate_dose(40.0, PhosphateSeverity::Severe);
        assert_eq!(d.max_mmol, 15.0);
        assert_eq!(d.min_mmol, 10.0);
        assert!(d.capped);

        let r = run(40.0, PhosphateSeverity::Severe);
        assert_eq!(r.dose_range.as_deref(), Some("0.25-0.5 mmol/kg"));
        assert_eq!(
            r.warnings,
            vec![
                "Rapid infusion can cause severe hypocalcemia!",
                "Dose capped at maximum (15 mmol)"
            ]
        );
    }

    #[test]
    fn lower_bound_clamped_to_cap() {
        let d = phosphate_dose(100.0, PhosphateSeverity::Severe);
        assert_eq!(d.min_mmol, 15.0);
        assert_eq!(d.max_mmol, 15.0);
    }
}
