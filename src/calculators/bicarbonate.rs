use crate::format::fixed;
use crate::models::{BicarbonateMethod, CalculationResult, PatientInputs, ResultSection, SimpleResult};

pub const DESIRED_HCO3: f64 = 20.0;
/// Distribution factor applied to both correction formulas.
pub const DISTRIBUTION: f64 = 0.3;

/// mEq from the HCO3 deficit: (20 - HCO3) x 0.3 x weight.
pub fn hco3_correction(hco3: f64, weight_kg: f64) -> f64 {
    (DESIRED_HCO3 - hco3) * DISTRIBUTION * weight_kg
}

/// mEq from the base deficit: |BE| x 0.3 x weight.
pub fn base_excess_correction(base_excess: f64, weight_kg: f64) -> f64 {
    base_excess.abs() * DISTRIBUTION * weight_kg
}

/// Continuous infusion range, mEq/hr.
pub fn infusion_range(weight_kg: f64) -> (f64, f64) {
    (weight_kg * 0.25, weight_kg * 2.0)
}

fn correction_section(subtitle: &str, meq: f64) -> ResultSection {
    let half = fixed(meq / 2.0, 1);
    ResultSection::new(subtitle, format!("{} mEq", fixed(meq, 1)))
        .with_detail(format!("1st half: {half} mEq | 2nd half: {half} mEq"))
}

/// 8.4% stock is 1 mEq/mL, diluted with an equal volume.
fn dilution_section(meq: f64) -> ResultSection {
    ResultSection::new(
        "Dilution (1:1)",
        format!(
            "{} ml + {} ml NS = {} ml",
            fixed(meq, 1),
            fixed(meq, 1),
            fixed(meq + meq, 1)
        ),
    )
}

pub fn calculate(inputs: &PatientInputs, method: BicarbonateMethod) -> Option<CalculationResult> {
    let w = inputs.weight()?;

    let mut result = SimpleResult::new("NaHCO3 Correction")
        .dose_range("1-2 mEq/kg (acute)")
        .note("Normal HCO3 range: 18-22 mEq/L")
        .note("Correct when HCO3 < 12 or symptomatic")
        .note("Stock: 8.4% = 1 mEq/ml")
        .note("Compatible: NS, D5W")
        .warning("Give in 2 halves: 1st half in 1st hour, 2nd half over 24 hours")
        .warning("In chronic acidosis with hypocalcemia: correct calcium FIRST");

    if let (true, Some(hco3)) = (method.uses_hco3(), inputs.hco3) {
        let meq = hco3_correction(hco3, w);
        result = result
            .section(correction_section("Method 1: Using HCO3", meq))
            .section(dilution_section(meq));
    }

    if let (true, Some(be)) = (method.uses_base_excess(), inputs.base_excess) {
        let meq = base_excess_correction(be, w);
        result = result.section(correction_section("Method 2: Using Base Excess", meq));
        if method == BicarbonateMethod::BaseExcess {
            result = result.section(dilution_section(meq));
        }
    }

    let (low, high) = infusion_range(w);
    result = result.section(ResultSection::new(
        "Persistent Low HCO3 - Infusion",
        format!("{} - {} mEq/hr", fixed(low, 2), fixed(high, 1)),
    ));

    Some(result.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(hco3: Option<f64>, be: Option<f64>) -> PatientInputs {
        PatientInputs {
            hco3,
            base_excess: be,
            ..PatientInputs::with_weight(10.0)
        }
    }

    fn subtitles(r: &SimpleResult) -> Vec<&str> {
        r.sections.iter().map(|s| s.subtitle.as_str()).collect()
    }

    fn run(inputs: &PatientInputs, method: BicarbonateMethod) -> SimpleResult {
        calculate(inputs, method)
            .and_then(|r| r.as_simple().cloned())
            .unwrap()
    }

    #[test]
    fn formulas() {
        assert_eq!(hco3_correction(10.0, 10.0), 30.0);
        assert_eq!(base_excess_correction(-10.0, 10.0), 30.0);
        assert_eq!(infusion_range(10.0), (2.5, 20.0));
    }

    #[test]
    fn both_methods_share_one_dilution_line() {
        let r = run(&inputs(Some(10.0), Some(-10.0)), BicarbonateMethod::Both);
        assert_eq!(
            subtitles(&r),
            vec![
                "Method 1: Using HCO3",
                "Dilution (1:1)",
                "Method 2: Using Base Excess",
                "Persistent Low HCO3 - Infusion",
            ]
        );
        let m1 = r.find_section("Method 1: Using HCO3").unwrap();
        assert_eq!(m1.value, "30.0 mEq");
        assert_eq!(m1.detail.as_deref(), Some("1st half: 15.0 mEq | 2nd half: 15.0 mEq"));
        assert_eq!(
            r.find_section("Dilution (1:1)").unwrap().value,
            "30.0 ml + 30.0 ml NS = 60.0 ml"
        );
        assert_eq!(
            r.find_section("Persistent Low HCO3 - Infusion").unwrap().value,
            "2.50 - 20.0 mEq/hr"
        );
    }

    #[test]
    fn base_excess_only_gets_its_own_dilution() {
        let r = run(&inputs(Some(10.0), Some(-6.0)), BicarbonateMethod::BaseExcess);
        assert_eq!(
            subtitles(&r),
            vec![
                "Method 2: Using Base Excess",
                "Dilution (1:1)",
                "Persistent Low HCO3 - Infusion",
            ]
        );
        assert_eq!(
            r.find_section("Dilution (1:1)").unwrap().value,
            "18.0 ml + 18.0 ml NS = 36.0 ml"
        );
    }

    #[test]
    fn missing_labs_still_give_infusion_and_warnings() {
        let r = run(&inputs(None, None), BicarbonateMethod::Both);
        assert_eq!(subtitles(&r), vec!["Persistent Low HCO3 - Infusion"]);
        assert_eq!(r.warnings.len(), 2);
        assert_eq!(
            r.warnings[1],
            "In chronic acidosis with hypocalcemia: correct calcium FIRST"
        );
    }

    #[test]
    fn no_weight_no_result() {
        assert!(calculate(&PatientInputs::default(), BicarbonateMethod::Both).is_none());
    }
}
