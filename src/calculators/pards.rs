//! PARDS severity from the oxygenation and oxygen saturation indices (PALICC).

use crate::format::{fixed, rounded};
use crate::models::inputs::positive;
use crate::models::{CalculationResult, PatientInputs, ResultSection, SimpleResult};

use super::reference::{tier, PardsSeverity, OI_TIERS, OSI_TIERS};

/// SpO2 above this makes OSI unreliable.
pub const OSI_MAX_SPO2: f64 = 97.0;

/// OI = FiO2 x MAP x 100 / PaO2, at display precision.
pub fn oxygenation_index(fio2: f64, map: f64, pao2: f64) -> f64 {
    rounded(fio2 * map * 100.0 / pao2, 1)
}

/// OSI = FiO2 x MAP x 100 / SpO2, at display precision.
pub fn oxygen_saturation_index(fio2: f64, map: f64, spo2: f64) -> f64 {
    rounded(fio2 * map * 100.0 / spo2, 1)
}

/// Worse of the two classifications; either index may be missing.
pub fn severity(oi: Option<f64>, osi: Option<f64>) -> PardsSeverity {
    let by_oi = oi.map_or(PardsSeverity::NotPards, |v| {
        tier(v, OI_TIERS, PardsSeverity::NotPards)
    });
    let by_osi = osi.map_or(PardsSeverity::NotPards, |v| {
        tier(v, OSI_TIERS, PardsSeverity::NotPards)
    });
    by_oi.max(by_osi)
}

pub fn calculate(inputs: &PatientInputs) -> Option<CalculationResult> {
    let fio2 = positive(inputs.fio2);
    let map = positive(inputs.mean_airway_pressure);

    let oi = match (fio2, map, positive(inputs.pao2)) {
        (Some(f), Some(m), Some(p)) => Some(oxygenation_index(f, m, p)),
        _ => None,
    };
    let osi = match (fio2, map, positive(inputs.spo2)) {
        (Some(f), Some(m), Some(s)) if s <= OSI_MAX_SPO2 => Some(oxygen_saturation_index(f, m, s)),
        _ => None,
    };
    if oi.is_none() && osi.is_none() {
        return None;
    }

    let mut result = SimpleResult::new("PARDS Severity (PALICC)");
    if let Some(oi) = oi {
        result = result.section(
            ResultSection::new("OI", fixed(oi, 1)).with_detail("(FiO2 x MAP x 100) / PaO2"),
        );
    }
    if let Some(osi) = osi {
        result = result.section(
            ResultSection::new("OSI", fixed(osi, 1)).with_detail("(FiO2 x MAP x 100) / SpO2"),
        );
    }
    result = result.section(ResultSection::new("Severity", severity(oi, osi).label()));

    if let Some(w) = inputs.weight() {
        result = result.section(
            ResultSection::new(
                "Tidal Volume",
                format!("{}-{} ml", fixed(w * 5.0, 0), fixed(w * 8.0, 0)),
            )
            .with_detail(format!(
                "5-8 ml/kg; {}-{} ml if poor compliance",
                fixed(w * 3.0, 0),
                fixed(w * 6.0, 0)
            )),
        );
    }

    Some(
        result
            .note("Mild: 4 <= OI < 8 or 5 <= OSI < 7.5")
            .note("Moderate: 8 <= OI < 16 or 7.5 <= OSI <= 12.3")
            .note("Severe: OI >= 16 or OSI > 12.3")
            .note("OSI valid only when SpO2 <= 97%")
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(fio2: f64, map: f64, pao2: Option<f64>, spo2: Option<f64>) -> PatientInputs {
        PatientInputs {
            fio2: Some(fio2),
            mean_airway_pressure: Some(map),
            pao2,
            spo2,
            ..Default::default()
        }
    }

    fn run(i: &PatientInputs) -> SimpleResult {
        calculate(i).and_then(|r| r.as_simple().cloned()).unwrap()
    }

    #[test]
    fn oi_fifteen_is_moderate() {
        let oi = oxygenation_index(0.6, 15.0, 60.0);
        assert_eq!(oi, 15.0);
        assert_eq!(severity(Some(oi), None), PardsSeverity::Moderate);

        let r = run(&inputs(0.6, 15.0, Some(60.0), None));
        assert_eq!(r.find_section("OI").unwrap().value, "15.0");
        assert_eq!(r.find_section("Severity").unwrap().value, "Moderate");
        assert!(r.find_section("OSI").is_none());
    }

    #[test]
    fn takes_the_worse_index() {
        assert_eq!(severity(Some(5.0), Some(13.0)), PardsSeverity::Severe);
        assert_eq!(severity(Some(17.0), Some(5.0)), PardsSeverity::Severe);
        assert_eq!(severity(Some(2.0), Some(6.0)), PardsSeverity::Mild);
        assert_eq!(severity(None, None), PardsSeverity::NotPards);
    }

    #[test]
    fn classifies_rounded_value() {
        // 0.4 x 10 x 100 / 50.1 = 7.98..., shown and classified as 8.0
        let oi = oxygenation_index(0.4, 10.0, 50.1);
        assert_eq!(oi, 8.0);
        assert_eq!(severity(Some(oi), None), PardsSeverity::Moderate);
    }

    #[test]
    fn osi_ignored_above_97() {
        assert!(calculate(&inputs(0.5, 10.0, None, Some(98.0))).is_none());
        let r = run(&inputs(0.5, 10.0, None, Some(97.0)));
        // 500 / 97 = 5.15...
        assert_eq!(r.find_section("OSI").unwrap().value, "5.2");
        assert_eq!(r.find_section("Severity").unwrap().value, "Mild");
    }

    #[test]
    fn tidal_volume_with_weight() {
        let mut i = inputs(0.6, 15.0, Some(60.0), None);
        i.weight_kg = Some(10.0);
        let r = run(&i);
        let tv = r.find_section("Tidal Volume").unwrap();
        assert_eq!(tv.value, "50-80 ml");
        assert_eq!(tv.detail.as_deref(), Some("5-8 ml/kg; 30-60 ml if poor compliance"));
    }

    #[test]
    fn missing_inputs() {
        assert!(calculate(&PatientInputs::default()).is_none());
        assert!(calculate(&inputs(0.0, 15.0, Some(60.0), Some(90.0))).is_none());
    }
}
