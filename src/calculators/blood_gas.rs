//! Arterial blood gas interpretation.
//!
//! Primary disorder from a pH/pCO2/HCO3 decision table, an expected
//! compensation check for that disorder, and anion-gap analysis when
//! Na and Cl are available.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_ALBUMIN;
use crate::format::{fixed, plain};
use crate::models::inputs::nonzero;
use crate::models::{CalculationResult, PatientInputs, ResultSection, SimpleResult};

pub const NORMAL_ANION_GAP: f64 = 12.0;
pub const NORMAL_HCO3: f64 = 24.0;
pub const NORMAL_PCO2: f64 = 40.0;

// ═══════════════════════════════════════════════════════════
// Anion gap
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnionGap {
    pub gap: f64,
    pub corrected: f64,
    pub delta_ratio: Option<f64>,
}

/// Na - Cl - HCO3, corrected by 2.5 per g/dL of albumin below 4.
pub fn anion_gap(na: f64, cl: f64, hco3: f64, albumin: f64) -> AnionGap {
    let gap = na - cl - hco3;
    let corrected = gap + 2.5 * (4.0 - albumin);
    let delta_gap = corrected - NORMAL_ANION_GAP;
    let delta_hco3 = NORMAL_HCO3 - hco3;
    let delta_ratio = (corrected > NORMAL_ANION_GAP && delta_gap != 0.0 && delta_hco3 != 0.0)
        .then(|| delta_gap / delta_hco3);
    AnionGap {
        gap,
        corrected,
        delta_ratio,
    }
}

pub fn delta_ratio_meaning(ratio: f64) -> &'static str {
    if ratio < 1.0 {
        "Mixed HAGMA + NAGMA"
    } else if ratio > 2.0 {
        "Mixed HAGMA + Met Alk"
    } else {
        "Pure HAGMA"
    }
}

// ═══════════════════════════════════════════════════════════
// Primary disorder
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcidBaseDisorder {
    MetabolicAcidosis,
    RespiratoryAcidosis,
    MetabolicAlkalosis,
    RespiratoryAlkalosis,
    CompensatedMetabolicAcidosis,
    CompensatedMetabolicAlkalosis,
    CompensatedRespiratoryAcidosis,
    CompensatedRespiratoryAlkalosis,
    NormalOrMixed,
}

impl AcidBaseDisorder {
    pub fn label(self) -> &'static str {
        match self {
            Self::MetabolicAcidosis => "Metabolic Acidosis",
            Self::RespiratoryAcidosis => "Respiratory Acidosis",
            Self::MetabolicAlkalosis => "Metabolic Alkalosis",
            Self::RespiratoryAlkalosis => "Respiratory Alkalosis",
            Self::CompensatedMetabolicAcidosis => "Compensated Metabolic Acidosis",
            Self::CompensatedMetabolicAlkalosis => "Compensated Metabolic Alkalosis",
            Self::CompensatedRespiratoryAcidosis => "Compensated Respiratory Acidosis",
            Self::CompensatedRespiratoryAlkalosis => "Compensated Respiratory Alkalosis",
            Self::NormalOrMixed => "Normal or Mixed Disorder",
        }
    }
}

/// First matching row wins.
pub fn classify(ph: f64, pco2: f64, hco3: f64) -> AcidBaseDisorder {
    use AcidBaseDisorder::*;

    if ph < 7.35 {
        if hco3 < 22.0 {
            return MetabolicAcidosis;
        }
        if pco2 > 45.0 {
            return RespiratoryAcidosis;
        }
    } else if ph > 7.45 {
        if hco3 > 26.0 {
            return MetabolicAlkalosis;
        }
        if pco2 < 35.0 {
            return RespiratoryAlkalosis;
        }
    } else {
        if hco3 < 22.0 && pco2 < 35.0 {
            return CompensatedMetabolicAcidosis;
        }
        if hco3 > 26.0 && pco2 > 45.0 {
            return CompensatedMetabolicAlkalosis;
        }
        // Unreachable after the two rows above; kept in table order.
        if pco2 > 45.0 && hco3 > 26.0 {
            return CompensatedRespiratoryAcidosis;
        }
        if pco2 < 35.0 && hco3 < 22.0 {
            return CompensatedRespiratoryAlkalosis;
        }
    }
    NormalOrMixed
}

// ═══════════════════════════════════════════════════════════
// Expected compensation
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct Compensation {
    pub formula: &'static str,
    /// Worked expected-value lines.
    pub workings: Vec<String>,
    pub interpretation: &'static str,
}

/// Compensation check for uncompensated metabolic disorders and all
/// respiratory disorders.
pub fn compensation(disorder: AcidBaseDisorder, pco2: f64, hco3: f64) -> Option<Compensation> {
    use AcidBaseDisorder::*;

    match disorder {
        MetabolicAcidosis => {
            let expected = 1.5 * hco3 + 8.0;
            let interpretation = if pco2 < expected - 2.0 {
                "Mixed with Respiratory Alkalosis"
            } else if pco2 > expected + 2.0 {
                "Mixed with Respiratory Acidosis"
            } else {
                "Pure Metabolic Acidosis (Appropriately Compensated)"
            };
            Some(Compensation {
                formula: "Winter's Formula",
                workings: vec![
                    format!(
                        "Expected pCO2 = [1.5 x {}] + 8 = {} ± 2",
                        plain(hco3),
                        fixed(expected, 1)
                    ),
                    format!(
                        "Range: {} - {}",
                        fixed(expected - 2.0, 1),
                        fixed(expected + 2.0, 1)
                    ),
                ],
                interpretation,
            })
        }
        MetabolicAlkalosis => {
            let expected = 0.7 * hco3 + 21.0;
            let interpretation = if pco2 < expected - 5.0 {
                "Mixed with Respiratory Alkalosis"
            } else if pco2 > expected + 5.0 {
                "Mixed with Respiratory Acidosis"
            } else {
                "Pure Metabolic Alkalosis"
            };
            Some(Compensation {
                formula: "Expected pCO2 = [0.7 x HCO3] + 21 ± 5",
                workings: vec![format!(
                    "Expected pCO2 = [0.7 x {}] + 21 = {}",
                    plain(hco3),
                    fixed(expected, 1)
                )],
                interpretation,
            })
        }
        RespiratoryAcidosis | CompensatedRespiratoryAcidosis => {
            let steps = (pco2 - NORMAL_PCO2) / 10.0;
            let acute = NORMAL_HCO3 + steps * 1.0;
            let chronic = NORMAL_HCO3 + steps * 3.5;
            let interpretation = if hco3 < acute - 2.0 {
                "Mixed with Metabolic Acidosis"
            } else if hco3 > chronic + 2.0 {
                "Mixed with Metabolic Alkalosis"
            } else if hco3 <= acute + 2.0 {
                "Acute Respiratory Acidosis"
            } else {
                "Chronic Respiratory Acidosis"
            };
            Some(Compensation {
                formula: "Box Rule (Respiratory)",
                workings: vec![
                    format!("Acute: [Δ paCO2]/10 x 1 + 24 = {}", fixed(acute, 1)),
                    format!("Chronic: [Δ paCO2]/10 x 3.5 + 24 = {}", fixed(chronic, 1)),
                ],
                interpretation,
            })
        }
        RespiratoryAlkalosis | CompensatedRespiratoryAlkalosis => {
            let steps = (NORMAL_PCO2 - pco2) / 10.0;
            let acute = NORMAL_HCO3 - steps * 2.0;
            let chronic = NORMAL_HCO3 - steps * 5.0;
            let interpretation = if hco3 > acute + 2.0 {
                "Mixed with Metabolic Alkalosis"
            } else if hco3 < chronic - 2.0 {
                "Mixed with Metabolic Acidosis"
            } else if hco3 >= acute - 2.0 {
                "Acute Respiratory Alkalosis"
            } else {
                "Chronic Respiratory Alkalosis"
            };
            Some(Compensation {
                formula: "Box Rule (Respiratory)",
                workings: vec![
                    format!("Acute: 24 - [Δ paCO2]/10 x 2 = {}", fixed(acute, 1)),
                    format!("Chronic: 24 - [Δ paCO2]/10 x 5 = {}", fixed(chronic, 1)),
                ],
                interpretation,
            })
        }
        CompensatedMetabolicAcidosis | CompensatedMetabolicAlkalosis | NormalOrMixed => None,
    }
}

// ═══════════════════════════════════════════════════════════
// Result
// ═══════════════════════════════════════════════════════════

pub fn calculate(inputs: &PatientInputs) -> Option<CalculationResult> {
    let ph = nonzero(inputs.ph);
    let pco2 = nonzero(inputs.pco2);
    let hco3 = nonzero(inputs.hco3);
    let na = nonzero(inputs.sodium);
    let cl = nonzero(inputs.chloride);
    let albumin = nonzero(inputs.albumin).unwrap_or(DEFAULT_ALBUMIN);

    let primary = match (ph, pco2, hco3) {
        (Some(ph), Some(pco2), Some(hco3)) => Some((classify(ph, pco2, hco3), pco2, hco3)),
        _ => None,
    };
    let gap = match (na, cl, hco3) {
        (Some(na), Some(cl), Some(hco3)) => Some(anion_gap(na, cl, hco3, albumin)),
        _ => None,
    };
    if primary.is_none() && gap.is_none() {
        return None;
    }

    let mut result = SimpleResult::new("Blood Gas Interpretation");

    if let Some((disorder, pco2, hco3)) = primary {
        result = result.section(ResultSection::new("Primary Disorder", disorder.label()));
        if let Some(comp) = compensation(disorder, pco2, hco3) {
            result = result.section(
                ResultSection::new(
                    format!("Compensation ({})", comp.formula),
                    comp.interpretation,
                )
                .with_detail(comp.workings.join(" | ")),
            );
        }
    }

    if let Some(ag) = gap {
        let status = if ag.gap > NORMAL_ANION_GAP {
            "(High)"
        } else {
            "(Normal 8-12)"
        };
        result = result.section(ResultSection::new(
            "Anion Gap (Na - Cl - HCO3)",
            format!("{} mEq/L {status}", fixed(ag.gap, 1)),
        ));
        if albumin != DEFAULT_ALBUMIN {
            result = result.section(ResultSection::new(
                format!("Corrected AG (for albumin {})", plain(albumin)),
                format!("{} mEq/L", fixed(ag.corrected, 1)),
            ));
        }
        if let Some(ratio) = ag.delta_ratio {
            result = result.section(
                ResultSection::new("Delta Ratio (ΔAG/ΔHCO3)", fixed(ratio, 2))
                    .with_detail(delta_ratio_meaning(ratio)),
            );
        }
    }

    Some(
        result
            .note("Normal: pH 7.35-7.45 | pCO2 35-45 mmHg | HCO3 22-26 mEq/L | AG 8-12 mEq/L")
            .into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gas(ph: f64, pco2: f64, hco3: f64) -> PatientInputs {
        PatientInputs {
            ph: Some(ph),
            pco2: Some(pco2),
            hco3: Some(hco3),
            ..Default::default()
        }
    }

    #[test]
    fn metabolic_acidosis_with_respiratory_acidosis() {
        let disorder = classify(7.20, 30.0, 10.0);
        assert_eq!(disorder, AcidBaseDisorder::MetabolicAcidosis);
        assert_eq!(disorder.label(), "Metabolic Acidosis");

        let comp = compensation(disorder, 30.0, 10.0).unwrap();
        assert_eq!(comp.interpretation, "Mixed with Respiratory Acidosis");
        assert_eq!(comp.workings[0], "Expected pCO2 = [1.5 x 10] + 8 = 23.0 ± 2");
    }

    #[test]
    fn winters_window_edges() {
        let d = AcidBaseDisorder::MetabolicAcidosis;
        assert_eq!(
            compensation(d, 25.0, 10.0).unwrap().interpretation,
            "Pure Metabolic Acidosis (Appropriately Compensated)"
        );
        assert_eq!(
            compensation(d, 20.9, 10.0).unwrap().interpretation,
            "Mixed with Respiratory Alkalosis"
        );
    }

    #[test]
    fn metabolic_alkalosis_window() {
        let d = classify(7.50, 48.0, 36.0);
        assert_eq!(d, AcidBaseDisorder::MetabolicAlkalosis);
        // 0.7 x 36 + 21 = 46.2
        assert_eq!(compensation(d, 48.0, 36.0).unwrap().interpretation, "Pure Metabolic Alkalosis");
        assert_eq!(
            compensation(d, 52.0, 36.0).unwrap().interpretation,
            "Mixed with Respiratory Acidosis"
        );
        assert_eq!(
            compensation(d, 41.0, 36.0).unwrap().interpretation,
            "Mixed with Respiratory Alkalosis"
        );
    }

    #[test]
    fn respiratory_acidosis_acute_and_chronic() {
        let d = classify(7.25, 60.0, 26.0);
        assert_eq!(d, AcidBaseDisorder::RespiratoryAcidosis);
        // acute 26, chronic 31
        assert_eq!(compensation(d, 60.0, 26.0).unwrap().interpretation, "Acute Respiratory Acidosis");
        assert_eq!(compensation(d, 60.0, 30.0).unwrap().interpretation, "Chronic Respiratory Acidosis");
        assert_eq!(compensation(d, 60.0, 34.0).unwrap().interpretation, "Mixed with Metabolic Alkalosis");
        assert_eq!(compensation(d, 60.0, 23.0).unwrap().interpretation, "Mixed with Metabolic Acidosis");
    }

    #[test]
    fn respiratory_alkalosis_acute_and_chronic() {
        let d = classify(7.55, 20.0, 22.0);
        assert_eq!(d, AcidBaseDisorder::RespiratoryAlkalosis);
        // acute 20, chronic 14
        assert_eq!(compensation(d, 20.0, 20.0).unwrap().interpretation, "Acute Respiratory Alkalosis");
        assert_eq!(compensation(d, 20.0, 16.0).unwrap().interpretation, "Chronic Respiratory Alkalosis");
        assert_eq!(compensation(d, 20.0, 23.0).unwrap().interpretation, "Mixed with Metabolic Alkalosis");
        assert_eq!(compensation(d, 20.0, 11.0).unwrap().interpretation, "Mixed with Metabolic Acidosis");
    }

    #[test]
    fn normal_range_rows() {
        assert_eq!(classify(7.40, 40.0, 24.0), AcidBaseDisorder::NormalOrMixed);
        assert_eq!(classify(7.36, 30.0, 18.0), AcidBaseDisorder::CompensatedMetabolicAcidosis);
        assert_eq!(classify(7.44, 50.0, 30.0), AcidBaseDisorder::CompensatedMetabolicAlkalosis);
        assert!(compensation(AcidBaseDisorder::CompensatedMetabolicAcidosis, 30.0, 18.0).is_none());
        assert!(compensation(AcidBaseDisorder::NormalOrMixed, 40.0, 24.0).is_none());
    }

    #[test]
    fn acidemia_without_abnormal_driver_is_normal_or_mixed() {
        assert_eq!(classify(7.30, 40.0, 24.0), AcidBaseDisorder::NormalOrMixed);
    }

    #[test]
    fn anion_gap_with_albumin() {
        let ag = anion_gap(140.0, 100.0, 24.0, 4.0);
        assert_eq!(ag.gap, 16.0);
        assert_eq!(ag.corrected, 16.0);
        // delta HCO3 is zero
        assert_eq!(ag.delta_ratio, None);

        let ag = anion_gap(140.0, 100.0, 24.0, 2.0);
        assert_eq!(ag.corrected, 21.0);
    }

    #[test]
    fn delta_ratio_bands() {
        let ag = anion_gap(140.0, 100.0, 14.0, 4.0);
        // gap 26, delta 14 / 10
        assert_eq!(ag.delta_ratio, Some(1.4));
        assert_eq!(delta_ratio_meaning(1.4), "Pure HAGMA");
        assert_eq!(delta_ratio_meaning(0.5), "Mixed HAGMA + NAGMA");
        assert_eq!(delta_ratio_meaning(2.5), "Mixed HAGMA + Met Alk");
    }

    #[test]
    fn result_sections() {
        let mut inputs = gas(7.20, 30.0, 10.0);
        inputs.sodium = Some(140.0);
        inputs.chloride = Some(100.0);
        inputs.albumin = Some(2.0);
        let r = calculate(&inputs).and_then(|r| r.as_simple().cloned()).unwrap();
        assert_eq!(r.find_section("Primary Disorder").unwrap().value, "Metabolic Acidosis");
        assert_eq!(
            r.find_section("Compensation (Winter's Formula)").unwrap().value,
            "Mixed with Respiratory Acidosis"
        );
        assert_eq!(
            r.find_section("Anion Gap (Na - Cl - HCO3)").unwrap().value,
            "30.0 mEq/L (High)"
        );
        assert_eq!(
            r.find_section("Corrected AG (for albumin 2)").unwrap().value,
            "35.0 mEq/L"
        );
        let delta = r.find_section("Delta Ratio (ΔAG/ΔHCO3)").unwrap();
        assert_eq!(delta.value, "1.64");
        assert_eq!(delta.detail.as_deref(), Some("Pure HAGMA"));
    }

    #[test]
    fn needs_gas_or_gap() {
        assert!(calculate(&PatientInputs::default()).is_none());
        assert!(calculate(&PatientInputs { ph: Some(7.3), ..Default::default() }).is_none());

        let gap_only = PatientInputs {
            sodium: Some(140.0),
            chloride: Some(104.0),
            hco3: Some(24.0),
            ..Default::default()
        };
        let r = calculate(&gap_only).and_then(|r| r.as_simple().cloned()).unwrap();
        assert!(r.find_section("Primary Disorder").is_none());
        assert_eq!(
            r.find_section("Anion Gap (Na - Cl - HCO3)").unwrap().value,
            "12.0 mEq/L (Normal 8-12)"
        );
    }
}
