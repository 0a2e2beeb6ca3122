//! Weight-scaled reference table for common ICU infusions.
//!
//! Without a weight the table still lists every drug with its per-kg
//! dosing; the calculated columns are left empty.

use serde::{Deserialize, Serialize};

use crate::format::{fixed, span};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDrug {
    pub name: String,
    pub stat_dose: Option<String>,
    pub stat_calculated: Option<String>,
    pub infusion_dose: String,
    pub infusion_calculated: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCategory {
    pub name: String,
    pub drugs: Vec<ReferenceDrug>,
}

impl ReferenceCategory {
    fn new(name: &str, drugs: Vec<ReferenceDrug>) -> Self {
        Self {
            name: name.to_string(),
            drugs,
        }
    }
}

impl ReferenceDrug {
    fn new(name: &str, infusion_dose: &str) -> Self {
        Self {
            name: name.to_string(),
            stat_dose: None,
            stat_calculated: None,
            infusion_dose: infusion_dose.to_string(),
            infusion_calculated: None,
            notes: None,
        }
    }

    fn stat(mut self, dose: &str, calculated: Option<String>) -> Self {
        self.stat_dose = Some(dose.to_string());
        self.stat_calculated = calculated;
        self
    }

    fn infusion(mut self, calculated: Option<String>) -> Self {
        self.infusion_calculated = calculated;
        self
    }

    fn notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
}

/// `mcg/kg/min` at `weight_kg` as mg/hr.
pub fn mcg_kg_min_to_mg_hr(dose: f64, weight_kg: f64) -> f64 {
    dose * weight_kg * 60.0 / 1000.0
}

fn inotrope(name: &str, min: f64, max: f64, notes: &str, w: Option<f64>) -> ReferenceDrug {
    let range = |w: f64| {
        format!(
            "{} - {} mg/hr",
            fixed(mcg_kg_min_to_mg_hr(min, w), 2),
            fixed(mcg_kg_min_to_mg_hr(max, w), 2)
        )
    };
    ReferenceDrug::new(name, &format!("{min}-{max} mcg/kg/min"))
        .infusion(w.map(range))
        .notes(notes)
}

/// Reference table, with calculated doses when a usable weight is given.
pub fn infusion_reference(weight_kg: Option<f64>) -> Vec<ReferenceCategory> {
    let w = weight_kg.filter(|w| *w > 0.0);
    let at = |f: fn(f64) -> String| w.map(f);

    vec![
        ReferenceCategory::new(
            "Neuromuscular Blockade",
            vec![ReferenceDrug::new("Cisatracurium (Nimbex)", "1-4 mcg/kg/min")
                .stat(
                    "0.1-0.2 mg/kg",
                    at(|w| format!("{} mg", span(w * 0.1, w * 0.2, 2))),
                )
                .infusion(at(|w| {
                    format!("{} mcg/min", span(w, w * 4.0, 0))
                }))],
        ),
        ReferenceCategory::new(
            "Sedatives",
            vec![
                ReferenceDrug::new("Midazolam", "0.1-0.5 mg/kg/hr")
                    .stat("0.1 mg/kg", at(|w| format!("{} mg", fixed(w * 0.1, 2))))
                    .infusion(at(|w| {
                        format!("{} mg/hr", span(w * 0.1, w * 0.5, 2))
                    })),
                ReferenceDrug::new("Fentanyl", "1-5 mcg/kg/hr")
                    .stat("1 mcg/kg", at(|w| format!("{} mcg", fixed(w, 1))))
                    .infusion(at(|w| {
                        format!("{} mcg/hr", span(w, w * 5.0, 1))
                    })),
            ],
        ),
        ReferenceCategory::new(
            "Diuretics",
            vec![ReferenceDrug::new("Furosemide (Lasix)", "0.1-1 mg/kg/hr")
                .stat(
                    "0.5-1 mg/kg (Max 40mg)",
                    at(|w| {
                        format!(
                            "{} - {} mg",
                            fixed((w * 0.5).min(40.0), 1),
                            fixed(w.min(40.0), 1)
                        )
                    }),
                )
                .infusion(at(|w| {
                    format!("{} mg/hr", span(w * 0.1, w, 2))
                }))],
        ),
        ReferenceCategory::new(
            "Bronchodilator",
            vec![ReferenceDrug::new("Ventolin Infusion", "0.3 mg/kg/hr")
                .infusion(at(|w| format!("{} mg/hr", fixed(w * 0.3, 2))))],
        ),
        ReferenceCategory::new(
            "Inotropic Support",
            vec![
                inotrope(
                    "Dopamine",
                    2.0,
                    20.0,
                    "Low (2-5): renal, Med (5-10): cardiac, High (10-20): vasopressor",
                    w,
                ),
                inotrope("Dobutamine", 2.0, 20.0, "Inotrope, minimal vasopressor effect", w),
                inotrope("Epinephrine", 0.01, 0.5, "Low: beta-effect, High: alpha-effect", w),
                inotrope(
                    "Norepinephrine",
                    0.01,
                    0.5,
                    "Potent vasopressor, minimal beta-effect",
                    w,
                ),
            ],
        ),
    ]
}
