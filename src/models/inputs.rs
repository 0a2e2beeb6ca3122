use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::enums::*;
use super::InputError;

/// Leading numeric prefix of a free-text field ("12.5 kg" -> "12.5").
static RE_NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Parse the numeric prefix of a free-text field.
/// Empty, non-numeric, and non-finite text is absent.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let caps = RE_NUMERIC_PREFIX.captures(raw)?;
    caps.get(1)?
        .as_str()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn field(raw: &Option<String>) -> Option<f64> {
    raw.as_deref().and_then(parse_numeric)
}

/// Raw panel form as the UI holds it: every field is free text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelForm {
    pub weight: Option<String>,
    pub age: Option<String>,

    pub calcium: Option<String>,
    pub magnesium: Option<String>,
    pub potassium: Option<String>,
    pub hco3: Option<String>,
    pub base_excess: Option<String>,
    pub sodium: Option<String>,
    pub target_sodium: Option<String>,
    pub phosphate: Option<String>,

    pub ph: Option<String>,
    pub pco2: Option<String>,
    pub chloride: Option<String>,
    pub albumin: Option<String>,

    pub serum_iron: Option<String>,
    pub ingested_amount: Option<String>,
    pub custom_mg_per_ml: Option<String>,
    pub custom_elemental_percent: Option<String>,

    pub fio2: Option<String>,
    pub mean_airway_pressure: Option<String>,
    pub pao2: Option<String>,
    pub spo2: Option<String>,

    pub total_fluid_intake: Option<String>,
    pub dextrose_percent: Option<String>,
    pub target_gir: Option<String>,

    pub fibrinogen: Option<String>,
    pub platelet_count: Option<String>,

    pub kcl_custom_concentration: Option<String>,

    // Selections
    pub sodium_disorder: Option<String>,
    pub hyponatremia_severity: Option<String>,
    pub bicarbonate_method: Option<String>,
    pub phosphate_severity: Option<String>,
    pub kcl_line: Option<String>,
    pub kcl_concentration: Option<String>,
    pub addiphos_line: Option<String>,
    pub vitamin_k_group: Option<String>,
    pub electrolyte_drug: Option<String>,
    pub blood_product: Option<String>,
    pub iron_preparation: Option<String>,
}

/// Normalized numeric snapshot of a panel. Absent means "not entered or not a number".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientInputs {
    pub weight_kg: Option<f64>,
    pub age_years: Option<f64>,

    pub calcium: Option<f64>,
    pub magnesium: Option<f64>,
    pub potassium: Option<f64>,
    pub hco3: Option<f64>,
    pub base_excess: Option<f64>,
    pub sodium: Option<f64>,
    pub target_sodium: Option<f64>,
    pub phosphate: Option<f64>,

    pub ph: Option<f64>,
    pub pco2: Option<f64>,
    pub chloride: Option<f64>,
    pub albumin: Option<f64>,

    pub serum_iron: Option<f64>,
    pub ingested_amount: Option<f64>,
    pub custom_mg_per_ml: Option<f64>,
    pub custom_elemental_percent: Option<f64>,

    pub fio2: Option<f64>,
    pub mean_airway_pressure: Option<f64>,
    pub pao2: Option<f64>,
    pub spo2: Option<f64>,

    pub total_fluid_intake: Option<f64>,
    pub dextrose_percent: Option<f64>,
    pub target_gir: Option<f64>,

    pub fibrinogen: Option<f64>,
    pub platelet_count: Option<f64>,

    pub kcl_custom_meq_per_100ml: Option<f64>,
}

impl PatientInputs {
    /// Inputs carrying only a weight.
    pub fn with_weight(weight_kg: f64) -> Self {
        Self {
            weight_kg: Some(weight_kg),
            ..Default::default()
        }
    }

    pub fn from_form(form: &PanelForm) -> Self {
        Self {
            weight_kg: field(&form.weight),
            age_years: field(&form.age),
            calcium: field(&form.calcium),
            magnesium: field(&form.magnesium),
            potassium: field(&form.potassium),
            hco3: field(&form.hco3),
            base_excess: field(&form.base_excess),
            sodium: field(&form.sodium),
            target_sodium: field(&form.target_sodium),
            phosphate: field(&form.phosphate),
            ph: field(&form.ph),
            pco2: field(&form.pco2),
            chloride: field(&form.chloride),
            albumin: field(&form.albumin),
            serum_iron: field(&form.serum_iron),
            ingested_amount: field(&form.ingested_amount),
            custom_mg_per_ml: field(&form.custom_mg_per_ml),
            custom_elemental_percent: field(&form.custom_elemental_percent),
            fio2: field(&form.fio2),
            mean_airway_pressure: field(&form.mean_airway_pressure),
            pao2: field(&form.pao2),
            spo2: field(&form.spo2),
            total_fluid_intake: field(&form.total_fluid_intake),
            dextrose_percent: field(&form.dextrose_percent),
            target_gir: field(&form.target_gir),
            fibrinogen: field(&form.fibrinogen),
            platelet_count: field(&form.platelet_count),
            kcl_custom_meq_per_100ml: field(&form.kcl_custom_concentration),
        }
    }

    /// Weight usable for dosing (present and > 0).
    pub fn weight(&self) -> Option<f64> {
        positive(self.weight_kg)
    }
}

/// A value that counts as entered: present and strictly positive.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// A value that counts as entered when it is present and non-zero.
pub fn nonzero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Absent or zero falls back to `default`.
pub fn nonzero_or(value: Option<f64>, default: f64) -> f64 {
    nonzero(value).unwrap_or(default)
}

/// Enumerated choices made on a panel, with panel defaults filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    pub sodium_disorder: SodiumDisorder,
    pub hyponatremia_severity: HyponatremiaSeverity,
    pub bicarbonate_method: BicarbonateMethod,
    pub phosphate_severity: PhosphateSeverity,
    pub kcl_line: KclLine,
    pub kcl_concentration: KclConcentration,
    pub addiphos_line: LineType,
    pub vitamin_k_group: VitaminKGroup,
    pub electrolyte_drug: Option<ElectrolyteDrug>,
    pub blood_product: BloodProduct,
    pub iron_preparation: Option<IronPreparation>,
}

/// Blank means "use the panel default".
fn choice<T>(raw: &Option<String>) -> Result<T, InputError>
where
    T: FromStr<Err = InputError> + Default,
{
    Ok(optional_choice(raw)?.unwrap_or_default())
}

fn optional_choice<T>(raw: &Option<String>) -> Result<Option<T>, InputError>
where
    T: FromStr<Err = InputError>,
{
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

impl Selections {
    pub fn from_form(form: &PanelForm) -> Result<Self, InputError> {
        Ok(Self {
            sodium_disorder: choice(&form.sodium_disorder)?,
            hyponatremia_severity: choice(&form.hyponatremia_severity)?,
            bicarbonate_method: choice(&form.bicarbonate_method)?,
            phosphate_severity: choice(&form.phosphate_severity)?,
            kcl_line: choice(&form.kcl_line)?,
            kcl_concentration: choice(&form.kcl_concentration)?,
            addiphos_line: choice(&form.addiphos_line)?,
            vitamin_k_group: choice(&form.vitamin_k_group)?,
            electrolyte_drug: optional_choice(&form.electrolyte_drug)?,
            blood_product: choice(&form.blood_product)?,
            iron_preparation: optional_choice(&form.iron_preparation)?,
        })
    }
}
