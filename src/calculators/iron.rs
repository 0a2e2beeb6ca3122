//! Iron ingestion staging, serum iron interpretation and deferoxamine rates.

use crate::format::{fixed, plain};
use crate::models::inputs::positive;
use crate::models::{CalculationResult, IronPreparation, PatientInputs, ResultSection, SimpleResult};

use super::reference::{
    iron_liquid, iron_salt, tier, IngestionSeverity, SerumIronLevel, INGESTION_TIERS,
    SERUM_IRON_TIERS,
};

pub const DEFEROXAMINE_INITIAL_MG_KG_HR: f64 = 15.0;
pub const DEFEROXAMINE_MAX_MG_KG_HR: f64 = 35.0;

/// Elemental iron contained in an ingested amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementalIron {
    pub preparation: String,
    pub elemental_percent: f64,
    pub elemental_mg: f64,
    /// Worked tablet example for solid salts.
    pub example: Option<&'static str>,
}

/// `amount` is mg of salt for solid preparations, mL for liquids and custom.
/// Custom needs both its mg/mL and elemental % entered.
pub fn elemental_iron(
    preparation: IronPreparation,
    amount: f64,
    custom_mg_per_ml: Option<f64>,
    custom_elemental_percent: Option<f64>,
) -> Option<ElementalIron> {
    if let Some(salt) = iron_salt(preparation) {
        return Some(ElementalIron {
            preparation: salt.name.to_string(),
            elemental_percent: salt.elemental_percent,
            elemental_mg: amount * salt.elemental_percent / 100.0,
            example: Some(salt.example),
        });
    }
    if let Some(liquid) = iron_liquid(preparation) {
        return Some(ElementalIron {
            preparation: format!("{} ({} mg/ml)", liquid.name, plain(liquid.mg_per_ml)),
            elemental_percent: liquid.elemental_percent,
            elemental_mg: amount * liquid.mg_per_ml * liquid.elemental_percent / 100.0,
            example: None,
        });
    }
    let mg_per_ml = positive(custom_mg_per_ml)?;
    let percent = positive(custom_elemental_percent)?;
    Some(ElementalIron {
        preparation: format!("Custom ({} mg/ml)", plain(mg_per_ml)),
        elemental_percent: percent,
        elemental_mg: amount * mg_per_ml * percent / 100.0,
        example: None,
    })
}

pub fn ingestion_severity(mg_per_kg: f64) -> IngestionSeverity {
    tier(mg_per_kg, INGESTION_TIERS, IngestionSeverity::Minimal)
}

pub fn serum_iron_level(mcg_per_dl: f64) -> SerumIronLevel {
    tier(mcg_per_dl, SERUM_IRON_TIERS, SerumIronLevel::Normal)
}

/// Initial and maximum deferoxamine infusion, mg/hr.
pub fn deferoxamine_rates(weight_kg: f64) -> (f64, f64) {
    (
        weight_kg * DEFEROXAMINE_INITIAL_MG_KG_HR,
        weight_kg * DEFEROXAMINE_MAX_MG_KG_HR,
    )
}

/// Elemental iron is shown for any amount; per-kg staging needs a weight.
fn ingestion_sections(
    mut result: SimpleResult,
    w: Option<f64>,
    amount: f64,
    preparation: IronPreparation,
    inputs: &PatientInputs,
) -> SimpleResult {
    let Some(iron) = elemental_iron(
        preparation,
        amount,
        inputs.custom_mg_per_ml,
        inputs.custom_elemental_percent,
    ) else {
        return result;
    };

    let detail = match iron.example {
        Some(example) => format!(
            "{} ({}% elemental; {example})",
            iron.preparation,
            plain(iron.elemental_percent)
        ),
        None => format!("{} ({}% elemental)", iron.preparation, plain(iron.elemental_percent)),
    };
    result = result.section(
        ResultSection::new("Elemental Iron", format!("{} mg", fixed(iron.elemental_mg, 1)))
            .with_detail(detail),
    );

    let Some(w) = w else {
        return result;
    };
    let mg_per_kg = iron.elemental_mg / w;
    let severity = ingestion_severity(mg_per_kg);
    result
        .section(ResultSection::new(
            "Elemental Iron per kg",
            format!("{} mg/kg", fixed(mg_per_kg, 1)),
        ))
        .section(
            ResultSection::new(
                "Toxicity",
                format!("{} ({})", severity.risk(), severity.as_str()),
            )
            .with_detail(severity.recommendation()),
        )
}

pub fn calculate(
    inputs: &PatientInputs,
    preparation: Option<IronPreparation>,
) -> Option<CalculationResult> {
    let w = inputs.weight();
    let amount = positive(inputs.ingested_amount);
    let serum = positive(inputs.serum_iron);

    let mut result = SimpleResult::new("Iron Toxicity")
        .subtitle("Elemental iron, toxicity staging and deferoxamine");

    if let (Some(amount), Some(preparation)) = (amount, preparation) {
        result = ingestion_sections(result, w, amount, preparation, inputs);
    }

    if let Some(level) = serum {
        let interpretation = serum_iron_level(level);
        result = result.section(
            ResultSection::new(
                "Serum Iron",
                format!("{} mcg/dL ({})", plain(level), interpretation.as_str()),
            )
            .with_detail(interpretation.recommendation()),
        );
    }

    if let Some(w) = w {
        let (initial, max) = deferoxamine_rates(w);
        result = result
            .section(
                ResultSection::new("Deferoxamine - Initial", format!("{} mg/hr", fixed(initial, 0)))
                    .with_detail("15 mg/kg/hr IV"),
            )
            .section(
                ResultSection::new("Deferoxamine - Max", format!("{} mg/hr", fixed(max, 0)))
                    .with_detail("35 mg/kg/hr IV"),
            )
            .note("Maximum 6 g/day; continue until clinical improvement and serum iron < 300 mcg/dL");
    }

    if result.sections.is_empty() {
        return None;
    }
    Some(result.into())
}
