//! UI entry points.
//!
//! The panel hands over its raw free-text form; these functions normalize it,
//! fill in default selections, dispatch to the right calculator and report
//! failures as plain strings for display.

use serde::{Deserialize, Serialize};

use crate::calculators::drug_reference::{self, ReferenceCategory};
use crate::calculators::electrolyte_infusion::{self, InfusionOptions};
use crate::calculators::{
    bicarbonate, blood_gas, blood_products, calcium, gir, iron, magnesium, pards, phosphate,
    potassium, sodium,
};
use crate::models::{
    CalculationResult, CalculatorKind, InputError, PanelForm, PatientInputs, Selections,
};

/// JSON request accepted by [`calculate_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub calculator: String,
    #[serde(default)]
    pub form: PanelForm,
}

/// Runs one calculator over a panel form.
///
/// `Ok(None)` means the panel does not yet have the inputs it needs.
pub fn calculate(
    kind: CalculatorKind,
    form: &PanelForm,
) -> Result<Option<CalculationResult>, String> {
    tracing::debug!(calculator = %kind, "Calculator invoked");

    let selections = Selections::from_form(form).map_err(|e| {
        tracing::warn!(calculator = %kind, error = %e, "Rejected panel selection");
        e.to_string()
    })?;
    let inputs = PatientInputs::from_form(form);

    let result = dispatch(kind, &inputs, &selections);
    if result.is_none() {
        tracing::debug!(calculator = %kind, "Required inputs missing, no result");
    }
    Ok(result)
}

fn dispatch(
    kind: CalculatorKind,
    inputs: &PatientInputs,
    selections: &Selections,
) -> Option<CalculationResult> {
    match kind {
        CalculatorKind::Calcium => calcium::calculate(inputs),
        CalculatorKind::Magnesium => magnesium::calculate(inputs),
        CalculatorKind::Potassium => potassium::calculate(inputs),
        CalculatorKind::Bicarbonate => bicarbonate::calculate(inputs, selections.bicarbonate_method),
        CalculatorKind::Sodium => sodium::calculate(
            inputs,
            selections.sodium_disorder,
            selections.hyponatremia_severity,
        ),
        CalculatorKind::Phosphate => phosphate::calculate(inputs, selections.phosphate_severity),
        CalculatorKind::ElectrolyteInfusion => {
            let drug = selections.electrolyte_drug?;
            let options = InfusionOptions {
                kcl_line: selections.kcl_line,
                kcl_concentration: selections.kcl_concentration,
                addiphos_line: selections.addiphos_line,
            };
            Some(electrolyte_infusion::calculate(inputs, drug, &options))
        }
        CalculatorKind::BloodGas => blood_gas::calculate(inputs),
        CalculatorKind::IronToxicity => iron::calculate(inputs, selections.iron_preparation),
        CalculatorKind::Pards => pards::calculate(inputs),
        CalculatorKind::GlucoseInfusionRate => gir::gir(inputs),
        CalculatorKind::GirInfusionRate => gir::gir_infusion_rate(inputs),
        CalculatorKind::BloodProducts => {
            blood_products::calculate(inputs, selections.blood_product, selections.vitamin_k_group)
        }
    }
}

fn parse_request(payload: &str) -> Result<(CalculatorKind, PanelForm), InputError> {
    let request: CalculationRequest = serde_json::from_str(payload)?;
    let kind = request
        .calculator
        .parse()
        .map_err(|_| InputError::UnknownCalculator(request.calculator.clone()))?;
    Ok((kind, request.form))
}

/// Runs a calculator from a `{"calculator": ..., "form": {...}}` payload.
pub fn calculate_json(payload: &str) -> Result<Option<CalculationResult>, String> {
    let (kind, form) = parse_request(payload).map_err(|e| {
        tracing::warn!(error = %e, "Rejected calculation request");
        e.to_string()
    })?;
    calculate(kind, &form)
}

/// Weight-scaled ICU infusion table for the panel's weight.
pub fn infusion_reference(form: &PanelForm) -> Vec<ReferenceCategory> {
    let weight = PatientInputs::from_form(form).weight();
    tracing::debug!(has_weight = weight.is_some(), "Infusion reference requested");
    drug_reference::infusion_reference(weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(weight: &str) -> PanelForm {
        PanelForm {
            weight: Some(weight.into()),
            ..Default::default()
        }
    }

    #[test]
    fn dispatches_by_kind() {
        let result = calculate(CalculatorKind::Calcium, &form("10")).unwrap();
        assert_eq!(result, calcium::calculate(&PatientInputs::with_weight(10.0)));
    }

    #[test]
    fn missing_weight_is_not_an_error() {
        assert_eq!(calculate(CalculatorKind::Magnesium, &PanelForm::default()), Ok(None));
    }

    #[test]
    fn infusion_panel_waits_for_a_drug() {
        assert_eq!(calculate(CalculatorKind::ElectrolyteInfusion, &form("10")), Ok(None));

        let f = PanelForm {
            electrolyte_drug: Some("kcl".into()),
            ..Default::default()
        };
        let placeholder = calculate(CalculatorKind::ElectrolyteInfusion, &f).unwrap().unwrap();
        assert_eq!(placeholder.title(), "Enter Weight First");
    }

    #[test]
    fn bad_selection_is_reported() {
        let mut f = form("10");
        f.bicarbonate_method = Some("guess".into());
        let err = calculate(CalculatorKind::Bicarbonate, &f).unwrap_err();
        assert!(err.contains("guess"), "{err}");
    }

    #[test]
    fn unknown_calculator() {
        let err = calculate_json(r#"{"calculator": "warfarin", "form": {}}"#).unwrap_err();
        assert_eq!(err, "Unknown calculator: warfarin");
    }

    #[test]
    fn malformed_json() {
        let err = calculate_json("{not json").unwrap_err();
        assert!(err.starts_with("JSON error"), "{err}");
    }

    #[test]
    fn reference_uses_form_weight() {
        let table = infusion_reference(&form("10 kg"));
        assert!(table[0].drugs[0].stat_calculated.is_some());
        let table = infusion_reference(&form(""));
        assert!(table[0].drugs[0].stat_calculated.is_none());
    }
}
