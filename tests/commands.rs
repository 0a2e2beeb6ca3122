use nightingale_lib::commands::{calculate, calculate_json, infusion_reference};
use nightingale_lib::models::{CalculationResult, CalculatorKind, PanelForm};

fn simple(result: Option<CalculationResult>) -> nightingale_lib::models::SimpleResult {
    result.and_then(|r| r.as_simple().cloned()).expect("simple result")
}

#[test]
fn every_calculator_accepts_an_empty_form() {
    for kind in CalculatorKind::ALL {
        let outcome = calculate(*kind, &PanelForm::default());
        assert_eq!(outcome, Ok(None), "{kind}");
    }
}

#[test]
fn blood_gas_from_json() {
    let payload = r#"{
        "calculator": "blood_gas",
        "form": { "ph": "7.20", "pco2": "30", "hco3": "10" }
    }"#;
    let r = simple(calculate_json(payload).unwrap());
    assert_eq!(r.find_section("Primary Disorder").unwrap().value, "Metabolic Acidosis");
    assert_eq!(
        r.find_section("Compensation (Winter's Formula)").unwrap().value,
        "Mixed with Respiratory Acidosis"
    );
}

#[test]
fn kcl_infusion_from_json() {
    let payload = r#"{
        "calculator": "electrolyte_infusion",
        "form": { "weight": "10", "electrolyte_drug": "kcl", "kcl_line": "peripheral", "kcl_concentration": "15" }
    }"#;
    let result = calculate_json(payload).unwrap().unwrap();
    let infusion = result.as_infusion().expect("infusion result");
    assert_eq!(infusion.title, "Potassium Chloride (KCl)");
    assert!(infusion.calculation.diluent.contains("120"), "{}", infusion.calculation.diluent);
}

#[test]
fn iron_and_pards_from_form() {
    let form = PanelForm {
        weight: Some("10".into()),
        ingested_amount: Some("650".into()),
        iron_preparation: Some("ferrous_sulfate".into()),
        ..Default::default()
    };
    let r = simple(calculate(CalculatorKind::IronToxicity, &form).unwrap());
    assert_eq!(r.find_section("Elemental Iron").unwrap().value, "130.0 mg");
    assert_eq!(r.find_section("Toxicity").unwrap().value, "Low risk (minimal)");

    let form = PanelForm {
        fio2: Some("0.6".into()),
        mean_airway_pressure: Some("15".into()),
        pao2: Some("60".into()),
        ..Default::default()
    };
    let r = simple(calculate(CalculatorKind::Pards, &form).unwrap());
    assert_eq!(r.find_section("Severity").unwrap().value, "Moderate");
}

#[test]
fn default_selections_apply() {
    let form = PanelForm {
        weight: Some("10".into()),
        hco3: Some("10".into()),
        base_excess: Some("-10".into()),
        ..Default::default()
    };
    // Both methods by default.
    let r = simple(calculate(CalculatorKind::Bicarbonate, &form).unwrap());
    assert!(r.find_section("Method 1: Using HCO3").is_some());
    assert!(r.find_section("Method 2: Using Base Excess").is_some());
}

#[test]
fn result_serializes_with_kind_tag() {
    let result = calculate_json(r#"{"calculator": "calcium", "form": {"weight": "12"}}"#)
        .unwrap()
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "simple");

    let back: CalculationResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn rejects_unknown_calculator_and_selection() {
    assert_eq!(
        calculate_json(r#"{"calculator": "insulin"}"#),
        Err("Unknown calculator: insulin".to_string())
    );

    let err = calculate_json(
        r#"{"calculator": "sodium", "form": {"weight": "10", "sodium": "160", "sodium_disorder": "hyper"}}"#,
    )
    .unwrap_err();
    assert!(err.contains("hyper"), "{err}");
}

#[test]
fn infusion_reference_scales_with_weight() {
    let form = PanelForm {
        weight: Some("20".into()),
        ..Default::default()
    };
    let table = infusion_reference(&form);
    let midazolam = table
        .iter()
        .flat_map(|c| c.drugs.iter())
        .find(|d| d.name == "Midazolam")
        .unwrap();
    assert_eq!(midazolam.stat_calculated.as_deref(), Some("2.00 mg"));
    assert_eq!(midazolam.infusion_calculated.as_deref(), Some("2.00 - 10.00 mg/hr"));
}
