use serde::{Deserialize, Serialize};

use super::InputError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            pub const ALL: &'static [$name] = &[$(Self::$variant),+];
        }

        impl std::str::FromStr for $name {
            type Err = InputError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InputError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Panel selections
// ---------------------------------------------------------------------------

str_enum!(SodiumDisorder {
    Hyponatremia => "hyponatremia",
    Hypernatremia => "hypernatremia",
});

str_enum!(HyponatremiaSeverity {
    Mild => "mild",
    Severe => "severe",
});

str_enum!(BicarbonateMethod {
    Hco3 => "hco3",
    BaseExcess => "be",
    Both => "both",
});

str_enum!(PhosphateSeverity {
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(KclLine {
    Peripheral => "peripheral",
    Central => "central",
    CentralRestricted => "central_restricted",
    Custom => "custom",
});

str_enum!(KclConcentration {
    FifteenPercent => "15",
    TenPercent => "10",
});

str_enum!(LineType {
    Peripheral => "peripheral",
    Central => "central",
});

str_enum!(VitaminKGroup {
    Infant => "infant",
    Adolescent => "adolescent",
});

// ---------------------------------------------------------------------------
// Calculator identities
// ---------------------------------------------------------------------------

str_enum!(ElectrolyteDrug {
    CalciumGluconate => "calcium_gluconate",
    PotassiumChloride => "kcl",
    MagnesiumSulfate => "mgso4",
    SodiumBicarbonate => "nahco3",
    CalciumChloride => "cacl2",
    Addiphos => "addiphos",
});

str_enum!(BloodProduct {
    PackedRedCells => "prbc",
    FreshFrozenPlasma => "ffp",
    Cryoprecipitate => "cryo",
    Platelets => "platelets",
    VitaminK => "vitamin_k",
});

str_enum!(IronPreparation {
    FerrousSulfate => "ferrous_sulfate",
    FerrousSulfateDried => "ferrous_sulfate_dried",
    FerrousGluconate => "ferrous_gluconate",
    FerrousFumarate => "ferrous_fumarate",
    CarbonylIron => "carbonyl_iron",
    PolysaccharideIron => "polysaccharide_iron",
    IronDextran => "iron_dextran",
    FerrousSulfateDrops => "ferrous_sulfate_drops",
    FerrousSulfateElixir => "ferrous_sulfate_elixir",
    FerrousGluconateSyrup => "ferrous_gluconate_syrup",
    FerrousFumarateSuspension => "ferrous_fumarate_suspension",
    PolysaccharideIronElixir => "polysaccharide_iron_elixir",
    Custom => "custom",
});

str_enum!(CalculatorKind {
    Calcium => "calcium",
    Magnesium => "magnesium",
    Potassium => "potassium",
    Bicarbonate => "bicarbonate",
    Sodium => "sodium",
    Phosphate => "phosphate",
    ElectrolyteInfusion => "electrolyte_infusion",
    BloodGas => "blood_gas",
    IronToxicity => "iron_toxicity",
    Pards => "pards",
    GlucoseInfusionRate => "gir",
    GirInfusionRate => "gir_rate",
    BloodProducts => "blood_products",
});

impl Default for SodiumDisorder {
    fn default() -> Self {
        Self::Hyponatremia
    }
}

impl Default for HyponatremiaSeverity {
    fn default() -> Self {
        Self::Mild
    }
}

impl Default for BicarbonateMethod {
    fn default() -> Self {
        Self::Both
    }
}

impl Default for PhosphateSeverity {
    fn default() -> Self {
        Self::Moderate
    }
}

impl Default for KclLine {
    fn default() -> Self {
        Self::Peripheral
    }
}

impl Default for KclConcentration {
    fn default() -> Self {
        Self::FifteenPercent
    }
}

impl Default for LineType {
    fn default() -> Self {
        Self::Peripheral
    }
}

impl Default for VitaminKGroup {
    fn default() -> Self {
        Self::Infant
    }
}

impl Default for BloodProduct {
    fn default() -> Self {
        Self::PackedRedCells
    }
}

impl BicarbonateMethod {
    pub fn uses_hco3(&self) -> bool {
        matches!(self, Self::Hco3 | Self::Both)
    }

    pub fn uses_base_excess(&self) -> bool {
        matches!(self, Self::BaseExcess | Self::Both)
    }
}

impl KclConcentration {
    /// Stock potassium content (mEq per mL).
    pub fn meq_per_ml(&self) -> f64 {
        match self {
            Self::FifteenPercent => 2.0,
            Self::TenPercent => 1.34,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FifteenPercent => "15% KCl = 2 mEq/ml",
            Self::TenPercent => "10% KCl = 1.34 mEq/ml",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn round_trip_as_str() {
        for method in BicarbonateMethod::ALL {
            assert_eq!(BicarbonateMethod::from_str(method.as_str()).unwrap(), *method);
        }
        for drug in ElectrolyteDrug::ALL {
            assert_eq!(drug.as_str().parse::<ElectrolyteDrug>().unwrap(), *drug);
        }
    }

    #[test]
    fn from_str_trims_whitespace() {
        assert_eq!(" central ".parse::<KclLine>().unwrap(), KclLine::Central);
    }

    #[test]
    fn invalid_value_names_the_field() {
        let err = "sideways".parse::<KclLine>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for KclLine: sideways");
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&KclConcentration::TenPercent).unwrap();
        assert_eq!(json, "\"10\"");
        let parsed: BicarbonateMethod = serde_json::from_str("\"be\"").unwrap();
        assert_eq!(parsed, BicarbonateMethod::BaseExcess);
    }

    #[test]
    fn panel_defaults() {
        assert_eq!(BicarbonateMethod::default(), BicarbonateMethod::Both);
        assert_eq!(SodiumDisorder::default(), SodiumDisorder::Hyponatremia);
        assert_eq!(HyponatremiaSeverity::default(), HyponatremiaSeverity::Mild);
        assert_eq!(PhosphateSeverity::default(), PhosphateSeverity::Moderate);
        assert_eq!(KclLine::default(), KclLine::Peripheral);
        assert_eq!(KclConcentration::default(), KclConcentration::FifteenPercent);
    }

    #[test]
    fn kcl_stock_strengths() {
        assert_eq!(KclConcentration::FifteenPercent.meq_per_ml(), 2.0);
        assert_eq!(KclConcentration::TenPercent.meq_per_ml(), 1.34);
    }
}
