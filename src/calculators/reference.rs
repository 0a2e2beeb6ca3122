//! Constant clinical tables consulted by the calculators.
//!
//! Threshold tables are ordered from the highest tier down; [`tier`] returns
//! the first entry whose bound admits the value.

use serde::{Deserialize, Serialize};

use crate::models::{IronPreparation, KclLine};

/// Lower edge of a threshold tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// value >= edge
    AtLeast(f64),
    /// value > edge
    Above(f64),
}

impl Bound {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Self::AtLeast(edge) => value >= edge,
            Self::Above(edge) => value > edge,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tier<T> {
    pub bound: Bound,
    pub value: T,
}

const fn at_least<T>(edge: f64, value: T) -> Tier<T> {
    Tier {
        bound: Bound::AtLeast(edge),
        value,
    }
}

const fn above<T>(edge: f64, value: T) -> Tier<T> {
    Tier {
        bound: Bound::Above(edge),
        value,
    }
}

/// First tier admitting `value`, else `otherwise`.
pub fn tier<T: Copy>(value: f64, tiers: &[Tier<T>], otherwise: T) -> T {
    tiers
        .iter()
        .find(|t| t.bound.admits(value))
        .map(|t| t.value)
        .unwrap_or(otherwise)
}

// ═══════════════════════════════════════════════════════════
// Sodium
// ═══════════════════════════════════════════════════════════

/// Hypernatremia correction window (hours) by current Na.
pub const HYPERNATREMIA_WINDOWS: &[Tier<u32>] = &[
    at_least(184.0, 84),
    at_least(171.0, 72),
    at_least(158.0, 48),
];
pub const HYPERNATREMIA_DEFAULT_WINDOW: u32 = 24;

// ═══════════════════════════════════════════════════════════
// Potassium chloride line limits
// ═══════════════════════════════════════════════════════════

/// Maximum KCl concentration for a line, mEq/mL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineLimit {
    pub meq_per_ml: f64,
    pub label: &'static str,
    pub recommendation: &'static str,
}

pub const PERIPHERAL_LINE_SAFE: &str = "Peripheral line safe";
pub const CENTRAL_LINE_REQUIRED: &str = "Central line required";

/// Fixed limits per line type. `Custom` is resolved from the entered value.
pub fn kcl_line_limit(line: KclLine, custom_meq_per_100ml: f64) -> LineLimit {
    match line {
        KclLine::Peripheral => LineLimit {
            meq_per_ml: 0.08,
            label: "80 mEq/L (Peripheral)",
            recommendation: PERIPHERAL_LINE_SAFE,
        },
        KclLine::Central => LineLimit {
            meq_per_ml: 0.15,
            label: "15 mEq/100ml (Central)",
            recommendation: CENTRAL_LINE_REQUIRED,
        },
        KclLine::CentralRestricted => LineLimit {
            meq_per_ml: 0.2,
            label: "20 mEq/100ml (Central - Fluid restricted)",
            recommendation: CENTRAL_LINE_REQUIRED,
        },
        KclLine::Custom => LineLimit {
            meq_per_ml: custom_meq_per_100ml / 100.0,
            label: "Custom",
            recommendation: if custom_meq_per_100ml <= 8.0 {
                PERIPHERAL_LINE_SAFE
            } else {
                CENTRAL_LINE_REQUIRED
            },
        },
    }
}

// ═══════════════════════════════════════════════════════════
// Iron preparations
// ═══════════════════════════════════════════════════════════

/// Solid iron salt, dosed by mg of salt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IronSalt {
    pub id: IronPreparation,
    pub name: &'static str,
    pub elemental_percent: f64,
    pub example: &'static str,
}

/// Liquid preparation, dosed by mL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IronLiquid {
    pub id: IronPreparation,
    pub name: &'static str,
    pub mg_per_ml: f64,
    pub elemental_percent: f64,
}

pub const IRON_SALTS: &[IronSalt] = &[
    IronSalt {
        id: IronPreparation::FerrousSulfate,
        name: "Ferrous Sulfate",
        elemental_percent: 20.0,
        example: "325mg tablet = 65mg elemental",
    },
    IronSalt {
        id: IronPreparation::FerrousSulfateDried,
        name: "Ferrous Sulfate (Dried/Exsiccated)",
        elemental_percent: 32.0,
        example: "200mg = 64mg elemental",
    },
    IronSalt {
        id: IronPreparation::FerrousGluconate,
        name: "Ferrous Gluconate",
        elemental_percent: 12.0,
        example: "325mg tablet = 39mg elemental",
    },
    IronSalt {
        id: IronPreparation::FerrousFumarate,
        name: "Ferrous Fumarate",
        elemental_percent: 33.0,
        example: "325mg tablet = 107mg elemental",
    },
    IronSalt {
        id: IronPreparation::CarbonylIron,
        name: "Carbonyl Iron",
        elemental_percent: 98.0,
        example: "Pure elemental iron powder",
    },
    IronSalt {
        id: IronPreparation::PolysaccharideIron,
        name: "Polysaccharide Iron Complex",
        elemental_percent: 100.0,
        example: "150mg = 150mg elemental",
    },
    IronSalt {
        id: IronPreparation::IronDextran,
        name: "Iron Dextran",
        elemental_percent: 100.0,
        example: "Already elemental iron",
    },
];

pub const IRON_LIQUIDS: &[IronLiquid] = &[
    IronLiquid {
        id: IronPreparation::FerrousSulfateDrops,
        name: "Ferrous Sulfate Drops",
        mg_per_ml: 75.0,
        elemental_percent: 20.0,
    },
    IronLiquid {
        id: IronPreparation::FerrousSulfateElixir,
        name: "Ferrous Sulfate Elixir",
        mg_per_ml: 44.0,
        elemental_percent: 20.0,
    },
    IronLiquid {
        id: IronPreparation::FerrousGluconateSyrup,
        name: "Ferrous Gluconate Syrup",
        mg_per_ml: 60.0,
        elemental_percent: 12.0,
    },
    IronLiquid {
        id: IronPreparation::FerrousFumarateSuspension,
        name: "Ferrous Fumarate Suspension",
        mg_per_ml: 20.0,
        elemental_percent: 33.0,
    },
    IronLiquid {
        id: IronPreparation::PolysaccharideIronElixir,
        name: "Polysaccharide Iron Elixir",
        mg_per_ml: 20.0,
        elemental_percent: 100.0,
    },
];

pub fn iron_salt(id: IronPreparation) -> Option<&'static IronSalt> {
    IRON_SALTS.iter().find(|s| s.id == id)
}

pub fn iron_liquid(id: IronPreparation) -> Option<&'static IronLiquid> {
    IRON_LIQUIDS.iter().find(|l| l.id == id)
}

/// Expected toxicity from elemental iron per kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestionSeverity {
    Minimal,
    Mild,
    Severe,
}

impl IngestionSeverity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Mild => "mild",
            Self::Severe => "severe",
        }
    }

    pub fn risk(self) -> &'static str {
        match self {
            Self::Minimal => "Low risk",
            Self::Mild => "Mild GI Symptoms Possible",
            Self::Severe => "Severe Toxicity Expected",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Minimal => "Observation at home may be appropriate",
            Self::Mild => "ED evaluation, serum iron level, observation",
            Self::Severe => "Hospital admission, likely chelation with deferoxamine",
        }
    }
}

/// Elemental iron mg/kg tiers.
pub const INGESTION_TIERS: &[Tier<IngestionSeverity>] = &[
    at_least(60.0, IngestionSeverity::Severe),
    at_least(20.0, IngestionSeverity::Mild),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerumIronLevel {
    Normal,
    High,
    Critical,
    LifeThreatening,
}

impl SerumIronLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
            Self::LifeThreatening => "life-threatening",
        }
    }

    pub fn recommendation(self) -> &'static str {
        match self {
            Self::Normal => "Unlikely to develop significant toxicity",
            Self::High => "Consider chelation, close monitoring",
            Self::Critical => "Chelation therapy strongly indicated",
            Self::LifeThreatening => "Immediate chelation, ICU admission",
        }
    }
}

/// Serum iron (mcg/dL) tiers.
pub const SERUM_IRON_TIERS: &[Tier<SerumIronLevel>] = &[
    at_least(1000.0, SerumIronLevel::LifeThreatening),
    at_least(500.0, SerumIronLevel::Critical),
    at_least(350.0, SerumIronLevel::High),
];

// ═══════════════════════════════════════════════════════════
// PARDS (PALICC)
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PardsSeverity {
    NotPards,
    Mild,
    Moderate,
    Severe,
}

impl PardsSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotPards => "Not PARDS",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

pub const OI_TIERS: &[Tier<PardsSeverity>] = &[
    at_least(16.0, PardsSeverity::Severe),
    at_least(8.0, PardsSeverity::Moderate),
    at_least(4.0, PardsSeverity::Mild),
];

pub const OSI_TIERS: &[Tier<PardsSeverity>] = &[
    above(12.3, PardsSeverity::Severe),
    at_least(7.5, PardsSeverity::Moderate),
    at_least(5.0, PardsSeverity::Mild),
];

// ═══════════════════════════════════════════════════════════
// Infusion compatibility
// ═══════════════════════════════════════════════════════════

pub const CALCIUM_GLUCONATE_COMPATIBLE: &[&str] = &["NS", "D5W", "D10W"];
pub const CALCIUM_GLUCONATE_INCOMPATIBLE: &[&str] = &[
    "Amphotericin B",
    "Ceftriaxone",
    "Fluconazole",
    "Meropenem",
    "Methylprednisolone",
    "Phosphate",
    "Magnesium",
];

pub const KCL_COMPATIBLE: &[&str] = &["NS", "D5W", "LR"];
pub const KCL_INCOMPATIBLE: &[&str] = &["Amphotericin B", "Diazepam", "Phenytoin"];

pub const MGSO4_COMPATIBLE: &[&str] = &["D5W", "NS", "LR"];
pub const MGSO4_INCOMPATIBLE: &[&str] = &[
    "Amiodarone",
    "Amphotericin B",
    "Calcium chloride",
    "Cefepime",
    "Sodium bicarbonate",
];

pub const NAHCO3_COMPATIBLE: &[&str] = &["NS", "D5W", "D10W"];
pub const NAHCO3_INCOMPATIBLE: &[&str] = &[
    "Amiodarone",
    "Calcium salts",
    "Dobutamine",
    "Dopamine",
    "Epinephrine",
    "Norepinephrine",
    "Magnesium sulfate",
    "Midazolam",
    "Phenytoin",
];

pub const CACL2_COMPATIBLE: &[&str] = &["NS", "D5W"];
pub const CACL2_INCOMPATIBLE: &[&str] = &[
    "Phosphates",
    "Sodium Bicarbonate",
    "Sulphates",
    "Amphotericin B",
    "Ceftriaxone",
];

pub const ADDIPHOS_COMPATIBLE: &[&str] = &["Most IV fluids"];
pub const ADDIPHOS_INCOMPATIBLE: &[&str] = &["Calcium salts (precipitation risk)"];

pub fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hypernatremia_window_boundaries() {
        let cases = [
            (183.0, 72),
            (184.0, 84),
            (170.0, 48),
            (171.0, 72),
            (157.0, 24),
            (158.0, 48),
            (23.0, 24),
        ];
        for (na, hours) in cases {
            assert_eq!(
                tier(na, HYPERNATREMIA_WINDOWS, HYPERNATREMIA_DEFAULT_WINDOW),
                hours,
                "Na {na}"
            );
        }
    }

    #[test]
    fn ingestion_tiers() {
        assert_eq!(tier(13.0, INGESTION_TIERS, IngestionSeverity::Minimal), IngestionSeverity::Minimal);
        assert_eq!(tier(20.0, INGESTION_TIERS, IngestionSeverity::Minimal), IngestionSeverity::Mild);
        assert_eq!(tier(59.9, INGESTION_TIERS, IngestionSeverity::Minimal), IngestionSeverity::Mild);
        assert_eq!(tier(60.0, INGESTION_TIERS, IngestionSeverity::Minimal), IngestionSeverity::Severe);
    }

    #[test]
    fn serum_iron_tiers() {
        let classify = |v| tier(v, SERUM_IRON_TIERS, SerumIronLevel::Normal);
        assert_eq!(classify(349.0), SerumIronLevel::Normal);
        assert_eq!(classify(350.0), SerumIronLevel::High);
        assert_eq!(classify(500.0), SerumIronLevel::Critical);
        assert_eq!(classify(999.0), SerumIronLevel::Critical);
        assert_eq!(classify(1000.0), SerumIronLevel::LifeThreatening);
    }

    #[test]
    fn osi_upper_edge_is_exclusive() {
        assert_eq!(tier(12.3, OSI_TIERS, PardsSeverity::NotPards), PardsSeverity::Moderate);
        assert_eq!(tier(12.4, OSI_TIERS, PardsSeverity::NotPards), PardsSeverity::Severe);
        assert_eq!(tier(4.9, OSI_TIERS, PardsSeverity::NotPards), PardsSeverity::NotPards);
    }

    #[test]
    fn oi_tiers() {
        assert_eq!(tier(3.9, OI_TIERS, PardsSeverity::NotPards), PardsSeverity::NotPards);
        assert_eq!(tier(4.0, OI_TIERS, PardsSeverity::NotPards), PardsSeverity::Mild);
        assert_eq!(tier(15.0, OI_TIERS, PardsSeverity::NotPards), PardsSeverity::Moderate);
        assert_eq!(tier(16.0, OI_TIERS, PardsSeverity::NotPards), PardsSeverity::Severe);
    }

    #[test]
    fn severity_orders_for_max() {
        assert!(PardsSeverity::Severe > PardsSeverity::Moderate);
        assert_eq!(PardsSeverity::Mild.max(PardsSeverity::Moderate), PardsSeverity::Moderate);
    }

    #[test]
    fn iron_lookup() {
        assert_eq!(iron_salt(IronPreparation::FerrousSulfate).unwrap().elemental_percent, 20.0);
        assert!(iron_salt(IronPreparation::FerrousSulfateDrops).is_none());
        assert_eq!(iron_liquid(IronPreparation::FerrousSulfateDrops).unwrap().mg_per_ml, 75.0);
    }

    #[test]
    fn custom_kcl_line_recommendation() {
        assert_eq!(kcl_line_limit(KclLine::Custom, 8.0).recommendation, PERIPHERAL_LINE_SAFE);
        assert_eq!(kcl_line_limit(KclLine::Custom, 9.0).recommendation, CENTRAL_LINE_REQUIRED);
        assert_eq!(kcl_line_limit(KclLine::Custom, 4.0).meq_per_ml, 0.04);
        assert_eq!(kcl_line_limit(KclLine::Peripheral, 4.0).meq_per_ml, 0.08);
    }
}
