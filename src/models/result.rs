//! Display-ready calculator output.
//!
//! Every calculator yields one of two shapes: a sectioned [`SimpleResult`]
//! or a step-by-step [`InfusionResult`] for drug dilutions. Values are
//! pre-formatted text; there is no machine-readable schema beyond this.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CalculationResult {
    Simple(SimpleResult),
    Infusion(InfusionResult),
}

impl CalculationResult {
    pub fn title(&self) -> &str {
        match self {
            Self::Simple(r) => &r.title,
            Self::Infusion(r) => &r.title,
        }
    }

    pub fn warnings(&self) -> &[String] {
        match self {
            Self::Simple(r) => &r.warnings,
            Self::Infusion(r) => &r.warnings,
        }
    }

    pub fn as_simple(&self) -> Option<&SimpleResult> {
        match self {
            Self::Simple(r) => Some(r),
            Self::Infusion(_) => None,
        }
    }

    pub fn as_infusion(&self) -> Option<&InfusionResult> {
        match self {
            Self::Infusion(r) => Some(r),
            Self::Simple(_) => None,
        }
    }
}

impl From<SimpleResult> for CalculationResult {
    fn from(r: SimpleResult) -> Self {
        Self::Simple(r)
    }
}

impl From<InfusionResult> for CalculationResult {
    fn from(r: InfusionResult) -> Self {
        Self::Infusion(r)
    }
}

/// One labeled line of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSection {
    pub subtitle: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ResultSection {
    pub fn new(subtitle: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            subtitle: subtitle.into(),
            value: value.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleResult {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default)]
    pub sections: Vec<ResultSection>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl SimpleResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Shown by the infusion panels until a weight is entered.
    pub fn enter_weight_first() -> Self {
        Self::new("Enter Weight First").section(ResultSection::new(
            "Required",
            "Please enter patient weight above to calculate doses",
        ))
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn dose_range(mut self, range: impl Into<String>) -> Self {
        self.dose_range = Some(range.into());
        self
    }

    pub fn frequency(mut self, frequency: impl Into<String>) -> Self {
        self.frequency = Some(frequency.into());
        self
    }

    pub fn section(mut self, section: ResultSection) -> Self {
        self.sections.push(section);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn find_section(&self, subtitle: &str) -> Option<&ResultSection> {
        self.sections.iter().find(|s| s.subtitle == subtitle)
    }
}

/// Stock and target information for an infused drug.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugInfo {
    pub concentration: String,
    pub target_dilution: String,
    pub max_dose: String,
    pub dose_range: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_recommendation: Option<String>,
}

/// Step-by-step dose, volume, and rate breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfusionSteps {
    pub dose: String,
    pub dose_formula: String,
    pub drug_volume: String,
    pub diluent: String,
    pub total_volume: String,
    pub duration: String,
    pub rate: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfusionResult {
    pub title: String,
    pub drug_info: DrugInfo,
    pub calculation: InfusionSteps,
    pub preparation: String,
    pub compatible: Vec<String>,
    pub incompatible: Vec<String>,
    /// Dose-cap warning first when present, then drug-specific warnings.
    #[serde(default)]
    pub warnings: Vec<String>,
}

// ═══════════════════════════════════════════════════════════
// Plain-text rendering
// ═══════════════════════════════════════════════════════════

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(r) => fmt::Display::fmt(r, f),
            Self::Infusion(r) => fmt::Display::fmt(r, f),
        }
    }
}

impl fmt::Display for SimpleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(subtitle) = &self.subtitle {
            writeln!(f, "{subtitle}")?;
        }
        if let Some(range) = &self.dose_range {
            writeln!(f, "Dose range: {range}")?;
        }
        for section in &self.sections {
            write!(f, "  {}: {}", section.subtitle, section.value)?;
            match &section.detail {
                Some(detail) => writeln!(f, " ({detail})")?,
                None => writeln!(f)?,
            }
        }
        if let Some(frequency) = &self.frequency {
            writeln!(f, "Frequency: {frequency}")?;
        }
        for note in &self.notes {
            writeln!(f, "Note: {note}")?;
        }
        for warning in &self.warnings {
            writeln!(f, "Warning: {warning}")?;
        }
        Ok(())
    }
}

impl fmt::Display for InfusionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for warning in &self.warnings {
            writeln!(f, "Warning: {warning}")?;
        }

        let info = &self.drug_info;
        writeln!(f, "Stock: {}", info.concentration)?;
        writeln!(f, "Target: {}", info.target_dilution)?;
        writeln!(f, "Dose Range: {}", info.dose_range)?;
        writeln!(f, "Max Dose: {}", info.max_dose)?;
        if let Some(line) = &info.line_recommendation {
            writeln!(f, "Line: {line}")?;
        }

        let steps = &self.calculation;
        writeln!(f, "1. Dose: {} ({})", steps.dose, steps.dose_formula)?;
        writeln!(f, "2. Drug Volume: {}", steps.drug_volume)?;
        writeln!(f, "3. Diluent: {}", steps.diluent)?;
        writeln!(f, "4. Total Volume: {}", steps.total_volume)?;
        writeln!(f, "5. Duration: {}", steps.duration)?;
        writeln!(f, "6. Rate: {}", steps.rate)?;

        writeln!(f, "Preparation: {}", self.preparation)?;
        writeln!(f, "Compatible: {}", self.compatible.join(", "))?;
        writeln!(f, "Incompatible: {}", self.incompatible.join(", "))
    }
}
