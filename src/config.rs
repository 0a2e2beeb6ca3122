/// Application-level constants
pub const APP_NAME: &str = "Nightingale";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "nightingale_lib=info".to_string()
}

// ═══════════════════════════════════════════════════════════
// Panel defaults (applied when the form leaves a choice blank)
// ═══════════════════════════════════════════════════════════

/// Target sodium (mEq/L) when none is entered.
pub const DEFAULT_TARGET_SODIUM: f64 = 140.0;

/// Serum albumin (g/dL) assumed for anion-gap correction.
pub const DEFAULT_ALBUMIN: f64 = 4.0;

/// Custom KCl dilution (mEq per 100 mL) before the user picks one.
pub const DEFAULT_KCL_CUSTOM_MEQ_PER_100ML: f64 = 4.0;

/// Dextrose percentage for the GIR panel.
pub const DEFAULT_DEXTROSE_PERCENT: f64 = 10.0;
