//! Pediatric dosing calculators.
//!
//! Every calculator is a pure function of a [`PatientInputs`](crate::models::PatientInputs)
//! snapshot plus the panel's selections. Missing required inputs yield `None`
//! (or the "Enter Weight First" placeholder for the infusion panel).

pub mod reference;

// Electrolyte corrections
pub mod bicarbonate;
pub mod calcium;
pub mod magnesium;
pub mod phosphate;
pub mod potassium;
pub mod sodium;

pub mod electrolyte_infusion;

pub mod blood_gas;
pub mod blood_products;
pub mod drug_reference;
pub mod gir;
pub mod iron;
pub mod pards;
