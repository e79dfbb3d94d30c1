//! Summary module for patient-guide
//!
//! Turns a consultation input record into a patient-education document.

mod builder;
mod models;

pub use builder::SummaryBuilder;
pub use models::{ConsultationInput, SummaryOutput, INPUT_FIELDS};
