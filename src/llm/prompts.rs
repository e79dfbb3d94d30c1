use crate::summary::ConsultationInput;
use crate::{PatientGuideError, Result};

/// Instructional prompt for the patient-education document.
///
/// Placeholders are `{name}` where name is one of the consultation input fields.
pub const PATIENT_EDUCATION_TEMPLATE: &str = include_str!("templates/patient_education.txt");

/// Section labels the template asks for, in document order.
pub const SECTION_HEADERS: &[&str] = &[
    "Patient Condition",
    "Causes",
    "Symptoms",
    "Treatment Plan",
    "Self-Care",
    "Medications",
    "Reminders",
    "Tests and Procedures",
    "Activities and Exercises",
    "Diet and Nutrition",
    "Wound Care",
    "Follow-up Appointments",
    "Summary",
    "Further Reading",
    "Glossary",
    "End with a motivational quote",
    "If available, provide the contact information",
];

/// Render the patient-education prompt for one consultation.
pub fn build_patient_education_prompt(input: &ConsultationInput) -> Result<String> {
    render_template(PATIENT_EDUCATION_TEMPLATE, |name| input.field(name))
}

/// Substitute `{name}` placeholders in a single pass.
///
/// Substituted values are copied verbatim and never rescanned, so braces in a
/// transcript stay as written. Braces that do not enclose an identifier are
/// left alone; an identifier the lookup does not know is an error.
pub fn render_template<'a, F>(template: &str, lookup: F) -> Result<String>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let name = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|name| is_placeholder_name(name));

        match name {
            Some(name) => {
                let value = lookup(name).ok_or_else(|| {
                    PatientGuideError::Config(format!(
                        "prompt template references unknown placeholder {{{}}}",
                        name
                    ))
                })?;
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn is_placeholder_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_lowercase() || c == '_')
}
