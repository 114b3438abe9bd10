use crate::model::{Field, FormData};
use crate::validation::{self, FieldErrors};

use super::{Step, StepValidator};

/// Employment data; mandatory only for Efetivo members, who must prove
/// their link with the bank
pub struct ProfessionalStep;

impl StepValidator for ProfessionalStep {
    fn step(&self) -> Step {
        Step::Professional
    }

    fn validate(&self, data: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if !data.is_effective() {
            return errors;
        }
        let professional = &data.professional;
        validation::require(&mut errors, Field::Employer, &professional.employer);
        validation::require(&mut errors, Field::Profession, &professional.profession);
        validation::require_date(&mut errors, Field::AdmissionDate, &professional.admission_date);
        errors
    }
}
