use crate::model::FormData;
use crate::validation::FieldErrors;

use super::{Step, StepValidator};

/// Dependents are optional; eligibility is enforced when each one is added
pub struct DependentsStep;

impl StepValidator for DependentsStep {
    fn step(&self) -> Step {
        Step::Dependents
    }

    fn validate(&self, _data: &FormData) -> FieldErrors {
        FieldErrors::new()
    }
}
