use crate::model::{Field, FormData};
use crate::validation::FieldErrors;

use super::{Step, StepValidator};

/// Plan selection: one of the two tiers must be picked
pub struct PlanStep;

impl StepValidator for PlanStep {
    fn step(&self) -> Step {
        Step::Plan
    }

    fn validate(&self, data: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if data.plan.is_none() {
            errors.insert(Field::Plan, "Select a membership plan.");
        }
        errors
    }
}
