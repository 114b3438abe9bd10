use crate::model::{Field, FormData};
use crate::validation::FieldErrors;

use super::{Step, StepValidator};

/// Final review: the holder has to sign before finishing
pub struct ReviewStep;

impl StepValidator for ReviewStep {
    fn step(&self) -> Step {
        Step::Review
    }

    fn validate(&self, data: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if data.signature.is_none() {
            errors.insert(Field::Signature, "Signature required to finish.");
        }
        errors
    }
}
