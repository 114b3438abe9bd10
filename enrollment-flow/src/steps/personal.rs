use crate::format::{self, CPF_DIGITS};
use crate::model::{Field, FormData, MaritalStatus};
use crate::validation::{self, FieldErrors};

use super::{Step, StepValidator};

/// Personal data of the holder
pub struct PersonalStep;

impl StepValidator for PersonalStep {
    fn step(&self) -> Step {
        Step::Personal
    }

    fn validate(&self, data: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let personal = &data.personal;

        if data.is_effective() && personal.profile_picture.is_none() {
            errors.insert(
                Field::ProfilePicture,
                "A 3x4 photo is required for Efetivo members.",
            );
        }

        if validation::require(&mut errors, Field::FullName, &personal.full_name)
            && personal.full_name.split_whitespace().count() < 2
        {
            errors.insert(Field::FullName, "Enter both first and last name.");
        }

        if validation::require(&mut errors, Field::Cpf, &personal.cpf)
            && format::digits(&personal.cpf).len() != CPF_DIGITS
        {
            errors.insert(Field::Cpf, "Invalid CPF (11 digits).");
        }

        validation::require_date(&mut errors, Field::BirthDate, &personal.birth_date);

        if personal.gender.is_none() {
            errors.insert(Field::Gender, "Gender is required.");
        }
        match personal.marital_status {
            None => errors.insert(Field::MaritalStatus, "Marital status is required."),
            Some(MaritalStatus::Married) if personal.marriage_document.is_none() => {
                errors.insert(
                    Field::MarriageDocument,
                    "The marriage certificate is required for married members.",
                )
            }
            Some(_) => {}
        }

        errors
    }
}
