use crate::format::{self, CEP_DIGITS, PHONE_MIN_DIGITS};
use crate::model::{Field, FormData};
use crate::validation::{self, FieldErrors};

use super::{Step, StepValidator};

/// Contact and residential address
pub struct AddressStep;

impl StepValidator for AddressStep {
    fn step(&self) -> Step {
        Step::Address
    }

    fn validate(&self, data: &FormData) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let contact = &data.contact;

        if validation::require(&mut errors, Field::Email, &contact.email)
            && !validation::is_valid_email(&contact.email)
        {
            errors.insert(Field::Email, "Invalid email.");
        }

        if validation::require(&mut errors, Field::Phone, &contact.phone)
            && format::digits(&contact.phone).len() < PHONE_MIN_DIGITS
        {
            errors.insert(Field::Phone, "Incomplete phone (at least 10 digits).");
        }

        if validation::require(&mut errors, Field::Cep, &contact.cep)
            && format::digits(&contact.cep).len() != CEP_DIGITS
        {
            errors.insert(Field::Cep, "Invalid CEP (8 digits).");
        }

        validation::require(&mut errors, Field::Street, &contact.street);
        validation::require(&mut errors, Field::Number, &contact.number);
        validation::require(&mut errors, Field::Neighborhood, &contact.neighborhood);
        validation::require(&mut errors, Field::City, &contact.city);
        validation::require(&mut errors, Field::State, &contact.state);

        errors
    }
}
