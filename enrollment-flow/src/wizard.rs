use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    dependents,
    error::{DependentError, Result, WizardError},
    format,
    model::{
        Attachment, Dependent, DependentDraft, Field, FormData, Gender, MaritalStatus, Plan,
        Submission, TextField,
    },
    photo,
    signature::SignatureUpdate,
    steps::{self, Step, StepValidator},
    storage::SubmissionStore,
    validation::FieldErrors,
};

/// The ordered set of step validators. Immutable once built and shared by
/// every enrollment session.
pub struct Wizard {
    pub id: String,
    validators: Vec<Arc<dyn StepValidator>>,
}

impl Wizard {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            validators: Vec::new(),
        }
    }

    /// The six standard enrollment steps
    pub fn standard() -> Self {
        steps::default_steps()
            .into_iter()
            .fold(WizardBuilder::new("membership_enrollment"), |builder, step| {
                builder.add_step(step)
            })
            .build()
    }

    pub fn validator(&self, step: Step) -> Option<Arc<dyn StepValidator>> {
        self.validators.iter().find(|v| v.step() == step).cloned()
    }

    /// Runs the validator of `step`; a step without one always passes
    pub fn validate(&self, step: Step, data: &FormData) -> FieldErrors {
        self.validators
            .iter()
            .filter(|v| v.step() == step)
            .fold(FieldErrors::new(), |mut errors, validator| {
                for (field, message) in validator.validate(data).iter() {
                    errors.insert(field, message);
                }
                errors
            })
    }

    /// First step before `until` whose data no longer passes
    pub fn first_invalid_before(&self, until: Step, data: &FormData) -> Option<(Step, FieldErrors)> {
        Step::ALL
            .into_iter()
            .take_while(|step| *step < until)
            .map(|step| (step, self.validate(step, data)))
            .find(|(_, errors)| !errors.is_empty())
    }
}

/// Builder for creating wizards
pub struct WizardBuilder {
    wizard: Wizard,
}

impl WizardBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            wizard: Wizard::new(id),
        }
    }

    pub fn add_step(mut self, validator: Arc<dyn StepValidator>) -> Self {
        self.wizard.validators.push(validator);
        self
    }

    pub fn build(mut self) -> Wizard {
        self.wizard.validators.sort_by_key(|v| v.step());
        self.wizard
    }
}

/// One member filling in the wizard: current step, draft record and the
/// fields already visited.
pub struct WizardSession {
    wizard: Arc<Wizard>,
    current: Step,
    data: FormData,
    touched: HashSet<Field>,
    errors: FieldErrors,
    signature_required: bool,
    submitted: Option<Submission>,
}

impl WizardSession {
    pub fn new(wizard: Arc<Wizard>) -> Self {
        let mut session = Self {
            wizard,
            current: Step::FIRST,
            data: FormData::default(),
            touched: HashSet::new(),
            errors: FieldErrors::new(),
            signature_required: false,
            submitted: None,
        };
        session.revalidate();
        session
    }

    pub fn current_step(&self) -> Step {
        self.current
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Every error of the current step, touched or not
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Errors the user should see: only for fields already left
    pub fn visible_errors(&self) -> FieldErrors {
        self.errors.visible(&self.touched)
    }

    /// Whether the continue action of the current step is enabled
    pub fn can_continue(&self) -> bool {
        self.errors.is_empty()
    }

    /// Set after a submit attempt without signature, until one is given
    pub fn signature_required(&self) -> bool {
        self.signature_required
    }

    pub fn submitted(&self) -> Option<&Submission> {
        self.submitted.as_ref()
    }

    fn revalidate(&mut self) {
        self.errors = self.wizard.validate(self.current, &self.data);
    }

    /// Marks a field as left by the user so its error becomes visible
    pub fn touch(&mut self, field: impl Into<Field>) {
        self.touched.insert(field.into());
    }

    pub fn select_plan(&mut self, plan: Plan) {
        self.data.plan = Some(plan);
        self.revalidate();
    }

    /// Stores free text, applying the CPF, CEP and phone masks and
    /// normalizing dates
    pub fn set_text(&mut self, field: TextField, value: &str) {
        let value = match field {
            TextField::Cpf => format::format_cpf(value),
            TextField::Cep => format::format_cep(value),
            TextField::Phone => format::format_phone(value),
            TextField::BirthDate | TextField::AdmissionDate => format::normalize_date(value),
            _ => value.to_string(),
        };
        *self.data.text_mut(field) = value;
        self.revalidate();
    }

    pub fn set_gender(&mut self, gender: Option<Gender>) {
        self.data.personal.gender = gender;
        self.revalidate();
    }

    /// Leaving "married" drops the marriage certificate
    pub fn set_marital_status(&mut self, status: Option<MaritalStatus>) {
        self.data.personal.marital_status = status;
        if status != Some(MaritalStatus::Married) {
            self.data.personal.marriage_document = None;
        }
        self.revalidate();
    }

    pub fn attach(&mut self, attachment: Attachment, image: Option<String>) {
        *self.data.attachment_mut(attachment) = image;
        self.revalidate();
    }

    /// Compresses an image file and attaches it; the draft is unchanged on
    /// failure
    pub async fn attach_file(&mut self, attachment: Attachment, path: impl AsRef<Path>) -> Result<()> {
        let image = photo::compress_file(path).await?;
        self.attach(attachment, Some(image));
        Ok(())
    }

    /// Advances one step if the current one validates
    pub fn next(&mut self) -> Result<Step> {
        if !self.can_continue() {
            return Err(WizardError::StepIncomplete {
                step: self.current,
                errors: self.errors.clone(),
            });
        }
        let from = self.current;
        self.current = self.current.next();
        self.revalidate();
        info!(from = %from, to = %self.current, "step advanced");
        Ok(self.current)
    }

    /// Goes back one step, never before the first
    pub fn previous(&mut self) -> Step {
        self.current = self.current.previous();
        self.revalidate();
        self.current
    }

    /// Adds a dependent if the age rules for its relationship hold; the list
    /// is untouched on failure
    pub fn add_dependent(&mut self, draft: &DependentDraft, today: NaiveDate) -> Result<&Dependent> {
        if self.current != Step::Dependents {
            return Err(WizardError::WrongStep {
                expected: Step::Dependents,
            });
        }
        let dependent = dependents::admit(draft, today)?;
        let index = self.data.dependents.len();
        self.data.dependents.push(dependent);
        self.revalidate();
        Ok(&self.data.dependents[index])
    }

    pub fn remove_dependent(&mut self, id: &str) -> Result<Dependent> {
        let index = self
            .data
            .dependents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DependentError::NotFound(id.to_string()))?;
        let removed = self.data.dependents.remove(index);
        self.revalidate();
        Ok(removed)
    }

    pub fn set_signature(&mut self, signature: Option<String>) {
        if signature.is_some() {
            self.signature_required = false;
        }
        self.data.signature = signature;
        self.revalidate();
    }

    /// Applies what the signature pad emitted
    pub fn apply_signature(&mut self, update: SignatureUpdate) {
        self.set_signature(update.into_value());
    }

    /// Finalizes the enrollment. Without a signature nothing is stored and
    /// the required-signature indicator is raised.
    pub async fn submit(&mut self, store: &dyn SubmissionStore) -> Result<Submission> {
        if let Some(done) = &self.submitted {
            return Err(WizardError::AlreadySubmitted(done.id.clone()));
        }
        if self.current != Step::Review {
            return Err(WizardError::WrongStep {
                expected: Step::Review,
            });
        }
        if self.data.signature.is_none() {
            self.signature_required = true;
            self.touch(Field::Signature);
            warn!("submission blocked: missing signature");
            return Err(WizardError::SignatureRequired);
        }
        if let Some((step, errors)) = self.wizard.first_invalid_before(Step::Review, &self.data) {
            return Err(WizardError::StepIncomplete { step, errors });
        }

        let submission = store.append(self.data.clone()).await.map_err(|e| {
            warn!(error = %e, quota = e.is_quota_exceeded(), "failed to store submission");
            e
        })?;
        info!(
            id = %submission.id,
            dependents = submission.data.dependents.len(),
            "enrollment submitted"
        );
        self.submitted = Some(submission.clone());
        Ok(submission)
    }

    /// Discards everything and starts over on the first step
    pub fn reset(&mut self) {
        *self = WizardSession::new(self.wizard.clone());
    }
}
