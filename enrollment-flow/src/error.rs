use thiserror::Error;

use crate::model::{Field, Relationship, SubmissionStatus};
use crate::steps::Step;
use crate::validation::FieldErrors;

/// Errors raised by the wizard state machine
#[derive(Error, Debug)]
pub enum WizardError {
    #[error("step {step} is incomplete ({} invalid fields)", .errors.len())]
    StepIncomplete { step: Step, errors: FieldErrors },

    #[error("a signature is required to finish the enrollment")]
    SignatureRequired,

    #[error("this enrollment was already submitted as {0}")]
    AlreadySubmitted(String),

    #[error("action only available on the {expected} step")]
    WrongStep { expected: Step },

    #[error(transparent)]
    Dependent(#[from] DependentError),

    #[error(transparent)]
    Image(#[from] ImageError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Reasons a dependent cannot be added
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependentError {
    #[error("dependent {0} is required")]
    MissingField(Field),

    #[error("invalid birth date: {0}")]
    InvalidBirthDate(String),

    #[error("birth date is in the future")]
    BornInFuture,

    #[error("a dependent registered as {relationship} must be at most {max} years old (is {age})")]
    TooOld {
        relationship: Relationship,
        max: u32,
        age: u32,
    },

    #[error("a dependent registered as {relationship} must be at least {min} years old (is {age})")]
    TooYoung {
        relationship: Relationship,
        min: u32,
        age: u32,
    },

    #[error("dependent not found: {0}")]
    NotFound(String),
}

/// Image capture failures
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("invalid format '{0}': only images are allowed")]
    UnsupportedMediaType(String),

    #[error("could not process image: {0}")]
    Processing(#[from] image::ImageError),

    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Submission store failures
#[derive(Error, Debug)]
pub enum StorageError {
    #[error(
        "storage limit exceeded ({needed} of {limit} bytes). Try using smaller photos."
    )]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("submission not found: {0}")]
    NotFound(String),

    #[error("submission {id} is {from} and cannot become {to}")]
    InvalidTransition {
        id: String,
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Whether the failure is the quota overflow users can fix themselves
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, StorageError::QuotaExceeded { .. })
    }
}

/// Chat collaborator failures
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("chat API key is not configured")]
    MissingApiKey,

    #[error("chat request failed: {0}")]
    Request(String),
}

pub type Result<T> = std::result::Result<T, WizardError>;
