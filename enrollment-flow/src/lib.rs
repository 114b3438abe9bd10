pub mod admin;
pub mod chat;
pub mod dependents;
pub mod error;
pub mod format;
pub mod id;
pub mod model;
pub mod photo;
pub mod print;
pub mod signature;
pub mod steps;
pub mod storage;
pub mod validation;
pub mod wizard;

// Re-export commonly used types
pub use admin::{AdminPanel, SubmissionStats};
pub use chat::{ChatAssistant, ChatMessage, ChatModel, ChatRole, UnconfiguredChatModel};
#[cfg(feature = "rig")]
pub use chat::OpenRouterChatModel;
pub use error::{ChatError, DependentError, ImageError, Result, StorageError, WizardError};
pub use model::{
    Attachment, Dependent, DependentDraft, Field, FormData, Gender, MaritalStatus, Plan,
    Relationship, Submission, SubmissionStatus, TextField,
};
pub use signature::{PadEvent, Point, SignaturePad, SignatureUpdate};
pub use steps::{Step, StepValidator};
pub use storage::{InMemorySubmissionStore, JsonFileSubmissionStore, SubmissionStore};
pub use validation::FieldErrors;
pub use wizard::{Wizard, WizardBuilder, WizardSession};
