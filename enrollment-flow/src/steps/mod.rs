// Enrollment wizard steps
pub mod address;
pub mod dependents;
pub mod personal;
pub mod plan;
pub mod professional;
pub mod review;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::FormData;
use crate::validation::FieldErrors;

pub use address::AddressStep;
pub use dependents::DependentsStep;
pub use personal::PersonalStep;
pub use plan::PlanStep;
pub use professional::ProfessionalStep;
pub use review::ReviewStep;

/// Ordinal position in the wizard, 1 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Plan = 1,
    Personal = 2,
    Address = 3,
    Professional = 4,
    Dependents = 5,
    Review = 6,
}

impl Step {
    pub const FIRST: Step = Step::Plan;
    pub const LAST: Step = Step::Review;
    pub const ALL: [Step; 6] = [
        Step::Plan,
        Step::Personal,
        Step::Address,
        Step::Professional,
        Step::Dependents,
        Step::Review,
    ];

    pub fn ordinal(&self) -> u8 {
        *self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Step> {
        Step::ALL.get(usize::from(ordinal).checked_sub(1)?).copied()
    }

    /// Following step, clamped at the last one
    pub fn next(&self) -> Step {
        Step::from_ordinal(self.ordinal() + 1).unwrap_or(Step::LAST)
    }

    /// Preceding step, clamped at the first one
    pub fn previous(&self) -> Step {
        Step::from_ordinal(self.ordinal().saturating_sub(1)).unwrap_or(Step::FIRST)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Step::Plan => "Planos",
            Step::Personal => "Pessoal",
            Step::Address => "Endereço",
            Step::Professional => "Profissão",
            Step::Dependents => "Família",
            Step::Review => "Revisão",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ordinal(), self.title())
    }
}

/// Validation rule attached to one wizard step
pub trait StepValidator: Send + Sync {
    /// The step this validator guards
    fn step(&self) -> Step;

    /// Pure predicate over the draft; an empty result lets the user continue
    fn validate(&self, data: &FormData) -> FieldErrors;
}

/// The six validators in wizard order
pub fn default_steps() -> Vec<std::sync::Arc<dyn StepValidator>> {
    vec![
        std::sync::Arc::new(PlanStep),
        std::sync::Arc::new(PersonalStep),
        std::sync::Arc::new(AddressStep),
        std::sync::Arc::new(ProfessionalStep),
        std::sync::Arc::new(DependentsStep),
        std::sync::Arc::new(ReviewStep),
    ]
}
