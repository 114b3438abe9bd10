//! Age-based eligibility of dependents.
//!
//! Children are covered up to 24 years old; grandparents and parents-in-law
//! only from 65. The other categories have no age bound.

use chrono::NaiveDate;
use tracing::info;

use crate::error::DependentError;
use crate::format;
use crate::id;
use crate::model::{Dependent, DependentDraft, Field, Relationship};

pub const CHILD_MAX_AGE: u32 = 24;
pub const ELDER_MIN_AGE: u32 = 65;

/// `(minimum, maximum)` age accepted for a relationship
pub fn age_limits(relationship: Relationship) -> (Option<u32>, Option<u32>) {
    match relationship {
        Relationship::Child => (None, Some(CHILD_MAX_AGE)),
        Relationship::Grandparent | Relationship::ParentInLaw => (Some(ELDER_MIN_AGE), None),
        Relationship::Spouse | Relationship::Stepchild | Relationship::Parent => (None, None),
    }
}

pub fn check_age(relationship: Relationship, age: u32) -> Result<(), DependentError> {
    match age_limits(relationship) {
        (_, Some(max)) if age > max => Err(DependentError::TooOld {
            relationship,
            max,
            age,
        }),
        (Some(min), _) if age < min => Err(DependentError::TooYoung {
            relationship,
            min,
            age,
        }),
        _ => Ok(()),
    }
}

/// Validates a draft against `today` and turns it into a dependent with a
/// fresh id. The draft is left untouched either way.
pub fn admit(draft: &DependentDraft, today: NaiveDate) -> Result<Dependent, DependentError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(DependentError::MissingField(Field::DependentName));
    }
    if draft.birth_date.trim().is_empty() {
        return Err(DependentError::MissingField(Field::DependentBirthDate));
    }
    let relationship = draft
        .relationship
        .ok_or(DependentError::MissingField(Field::DependentRelationship))?;

    let birth = format::parse_date(&draft.birth_date)
        .ok_or_else(|| DependentError::InvalidBirthDate(draft.birth_date.clone()))?;
    let age = format::age_on(birth, today).ok_or(DependentError::BornInFuture)?;
    check_age(relationship, age)?;

    info!(relationship = ?relationship, age, "dependent admitted");
    Ok(Dependent {
        id: id::dependent_id(),
        name: name.to_string(),
        birth_date: birth.format("%Y-%m-%d").to_string(),
        relationship,
        profile_picture: draft.profile_picture.clone(),
        cpf_document: draft.cpf_document.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn draft(relationship: Relationship, age: u32) -> DependentDraft {
        let birth = today().checked_sub_months(Months::new(age * 12)).unwrap();
        DependentDraft {
            name: "José Santos".into(),
            birth_date: birth.format("%Y-%m-%d").to_string(),
            relationship: Some(relationship),
            ..Default::default()
        }
    }

    #[test]
    fn child_limit_is_twenty_four() {
        assert!(admit(&draft(Relationship::Child, 24), today()).is_ok());
        assert_eq!(
            admit(&draft(Relationship::Child, 25), today()),
            Err(DependentError::TooOld {
                relationship: Relationship::Child,
                max: 24,
                age: 25
            })
        );
    }

    #[test]
    fn elders_must_be_sixty_five() {
        for relationship in [Relationship::Grandparent, Relationship::ParentInLaw] {
            assert!(admit(&draft(relationship, 65), today()).is_ok());
            assert!(matches!(
                admit(&draft(relationship, 64), today()),
                Err(DependentError::TooYoung { min: 65, age: 64, .. })
            ));
        }
    }

    #[test]
    fn birthday_not_reached_yet_counts_as_younger() {
        let mut d = draft(Relationship::Child, 25);
        // one day short of the 25th birthday
        d.birth_date = "2000-03-11".into();
        assert!(admit(&d, today()).is_ok());
    }

    #[test]
    fn spouse_and_parent_have_no_bounds() {
        assert!(admit(&draft(Relationship::Spouse, 90), today()).is_ok());
        assert!(admit(&draft(Relationship::Parent, 30), today()).is_ok());
        assert!(admit(&draft(Relationship::Stepchild, 40), today()).is_ok());
    }

    #[test]
    fn incomplete_or_invalid_drafts_are_rejected() {
        let mut d = draft(Relationship::Spouse, 30);
        d.name = "  ".into();
        assert_eq!(
            admit(&d, today()),
            Err(DependentError::MissingField(Field::DependentName))
        );

        let mut d = draft(Relationship::Spouse, 30);
        d.relationship = None;
        assert_eq!(
            admit(&d, today()),
            Err(DependentError::MissingField(Field::DependentRelationship))
        );

        let mut d = draft(Relationship::Spouse, 30);
        d.birth_date = "2030-01-01".into();
        assert_eq!(admit(&d, today()), Err(DependentError::BornInFuture));

        d.birth_date = "not a date".into();
        assert!(matches!(
            admit(&d, today()),
            Err(DependentError::InvalidBirthDate(_))
        ));
    }

    #[test]
    fn admitted_dependent_keeps_documents() {
        let mut d = draft(Relationship::Child, 10);
        d.cpf_document = Some("data:image/jpeg;base64,AA==".into());
        let dependent = admit(&d, today()).unwrap();
        assert_eq!(dependent.name, "José Santos");
        assert_eq!(dependent.cpf_document, d.cpf_document);
        assert_eq!(dependent.id.len(), crate::id::ID_LEN);
    }
}
