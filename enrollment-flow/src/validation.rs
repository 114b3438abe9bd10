use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use crate::format;
use crate::model::Field;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Field-scoped validation messages, ordered by field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// Only the errors for fields the user has already left
    pub fn visible(&self, touched: &HashSet<Field>) -> FieldErrors {
        FieldErrors(
            self.0
                .iter()
                .filter(|(field, _)| touched.contains(field))
                .map(|(field, message)| (*field, message.clone()))
                .collect(),
        )
    }
}

/// Records a "required" error when `value` is blank
pub fn require(errors: &mut FieldErrors, field: Field, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.insert(field, format!("{} is required.", capitalize(field.label())));
        false
    } else {
        true
    }
}

/// Required date that must also be a real calendar date
pub fn require_date(errors: &mut FieldErrors, field: Field, value: &str) {
    if require(errors, field, value) && format::parse_date(value).is_none() {
        errors.insert(field, format!("Invalid {}.", field.label()));
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) if first.is_lowercase() => first.to_uppercase().chain(chars).collect(),
        Some(first) => std::iter::once(first).chain(chars).collect(),
        None => String::new(),
    }
}
