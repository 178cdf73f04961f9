//! Field validation shared by every leaf form of the wizard.
//!
//! A [`RuleSet`] maps field names to validators; a [`FormValidator`] layers the
//! touched/blur bookkeeping on top so errors only show for fields the user has visited.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

mod editor;
pub mod rules;

pub use editor::RecordEditor;

type Validator<T> = Box<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Ordered field validators for a record type.
pub struct RuleSet<T> {
    rules: Vec<(&'static str, Validator<T>)>,
}

impl<T> RuleSet<T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add a validator for `field`. A field may carry several; the first failure wins.
    pub fn field<F>(mut self, field: &'static str, validator: F) -> Self
    where
        F: Fn(&T) -> Option<String> + Send + Sync + 'static,
    {
        self.rules.push((field, Box::new(validator)));
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        let mut seen = BTreeSet::new();
        self.rules
            .iter()
            .map(|(field, _)| *field)
            .filter(move |field| seen.insert(*field))
    }

    pub fn check_field(&self, field: &str, value: &T) -> Option<String> {
        self.rules
            .iter()
            .filter(|(name, _)| *name == field)
            .find_map(|(_, validator)| validator(value))
    }

    pub fn check(&self, value: &T) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for field in self.fields() {
            if let Some(message) = self.check_field(field, value) {
                errors.0.insert(field, message);
            }
        }
        errors
    }
}

impl<T> Default for RuleSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RuleSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.fields()).finish()
    }
}

/// Field name to message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for FieldErrors {}

/// Touched/error state for one form instance.
#[derive(Debug)]
pub struct FormValidator<T> {
    rules: RuleSet<T>,
    touched: BTreeSet<&'static str>,
    errors: BTreeMap<&'static str, String>,
}

impl<T> FormValidator<T> {
    pub fn new(rules: RuleSet<T>) -> Self {
        Self {
            rules,
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    /// The user left `field`: mark it touched and validate it.
    pub fn blur(&mut self, field: &str, value: &T) {
        if let Some(field) = self.known(field) {
            self.touched.insert(field);
            self.revalidate(field, value);
        }
    }

    /// The value changed: re-validate only if the field was already touched.
    pub fn change(&mut self, field: &str, value: &T) {
        if let Some(field) = self.known(field) {
            if self.touched.contains(field) {
                self.revalidate(field, value);
            }
        }
    }

    /// Submit-time check: touches every field. Returns true when nothing failed.
    pub fn validate_all(&mut self, value: &T) -> bool {
        let fields: Vec<&'static str> = self.rules.fields().collect();
        for field in fields {
            self.touched.insert(field);
            self.revalidate(field, value);
        }
        self.errors.is_empty()
    }

    pub fn clear_field(&mut self, field: &str) {
        self.errors.remove(field);
        self.touched.remove(field);
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    pub fn errors(&self) -> FieldErrors {
        FieldErrors(self.errors.clone())
    }

    pub fn reset(&mut self) {
        self.touched.clear();
        self.errors.clear();
    }

    fn known(&self, field: &str) -> Option<&'static str> {
        self.rules.fields().find(|known| *known == field)
    }

    fn revalidate(&mut self, field: &'static str, value: &T) {
        match self.rules.check_field(field, value) {
            Some(message) => {
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }
}
