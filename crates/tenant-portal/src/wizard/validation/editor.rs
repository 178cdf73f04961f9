use crate::wizard::domain::{ResidencyType, Residence};

use super::{FieldErrors, FormValidator, RuleSet};

/// A record being edited in a leaf form, with its validation state.
#[derive(Debug)]
pub struct RecordEditor<T> {
    draft: T,
    validator: FormValidator<T>,
}

impl<T> RecordEditor<T> {
    pub fn new(draft: T, rules: RuleSet<T>) -> Self {
        Self {
            draft,
            validator: FormValidator::new(rules),
        }
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn validator(&self) -> &FormValidator<T> {
        &self.validator
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.validator.error(field)
    }

    /// Apply a change to `field` and re-validate it if already touched.
    pub fn edit<F>(&mut self, field: &str, change: F)
    where
        F: FnOnce(&mut T),
    {
        change(&mut self.draft);
        self.validator.change(field, &self.draft);
    }

    pub fn blur(&mut self, field: &str) {
        self.validator.blur(field, &self.draft);
    }

    /// Validate everything and hand back the record when it passes.
    pub fn finish(mut self) -> Result<T, (Self, FieldErrors)> {
        if self.validator.validate_all(&self.draft) {
            Ok(self.draft)
        } else {
            let errors = self.validator.errors();
            Err((self, errors))
        }
    }
}

impl RecordEditor<Residence> {
    /// Switching to `Own` drops any entered move-out date along with its error.
    pub fn set_residency_type(&mut self, residency_type: ResidencyType) {
        self.draft.set_residency_type(residency_type);
        if residency_type == ResidencyType::Own {
            self.validator.clear_field("moveOutDate");
        }
        self.validator.change("residencyType", &self.draft);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::domain::{form_date, Pet};
    use crate::wizard::validation::rules::{pet_rules, residence_rules};

    #[test]
    fn finish_returns_record_when_valid() {
        let mut editor = RecordEditor::new(Pet::default(), pet_rules());
        editor.edit("petType", |pet| pet.pet_type = "Dog".to_string());
        editor.edit("name", |pet| pet.name = "Biscuit".to_string());
        editor.edit("weight", |pet| pet.weight = "25-50 lbs".to_string());
        editor.edit("breed", |pet| pet.breed = "Beagle".to_string());

        let pet = editor.finish().expect("complete pet");
        assert_eq!(pet.name, "Biscuit");
    }

    #[test]
    fn finish_reports_every_missing_field() {
        let editor = RecordEditor::new(Pet::default(), pet_rules());
        let (editor, errors) = editor.finish().expect_err("empty pet");
        assert_eq!(errors.len(), 4);
        assert_eq!(editor.error("breed"), Some("Breed is required"));
    }

    #[test]
    fn switching_to_own_clears_move_out_date_and_error() {
        let mut editor = RecordEditor::new(Residence::default(), residence_rules());
        editor.edit("moveOutDate", |r| r.move_out_date = form_date(2023, 8, 31));
        editor.edit("moveInDate", |r| r.move_in_date = form_date(2024, 1, 1));
        editor.blur("moveOutDate");
        assert_eq!(
            editor.error("moveOutDate"),
            Some("Move-out date must be after the move-in date")
        );

        editor.set_residency_type(ResidencyType::Own);

        assert_eq!(editor.draft().move_out_date, None);
        assert_eq!(editor.error("moveOutDate"), None);
        assert_eq!(editor.draft().residency_type, ResidencyType::Own);
    }
}
