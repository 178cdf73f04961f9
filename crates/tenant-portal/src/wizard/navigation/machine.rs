use crate::wizard::domain::ApplicationFormData;

use super::gates::{self, GateBlock};
use super::position::{OccupantSubStep, ResidenceSubStep, WizardPosition, WizardStep};

/// Result of asking the machine where a navigation control leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved(WizardPosition),
    /// "Next" on the final step: hand the form to the submission collaborators.
    Submit,
    /// "Back" on the first step: the whole application is abandoned.
    Abandon,
}

/// Pure transition rules over [`WizardPosition`].
pub struct StepMachine;

impl StepMachine {
    /// Forward transition. Entering a step with sub-steps always starts at its first one.
    pub fn next(position: &WizardPosition) -> Transition {
        let mut next = *position;
        match position.step {
            WizardStep::PropertyAndApplicant if !position.is_property_selected => {
                next.is_property_selected = true;
            }
            WizardStep::PropertyAndApplicant => {
                next.occupant_sub_step = None;
                next = next.with_step(WizardStep::Household);
            }
            WizardStep::Household => {
                let current = position.occupant_sub_step.unwrap_or(OccupantSubStep::FIRST);
                match current.next() {
                    Some(sub_step) => next.occupant_sub_step = Some(sub_step),
                    None => {
                        next.last_occupant_sub_step = Some(current);
                        next.residence_sub_step = None;
                        next = next.with_step(WizardStep::ResidenceAndIncome);
                    }
                }
            }
            WizardStep::ResidenceAndIncome => {
                let current = position
                    .residence_sub_step
                    .unwrap_or(ResidenceSubStep::FIRST);
                match current.next() {
                    Some(sub_step) => next.residence_sub_step = Some(sub_step),
                    None => {
                        next.last_residence_sub_step = Some(current);
                        next = next.with_step(WizardStep::EmergencyContacts);
                    }
                }
            }
            WizardStep::EmergencyContacts => {
                next = next.with_step(WizardStep::Documents);
            }
            WizardStep::Documents => return Transition::Submit,
        }
        Transition::Moved(next)
    }

    /// Backward transition. Re-entering a step with sub-steps restores the sub-step it was
    /// last left on instead of restarting the sequence.
    pub fn back(position: &WizardPosition) -> Transition {
        let mut previous = *position;
        match position.step {
            WizardStep::PropertyAndApplicant => return Transition::Abandon,
            WizardStep::Household => {
                let current = position.occupant_sub_step.unwrap_or(OccupantSubStep::FIRST);
                match current.previous() {
                    Some(sub_step) => previous.occupant_sub_step = Some(sub_step),
                    None => previous = previous.with_step(WizardStep::PropertyAndApplicant),
                }
            }
            WizardStep::ResidenceAndIncome => {
                let current = position
                    .residence_sub_step
                    .unwrap_or(ResidenceSubStep::FIRST);
                match current.previous() {
                    Some(sub_step) => previous.residence_sub_step = Some(sub_step),
                    None => {
                        previous.occupant_sub_step = Some(
                            position
                                .last_occupant_sub_step
                                .unwrap_or(OccupantSubStep::LAST),
                        );
                        previous = previous.with_step(WizardStep::Household);
                    }
                }
            }
            WizardStep::EmergencyContacts => {
                previous.residence_sub_step = Some(
                    position
                        .last_residence_sub_step
                        .unwrap_or(ResidenceSubStep::LAST),
                );
                previous = previous.with_step(WizardStep::ResidenceAndIncome);
            }
            WizardStep::Documents => {
                previous = previous.with_step(WizardStep::EmergencyContacts);
            }
        }
        Transition::Moved(previous)
    }

    /// Record-count gates that must hold before [`StepMachine::next`] may be taken.
    pub fn check_advance(
        position: &WizardPosition,
        form: &ApplicationFormData,
    ) -> Result<(), GateBlock> {
        gates::check_advance(position, form)
    }

    pub fn check_add_emergency_contact(form: &ApplicationFormData) -> Result<(), GateBlock> {
        gates::check_add_emergency_contact(form)
    }

    pub fn can_add_emergency_contact(form: &ApplicationFormData) -> bool {
        Self::check_add_emergency_contact(form).is_ok()
    }
}
