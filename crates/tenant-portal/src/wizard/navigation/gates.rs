use crate::wizard::domain::ApplicationFormData;

use super::position::{Screen, WizardPosition};

pub const MIN_EMERGENCY_CONTACTS: usize = 1;
pub const MAX_EMERGENCY_CONTACTS: usize = 2;

/// Reason a forward transition or an add action is currently disabled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateBlock {
    #[error("select a property before continuing")]
    PropertyNotSelected,
    #[error("add at least one residence before continuing")]
    ResidenceRequired,
    #[error("add at least one income source before continuing")]
    IncomeRequired,
    #[error("add at least {min} emergency contact before continuing")]
    EmergencyContactRequired { min: usize },
    #[error("no more than {max} emergency contacts are allowed")]
    EmergencyContactLimit { max: usize },
}

pub(super) fn check_advance(
    position: &WizardPosition,
    form: &ApplicationFormData,
) -> Result<(), GateBlock> {
    match position.screen() {
        Screen::SelectProperty if form.property_id.trim().is_empty() => {
            Err(GateBlock::PropertyNotSelected)
        }
        Screen::ResidenceHistory if form.residences.is_empty() => {
            Err(GateBlock::ResidenceRequired)
        }
        Screen::Income if form.incomes.is_empty() => Err(GateBlock::IncomeRequired),
        Screen::EmergencyContacts => check_emergency_contacts(form),
        _ => Ok(()),
    }
}

fn check_emergency_contacts(form: &ApplicationFormData) -> Result<(), GateBlock> {
    let count = form.emergency_contacts.len();
    if count < MIN_EMERGENCY_CONTACTS {
        Err(GateBlock::EmergencyContactRequired {
            min: MIN_EMERGENCY_CONTACTS,
        })
    } else if count > MAX_EMERGENCY_CONTACTS {
        Err(GateBlock::EmergencyContactLimit {
            max: MAX_EMERGENCY_CONTACTS,
        })
    } else {
        Ok(())
    }
}

pub(super) fn check_add_emergency_contact(form: &ApplicationFormData) -> Result<(), GateBlock> {
    if form.emergency_contacts.len() >= MAX_EMERGENCY_CONTACTS {
        Err(GateBlock::EmergencyContactLimit {
            max: MAX_EMERGENCY_CONTACTS,
        })
    } else {
        Ok(())
    }
}

