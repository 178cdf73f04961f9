use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level wizard step, persisted as its 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    PropertyAndApplicant,
    Household,
    ResidenceAndIncome,
    EmergencyContacts,
    Documents,
}

impl WizardStep {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::PropertyAndApplicant,
            Self::Household,
            Self::ResidenceAndIncome,
            Self::EmergencyContacts,
            Self::Documents,
        ]
    }

    pub const fn number(self) -> u8 {
        match self {
            Self::PropertyAndApplicant => 1,
            Self::Household => 2,
            Self::ResidenceAndIncome => 3,
            Self::EmergencyContacts => 4,
            Self::Documents => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PropertyAndApplicant => "Property & Applicant",
            Self::Household => "Occupants, Pets & Vehicles",
            Self::ResidenceAndIncome => "Residence & Income",
            Self::EmergencyContacts => "Emergency Contacts",
            Self::Documents => "Documents",
        }
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ordered()
            .into_iter()
            .find(|step| step.number() == value)
            .ok_or_else(|| format!("wizard step must be between 1 and 5, got {value}"))
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step {} ({})", self.number(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OccupantSubStep {
    Occupants,
    Pets,
    Vehicles,
}

impl OccupantSubStep {
    pub const FIRST: Self = Self::Occupants;
    pub const LAST: Self = Self::Vehicles;

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Occupants => Some(Self::Pets),
            Self::Pets => Some(Self::Vehicles),
            Self::Vehicles => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Occupants => None,
            Self::Pets => Some(Self::Occupants),
            Self::Vehicles => Some(Self::Pets),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResidenceSubStep {
    History,
    Additional,
    Income,
    AdditionalIncome,
}

impl ResidenceSubStep {
    pub const FIRST: Self = Self::History;
    pub const LAST: Self = Self::AdditionalIncome;

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::History => Some(Self::Additional),
            Self::Additional => Some(Self::Income),
            Self::Income => Some(Self::AdditionalIncome),
            Self::AdditionalIncome => None,
        }
    }

    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::History => None,
            Self::Additional => Some(Self::History),
            Self::Income => Some(Self::Additional),
            Self::AdditionalIncome => Some(Self::Income),
        }
    }
}

/// Where the user currently is in the wizard.
///
/// `occupant_sub_step` is only meaningful on step 2 and `residence_sub_step` only on
/// step 3. The `last_*` fields remember the sub-step each of those steps was left on so
/// that backing into the step lands where the user actually was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WizardPosition {
    pub step: WizardStep,
    pub occupant_sub_step: Option<OccupantSubStep>,
    pub residence_sub_step: Option<ResidenceSubStep>,
    pub is_property_selected: bool,
    pub last_occupant_sub_step: Option<OccupantSubStep>,
    pub last_residence_sub_step: Option<ResidenceSubStep>,
}

impl WizardPosition {
    pub const fn initial() -> Self {
        Self {
            step: WizardStep::PropertyAndApplicant,
            occupant_sub_step: None,
            residence_sub_step: None,
            is_property_selected: false,
            last_occupant_sub_step: None,
            last_residence_sub_step: None,
        }
    }

    /// Position landing on the first screen of `step`, as forward navigation would.
    pub fn entering(step: WizardStep) -> Self {
        Self::initial().with_step(step)
    }

    /// Move to `step`, filling in a missing sub-step with the step's first member and
    /// clearing sub-steps that do not belong to it.
    pub fn with_step(mut self, step: WizardStep) -> Self {
        self.step = step;
        if step != WizardStep::PropertyAndApplicant {
            self.is_property_selected = true;
        }
        self.occupant_sub_step = match step {
            WizardStep::Household => Some(self.occupant_sub_step.unwrap_or(OccupantSubStep::FIRST)),
            _ => None,
        };
        self.residence_sub_step = match step {
            WizardStep::ResidenceAndIncome => {
                Some(self.residence_sub_step.unwrap_or(ResidenceSubStep::FIRST))
            }
            _ => None,
        };
        self
    }

    pub fn screen(&self) -> Screen {
        match self.step {
            WizardStep::PropertyAndApplicant if !self.is_property_selected => {
                Screen::SelectProperty
            }
            WizardStep::PropertyAndApplicant => Screen::ApplicantInfo,
            WizardStep::Household => {
                match self.occupant_sub_step.unwrap_or(OccupantSubStep::FIRST) {
                    OccupantSubStep::Occupants => Screen::Occupants,
                    OccupantSubStep::Pets => Screen::Pets,
                    OccupantSubStep::Vehicles => Screen::Vehicles,
                }
            }
            WizardStep::ResidenceAndIncome => {
                match self.residence_sub_step.unwrap_or(ResidenceSubStep::FIRST) {
                    ResidenceSubStep::History => Screen::ResidenceHistory,
                    ResidenceSubStep::Additional => Screen::AdditionalResidenceInfo,
                    ResidenceSubStep::Income => Screen::Income,
                    ResidenceSubStep::AdditionalIncome => Screen::AdditionalIncomeInfo,
                }
            }
            WizardStep::EmergencyContacts => Screen::EmergencyContacts,
            WizardStep::Documents => Screen::Documents,
        }
    }
}

impl Default for WizardPosition {
    fn default() -> Self {
        Self::initial()
    }
}

/// Every screen the wizard can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    SelectProperty,
    ApplicantInfo,
    Occupants,
    Pets,
    Vehicles,
    ResidenceHistory,
    AdditionalResidenceInfo,
    Income,
    AdditionalIncomeInfo,
    EmergencyContacts,
    Documents,
}

impl Screen {
    pub const fn label(self) -> &'static str {
        match self {
            Screen::SelectProperty => "Select property",
            Screen::ApplicantInfo => "Applicant information",
            Screen::Occupants => "Occupants",
            Screen::Pets => "Pets",
            Screen::Vehicles => "Vehicles",
            Screen::ResidenceHistory => "Residence history",
            Screen::AdditionalResidenceInfo => "Additional residence information",
            Screen::Income => "Income",
            Screen::AdditionalIncomeInfo => "Additional income information",
            Screen::EmergencyContacts => "Emergency contacts",
            Screen::Documents => "Documents",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
