//! Step and sub-step navigation for the application wizard.
//!
//! The wizard has five top-level steps. Step 2 (household) and step 3 (residence and
//! income) walk their own short sequences of sub-steps before the top-level step may
//! advance; step 1 toggles between choosing a property and editing the applicant.

mod gates;
mod machine;
mod position;

pub use gates::{GateBlock, MAX_EMERGENCY_CONTACTS, MIN_EMERGENCY_CONTACTS};
pub use machine::{StepMachine, Transition};
pub use position::{OccupantSubStep, ResidenceSubStep, Screen, WizardPosition, WizardStep};
