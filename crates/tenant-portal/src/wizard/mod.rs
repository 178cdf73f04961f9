//! Multi-step tenant application wizard.
//!
//! [`WizardController`] owns a [`store::FormStore`] and keeps it recoverable through a
//! [`draft::DraftCodec`]; [`navigation::StepMachine`] decides where each control leads and
//! [`guard`] protects entered data from accidental loss. Final submission goes to the
//! leasing and application collaborators in [`submission`].

pub mod controller;
pub mod domain;
pub mod draft;
pub mod guard;
pub mod navigation;
pub mod store;
pub mod submission;
pub mod validation;

#[cfg(test)]
mod tests;

pub use controller::{DocumentError, NavigationOutcome, WizardController};
pub use domain::{
    form_date, ApplicationFormData, DocumentMetadata, EmergencyContact, FileHandle, FormDate,
    FormField, Income, Occupant, Pet, RecordId, ResidencyType, Residence, Vehicle,
};
pub use draft::{
    DraftCodec, DraftError, DraftStorage, FileDraftStorage, LoadedDraft, MemoryDraftStorage,
    StorageError, DEFAULT_DRAFT_KEY,
};
pub use guard::{is_dirty, ConfirmRequest, Confirmer, DirtyGuard};
pub use navigation::{
    GateBlock, OccupantSubStep, ResidenceSubStep, Screen, StepMachine, Transition,
    WizardPosition, WizardStep,
};
pub use store::{FormStore, SubscriptionId};
pub use submission::{
    friendly_message, ApplicationGateway, ApplicationReceipt, GatewayError, Lease,
    LeaseDirectory, LeaseId, SubmissionFailure,
};
