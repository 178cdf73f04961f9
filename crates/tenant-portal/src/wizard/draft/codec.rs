use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::wizard::domain::ApplicationFormData;
use crate::wizard::navigation::{OccupantSubStep, ResidenceSubStep, WizardPosition, WizardStep};

use super::rehydrate::{rehydrate_dates, RehydrateError};
use super::storage::{DraftStorage, StorageError};

pub const DEFAULT_DRAFT_KEY: &str = "application-draft";

/// Persisted layout of an in-progress application.
///
/// The sub-step fields extend the base `{formData, currentStep, isPropertySelected,
/// timestamp}` layout; drafts written without them resume on the step's first sub-step.
/// `pendingReupload` names documents whose contents were lost in an earlier reload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDraft {
    pub form_data: ApplicationFormData,
    pub current_step: WizardStep,
    pub is_property_selected: bool,
    #[serde(default)]
    pub occupant_sub_step: Option<OccupantSubStep>,
    #[serde(default)]
    pub residence_sub_step: Option<ResidenceSubStep>,
    #[serde(default)]
    pub last_occupant_sub_step: Option<OccupantSubStep>,
    #[serde(default)]
    pub last_residence_sub_step: Option<ResidenceSubStep>,
    #[serde(default)]
    pub pending_reupload: Vec<String>,
    /// Unix epoch milliseconds at write time.
    pub timestamp: i64,
}

impl PersistedDraft {
    pub fn position(&self) -> WizardPosition {
        WizardPosition {
            step: self.current_step,
            occupant_sub_step: self.occupant_sub_step,
            residence_sub_step: self.residence_sub_step,
            is_property_selected: self.is_property_selected,
            last_occupant_sub_step: self.last_occupant_sub_step,
            last_residence_sub_step: self.last_residence_sub_step,
        }
        .with_step(self.current_step)
    }

    /// Serialise the live form and position. Live file handles are left out.
    pub fn encode(
        form_data: &ApplicationFormData,
        position: &WizardPosition,
        pending_reupload: &[String],
        timestamp: i64,
    ) -> Result<String, DraftError> {
        let snapshot = DraftSnapshot {
            form_data,
            current_step: position.step,
            is_property_selected: position.is_property_selected,
            occupant_sub_step: position.occupant_sub_step,
            residence_sub_step: position.residence_sub_step,
            last_occupant_sub_step: position.last_occupant_sub_step,
            last_residence_sub_step: position.last_residence_sub_step,
            pending_reupload,
            timestamp,
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    /// Parse persisted text, rehydrating date fields before the typed read.
    pub fn decode(raw: &str) -> Result<Self, DraftError> {
        let parsed: serde_json::Value = serde_json::from_str(raw)?;
        let rehydrated = rehydrate_dates(parsed)?;
        Ok(serde_json::from_value(rehydrated)?)
    }

    fn into_loaded(self) -> LoadedDraft {
        let position = self.position();
        let saved_at = Utc.timestamp_millis_opt(self.timestamp).single();
        let mut form_data = self.form_data;
        form_data.release_file_handles();

        let mut pending_reupload = self.pending_reupload;
        for document in &form_data.documents {
            if !pending_reupload.contains(&document.name) {
                pending_reupload.push(document.name.clone());
            }
        }
        LoadedDraft {
            needs_document_reupload: !pending_reupload.is_empty(),
            pending_reupload,
            form_data,
            position,
            saved_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftSnapshot<'a> {
    form_data: &'a ApplicationFormData,
    current_step: WizardStep,
    is_property_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    occupant_sub_step: Option<OccupantSubStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    residence_sub_step: Option<ResidenceSubStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_occupant_sub_step: Option<OccupantSubStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_residence_sub_step: Option<ResidenceSubStep>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pending_reupload: &'a [String],
    timestamp: i64,
}

/// A draft recovered from storage, ready to hydrate the form store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDraft {
    pub form_data: ApplicationFormData,
    pub position: WizardPosition,
    /// Document metadata survived but the file contents did not.
    pub needs_document_reupload: bool,
    /// Names of every document to upload again, carried-over entries first.
    pub pending_reupload: Vec<String>,
    pub saved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("draft is not valid JSON for this form: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Dates(#[from] RehydrateError),
}

/// Reads and writes the persisted draft under a single storage key.
#[derive(Debug, Clone)]
pub struct DraftCodec<S> {
    storage: S,
    key: String,
}

impl<S> DraftCodec<S>
where
    S: DraftStorage,
{
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_DRAFT_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write the draft, logging instead of failing. Returns whether the write landed.
    pub fn persist(&self, form_data: &ApplicationFormData, position: &WizardPosition) -> bool {
        self.persist_with_reupload(form_data, position, &[])
    }

    pub fn try_persist(
        &self,
        form_data: &ApplicationFormData,
        position: &WizardPosition,
    ) -> Result<(), DraftError> {
        self.try_persist_with_reupload(form_data, position, &[])
    }

    /// Like [`persist`](Self::persist), also recording documents still owed a re-upload.
    pub fn persist_with_reupload(
        &self,
        form_data: &ApplicationFormData,
        position: &WizardPosition,
        pending_reupload: &[String],
    ) -> bool {
        match self.try_persist_with_reupload(form_data, position, pending_reupload) {
            Ok(()) => true,
            Err(err) => {
                warn!(key = %self.key, error = %err, "could not persist application draft");
                false
            }
        }
    }

    pub fn try_persist_with_reupload(
        &self,
        form_data: &ApplicationFormData,
        position: &WizardPosition,
        pending_reupload: &[String],
    ) -> Result<(), DraftError> {
        let text = PersistedDraft::encode(
            form_data,
            position,
            pending_reupload,
            Utc::now().timestamp_millis(),
        )?;
        self.storage.set(&self.key, &text)?;
        debug!(
            key = %self.key,
            bytes = text.len(),
            step = position.step.number(),
            "application draft persisted"
        );
        Ok(())
    }

    /// Recover the saved draft. Corrupt drafts are deleted and reported as absent.
    pub fn load(&self) -> Option<LoadedDraft> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                warn!(key = %self.key, error = %err, "draft storage unreadable; starting fresh");
                return None;
            }
        };

        match PersistedDraft::decode(&raw) {
            Ok(draft) => {
                let loaded = draft.into_loaded();
                info!(
                    key = %self.key,
                    step = loaded.position.step.number(),
                    documents = loaded.form_data.documents.len(),
                    reupload = loaded.pending_reupload.len(),
                    "application draft restored"
                );
                Some(loaded)
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "discarding corrupt application draft");
                self.clear();
                None
            }
        }
    }

    /// Delete the saved draft. Safe to call when none exists.
    pub fn clear(&self) {
        match self.storage.remove(&self.key) {
            Ok(()) => debug!(key = %self.key, "application draft cleared"),
            Err(err) => warn!(key = %self.key, error = %err, "could not clear application draft"),
        }
    }
}
