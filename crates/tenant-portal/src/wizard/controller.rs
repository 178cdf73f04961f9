use std::sync::Arc;

use tracing::{debug, info, warn};

use super::domain::{
    ApplicationFormData, DocumentMetadata, EmergencyContact, FileHandle, FormField,
};
use super::draft::{DraftCodec, DraftStorage, LoadedDraft};
use super::guard::{is_dirty, ConfirmRequest, Confirmer, DirtyGuard};
use super::navigation::{GateBlock, Screen, StepMachine, Transition, WizardPosition, WizardStep};
use super::store::{FormStore, SubscriptionId};
use super::submission::{
    ApplicationGateway, ApplicationReceipt, LeaseDirectory, SubmissionFailure,
};

/// Where a navigation control left the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    Moved(Screen),
    /// Nothing changed, e.g. the user declined a confirmation.
    Stayed,
    /// "Next" on the documents step; call [`WizardController::submit`].
    ReadyToSubmit,
    /// The application was discarded and the wizard should be left.
    Exited,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("document `{name}` is empty")]
    Empty { name: String },
    #[error("no document at position {index} ({count} attached)")]
    NotFound { index: usize, count: usize },
}

/// Documents named in a restored draft whose file contents did not survive the reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ReuploadNotice {
    names: Vec<String>,
    dismissed: bool,
}

/// Drives the application wizard over its lifetime: mount, edit, navigate, submit, tear down.
///
/// Every mutation funnels through a single commit step, so the persisted draft always
/// matches the store once a call returns.
pub struct WizardController<S, L, G> {
    store: FormStore,
    codec: DraftCodec<S>,
    leases: Arc<L>,
    applications: Arc<G>,
    guard: DirtyGuard,
    reupload: ReuploadNotice,
    submission_errors: Vec<String>,
    confirmation: Option<ApplicationReceipt>,
    draft_written: bool,
}

impl<S, L, G> WizardController<S, L, G>
where
    S: DraftStorage,
    L: LeaseDirectory,
    G: ApplicationGateway,
{
    /// Build the controller, resuming the saved draft when one can be read.
    pub fn mount(codec: DraftCodec<S>, leases: Arc<L>, applications: Arc<G>) -> Self {
        let mut controller = Self {
            store: FormStore::new(),
            codec,
            leases,
            applications,
            guard: DirtyGuard::new(),
            reupload: ReuploadNotice::default(),
            submission_errors: Vec::new(),
            confirmation: None,
            draft_written: false,
        };

        match controller.codec.load() {
            Some(draft) => controller.restore(draft),
            None => debug!(key = %controller.codec.key(), "no application draft to resume"),
        }
        controller
    }

    fn restore(&mut self, draft: LoadedDraft) {
        let LoadedDraft {
            mut form_data,
            position,
            needs_document_reupload,
            pending_reupload,
            saved_at,
        } = draft;

        if needs_document_reupload {
            form_data.documents.clear();
            self.reupload.names = pending_reupload;
        }

        self.store.hydrate(form_data, position);
        self.draft_written = true;
        self.guard.sync(is_dirty(self.store.form_data()));

        info!(
            screen = %position.screen(),
            saved_at = ?saved_at,
            reupload = self.reupload.names.len(),
            "resumed application draft"
        );
    }

    pub fn form(&self) -> &ApplicationFormData {
        self.store.form_data()
    }

    pub fn position(&self) -> &WizardPosition {
        self.store.position()
    }

    pub fn screen(&self) -> Screen {
        self.store.position().screen()
    }

    pub fn store(&self) -> &FormStore {
        &self.store
    }

    pub fn codec(&self) -> &DraftCodec<S> {
        &self.codec
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ApplicationFormData, &WizardPosition) + Send + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn is_dirty(&self) -> bool {
        is_dirty(self.store.form_data())
    }

    /// The "Cancel Application" control is only offered once there is something to lose.
    pub fn can_cancel(&self) -> bool {
        self.is_dirty()
    }

    pub fn unload_warning(&self) -> Option<&'static str> {
        self.guard.unload_warning()
    }

    /// File names to re-upload, shown only on the documents step until dismissed.
    pub fn reupload_banner(&self) -> Option<&[String]> {
        let visible = self.store.position().step == WizardStep::Documents
            && !self.reupload.dismissed
            && !self.reupload.names.is_empty();
        visible.then_some(self.reupload.names.as_slice())
    }

    pub fn dismiss_reupload_banner(&mut self) {
        self.reupload.dismissed = true;
    }

    /// Messages for the submission error modal. Empty when the modal is closed.
    pub fn error_messages(&self) -> &[String] {
        &self.submission_errors
    }

    pub fn dismiss_errors(&mut self) {
        self.submission_errors.clear();
    }

    pub fn confirmation(&self) -> Option<&ApplicationReceipt> {
        self.confirmation.as_ref()
    }

    pub fn dismiss_confirmation(&mut self) {
        self.confirmation = None;
    }

    pub fn check_advance(&self) -> Result<(), GateBlock> {
        StepMachine::check_advance(self.store.position(), self.store.form_data())
    }

    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    pub fn can_add_emergency_contact(&self) -> bool {
        StepMachine::can_add_emergency_contact(self.store.form_data())
    }

    /// Arbitrary edit of the form, for leaf forms that commit whole records.
    pub fn edit<F>(&mut self, updater: F)
    where
        F: FnOnce(&mut ApplicationFormData),
    {
        self.store.update_form_data(updater);
        self.commit();
    }

    pub fn update_field(&mut self, field: FormField) {
        self.store.update_field(field);
        self.commit();
    }

    /// Choose the property (and optionally unit) and move on to applicant details.
    pub fn select_property(&mut self, property_id: impl Into<String>, unit_id: Option<String>) {
        let property_id = property_id.into();
        debug!(%property_id, unit_id = ?unit_id, "property selected");
        self.store.update_form_data(|form| {
            form.property_id = property_id;
            form.unit_id = unit_id.unwrap_or_default();
        });
        if self.store.position().step == WizardStep::PropertyAndApplicant {
            self.store.set_property_selected(true);
        }
        self.commit();
    }

    pub fn add_emergency_contact(&mut self, contact: EmergencyContact) -> Result<(), GateBlock> {
        StepMachine::check_add_emergency_contact(self.store.form_data())?;
        self.store
            .update_form_data(|form| form.emergency_contacts.push(contact));
        self.commit();
        Ok(())
    }

    pub fn remove_emergency_contact(&mut self, index: usize) -> Option<EmergencyContact> {
        if index >= self.store.form_data().emergency_contacts.len() {
            return None;
        }
        let mut removed = None;
        self.store
            .update_form_data(|form| removed = Some(form.emergency_contacts.remove(index)));
        self.commit();
        removed
    }

    /// Attach a document. Re-attaching a file named in the re-upload notice settles it.
    pub fn attach_document(&mut self, file: FileHandle) -> Result<(), DocumentError> {
        if file.contents.is_empty() {
            return Err(DocumentError::Empty { name: file.name });
        }
        self.reupload.names.retain(|name| *name != file.name);
        debug!(name = %file.name, mime = %file.mime, bytes = file.size(), "document attached");
        self.store.update_form_data(|form| form.push_document(file));
        self.commit();
        Ok(())
    }

    pub fn remove_document(&mut self, index: usize) -> Result<DocumentMetadata, DocumentError> {
        let count = self.store.form_data().documents.len();
        if index >= count {
            return Err(DocumentError::NotFound { index, count });
        }
        let mut removed = None;
        self.store
            .update_form_data(|form| removed = form.remove_document(index));
        self.commit();
        removed.ok_or(DocumentError::NotFound { index, count })
    }

    pub fn set_applicant_photo(&mut self, photo: Option<FileHandle>) {
        self.store.update_form_data(|form| form.photo_file = photo);
        self.commit();
    }

    /// "Next": blocked by the current screen's record-count gate.
    pub fn next(&mut self) -> Result<NavigationOutcome, GateBlock> {
        self.check_advance()?;
        let outcome = match StepMachine::next(self.store.position()) {
            Transition::Moved(position) => self.move_to(position),
            Transition::Submit => NavigationOutcome::ReadyToSubmit,
            Transition::Abandon => NavigationOutcome::Stayed,
        };
        Ok(outcome)
    }

    /// "Back": on the first step this abandons the application, after confirmation when
    /// there is anything to lose.
    pub fn back<C>(&mut self, confirmer: &C) -> NavigationOutcome
    where
        C: Confirmer + ?Sized,
    {
        match StepMachine::back(self.store.position()) {
            Transition::Moved(position) => self.move_to(position),
            Transition::Abandon => self.discard(ConfirmRequest::AbandonApplication, confirmer),
            Transition::Submit => NavigationOutcome::Stayed,
        }
    }

    pub fn cancel<C>(&mut self, confirmer: &C) -> NavigationOutcome
    where
        C: Confirmer + ?Sized,
    {
        self.discard(ConfirmRequest::CancelApplication, confirmer)
    }

    /// Resolve the lease and create the application. The form is only reset once the
    /// service has accepted it; any failure leaves every entered value in place.
    pub async fn submit(&mut self) -> Result<ApplicationReceipt, SubmissionFailure> {
        self.submission_errors.clear();
        let property_id = self.store.form_data().property_id.clone();
        info!(%property_id, "submitting application");

        match self.try_submit().await {
            Ok(receipt) => {
                info!(
                    application_id = %receipt.application_id,
                    lease_id = %receipt.lease_id.0,
                    "application submitted"
                );
                self.teardown();
                self.confirmation = Some(receipt.clone());
                Ok(receipt)
            }
            Err(failure) => {
                warn!(
                    %property_id,
                    problems = failure.messages().len(),
                    error = %failure,
                    "application submission failed"
                );
                self.submission_errors = failure.messages().to_vec();
                Err(failure)
            }
        }
    }

    async fn try_submit(&self) -> Result<ApplicationReceipt, SubmissionFailure> {
        if self.store.position().step != WizardStep::Documents {
            return Err(SubmissionFailure::single(
                "Complete every step before submitting the application.",
            ));
        }
        let form = self.store.form_data();
        if form.property_id.trim().is_empty() {
            return Err(SubmissionFailure::single(
                "Select a property before submitting the application.",
            ));
        }

        let lease = self
            .leases
            .lease_for_property(&form.property_id)
            .await?
            .ok_or_else(|| {
                SubmissionFailure::single(format!(
                    "No lease found for property {}. Please contact the leasing office.",
                    form.property_id
                ))
            })?;

        Ok(self.applications.create_application(form, &lease.id).await?)
    }

    fn move_to(&mut self, position: WizardPosition) -> NavigationOutcome {
        let from = self.screen();
        self.store.set_position(position);
        self.commit();
        debug!(%from, to = %position.screen(), "wizard moved");
        NavigationOutcome::Moved(position.screen())
    }

    fn discard<C>(&mut self, request: ConfirmRequest, confirmer: &C) -> NavigationOutcome
    where
        C: Confirmer + ?Sized,
    {
        if self.is_dirty() && !confirmer.confirm(request) {
            debug!(?request, "discard declined");
            return NavigationOutcome::Stayed;
        }
        info!(?request, "application discarded");
        self.teardown();
        NavigationOutcome::Exited
    }

    fn teardown(&mut self) {
        self.store.reset();
        self.codec.clear();
        self.draft_written = false;
        self.guard.sync(false);
        self.reupload = ReuploadNotice::default();
        self.submission_errors.clear();
    }

    /// Outstanding re-upload names travel with the draft until the files are attached again.
    fn commit(&mut self) {
        let dirty = is_dirty(self.store.form_data());
        self.guard.sync(dirty);
        if dirty || !self.reupload.names.is_empty() {
            if self.codec.persist_with_reupload(
                self.store.form_data(),
                self.store.position(),
                &self.reupload.names,
            ) {
                self.draft_written = true;
            }
        } else if self.draft_written {
            self.codec.clear();
            self.draft_written = false;
        }
    }
}
