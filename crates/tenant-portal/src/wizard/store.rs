use super::domain::{ApplicationFormData, FormField};
use super::navigation::{OccupantSubStep, ResidenceSubStep, WizardPosition, WizardStep};

/// Handle returned by [`FormStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&ApplicationFormData, &WizardPosition) + Send>;

/// Single source of truth for the wizard: form data plus navigation position.
///
/// Mutations apply synchronously and notify subscribers before returning.
pub struct FormStore {
    form_data: ApplicationFormData,
    position: WizardPosition,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl FormStore {
    pub fn new() -> Self {
        Self {
            form_data: ApplicationFormData::default(),
            position: WizardPosition::initial(),
            listeners: Vec::new(),
            next_subscription: 1,
        }
    }

    pub fn form_data(&self) -> &ApplicationFormData {
        &self.form_data
    }

    pub fn position(&self) -> &WizardPosition {
        &self.position
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&ApplicationFormData, &WizardPosition) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn set_form_data(&mut self, form_data: ApplicationFormData) {
        self.form_data = form_data;
        self.notify();
    }

    /// Updater form of [`FormStore::set_form_data`].
    pub fn update_form_data<F>(&mut self, updater: F)
    where
        F: FnOnce(&mut ApplicationFormData),
    {
        updater(&mut self.form_data);
        self.notify();
    }

    pub fn update_field(&mut self, field: FormField) {
        field.apply(&mut self.form_data);
        self.notify();
    }

    pub fn set_step(&mut self, step: WizardStep) {
        self.position = self.position.with_step(step);
        self.notify();
    }

    pub fn set_occupant_sub_step(&mut self, sub_step: OccupantSubStep) {
        self.position.occupant_sub_step = Some(sub_step);
        self.notify();
    }

    pub fn set_residence_sub_step(&mut self, sub_step: ResidenceSubStep) {
        self.position.residence_sub_step = Some(sub_step);
        self.notify();
    }

    pub fn set_property_selected(&mut self, selected: bool) {
        self.position.is_property_selected = selected;
        self.notify();
    }

    pub fn set_position(&mut self, position: WizardPosition) {
        self.position = position;
        self.notify();
    }

    /// Replace form data and position together, notifying once.
    pub fn hydrate(&mut self, form_data: ApplicationFormData, position: WizardPosition) {
        self.form_data = form_data;
        self.position = position;
        self.notify();
    }

    /// Restore the initial form and position together, notifying once.
    pub fn reset(&mut self) {
        self.hydrate(ApplicationFormData::default(), WizardPosition::initial());
    }

    fn notify(&mut self) {
        let form_data = &self.form_data;
        let position = &self.position;
        for (_, listener) in self.listeners.iter_mut() {
            listener(form_data, position);
        }
    }
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStore")
            .field("form_data", &self.form_data)
            .field("position", &self.position)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
