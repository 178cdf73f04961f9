use std::collections::{HashMap, VecDeque};
use std::future::{ready, Future};
use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};

use crate::wizard::domain::{
    form_date, ApplicationFormData, EmergencyContact, FileHandle, Income, Occupant, Pet,
    Residence, ResidencyType,
};
use crate::wizard::draft::MemoryDraftStorage;
use crate::wizard::guard::{ConfirmRequest, Confirmer};
use crate::wizard::navigation::Screen;
use crate::wizard::submission::{
    ApplicationGateway, ApplicationReceipt, GatewayError, Lease, LeaseDirectory, LeaseId,
};
use crate::wizard::{DraftCodec, WizardController};

pub(super) type TestController = WizardController<MemoryDraftStorage, StaticLeases, ScriptedGateway>;

/// Lease lookup backed by a fixed map.
#[derive(Default)]
pub(super) struct StaticLeases {
    leases: HashMap<String, Lease>,
    lookups: Mutex<Vec<String>>,
}

impl StaticLeases {
    pub(super) fn with_lease(property_id: &str, lease_id: &str) -> Self {
        let mut leases = HashMap::new();
        leases.insert(
            property_id.to_string(),
            Lease {
                id: LeaseId(lease_id.to_string()),
                property_id: property_id.to_string(),
                unit_id: None,
            },
        );
        Self {
            leases,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookups mutex poisoned").clone()
    }
}

impl LeaseDirectory for StaticLeases {
    fn lease_for_property(
        &self,
        property_id: &str,
    ) -> impl Future<Output = Result<Option<Lease>, GatewayError>> + Send {
        self.lookups
            .lock()
            .expect("lookups mutex poisoned")
            .push(property_id.to_string());
        ready(Ok(self.leases.get(property_id).cloned()))
    }
}

/// Application service that replays queued responses, accepting once the queue is empty.
#[derive(Default)]
pub(super) struct ScriptedGateway {
    responses: Mutex<VecDeque<Result<ApplicationReceipt, GatewayError>>>,
    calls: Mutex<Vec<(ApplicationFormData, LeaseId)>>,
}

impl ScriptedGateway {
    pub(super) fn respond_with(&self, response: Result<ApplicationReceipt, GatewayError>) {
        self.responses
            .lock()
            .expect("responses mutex poisoned")
            .push_back(response);
    }

    pub(super) fn calls(&self) -> Vec<(ApplicationFormData, LeaseId)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl ApplicationGateway for ScriptedGateway {
    fn create_application(
        &self,
        form: &ApplicationFormData,
        lease_id: &LeaseId,
    ) -> impl Future<Output = Result<ApplicationReceipt, GatewayError>> + Send {
        let mut calls = self.calls.lock().expect("calls mutex poisoned");
        calls.push((form.clone(), lease_id.clone()));
        let sequence = calls.len();
        drop(calls);

        let response = self
            .responses
            .lock()
            .expect("responses mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Ok(ApplicationReceipt {
                    application_id: format!("app-{sequence:03}"),
                    lease_id: lease_id.clone(),
                })
            });
        ready(response)
    }
}

/// Confirmer that answers the same way every time and remembers what it was asked.
pub(super) struct RecordingConfirmer {
    answer: bool,
    asked: Mutex<Vec<ConfirmRequest>>,
}

impl RecordingConfirmer {
    pub(super) fn accepting() -> Self {
        Self::answering(true)
    }

    pub(super) fn declining() -> Self {
        Self::answering(false)
    }

    fn answering(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn asked(&self) -> Vec<ConfirmRequest> {
        self.asked.lock().expect("asked mutex poisoned").clone()
    }
}

impl Confirmer for RecordingConfirmer {
    fn confirm(&self, request: ConfirmRequest) -> bool {
        self.asked
            .lock()
            .expect("asked mutex poisoned")
            .push(request);
        self.answer
    }
}

pub(super) struct Harness {
    pub(super) controller: TestController,
    pub(super) storage: MemoryDraftStorage,
    pub(super) leases: Arc<StaticLeases>,
    pub(super) gateway: Arc<ScriptedGateway>,
}

pub(super) fn harness() -> Harness {
    harness_with(MemoryDraftStorage::new(), StaticLeases::with_lease("p1", "lease-1"))
}

pub(super) fn harness_with(storage: MemoryDraftStorage, leases: StaticLeases) -> Harness {
    let leases = Arc::new(leases);
    let gateway = Arc::new(ScriptedGateway::default());
    let controller = WizardController::mount(
        DraftCodec::new(storage.clone()),
        leases.clone(),
        gateway.clone(),
    );
    Harness {
        controller,
        storage,
        leases,
        gateway,
    }
}

/// Mount a second controller on the same storage, as a page reload would.
pub(super) fn reload(harness: &Harness) -> TestController {
    WizardController::mount(
        DraftCodec::new(harness.storage.clone()),
        harness.leases.clone(),
        harness.gateway.clone(),
    )
}

/// Walk forward until `target`, adding whatever records the gates on the way require.
pub(super) fn advance_to(controller: &mut TestController, target: Screen) {
    for _ in 0..16 {
        let screen = controller.screen();
        if screen == target {
            return;
        }
        match screen {
            Screen::SelectProperty => {
                controller.select_property("p1", None);
                continue;
            }
            Screen::ResidenceHistory if controller.form().residences.is_empty() => {
                controller.edit(|form| form.residences.push(residence()));
            }
            Screen::Income if controller.form().incomes.is_empty() => {
                controller.edit(|form| form.incomes.push(income()));
            }
            Screen::EmergencyContacts if controller.form().emergency_contacts.is_empty() => {
                controller
                    .add_emergency_contact(emergency_contact("Ruth"))
                    .expect("first contact allowed");
            }
            _ => {}
        }
        controller.next().expect("gate satisfied");
    }
    panic!("never reached {target}");
}

pub(super) fn residence() -> Residence {
    Residence {
        is_current: true,
        address: "1200 Grand Ave".to_string(),
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        zip_code: "50309".to_string(),
        residency_type: ResidencyType::Rent,
        move_in_date: form_date(2021, 6, 1),
        move_out_date: form_date(2025, 5, 31),
        landlord_name: "Riverfront Lofts".to_string(),
        ..Residence::default()
    }
}

pub(super) fn income() -> Income {
    Income {
        amount: 4300.0,
        income_type: "Employment".to_string(),
        employer: "Hy-Vee".to_string(),
        position: "Pharmacist".to_string(),
        start_date: NaiveDate::from_ymd_opt(2022, 2, 1),
        is_current_employment: true,
        ..Income::default()
    }
}

pub(super) fn occupant() -> Occupant {
    Occupant {
        first_name: "Sam".to_string(),
        last_name: "Doe".to_string(),
        dob: form_date(2015, 4, 12),
        relationship: "Child".to_string(),
        ..Occupant::default()
    }
}

pub(super) fn pet() -> Pet {
    Pet {
        pet_type: "Dog".to_string(),
        name: "Biscuit".to_string(),
        weight: "25-50 lbs".to_string(),
        breed: "Beagle".to_string(),
        ..Pet::default()
    }
}

pub(super) fn emergency_contact(first_name: &str) -> EmergencyContact {
    EmergencyContact {
        first_name: first_name.to_string(),
        last_name: "Doe".to_string(),
        relationship: "Parent".to_string(),
        phone_number: "515-555-0134".to_string(),
        ..EmergencyContact::default()
    }
}

pub(super) fn document(name: &str) -> FileHandle {
    FileHandle::new(
        name,
        mime::APPLICATION_PDF,
        Utc.with_ymd_and_hms(2025, 9, 1, 12, 0, 0)
            .single()
            .expect("valid instant"),
        b"%PDF-1.7 sample".to_vec(),
    )
}
