use crate::infra::{load_document, InMemoryApplicationGateway, InMemoryLeaseDirectory};
use chrono::{NaiveDate, TimeZone, Utc};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tenant_portal::error::AppError;
use tenant_portal::wizard::validation::rules::{
    applicant_rules, emergency_contact_rules, income_rules, occupant_rules, pet_rules,
    residence_rules, vehicle_rules,
};
use tenant_portal::wizard::validation::{RecordEditor, RuleSet};
use tenant_portal::wizard::{
    form_date, ApplicationGateway, ApplicationReceipt, DraftCodec, DraftStorage,
    EmergencyContact, FileHandle, FormField, Income, LeaseDirectory, NavigationOutcome, Occupant,
    Pet, ResidencyType, Residence, Screen, Vehicle, WizardController, WizardStep,
};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Stop (leaving the draft saved) once this step (1-5) is reached.
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub(crate) stop_at: Option<u8>,
    /// Property to apply for.
    #[arg(long, default_value = "p1")]
    pub(crate) property_id: String,
    /// Optional unit within the property.
    #[arg(long)]
    pub(crate) unit_id: Option<String>,
    /// File to attach on the documents step. Repeat for several files.
    #[arg(long = "document")]
    pub(crate) documents: Vec<PathBuf>,
    /// Leave the property without a lease so submission fails.
    #[arg(long)]
    pub(crate) without_lease: bool,
    /// Have the application service reject the submission.
    #[arg(long)]
    pub(crate) reject: bool,
}

/// Answers the demo gives on each screen.
pub(crate) struct DemoPlan {
    pub(crate) stop_at: Option<WizardStep>,
    pub(crate) property_id: String,
    pub(crate) unit_id: Option<String>,
    pub(crate) documents: Vec<FileHandle>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum DemoOutcome {
    Stopped(Screen),
    Submitted(ApplicationReceipt),
    Failed(Vec<String>),
}

pub(crate) async fn run_demo<S>(codec: DraftCodec<S>, args: DemoArgs) -> Result<(), AppError>
where
    S: DraftStorage,
{
    let DemoArgs {
        stop_at,
        property_id,
        unit_id,
        documents,
        without_lease,
        reject,
    } = args;

    let documents = if documents.is_empty() {
        vec![sample_document()]
    } else {
        documents
            .iter()
            .map(|path| load_document(path))
            .collect::<Result<Vec<_>, _>>()?
    };
    let plan = DemoPlan {
        stop_at: stop_at.and_then(|number| WizardStep::try_from(number).ok()),
        property_id,
        unit_id,
        documents,
    };

    let leases = if without_lease {
        InMemoryLeaseDirectory::default()
    } else {
        InMemoryLeaseDirectory::with_lease(&plan.property_id, plan.unit_id.clone())
    };
    let applications = Arc::new(InMemoryApplicationGateway::new(reject));
    let mut wizard = WizardController::mount(codec, Arc::new(leases), applications.clone());

    println!("Tenant application wizard demo");
    if wizard.is_dirty() {
        println!("Resuming saved draft on: {}", wizard.screen());
    }

    let outcome = drive(&mut wizard, &plan).await?;
    if let Some(names) = wizard.reupload_banner() {
        println!("Documents from the saved draft must be uploaded again:");
        for name in names {
            println!("  - {name}");
        }
    }

    match outcome {
        DemoOutcome::Stopped(screen) => {
            println!(
                "Stopped on {screen}; answers saved under draft key `{}`",
                wizard.codec().key()
            );
        }
        DemoOutcome::Submitted(receipt) => {
            info!(accepted = applications.created().len(), "demo submission accepted");
            println!(
                "Application {} submitted against lease {}",
                receipt.application_id, receipt.lease_id.0
            );
        }
        DemoOutcome::Failed(messages) => {
            println!("Submission failed:");
            for message in messages {
                println!("  - {message}");
            }
            println!("Every answer was kept; run the demo again to retry.");
        }
    }
    Ok(())
}

/// Fill each screen with sample answers and advance until the plan stops or the
/// application has been submitted.
pub(crate) async fn drive<S, L, G>(
    wizard: &mut WizardController<S, L, G>,
    plan: &DemoPlan,
) -> Result<DemoOutcome, AppError>
where
    S: DraftStorage,
    L: LeaseDirectory,
    G: ApplicationGateway,
{
    loop {
        let step = wizard.position().step;
        if plan
            .stop_at
            .is_some_and(|stop| step.number() >= stop.number())
        {
            return Ok(DemoOutcome::Stopped(wizard.screen()));
        }

        if wizard.screen() == Screen::SelectProperty {
            wizard.select_property(plan.property_id.clone(), plan.unit_id.clone());
            continue;
        }

        fill_screen(wizard, plan)?;
        match wizard.next()? {
            NavigationOutcome::Moved(screen) => info!(%screen, "demo advanced"),
            NavigationOutcome::ReadyToSubmit => break,
            NavigationOutcome::Stayed | NavigationOutcome::Exited => {
                return Ok(DemoOutcome::Stopped(wizard.screen()));
            }
        }
    }

    match wizard.submit().await {
        Ok(receipt) => Ok(DemoOutcome::Submitted(receipt)),
        Err(failure) => Ok(DemoOutcome::Failed(failure.into_messages())),
    }
}

fn fill_screen<S, L, G>(
    wizard: &mut WizardController<S, L, G>,
    plan: &DemoPlan,
) -> Result<(), AppError>
where
    S: DraftStorage,
    L: LeaseDirectory,
    G: ApplicationGateway,
{
    match wizard.screen() {
        Screen::ApplicantInfo if wizard.form().first_name.trim().is_empty() => {
            for field in sample_applicant() {
                wizard.update_field(field);
            }
            let errors = applicant_rules().check(wizard.form());
            if !errors.is_empty() {
                return Err(errors.into());
            }
        }
        Screen::Occupants if wizard.form().occupants.is_empty() => {
            let occupant = complete(sample_occupant(), occupant_rules())?;
            wizard.edit(|form| form.occupants.push(occupant));
        }
        Screen::Pets if wizard.form().pets.is_empty() => {
            let pet = complete(sample_pet(), pet_rules())?;
            wizard.edit(|form| form.pets.push(pet));
        }
        Screen::Vehicles if wizard.form().vehicles.is_empty() => {
            let vehicle = complete(sample_vehicle(), vehicle_rules())?;
            wizard.edit(|form| form.vehicles.push(vehicle));
        }
        Screen::ResidenceHistory if wizard.form().residences.is_empty() => {
            let current = complete(sample_current_residence(), residence_rules())?;
            let previous = owned_residence()?;
            wizard.edit(|form| form.residences.extend([current, previous]));
        }
        Screen::AdditionalResidenceInfo if wizard.form().additional_residence_info.is_empty() => {
            wizard.update_field(FormField::AdditionalResidenceInfo(
                "Lived with family between leases in 2020.".to_string(),
            ));
        }
        Screen::Income if wizard.form().incomes.is_empty() => {
            let income = complete(sample_income(), income_rules())?;
            wizard.edit(|form| form.incomes.push(income));
        }
        Screen::AdditionalIncomeInfo if wizard.form().additional_income_info.is_empty() => {
            wizard.update_field(FormField::AdditionalIncomeInfo(
                "Occasional weekend pharmacy relief shifts.".to_string(),
            ));
        }
        Screen::EmergencyContacts if wizard.form().emergency_contacts.is_empty() => {
            let contact = complete(sample_contact(), emergency_contact_rules())?;
            wizard.add_emergency_contact(contact)?;
        }
        Screen::Documents => {
            for document in &plan.documents {
                let attached = wizard
                    .form()
                    .documents
                    .iter()
                    .any(|existing| existing.name == document.name);
                if !attached {
                    wizard.attach_document(document.clone())?;
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn complete<T>(draft: T, rules: RuleSet<T>) -> Result<T, AppError> {
    RecordEditor::new(draft, rules)
        .finish()
        .map_err(|(_, errors)| errors.into())
}

/// Earlier home the applicant owned; switching to `Own` drops the move-out date.
fn owned_residence() -> Result<Residence, AppError> {
    let mut editor = RecordEditor::new(
        Residence {
            address: "88 Walnut St".to_string(),
            city: "Ames".to_string(),
            state: "IA".to_string(),
            zip_code: "50010".to_string(),
            move_in_date: form_date(2016, 8, 15),
            move_out_date: form_date(2021, 5, 31),
            reason_for_leaving: "Relocated for work".to_string(),
            ..Residence::default()
        },
        residence_rules(),
    );
    editor.set_residency_type(ResidencyType::Own);
    editor.finish().map_err(|(_, errors)| errors.into())
}

fn sample_applicant() -> Vec<FormField> {
    vec![
        FormField::FirstName("Jane".to_string()),
        FormField::LastName("Doe".to_string()),
        FormField::Email("jane.doe@example.com".to_string()),
        FormField::PhoneNumber("(515) 555-0134".to_string()),
        FormField::Dob(form_date(1990, 3, 14)),
        FormField::MoveInDate(form_date(2025, 11, 1)),
        FormField::ShortBio("Pharmacist relocating closer to work.".to_string()),
    ]
}

fn sample_occupant() -> Occupant {
    Occupant {
        first_name: "Sam".to_string(),
        last_name: "Doe".to_string(),
        dob: form_date(2015, 4, 12),
        relationship: "Child".to_string(),
        ..Occupant::default()
    }
}

fn sample_pet() -> Pet {
    Pet {
        pet_type: "Dog".to_string(),
        name: "Biscuit".to_string(),
        weight: "25-50 lbs".to_string(),
        breed: "Beagle".to_string(),
        ..Pet::default()
    }
}

fn sample_vehicle() -> Vehicle {
    Vehicle {
        vehicle_type: "Car".to_string(),
        make: "Honda".to_string(),
        model: "Civic".to_string(),
        year: "2019".to_string(),
        color: "Blue".to_string(),
        license_plate: "IA-4821".to_string(),
        registered_in: "IA".to_string(),
        ..Vehicle::default()
    }
}

fn sample_current_residence() -> Residence {
    Residence {
        is_current: true,
        address: "1200 Grand Ave Apt 4".to_string(),
        city: "Des Moines".to_string(),
        state: "IA".to_string(),
        zip_code: "50309".to_string(),
        residency_type: ResidencyType::Rent,
        move_in_date: form_date(2021, 6, 1),
        move_out_date: form_date(2025, 10, 31),
        landlord_name: "Riverfront Lofts".to_string(),
        landlord_email: "leasing@riverfront.example".to_string(),
        reason_for_leaving: "Need a second bedroom".to_string(),
        ..Residence::default()
    }
}

fn sample_income() -> Income {
    Income {
        amount: 6200.0,
        income_type: "Employment".to_string(),
        employer: "Hy-Vee".to_string(),
        position: "Pharmacist".to_string(),
        employer_address: "5820 Westown Pkwy, West Des Moines, IA".to_string(),
        start_date: NaiveDate::from_ymd_opt(2022, 2, 1),
        supervisor_name: "Pat Lee".to_string(),
        is_current_employment: true,
        ..Income::default()
    }
}

fn sample_contact() -> EmergencyContact {
    EmergencyContact {
        first_name: "Ruth".to_string(),
        last_name: "Doe".to_string(),
        relationship: "Parent".to_string(),
        phone_number: "515-555-0100".to_string(),
        ..EmergencyContact::default()
    }
}

/// Stand-in document used when no files are passed on the command line.
pub(crate) fn sample_document() -> FileHandle {
    let modified = Utc
        .with_ymd_and_hms(2025, 9, 30, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now);
    FileHandle::new(
        "photo-id.pdf",
        mime::APPLICATION_PDF,
        modified,
        b"%PDF-1.7 demo".to_vec(),
    )
}
