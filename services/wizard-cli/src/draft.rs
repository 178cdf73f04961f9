use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tenant_portal::error::AppError;
use tenant_portal::wizard::{DraftCodec, DraftStorage, LoadedDraft};
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ShowArgs {
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

/// What an operator needs to know about a saved draft without dumping personal details.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DraftSummary {
    pub(crate) step: u8,
    pub(crate) step_label: &'static str,
    pub(crate) screen: String,
    pub(crate) saved_at: Option<DateTime<Utc>>,
    pub(crate) applicant: String,
    pub(crate) property_id: String,
    pub(crate) occupants: usize,
    pub(crate) pets: usize,
    pub(crate) vehicles: usize,
    pub(crate) residences: usize,
    pub(crate) incomes: usize,
    pub(crate) emergency_contacts: usize,
    pub(crate) documents_to_reupload: Vec<String>,
}

impl DraftSummary {
    pub(crate) fn from_loaded(draft: &LoadedDraft) -> Self {
        let form = &draft.form_data;
        let applicant = [form.first_name.trim(), form.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            step: draft.position.step.number(),
            step_label: draft.position.step.label(),
            screen: draft.position.screen().to_string(),
            saved_at: draft.saved_at,
            applicant,
            property_id: form.property_id.clone(),
            occupants: form.occupants.len(),
            pets: form.pets.len(),
            vehicles: form.vehicles.len(),
            residences: form.residences.len(),
            incomes: form.incomes.len(),
            emergency_contacts: form.emergency_contacts.len(),
            documents_to_reupload: draft.pending_reupload.clone(),
        }
    }
}

pub(crate) fn show_draft<S>(codec: &DraftCodec<S>, args: ShowArgs) -> Result<(), AppError>
where
    S: DraftStorage,
{
    let Some(draft) = codec.load() else {
        println!("No saved application draft under key `{}`", codec.key());
        return Ok(());
    };
    let summary = DraftSummary::from_loaded(&draft);

    if args.json {
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{text}");
        return Ok(());
    }

    println!("Saved application draft `{}`", codec.key());
    println!(
        "- Step {} ({}) on screen: {}",
        summary.step, summary.step_label, summary.screen
    );
    if let Some(saved_at) = summary.saved_at {
        println!("- Saved at {}", saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!(
        "- Applicant: {}",
        if summary.applicant.is_empty() {
            "(not entered)"
        } else {
            summary.applicant.as_str()
        }
    );
    println!(
        "- Property: {}",
        if summary.property_id.is_empty() {
            "(not selected)"
        } else {
            summary.property_id.as_str()
        }
    );
    println!(
        "- {} occupants | {} pets | {} vehicles | {} residences | {} income sources | {} emergency contacts",
        summary.occupants,
        summary.pets,
        summary.vehicles,
        summary.residences,
        summary.incomes,
        summary.emergency_contacts
    );
    if !summary.documents_to_reupload.is_empty() {
        println!("Documents to upload again:");
        for name in &summary.documents_to_reupload {
            println!("  - {name}");
        }
    }
    Ok(())
}

pub(crate) fn clear_draft<S>(codec: &DraftCodec<S>) -> Result<(), AppError>
where
    S: DraftStorage,
{
    codec.storage().remove(codec.key())?;
    info!(key = %codec.key(), "application draft deleted");
    println!("Deleted saved application draft `{}`", codec.key());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_portal::wizard::{
        ApplicationFormData, FileHandle, MemoryDraftStorage, WizardPosition, WizardStep,
    };

    #[test]
    fn summary_counts_records_and_lists_stale_documents() {
        let codec = DraftCodec::new(MemoryDraftStorage::new());
        let mut form = ApplicationFormData {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            property_id: "p1".to_string(),
            ..ApplicationFormData::default()
        };
        form.push_document(FileHandle::new(
            "paystub.pdf",
            mime::APPLICATION_PDF,
            Utc::now(),
            b"%PDF".to_vec(),
        ));
        assert!(codec.persist(&form, &WizardPosition::entering(WizardStep::Documents)));

        let summary = DraftSummary::from_loaded(&codec.load().expect("draft loads"));

        assert_eq!(summary.step, 5);
        assert_eq!(summary.screen, "Documents");
        assert_eq!(summary.applicant, "Jane Doe");
        assert_eq!(summary.documents_to_reupload, vec!["paystub.pdf".to_string()]);
        assert!(summary.saved_at.is_some());
    }

    #[test]
    fn clear_removes_the_draft() {
        let storage = MemoryDraftStorage::new();
        let codec = DraftCodec::new(storage.clone());
        codec.persist(
            &ApplicationFormData {
                first_name: "Jane".to_string(),
                ..ApplicationFormData::default()
            },
            &WizardPosition::initial(),
        );

        clear_draft(&codec).expect("clear succeeds");

        assert!(!storage.contains(codec.key()));
    }
}
