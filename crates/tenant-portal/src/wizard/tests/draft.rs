use chrono::{TimeZone, Timelike, Utc};
use serde_json::Value;

use super::common::*;
use crate::wizard::domain::{form_date, ApplicationFormData};
use crate::wizard::draft::{DraftCodec, DraftStorage, MemoryDraftStorage, DEFAULT_DRAFT_KEY};
use crate::wizard::navigation::{
    OccupantSubStep, ResidenceSubStep, Screen, WizardPosition, WizardStep,
};

fn codec() -> (DraftCodec<MemoryDraftStorage>, MemoryDraftStorage) {
    let storage = MemoryDraftStorage::new();
    (DraftCodec::new(storage.clone()), storage)
}

fn stored_json(storage: &MemoryDraftStorage) -> Value {
    let raw = storage
        .get(DEFAULT_DRAFT_KEY)
        .expect("storage readable")
        .expect("draft present");
    serde_json::from_str(&raw).expect("draft is json")
}

#[test]
fn nested_dates_survive_a_round_trip() {
    let (codec, _) = codec();
    let dob = Utc
        .with_ymd_and_hms(1990, 3, 14, 15, 9, 26)
        .single()
        .expect("valid instant");
    let form = ApplicationFormData {
        first_name: "Jane".to_string(),
        dob: Some(dob),
        move_in_date: form_date(2025, 10, 1),
        residences: vec![residence()],
        occupants: vec![occupant()],
        ..ApplicationFormData::default()
    };

    assert!(codec.persist(&form, &WizardPosition::initial()));
    let loaded = codec.load().expect("draft loads");

    assert_eq!(loaded.form_data.dob, Some(dob));
    assert_eq!(loaded.form_data.move_in_date, form.move_in_date);
    assert_eq!(
        loaded.form_data.residences[0].move_in_date,
        form.residences[0].move_in_date
    );
    assert_eq!(
        loaded.form_data.residences[0].move_out_date,
        form.residences[0].move_out_date
    );
    assert_eq!(loaded.form_data.occupants[0].dob, form.occupants[0].dob);
    assert_eq!(loaded.form_data, form);
}

#[test]
fn sub_millisecond_dates_come_back_as_the_same_instant() {
    let (codec, storage) = codec();
    let dob = Utc
        .with_ymd_and_hms(1990, 3, 14, 15, 9, 26)
        .single()
        .and_then(|instant| instant.with_nanosecond(123_456_000))
        .expect("valid instant");
    let mut residence = residence();
    residence.move_in_date = Utc
        .with_ymd_and_hms(2021, 6, 1, 8, 30, 0)
        .single()
        .and_then(|instant| instant.with_nanosecond(987_654_321));
    let form = ApplicationFormData {
        dob: Some(dob),
        residences: vec![residence],
        ..ApplicationFormData::default()
    };

    assert!(codec.persist(&form, &WizardPosition::initial()));
    assert_eq!(
        stored_json(&storage)["formData"]["dob"],
        "1990-03-14T15:09:26.123456Z"
    );

    let loaded = codec.load().expect("draft loads");
    assert_eq!(loaded.form_data.dob, Some(dob));
    assert_eq!(
        loaded.form_data.residences[0].move_in_date,
        form.residences[0].move_in_date
    );
}

#[test]
fn persisted_layout_carries_iso_dates_and_no_file_handles() {
    let (codec, storage) = codec();
    let mut form = ApplicationFormData {
        dob: form_date(1990, 3, 14),
        ..ApplicationFormData::default()
    };
    form.push_document(document("paystub.pdf"));
    form.photo_file = Some(document("me.jpg"));
    let position = WizardPosition::entering(WizardStep::Documents);

    assert!(codec.persist(&form, &position));
    let json = stored_json(&storage);

    assert_eq!(json["currentStep"], 5);
    assert_eq!(json["isPropertySelected"], true);
    assert!(json["timestamp"].is_i64());
    assert_eq!(json["formData"]["dob"], "1990-03-14T00:00:00.000Z");
    assert_eq!(json["formData"]["documents"][0]["name"], "paystub.pdf");
    assert_eq!(json["formData"]["documents"][0]["type"], "application/pdf");
    assert!(json["formData"].get("documentFiles").is_none());
    assert!(json["formData"].get("photoFile").is_none());
}

#[test]
fn loading_drops_live_files_and_flags_reupload() {
    let (codec, _) = codec();
    let mut form = ApplicationFormData {
        pets: vec![pet()],
        ..ApplicationFormData::default()
    };
    form.push_document(document("lease.pdf"));
    form.photo_file = Some(document("me.jpg"));
    form.pets[0].photo = Some(document("biscuit.jpg"));

    codec.persist(&form, &WizardPosition::initial());
    let loaded = codec.load().expect("draft loads");

    assert!(loaded.needs_document_reupload);
    assert_eq!(loaded.form_data.documents.len(), 1);
    assert!(loaded.form_data.document_files.is_empty());
    assert!(loaded.form_data.photo_file.is_none());
    assert!(loaded.form_data.pets[0].photo.is_none());
}

#[test]
fn pending_reuploads_are_stored_and_merged_with_document_names() {
    let (codec, storage) = codec();
    let mut form = ApplicationFormData {
        first_name: "Jane".to_string(),
        ..ApplicationFormData::default()
    };
    form.push_document(document("id.pdf"));
    let pending = vec!["paystub.pdf".to_string(), "id.pdf".to_string()];

    assert!(codec.persist_with_reupload(&form, &WizardPosition::initial(), &pending));
    assert_eq!(
        stored_json(&storage)["pendingReupload"],
        serde_json::json!(["paystub.pdf", "id.pdf"])
    );

    let loaded = codec.load().expect("draft loads");
    assert!(loaded.needs_document_reupload);
    assert_eq!(loaded.pending_reupload, pending);
}

#[test]
fn draft_without_documents_needs_no_reupload() {
    let (codec, _) = codec();
    let form = ApplicationFormData {
        first_name: "Jane".to_string(),
        ..ApplicationFormData::default()
    };
    codec.persist(&form, &WizardPosition::initial());
    assert!(!codec.load().expect("draft loads").needs_document_reupload);
}

#[test]
fn unparseable_draft_is_discarded() {
    let (codec, storage) = codec();
    storage
        .set(DEFAULT_DRAFT_KEY, "{\"formData\": {\"firstName\": ")
        .expect("seed corrupt draft");

    assert!(codec.load().is_none());
    assert!(!storage.contains(DEFAULT_DRAFT_KEY));
}

#[test]
fn draft_with_garbage_date_is_discarded() {
    let (codec, storage) = codec();
    let raw = r#"{
        "formData": {"firstName": "Jane", "residences": [{"moveInDate": "last spring"}]},
        "currentStep": 3,
        "isPropertySelected": true,
        "timestamp": 1759300000000
    }"#;
    storage.set(DEFAULT_DRAFT_KEY, raw).expect("seed draft");

    assert!(codec.load().is_none());
    assert!(!storage.contains(DEFAULT_DRAFT_KEY));
}

#[test]
fn draft_with_unknown_step_is_discarded() {
    let (codec, storage) = codec();
    let raw = r#"{"formData": {}, "currentStep": 9, "isPropertySelected": true, "timestamp": 0}"#;
    storage.set(DEFAULT_DRAFT_KEY, raw).expect("seed draft");

    assert!(codec.load().is_none());
    assert!(!storage.contains(DEFAULT_DRAFT_KEY));
}

#[test]
fn base_layout_resumes_on_first_sub_step() {
    let (codec, storage) = codec();
    let raw = r#"{
        "formData": {"firstName": "Jane", "dob": "1990-03-14", "moveInDate": null},
        "currentStep": 3,
        "isPropertySelected": true,
        "timestamp": 1759300000000
    }"#;
    storage.set(DEFAULT_DRAFT_KEY, raw).expect("seed draft");

    let loaded = codec.load().expect("base layout loads");
    assert_eq!(loaded.position.screen(), Screen::ResidenceHistory);
    assert_eq!(loaded.form_data.dob, form_date(1990, 3, 14));
    assert_eq!(loaded.form_data.move_in_date, None);
    assert_eq!(
        loaded.saved_at,
        Utc.timestamp_millis_opt(1_759_300_000_000).single()
    );
}

#[test]
fn sub_steps_are_restored_exactly() {
    let (codec, _) = codec();
    let position = WizardPosition {
        residence_sub_step: Some(ResidenceSubStep::Income),
        last_occupant_sub_step: Some(OccupantSubStep::Pets),
        ..WizardPosition::entering(WizardStep::ResidenceAndIncome)
    };

    codec.persist(&ApplicationFormData::default(), &position);
    let loaded = codec.load().expect("draft loads");

    assert_eq!(loaded.position, position);
    assert_eq!(loaded.position.screen(), Screen::Income);
}

#[test]
fn clearing_a_missing_draft_is_harmless() {
    let (codec, storage) = codec();
    codec.clear();
    codec.persist(&ApplicationFormData::default(), &WizardPosition::initial());
    codec.clear();
    assert!(!storage.contains(DEFAULT_DRAFT_KEY));
    assert!(codec.load().is_none());
}

#[test]
fn quota_failures_report_without_panicking() {
    let storage = MemoryDraftStorage::with_quota(16);
    let codec = DraftCodec::new(storage.clone());
    let form = ApplicationFormData {
        first_name: "Jane".to_string(),
        ..ApplicationFormData::default()
    };

    assert!(!codec.persist(&form, &WizardPosition::initial()));
    assert!(codec.try_persist(&form, &WizardPosition::initial()).is_err());
    assert!(!storage.contains(DEFAULT_DRAFT_KEY));
}

#[test]
fn custom_keys_are_isolated() {
    let storage = MemoryDraftStorage::new();
    let first = DraftCodec::with_key(storage.clone(), "draft-a");
    let second = DraftCodec::with_key(storage.clone(), "draft-b");
    first.persist(
        &ApplicationFormData {
            first_name: "A".to_string(),
            ..ApplicationFormData::default()
        },
        &WizardPosition::initial(),
    );

    assert!(second.load().is_none());
    assert_eq!(
        first.load().expect("draft a").form_data.first_name,
        "A".to_string()
    );
}
