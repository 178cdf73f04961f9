use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use mime::Mime;
use serde::{Deserialize, Serialize};

/// Instant captured by a date picker. Persisted as ISO-8601 text.
pub type FormDate = DateTime<Utc>;

static RECORD_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Opaque identifier attached to every collection entry.
///
/// Unique within a session so lists can be keyed and entries deleted by id; not meant to be
/// globally unique.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn generate() -> Self {
        let sequence = RECORD_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let millis = Utc::now().timestamp_millis();
        RecordId(format!("{millis:x}-{sequence:04x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::generate()
    }
}

/// Aggregate built incrementally across the wizard.
///
/// Live file handles are runtime-only: they are skipped when serialising and always come
/// back empty from a persisted draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApplicationFormData {
    pub property_id: String,
    pub unit_id: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(with = "iso_instant")]
    pub dob: Option<FormDate>,
    pub short_bio: String,
    #[serde(with = "iso_instant")]
    pub move_in_date: Option<FormDate>,
    pub occupants: Vec<Occupant>,
    pub pets: Vec<Pet>,
    pub vehicles: Vec<Vehicle>,
    pub residences: Vec<Residence>,
    pub incomes: Vec<Income>,
    pub emergency_contacts: Vec<EmergencyContact>,
    pub documents: Vec<DocumentMetadata>,
    #[serde(skip)]
    pub document_files: Vec<FileHandle>,
    pub additional_residence_info: String,
    pub additional_income_info: String,
    #[serde(skip)]
    pub photo_file: Option<FileHandle>,
}

impl ApplicationFormData {
    /// Attach a live document, keeping `documents` and `document_files` index-aligned.
    pub fn push_document(&mut self, file: FileHandle) {
        self.documents.push(file.metadata());
        self.document_files.push(file);
    }

    /// Remove the document at `index` from both the metadata list and the live handles.
    pub fn remove_document(&mut self, index: usize) -> Option<DocumentMetadata> {
        if index >= self.documents.len() {
            return None;
        }
        if index < self.document_files.len() {
            self.document_files.remove(index);
        }
        Some(self.documents.remove(index))
    }

    /// Drop every live handle. Metadata is left untouched.
    pub fn release_file_handles(&mut self) {
        self.document_files.clear();
        self.photo_file = None;
        for pet in &mut self.pets {
            pet.photo = None;
        }
    }
}

/// Shallow single-field update applied by `FormStore::update_field`.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    PropertyId(String),
    UnitId(String),
    FirstName(String),
    MiddleName(String),
    LastName(String),
    Email(String),
    PhoneNumber(String),
    Dob(Option<FormDate>),
    ShortBio(String),
    MoveInDate(Option<FormDate>),
    AdditionalResidenceInfo(String),
    AdditionalIncomeInfo(String),
}

impl FormField {
    pub fn apply(self, form: &mut ApplicationFormData) {
        match self {
            FormField::PropertyId(value) => form.property_id = value,
            FormField::UnitId(value) => form.unit_id = value,
            FormField::FirstName(value) => form.first_name = value,
            FormField::MiddleName(value) => form.middle_name = value,
            FormField::LastName(value) => form.last_name = value,
            FormField::Email(value) => form.email = value,
            FormField::PhoneNumber(value) => form.phone_number = value,
            FormField::Dob(value) => form.dob = value,
            FormField::ShortBio(value) => form.short_bio = value,
            FormField::MoveInDate(value) => form.move_in_date = value,
            FormField::AdditionalResidenceInfo(value) => form.additional_residence_info = value,
            FormField::AdditionalIncomeInfo(value) => form.additional_income_info = value,
        }
    }
}

/// Co-occupant sharing the unit with the applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Occupant {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    #[serde(with = "iso_instant")]
    pub dob: Option<FormDate>,
    pub relationship: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pet {
    pub id: RecordId,
    pub pet_type: String,
    pub name: String,
    /// Weight bucket label, e.g. "Under 25 lbs".
    pub weight: String,
    pub breed: String,
    #[serde(skip)]
    pub photo: Option<FileHandle>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub id: RecordId,
    pub vehicle_type: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub color: String,
    pub license_plate: String,
    pub registered_in: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResidencyType {
    #[default]
    Rent,
    Own,
}

/// One entry of the applicant's residence history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Residence {
    pub id: RecordId,
    pub is_current: bool,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub residency_type: ResidencyType,
    #[serde(with = "iso_instant")]
    pub move_in_date: Option<FormDate>,
    #[serde(with = "iso_instant")]
    pub move_out_date: Option<FormDate>,
    pub landlord_name: String,
    pub landlord_email: String,
    pub landlord_phone: String,
    pub reason_for_leaving: String,
}

impl Residence {
    /// Owners have no landlord-facing move-out date, so switching to `Own` drops it.
    pub fn set_residency_type(&mut self, residency_type: ResidencyType) {
        self.residency_type = residency_type;
        if residency_type == ResidencyType::Own {
            self.move_out_date = None;
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Income {
    pub id: RecordId,
    /// Monthly amount in dollars.
    pub amount: f64,
    pub income_type: String,
    pub employer: String,
    pub position: String,
    pub employer_address: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub supervisor_name: String,
    pub supervisor_phone: String,
    pub supervisor_email: String,
    pub is_current_employment: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContact {
    pub id: RecordId,
    pub first_name: String,
    pub last_name: String,
    pub relationship: String,
    pub email: String,
    pub phone_number: String,
    pub details: String,
}

/// Serializable description of an uploaded file. Survives a reload; the bytes do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Unix epoch milliseconds.
    pub last_modified: i64,
}

impl DocumentMetadata {
    pub fn mime(&self) -> Option<Mime> {
        self.mime_type.parse().ok()
    }
}

/// Live file selected by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub mime: Mime,
    pub last_modified: FormDate,
    pub contents: Arc<[u8]>,
}

impl FileHandle {
    pub fn new(
        name: impl Into<String>,
        mime: Mime,
        last_modified: FormDate,
        contents: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            mime,
            last_modified,
            contents: contents.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.contents.len() as u64
    }

    pub fn metadata(&self) -> DocumentMetadata {
        DocumentMetadata {
            name: self.name.clone(),
            size: self.size(),
            mime_type: self.mime.essence_str().to_string(),
            last_modified: self.last_modified.timestamp_millis(),
        }
    }
}

/// Build a midnight-UTC instant for a calendar date.
pub fn form_date(year: i32, month: u32, day: u32) -> Option<FormDate> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).single()
}

/// `Option<FormDate>` as ISO-8601 text, e.g. `2024-03-01T00:00:00.000Z`.
pub(crate) mod iso_instant {
    use chrono::{DateTime, SecondsFormat, Timelike, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Millisecond text unless the instant carries finer digits, which are kept.
    pub fn format(instant: &DateTime<Utc>) -> String {
        let precision = if instant.nanosecond() % 1_000_000 == 0 {
            SecondsFormat::Millis
        } else {
            SecondsFormat::AutoSi
        };
        instant.to_rfc3339_opts(precision, true)
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(instant) => serializer.serialize_str(&format(instant)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|text| {
            DateTime::parse_from_rfc3339(&text)
                .map(|instant| instant.with_timezone(&Utc))
                .map_err(|err| serde::de::Error::custom(format!("invalid instant '{text}': {err}")))
        })
        .transpose()
    }
}
