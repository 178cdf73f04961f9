use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::future::{ready, Future};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tenant_portal::error::AppError;
use tenant_portal::wizard::{
    ApplicationFormData, ApplicationGateway, ApplicationReceipt, FileHandle, GatewayError, Lease,
    LeaseDirectory, LeaseId,
};

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeaseDirectory {
    leases: Arc<Mutex<HashMap<String, Lease>>>,
}

impl InMemoryLeaseDirectory {
    pub(crate) fn with_lease(property_id: &str, unit_id: Option<String>) -> Self {
        let directory = Self::default();
        if let Ok(mut leases) = directory.leases.lock() {
            leases.insert(
                property_id.to_string(),
                Lease {
                    id: LeaseId(format!("lease-{property_id}")),
                    property_id: property_id.to_string(),
                    unit_id,
                },
            );
        }
        directory
    }
}

impl LeaseDirectory for InMemoryLeaseDirectory {
    fn lease_for_property(
        &self,
        property_id: &str,
    ) -> impl Future<Output = Result<Option<Lease>, GatewayError>> + Send {
        let lease = self
            .leases
            .lock()
            .map(|leases| leases.get(property_id).cloned())
            .map_err(|_| GatewayError::Unavailable("Lease directory is unavailable".to_string()));
        ready(lease)
    }
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Accepts every application unless built to reject, in which case it answers the way the
/// application service does for incomplete references.
#[derive(Default, Clone)]
pub(crate) struct InMemoryApplicationGateway {
    reject: bool,
    created: Arc<Mutex<Vec<ApplicationReceipt>>>,
}

impl InMemoryApplicationGateway {
    pub(crate) fn new(reject: bool) -> Self {
        Self {
            reject,
            created: Arc::default(),
        }
    }

    pub(crate) fn created(&self) -> Vec<ApplicationReceipt> {
        self.created
            .lock()
            .map(|created| created.clone())
            .unwrap_or_default()
    }
}

impl ApplicationGateway for InMemoryApplicationGateway {
    fn create_application(
        &self,
        form: &ApplicationFormData,
        lease_id: &LeaseId,
    ) -> impl Future<Output = Result<ApplicationReceipt, GatewayError>> + Send {
        if self.reject {
            return ready(Err(GatewayError::Rejected {
                messages: reference_problems(form),
            }));
        }

        let id = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let receipt = ApplicationReceipt {
            application_id: format!("app-{id:06}"),
            lease_id: lease_id.clone(),
        };
        let stored = self
            .created
            .lock()
            .map(|mut created| created.push(receipt.clone()))
            .map_err(|_| GatewayError::Unavailable("Application service is unavailable".to_string()));
        ready(stored.map(|()| receipt))
    }
}

fn reference_problems(form: &ApplicationFormData) -> Vec<String> {
    let mut problems = Vec::new();
    for (index, residence) in form.residences.iter().enumerate() {
        if residence.landlord_phone.trim().is_empty() {
            problems.push(format!("residenceHistory.{index}.landlordPhone is required"));
        }
    }
    for (index, income) in form.incomes.iter().enumerate() {
        if income.supervisor_phone.trim().is_empty() {
            problems.push(format!("incomeHistory.{index}.supervisorPhone is required"));
        }
    }
    if problems.is_empty() {
        problems.push("The application could not be verified".to_string());
    }
    problems
}

/// Read a local file into a live handle, guessing its MIME type from the extension.
pub(crate) fn load_document(path: &Path) -> Result<FileHandle, AppError> {
    let contents = fs::read(path)?;
    let modified: DateTime<Utc> = fs::metadata(path)?.modified()?.into();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok(FileHandle::new(name, mime, modified, contents))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenant_portal::wizard::{form_date, Residence};

    #[tokio::test]
    async fn rejecting_gateway_reports_field_paths() {
        let gateway = InMemoryApplicationGateway::new(true);
        let form = ApplicationFormData {
            residences: vec![Residence {
                move_in_date: form_date(2020, 1, 1),
                ..Residence::default()
            }],
            ..ApplicationFormData::default()
        };

        let result = gateway
            .create_application(&form, &LeaseId("lease-p1".to_string()))
            .await;

        assert_eq!(
            result,
            Err(GatewayError::Rejected {
                messages: vec!["residenceHistory.0.landlordPhone is required".to_string()]
            })
        );
        assert!(gateway.created().is_empty());
    }

    #[tokio::test]
    async fn lease_directory_only_knows_registered_properties() {
        let directory = InMemoryLeaseDirectory::with_lease("p1", Some("A-201".to_string()));
        let lease = directory
            .lease_for_property("p1")
            .await
            .expect("lookup succeeds")
            .expect("lease registered");
        assert_eq!(lease.id, LeaseId("lease-p1".to_string()));
        assert_eq!(
            directory.lease_for_property("p9").await.expect("lookup"),
            None
        );
    }

    #[test]
    fn documents_are_typed_from_their_extension() {
        let dir = tempfile::tempdir().expect("scratch dir");
        let path = dir.path().join("paystub.pdf");
        fs::write(&path, b"%PDF-1.7").expect("write sample");

        let handle = load_document(&path).expect("document loads");
        assert_eq!(handle.mime, mime::APPLICATION_PDF);
        assert_eq!(handle.size(), 8);
        assert_eq!(handle.name, "paystub.pdf");
    }
}
