use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::wizard::domain::ApplicationFormData;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeaseId(pub String);

/// Lease the application is filed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub id: LeaseId,
    pub property_id: String,
    pub unit_id: Option<String>,
}

/// Acknowledgement returned when the application is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReceipt {
    pub application_id: String,
    pub lease_id: LeaseId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Business rejection carrying one message per problem, often prefixed by a field path.
    #[error("application rejected: {}", messages.join("; "))]
    Rejected { messages: Vec<String> },
    #[error("{0}")]
    Unavailable(String),
}

/// Looks up the lease that applications for a property are filed against.
pub trait LeaseDirectory: Send + Sync {
    fn lease_for_property(
        &self,
        property_id: &str,
    ) -> impl Future<Output = Result<Option<Lease>, GatewayError>> + Send;
}

/// Creates the application record from the completed form.
pub trait ApplicationGateway: Send + Sync {
    fn create_application(
        &self,
        form: &ApplicationFormData,
        lease_id: &LeaseId,
    ) -> impl Future<Output = Result<ApplicationReceipt, GatewayError>> + Send;
}
