//! Boundary with the leasing and application services used on final submission.

mod gateway;
mod messages;

pub use gateway::{
    ApplicationGateway, ApplicationReceipt, GatewayError, Lease, LeaseDirectory, LeaseId,
};
pub use messages::{friendly_message, SubmissionFailure};
