pub mod client;
pub mod models;

pub use client::DashboardClient;
pub use models::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid endpoint URL: {0}")]
    Url(String),
}

impl ApiError {
    /// HTTP status code, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The slice of the Dashboard API the provisioning pipeline talks to.
pub trait DashboardApi {
    /// `GET /organizations`
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError>;

    /// `GET /organizations/{id}/networks`
    fn list_networks(&self, organization_id: &str) -> Result<Vec<Network>, ApiError>;

    /// `GET /networks/{id}/groupPolicies`
    fn list_group_policies(&self, network_id: &str) -> Result<Vec<GroupPolicy>, ApiError>;

    /// `POST /networks/{id}/clients/provision`; only `201 Created` counts as success
    fn provision_clients(&self, network_id: &str, payload: &ProvisionPayload)
        -> Result<(), ApiError>;
}
