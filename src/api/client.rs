use super::{ApiError, DashboardApi, GroupPolicy, Network, Organization, ProvisionPayload};
use crate::config::Settings;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const API_KEY_HEADER: &str = "X-Cisco-Meraki-API-Key";

const USER_AGENT: &str = concat!("macprov/", env!("CARGO_PKG_VERSION"));

/// Blocking client for the Dashboard REST API.
///
/// One request at a time; no retries. Timeouts come from `HttpSettings`.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    base_url: Url,
    http: Client,
}

impl DashboardClient {
    pub fn new(settings: &Settings) -> Result<Self, ApiError> {
        let mut base_url =
            Url::parse(&settings.base_url).map_err(|e| ApiError::Url(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::Url(format!(
                "`{}` cannot be used as a base URL",
                settings.base_url
            )));
        }
        // Keep the version prefix (`/api/v1`) when joining endpoint segments.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(&settings.api_key)
            .map_err(|_| ApiError::Url("API key contains invalid header characters".into()))?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(settings.http.timeout())
            .connect_timeout(settings.http.connect_timeout())
            .build()?;

        Ok(Self { base_url, http })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&T>,
    ) -> Result<Response, ApiError> {
        let url = self.endpoint(segments)?;
        log::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        log::debug!("-> {}", response.status());
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        what: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::GET, segments, Option::<&()>::None)?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|source| ApiError::Decode { what, source })
    }
}

impl DashboardApi for DashboardClient {
    fn list_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.get_json(&["organizations"], "organizations")
    }

    fn list_networks(&self, organization_id: &str) -> Result<Vec<Network>, ApiError> {
        self.get_json(&["organizations", organization_id, "networks"], "networks")
    }

    fn list_group_policies(&self, network_id: &str) -> Result<Vec<GroupPolicy>, ApiError> {
        self.get_json(&["networks", network_id, "groupPolicies"], "group policies")
    }

    fn provision_clients(
        &self,
        network_id: &str,
        payload: &ProvisionPayload,
    ) -> Result<(), ApiError> {
        let response = self.send(
            Method::POST,
            &["networks", network_id, "clients", "provision"],
            Some(payload),
        )?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(());
        }

        Err(ApiError::Status {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}
