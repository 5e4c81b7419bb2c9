use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Top-level tenant grouping networks
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Organization {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// A managed site holding clients and group policies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Network {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GroupPolicy {
    #[serde(rename = "groupPolicyId", deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Policy name -> group policy id for one network. Later duplicates win.
pub fn policy_index(policies: &[GroupPolicy]) -> HashMap<&str, &str> {
    policies
        .iter()
        .map(|p| (p.name.as_str(), p.id.as_str()))
        .collect()
}

/// What a client is assigned to after provisioning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DevicePolicy {
    Allowed,
    Blocked,
    GroupPolicy { id: String },
}

impl DevicePolicy {
    pub const ALLOWED: &'static str = "Allowed";
    pub const BLOCKED: &'static str = "Blocked";
    pub const GROUP_POLICY: &'static str = "Group Policy";

    /// Resolve a CSV status against a network's policies.
    ///
    /// "Allowed" and "Blocked" match exactly and take precedence over any group
    /// policy of the same name.
    pub fn resolve(status: &str, policies: &HashMap<&str, &str>) -> Option<Self> {
        match status {
            Self::ALLOWED => Some(Self::Allowed),
            Self::BLOCKED => Some(Self::Blocked),
            name => policies.get(name).map(|id| Self::GroupPolicy {
                id: (*id).to_string(),
            }),
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Allowed => Self::ALLOWED,
            Self::Blocked => Self::BLOCKED,
            Self::GroupPolicy { .. } => Self::GROUP_POLICY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRef {
    pub mac: String,
}

/// Body of `POST /networks/{id}/clients/provision`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionPayload {
    pub clients: Vec<ClientRef>,
    pub device_policy: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_policy_id: Option<String>,
}

impl ProvisionPayload {
    pub fn new(mac: &str, policy: &DevicePolicy) -> Self {
        let group_policy_id = match policy {
            DevicePolicy::GroupPolicy { id } => Some(id.clone()),
            _ => None,
        };

        Self {
            clients: vec![ClientRef {
                mac: mac.to_string(),
            }],
            device_policy: policy.wire_name().to_string(),
            group_policy_id,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
