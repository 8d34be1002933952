use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Central API token data, passed unchanged into the client.
/// Read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub base_url: String,
    pub access_token: String,
}

/// Where a created profile gets attached: device persona plus the
/// scope (type + name) the profile applies to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub device_persona: String,
    pub scope_type: String,
    pub scope_name: String,
}

/// Variables loaded from the YAML file: an `assignment` section plus
/// one field mapping per profile type (keyed by `ProfileSpec::var_key`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variables {
    pub assignment: Assignment,
    #[serde(flatten)]
    pub sections: BTreeMap<String, serde_json::Value>,
}

impl Variables {
    /// Field mapping for one profile type, if present in the file
    pub fn section(&self, var_key: &str) -> Option<&serde_json::Value> {
        self.sections.get(var_key)
    }

    /// The mandatory `name` field of a profile type's section
    pub fn profile_name(&self, var_key: &str) -> Option<&str> {
        self.section(var_key)?.get("name")?.as_str()
    }
}

/// Descriptor for one profile type: which API endpoint it lives under,
/// the key its payload is nested in for bulk creation, the template
/// that renders it, and the variables section that feeds the template.
#[derive(Debug, Clone)]
pub struct ProfileSpec {
    pub endpoint: String,
    pub bulk_key: String,
    pub template_file: String,
    pub var_key: String,
}

impl ProfileSpec {
    pub fn new(endpoint: &str, bulk_key: &str, template_file: &str, var_key: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            bulk_key: bulk_key.to_string(),
            template_file: template_file.to_string(),
            var_key: var_key.to_string(),
        }
    }
}

/// The AP baseline set, provisioned in order
pub fn baseline_profiles() -> Vec<ProfileSpec> {
    vec![
        ProfileSpec::new("radios", "profile", "radios.json", "radio"),
        ProfileSpec::new("ids", "profile", "ids.json", "ids"),
        ProfileSpec::new("ntp", "profile", "ntp.json", "ntp"),
        ProfileSpec::new("wlan-ssids", "wlan-ssid", "wlan-ssid.json", "ssid"),
    ]
}

/// Fully-qualified profile reference used when assigning to a scope,
/// e.g. "ntp/MyNtpProfile"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRef {
    pub endpoint: String,
    pub name: String,
}

impl ProfileRef {
    pub fn new(endpoint: &str, name: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            name: name.to_string(),
        }
    }
}

impl fmt::Display for ProfileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.endpoint, self.name)
    }
}
