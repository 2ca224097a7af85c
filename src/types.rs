use serde::{Deserialize, Deserializer, Serialize};

/// Column labels for the services table, one per displayed column.
pub const DEFAULT_SERVICE_HEADERS: [&str; 12] = [
    "Host",
    "Port",
    "Port",
    "Protocol",
    "State",
    "Host ID",
    "Service ID",
    "Name",
    "Product",
    "Version",
    "Extrainfo",
    "Fingerprint",
];

/// Column labels for the service-names table.
pub const DEFAULT_SERVICE_NAME_HEADERS: [&str; 1] = ["Name"];

/// One discovered network service, as produced by the scan importer.
///
/// `portId`, `hostId` and `serviceId` arrive as strings or integers depending on
/// the importer; both are accepted and kept as text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    pub ip: String,
    #[serde(deserialize_with = "string_or_number")]
    pub port_id: String,
    #[serde(default)]
    pub protocol: Option<String>,
    pub state: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub host_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub service_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub extrainfo: Option<String>,
    #[serde(default)]
    pub fingerprint: Option<String>,
}

impl ServiceRecord {
    pub fn new(ip: impl Into<String>, port_id: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            port_id: port_id.into(),
            state: state.into(),
            ..Self::default()
        }
    }

    /// Product, version and extra info joined for display, e.g. `nginx 1.18 (Ubuntu)`.
    ///
    /// Absent or empty parts are skipped along with their separator.
    pub fn version_summary(&self) -> String {
        let mut value = String::new();
        if let Some(product) = non_empty(&self.product) {
            value.push_str(product);
        }
        if let Some(version) = non_empty(&self.version) {
            value.push(' ');
            value.push_str(version);
        }
        if let Some(extra) = non_empty(&self.extrainfo) {
            value.push_str(" (");
            value.push_str(extra);
            value.push(')');
        }
        value
    }
}

/// A name-only record backing the service-names table.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceName {
    pub name: String,
}

impl ServiceName {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Distinct non-empty service names in first-seen order.
    pub fn distinct_from(records: &[ServiceRecord]) -> Vec<ServiceName> {
        let mut seen = std::collections::HashSet::new();
        records
            .iter()
            .filter_map(|r| non_empty(&r.name))
            .filter(|name| seen.insert(*name))
            .map(ServiceName::new)
            .collect()
    }
}

/// Abstract icon identifier shown next to the host and port cells.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StateIcon {
    Open,
    Closed,
    Filtered,
}

impl StateIcon {
    /// Map a port state to its icon. Anything unrecognized shows as filtered.
    pub fn from_state(state: &str) -> Self {
        match state {
            "open" => StateIcon::Open,
            "closed" => StateIcon::Closed,
            _ => StateIcon::Filtered,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            StateIcon::Open => "open",
            StateIcon::Closed => "closed",
            StateIcon::Filtered => "filtered",
        }
    }

    /// Asset path of the bundled icon for this key.
    pub fn icon_path(self) -> String {
        format!("./images/{}.gif", self.key())
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Str(String),
    Int(i64),
}

impl From<StringOrNumber> for String {
    fn from(v: StringOrNumber) -> Self {
        match v {
            StringOrNumber::Str(s) => s,
            StringOrNumber::Int(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(d).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(d).map(|v| v.map(String::from))
}
