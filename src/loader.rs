use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::types::{ServiceName, ServiceRecord};

/// Parse a JSON array of service records.
pub fn parse_services_str(s: &str) -> Result<Vec<ServiceRecord>> {
    serde_json::from_str(s).context("invalid services JSON")
}

/// Parse a JSON array of `{ "name": ... }` objects.
pub fn parse_service_names_str(s: &str) -> Result<Vec<ServiceName>> {
    serde_json::from_str(s).context("invalid service names JSON")
}

pub fn load_services_from_path(path: impl AsRef<Path>) -> Result<Vec<ServiceRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read services file: {}", path.display()))?;
    let services = parse_services_str(&content)
        .with_context(|| format!("failed to parse services file: {}", path.display()))?;
    info!(path = %path.display(), count = services.len(), "loaded services");
    Ok(services)
}

pub fn load_service_names_from_path(path: impl AsRef<Path>) -> Result<Vec<ServiceName>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read service names file: {}", path.display()))?;
    let names = parse_service_names_str(&content)
        .with_context(|| format!("failed to parse service names file: {}", path.display()))?;
    info!(path = %path.display(), count = names.len(), "loaded service names");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_services() {
        let input = r#"[
            {"ip": "10.0.0.1", "portId": "80", "state": "open", "name": "http"},
            {"ip": "10.0.0.2", "portId": 443, "protocol": "tcp", "state": "filtered"}
        ]"#;
        let services = parse_services_str(input).unwrap();
        assert_eq!(services.len(), 2);
        assert_eq!(services[1].port_id, "443");
        assert_eq!(services[1].protocol.as_deref(), Some("tcp"));
    }

    #[test]
    fn missing_required_field_errors() {
        let input = r#"[{"portId": "80", "state": "open"}]"#;
        assert!(parse_services_str(input).is_err());
    }

    #[test]
    fn parse_names() {
        let names = parse_service_names_str(r#"[{"name":"ssh"},{"name":"http"}]"#).unwrap();
        assert_eq!(names, vec![ServiceName::new("ssh"), ServiceName::new("http")]);
    }
}
