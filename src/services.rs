use tracing::debug;

use crate::sorting::{ip_to_int, sort_array_with_array, SortKey};
use crate::table::{
    resolve_header, ChangeNotifier, ModelError, ModelEvent, Orientation, SortOrder, TabularModel,
};
use crate::types::{ServiceRecord, StateIcon, DEFAULT_SERVICE_HEADERS};

/// Number of fields in a [`ServiceRecord`]; the table exposes one column per field.
/// Column 11 (fingerprint) still answers `cell_text` for views that ask for it.
pub const SERVICE_RECORD_FIELDS: usize = 11;

// The icon drawn before host and port text needs room.
const ICON_PAD: &str = "   ";

/// Table model over scanned services: one row per record, columns as in
/// [`DEFAULT_SERVICE_HEADERS`].
#[derive(Debug, Default)]
pub struct ServiceRecordTable {
    headers: Vec<String>,
    services: Vec<ServiceRecord>,
    notifier: ChangeNotifier,
}

impl ServiceRecordTable {
    pub fn new(services: Vec<ServiceRecord>, headers: Vec<String>) -> Self {
        Self {
            headers,
            services,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn with_default_headers(services: Vec<ServiceRecord>) -> Self {
        let headers = DEFAULT_SERVICE_HEADERS.iter().map(|h| h.to_string()).collect();
        Self::new(services, headers)
    }

    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    pub fn services(&self) -> &[ServiceRecord] {
        &self.services
    }

    /// Swap in a new record sequence. Listeners receive a reset.
    pub fn set_services(&mut self, services: Vec<ServiceRecord>) {
        debug!(rows = services.len(), "replacing service records");
        self.services = services;
        self.notifier.emit(ModelEvent::ModelReset);
    }

    pub fn replace_all(&mut self, services: Vec<ServiceRecord>) {
        self.set_services(services);
    }

    pub fn port_at(&self, row: usize) -> Result<&str, ModelError> {
        self.record(row).map(|r| r.port_id.as_str())
    }

    pub fn name_at(&self, row: usize) -> Result<Option<&str>, ModelError> {
        self.record(row).map(|r| r.name.as_deref())
    }

    pub fn ip_at(&self, row: usize) -> Result<&str, ModelError> {
        self.record(row).map(|r| r.ip.as_str())
    }

    pub fn protocol_at(&self, row: usize) -> Result<Option<&str>, ModelError> {
        self.record(row).map(|r| r.protocol.as_deref())
    }

    fn record(&self, row: usize) -> Result<&ServiceRecord, ModelError> {
        self.services.get(row).ok_or(ModelError::RowOutOfRange {
            row,
            len: self.services.len(),
        })
    }

    /// Keys for `column`, or an empty list when the column is not sortable.
    fn sort_keys(&self, column: usize) -> Vec<SortKey> {
        let text = |v: &Option<String>| SortKey::Text(v.clone().unwrap_or_default());
        match column {
            0 => self
                .services
                .iter()
                .map(|s| {
                    SortKey::Integer(ip_to_int(&s.ip).map(u64::from).unwrap_or_else(|| {
                        debug!(ip = %s.ip, "unparseable ip sorts as 0");
                        0
                    }))
                })
                .collect(),
            1 | 2 => self
                .services
                .iter()
                .map(|s| {
                    SortKey::Integer(s.port_id.trim().parse::<u64>().unwrap_or_else(|_| {
                        debug!(port = %s.port_id, "unparseable port sorts as 0");
                        0
                    }))
                })
                .collect(),
            3 => self.services.iter().map(|s| text(&s.protocol)).collect(),
            4 => self
                .services
                .iter()
                .map(|s| SortKey::Text(s.state.clone()))
                .collect(),
            7 => self.services.iter().map(|s| text(&s.name)).collect(),
            9 => self
                .services
                .iter()
                .map(|s| SortKey::Text(s.version_summary()))
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl TabularModel for ServiceRecordTable {
    fn row_count(&self) -> usize {
        self.services.len()
    }

    fn column_count(&self) -> usize {
        if self.services.is_empty() {
            0
        } else {
            SERVICE_RECORD_FIELDS
        }
    }

    fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        let s = self.services.get(row)?;
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        let value = match column {
            0 => format!("{ICON_PAD}{}", s.ip),
            1 => s.port_id.clone(),
            2 => format!("{ICON_PAD}{}", s.port_id),
            3 => opt(&s.protocol),
            4 => s.state.clone(),
            5 => opt(&s.host_id),
            6 => opt(&s.service_id),
            7 => opt(&s.name),
            8 => opt(&s.product),
            9 => s.version_summary(),
            10 => opt(&s.extrainfo),
            11 => opt(&s.fingerprint),
            _ => return None,
        };
        Some(value)
    }

    fn decoration(&self, row: usize, column: usize) -> Option<StateIcon> {
        match column {
            0 | 2 => self
                .services
                .get(row)
                .map(|s| StateIcon::from_state(&s.state)),
            _ => None,
        }
    }

    fn header_label(&self, section: usize, orientation: Orientation) -> Option<String> {
        resolve_header(orientation, section, &self.headers)
    }

    /// Sorts ascending by the column's key, then reverses the whole sequence when the
    /// view reports [`SortOrder::Ascending`]. Unsortable columns only get the reverse.
    fn sort_by(&mut self, column: usize, order: SortOrder) {
        self.notifier.emit(ModelEvent::LayoutAboutToChange);

        let mut keys = self.sort_keys(column);
        // Keys are built from the records themselves, so the lengths always agree.
        if let Err(e) = sort_array_with_array(&mut keys, &mut self.services) {
            debug!(error = %e, "sort skipped");
        }
        if order == SortOrder::Ascending {
            self.services.reverse();
        }
        debug!(column, ?order, rows = self.services.len(), "sorted services");

        self.notifier.emit(ModelEvent::LayoutChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc(ip: &str, port: &str, state: &str) -> ServiceRecord {
        ServiceRecord::new(ip, port, state)
    }

    #[test]
    fn empty_table_has_no_columns() {
        let t = ServiceRecordTable::with_default_headers(Vec::new());
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column_count(), 0);
        assert!(t.rows().is_empty());
    }

    #[test]
    fn column_count_matches_record_fields() {
        let record = svc("10.0.0.1", "22", "open");
        let fields = match serde_json::to_value(&record).unwrap() {
            serde_json::Value::Object(map) => map.len(),
            other => panic!("record serialized as {other}"),
        };
        let t = ServiceRecordTable::with_default_headers(vec![record]);
        assert_eq!(t.column_count(), fields);
        assert_eq!(t.column_count(), SERVICE_RECORD_FIELDS);
    }

    #[test]
    fn cells_use_default_flags() {
        let t = ServiceRecordTable::with_default_headers(vec![svc("10.0.0.1", "22", "open")]);
        let f = t.flags(0, 0);
        assert!(f.enabled && f.selectable && !f.editable);
    }

    #[test]
    fn host_and_port_cells_are_padded() {
        let t = ServiceRecordTable::with_default_headers(vec![svc("10.0.0.1", "22", "open")]);
        assert_eq!(t.cell_text(0, 0).as_deref(), Some("   10.0.0.1"));
        assert_eq!(t.cell_text(0, 1).as_deref(), Some("22"));
        assert_eq!(t.cell_text(0, 2).as_deref(), Some("   22"));
        assert_eq!(t.cell_text(0, 12), None);
        assert_eq!(t.cell_text(1, 0), None);
    }

    #[test]
    fn unsortable_column_only_reverses_on_ascending() {
        let mut t = ServiceRecordTable::with_default_headers(vec![
            svc("10.0.0.1", "1", "open"),
            svc("10.0.0.2", "2", "open"),
        ]);
        t.sort_by(5, SortOrder::Descending);
        assert_eq!(t.ip_at(0).unwrap(), "10.0.0.1");
        t.sort_by(5, SortOrder::Ascending);
        assert_eq!(t.ip_at(0).unwrap(), "10.0.0.2");
    }

    #[test]
    fn accessors_reject_bad_rows() {
        let t = ServiceRecordTable::with_default_headers(vec![svc("10.0.0.1", "22", "open")]);
        assert_eq!(
            t.port_at(3).unwrap_err(),
            ModelError::RowOutOfRange { row: 3, len: 1 }
        );
        assert!(t.name_at(0).unwrap().is_none());
    }
}
