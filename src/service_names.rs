use tracing::debug;

use crate::sorting::{sort_array_with_array, SortKey};
use crate::table::{
    item_editable, resolve_header, ChangeNotifier, ItemFlags, ModelError, ModelEvent, Orientation,
    SortOrder, TabularModel,
};
use crate::types::{ServiceName, DEFAULT_SERVICE_NAME_HEADERS};

/// Single-column table of service names.
#[derive(Debug, Default)]
pub struct ServiceNameTable {
    headers: Vec<String>,
    names: Vec<ServiceName>,
    notifier: ChangeNotifier,
}

impl ServiceNameTable {
    pub fn new(names: Vec<ServiceName>, headers: Vec<String>) -> Self {
        Self {
            headers,
            names,
            notifier: ChangeNotifier::new(),
        }
    }

    pub fn with_default_headers(names: Vec<ServiceName>) -> Self {
        let headers = DEFAULT_SERVICE_NAME_HEADERS
            .iter()
            .map(|h| h.to_string())
            .collect();
        Self::new(names, headers)
    }

    pub fn notifier_mut(&mut self) -> &mut ChangeNotifier {
        &mut self.notifier
    }

    pub fn set_services(&mut self, names: Vec<ServiceName>) {
        debug!(rows = names.len(), "replacing service names");
        self.names = names;
        self.notifier.emit(ModelEvent::ModelReset);
    }

    pub fn replace_all(&mut self, names: Vec<ServiceName>) {
        self.set_services(names);
    }

    pub fn name_at(&self, row: usize) -> Result<&str, ModelError> {
        self.names
            .get(row)
            .map(|n| n.name.as_str())
            .ok_or(ModelError::RowOutOfRange {
                row,
                len: self.names.len(),
            })
    }

    /// Index of the first row named `name`.
    pub fn row_for_name(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n.name == name)
    }
}

impl TabularModel for ServiceNameTable {
    fn row_count(&self) -> usize {
        self.names.len()
    }

    fn column_count(&self) -> usize {
        if self.names.is_empty() {
            0
        } else {
            1
        }
    }

    fn cell_text(&self, row: usize, column: usize) -> Option<String> {
        match column {
            0 => self.names.get(row).map(|n| n.name.clone()),
            _ => None,
        }
    }

    fn header_label(&self, section: usize, orientation: Orientation) -> Option<String> {
        resolve_header(orientation, section, &self.headers)
    }

    fn flags(&self, _row: usize, _column: usize) -> ItemFlags {
        item_editable()
    }

    fn sort_by(&mut self, column: usize, order: SortOrder) {
        self.notifier.emit(ModelEvent::LayoutAboutToChange);

        let mut keys: Vec<SortKey> = match column {
            0 => self
                .names
                .iter()
                .map(|n| SortKey::Text(n.name.clone()))
                .collect(),
            _ => Vec::new(),
        };
        if let Err(e) = sort_array_with_array(&mut keys, &mut self.names) {
            debug!(error = %e, "sort skipped");
        }
        if order == SortOrder::Ascending {
            self.names.reverse();
        }

        self.notifier.emit(ModelEvent::LayoutChanged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(names: &[&str]) -> ServiceNameTable {
        ServiceNameTable::with_default_headers(names.iter().map(|n| ServiceName::new(*n)).collect())
    }

    #[test]
    fn single_column() {
        let t = table(&["ssh"]);
        assert_eq!(t.column_count(), 1);
        assert_eq!(t.cell_text(0, 0).as_deref(), Some("ssh"));
        assert_eq!(t.cell_text(0, 1), None);
        assert_eq!(t.header_label(0, Orientation::Horizontal).as_deref(), Some("Name"));
        assert!(t.flags(0, 0).editable);
    }

    #[test]
    fn sort_by_name() {
        let mut t = table(&["smtp", "http", "ssh"]);
        t.sort_by(0, SortOrder::Descending);
        assert_eq!(t.rows(), vec![vec!["http"], vec!["smtp"], vec!["ssh"]]);
        t.sort_by(0, SortOrder::Ascending);
        assert_eq!(t.name_at(0).unwrap(), "ssh");
    }
}
