//! The tabular-provider contract shared by the service tables, plus the small
//! helpers every provider leans on (header resolution, item flags, change events).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::StateIcon;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("row {row} out of range (row count {len})")]
    RowOutOfRange { row: usize, len: usize },

    #[error("sort key count {keys} does not match row count {items}")]
    KeyCountMismatch { keys: usize, items: usize },
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Sort direction as reported by the hosting view's header indicator.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// What a view may do with a cell.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub enabled: bool,
    pub selectable: bool,
    pub editable: bool,
}

/// Enabled and selectable, never editable.
pub fn item_interactive() -> ItemFlags {
    ItemFlags {
        enabled: true,
        selectable: true,
        editable: false,
    }
}

pub fn item_editable() -> ItemFlags {
    ItemFlags {
        editable: true,
        ..item_interactive()
    }
}

/// Header text for `section`: the configured label horizontally, a 1-based row number vertically.
pub fn resolve_header(orientation: Orientation, section: usize, headers: &[String]) -> Option<String> {
    match orientation {
        Orientation::Horizontal => headers.get(section).cloned(),
        Orientation::Vertical => Some((section + 1).to_string()),
    }
}

/// Notifications a listening view reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    /// Rows are about to be reordered; row indices held by the view are still valid.
    LayoutAboutToChange,
    /// Rows were reordered in place.
    LayoutChanged,
    /// The record sequence was replaced; all previously held row indices are invalid.
    ModelReset,
}

type Listener = Box<dyn FnMut(ModelEvent) + Send + Sync>;

#[derive(Default)]
pub struct ChangeNotifier {
    listeners: Vec<Listener>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(ModelEvent) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&mut self, event: ModelEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A table any view (GUI, terminal, HTTP, test harness) can render and sort.
pub trait TabularModel {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    /// Display text of a cell; `None` for cells the model does not provide.
    fn cell_text(&self, row: usize, column: usize) -> Option<String>;

    /// Icon shown before the cell text, if any.
    fn decoration(&self, _row: usize, _column: usize) -> Option<StateIcon> {
        None
    }

    fn header_label(&self, section: usize, orientation: Orientation) -> Option<String>;

    fn flags(&self, _row: usize, _column: usize) -> ItemFlags {
        item_interactive()
    }

    /// Reorder rows after the user clicked the header of `column`.
    fn sort_by(&mut self, column: usize, order: SortOrder);

    /// Snapshot of every row's display text, empty strings for cells without text.
    fn rows(&self) -> Vec<Vec<String>> {
        let columns = self.column_count();
        (0..self.row_count())
            .map(|row| {
                (0..columns)
                    .map(|col| self.cell_text(row, col).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    /// All horizontal header labels.
    fn headers(&self) -> Vec<String> {
        (0..self.column_count())
            .map(|col| {
                self.header_label(col, Orientation::Horizontal)
                    .unwrap_or_default()
            })
            .collect()
    }
}
