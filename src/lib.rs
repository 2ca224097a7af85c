//! Library crate for scan-service-tables: headless table models over scanned services.
pub mod loader;
pub mod server;
pub mod service_names;
pub mod services;
pub mod sorting;
pub mod table;
pub mod types;

pub use service_names::ServiceNameTable;
pub use services::ServiceRecordTable;
pub use table::{ModelError, ModelEvent, Orientation, SortOrder, TabularModel};
pub use types::{ServiceName, ServiceRecord, StateIcon};
