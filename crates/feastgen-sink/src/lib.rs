//! Dataset sinks: Postgres store and nested JSON export.

pub mod destination;
pub mod errors;
pub mod export;
pub mod store;

pub use destination::{
    DEFAULT_EXPORT_PATH, Destination, ExportDestination, Sink, SinkReport, StoreDestination,
    TableWrite, deliver,
};
pub use errors::{SinkError, SinkResult};
pub use export::{
    ExportDocument, ExportMenuItem, ExportSink, ExportVendor, MenuReview, export_json_schema,
    read_document, write_bytes_atomic, write_document,
};
pub use store::{redact_database_url, PostgresSink, SqlValue, StoreOptions, StoreRecord};
