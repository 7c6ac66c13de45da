//! Nested JSON export for offline frontend work.
//!
//! Vendors embed their menu items; users and orders stay flat. Order items
//! are not exported.

mod atomic;

pub use atomic::write_bytes_atomic;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use feastgen_core::{Dataset, MenuItem, Order, User, VendorProfile};
use schemars::schema::RootSchema;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::destination::{Sink, SinkReport, TableWrite};
use crate::errors::SinkResult;

/// Top-level export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExportDocument {
    pub users: Vec<User>,
    pub vendors: Vec<ExportVendor>,
    pub orders: Vec<Order>,
}

/// Vendor profile with its menu embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExportVendor {
    #[serde(flatten)]
    pub profile: VendorProfile,
    pub menu_items: Vec<ExportMenuItem>,
}

/// Menu item as the app reads it, with its (always empty) review list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExportMenuItem {
    #[serde(flatten)]
    pub item: MenuItem,
    pub reviews: Vec<MenuReview>,
}

impl From<MenuItem> for ExportMenuItem {
    fn from(item: MenuItem) -> Self {
        Self {
            item,
            reviews: Vec::new(),
        }
    }
}

/// Customer review attached to a menu item. Generation never produces any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuReview {
    pub id: String,
    pub user_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_avatar: Option<String>,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl ExportDocument {
    /// Denormalize flat record sets. Vendor and menu order is preserved.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut menus = dataset.menu_by_vendor();
        let vendors = dataset
            .vendors
            .iter()
            .map(|vendor| ExportVendor {
                profile: vendor.clone(),
                menu_items: menus
                    .remove(&vendor.id)
                    .unwrap_or_default()
                    .into_iter()
                    .cloned()
                    .map(ExportMenuItem::from)
                    .collect(),
            })
            .collect();

        Self {
            users: dataset.users.clone(),
            vendors,
            orders: dataset.orders.clone(),
        }
    }

    /// Flatten back into record sets. Order items are absent from exports.
    pub fn into_dataset(self) -> Dataset {
        let mut vendors = Vec::with_capacity(self.vendors.len());
        let mut menu_items = Vec::new();
        for vendor in self.vendors {
            vendors.push(vendor.profile);
            menu_items.extend(vendor.menu_items.into_iter().map(|entry| entry.item));
        }
        Dataset {
            users: self.users,
            vendors,
            menu_items,
            orders: self.orders,
            order_items: Vec::new(),
        }
    }

    pub fn menu_item_count(&self) -> usize {
        self.vendors.iter().map(|vendor| vendor.menu_items.len()).sum()
    }
}

/// JSON Schema of the export document.
pub fn export_json_schema() -> RootSchema {
    schema_for!(ExportDocument)
}

/// Serialize and atomically write a document; returns bytes written.
pub fn write_document(path: &Path, document: &ExportDocument) -> SinkResult<u64> {
    let data = serde_json::to_vec_pretty(document)?;
    write_bytes_atomic(path, &data)?;
    Ok(data.len() as u64)
}

pub fn read_document(path: &Path) -> SinkResult<ExportDocument> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Sink writing the nested export document to one file.
#[derive(Debug, Clone)]
pub struct ExportSink {
    path: PathBuf,
}

impl ExportSink {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl Sink for ExportSink {
    fn kind(&self) -> &'static str {
        "json"
    }

    async fn deliver(&self, dataset: &Dataset) -> SinkResult<SinkReport> {
        let document = ExportDocument::from_dataset(dataset);
        let bytes = write_document(&self.path, &document)?;

        info!(
            path = %self.path.display(),
            users = document.users.len(),
            vendors = document.vendors.len(),
            menu_items = document.menu_item_count(),
            orders = document.orders.len(),
            bytes,
            "export written"
        );

        Ok(SinkReport {
            sink: self.kind().to_string(),
            tables: vec![
                TableWrite {
                    table: "User".to_string(),
                    rows: document.users.len() as u64,
                },
                TableWrite {
                    table: "VendorProfile".to_string(),
                    rows: document.vendors.len() as u64,
                },
                TableWrite {
                    table: "MenuItem".to_string(),
                    rows: document.menu_item_count() as u64,
                },
                TableWrite {
                    table: "Order".to_string(),
                    rows: document.orders.len() as u64,
                },
            ],
            path: Some(self.path.clone()),
            bytes_written: Some(bytes),
        })
    }
}
