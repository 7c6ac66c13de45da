//! Core records for the feastgen synthetic data pipeline.
//!
//! This crate defines the five entity records of the food-delivery domain,
//! their status enums, and the in-memory `Dataset` handed from the generator
//! to sinks and to the integrity verifier.

pub mod dataset;
pub mod entities;
pub mod types;

pub use dataset::{Dataset, EntityCounts};
pub use entities::{MenuItem, Order, OrderItem, User, VendorProfile};
pub use types::{GeoPoint, OrderStatus, Role, VendorStatus};

/// Entity tables in dependency order (parents before children).
pub const TABLES_IN_DEPENDENCY_ORDER: [&str; 5] =
    ["User", "VendorProfile", "MenuItem", "Order", "OrderItem"];
