use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{GeoPoint, OrderStatus, Role, VendorStatus};

/// A platform account: customer, courier, or vendor owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub full_name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Populated only for couriers.
    pub current_lat: Option<f64>,
    /// Populated only for couriers.
    pub current_lng: Option<f64>,
    pub cash_balance: f64,
}

impl User {
    pub fn position(&self) -> Option<GeoPoint> {
        match (self.current_lat, self.current_lng) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

/// Storefront owned by exactly one vendor-role user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendorProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub location: String,
    pub address: String,
    pub status: VendorStatus,
    pub rating: f64,
    pub category: String,
    pub is_open: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub name: String,
    pub description: String,
    /// Whole currency units, always a multiple of 100.
    pub price: f64,
    pub category: String,
    pub customization: Option<String>,
    pub image_url: String,
    pub is_available: bool,
    pub prep_time_minutes: i32,
    pub rating: f64,
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vendor_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub status: OrderStatus,
    /// Sum of the captured prices of the order's items.
    pub total_amount: f64,
    pub delivery_address: String,
    pub delivery_lat: f64,
    pub delivery_lng: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn delivery_point(&self) -> GeoPoint {
        GeoPoint::new(self.delivery_lat, self.delivery_lng)
    }
}

/// Line item of an order. `price` is a copy of the menu price at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub price: f64,
}
