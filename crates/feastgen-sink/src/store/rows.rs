use chrono::{DateTime, Utc};
use feastgen_core::{MenuItem, Order, OrderItem, User, VendorProfile};
use sqlx::Postgres;
use sqlx::query_builder::Separated;
use uuid::Uuid;

/// Bindable column value. Ids are bound as text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Uuid(Option<Uuid>),
    Text(Option<String>),
    Float(Option<f64>),
    Int(i32),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            SqlValue::Uuid(None) | SqlValue::Text(None) | SqlValue::Float(None)
        )
    }

    pub(crate) fn push_bind(self, row: &mut Separated<'_, '_, Postgres, &'static str>) {
        match self {
            SqlValue::Uuid(value) => row.push_bind(value.map(|id| id.to_string())),
            SqlValue::Text(value) => row.push_bind(value),
            SqlValue::Float(value) => row.push_bind(value),
            SqlValue::Int(value) => row.push_bind(value),
            SqlValue::Bool(value) => row.push_bind(value),
            SqlValue::Timestamp(value) => row.push_bind(value),
        };
    }
}

/// Mapping of an entity record onto its table's columns.
pub trait StoreRecord {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    /// Values in `COLUMNS` order.
    fn values(&self) -> Vec<SqlValue>;
}

fn text(value: &str) -> SqlValue {
    SqlValue::Text(Some(value.to_string()))
}

impl StoreRecord for User {
    const TABLE: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "email",
        "phone",
        "password",
        "fullName",
        "role",
        "createdAt",
        "updatedAt",
        "currentLat",
        "currentLng",
        "cashBalance",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Uuid(Some(self.id)),
            text(&self.email),
            text(&self.phone),
            text(&self.password),
            text(&self.full_name),
            text(self.role.as_str()),
            SqlValue::Timestamp(self.created_at),
            SqlValue::Timestamp(self.updated_at),
            SqlValue::Float(self.current_lat),
            SqlValue::Float(self.current_lng),
            SqlValue::Float(Some(self.cash_balance)),
        ]
    }
}

impl StoreRecord for VendorProfile {
    const TABLE: &'static str = "VendorProfile";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "userId",
        "name",
        "location",
        "address",
        "status",
        "rating",
        "category",
        "isOpen",
        "createdAt",
        "updatedAt",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Uuid(Some(self.id)),
            SqlValue::Uuid(Some(self.user_id)),
            text(&self.name),
            text(&self.location),
            text(&self.address),
            text(self.status.as_str()),
            SqlValue::Float(Some(self.rating)),
            text(&self.category),
            SqlValue::Bool(self.is_open),
            SqlValue::Timestamp(self.created_at),
            SqlValue::Timestamp(self.updated_at),
        ]
    }
}

impl StoreRecord for MenuItem {
    const TABLE: &'static str = "MenuItem";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "vendorId",
        "name",
        "description",
        "price",
        "category",
        "customization",
        "imageUrl",
        "isAvailable",
        "prepTimeMinutes",
        "rating",
        "likes",
        "createdAt",
        "updatedAt",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Uuid(Some(self.id)),
            SqlValue::Uuid(Some(self.vendor_id)),
            text(&self.name),
            text(&self.description),
            SqlValue::Float(Some(self.price)),
            text(&self.category),
            SqlValue::Text(self.customization.clone()),
            text(&self.image_url),
            SqlValue::Bool(self.is_available),
            SqlValue::Int(self.prep_time_minutes),
            SqlValue::Float(Some(self.rating)),
            SqlValue::Int(self.likes),
            SqlValue::Timestamp(self.created_at),
            SqlValue::Timestamp(self.updated_at),
        ]
    }
}

impl StoreRecord for Order {
    const TABLE: &'static str = "Order";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "customerId",
        "vendorId",
        "courierId",
        "status",
        "totalAmount",
        "deliveryAddress",
        "deliveryLat",
        "deliveryLng",
        "createdAt",
        "updatedAt",
    ];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Uuid(Some(self.id)),
            SqlValue::Uuid(Some(self.customer_id)),
            SqlValue::Uuid(Some(self.vendor_id)),
            SqlValue::Uuid(self.courier_id),
            text(self.status.as_str()),
            SqlValue::Float(Some(self.total_amount)),
            text(&self.delivery_address),
            SqlValue::Float(Some(self.delivery_lat)),
            SqlValue::Float(Some(self.delivery_lng)),
            SqlValue::Timestamp(self.created_at),
            SqlValue::Timestamp(self.updated_at),
        ]
    }
}

impl StoreRecord for OrderItem {
    const TABLE: &'static str = "OrderItem";
    const COLUMNS: &'static [&'static str] =
        &["id", "orderId", "menuItemId", "quantity", "price"];

    fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Uuid(Some(self.id)),
            SqlValue::Uuid(Some(self.order_id)),
            SqlValue::Uuid(Some(self.menu_item_id)),
            SqlValue::Int(self.quantity),
            SqlValue::Float(Some(self.price)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use feastgen_core::OrderStatus;

    use super::*;

    fn values_match_columns<T: StoreRecord>(record: &T) {
        assert_eq!(record.values().len(), T::COLUMNS.len(), "{}", T::TABLE);
    }

    #[test]
    fn every_record_binds_one_value_per_column() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let id = Uuid::from_bytes([1; 16]);
        let order = Order {
            id,
            customer_id: id,
            vendor_id: id,
            courier_id: None,
            status: OrderStatus::Placed,
            total_amount: 2500.0,
            delivery_address: "1 Marina".to_string(),
            delivery_lat: 6.5,
            delivery_lng: 3.4,
            created_at: at,
            updated_at: at,
        };
        values_match_columns(&order);
        values_match_columns(&OrderItem {
            id,
            order_id: id,
            menu_item_id: id,
            quantity: 1,
            price: 2500.0,
        });

        let values = order.values();
        assert!(values[3].is_null(), "courierId is null for PLACED");
        assert_eq!(values[4], SqlValue::Text(Some("PLACED".to_string())));
    }
}
