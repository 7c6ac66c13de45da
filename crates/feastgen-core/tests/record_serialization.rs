use chrono::{TimeZone, Utc};
use feastgen_core::{Order, OrderStatus, Role, User};
use uuid::Uuid;

fn fixed_uuid(byte: u8) -> Uuid {
    Uuid::from_bytes([byte; 16])
}

#[test]
fn serializes_user_with_camel_case_keys() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let user = User {
        id: fixed_uuid(1),
        email: "ada@example.com".to_string(),
        phone: "+2348030000000".to_string(),
        password: "hashed_password_placeholder".to_string(),
        full_name: "Ada Obi".to_string(),
        role: Role::Customer,
        created_at: at,
        updated_at: at,
        current_lat: None,
        current_lng: None,
        cash_balance: 0.0,
    };

    let json = serde_json::to_string_pretty(&user).expect("serialize user");
    let expected = r#"{
  "id": "01010101-0101-0101-0101-010101010101",
  "email": "ada@example.com",
  "phone": "+2348030000000",
  "password": "hashed_password_placeholder",
  "fullName": "Ada Obi",
  "role": "CUSTOMER",
  "createdAt": "2024-01-01T12:00:00Z",
  "updatedAt": "2024-01-01T12:00:00Z",
  "currentLat": null,
  "currentLng": null,
  "cashBalance": 0.0
}"#;
    assert_eq!(json, expected);
}

#[test]
fn order_round_trips_through_json() {
    let at = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
    let order = Order {
        id: fixed_uuid(2),
        customer_id: fixed_uuid(3),
        vendor_id: fixed_uuid(4),
        courier_id: None,
        status: OrderStatus::ReadyForPickup,
        total_amount: 7300.0,
        delivery_address: "12 Allen Avenue".to_string(),
        delivery_lat: 6.5,
        delivery_lng: 3.4,
        created_at: at,
        updated_at: at,
    };

    let value = serde_json::to_value(&order).expect("serialize order");
    assert_eq!(value["status"], "READY_FOR_PICKUP");
    assert_eq!(value["courierId"], serde_json::Value::Null);
    assert_eq!(value["createdAt"], "2024-03-09T08:30:00Z");

    let parsed: Order = serde_json::from_value(value).expect("parse order");
    assert_eq!(parsed, order);
}
