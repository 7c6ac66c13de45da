use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{MenuItem, Order, OrderItem, User, VendorProfile};
use crate::types::Role;

/// Flat record sets produced by one generation run.
///
/// Records are never mutated after generation; sinks only read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub users: Vec<User>,
    pub vendors: Vec<VendorProfile>,
    pub menu_items: Vec<MenuItem>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
}

/// Row counts per entity table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityCounts {
    pub users: u64,
    pub vendors: u64,
    pub menu_items: u64,
    pub orders: u64,
    pub order_items: u64,
}

impl Dataset {
    pub fn counts(&self) -> EntityCounts {
        EntityCounts {
            users: self.users.len() as u64,
            vendors: self.vendors.len() as u64,
            menu_items: self.menu_items.len() as u64,
            orders: self.orders.len() as u64,
            order_items: self.order_items.len() as u64,
        }
    }

    pub fn user_ids(&self, role: Role) -> Vec<Uuid> {
        self.users
            .iter()
            .filter(|user| user.role == role)
            .map(|user| user.id)
            .collect()
    }

    /// Menu items grouped by vendor id, preserving generation order.
    pub fn menu_by_vendor(&self) -> BTreeMap<Uuid, Vec<&MenuItem>> {
        let mut grouped: BTreeMap<Uuid, Vec<&MenuItem>> = BTreeMap::new();
        for item in &self.menu_items {
            grouped.entry(item.vendor_id).or_default().push(item);
        }
        grouped
    }

    /// Order items grouped by order id, preserving generation order.
    pub fn items_by_order(&self) -> BTreeMap<Uuid, Vec<&OrderItem>> {
        let mut grouped: BTreeMap<Uuid, Vec<&OrderItem>> = BTreeMap::new();
        for item in &self.order_items {
            grouped.entry(item.order_id).or_default().push(item);
        }
        grouped
    }
}

impl EntityCounts {
    /// Counts in dependency order, paired with table names.
    pub fn by_table(&self) -> [(&'static str, u64); 5] {
        [
            ("User", self.users),
            ("VendorProfile", self.vendors),
            ("MenuItem", self.menu_items),
            ("Order", self.orders),
            ("OrderItem", self.order_items),
        ]
    }
}
