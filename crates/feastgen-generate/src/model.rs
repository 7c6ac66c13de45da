use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use feastgen_core::{EntityCounts, GeoPoint};
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::faker::LocaleKey;

/// Inclusive integer bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: u64) -> bool {
        value >= u64::from(self.min) && value <= u64::from(self.max)
    }
}

/// Options for a generation run.
///
/// Every field has a default, so a TOML config only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Run seed. A fresh seed is drawn when absent.
    pub seed: Option<u64>,
    /// Reference "now" for every timestamp. Wall-clock time when absent.
    pub anchor: Option<DateTime<Utc>>,
    /// Faker locale for names and addresses.
    pub locale: LocaleKey,
    pub customers: u32,
    pub couriers: u32,
    pub vendor_owners: u32,
    pub menu_items_per_vendor: CountRange,
    pub items_per_order: CountRange,
    pub historical_orders: u32,
    /// Age of historical orders, in days.
    pub historical_days: CountRange,
    /// Active orders are placed within this many minutes before the anchor.
    pub active_window_minutes: u32,
    pub delivered_weight: u32,
    pub cancelled_weight: u32,
    /// Completion offset applied to `updatedAt` of delivered orders.
    pub delivery_minutes: u32,
    /// Centre of the service area.
    pub reference_point: GeoPoint,
    /// Uniform jitter radius around the reference point, in degrees.
    pub jitter_degrees: f64,
    /// Maximum attempts to mint a unique email.
    pub max_attempts_unique: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            anchor: None,
            locale: LocaleKey::EnUs,
            customers: 50,
            couriers: 10,
            vendor_owners: 15,
            menu_items_per_vendor: CountRange::new(5, 10),
            items_per_order: CountRange::new(1, 3),
            historical_orders: 25,
            historical_days: CountRange::new(1, 30),
            active_window_minutes: 60,
            delivered_weight: 3,
            cancelled_weight: 1,
            delivery_minutes: 45,
            reference_point: GeoPoint::new(6.5244, 3.3792),
            jitter_degrees: 0.05,
            max_attempts_unique: 50,
        }
    }
}

/// Upper bound for `historical_days`, keeping timestamps inside chrono's range.
pub const MAX_HISTORICAL_DAYS: u32 = 36_500;
/// Upper bound for minute offsets (`active_window_minutes`, `delivery_minutes`).
pub const MAX_OFFSET_MINUTES: u32 = 525_600;

impl GenerateOptions {
    /// Reject option combinations no run could satisfy.
    pub fn validate(&self) -> Result<(), GenerationError> {
        check_range("menu_items_per_vendor", self.menu_items_per_vendor)?;
        check_range("items_per_order", self.items_per_order)?;
        if self.items_per_order.min > self.menu_items_per_vendor.min {
            return Err(GenerationError::InvalidConfig(format!(
                "items_per_order: min {} exceeds the smallest menu size {}",
                self.items_per_order.min, self.menu_items_per_vendor.min
            )));
        }
        if self.historical_days.min > self.historical_days.max {
            return Err(GenerationError::InvalidConfig(format!(
                "historical_days: min {} exceeds max {}",
                self.historical_days.min, self.historical_days.max
            )));
        }
        if self.historical_days.max > MAX_HISTORICAL_DAYS {
            return Err(GenerationError::InvalidConfig(format!(
                "historical_days: max {} exceeds {MAX_HISTORICAL_DAYS}",
                self.historical_days.max
            )));
        }
        for (name, minutes) in [
            ("active_window_minutes", self.active_window_minutes),
            ("delivery_minutes", self.delivery_minutes),
        ] {
            if minutes > MAX_OFFSET_MINUTES {
                return Err(GenerationError::InvalidConfig(format!(
                    "{name}: {minutes} exceeds {MAX_OFFSET_MINUTES}"
                )));
            }
        }
        match self.delivered_weight.checked_add(self.cancelled_weight) {
            Some(0) => {
                return Err(GenerationError::InvalidConfig(
                    "delivered_weight and cancelled_weight cannot both be zero".to_string(),
                ));
            }
            None => {
                return Err(GenerationError::InvalidConfig(
                    "delivered_weight + cancelled_weight overflows".to_string(),
                ));
            }
            Some(_) => {}
        }
        if !self.jitter_degrees.is_finite() || self.jitter_degrees < 0.0 {
            return Err(GenerationError::InvalidConfig(format!(
                "jitter_degrees must be a non-negative number, got {}",
                self.jitter_degrees
            )));
        }
        if self.max_attempts_unique == 0 {
            return Err(GenerationError::InvalidConfig(
                "max_attempts_unique must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_range(name: &str, range: CountRange) -> Result<(), GenerationError> {
    if range.min == 0 {
        return Err(GenerationError::InvalidConfig(format!(
            "{name}: min must be at least 1"
        )));
    }
    if range.min > range.max {
        return Err(GenerationError::InvalidConfig(format!(
            "{name}: min {} exceeds max {}",
            range.min, range.max
        )));
    }
    Ok(())
}

/// Summary of a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub anchor: DateTime<Utc>,
    pub counts: EntityCounts,
    pub orders_by_status: BTreeMap<String, u64>,
    pub email_retries: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, anchor: DateTime<Utc>) -> Self {
        Self {
            run_id,
            seed,
            anchor,
            counts: EntityCounts::default(),
            orders_by_status: BTreeMap::new(),
            email_retries: 0,
            duration_ms: 0,
        }
    }

    pub fn record_status(&mut self, status: &str) {
        *self.orders_by_status.entry(status.to_string()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GenerateOptions::default()
            .validate()
            .expect("default options validate");
    }

    #[test]
    fn inverted_range_is_rejected() {
        let options = GenerateOptions {
            items_per_order: CountRange::new(4, 2),
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_weights_are_rejected() {
        let options = GenerateOptions {
            delivered_weight: 0,
            cancelled_weight: 0,
            ..GenerateOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn overflowing_weights_are_rejected() {
        let options = GenerateOptions {
            delivered_weight: u32::MAX,
            cancelled_weight: 1,
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn out_of_range_offsets_are_rejected() {
        let days = GenerateOptions {
            historical_days: CountRange::new(1, u32::MAX),
            ..GenerateOptions::default()
        };
        assert!(matches!(
            days.validate(),
            Err(GenerationError::InvalidConfig(_))
        ));

        let minutes = GenerateOptions {
            delivery_minutes: u32::MAX,
            ..GenerateOptions::default()
        };
        assert!(minutes.validate().is_err());

        let edge = GenerateOptions {
            historical_days: CountRange::new(1, MAX_HISTORICAL_DAYS),
            ..GenerateOptions::default()
        };
        edge.validate().expect("cap itself is accepted");
    }

    #[test]
    fn basket_larger_than_smallest_menu_is_rejected() {
        let options = GenerateOptions {
            menu_items_per_vendor: CountRange::new(1, 2),
            items_per_order: CountRange::new(3, 3),
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidConfig(_))
        ));
    }
}
