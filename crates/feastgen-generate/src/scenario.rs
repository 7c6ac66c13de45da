//! Order scenario planning: which statuses to generate and when.

use chrono::{DateTime, Duration, Utc};
use feastgen_core::OrderStatus;
use rand::Rng;

use crate::model::GenerateOptions;

/// Operational flow an order is generated for.
///
/// `NewOrder` and `CustomerPickup` share the stored status `PLACED`; the
/// distinction is not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    Historical,
    NewOrder,
    AwaitingCourier,
    RiderAssigned,
    InTransit,
    CustomerPickup,
}

impl ScenarioKind {
    pub const ACTIVE: [ScenarioKind; 5] = [
        Self::NewOrder,
        Self::AwaitingCourier,
        Self::RiderAssigned,
        Self::InTransit,
        Self::CustomerPickup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::NewOrder => "new_order",
            Self::AwaitingCourier => "awaiting_courier",
            Self::RiderAssigned => "rider_assigned",
            Self::InTransit => "in_transit",
            Self::CustomerPickup => "customer_pickup",
        }
    }

    /// Stored status for an active scenario. Historical orders draw theirs.
    pub fn active_status(self) -> Option<OrderStatus> {
        match self {
            Self::Historical => None,
            Self::NewOrder | Self::CustomerPickup => Some(OrderStatus::Placed),
            Self::AwaitingCourier => Some(OrderStatus::ReadyForPickup),
            Self::RiderAssigned => Some(OrderStatus::RiderAssigned),
            Self::InTransit => Some(OrderStatus::PickedUp),
        }
    }
}

/// One order to generate: its scenario, status, and timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedOrder {
    pub kind: ScenarioKind,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlannedOrder {
    pub fn needs_courier(&self) -> bool {
        self.status.requires_courier()
    }
}

/// Composes the historical + active order mix for one run.
#[derive(Debug, Clone)]
pub struct ScenarioComposer<'a> {
    options: &'a GenerateOptions,
    anchor: DateTime<Utc>,
}

impl<'a> ScenarioComposer<'a> {
    pub fn new(options: &'a GenerateOptions, anchor: DateTime<Utc>) -> Self {
        Self { options, anchor }
    }

    pub fn plan<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<PlannedOrder> {
        let historical = self.options.historical_orders as usize;
        let mut plan = Vec::with_capacity(historical + ScenarioKind::ACTIVE.len());

        let mut cancelled = 0_usize;
        for _ in 0..historical {
            let mut status = self.draw_historical_status(rng);
            // cancellations stay strictly below half of the historical set
            if status == OrderStatus::Cancelled && (cancelled + 1) * 2 >= historical {
                status = OrderStatus::Delivered;
            }
            if status == OrderStatus::Cancelled {
                cancelled += 1;
            }
            let days = rng.random_range(
                self.options.historical_days.min..=self.options.historical_days.max,
            );
            let created_at = self.anchor - Duration::days(i64::from(days));
            plan.push(self.stamp(ScenarioKind::Historical, status, created_at));
        }

        for kind in ScenarioKind::ACTIVE {
            let status = kind.active_status().unwrap_or(OrderStatus::Placed);
            let minutes = rng.random_range(0..=self.options.active_window_minutes);
            let created_at = self.anchor - Duration::minutes(i64::from(minutes));
            plan.push(self.stamp(kind, status, created_at));
        }

        plan
    }

    fn draw_historical_status<R: Rng + ?Sized>(&self, rng: &mut R) -> OrderStatus {
        let delivered = self.options.delivered_weight;
        let total = delivered.saturating_add(self.options.cancelled_weight);
        if rng.random_range(0..total) < delivered {
            OrderStatus::Delivered
        } else {
            OrderStatus::Cancelled
        }
    }

    fn stamp(
        &self,
        kind: ScenarioKind,
        status: OrderStatus,
        created_at: DateTime<Utc>,
    ) -> PlannedOrder {
        let updated_at = if status.is_completed() {
            created_at + Duration::minutes(i64::from(self.options.delivery_minutes))
        } else {
            created_at
        };
        PlannedOrder {
            kind,
            status,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn plan_has_historical_then_active_orders() {
        let options = GenerateOptions::default();
        let composer = ScenarioComposer::new(&options, anchor());
        let plan = composer.plan(&mut ChaCha8Rng::seed_from_u64(1));

        assert_eq!(plan.len(), 30);
        assert!(plan[..25].iter().all(|order| order.kind == ScenarioKind::Historical));
        let active: Vec<OrderStatus> = plan[25..].iter().map(|order| order.status).collect();
        assert_eq!(
            active,
            vec![
                OrderStatus::Placed,
                OrderStatus::ReadyForPickup,
                OrderStatus::RiderAssigned,
                OrderStatus::PickedUp,
                OrderStatus::Placed,
            ]
        );
    }

    #[test]
    fn historical_cancellations_stay_below_deliveries() {
        let options = GenerateOptions {
            delivered_weight: 1,
            cancelled_weight: 9,
            ..GenerateOptions::default()
        };
        let composer = ScenarioComposer::new(&options, anchor());
        for seed in 0..20 {
            let plan = composer.plan(&mut ChaCha8Rng::seed_from_u64(seed));
            let historical: Vec<_> = plan
                .iter()
                .filter(|order| order.kind == ScenarioKind::Historical)
                .collect();
            let cancelled = historical
                .iter()
                .filter(|order| order.status == OrderStatus::Cancelled)
                .count();
            let delivered = historical.len() - cancelled;
            assert!(cancelled < delivered, "seed {seed}: {cancelled} vs {delivered}");
        }
    }

    #[test]
    fn timestamps_follow_scenario_windows() {
        let options = GenerateOptions::default();
        let composer = ScenarioComposer::new(&options, anchor());
        let plan = composer.plan(&mut ChaCha8Rng::seed_from_u64(2));

        for order in &plan {
            let age = anchor() - order.created_at;
            match order.kind {
                ScenarioKind::Historical => {
                    assert!(age >= Duration::days(1) && age <= Duration::days(30));
                }
                _ => assert!(age >= Duration::zero() && age <= Duration::minutes(60)),
            }
            if order.status == OrderStatus::Delivered {
                assert_eq!(order.updated_at - order.created_at, Duration::minutes(45));
            } else {
                assert_eq!(order.updated_at, order.created_at);
            }
        }
    }
}
