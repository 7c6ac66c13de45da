use feastgen_core::{Order, OrderItem};
use rand::Rng;
use tracing::{debug, info};
use uuid::Uuid;

use super::FactoryContext;
use crate::errors::GenerationError;
use crate::foreign::{MenuLookup, ParentKeys};
use crate::rng::{jitter, random_uuid};
use crate::scenario::ScenarioComposer;

/// Generate the scenario order mix and the line items of every order.
///
/// Each order buys from a single vendor; its total is the sum of the prices
/// captured in its line items.
pub fn generate_orders<R: Rng + ?Sized>(
    ctx: &mut FactoryContext<'_>,
    rng: &mut R,
    customer_ids: &[Uuid],
    courier_ids: &[Uuid],
    item_lookup: &MenuLookup,
) -> Result<(Vec<Order>, Vec<OrderItem>), GenerationError> {
    if item_lookup.is_empty() {
        return Err(GenerationError::EmptyUpstream {
            stage: "orders",
            parent: "menu item",
        });
    }
    let customers = ParentKeys::new("orders", "customer", customer_ids)?;

    let plan = ScenarioComposer::new(ctx.options, ctx.anchor).plan(rng);
    let couriers = if plan.iter().any(|planned| planned.needs_courier()) {
        Some(ParentKeys::new("orders", "courier", courier_ids)?)
    } else {
        None
    };

    info!(orders = plan.len(), menu_items = item_lookup.len(), "generating orders");

    let mut orders = Vec::with_capacity(plan.len());
    let mut order_items = Vec::new();

    for planned in plan {
        let order_id = random_uuid(rng);
        let customer_id = customers.pick(rng);
        let (vendor_id, basket) = item_lookup.pick_basket(rng, ctx.options.items_per_order)?;

        let courier_id = match (&couriers, planned.needs_courier()) {
            (Some(couriers), true) => Some(couriers.pick(rng)),
            _ => None,
        };

        let destination = jitter(rng, ctx.options.reference_point, ctx.options.jitter_degrees);
        let total_amount: f64 = basket.iter().map(|entry| entry.price).sum();

        for entry in &basket {
            order_items.push(OrderItem {
                id: random_uuid(rng),
                order_id,
                menu_item_id: entry.menu_item_id,
                quantity: 1,
                price: entry.price,
            });
        }

        debug!(
            order_id = %order_id,
            scenario = planned.kind.as_str(),
            status = %planned.status,
            items = basket.len(),
            "order planned"
        );

        orders.push(Order {
            id: order_id,
            customer_id,
            vendor_id,
            courier_id,
            status: planned.status,
            total_amount,
            delivery_address: ctx.faker.address(rng),
            delivery_lat: destination.lat,
            delivery_lng: destination.lng,
            created_at: planned.created_at,
            updated_at: planned.updated_at,
        });
    }

    Ok((orders, order_items))
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::foreign::LookupEntry;
    use crate::model::GenerateOptions;

    fn id(byte: u8) -> Uuid {
        Uuid::from_bytes([byte; 16])
    }

    fn lookup() -> MenuLookup {
        let mut lookup = MenuLookup::new();
        for n in 0..5 {
            lookup.push(LookupEntry {
                menu_item_id: id(100 + n),
                vendor_id: id(1),
                price: 2500.0 + f64::from(n) * 100.0,
            });
        }
        lookup
    }

    #[test]
    fn empty_lookup_is_fatal() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let result = generate_orders(
            &mut ctx,
            &mut ChaCha8Rng::seed_from_u64(1),
            &[id(1)],
            &[id(2)],
            &MenuLookup::new(),
        );
        assert!(matches!(
            result,
            Err(GenerationError::EmptyUpstream {
                parent: "menu item",
                ..
            })
        ));
    }

    #[test]
    fn missing_couriers_is_fatal_when_dispatch_is_planned() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let result = generate_orders(
            &mut ctx,
            &mut ChaCha8Rng::seed_from_u64(1),
            &[id(1)],
            &[],
            &lookup(),
        );
        assert!(matches!(
            result,
            Err(GenerationError::EmptyUpstream {
                parent: "courier",
                ..
            })
        ));
    }

    #[test]
    fn totals_equal_item_sums_and_couriers_follow_status() {
        let options = GenerateOptions::default();
        let anchor = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut ctx = FactoryContext::new(&options, anchor);
        let (orders, items) = generate_orders(
            &mut ctx,
            &mut ChaCha8Rng::seed_from_u64(12),
            &[id(7), id(8)],
            &[id(9)],
            &lookup(),
        )
        .expect("orders");

        assert_eq!(orders.len(), 30);
        for order in &orders {
            let lines: Vec<&OrderItem> =
                items.iter().filter(|item| item.order_id == order.id).collect();
            assert!((1..=3).contains(&lines.len()));
            let sum: f64 = lines.iter().map(|item| item.price).sum();
            assert_eq!(order.total_amount, sum);
            assert_eq!(order.courier_id.is_some(), order.status.requires_courier());
            assert_eq!(order.vendor_id, id(1));
        }
    }
}
