use std::time::Instant;

use chrono::{DateTime, Utc};
use feastgen_core::{Dataset, Role};
use tracing::info;

use crate::errors::GenerationError;
use crate::factories::{
    FactoryContext, generate_menu_items, generate_orders, generate_users, generate_vendors,
};
use crate::model::{GenerateOptions, GenerationReport};
use crate::rng::{fresh_seed, random_uuid, stage_rng, truncate_millis};

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: Dataset,
    pub report: GenerationReport,
}

/// Runs the entity factories in dependency order:
/// users, vendor profiles, menu items, then orders with their items.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn run(&self) -> Result<GenerationResult, GenerationError> {
        self.options.validate()?;

        let start = Instant::now();
        let seed = self.options.seed.unwrap_or_else(fresh_seed);
        let anchor: DateTime<Utc> = truncate_millis(self.options.anchor.unwrap_or_else(Utc::now));
        let run_id = random_uuid(&mut stage_rng(seed, "run")).to_string();

        info!(
            run_id = %run_id,
            seed,
            anchor = %anchor.to_rfc3339(),
            locale = %self.options.locale,
            "generation started"
        );

        let mut report = GenerationReport::new(run_id.clone(), seed, anchor);
        let mut ctx = FactoryContext::new(&self.options, anchor);

        let (customer_ids, customers) = generate_users(
            &mut ctx,
            &mut stage_rng(seed, "users.CUSTOMER"),
            Role::Customer,
            self.options.customers,
        )?;
        let (courier_ids, couriers) = generate_users(
            &mut ctx,
            &mut stage_rng(seed, "users.COURIER"),
            Role::Courier,
            self.options.couriers,
        )?;
        let (owner_ids, owners) = generate_users(
            &mut ctx,
            &mut stage_rng(seed, "users.VENDOR"),
            Role::Vendor,
            self.options.vendor_owners,
        )?;
        let users: Vec<_> = customers.into_iter().chain(couriers).chain(owners).collect();
        info!(entity = "User", count = users.len(), "entities generated");

        let vendors = generate_vendors(&mut ctx, &mut stage_rng(seed, "vendors"), &owner_ids)?;
        info!(entity = "VendorProfile", count = vendors.len(), "entities generated");

        let vendor_ids: Vec<_> = vendors.iter().map(|vendor| vendor.id).collect();
        let (lookup, menu_items) =
            generate_menu_items(&mut ctx, &mut stage_rng(seed, "menu_items"), &vendor_ids)?;
        info!(entity = "MenuItem", count = menu_items.len(), "entities generated");

        let (orders, order_items) = generate_orders(
            &mut ctx,
            &mut stage_rng(seed, "orders"),
            &customer_ids,
            &courier_ids,
            &lookup,
        )?;
        info!(entity = "Order", count = orders.len(), "entities generated");
        info!(entity = "OrderItem", count = order_items.len(), "entities generated");

        for order in &orders {
            report.record_status(order.status.as_str());
        }
        report.email_retries = ctx.email_retries();

        let dataset = Dataset {
            users,
            vendors,
            menu_items,
            orders,
            order_items,
        };
        report.counts = dataset.counts();
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            run_id = %run_id,
            users = report.counts.users,
            vendors = report.counts.vendors,
            menu_items = report.counts.menu_items,
            orders = report.counts.orders,
            order_items = report.counts.order_items,
            duration_ms = report.duration_ms,
            "generation completed"
        );

        Ok(GenerationResult { dataset, report })
    }
}
