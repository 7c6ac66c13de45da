use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use feastgen_core::{Dataset, OrderStatus, Role};
use feastgen_generate::ScenarioKind;
use feastgen_sink::{ExportDocument, export_json_schema};
use jsonschema::JSONSchema;
use serde_json::Value;
use uuid::Uuid;

use crate::errors::EvalError;
use crate::model::{
    CheckKind, CheckSummary, IntegrityReport, ReportSource, VerifyOptions, Violation,
};

/// Totals are sums of whole hundreds, so anything beyond float noise is real.
const AMOUNT_TOLERANCE: f64 = 1e-6;
const VENDOR_RATING_RANGE: (f64, f64) = (3.5, 5.0);

/// Verify datasets and exports against the generator's integrity rules.
#[derive(Debug, Clone, Default)]
pub struct IntegrityVerifier {
    options: VerifyOptions,
}

impl IntegrityVerifier {
    pub fn new(options: VerifyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &VerifyOptions {
        &self.options
    }

    /// Verify in-memory records, order items included.
    pub fn verify_dataset(&self, dataset: &Dataset) -> Result<IntegrityReport, EvalError> {
        self.finish(run_checks(dataset, ReportSource::Dataset, &self.options))
    }

    /// Validate a document against the export JSON Schema, then verify it.
    pub fn verify_export_value(&self, value: &Value) -> Result<IntegrityReport, EvalError> {
        validate_export_schema(value)?;
        let document: ExportDocument = serde_json::from_value(value.clone())?;
        let dataset = document.into_dataset();
        self.finish(run_checks(&dataset, ReportSource::Export, &self.options))
    }

    pub fn verify_export_file(&self, path: &Path) -> Result<IntegrityReport, EvalError> {
        let contents = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&contents)?;
        self.verify_export_value(&value)
    }

    fn finish(&self, report: IntegrityReport) -> Result<IntegrityReport, EvalError> {
        if self.options.strict && !report.is_clean() {
            return Err(EvalError::Violations(report.violation_count()));
        }
        Ok(report)
    }
}

fn validate_export_schema(value: &Value) -> Result<(), EvalError> {
    let schema = serde_json::to_value(export_json_schema())?;
    let compiled = JSONSchema::compile(&schema)
        .map_err(|err| EvalError::InvalidDocument(format!("export schema: {err}")))?;
    if let Err(errors) = compiled.validate(value) {
        let messages: Vec<String> = errors
            .take(5)
            .map(|error| format!("{} at '{}'", error, error.instance_path))
            .collect();
        return Err(EvalError::InvalidDocument(messages.join("; ")));
    }
    Ok(())
}

struct Checker {
    checks: BTreeMap<CheckKind, CheckSummary>,
    violations: Vec<Violation>,
}

impl Checker {
    fn new() -> Self {
        Self {
            checks: BTreeMap::new(),
            violations: Vec::new(),
        }
    }

    fn touch(&mut self, check: CheckKind) {
        self.checks.entry(check).or_default();
    }

    /// Record one evaluated rule; `ok == false` records a violation.
    fn assert(
        &mut self,
        check: CheckKind,
        ok: bool,
        code: &str,
        path: impl FnOnce() -> String,
        message: impl FnOnce() -> String,
    ) {
        let summary = self.checks.entry(check).or_default();
        summary.checked += 1;
        if ok {
            return;
        }
        summary.violations += 1;
        self.violations.push(Violation {
            check,
            code: code.to_string(),
            path: path(),
            message: message(),
        });
    }
}

fn run_checks(dataset: &Dataset, source: ReportSource, options: &VerifyOptions) -> IntegrityReport {
    let mut checker = Checker::new();
    let mut skipped = Vec::new();
    let with_items = source == ReportSource::Dataset;

    for check in CheckKind::ALL {
        if !with_items && check == CheckKind::TotalConsistency {
            continue;
        }
        checker.touch(check);
    }

    check_referential_closure(dataset, with_items, &mut checker);
    check_status_coupling(dataset, &mut checker);
    check_menu_cardinality(dataset, options, &mut checker);
    check_scenario_coverage(dataset, &mut checker);
    check_timestamps(dataset, &mut checker);
    check_geo_coupling(dataset, &mut checker);
    check_uniqueness(dataset, &mut checker);
    check_attribute_ranges(dataset, &mut checker);

    if with_items {
        check_order_items(dataset, options, &mut checker);
    } else {
        skipped.push(format!("{}: order items are not exported", CheckKind::TotalConsistency));
        skipped.push(format!(
            "{}: order item references and item counts",
            CheckKind::ReferentialClosure
        ));
    }

    let mut violations = checker.violations;
    violations.sort_by(|a, b| {
        (a.check, a.path.as_str(), a.code.as_str()).cmp(&(b.check, b.path.as_str(), b.code.as_str()))
    });

    IntegrityReport {
        source,
        counts: dataset.counts(),
        checks: checker.checks,
        skipped,
        violations,
    }
}

fn check_referential_closure(dataset: &Dataset, with_items: bool, checker: &mut Checker) {
    let vendor_users: HashSet<Uuid> = dataset.user_ids(Role::Vendor).into_iter().collect();
    let customers: HashSet<Uuid> = dataset.user_ids(Role::Customer).into_iter().collect();
    let couriers: HashSet<Uuid> = dataset.user_ids(Role::Courier).into_iter().collect();
    let vendors: HashSet<Uuid> = dataset.vendors.iter().map(|vendor| vendor.id).collect();

    let mut owners = HashSet::new();
    for (index, vendor) in dataset.vendors.iter().enumerate() {
        checker.assert(
            CheckKind::ReferentialClosure,
            vendor_users.contains(&vendor.user_id),
            "vendor_owner_missing",
            || format!("VendorProfile[{index}].userId"),
            || format!("owner {} is not a generated VENDOR user", vendor.user_id),
        );
        checker.assert(
            CheckKind::ReferentialClosure,
            owners.insert(vendor.user_id),
            "vendor_owner_shared",
            || format!("VendorProfile[{index}].userId"),
            || format!("user {} owns more than one vendor profile", vendor.user_id),
        );
    }
    for user in &vendor_users {
        checker.assert(
            CheckKind::ReferentialClosure,
            owners.contains(user),
            "vendor_profile_missing",
            || format!("User[{user}]"),
            || "VENDOR user has no vendor profile".to_string(),
        );
    }

    for (index, item) in dataset.menu_items.iter().enumerate() {
        checker.assert(
            CheckKind::ReferentialClosure,
            vendors.contains(&item.vendor_id),
            "menu_vendor_missing",
            || format!("MenuItem[{index}].vendorId"),
            || format!("vendor {} was not generated", item.vendor_id),
        );
    }

    for (index, order) in dataset.orders.iter().enumerate() {
        checker.assert(
            CheckKind::ReferentialClosure,
            customers.contains(&order.customer_id),
            "order_customer_missing",
            || format!("Order[{index}].customerId"),
            || format!("customer {} is not a generated CUSTOMER user", order.customer_id),
        );
        checker.assert(
            CheckKind::ReferentialClosure,
            vendors.contains(&order.vendor_id),
            "order_vendor_missing",
            || format!("Order[{index}].vendorId"),
            || format!("vendor {} was not generated", order.vendor_id),
        );
        if let Some(courier_id) = order.courier_id {
            checker.assert(
                CheckKind::ReferentialClosure,
                couriers.contains(&courier_id),
                "order_courier_missing",
                || format!("Order[{index}].courierId"),
                || format!("courier {courier_id} is not a generated COURIER user"),
            );
        }
    }

    if !with_items {
        return;
    }

    let orders: HashMap<Uuid, Uuid> = dataset
        .orders
        .iter()
        .map(|order| (order.id, order.vendor_id))
        .collect();
    let menu: HashMap<Uuid, Uuid> = dataset
        .menu_items
        .iter()
        .map(|item| (item.id, item.vendor_id))
        .collect();

    for (index, item) in dataset.order_items.iter().enumerate() {
        let order_vendor = orders.get(&item.order_id);
        let menu_vendor = menu.get(&item.menu_item_id);
        checker.assert(
            CheckKind::ReferentialClosure,
            order_vendor.is_some(),
            "order_item_order_missing",
            || format!("OrderItem[{index}].orderId"),
            || format!("order {} was not generated", item.order_id),
        );
        checker.assert(
            CheckKind::ReferentialClosure,
            menu_vendor.is_some(),
            "order_item_menu_missing",
            || format!("OrderItem[{index}].menuItemId"),
            || format!("menu item {} was not generated", item.menu_item_id),
        );
        if let (Some(order_vendor), Some(menu_vendor)) = (order_vendor, menu_vendor) {
            checker.assert(
                CheckKind::ReferentialClosure,
                order_vendor == menu_vendor,
                "order_item_cross_vendor",
                || format!("OrderItem[{index}].menuItemId"),
                || {
                    format!(
                        "menu item belongs to vendor {menu_vendor}, order to vendor {order_vendor}"
                    )
                },
            );
        }
    }
}

fn check_order_items(dataset: &Dataset, options: &VerifyOptions, checker: &mut Checker) {
    let items_by_order = dataset.items_by_order();
    for (index, order) in dataset.orders.iter().enumerate() {
        let items = items_by_order.get(&order.id).map(Vec::as_slice).unwrap_or(&[]);

        let sum: f64 = items.iter().map(|item| item.price).sum();
        checker.assert(
            CheckKind::TotalConsistency,
            (order.total_amount - sum).abs() <= AMOUNT_TOLERANCE,
            "total_mismatch",
            || format!("Order[{index}].totalAmount"),
            || format!("total {} differs from item sum {sum}", order.total_amount),
        );

        checker.assert(
            CheckKind::Cardinality,
            options.items_per_order.contains(items.len() as u64),
            "order_items_out_of_range",
            || format!("Order[{index}]"),
            || {
                format!(
                    "{} items, expected {}..={}",
                    items.len(),
                    options.items_per_order.min,
                    options.items_per_order.max
                )
            },
        );

        let mut menu_items = HashSet::new();
        for item in items {
            checker.assert(
                CheckKind::Cardinality,
                menu_items.insert(item.menu_item_id),
                "order_item_repeated",
                || format!("Order[{index}]"),
                || format!("menu item {} appears twice", item.menu_item_id),
            );
        }
    }
}

fn check_status_coupling(dataset: &Dataset, checker: &mut Checker) {
    for (index, order) in dataset.orders.iter().enumerate() {
        checker.assert(
            CheckKind::StatusCoupling,
            order.courier_id.is_some() == order.status.requires_courier(),
            "courier_status_mismatch",
            || format!("Order[{index}].courierId"),
            || match order.courier_id {
                Some(_) => format!("courier set on {} order", order.status),
                None => format!("courier missing on {} order", order.status),
            },
        );
    }
}

fn check_menu_cardinality(dataset: &Dataset, options: &VerifyOptions, checker: &mut Checker) {
    let menus = dataset.menu_by_vendor();
    for (index, vendor) in dataset.vendors.iter().enumerate() {
        let count = menus.get(&vendor.id).map_or(0, Vec::len);
        checker.assert(
            CheckKind::Cardinality,
            options.menu_items_per_vendor.contains(count as u64),
            "menu_count_out_of_range",
            || format!("VendorProfile[{index}]"),
            || {
                format!(
                    "{count} menu items, expected {}..={}",
                    options.menu_items_per_vendor.min, options.menu_items_per_vendor.max
                )
            },
        );
    }
}

fn check_scenario_coverage(dataset: &Dataset, checker: &mut Checker) {
    let mut expected: BTreeMap<OrderStatus, usize> = BTreeMap::new();
    for kind in ScenarioKind::ACTIVE {
        if let Some(status) = kind.active_status() {
            *expected.entry(status).or_default() += 1;
        }
    }

    let mut found: BTreeMap<OrderStatus, usize> = BTreeMap::new();
    for order in &dataset.orders {
        *found.entry(order.status).or_default() += 1;
    }

    for (status, want) in expected {
        let have = found.get(&status).copied().unwrap_or(0);
        checker.assert(
            CheckKind::ScenarioCoverage,
            have >= want,
            "scenario_missing",
            || format!("Order.status={status}"),
            || format!("{have} {status} order(s), active scenarios need {want}"),
        );
    }

    let delivered = found.get(&OrderStatus::Delivered).copied().unwrap_or(0);
    let cancelled = found.get(&OrderStatus::Cancelled).copied().unwrap_or(0);
    if delivered + cancelled == 0 {
        return;
    }
    checker.assert(
        CheckKind::ScenarioCoverage,
        cancelled < delivered,
        "historical_mix",
        || "Order.status".to_string(),
        || format!("{cancelled} CANCELLED vs {delivered} DELIVERED historical orders"),
    );
}

fn check_timestamps(dataset: &Dataset, checker: &mut Checker) {
    for (index, order) in dataset.orders.iter().enumerate() {
        let (ok, expectation) = if order.status == OrderStatus::Delivered {
            (order.updated_at > order.created_at, "after")
        } else {
            (order.updated_at == order.created_at, "equal to")
        };
        checker.assert(
            CheckKind::Timestamps,
            ok,
            "timestamp_coupling",
            || format!("Order[{index}].updatedAt"),
            || format!("{} order must have updatedAt {expectation} createdAt", order.status),
        );
    }
}

fn check_geo_coupling(dataset: &Dataset, checker: &mut Checker) {
    for (index, user) in dataset.users.iter().enumerate() {
        let position = user.position();
        let half_position = position.is_none()
            && (user.current_lat.is_some() || user.current_lng.is_some());
        let ok = !half_position
            && position.is_some() == (user.role == Role::Courier)
            && position.is_none_or(|point| point.is_valid());
        checker.assert(
            CheckKind::GeoCoupling,
            ok,
            "geo_position_mismatch",
            || format!("User[{index}].currentLat"),
            || format!("{} user has inconsistent geo-position", user.role),
        );
    }
    for (index, order) in dataset.orders.iter().enumerate() {
        checker.assert(
            CheckKind::GeoCoupling,
            order.delivery_point().is_valid(),
            "delivery_point_out_of_range",
            || format!("Order[{index}].deliveryLat"),
            || "delivery coordinates are outside degree ranges".to_string(),
        );
    }
}

fn check_uniqueness(dataset: &Dataset, checker: &mut Checker) {
    let mut emails = HashSet::new();
    for (index, user) in dataset.users.iter().enumerate() {
        checker.assert(
            CheckKind::Uniqueness,
            emails.insert(user.email.to_lowercase()),
            "duplicate_email",
            || format!("User[{index}].email"),
            || format!("email {} is used more than once", user.email),
        );
    }

    let mut ids = HashSet::new();
    let all_ids = dataset
        .users
        .iter()
        .map(|user| ("User", user.id))
        .chain(dataset.vendors.iter().map(|vendor| ("VendorProfile", vendor.id)))
        .chain(dataset.menu_items.iter().map(|item| ("MenuItem", item.id)))
        .chain(dataset.orders.iter().map(|order| ("Order", order.id)))
        .chain(dataset.order_items.iter().map(|item| ("OrderItem", item.id)));
    for (table, id) in all_ids {
        checker.assert(
            CheckKind::Uniqueness,
            ids.insert(id),
            "duplicate_id",
            || format!("{table}[{id}]"),
            || "id is used by more than one record".to_string(),
        );
    }
}

fn check_attribute_ranges(dataset: &Dataset, checker: &mut Checker) {
    let (min_rating, max_rating) = VENDOR_RATING_RANGE;
    for (index, vendor) in dataset.vendors.iter().enumerate() {
        checker.assert(
            CheckKind::AttributeRanges,
            (min_rating..=max_rating).contains(&vendor.rating),
            "vendor_rating_out_of_range",
            || format!("VendorProfile[{index}].rating"),
            || format!("rating {} outside {min_rating}..={max_rating}", vendor.rating),
        );
    }
    for (index, item) in dataset.menu_items.iter().enumerate() {
        checker.assert(
            CheckKind::AttributeRanges,
            item.price > 0.0 && item.price % 100.0 == 0.0,
            "menu_price_not_rounded",
            || format!("MenuItem[{index}].price"),
            || format!("price {} is not a positive multiple of 100", item.price),
        );
    }
}
