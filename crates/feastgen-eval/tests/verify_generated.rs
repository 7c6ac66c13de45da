use chrono::{TimeZone, Utc};
use feastgen_core::{Dataset, OrderStatus, Role};
use feastgen_eval::{CheckKind, EvalError, IntegrityVerifier, ReportSource, VerifyOptions};
use feastgen_generate::{GenerateOptions, GenerationEngine, LocaleKey};
use feastgen_sink::{ExportDocument, write_document};

fn options(seed: u64) -> GenerateOptions {
    GenerateOptions {
        seed: Some(seed),
        anchor: Some(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
        ..GenerateOptions::default()
    }
}

fn generate(seed: u64) -> Dataset {
    GenerationEngine::new(options(seed)).run().expect("generate").dataset
}

fn lenient() -> IntegrityVerifier {
    IntegrityVerifier::new(VerifyOptions::default().lenient())
}

#[test]
fn generated_datasets_pass_every_check() {
    let verifier = IntegrityVerifier::new(VerifyOptions::default());
    for seed in [1, 2, 3, 42, 1337, 9001] {
        let report = verifier
            .verify_dataset(&generate(seed))
            .unwrap_or_else(|err| panic!("seed {seed}: {err}"));
        assert!(report.is_clean());
        for check in CheckKind::ALL {
            let summary = report.checks[&check];
            assert!(summary.checked > 0, "seed {seed}: {check} never ran");
        }
    }
}

#[test]
fn pt_br_locale_passes_every_check() {
    let options = GenerateOptions {
        locale: LocaleKey::PtBr,
        ..options(77)
    };
    let dataset = GenerationEngine::new(options).run().expect("generate").dataset;
    IntegrityVerifier::default()
        .verify_dataset(&dataset)
        .expect("clean dataset");
}

#[test]
fn courier_on_a_placed_order_is_reported() {
    let mut dataset = generate(11);
    let courier = dataset.user_ids(Role::Courier)[0];
    let placed = dataset
        .orders
        .iter_mut()
        .find(|order| order.status == OrderStatus::Placed)
        .expect("placed order");
    placed.courier_id = Some(courier);

    let report = lenient().verify_dataset(&dataset).expect("report");
    assert_eq!(report.codes(), vec!["courier_status_mismatch"]);
    assert_eq!(report.checks[&CheckKind::StatusCoupling].violations, 1);
}

#[test]
fn broken_totals_and_foreign_keys_are_reported() {
    let mut dataset = generate(12);
    dataset.orders[0].total_amount += 100.0;
    let other_vendor_item = dataset
        .menu_items
        .iter()
        .find(|item| item.vendor_id != dataset.orders[1].vendor_id)
        .map(|item| item.id)
        .expect("item of another vendor");
    let order_id = dataset.orders[1].id;
    let line = dataset
        .order_items
        .iter_mut()
        .find(|item| item.order_id == order_id)
        .expect("order item");
    line.menu_item_id = other_vendor_item;

    let report = lenient().verify_dataset(&dataset).expect("report");
    let codes = report.codes();
    assert!(codes.contains(&"total_mismatch"), "{codes:?}");
    assert!(codes.contains(&"order_item_cross_vendor"), "{codes:?}");
}

#[test]
fn orphaned_vendor_and_shared_email_are_reported() {
    let mut dataset = generate(13);
    dataset.vendors[0].user_id = dataset.user_ids(Role::Customer)[0];
    let email = dataset.users[0].email.clone();
    dataset.users[1].email = email;

    let report = lenient().verify_dataset(&dataset).expect("report");
    let codes = report.codes();
    assert!(codes.contains(&"vendor_owner_missing"), "{codes:?}");
    assert!(codes.contains(&"vendor_profile_missing"), "{codes:?}");
    assert!(codes.contains(&"duplicate_email"), "{codes:?}");
}

#[test]
fn misplaced_coordinates_are_reported() {
    let mut dataset = generate(16);
    dataset.orders[0].delivery_lat = 123.0;
    let customer = dataset
        .users
        .iter_mut()
        .find(|user| user.role == Role::Customer)
        .expect("customer");
    customer.current_lat = Some(6.5);

    let report = lenient().verify_dataset(&dataset).expect("report");
    assert_eq!(report.codes(), vec!["delivery_point_out_of_range", "geo_position_mismatch"]);
    assert_eq!(report.checks[&CheckKind::GeoCoupling].violations, 2);
}

#[test]
fn missing_active_scenario_fails_strict_verification() {
    let mut dataset = generate(14);
    let index = dataset
        .orders
        .iter()
        .position(|order| order.status == OrderStatus::PickedUp)
        .expect("in-transit order");
    let removed = dataset.orders.remove(index);
    dataset.order_items.retain(|item| item.order_id != removed.id);

    match IntegrityVerifier::default().verify_dataset(&dataset) {
        Err(EvalError::Violations(1)) => {}
        other => panic!("expected one violation, got {other:?}"),
    }
}

#[test]
fn exported_file_verifies_without_order_items() {
    let dataset = generate(15);
    let path = std::env::temp_dir().join(format!("feastgen_verify_{}.json", uuid::Uuid::new_v4()));
    write_document(&path, &ExportDocument::from_dataset(&dataset)).expect("write export");

    let report = IntegrityVerifier::default()
        .verify_export_file(&path)
        .expect("clean export");
    let _ = std::fs::remove_file(&path);

    assert_eq!(report.source, ReportSource::Export);
    assert_eq!(report.counts.order_items, 0);
    assert_eq!(report.counts.menu_items, dataset.counts().menu_items);
    assert!(!report.checks.contains_key(&CheckKind::TotalConsistency));
    assert!(!report.skipped.is_empty());
}

#[test]
fn export_with_unknown_keys_is_invalid() {
    let dataset = generate(16);
    let mut value = serde_json::to_value(ExportDocument::from_dataset(&dataset)).expect("json");
    value["orderItems"] = serde_json::json!([]);

    match IntegrityVerifier::default().verify_export_value(&value) {
        Err(EvalError::InvalidDocument(message)) => assert!(!message.is_empty()),
        other => panic!("expected invalid document, got {other:?}"),
    }
}
