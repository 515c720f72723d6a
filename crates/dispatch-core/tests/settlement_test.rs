//! Settlement scenarios, configured price tables, drop-off ranking and
//! address resolution, exercised through the public API.

use std::sync::Arc;

use dispatch_core::errors::ErrorKind;
use dispatch_core::settlement::{CategoryRates, EcoBadge, ImpactSummary};
use dispatch_core::traits::test_helpers::{
    InMemoryDirectory, InMemoryRequestStore, StaticGeocoder, StubPaymentGateway,
};
use dispatch_core::traits::{resolve_origin, IDropOffDirectory};
use dispatch_core::*;

fn standard() -> SettlementCalculator {
    SettlementCalculator::new(PriceTable::standard())
}

#[test]
fn two_plastic_one_metal_settles_at_eighty() {
    let s = standard()
        .settle(&[
            ScrapItem::new(ScrapCategory::Plastic, 2.0),
            ScrapItem::new(ScrapCategory::Metal, 1.0),
        ])
        .unwrap();
    assert_eq!(s.total_amount, 80.0);
    assert_eq!(s.total_weight_kg, 3.0);
    assert_eq!(s.impact.co2_kg, 9.0);
    assert_eq!(s.impact.water_litres, 22.0);
    assert_eq!(s.impact.landfill_kg, 3.5);
}

#[test]
fn ewaste_uses_its_wire_name_and_rate() {
    let items: Vec<ScrapItem> =
        serde_json::from_str(r#"[{"category":"E-Waste","weight_kg":0.5}]"#).unwrap();
    assert_eq!(standard().settle(&items).unwrap().total_amount, 25.0);
}

#[test]
fn missing_category_falls_back_to_configured_price() {
    let config = DispatchConfig::from_toml(
        r#"
        [settlement]
        fallback_unit_price = 12.0
        "#,
    )
    .unwrap();
    let table = PriceTable::from_config(&config.settlement).unwrap();
    // The standard table covers every category; an explicit sparse table does not.
    let sparse = PriceTable::with_rates(
        [(ScrapCategory::Plastic, *table.rates_for(ScrapCategory::Plastic))],
        *table.fallback(),
    );
    let s = SettlementCalculator::new(sparse)
        .settle(&[ScrapItem::new(ScrapCategory::Glass, 2.0)])
        .unwrap();
    assert_eq!(s.total_amount, 24.0);
}

#[test]
fn configured_override_changes_the_rate() {
    let config = DispatchConfig::from_toml(
        r#"
        [settlement.rates.Paper]
        base_price = 12.5
        co2_kg = 1.0
        water_litres = 5.0
        landfill_kg = 1.0
        "#,
    )
    .unwrap();
    let table = PriceTable::from_config(&config.settlement).unwrap();
    assert_eq!(
        *table.rates_for(ScrapCategory::Paper),
        CategoryRates::new(12.5, 1.0, 5.0, 1.0)
    );
    assert_eq!(table.rates_for(ScrapCategory::Metal).base_price, 40.0);
}

#[test]
fn unknown_or_negative_rates_are_config_errors() {
    let unknown = DispatchConfig::from_toml(
        r#"
        [settlement.rates.Wood]
        base_price = 3.0
        co2_kg = 1.0
        water_litres = 1.0
        landfill_kg = 1.0
        "#,
    )
    .unwrap_err();
    assert_eq!(unknown.kind(), ErrorKind::Config);

    let negative = DispatchConfig::from_toml("[matching]\nradius_km = -1.0\n").unwrap_err();
    assert_eq!(negative.kind(), ErrorKind::Config);
}

#[test]
fn negative_weight_rejected_and_nothing_computed() {
    let err = standard()
        .settle(&[
            ScrapItem::new(ScrapCategory::Plastic, 1.0),
            ScrapItem::new(ScrapCategory::Paper, -0.1),
        ])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn impact_summary_crosses_every_threshold() {
    let calc = standard();
    let completed = completed_request(&calc, vec![ScrapItem::new(ScrapCategory::EWaste, 110.0)]);
    let summary = ImpactSummary::from_requests(&calc, [&completed]);
    // 1100 kg CO₂, 110 L water, 220 kg landfill.
    assert_eq!(summary.badges, vec![EcoBadge::GreenSaver, EcoBadge::WasteWarrior]);

    let more = completed_request(&calc, vec![ScrapItem::new(ScrapCategory::Plastic, 50.0)]);
    let summary = ImpactSummary::from_requests(&calc, [&completed, &more]);
    assert_eq!(
        summary.badges,
        vec![
            EcoBadge::GreenSaver,
            EcoBadge::WaterGuardian,
            EcoBadge::WasteWarrior,
            EcoBadge::EcoChampion
        ]
    );
    assert_eq!(summary.completed_pickups, 2);
    assert_eq!(summary.total_weight_kg, 160.0);
}

fn completed_request(calc: &SettlementCalculator, items: Vec<ScrapItem>) -> PickupRequest {
    let draft = PickupDraft {
        origin: Coordinate::new(0.0, 0.0).unwrap(),
        categories: items.iter().map(|i| i.category).collect(),
        preferred_date: chrono::NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        preferred_time: "09:00".parse().unwrap(),
        pickup_address: "1 Test Lane".into(),
    };
    let mut request = PickupRequest::new_pending("s-1", "u1", "c-1", &draft, chrono::Utc::now());
    let settlement = calc.settle(&items).unwrap();
    request.apply(
        dispatch_core::types::RequestPatch::completion(items, settlement, None),
        chrono::Utc::now(),
    );
    request
}

// ---- Drop-off points and geocoding ----

fn point(id: &str, lng: f64, active: bool) -> DropOffPoint {
    DropOffPoint {
        id: id.into(),
        name: format!("Point {id}"),
        location: Coordinate::new(0.0, lng).unwrap(),
        address: format!("{id} Depot Road"),
        active,
    }
}

#[test]
fn engine_ranks_active_drop_off_points() {
    let directory = Arc::new(InMemoryDirectory::new());
    for p in [point("d-far", 2.0, true), point("d-near", 0.1, true), point("d-closed", 0.01, false)] {
        directory.upsert_drop_off_point(&p).unwrap();
    }
    let engine = DispatchEngine::new(
        DispatchConfig::default(),
        Arc::new(InMemoryRequestStore::new()),
        directory.clone(),
        directory,
        Arc::new(StubPaymentGateway::new()),
    )
    .unwrap();

    let ranked = engine
        .nearest_drop_off_points(Coordinate::new(0.0, 0.0).unwrap())
        .unwrap();
    let ids: Vec<&str> = ranked.iter().map(|r| r.item.id.as_str()).collect();
    assert_eq!(ids, ["d-near", "d-far"], "no radius cap, inactive skipped");
    assert!(ranked[1].distance_km > 200.0);
}

#[test]
fn resolve_origin_maps_geocoder_outcomes() {
    let home = Coordinate::new(12.97, 77.59).unwrap();
    let geocoder = StaticGeocoder::new([("12 MG Road".to_string(), home)]);

    assert_eq!(resolve_origin(&geocoder, "  12 MG Road ").unwrap(), home);
    assert_eq!(
        resolve_origin(&geocoder, "nowhere").unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        resolve_origin(&geocoder, "   ").unwrap_err().kind(),
        ErrorKind::InvalidInput
    );
}
