//! Releases and redeliveries stored through the service facade.

use std::sync::Arc;

use chrono::Utc;
use depot_lifecycle::domain::{Party, Redelivery, Release};
use depot_lifecycle::lifecycle::fixtures::{
    Fixtures, CUSTOMER, DEPOT_ONE, REDELIVERY_NUMBER, RELEASE_NUMBER, UNIT_ONE, UNIT_TWO,
};
use depot_lifecycle::lifecycle::{
    seed, BusinessViolation, DepotLifecycleService, InMemoryDepotStore, LifecycleServiceError,
    RedeliveryQuery, ReleaseQuery,
};

fn service() -> DepotLifecycleService<InMemoryDepotStore> {
    let service = DepotLifecycleService::new(Arc::new(InMemoryDepotStore::new()));
    seed(&service).expect("seed");
    service
}

#[test]
fn release_with_two_details_of_two_units_round_trips() {
    let service = service();
    let mut release: Release = Fixtures::build(Utc::now().fixed_offset()).release;
    release.release_number = "RHAMG200001".to_string();
    let units = release.details[1].units.clone();
    release.details[0].units = units;
    release.details[0].units[0].unit_number = "ABCU1234560".to_string();
    release.details[0].units[1].unit_number = "ABCU1234571".to_string();

    let created = service.create_release(release.clone()).expect("create");
    let json = serde_json::to_value(&created).expect("serialize");
    let parsed: Release = serde_json::from_value(json).expect("deserialize");

    assert_eq!(parsed, created);
    assert_eq!(parsed.details.len(), 2);
    assert!(parsed.details.iter().all(|detail| detail.units.len() == 2));

    let found = service
        .search_releases(&ReleaseQuery {
            unit_number: Some("ABCU1234571".to_string()),
            ..ReleaseQuery::default()
        })
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].release_number, "RHAMG200001");
}

#[test]
fn redelivery_update_replaces_the_whole_aggregate() {
    let service = service();
    let mut redelivery: Redelivery = service
        .search_redeliveries(&RedeliveryQuery {
            redelivery_number: Some(REDELIVERY_NUMBER.to_string()),
            ..RedeliveryQuery::default()
        })
        .expect("search")
        .remove(0);
    redelivery.details.remove(0);
    redelivery.quantity = 1;

    let updated = service
        .update_redelivery(REDELIVERY_NUMBER, redelivery)
        .expect("update");

    assert_eq!(updated.details.len(), 1);
    assert!(!updated.contains_unit(UNIT_TWO));
    assert!(updated.contains_unit(UNIT_ONE));

    let by_unit = service
        .search_redeliveries(&RedeliveryQuery {
            unit_number: Some(UNIT_TWO.to_string()),
            ..RedeliveryQuery::default()
        })
        .expect("search");
    assert!(by_unit.is_empty());
}

#[test]
fn advices_for_unregistered_parties_are_rejected() {
    let service = service();
    let mut release: Release = Fixtures::build(Utc::now().fixed_offset()).release;
    release.release_number = "RHAMG200002".to_string();
    release.details[0].customer = Party::reference("ZZUNKNOWN");

    let err = service.create_release(release).expect_err("unknown customer");

    assert!(matches!(
        err,
        LifecycleServiceError::Rule(BusinessViolation::UnknownParty { ref company_id })
            if company_id == "ZZUNKNOWN"
    ));
}

#[test]
fn depot_filter_matches_the_addressed_depot() {
    let service = service();

    let at_depot = service
        .search_releases(&ReleaseQuery {
            depot: Some(DEPOT_ONE.to_string()),
            ..ReleaseQuery::default()
        })
        .expect("search");
    assert_eq!(at_depot.len(), 1);
    assert_eq!(at_depot[0].release_number, RELEASE_NUMBER);

    let elsewhere = service
        .search_releases(&ReleaseQuery {
            depot: Some(CUSTOMER.to_string()),
            ..ReleaseQuery::default()
        })
        .expect("search");
    assert!(elsewhere.is_empty());
}
