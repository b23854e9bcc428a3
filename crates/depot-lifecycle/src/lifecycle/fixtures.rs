//! Example parties and advices a fresh depot system starts with.

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use super::repository::DepotRepository;
use super::service::{DepotLifecycleService, LifecycleServiceError};
use crate::domain::{
    InsuranceCoverage, Party, PartyRef, Redelivery, RedeliveryDetail, RedeliveryUnit, Release,
    ReleaseDetail, ReleaseUnit,
};

pub const DEPOT_ONE: &str = "DEHAMCMRA";
pub const DEPOT_TWO: &str = "DEHAMCMRB";
pub const CUSTOMER: &str = "GBLONCUST";
pub const OWNER: &str = "USSFOEXAM";
pub const RELEASE_NUMBER: &str = "RHAMG134512";
pub const REDELIVERY_NUMBER: &str = "AHAMG33141";
pub const UNIT_ONE: &str = "CONU1234561";
pub const UNIT_TWO: &str = "CONU1234526";
const CONTRACT: &str = "EXCUST01-100000";

/// The example graph: four parties, one release and one redelivery.
#[derive(Debug, Clone, Serialize)]
pub struct Fixtures {
    pub parties: Vec<Party>,
    pub release: Release,
    pub redelivery: Redelivery,
}

/// What a call to [`seed`] actually added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    pub parties: usize,
    pub releases: usize,
    pub redeliveries: usize,
}

impl SeedOutcome {
    pub fn is_noop(&self) -> bool {
        *self == SeedOutcome::default()
    }
}

impl Fixtures {
    /// Build the graph with approvals five days before `now` and expirations four months after.
    pub fn build(now: DateTime<FixedOffset>) -> Self {
        let depot1 = Party::new(DEPOT_ONE, "HAMG", "Depot Operator #1")
            .with_user("JDOE", "John Doe")
            .into_ref();
        let depot2 = Party::new(DEPOT_TWO, "HAMB", "Depot Operator #2")
            .with_user("JDOE", "John Doe")
            .into_ref();
        let customer = Party::new(CUSTOMER, "EXCUST", "Example Customer")
            .with_user("JD", "Jane Doe")
            .into_ref();
        let owner = Party::new(OWNER, "EXAM", "Example Lessor Name")
            .with_user("JD", "Jane Doe")
            .into_ref();

        let approved = now - Duration::days(5);
        let expires = now
            .checked_add_months(Months::new(4))
            .unwrap_or(now + Duration::days(120));

        let release = release(approved, expires, &depot1, &customer, &owner);
        let redelivery = redelivery(approved, expires, &depot1, &depot2, &customer, &owner);

        Fixtures {
            parties: [depot1, depot2, customer, owner]
                .iter()
                .map(|party| Party::clone(party))
                .collect(),
            release,
            redelivery,
        }
    }
}

fn comments(lines: &[&str]) -> Option<Vec<String>> {
    Some(lines.iter().map(|line| line.to_string()).collect())
}

fn release(
    approved: DateTime<FixedOffset>,
    expires: DateTime<FixedOffset>,
    depot: &PartyRef,
    customer: &PartyRef,
    owner: &PartyRef,
) -> Release {
    let detail = |equipment: &str, units: Vec<ReleaseUnit>| ReleaseDetail {
        customer: customer.clone(),
        contract: CONTRACT.to_string(),
        equipment: equipment.to_string(),
        grade: "IICL".to_string(),
        upgrade_type: None,
        quantity: 1,
        pre_trip_inspection_required: None,
        desired_temperature: None,
        ventilation: None,
        comments: None,
        units,
        criteria: Vec::new(),
    };

    let units = vec![
        ReleaseUnit {
            unit_number: UNIT_ONE.to_string(),
            status: Some("TIED".to_string()),
            manufacture_date: None,
            comments: comments(&["Example unit comment #1."]),
        },
        ReleaseUnit {
            unit_number: UNIT_TWO.to_string(),
            status: Some("TIED".to_string()),
            manufacture_date: NaiveDate::from_ymd_opt(2012, 1, 1),
            comments: comments(&["Example unit comment #2."]),
        },
    ];

    Release {
        release_number: RELEASE_NUMBER.to_string(),
        status: Some("APPROVED".to_string()),
        release_type: Some("BOOK".to_string()),
        approval_date: Some(approved),
        expiration_date: Some(expires),
        depot: Some(depot.clone()),
        owner: Some(owner.clone()),
        recipient: Some(depot.clone()),
        quantity: 1,
        comments: comments(&["an example release level comment"]),
        details: vec![detail("22G1", Vec::new()), detail("42G1", units)],
    }
}

fn redelivery(
    approved: DateTime<FixedOffset>,
    expires: DateTime<FixedOffset>,
    depot1: &PartyRef,
    depot2: &PartyRef,
    customer: &PartyRef,
    owner: &PartyRef,
) -> Redelivery {
    let coverage = InsuranceCoverage {
        amount_covered: Some(Decimal::new(200000, 2)),
        amount_currency: Some("USD".to_string()),
        applies_to_ctl: None,
        all_or_nothing: Some(false),
        exceptions: comments(&["Exception #1", "Exception #2"]),
        exclusions: comments(&["Exclusion #1", "Exclusion #2"]),
        inclusions: comments(&["Inclusion #1", "Inclusion #2"]),
    };

    let insured_unit = RedeliveryUnit {
        unit_number: UNIT_TWO.to_string(),
        manufacture_date: NaiveDate::from_ymd_opt(2012, 1, 1),
        last_on_hire_date: None,
        last_on_hire_location: None,
        billing_party: Some(depot1.clone()),
        inspection_criteria: Some("CWCA".to_string()),
        status: Some("TIED".to_string()),
        cargo_number: None,
        technical_bulletins: None,
        machinery: None,
        comments: comments(&["Example unit comment #2."]),
    };
    let uninsured_unit = RedeliveryUnit {
        unit_number: UNIT_ONE.to_string(),
        manufacture_date: NaiveDate::from_ymd_opt(2012, 1, 1),
        last_on_hire_date: NaiveDate::from_ymd_opt(2012, 2, 1),
        last_on_hire_location: Some(depot2.clone()),
        billing_party: Some(depot1.clone()),
        inspection_criteria: Some("IICL".to_string()),
        status: Some("TIED".to_string()),
        cargo_number: None,
        technical_bulletins: None,
        machinery: None,
        comments: comments(&["Example unit comment #1."]),
    };

    let insured = RedeliveryDetail {
        customer: customer.clone(),
        contract: CONTRACT.to_string(),
        equipment: "22G2".to_string(),
        grade: Some("IICL".to_string()),
        upgrade_type: None,
        insurance_coverage: Some(coverage),
        quantity: 1,
        comments: None,
        units: vec![insured_unit],
    };
    let uninsured = RedeliveryDetail {
        customer: customer.clone(),
        contract: CONTRACT.to_string(),
        equipment: "22G1".to_string(),
        grade: None,
        upgrade_type: None,
        insurance_coverage: None,
        quantity: 1,
        comments: None,
        units: vec![uninsured_unit],
    };

    Redelivery {
        redelivery_number: REDELIVERY_NUMBER.to_string(),
        status: Some("APPROVED".to_string()),
        approval_date: Some(approved),
        expiration_date: Some(expires),
        depot: Some(depot1.clone()),
        recipient: Some(depot1.clone()),
        owner: Some(owner.clone()),
        quantity: 2,
        comments: comments(&["an example redelivery level comment"]),
        estimate_recipients: None,
        details: vec![insured, uninsured],
    }
}

/// Register the example graph, skipping anything already present; calling it twice is a no-op.
pub fn seed<R>(service: &DepotLifecycleService<R>) -> Result<SeedOutcome, LifecycleServiceError>
where
    R: DepotRepository + 'static,
{
    let fixtures = Fixtures::build(Utc::now().fixed_offset());
    let repository = service.repository();
    let mut outcome = SeedOutcome::default();

    for party in fixtures.parties {
        if repository.find_party(&party.company_id)?.is_none() {
            service.register_party(party)?;
            outcome.parties += 1;
        }
    }
    if repository.find_release(RELEASE_NUMBER)?.is_none() {
        service.create_release(fixtures.release)?;
        outcome.releases += 1;
    }
    if repository.find_redelivery(REDELIVERY_NUMBER)?.is_none() {
        service.create_redelivery(fixtures.redelivery)?;
        outcome.redeliveries += 1;
    }

    info!(
        parties = outcome.parties,
        releases = outcome.releases,
        redeliveries = outcome.redeliveries,
        "fixtures seeded"
    );
    Ok(outcome)
}
