use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset, Utc};

use super::repository::{
    EstimateRecord, EstimateRepository, GateRecord, GateRepository, PartyRecord, PartyRepository,
    RedeliveryQuery, RedeliveryRecord, RedeliveryRepository, ReleaseQuery, ReleaseRecord,
    ReleaseRepository, RepositoryError, WorkOrderRecord, WorkOrderRepository,
};
use crate::domain::{
    Estimate, EstimateAllocation, EstimateId, GateCreateRequest, GateId, GateResponse,
    Party, PartyId, Redelivery, RedeliveryId, Release, ReleaseId, WorkOrder, WorkOrderId,
};

/// Process-local store for every record family.
///
/// One mutex guards each family and an aggregate is written inside a single critical section,
/// so readers observe either the previous or the new aggregate, never a mix. Business numbers
/// are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDepotStore {
    sequence: Arc<AtomicU64>,
    parties: Arc<Mutex<HashMap<String, PartyRecord>>>,
    releases: Arc<Mutex<HashMap<String, ReleaseRecord>>>,
    redeliveries: Arc<Mutex<HashMap<String, RedeliveryRecord>>>,
    gates: Arc<Mutex<Vec<GateRecord>>>,
    estimates: Arc<Mutex<HashMap<String, EstimateRecord>>>,
    work_orders: Arc<Mutex<HashMap<String, WorkOrderRecord>>>,
}

impl InMemoryDepotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::Relaxed) + 1
    }
}

fn key(number: &str) -> String {
    number.to_ascii_uppercase()
}

impl PartyRepository for InMemoryDepotStore {
    fn register_party(&self, party: Party) -> Result<PartyRecord, RepositoryError> {
        let mut guard = self.parties.lock().expect("repository mutex poisoned");
        if guard.contains_key(&party.company_id) {
            return Err(RepositoryError::Conflict);
        }
        let record = PartyRecord {
            id: PartyId(self.next_id()),
            party: party.into_ref(),
        };
        guard.insert(record.party.company_id.clone(), record.clone());
        Ok(record)
    }

    fn find_party(&self, company_id: &str) -> Result<Option<PartyRecord>, RepositoryError> {
        let guard = self.parties.lock().expect("repository mutex poisoned");
        Ok(guard.get(company_id).cloned())
    }

    fn parties(&self) -> Result<Vec<PartyRecord>, RepositoryError> {
        let guard = self.parties.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

impl ReleaseRepository for InMemoryDepotStore {
    fn insert_release(&self, release: Release) -> Result<ReleaseRecord, RepositoryError> {
        let mut guard = self.releases.lock().expect("repository mutex poisoned");
        let number = key(&release.release_number);
        if guard.contains_key(&number) {
            return Err(RepositoryError::Conflict);
        }
        let record = ReleaseRecord {
            id: ReleaseId(self.next_id()),
            release,
            updated_at: Utc::now(),
        };
        guard.insert(number, record.clone());
        Ok(record)
    }

    fn replace_release(&self, release: Release) -> Result<ReleaseRecord, RepositoryError> {
        let mut guard = self.releases.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&key(&release.release_number))
            .ok_or(RepositoryError::NotFound)?;
        stored.release = release;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    fn find_release(&self, release_number: &str) -> Result<Option<ReleaseRecord>, RepositoryError> {
        let guard = self.releases.lock().expect("repository mutex poisoned");
        Ok(guard.get(&key(release_number)).cloned())
    }

    fn search_releases(
        &self,
        query: &ReleaseQuery,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<ReleaseRecord>, RepositoryError> {
        let guard = self.releases.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| query.matches(&record.release, now))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

impl RedeliveryRepository for InMemoryDepotStore {
    fn insert_redelivery(
        &self,
        redelivery: Redelivery,
    ) -> Result<RedeliveryRecord, RepositoryError> {
        let mut guard = self.redeliveries.lock().expect("repository mutex poisoned");
        let number = key(&redelivery.redelivery_number);
        if guard.contains_key(&number) {
            return Err(RepositoryError::Conflict);
        }
        let record = RedeliveryRecord {
            id: RedeliveryId(self.next_id()),
            redelivery,
            updated_at: Utc::now(),
        };
        guard.insert(number, record.clone());
        Ok(record)
    }

    fn replace_redelivery(
        &self,
        redelivery: Redelivery,
    ) -> Result<RedeliveryRecord, RepositoryError> {
        let mut guard = self.redeliveries.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&key(&redelivery.redelivery_number))
            .ok_or(RepositoryError::NotFound)?;
        stored.redelivery = redelivery;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    fn find_redelivery(
        &self,
        redelivery_number: &str,
    ) -> Result<Option<RedeliveryRecord>, RepositoryError> {
        let guard = self.redeliveries.lock().expect("repository mutex poisoned");
        Ok(guard.get(&key(redelivery_number)).cloned())
    }

    fn search_redeliveries(
        &self,
        query: &RedeliveryQuery,
        now: DateTime<FixedOffset>,
    ) -> Result<Vec<RedeliveryRecord>, RepositoryError> {
        let guard = self.redeliveries.lock().expect("repository mutex poisoned");
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| query.matches(&record.redelivery, now))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

fn same_movement(record: &GateRecord, advice_number: &str, unit_number: &str) -> bool {
    record
        .request
        .advice_number
        .eq_ignore_ascii_case(advice_number)
        && record.request.unit_number.eq_ignore_ascii_case(unit_number)
}

impl GateRepository for InMemoryDepotStore {
    fn insert_gate(
        &self,
        request: GateCreateRequest,
        response: GateResponse,
        limit: usize,
    ) -> Result<GateRecord, RepositoryError> {
        let mut guard = self.gates.lock().expect("repository mutex poisoned");
        let duplicate = guard.iter().any(|record| {
            same_movement(record, &request.advice_number, &request.unit_number)
                && record.request.gate_type == request.gate_type
        });
        if duplicate {
            return Err(RepositoryError::Conflict);
        }
        let recorded = guard
            .iter()
            .filter(|record| {
                record.request.gate_type == request.gate_type
                    && record
                        .request
                        .advice_number
                        .eq_ignore_ascii_case(&request.advice_number)
            })
            .count();
        if recorded >= limit {
            return Err(RepositoryError::LimitReached);
        }
        let record = GateRecord {
            id: GateId(self.next_id()),
            request,
            response,
            recorded_at: Utc::now(),
        };
        guard.push(record.clone());
        Ok(record)
    }

    fn replace_gate(&self, record: GateRecord) -> Result<GateRecord, RepositoryError> {
        let mut guard = self.gates.lock().expect("repository mutex poisoned");
        let collides = guard.iter().any(|stored| {
            stored.id != record.id
                && same_movement(stored, &record.request.advice_number, &record.request.unit_number)
                && stored.request.gate_type == record.request.gate_type
        });
        if collides {
            return Err(RepositoryError::Conflict);
        }
        let stored = guard
            .iter_mut()
            .find(|stored| stored.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = record;
        Ok(stored.clone())
    }

    fn find_gate(
        &self,
        advice_number: &str,
        unit_number: &str,
    ) -> Result<Option<GateRecord>, RepositoryError> {
        let guard = self.gates.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .rev()
            .find(|record| same_movement(record, advice_number, unit_number))
            .cloned())
    }

    fn latest_gate(&self, unit_number: &str) -> Result<Option<GateRecord>, RepositoryError> {
        let guard = self.gates.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| record.request.unit_number.eq_ignore_ascii_case(unit_number))
            .max_by_key(|record| (record.request.activity_time, record.id))
            .cloned())
    }
}

impl EstimateRepository for InMemoryDepotStore {
    fn insert_estimate(
        &self,
        estimate: Estimate,
        mut allocation: EstimateAllocation,
    ) -> Result<EstimateRecord, RepositoryError> {
        let mut guard = self.estimates.lock().expect("repository mutex poisoned");
        let number = key(&estimate.estimate_number);
        if guard.contains_key(&number) {
            return Err(RepositoryError::Conflict);
        }
        let id = EstimateId(self.next_id());
        allocation.id = id;
        let record = EstimateRecord {
            id,
            estimate,
            allocation,
            approval: None,
        };
        guard.insert(number, record.clone());
        Ok(record)
    }

    fn replace_estimate(&self, record: EstimateRecord) -> Result<EstimateRecord, RepositoryError> {
        let mut guard = self.estimates.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&key(&record.estimate.estimate_number))
            .filter(|stored| stored.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = record;
        Ok(stored.clone())
    }

    fn find_estimate(
        &self,
        estimate_number: &str,
    ) -> Result<Option<EstimateRecord>, RepositoryError> {
        let guard = self.estimates.lock().expect("repository mutex poisoned");
        Ok(guard.get(&key(estimate_number)).cloned())
    }
}

impl WorkOrderRepository for InMemoryDepotStore {
    fn insert_work_order(
        &self,
        work_order: WorkOrder,
    ) -> Result<WorkOrderRecord, RepositoryError> {
        let mut guard = self.work_orders.lock().expect("repository mutex poisoned");
        let number = key(&work_order.work_order_number);
        if guard.contains_key(&number) {
            return Err(RepositoryError::Conflict);
        }
        let record = WorkOrderRecord {
            id: WorkOrderId(self.next_id()),
            work_order,
        };
        guard.insert(number, record.clone());
        Ok(record)
    }

    fn replace_work_order(
        &self,
        record: WorkOrderRecord,
    ) -> Result<WorkOrderRecord, RepositoryError> {
        let mut guard = self.work_orders.lock().expect("repository mutex poisoned");
        let stored = guard
            .get_mut(&key(&record.work_order.work_order_number))
            .filter(|stored| stored.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = record;
        Ok(stored.clone())
    }

    fn find_work_order(
        &self,
        work_order_number: &str,
    ) -> Result<Option<WorkOrderRecord>, RepositoryError> {
        let guard = self.work_orders.lock().expect("repository mutex poisoned");
        Ok(guard.get(&key(work_order_number)).cloned())
    }
}
