//! Depot lifecycle service: advices, gate movements, estimates and work orders.
//!
//! Handlers validate bodies against [`crate::schema::catalog`] before binding them, then hand
//! the typed request to [`DepotLifecycleService`], which enforces the business rules and maps
//! violations onto `405` responses with stable codes.

pub mod allocation;
pub mod auth;
pub mod fixtures;
pub mod memory;
pub mod repository;
pub mod router;
pub mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocation::{allocate, AmountOverflow};
pub use auth::{auth_router, AuthError, LoginRequest, Principal, TokenIssuer, TokenResponse};
pub use fixtures::{seed, Fixtures, SeedOutcome};
pub use memory::InMemoryDepotStore;
pub use repository::{
    DepotRepository, EstimateRecord, EstimateRepository, GateRecord, GateRepository,
    PartyRecord, PartyRepository, RedeliveryQuery, RedeliveryRecord, RedeliveryRepository,
    ReleaseQuery, ReleaseRecord, ReleaseRepository, RepositoryError, WorkOrderRecord,
    WorkOrderRepository,
};
pub use router::lifecycle_router;
pub use rules::BusinessViolation;
pub use service::{DepotLifecycleService, LifecycleServiceError, DEFAULT_INSPECTION_CRITERIA};
