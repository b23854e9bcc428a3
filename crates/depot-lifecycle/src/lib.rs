pub mod config;
pub mod domain;
pub mod error;
pub mod lifecycle;
pub mod schema;
pub mod telemetry;

pub use config::{AppConfig, AuthConfig};
pub use error::{ApiError, AppError, ErrorResponse};
pub use lifecycle::{lifecycle_router, seed, DepotLifecycleService, InMemoryDepotStore, TokenIssuer};
