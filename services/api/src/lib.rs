mod cli;
mod infra;
mod inspect;
mod routes;
mod server;

use depot_lifecycle::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
