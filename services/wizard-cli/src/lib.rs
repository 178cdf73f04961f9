mod cli;
mod demo;
mod draft;
mod infra;

use tenant_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
