pub mod admin;
pub mod api_error;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;

#[cfg(test)]
mod tests;

pub use api_error::{ApiError, Result as ApiResult};
pub use error::{Result as ServerErrorResult, ServerError};
pub use routes::build_router;
