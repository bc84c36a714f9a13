//! API module - particle submission and count reporting over HTTP
//!
//! Every path accepts the same two operations: `POST` submits one particle
//! label, `GET` reports the current counts. Other methods get `405`.

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::AppState;
pub use models::CountReport;
pub use routes::create_router;
