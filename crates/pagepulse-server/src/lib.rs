pub mod app;
pub mod error;
pub mod ga;
pub mod routes;
pub mod state;
