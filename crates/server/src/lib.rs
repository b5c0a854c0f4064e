pub mod errors;
pub mod guard;
pub mod metrics;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{app, run};
pub use state::{ServerState, Stores};
