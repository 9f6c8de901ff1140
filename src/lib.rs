#![doc = "The `todoforge` library crate."]
#![doc = ""]
#![doc = "Authentication (token issuance and verification, the auth middleware and the"]
#![doc = "todo ownership guard), storage backends, routing and error handling for the"]
#![doc = "todoforge REST backend. The binary (`main.rs`) wires these together."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use crate::error::AppError;
pub use crate::state::AppState;
