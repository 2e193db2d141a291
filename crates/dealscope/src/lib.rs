//! Property investment analysis service core.
//!
//! The `reports` module holds the domain: input validation, the pure metrics
//! engine, the trial/subscription access policy, the report service facade,
//! and the HTTP router. Storage, identity/billing state, and payment checkout
//! are collaborator traits implemented by the hosting service.

pub mod config;
pub mod error;
pub mod reports;
pub mod telemetry;
