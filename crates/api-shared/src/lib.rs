//! # API Shared
//!
//! Shared definitions for the DXReport HTTP API.
//!
//! Contains:
//! - Wire types (`wire` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and by anything that talks to it (tests, the browser client's contract).

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
