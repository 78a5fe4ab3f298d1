//! REST endpoint handlers.

pub mod health;
pub mod submissions;
pub mod upload;
