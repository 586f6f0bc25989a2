//! Request handlers, one module per area of the lab.
//!
//! Pages answer with JSON payloads or redirects; the `/api/*` routes answer
//! with JSON only.

pub mod auth;
pub mod dashboard;
pub mod elements;
pub mod equipment;
pub mod experiments;
pub mod lab;
pub mod reactions;
pub mod reports;
