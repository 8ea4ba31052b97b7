//! Domain models for the site.

pub mod session;
pub mod user;
