//! Core business logic - framework-agnostic rules with no storage access.

pub mod auth;
pub mod query;
pub mod report;
pub mod rollover;
