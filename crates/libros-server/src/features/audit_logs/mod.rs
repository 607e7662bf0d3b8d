//! Audit log reporting feature
//!
//! Read, export and maintenance endpoints over the audit trail. The paths
//! carry no `books` segment, so requests here are never audited themselves.

pub mod routes;

#[cfg(test)]
mod routes_test;

pub use routes::audit_logs_routes;
