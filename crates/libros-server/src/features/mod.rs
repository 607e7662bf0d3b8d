//! Feature modules implementing the Libros API
//!
//! - **audit_logs**: audit trail listing, statistics, CSV exports and retention

pub mod audit_logs;

use axum::Router;

use crate::audit::AuditService;

/// Shared state for all feature routes
#[derive(Clone)]
pub struct FeatureState {
    pub audit: AuditService,
}

/// Creates the API router with all feature routes mounted
///
/// - `/audit-logs` - Audit trail reporting
pub fn router(state: FeatureState) -> Router<()> {
    Router::new().nest("/audit-logs", audit_logs::audit_logs_routes().with_state(state.audit))
}
