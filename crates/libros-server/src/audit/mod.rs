//! Audit logging for the book inventory
//!
//! Every inventory request (add, update, remove, view, search) produces one
//! audit record. The record is opened as PENDING before the handler runs and
//! completed with the outcome afterwards, so requests that never finish still
//! leave a trace.
//!
//! # Architecture
//!
//! - [`AuditLayer`] intercepts requests and writes records
//! - [`classifier`] maps method and route onto an [`AuditAction`]
//! - [`sanitize`] strips credentials and bounds payload size
//! - [`AuditService`] owns the [`AuditStore`] and serves the reporting API
//! - [`PgAuditStore`] and [`MemoryAuditStore`] are the storage backends
//!
//! # Example
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use libros_server::audit::{AuditLayer, AuditService, MemoryAuditStore};
//! use libros_server::books::MemoryBookCatalog;
//! use std::sync::Arc;
//!
//! let service = AuditService::new(
//!     Arc::new(MemoryAuditStore::new()),
//!     Arc::new(MemoryBookCatalog::new()),
//! );
//!
//! let app: Router = Router::new()
//!     .route("/api/v1/books", get(|| async { "[]" }))
//!     .layer(AuditLayer::new(service));
//! ```

pub mod classifier;
pub mod context;
pub mod error;
pub mod export;
pub mod memory;
pub mod metadata;
pub mod middleware;
pub mod models;
pub mod postgres;
pub mod sanitize;
pub mod service;
pub mod store;

pub use context::AuthenticatedUser;
pub use error::{AuditError, AuditResult};
pub use memory::MemoryAuditStore;
pub use middleware::{AuditLayer, AuditMiddleware};
pub use models::{
    AuditAction, AuditCompletion, AuditFilters, AuditLevel, AuditPage, AuditRecord, AuditStats,
    AuditStatus, BookMetadata, EntityType, NewAuditRecord,
};
pub use postgres::PgAuditStore;
pub use service::AuditService;
pub use store::{AuditSlice, AuditStore};
