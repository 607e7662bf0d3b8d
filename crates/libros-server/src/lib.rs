//! CMPC-Libros Server Library
//!
//! Audit trail for the CMPC-Libros book inventory.
//!
//! # Overview
//!
//! - **Audit interceptor**: a tower layer that records every inventory
//!   request (add, update, remove, view, search) with actor, sanitized
//!   payloads, outcome and timing
//! - **Reporting API**: filtered listing, statistics, CSV exports, retention
//!   cleanup and metadata backfill under `/api/v1/audit-logs`
//! - **Database Management**: PostgreSQL integration with SQLx
//! - **Configuration**: Environment-based configuration management
//! - **Middleware**: CORS and request tracing
//!
//! ## Framework Stack
//!
//! - **Axum**: web framework
//! - **SQLx**: PostgreSQL access with runtime-checked queries
//! - **Tower**: middleware and service abstractions
//!
//! # Example
//!
//! ```no_run
//! use axum::Router;
//! use libros_server::{api, audit, books, config::Config, db};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pool = db::create_pool(&config.database).await?;
//!
//!     let audit = audit::AuditService::new(
//!         Arc::new(audit::PgAuditStore::new(pool.clone())),
//!         Arc::new(books::PgBookCatalog::new(pool.clone())),
//!     );
//!     let state = api::AppState { db: pool, audit };
//!     let _app = api::create_router(state, &config, Router::new());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod audit;
pub mod books;
pub mod config;
pub mod db;
pub mod features;
pub mod middleware;

pub use api::response::{ApiResult, AppError};
