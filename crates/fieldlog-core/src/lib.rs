//! fieldlog-core - Core library for Fieldlog
//!
//! This crate contains the offline-first synchronization engine shared by all
//! Fieldlog interfaces: the durable local store for inspection reports, the
//! record factory, the background sync engine, and the live merge view.

pub mod db;
pub mod error;
pub mod factory;
pub mod live;
pub mod models;
pub mod store;
pub mod sync;

pub use error::{Error, RemoteError, Result, ValidationError};
pub use models::{Report, ReportId, SyncStatus};
pub use store::{ReportStore, StoreEvent};
