//! # Obsync
//!
//! Observation lifecycle and cross-client synchronization engine for a
//! teacher professional-development dashboard, including:
//! - Rubric catalog and score computation
//! - Step-gated observation wizard
//! - Whole-collection local persistence (SQLite)
//! - Cross-context change propagation with loop protection
//! - Real-time push client with owner filtering
//! - Backend REST boundary

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod push;
pub mod rubric;
pub mod store;
pub mod sync;
pub mod wizard;

pub use error::{Error, Result};
pub use events::{DomainEvent, EventBus};
pub use sync::DashboardContext;
