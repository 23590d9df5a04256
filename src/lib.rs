//! Library crate for usrapi-manager.
//!
//! This crate exposes the building blocks of the TUI:
//! - Users resource client behind the `UserApi` trait (`api`)
//! - Application state, form state and update loop (`app`)
//! - Command-line configuration (`config`)
//! - Request dispatch and completion delivery (`dispatch`)
//! - Error and result types (`error`)
//! - User record types (`model`)
//! - In-memory search helpers (`search`)
//! - Collection store and reconciliation rules (`store`)
//! - UI rendering and widgets (`ui`)
//! - Form validation (`validate`)
//!
//! It is used by the `usrapi-manager` binary and by tests.
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod api;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod search;
pub mod store;
pub mod ui;
pub mod validate;

// Re-export commonly used items at the crate root for convenience
/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
