//! Switchboard is a feature-toggle registry.
//!
//! # Features
//!
//! - Named boolean switches organized into groups
//!		- a group is the set of toggles sharing a generated UUID prefix
//!		- reads are open, every mutation is gated by the group's shared secret
//!		- the shared secret can be rotated atomically for the whole group
//!	- Time-scheduled activation and deactivation
//!		- an in-process scheduler promotes toggles when their date arrives
//!	- Tamper-evident group digests
//!		- canonical, order-independent SHA-256 fingerprint per group
//!	- Pluggable storage behind the `ToggleAdapter` trait

#![forbid(unsafe_code)]

pub mod core;
pub mod feature;
pub mod prelude;
pub mod routes;
pub mod secret;

pub use crate::core::app::{App, AppBuilder, AppState};
pub use switchboard_types::{error, toggle_adapter, types};

// vim: ts=4
