//! Core use-case services.
//!
//! # Responsibility
//! - Load remote state into the snapshot and keep the two in step through
//!   confirmed writes.
//! - Derive the read-side projections callers render from.
//!
//! # Invariants
//! - Services never bypass the gateway contract to reach storage.
//! - The snapshot changes only after the store confirms the matching
//!   remote operation.

pub mod board_service;
pub mod loader;
pub mod views;
