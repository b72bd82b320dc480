//! Domain model for department persistence.
//!
//! # Responsibility
//! - Define the canonical data structures used by the store and service.
//!
//! # Invariants
//! - A persisted department is identified by a stable `DepartmentId`.
//! - Deletion is a hard delete; the object reverts to the unpersisted state.

pub mod department;
