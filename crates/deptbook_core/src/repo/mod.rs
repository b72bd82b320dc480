//! Store layer abstraction and SQLite persistence implementation.
//!
//! # Responsibility
//! - Define the department data-access contract.
//! - Isolate SQL details and identity-cache bookkeeping from callers.
//!
//! # Invariants
//! - Store APIs return semantic errors (`NotFound`, lifecycle guards) in
//!   addition to DB transport errors.
//! - Expected absence on lookups is `Ok(None)`, never an error.

pub mod department_repo;
