//! Use-case services over the store layer.
//!
//! # Responsibility
//! - Offer intention-revealing operations for application callers.
//! - Keep orchestration free of SQL and cache details.

pub mod department_service;
