//! Persistence core for the department directory.
//!
//! One entity, one table: `Department` objects are mapped to rows of the
//! `departments` table through [`SqliteDepartmentStore`], whose per-store
//! identity cache guarantees that repeated lookups of the same row yield
//! the same live handle.
//!
//! The store is single-threaded by construction: handles are
//! `Rc<RefCell<_>>`, so the store is `!Send + !Sync` and concurrent use
//! requires external synchronization.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentHandle, DepartmentId};
pub use repo::department_repo::{DepartmentStore, RepoError, RepoResult, SqliteDepartmentStore};
pub use service::department_service::DepartmentService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
