//! Department use-case service.
//!
//! # Responsibility
//! - Provide stable entry points for callers of the department store.
//! - Delegate all persistence to the store implementation.
//!
//! # Invariants
//! - Service APIs never bypass the store's lifecycle guards or cache.
//! - Service layer remains storage-agnostic.

use crate::model::department::{DepartmentHandle, DepartmentId};
use crate::repo::department_repo::{DepartmentStore, RepoResult};

/// Use-case wrapper over a department store implementation.
pub struct DepartmentService<S: DepartmentStore> {
    store: S,
}

impl<S: DepartmentStore> DepartmentService<S> {
    /// Creates a service using the provided store implementation.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Ensures the backing table exists. Idempotent.
    pub fn init_schema(&self) -> RepoResult<()> {
        self.store.create_table()
    }

    /// Creates and persists a new department.
    pub fn create(&self, name: &str, location: &str) -> RepoResult<DepartmentHandle> {
        self.store.create(name, location)
    }

    /// Renames a persisted department and rewrites its row.
    pub fn rename(&self, department: &DepartmentHandle, name: &str) -> RepoResult<()> {
        department.borrow_mut().name = name.to_string();
        self.store.update(department)
    }

    /// Moves a persisted department and rewrites its row.
    pub fn relocate(&self, department: &DepartmentHandle, location: &str) -> RepoResult<()> {
        department.borrow_mut().location = location.to_string();
        self.store.update(department)
    }

    /// Deletes a persisted department's row and clears its id.
    pub fn remove(&self, department: &DepartmentHandle) -> RepoResult<()> {
        self.store.delete(department)
    }

    /// Lists every department, ordered by id.
    pub fn get_all(&self) -> RepoResult<Vec<DepartmentHandle>> {
        self.store.get_all()
    }

    /// Looks up one department by id.
    pub fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentHandle>> {
        self.store.find_by_id(id)
    }

    /// Looks up the first department with the given name.
    pub fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentHandle>> {
        self.store.find_by_name(name)
    }
}
