//! Department domain model.
//!
//! # Responsibility
//! - Define the canonical record for one organizational unit.
//! - Expose the shared-handle type used by the identity cache.
//!
//! # Invariants
//! - `id` is `None` until the first successful save and after deletion.
//! - While an id is cached, at most one live handle exists for that row.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Stable row identifier assigned by the backing SQLite engine.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type DepartmentId = i64;

/// Shared mutable handle to one live department.
///
/// The store hands out clones of the same `Rc` for every fetch of a cached
/// id, so handle identity (`Rc::ptr_eq`) mirrors row identity. `Rc` and
/// `RefCell` deliberately make every store built on this type `!Send` and
/// `!Sync`: callers needing cross-thread access must synchronize externally.
pub type DepartmentHandle = Rc<RefCell<Department>>;

/// Canonical record for one organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Primary key. `None` while the object is not persisted.
    pub id: Option<DepartmentId>,
    /// Department name. The schema does not enforce uniqueness.
    pub name: String,
    /// Department location.
    pub location: String,
}

impl Department {
    /// Creates an unpersisted department.
    ///
    /// # Invariants
    /// - `id` starts as `None`; only `save` assigns it.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
        }
    }

    /// Creates an unpersisted department wrapped in a shareable handle.
    pub fn new_handle(name: impl Into<String>, location: impl Into<String>) -> DepartmentHandle {
        Rc::new(RefCell::new(Self::new(name, location)))
    }

    /// Returns whether this department currently maps to a row.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "Department {id}: {}, {}", self.name, self.location),
            None => write!(f, "Department (unsaved): {}, {}", self.name, self.location),
        }
    }
}
