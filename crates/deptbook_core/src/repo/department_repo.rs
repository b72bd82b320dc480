//! Department store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the canonical `departments` table.
//! - Keep the identity cache authoritative: one live handle per cached row.
//!
//! # Invariants
//! - Every row fetched from SQLite becomes an object through
//!   `instance_from_row`, which refreshes a cached handle in place instead
//!   of constructing a second object for the same id.
//! - Lifecycle guards run before SQL: `save` requires an unset id,
//!   `update`/`delete` require a set id.

use crate::db::DbError;
use crate::model::department::{Department, DepartmentHandle, DepartmentId};
use rusqlite::{params, Connection, Row};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, location FROM departments";

pub type RepoResult<T> = Result<T, RepoError>;

/// Store error for department persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// The backing store rejected an operation. Propagated unchanged.
    Db(DbError),
    /// `save` was called on an object that already has a row.
    AlreadyPersisted(DepartmentId),
    /// `update` or `delete` was called on an object with no id.
    NotPersisted(&'static str),
    /// `update` or `delete` matched no row for the given id.
    NotFound(DepartmentId),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyPersisted(id) => {
                write!(f, "department is already persisted with id {id}")
            }
            Self::NotPersisted(op) => {
                write!(f, "cannot {op} a department that has never been saved")
            }
            Self::NotFound(id) => write!(f, "department not found: {id}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::AlreadyPersisted(_) | Self::NotPersisted(_) | Self::NotFound(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for department CRUD and lookup operations.
pub trait DepartmentStore {
    /// Creates the `departments` table if it does not exist. Idempotent.
    fn create_table(&self) -> RepoResult<()>;
    /// Drops the `departments` table if it exists. Idempotent.
    fn drop_table(&self) -> RepoResult<()>;
    /// Inserts a new row for an unpersisted department and assigns its id.
    fn save(&self, department: &DepartmentHandle) -> RepoResult<DepartmentId>;
    /// Constructs, saves and returns a new department in one step.
    fn create(&self, name: &str, location: &str) -> RepoResult<DepartmentHandle>;
    /// Rewrites the row matching the department's id with its current fields.
    fn update(&self, department: &DepartmentHandle) -> RepoResult<()>;
    /// Deletes the department's row and returns the object to the
    /// unpersisted state.
    fn delete(&self, department: &DepartmentHandle) -> RepoResult<()>;
    /// Returns every department, ordered by id.
    fn get_all(&self) -> RepoResult<Vec<DepartmentHandle>>;
    /// Returns the department with the given id, or `None`.
    fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentHandle>>;
    /// Returns the first department with the given name, or `None`.
    ///
    /// The schema does not make names unique; with duplicates the choice of
    /// row is left to the engine's scan order. Contractual, not a bug.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentHandle>>;
}

/// SQLite-backed department store with a per-instance identity cache.
///
/// The cache maps each id to the single live handle for that row, so its
/// lifetime is coupled to the store's: two stores on the same connection
/// have independent caches. `Rc`/`RefCell` in the handle type make this
/// store `!Send + !Sync`; concurrent use requires external synchronization.
pub struct SqliteDepartmentStore<'conn> {
    conn: &'conn Connection,
    cache: RefCell<HashMap<DepartmentId, DepartmentHandle>>,
}

impl<'conn> SqliteDepartmentStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Resolves one fetched row to its canonical in-memory handle.
    ///
    /// If the id is cached, the cached object's `name` and `location` are
    /// refreshed from the row and the same handle is returned; otherwise a
    /// new handle is constructed and cached. All query paths funnel through
    /// here, which is what upholds the one-handle-per-row invariant.
    pub fn instance_from_row(&self, row: &Row<'_>) -> RepoResult<DepartmentHandle> {
        let id: DepartmentId = row.get("id")?;
        let name: String = row.get("name")?;
        let location: String = row.get("location")?;

        let mut cache = self.cache.borrow_mut();
        if let Some(existing) = cache.get(&id) {
            {
                let mut department = existing.borrow_mut();
                department.name = name;
                department.location = location;
            }
            return Ok(Rc::clone(existing));
        }

        let handle = Rc::new(RefCell::new(Department {
            id: Some(id),
            name,
            location,
        }));
        cache.insert(id, Rc::clone(&handle));
        Ok(handle)
    }
}

impl DepartmentStore for SqliteDepartmentStore<'_> {
    fn create_table(&self) -> RepoResult<()> {
        // Autocommit connection: the schema change is committed immediately.
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS departments (
                id INTEGER PRIMARY KEY,
                name TEXT,
                location TEXT
            );",
        )?;
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch("DROP TABLE IF EXISTS departments;")?;
        Ok(())
    }

    fn save(&self, department: &DepartmentHandle) -> RepoResult<DepartmentId> {
        let (name, location) = {
            let department = department.borrow();
            if let Some(id) = department.id {
                return Err(RepoError::AlreadyPersisted(id));
            }
            (department.name.clone(), department.location.clone())
        };

        self.conn.execute(
            "INSERT INTO departments (name, location) VALUES (?1, ?2);",
            params![name, location],
        )?;

        let id = self.conn.last_insert_rowid();
        department.borrow_mut().id = Some(id);
        self.cache.borrow_mut().insert(id, Rc::clone(department));
        Ok(id)
    }

    fn create(&self, name: &str, location: &str) -> RepoResult<DepartmentHandle> {
        let department = Department::new_handle(name, location);
        self.save(&department)?;
        Ok(department)
    }

    fn update(&self, department: &DepartmentHandle) -> RepoResult<()> {
        let (id, name, location) = {
            let department = department.borrow();
            let id = department.id.ok_or(RepoError::NotPersisted("update"))?;
            (id, department.name.clone(), department.location.clone())
        };

        let changed = self.conn.execute(
            "UPDATE departments SET name = ?1, location = ?2 WHERE id = ?3;",
            params![name, location, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete(&self, department: &DepartmentHandle) -> RepoResult<()> {
        let id = department
            .borrow()
            .id
            .ok_or(RepoError::NotPersisted("delete"))?;

        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        // Best-effort eviction: the handle may never have been cached.
        self.cache.borrow_mut().remove(&id);
        department.borrow_mut().id = None;
        Ok(())
    }

    fn get_all(&self) -> RepoResult<Vec<DepartmentHandle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut departments = Vec::new();

        while let Some(row) = rows.next()? {
            departments.push(self.instance_from_row(row)?);
        }

        Ok(departments)
    }

    fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentHandle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(self.instance_from_row(row)?));
        }

        Ok(None)
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentHandle>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1 LIMIT 1;"))?;
        let mut rows = stmt.query([name])?;

        if let Some(row) = rows.next()? {
            return Ok(Some(self.instance_from_row(row)?));
        }

        Ok(None)
    }
}
