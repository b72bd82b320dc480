use deptbook_core::db::open_db_in_memory;
use deptbook_core::{
    Department, DepartmentService, DepartmentStore, RepoError, SqliteDepartmentStore,
};
use rusqlite::Connection;

fn store_with_table(conn: &Connection) -> SqliteDepartmentStore<'_> {
    let store = SqliteDepartmentStore::new(conn);
    store.create_table().unwrap();
    store
}

#[test]
fn create_and_find_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let created = store.create("Engineering", "Building A").unwrap();
    let id = created.borrow().id.unwrap();

    let found = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.borrow().name, "Engineering");
    assert_eq!(found.borrow().location, "Building A");
}

#[test]
fn first_insert_gets_id_one() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    assert_eq!(department.borrow().id, Some(1));
}

#[test]
fn save_assigns_id_and_registers_handle() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = Department::new_handle("Payroll", "Building C");
    let id = store.save(&department).unwrap();

    assert_eq!(department.borrow().id, Some(id));
    let fetched = store.find_by_id(id).unwrap().unwrap();
    assert!(std::rc::Rc::ptr_eq(&department, &fetched));
}

#[test]
fn save_rejects_already_persisted_department() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    let err = store.save(&department).unwrap_err();
    assert!(matches!(err, RepoError::AlreadyPersisted(1)));
}

#[test]
fn update_rewrites_the_row() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    department.borrow_mut().location = "Building B".to_string();
    store.update(&department).unwrap();

    let id = department.borrow().id.unwrap();
    let found = store.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.borrow().location, "Building B");
}

#[test]
fn update_unsaved_department_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = Department::new_handle("Ghost", "Nowhere");
    let err = store.update(&department).unwrap_err();
    assert!(matches!(err, RepoError::NotPersisted("update")));
}

#[test]
fn update_missing_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    let id = department.borrow().id.unwrap();
    conn.execute("DELETE FROM departments WHERE id = ?1;", [id])
        .unwrap();

    let err = store.update(&department).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));
}

#[test]
fn delete_clears_id_row_and_listing() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    let id = department.borrow().id.unwrap();

    store.delete(&department).unwrap();

    assert_eq!(department.borrow().id, None);
    assert!(store.find_by_id(id).unwrap().is_none());
    assert!(store.get_all().unwrap().is_empty());
}

#[test]
fn delete_unsaved_department_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = Department::new_handle("Ghost", "Nowhere");
    let err = store.delete(&department).unwrap_err();
    assert!(matches!(err, RepoError::NotPersisted("delete")));
}

#[test]
fn delete_missing_row_returns_not_found() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    let id = department.borrow().id.unwrap();
    conn.execute("DELETE FROM departments WHERE id = ?1;", [id])
        .unwrap();

    let err = store.delete(&department).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(found) if found == id));
    // The guard fires before any state is touched.
    assert_eq!(department.borrow().id, Some(id));
}

#[test]
fn deleted_department_can_be_resaved_under_new_id() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    store.create("Design", "Building B").unwrap();
    store.delete(&department).unwrap();

    let new_id = store.save(&department).unwrap();
    assert_eq!(new_id, 3);
    assert_eq!(department.borrow().id, Some(3));
}

#[test]
fn get_all_returns_rows_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    store.create("Engineering", "Building A").unwrap();
    store.create("Design", "Building B").unwrap();
    store.create("Payroll", "Building C").unwrap();

    let all = store.get_all().unwrap();
    let ids: Vec<_> = all.iter().map(|d| d.borrow().id.unwrap()).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(all[1].borrow().name, "Design");
}

#[test]
fn find_by_id_returns_none_for_missing_row() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    assert!(store.find_by_id(99).unwrap().is_none());
}

#[test]
fn find_by_name_returns_a_match_or_none() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    store.create("Engineering", "Building A").unwrap();
    store.create("Engineering", "Building B").unwrap();

    // Duplicate names are allowed; exactly one of the matches comes back.
    let found = store.find_by_name("Engineering").unwrap().unwrap();
    assert_eq!(found.borrow().name, "Engineering");

    assert!(store.find_by_name("Marketing").unwrap().is_none());
}

#[test]
fn create_table_twice_preserves_existing_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    store.create("Engineering", "Building A").unwrap();
    store.create_table().unwrap();

    assert_eq!(store.get_all().unwrap().len(), 1);
}

#[test]
fn drop_table_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDepartmentStore::new(&conn);

    store.drop_table().unwrap();
    store.create_table().unwrap();
    store.drop_table().unwrap();
    store.drop_table().unwrap();
}

#[test]
fn queries_against_missing_table_surface_db_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDepartmentStore::new(&conn);

    let err = store.get_all().unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn full_lifecycle_scenario() {
    let conn = open_db_in_memory().unwrap();
    let store = store_with_table(&conn);

    let department = store.create("Engineering", "Building A").unwrap();
    assert_eq!(department.borrow().id, Some(1));
    assert_eq!(department.borrow().name, "Engineering");

    department.borrow_mut().location = "Building B".to_string();
    store.update(&department).unwrap();
    let found = store.find_by_id(1).unwrap().unwrap();
    assert_eq!(found.borrow().location, "Building B");

    store.delete(&department).unwrap();
    assert!(store.find_by_id(1).unwrap().is_none());
}

#[test]
fn service_delegates_to_store() {
    let conn = open_db_in_memory().unwrap();
    let service = DepartmentService::new(SqliteDepartmentStore::new(&conn));
    service.init_schema().unwrap();

    let department = service.create("Engineering", "Building A").unwrap();
    let id = department.borrow().id.unwrap();

    service.rename(&department, "Platform Engineering").unwrap();
    service.relocate(&department, "Building B").unwrap();

    let found = service.find_by_id(id).unwrap().unwrap();
    assert_eq!(found.borrow().name, "Platform Engineering");
    assert_eq!(found.borrow().location, "Building B");
    assert_eq!(service.get_all().unwrap().len(), 1);

    service.remove(&department).unwrap();
    assert!(service.find_by_name("Platform Engineering").unwrap().is_none());
}
