use rolodex_core::storage::{ContactOrder, ContactStorage, NewContact, SqliteStorage};

#[test]
fn test_open_creates_file_and_parent_dirs() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("books").join("contacts.db");

    let storage = SqliteStorage::open(&path).expect("open should succeed");
    assert!(path.exists());
    assert_eq!(storage.count().unwrap(), 0);
}

#[test]
fn test_contacts_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("contacts.db");

    let storage = SqliteStorage::open(&path).expect("open should succeed");
    let stored = storage
        .insert(&NewContact::new("Alex Johnson", "262-555-1234").with_last_name("Johnson"))
        .expect("insert should succeed");
    drop(storage);

    let storage = SqliteStorage::open(&path).expect("reopen should succeed");
    let contacts = storage
        .observe_ordered_by(ContactOrder::FirstName)
        .borrow()
        .clone();
    assert_eq!(contacts, vec![stored]);
}

#[test]
fn test_metadata_survives_reopen() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("contacts.db");

    let storage = SqliteStorage::open(&path).expect("open should succeed");
    let before = storage.metadata().expect("metadata should read");
    drop(storage);

    let storage = SqliteStorage::open(&path).expect("reopen should succeed");
    let after = storage.metadata().expect("metadata should read");
    assert_eq!(before.format_version, after.format_version);
    assert_eq!(before.created_at, after.created_at);
}

#[test]
fn test_seed_is_idempotent_across_reopens() {
    let dir = tempfile::tempdir().expect("tempdir should be available");
    let path = dir.path().join("contacts.db");
    let defaults = [
        NewContact::new("Alex Johnson", "262-555-1234"),
        NewContact::new("Jamie Doe", "262-555-5678"),
    ];

    let storage = SqliteStorage::open(&path).expect("open should succeed");
    assert!(storage.seed_if_empty(&defaults).unwrap());
    drop(storage);

    let storage = SqliteStorage::open(&path).expect("reopen should succeed");
    assert!(!storage.seed_if_empty(&defaults).unwrap());
    assert_eq!(storage.count().unwrap(), 2);
}

#[test]
fn test_ordering_is_case_sensitive_ordinal() {
    let storage = SqliteStorage::open_in_memory().expect("in-memory storage should open");

    storage.insert(&NewContact::new("alex", "555-0001")).unwrap();
    storage.insert(&NewContact::new("Zoe", "555-0002")).unwrap();
    storage.insert(&NewContact::new("Amy", "555-0003")).unwrap();

    let names: Vec<String> = storage
        .observe_ordered_by(ContactOrder::FirstName)
        .borrow()
        .iter()
        .map(|c| c.first_name.clone())
        .collect();

    // BINARY collation: uppercase sorts before lowercase.
    assert_eq!(names, vec!["Amy", "Zoe", "alex"]);
}

#[test]
fn test_all_three_orderings_are_live() {
    let storage = SqliteStorage::open_in_memory().expect("in-memory storage should open");

    let mut by_last = storage.observe_ordered_by(ContactOrder::LastName);
    let mut by_phone = storage.observe_ordered_by(ContactOrder::Phone);

    storage
        .insert(&NewContact::new("Zoe Adams", "999-0001").with_last_name("Adams"))
        .unwrap();
    storage
        .insert(&NewContact::new("Amy Zane", "111-0002").with_last_name("Zane"))
        .unwrap();

    assert!(by_last.has_changed().unwrap());
    let last_names: Vec<String> = by_last
        .borrow_and_update()
        .iter()
        .map(|c| c.last_name.clone())
        .collect();
    assert_eq!(last_names, vec!["Adams", "Zane"]);

    assert!(by_phone.has_changed().unwrap());
    let phones: Vec<String> = by_phone
        .borrow_and_update()
        .iter()
        .map(|c| c.phone.clone())
        .collect();
    assert_eq!(phones, vec!["111-0002", "999-0001"]);
}
