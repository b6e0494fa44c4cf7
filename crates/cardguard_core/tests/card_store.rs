use cardguard_core::db::{open_db, open_db_in_memory, DbError};
use cardguard_core::{
    hash_text, CardRecordError, CardRepository, NewCardRecord, RepoError, SqliteCardRepository,
};
use rusqlite::{params, Connection};

fn sample_record(holder_name: &str) -> NewCardRecord {
    NewCardRecord {
        holder_name: holder_name.to_string(),
        number_digits: "4111111111111111".to_string(),
        expiry: "09/27".to_string(),
        password_hash: hash_text("abc123"),
        cvv: "123".to_string(),
        created_at: "2026-10-15T12:00:00.000000Z".to_string(),
    }
}

#[test]
fn insert_and_get_roundtrip() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&mut conn);

    let record = sample_record("Ana Silva");
    let id = repo.insert_card(&record).unwrap();

    let loaded = repo.get_card(id).unwrap().unwrap();
    assert_eq!(loaded.id, id);
    assert_eq!(loaded.holder_name, record.holder_name);
    assert_eq!(loaded.number_digits, record.number_digits);
    assert_eq!(loaded.expiry, record.expiry);
    assert_eq!(loaded.password_hash, record.password_hash);
    assert_eq!(loaded.cvv, record.cvv);
    assert_eq!(loaded.created_at, record.created_at);
}

#[test]
fn ids_increase_monotonically() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&mut conn);

    let ids: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| repo.insert_card(&sample_record(name)).unwrap())
        .collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(repo.count_cards().unwrap(), 3);
}

#[test]
fn get_missing_card_returns_none() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&mut conn);
    assert!(repo.get_card(42).unwrap().is_none());
}

#[test]
fn insert_rejects_invalid_record_without_writing() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteCardRepository::new(&mut conn);

    let mut record = sample_record("Ana Silva");
    record.number_digits = "123".to_string();
    let err = repo.insert_card(&record).unwrap_err();
    assert!(matches!(
        err,
        RepoError::InvalidRecord(CardRecordError::InvalidNumberLength(3))
    ));
    assert_eq!(repo.count_cards().unwrap(), 0);
}

#[test]
fn ensure_schema_is_idempotent_through_repository() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cards.db");
    let mut conn = open_db(&path).unwrap();
    let mut repo = SqliteCardRepository::new(&mut conn);

    repo.ensure_schema().unwrap();
    let id = repo.insert_card(&sample_record("Ana Silva")).unwrap();
    repo.ensure_schema().unwrap();

    assert_eq!(repo.count_cards().unwrap(), 1);
    assert!(repo.get_card(id).unwrap().is_some());
}

#[test]
fn insert_without_schema_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut conn = open_db(dir.path().join("bare.db")).unwrap();
    let repo = SqliteCardRepository::new(&mut conn);

    let err = repo.insert_card(&sample_record("Ana Silva")).unwrap_err();
    assert!(matches!(err, RepoError::Db(DbError::SchemaNotInitialized)));
    assert!(err.to_string().contains("not initialized"));
}

#[test]
fn get_rejects_corrupted_rows() {
    let mut conn = open_db_in_memory().unwrap();
    insert_raw(&conn, "13/27");

    let repo = SqliteCardRepository::new(&mut conn);
    let err = repo.get_card(1).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn separate_connections_see_each_others_inserts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");
    let mut first = open_db(&path).unwrap();
    SqliteCardRepository::new(&mut first).ensure_schema().unwrap();
    let mut second = open_db(&path).unwrap();

    let first_id = SqliteCardRepository::new(&mut first)
        .insert_card(&sample_record("first"))
        .unwrap();
    let second_id = SqliteCardRepository::new(&mut second)
        .insert_card(&sample_record("second"))
        .unwrap();

    assert_ne!(first_id, second_id);
    let repo = SqliteCardRepository::new(&mut first);
    assert_eq!(repo.count_cards().unwrap(), 2);
    assert_eq!(repo.get_card(first_id).unwrap().unwrap().holder_name, "first");
}

fn insert_raw(conn: &Connection, expiry: &str) {
    conn.execute(
        "INSERT INTO cards (holder_name, number_digits, expiry, password_hash, cvv, created_at)
         VALUES ('Ana', '4111111111111111', ?1, 'h', '123', '2026-01-01T00:00:00Z');",
        params![expiry],
    )
    .unwrap();
}
