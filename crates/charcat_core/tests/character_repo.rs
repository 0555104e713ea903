use charcat_core::db::open_db_in_memory;
use charcat_core::{
    BaseStats, CharacterInput, CharacterPredicate, CharacterRepository, CharacterType,
    Classification, FilterSpec, NewCharacter, PageRequest, RepoError, SqliteCharacterRepository,
};
use rusqlite::Connection;

fn draft(name: &str) -> NewCharacter {
    NewCharacter::from_input(&CharacterInput::named(name))
}

#[test]
fn insert_assigns_id_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let mut new = draft("Aria");
    new.classification = Some(Classification::Elf);
    new.description = Some("archer".to_string());

    let first = repo.insert(&new).unwrap();
    let second = repo.insert(&draft("Bram")).unwrap();

    assert!(second.id > first.id);
    assert_eq!(first.name, "Aria");
    assert_eq!(first.kind, CharacterType::Npc);
    assert_eq!(first.classification, Some(Classification::Elf));
    assert_eq!(first.stats, BaseStats::CREATION_DEFAULTS);
    assert!(!first.is_deleted);
    assert!(first.created_at > 0);
    assert_eq!(first.created_at, first.updated_at);

    let loaded = repo.find_visible_by_id(first.id).unwrap().unwrap();
    assert_eq!(loaded, first);
}

#[test]
fn insert_rejects_invalid_records_before_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let err = repo.insert(&draft("   ")).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo.insert(&draft(&"x".repeat(51))).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert!(repo.find_all_visible().unwrap().is_empty());
}

#[test]
fn update_overwrites_mutable_columns_and_keeps_created_at() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let mut character = repo.insert(&draft("Aria")).unwrap();
    character.name = "Aria the Bold".to_string();
    character.kind = CharacterType::Hero;
    character.stats.attack = 42;
    character.created_at = 1;

    let updated = repo.update(&character).unwrap();
    assert_eq!(updated.name, "Aria the Bold");
    assert_eq!(updated.kind, CharacterType::Hero);
    assert_eq!(updated.stats.attack, 42);
    assert_ne!(updated.created_at, 1);
    assert!(updated.updated_at >= updated.created_at);
}

#[test]
fn update_of_missing_row_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let mut ghost = repo.insert(&draft("Ghost")).unwrap();
    repo.delete_by_id(ghost.id).unwrap();
    ghost.name = "Still a ghost".to_string();

    let err = repo.update(&ghost).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
}

#[test]
fn tombstoned_rows_are_hidden_from_visible_reads() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let kept = repo.insert(&draft("Kept")).unwrap();
    let mut gone = repo.insert(&draft("Gone")).unwrap();
    gone.soft_delete();
    repo.update(&gone).unwrap();

    assert!(repo.find_visible_by_id(gone.id).unwrap().is_none());
    assert!(repo
        .find_by_id_including_deleted(gone.id)
        .unwrap()
        .unwrap()
        .is_deleted);
    assert!(repo.exists_by_id(gone.id).unwrap());

    let all = repo.find_all_visible().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, kept.id);
}

#[test]
fn delete_by_id_removes_rows_and_reports_missing_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let character = repo.insert(&draft("Doomed")).unwrap();
    repo.delete_by_id(character.id).unwrap();

    assert!(!repo.exists_by_id(character.id).unwrap());
    let err = repo.delete_by_id(character.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[test]
fn page_reports_totals_and_respects_sort() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    for name in ["Cora", "Abel", "Bryn"] {
        repo.insert(&draft(name)).unwrap();
    }

    let by_name = PageRequest::new(0, 2, "name", "asc").unwrap();
    let first = repo
        .find_visible_page(&CharacterPredicate::visible(), &by_name)
        .unwrap();
    let names: Vec<_> = first.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Abel", "Bryn"]);
    assert_eq!(first.total_items, 3);
    assert_eq!(first.total_pages, 2);

    let second = repo
        .find_visible_page(
            &CharacterPredicate::visible(),
            &PageRequest::new(1, 2, "name", "asc").unwrap(),
        )
        .unwrap();
    assert_eq!(second.items.len(), 1);
    assert_eq!(second.items[0].name, "Cora");

    let descending = repo
        .find_visible_page(
            &CharacterPredicate::visible(),
            &PageRequest::new(0, 10, "name", "DESC").unwrap(),
        )
        .unwrap();
    let names: Vec<_> = descending.items.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Cora", "Bryn", "Abel"]);
}

#[test]
fn ties_on_sort_column_are_broken_by_id() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let ids: Vec<_> = (0..5)
        .map(|index| repo.insert(&draft(&format!("Clone {index}"))).unwrap().id)
        .collect();

    let mut seen = Vec::new();
    for page in 0..3 {
        let request = PageRequest::new(page, 2, "baseHealth", "desc").unwrap();
        let result = repo
            .find_visible_page(&CharacterPredicate::visible(), &request)
            .unwrap();
        seen.extend(result.items.into_iter().map(|c| c.id));
    }

    assert_eq!(seen, ids);
}

#[test]
fn page_past_the_end_is_empty_with_totals() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();
    repo.insert(&draft("Solo")).unwrap();

    let page = repo
        .find_visible_page(
            &CharacterPredicate::visible(),
            &PageRequest::new(7, 10, "id", "asc").unwrap(),
        )
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.page, 7);
    assert_eq!(page.total_items, 1);
    assert_eq!(page.total_pages, 1);
}

#[test]
fn sql_and_in_memory_predicate_evaluation_agree() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();

    let mut strong = draft("Thorn");
    strong.kind = CharacterType::Villain;
    strong.stats.attack = 30;
    repo.insert(&strong).unwrap();

    let mut weak = draft("Thornix");
    weak.kind = CharacterType::Villain;
    weak.stats.attack = 5;
    repo.insert(&weak).unwrap();

    let mut hero = draft("Aria");
    hero.kind = CharacterType::Hero;
    hero.stats.attack = 50;
    repo.insert(&hero).unwrap();

    let filter = FilterSpec {
        character_type: Some(CharacterType::Villain),
        min_base_attack: Some(10),
        ..FilterSpec::default()
    };
    let predicate = CharacterPredicate::build(&filter, Some("THORN"));

    let from_sql = repo
        .find_visible_page(&predicate, &PageRequest::search())
        .unwrap()
        .items;
    let in_memory: Vec<_> = repo
        .find_all_visible()
        .unwrap()
        .into_iter()
        .filter(|c| predicate.matches(c))
        .collect();

    assert_eq!(from_sql, in_memory);
    assert_eq!(from_sql.len(), 1);
    assert_eq!(from_sql[0].name, "Thorn");

    repo.insert(&draft("Élodie")).unwrap();
    repo.insert(&draft("ELODIE plain")).unwrap();
    let accented = CharacterPredicate::build(&FilterSpec::default(), Some("élodie"));

    let from_sql = repo
        .find_visible_page(&accented, &PageRequest::search())
        .unwrap()
        .items;
    let in_memory: Vec<_> = repo
        .find_all_visible()
        .unwrap()
        .into_iter()
        .filter(|c| accented.matches(c))
        .collect();

    assert_eq!(from_sql, in_memory);
    assert_eq!(from_sql.len(), 1);
    assert_eq!(from_sql[0].name, "Élodie");
}

#[test]
fn name_search_works_on_connections_opened_outside_bootstrap() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.sqlite3");
    drop(charcat_core::db::open_db(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();
    repo.insert(&draft("Ødegaard")).unwrap();

    let predicate = CharacterPredicate::build(&FilterSpec::default(), Some("øDE"));
    let page = repo
        .find_visible_page(&predicate, &PageRequest::search())
        .unwrap();
    assert_eq!(page.total_items, 1);
}

#[test]
fn search_values_are_bound_not_interpolated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();
    repo.insert(&draft("O'Brien")).unwrap();

    let predicate =
        CharacterPredicate::build(&FilterSpec::default(), Some("'; DROP TABLE characters; --"));
    let page = repo
        .find_visible_page(&predicate, &PageRequest::search())
        .unwrap();
    assert!(page.items.is_empty());

    let quoted = CharacterPredicate::build(&FilterSpec::default(), Some("o'b"));
    let page = repo.find_visible_page(&quoted, &PageRequest::search()).unwrap();
    assert_eq!(page.items.len(), 1);
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteCharacterRepository::try_new(&conn)
        .err()
        .expect("unmigrated connection must be rejected");
    assert!(matches!(
        err,
        RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        }
    ));
}

#[test]
fn try_new_rejects_missing_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE characters;").unwrap();

    let err = SqliteCharacterRepository::try_new(&conn)
        .err()
        .expect("missing table must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("characters")));
}

#[test]
fn try_new_rejects_missing_column() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("ALTER TABLE characters DROP COLUMN base_speed;")
        .unwrap();

    let err = SqliteCharacterRepository::try_new(&conn)
        .err()
        .expect("missing column must be rejected");
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "characters",
            column: "base_speed",
        }
    ));
}

#[test]
fn corrupt_rows_surface_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCharacterRepository::try_new(&conn).unwrap();
    let character = repo.insert(&draft("Fine")).unwrap();

    conn.execute(
        "UPDATE characters SET name = '' WHERE id = ?1;",
        [character.id],
    )
    .unwrap();

    let err = repo.find_visible_by_id(character.id).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
