use empdb_core::crud::drop_films_table;
use empdb_core::db::{open_db_in_memory, DbError};
use empdb_core::service::film_walkthrough::{DEMO_YEAR, UPDATED_TITLE};
use empdb_core::{
    film_store, Approach, CrudError, Film, FilmStore, FilmWalkthrough, OrmFilmStore,
};

fn demo() -> Film {
    Film::new("1917", "Sam Mendes", "2019")
}

#[test]
fn every_approach_runs_the_same_lifecycle() {
    for approach in Approach::ALL {
        let conn = open_db_in_memory().unwrap();
        let store = film_store(approach, &conn);

        store.create_table().unwrap();
        store.insert(&demo()).unwrap();
        assert_eq!(store.read_all().unwrap(), vec![demo()], "{approach}");

        let updated = store.update_title_by_year(UPDATED_TITLE, DEMO_YEAR).unwrap();
        assert_eq!(updated, 1, "{approach}");
        assert_eq!(
            store.read_all().unwrap(),
            vec![Film::new("Some2019Film", "Sam Mendes", "2019")],
            "{approach}"
        );

        let deleted = store.delete_by_year(DEMO_YEAR).unwrap();
        assert_eq!(deleted, 1, "{approach}");
        assert!(store.read_all().unwrap().is_empty(), "{approach}");
    }
}

#[test]
fn approaches_observe_each_others_rows() {
    let conn = open_db_in_memory().unwrap();
    let raw = film_store(Approach::RawSql, &conn);
    let builder = film_store(Approach::Builder, &conn);
    let orm = film_store(Approach::Orm, &conn);

    raw.create_table().unwrap();
    raw.insert(&demo()).unwrap();
    builder
        .insert(&Film::new("Skyfall", "Sam Mendes", "2012"))
        .unwrap();
    orm.insert(&Film::new("Dunkirk", "Christopher Nolan", "2017"))
        .unwrap();

    let titles: Vec<String> = orm
        .read_all()
        .unwrap()
        .into_iter()
        .map(|film| film.title)
        .collect();
    assert_eq!(titles, vec!["1917", "Skyfall", "Dunkirk"]);
    assert_eq!(raw.read_all().unwrap(), builder.read_all().unwrap());

    assert_eq!(orm.delete_by_year("2012").unwrap(), 1);
    assert_eq!(raw.read_all().unwrap().len(), 2);
}

#[test]
fn update_and_delete_without_matches_change_nothing() {
    for approach in Approach::ALL {
        let conn = open_db_in_memory().unwrap();
        let store = film_store(approach, &conn);
        store.create_table().unwrap();
        store.insert(&demo()).unwrap();

        assert_eq!(store.update_title_by_year("Other", "1999").unwrap(), 0);
        assert_eq!(store.delete_by_year("1999").unwrap(), 0);
        assert_eq!(store.read_all().unwrap(), vec![demo()], "{approach}");
    }
}

#[test]
fn raw_and_builder_create_twice_fail_with_duplicate_table() {
    for approach in [Approach::RawSql, Approach::Builder] {
        let conn = open_db_in_memory().unwrap();
        let store = film_store(approach, &conn);
        store.create_table().unwrap();

        let err = store.create_table().unwrap_err();
        assert!(err.is_duplicate_table(), "{approach}: {err}");
        match err {
            CrudError::Db(DbError::DuplicateTable { table }) => assert_eq!(table, "films"),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn builder_after_raw_on_shared_database_hits_duplicate_table() {
    let conn = open_db_in_memory().unwrap();
    film_store(Approach::RawSql, &conn).create_table().unwrap();

    let err = film_store(Approach::Builder, &conn)
        .create_table()
        .unwrap_err();
    assert!(err.is_duplicate_table());
}

#[test]
fn orm_create_is_idempotent_and_keeps_rows() {
    let conn = open_db_in_memory().unwrap();
    let store = film_store(Approach::Orm, &conn);

    store.create_table().unwrap();
    store.insert(&demo()).unwrap();
    store.create_table().unwrap();
    assert_eq!(store.read_all().unwrap(), vec![demo()]);
}

#[test]
fn drop_films_table_allows_create_again() {
    let conn = open_db_in_memory().unwrap();
    let store = film_store(Approach::RawSql, &conn);
    store.create_table().unwrap();
    store.insert(&demo()).unwrap();

    drop_films_table(&conn).unwrap();
    store.create_table().unwrap();
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn empty_title_is_rejected_before_sql() {
    for approach in Approach::ALL {
        let conn = open_db_in_memory().unwrap();
        let store = film_store(approach, &conn);
        store.create_table().unwrap();

        let err = store.insert(&Film::new("", "Sam Mendes", "2019")).unwrap_err();
        assert!(matches!(err, CrudError::Validation(_)), "{approach}: {err}");
        assert!(store.read_all().unwrap().is_empty());
    }
}

#[test]
fn insert_without_table_surfaces_sqlite_error() {
    let conn = open_db_in_memory().unwrap();
    for approach in Approach::ALL {
        let err = film_store(approach, &conn).insert(&demo()).unwrap_err();
        assert!(
            matches!(err, CrudError::Db(DbError::Sqlite(_))),
            "{approach}: {err}"
        );
    }
}

#[test]
fn orm_session_commits_only_dirty_objects() {
    let conn = open_db_in_memory().unwrap();
    let store = OrmFilmStore::new(&conn);
    store.create_table().unwrap();
    store.insert(&demo()).unwrap();
    store
        .insert(&Film::new("Skyfall", "Sam Mendes", "2012"))
        .unwrap();

    let mut session = store.session();
    let keys = session.all().unwrap();
    assert_eq!(keys.len(), 2);
    assert_eq!(session.pending_changes(), 0);
    assert!(session.commit().unwrap().is_empty());

    session.get_mut(keys[1]).unwrap().title = "Spectre".to_string();
    assert_eq!(session.pending_changes(), 1);
    let stats = session.commit().unwrap();
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.inserted + stats.deleted, 0);

    let titles: Vec<String> = store
        .read_all()
        .unwrap()
        .into_iter()
        .map(|film| film.title)
        .collect();
    assert_eq!(titles, vec!["1917", "Spectre"]);
}

#[test]
fn orm_session_rollback_discards_flushed_work() {
    let conn = open_db_in_memory().unwrap();
    let store = OrmFilmStore::new(&conn);
    store.create_table().unwrap();

    let mut session = store.session();
    session.add(demo());
    let stats = session.flush().unwrap();
    assert_eq!(stats.inserted, 1);
    session.rollback().unwrap();
    drop(session);

    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn walkthrough_prints_tuples_for_sql_approaches() {
    for approach in [Approach::RawSql, Approach::Builder] {
        let conn = open_db_in_memory().unwrap();
        let mut out = Vec::new();

        let report = FilmWalkthrough::new(film_store(approach, &conn))
            .run(&mut out)
            .unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(
            printed,
            "A row is ('1917', 'Sam Mendes', '2019')\n\
             A row is ('Some2019Film', 'Sam Mendes', '2019')\n"
        );
        assert_eq!(report.approach, approach);
        assert_eq!(report.after_insert, vec![demo()]);
        assert_eq!(report.after_update[0].title, "Some2019Film");
        assert!(report.after_delete.is_empty());
        assert_eq!((report.updated_rows, report.deleted_rows), (1, 1));
    }
}

#[test]
fn walkthrough_prints_titles_for_orm() {
    let conn = open_db_in_memory().unwrap();
    let mut out = Vec::new();

    FilmWalkthrough::new(OrmFilmStore::new(&conn))
        .run(&mut out)
        .unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(
        printed,
        "The title of a film is \"1917\"\nThe title of a film is \"Some2019Film\"\n"
    );
}

#[test]
fn walkthrough_stops_at_duplicate_table() {
    let conn = open_db_in_memory().unwrap();
    film_store(Approach::RawSql, &conn).create_table().unwrap();

    let mut out = Vec::new();
    let err = FilmWalkthrough::new(film_store(Approach::Builder, &conn))
        .run(&mut out)
        .unwrap_err();

    assert!(err.is_duplicate_table());
    assert!(out.is_empty());
}

#[test]
fn read_only_orm_session_does_not_swallow_raw_writes() {
    let conn = open_db_in_memory().unwrap();
    let orm = OrmFilmStore::new(&conn);
    orm.create_table().unwrap();

    let mut session = orm.session();
    assert!(session.all().unwrap().is_empty());

    let raw = film_store(Approach::RawSql, &conn);
    raw.insert(&demo()).unwrap();
    assert_eq!(orm.read_all().unwrap(), vec![demo()]);

    drop(session);
    assert_eq!(raw.read_all().unwrap(), vec![demo()]);
}
