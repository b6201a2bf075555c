use empdb_core::crud::drop_films_table;
use empdb_core::db::open_db_in_memory;
use empdb_core::{
    film_store, run_walkthroughs, Approach, Film, FilmStore, WalkthroughDatabase,
    WalkthroughError,
};
use std::io::{self, Write};

const RAW_BLOCK: &str = "== raw ==\n\
    A row is ('1917', 'Sam Mendes', '2019')\n\
    A row is ('Some2019Film', 'Sam Mendes', '2019')\n\
    updated 1 row(s), deleted 1 row(s)\n";

const ORM_BLOCK: &str = "== orm ==\n\
    The title of a film is \"1917\"\n\
    The title of a film is \"Some2019Film\"\n\
    updated 1 row(s), deleted 1 row(s)\n";

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn fresh_databases_let_every_approach_succeed() {
    let mut out = Vec::new();
    let outcomes = run_walkthroughs(WalkthroughDatabase::FreshInMemory, &Approach::ALL, &mut out);

    let approaches: Vec<Approach> = outcomes.iter().map(|outcome| outcome.approach).collect();
    assert_eq!(approaches, Approach::ALL.to_vec());
    assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with(RAW_BLOCK));
    assert!(printed.contains("== builder ==\nA row is ('1917'"));
    assert!(printed.ends_with(ORM_BLOCK));
}

#[test]
fn shared_database_reports_duplicate_table_and_keeps_going() {
    let conn = open_db_in_memory().unwrap();
    let mut out = Vec::new();

    let outcomes = run_walkthroughs(WalkthroughDatabase::Shared(&conn), &Approach::ALL, &mut out);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].result.is_ok());
    assert_eq!(outcomes[1].approach, Approach::Builder);
    assert!(matches!(&outcomes[1].result, Err(err) if err.is_duplicate_table()));
    let orm = outcomes[2].result.as_ref().unwrap();
    assert_eq!(orm.after_insert, vec![Film::new("1917", "Sam Mendes", "2019")]);

    let failures = outcomes
        .iter()
        .filter(|outcome| outcome.result.is_err())
        .count();
    assert_eq!(failures, 1);

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed, format!("{RAW_BLOCK}== builder ==\n{ORM_BLOCK}"));
}

#[test]
fn dropping_films_lets_a_shared_rerun_succeed() {
    let conn = open_db_in_memory().unwrap();
    let raw = film_store(Approach::RawSql, &conn);
    raw.create_table().unwrap();
    raw.insert(&Film::new("Skyfall", "Sam Mendes", "2012")).unwrap();

    let blocked = run_walkthroughs(
        WalkthroughDatabase::Shared(&conn),
        &[Approach::RawSql],
        &mut Vec::new(),
    );
    assert!(matches!(&blocked[0].result, Err(err) if err.is_duplicate_table()));

    drop_films_table(&conn).unwrap();
    let mut out = Vec::new();
    let outcomes = run_walkthroughs(
        WalkthroughDatabase::Shared(&conn),
        &[Approach::RawSql, Approach::Builder],
        &mut out,
    );

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes[0].result.is_ok());
    assert!(matches!(&outcomes[1].result, Err(err) if err.is_duplicate_table()));
    assert_eq!(String::from_utf8(out).unwrap(), format!("{RAW_BLOCK}== builder ==\n"));
}

#[test]
fn output_failure_ends_the_run() {
    let outcomes = run_walkthroughs(
        WalkthroughDatabase::FreshInMemory,
        &Approach::ALL,
        &mut BrokenPipe,
    );

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].approach, Approach::RawSql);
    assert!(matches!(
        &outcomes[0].result,
        Err(WalkthroughError::Output(err)) if err.kind() == io::ErrorKind::BrokenPipe
    ));
}
